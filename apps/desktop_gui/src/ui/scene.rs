//! Painter-drawn pseudo-3D scene: a perspective-projected floor with
//! one labeled figure per mounted entity.

use client_core::{EntityMotion, SceneEntity, Spring, TRANSITION_DURATION, TRANSITION_OFFSET};
use eframe::egui;
use egui::{Align2, FontId, Pos2, Rect, Sense, Stroke, Ui};

use crate::ui::theme::ScenePalette;

/// Half-extent of the painted floor in scene units; the slot
/// positions all sit comfortably inside it.
const FLOOR_EXTENT: f32 = 130.0;
const FLOOR_GRID_STEP: f32 = 26.0;

/// Orbiting camera looking at the scene origin.
pub struct SceneCamera {
    pub yaw_degrees: f32,
    pub height: f32,
    pub radius: f32,
}

impl SceneCamera {
    pub fn orbiting(yaw_degrees: f32) -> Self {
        Self {
            yaw_degrees,
            height: 60.0,
            radius: 270.0,
        }
    }

    fn eye(&self) -> [f32; 3] {
        let yaw = self.yaw_degrees.to_radians();
        [self.radius * yaw.sin(), self.height, self.radius * yaw.cos()]
    }

    /// Projects a world point into the viewport. `None` for points at
    /// or behind the near plane, so degenerate geometry is skipped
    /// instead of exploding across the screen.
    pub fn project(&self, world: [f32; 3], viewport: Rect) -> Option<Pos2> {
        let eye = self.eye();
        let forward = normalize([-eye[0], -eye[1], -eye[2]]);
        let right = normalize(cross([0.0, 1.0, 0.0], forward));
        let up = cross(forward, right);

        let rel = [world[0] - eye[0], world[1] - eye[1], world[2] - eye[2]];
        let x = dot(rel, right);
        let y = dot(rel, up);
        let z = dot(rel, forward);
        if z < 1.0 {
            return None;
        }
        let focal = viewport.height() * 1.1;
        Some(egui::pos2(
            viewport.center().x + focal * x / z,
            viewport.center().y - focal * y / z,
        ))
    }

    fn depth_of(&self, world: [f32; 3]) -> f32 {
        let eye = self.eye();
        let d = [world[0] - eye[0], world[1] - eye[1], world[2] - eye[2]];
        dot(d, d)
    }
}

/// The x-axis displacement for an entity at the given phase progress
/// (`None` while idle). Entering figures start 200 units short of
/// their slot; exiting figures travel 200 units past it.
pub fn motion_offset(motion: EntityMotion, progress: Option<f32>) -> f32 {
    let Some(progress) = progress else {
        return 0.0;
    };
    let eased = Spring::SCENE.sample(progress * TRANSITION_DURATION.as_secs_f32());
    match motion {
        EntityMotion::Steady => 0.0,
        EntityMotion::Entering => -TRANSITION_OFFSET * (1.0 - eased),
        EntityMotion::Exiting => TRANSITION_OFFSET * eased,
    }
}

/// Everything the painter needs for one frame of the scene.
pub struct SceneFrame<'a> {
    pub camera: SceneCamera,
    /// Entities paired with their current x displacement.
    pub entities: Vec<(&'a SceneEntity, f32)>,
    /// The floor slides with the global transition.
    pub floor_offset: f32,
    /// Remount key: changes per completed swap so click ids never
    /// carry over between transitions.
    pub epoch: u64,
}

/// Paints the frame and returns the name of a clicked figure, if any.
pub fn show_scene(ui: &mut Ui, frame: &SceneFrame<'_>, palette: &ScenePalette) -> Option<String> {
    let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, egui::CornerRadius::ZERO, palette.sky);

    draw_floor(&painter, rect, &frame.camera, frame.floor_offset, palette);

    // Painter's algorithm: farthest figures first.
    let mut ordered: Vec<&(&SceneEntity, f32)> = frame.entities.iter().collect();
    ordered.sort_by(|a, b| {
        let da = frame.camera.depth_of(entity_base(a.0, a.1));
        let db = frame.camera.depth_of(entity_base(b.0, b.1));
        db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut clicked = None;
    for (entity, offset) in ordered {
        if let Some(hit) = draw_figure(ui, &painter, rect, frame, entity, *offset, palette) {
            clicked = Some(hit);
        }
    }
    clicked
}

fn entity_base(entity: &SceneEntity, offset: f32) -> [f32; 3] {
    [
        entity.slot.position[0] + offset,
        0.0,
        entity.slot.position[2],
    ]
}

fn draw_floor(
    painter: &egui::Painter,
    rect: Rect,
    camera: &SceneCamera,
    offset: f32,
    palette: &ScenePalette,
) {
    let mut line = |a: [f32; 3], b: [f32; 3], stroke: Stroke| {
        if let (Some(pa), Some(pb)) = (camera.project(a, rect), camera.project(b, rect)) {
            painter.line_segment([pa, pb], stroke);
        }
    };

    let grid = Stroke::new(1.0, palette.floor_line);
    let mut coord = -FLOOR_EXTENT;
    while coord <= FLOOR_EXTENT {
        line(
            [coord + offset, 0.0, -FLOOR_EXTENT],
            [coord + offset, 0.0, FLOOR_EXTENT],
            grid,
        );
        line(
            [-FLOOR_EXTENT + offset, 0.0, coord],
            [FLOOR_EXTENT + offset, 0.0, coord],
            grid,
        );
        coord += FLOOR_GRID_STEP;
    }

    let edge = Stroke::new(2.0, palette.floor_edge);
    let corners = [
        [-FLOOR_EXTENT + offset, 0.0, -FLOOR_EXTENT],
        [FLOOR_EXTENT + offset, 0.0, -FLOOR_EXTENT],
        [FLOOR_EXTENT + offset, 0.0, FLOOR_EXTENT],
        [-FLOOR_EXTENT + offset, 0.0, FLOOR_EXTENT],
    ];
    for i in 0..4 {
        line(corners[i], corners[(i + 1) % 4], edge);
    }
}

fn draw_figure(
    ui: &mut Ui,
    painter: &egui::Painter,
    rect: Rect,
    frame: &SceneFrame<'_>,
    entity: &SceneEntity,
    offset: f32,
    palette: &ScenePalette,
) -> Option<String> {
    let base = entity_base(entity, offset);
    let height = entity.slot.scale[1] * 0.9;
    let feet = frame.camera.project(base, rect)?;
    let crown = frame.camera.project([base[0], height, base[2]], rect)?;

    let body_height = (feet.y - crown.y).abs().max(6.0);
    let head_radius = (body_height * 0.18).clamp(2.0, 14.0);
    let color = match entity.motion {
        EntityMotion::Exiting => palette.figure_exiting,
        _ => palette.figure,
    };

    painter.circle_filled(
        egui::pos2(feet.x, feet.y + 2.0),
        body_height * 0.16,
        palette.shadow,
    );

    // Stick figure: torso, legs, arms, head.
    let hip = egui::pos2(feet.x, feet.y - body_height * 0.35);
    let neck = egui::pos2(feet.x, crown.y + head_radius * 2.2);
    let stroke = Stroke::new((body_height * 0.07).clamp(1.5, 5.0), color);
    painter.line_segment([hip, neck], stroke);
    painter.line_segment([hip, egui::pos2(feet.x - body_height * 0.14, feet.y)], stroke);
    painter.line_segment([hip, egui::pos2(feet.x + body_height * 0.14, feet.y)], stroke);
    let shoulder = egui::pos2(feet.x, neck.y + body_height * 0.1);
    painter.line_segment(
        [
            shoulder,
            egui::pos2(feet.x - body_height * 0.18, shoulder.y + body_height * 0.18),
        ],
        stroke,
    );
    painter.line_segment(
        [
            shoulder,
            egui::pos2(feet.x + body_height * 0.18, shoulder.y + body_height * 0.18),
        ],
        stroke,
    );
    painter.circle_filled(egui::pos2(feet.x, crown.y + head_radius), head_radius, color);

    painter.text(
        egui::pos2(feet.x, crown.y - 4.0),
        Align2::CENTER_BOTTOM,
        &entity.record.name,
        FontId::proportional(13.0),
        palette.label,
    );

    // Exiting figures are on their way out and no longer clickable.
    if entity.motion == EntityMotion::Exiting {
        return None;
    }

    let hit_rect = Rect::from_two_pos(
        egui::pos2(feet.x - body_height * 0.25, crown.y),
        egui::pos2(feet.x + body_height * 0.25, feet.y),
    );
    let id = ui
        .id()
        .with(("scene-figure", frame.epoch, entity.slot_index));
    let response = ui.interact(hit_rect, id, Sense::click());
    if response.hovered() {
        painter.rect_stroke(
            hit_rect.expand(2.0),
            egui::CornerRadius::same(3),
            Stroke::new(1.0, palette.label),
            egui::StrokeKind::Middle,
        );
    }
    response.clicked().then(|| entity.record.name.clone())
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = dot(v, v).sqrt();
    if len <= f32::EPSILON {
        return [0.0, 0.0, 0.0];
    }
    [v[0] / len, v[1] / len, v[2] / len]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::EntityMotion;

    #[test]
    fn steady_entities_never_displace() {
        assert_eq!(motion_offset(EntityMotion::Steady, Some(0.5)), 0.0);
        assert_eq!(motion_offset(EntityMotion::Entering, None), 0.0);
    }

    #[test]
    fn entering_figures_start_offset_and_converge() {
        let start = motion_offset(EntityMotion::Entering, Some(0.0));
        assert_eq!(start, -TRANSITION_OFFSET);
        let settled = motion_offset(EntityMotion::Entering, Some(1.0));
        assert!(settled.abs() < TRANSITION_OFFSET * 0.01);
    }

    #[test]
    fn exiting_figures_travel_the_full_offset() {
        assert_eq!(motion_offset(EntityMotion::Exiting, Some(0.0)), 0.0);
        let gone = motion_offset(EntityMotion::Exiting, Some(1.0));
        assert!((gone - TRANSITION_OFFSET).abs() < TRANSITION_OFFSET * 0.01);
    }

    #[test]
    fn projection_rejects_points_behind_the_camera() {
        let camera = SceneCamera::orbiting(0.0);
        let viewport = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 600.0));
        // Just past the eye along +z.
        assert!(camera.project([0.0, 60.0, 400.0], viewport).is_none());
        assert!(camera.project([0.0, 0.0, 0.0], viewport).is_some());
    }

    #[test]
    fn origin_projects_to_the_viewport_center_column() {
        let camera = SceneCamera::orbiting(0.0);
        let viewport = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 600.0));
        let center = camera.project([0.0, 0.0, 0.0], viewport).expect("visible");
        assert!((center.x - viewport.center().x).abs() < 1.0);
    }
}
