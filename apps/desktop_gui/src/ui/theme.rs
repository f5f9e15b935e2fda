//! Colors for the scene and its overlays.

use egui::Color32;

pub struct ScenePalette {
    pub sky: Color32,
    pub floor_line: Color32,
    pub floor_edge: Color32,
    pub shadow: Color32,
    pub figure: Color32,
    pub figure_exiting: Color32,
    pub label: Color32,
    pub overlay_bg: Color32,
}

impl ScenePalette {
    pub fn dark() -> Self {
        Self {
            sky: Color32::from_rgb(16, 18, 24),
            floor_line: Color32::from_rgb(52, 58, 72),
            floor_edge: Color32::from_rgb(86, 96, 118),
            shadow: Color32::from_black_alpha(110),
            figure: Color32::from_rgb(122, 186, 255),
            figure_exiting: Color32::from_rgb(90, 110, 140),
            label: Color32::from_rgb(222, 228, 238),
            overlay_bg: Color32::from_black_alpha(128),
        }
    }
}
