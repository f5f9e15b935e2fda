//! App shell: view dispatch, backend event intake, and the three
//! dashboard views (landing, scene, resources table).

use std::time::Instant;

use arboard::Clipboard;
use chrono::{DateTime, Local};
use client_core::{EntityMotion, ProjectIndex, SelectionSequencer, TransitionPhase};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::DelayedIssue;
use shared::protocol::ResourceDetail;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::scene::{self, SceneCamera, SceneFrame};
use crate::ui::theme::ScenePalette;
use crate::ui::timeline::SceneTimeline;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub server_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppViewState {
    Landing,
    Scene,
    Resources,
}

enum FetchState {
    NotStarted,
    Loading,
    Loaded,
    Failed(String),
}

struct InfoPanel {
    resource: String,
    issues: Vec<DelayedIssue>,
}

pub struct DashboardApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    server_url: String,

    view_state: AppViewState,
    fetch_state: FetchState,
    details: Vec<ResourceDetail>,
    index: ProjectIndex,
    fetched_at: Option<DateTime<Local>>,

    sequencer: SelectionSequencer,
    /// Selector widget state; the authoritative selection lives in
    /// the sequencer.
    selected_project: Option<String>,
    info_panel: Option<InfoPanel>,
    expanded_resource: Option<String>,

    timeline: SceneTimeline,
    palette: ScenePalette,
    scene_started: Instant,
    status: String,
}

impl DashboardApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            server_url: startup.server_url,
            view_state: AppViewState::Landing,
            fetch_state: FetchState::NotStarted,
            details: Vec::new(),
            index: ProjectIndex::default(),
            fetched_at: None,
            sequencer: SelectionSequencer::default(),
            selected_project: None,
            info_panel: None,
            expanded_resource: None,
            timeline: SceneTimeline::bundled(),
            palette: ScenePalette::dark(),
            scene_started: Instant::now(),
            status: "Not connected".to_string(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::ResourceDetailsLoaded { details, index } => {
                    self.details = details;
                    self.index = index;
                    self.fetch_state = FetchState::Loaded;
                    self.fetched_at = Some(Local::now());
                    self.status = format!(
                        "Loaded {} resources across {} projects",
                        self.details.len(),
                        self.index.project_count()
                    );
                    // Auto-select the first project the payload mentions.
                    if let Some(first) = self.index.first_key().map(str::to_string) {
                        self.selected_project = Some(first.clone());
                        self.sequencer
                            .request_selection(&first, &self.index, Instant::now());
                    }
                }
                UiEvent::Error(err) => {
                    let message = format!("{} error: {}", err_label(err.category()), err.message());
                    self.status = message.clone();
                    self.fetch_state = FetchState::Failed(message);
                }
            }
        }
    }

    fn ensure_fetch_started(&mut self) {
        if matches!(self.fetch_state, FetchState::NotStarted) {
            self.fetch_state = FetchState::Loading;
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::FetchResourceDetails,
                &mut self.status,
            );
        }
    }

    fn reload(&mut self) {
        self.fetch_state = FetchState::NotStarted;
        self.info_panel = None;
        self.ensure_fetch_started();
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("nav-bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Delivery Metrics");
                ui.separator();
                for (label, view) in [
                    ("Home", AppViewState::Landing),
                    ("Project Floor", AppViewState::Scene),
                    ("Developer Resources", AppViewState::Resources),
                ] {
                    if ui
                        .selectable_label(self.view_state == view, label)
                        .clicked()
                    {
                        self.view_state = view;
                    }
                }
            });
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status-bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match self.fetched_at {
                        Some(fetched_at) => {
                            ui.weak(format!("fetched {}", fetched_at.format("%H:%M:%S")));
                        }
                        None => {
                            ui.weak(&self.server_url);
                        }
                    }
                });
            });
        });
    }

    fn show_landing(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.25);
                ui.heading("Delivery Monitoring Dashboard");
                ui.add_space(8.0);
                ui.label(
                    "Track repository activity, monitor developer contributions, \
                     and oversee project progress.",
                );
                ui.add_space(16.0);
                ui.horizontal(|ui| {
                    ui.with_layout(
                        egui::Layout::left_to_right(egui::Align::Center)
                            .with_main_align(egui::Align::Center),
                        |ui| {
                            if ui.button("Developers").clicked() {
                                self.view_state = AppViewState::Resources;
                            }
                            if ui.button("Project").clicked() {
                                self.view_state = AppViewState::Scene;
                            }
                        },
                    );
                });
            });
        });
    }

    fn show_scene_view(&mut self, ctx: &egui::Context) {
        self.ensure_fetch_started();
        let failure = match &self.fetch_state {
            FetchState::Failed(message) => Some(message.clone()),
            _ => None,
        };
        let loaded = matches!(self.fetch_state, FetchState::Loaded);

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(message) = failure {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.3);
                    ui.colored_label(egui::Color32::LIGHT_RED, "Something went wrong.");
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("Reload").clicked() {
                        self.reload();
                    }
                });
            } else if loaded {
                self.show_scene_canvas(ui);
            } else {
                ui.centered_and_justified(|ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading...");
                    });
                });
            }
        });

        if matches!(self.fetch_state, FetchState::Loaded) {
            self.show_scene_overlays(ctx);
        }
    }

    fn show_scene_canvas(&mut self, ui: &mut egui::Ui) {
        let now = Instant::now();
        self.sequencer.tick(&self.index, now);
        let progress = self.sequencer.phase_progress(now);

        let yaw = self
            .timeline
            .yaw_at(self.scene_started.elapsed().as_secs_f32());
        let camera = SceneCamera::orbiting(yaw);

        // The floor slides with the transition alongside the figures.
        let floor_motion = match self.sequencer.phase() {
            TransitionPhase::Exiting => EntityMotion::Exiting,
            TransitionPhase::Entering => EntityMotion::Entering,
            TransitionPhase::Idle => EntityMotion::Steady,
        };

        let mut entities = Vec::new();
        for entity in self.sequencer.current_entities() {
            entities.push((entity, scene::motion_offset(entity.motion, progress)));
        }
        for entity in self.sequencer.exiting_entities() {
            entities.push((entity, scene::motion_offset(entity.motion, progress)));
        }

        let frame = SceneFrame {
            camera,
            entities,
            floor_offset: scene::motion_offset(floor_motion, progress),
            epoch: self.sequencer.epoch(),
        };

        if let Some(clicked) = scene::show_scene(ui, &frame, &self.palette) {
            self.toggle_info_panel(&clicked);
        }
    }

    fn toggle_info_panel(&mut self, resource: &str) {
        if self
            .info_panel
            .as_ref()
            .is_some_and(|panel| panel.resource == resource)
        {
            self.info_panel = None;
            return;
        }
        let issues = self
            .sequencer
            .current_entities()
            .iter()
            .find(|entity| entity.record.name == resource)
            .map(|entity| entity.record.delayed_issues.clone())
            .unwrap_or_default();
        self.info_panel = Some(InfoPanel {
            resource: resource.to_string(),
            issues,
        });
    }

    fn show_scene_overlays(&mut self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("project-selector"))
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(16.0, 48.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(self.palette.overlay_bg)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label("Select project:");
                            let selected_text = self
                                .selected_project
                                .clone()
                                .unwrap_or_else(|| "-".to_string());
                            let mut chosen: Option<String> = None;
                            egui::ComboBox::from_id_salt("project-select")
                                .selected_text(selected_text)
                                .show_ui(ui, |ui| {
                                    for key in self.index.keys() {
                                        let is_selected =
                                            self.selected_project.as_deref() == Some(key);
                                        if ui.selectable_label(is_selected, key).clicked() {
                                            chosen = Some(key.clone());
                                        }
                                    }
                                });
                            if let Some(key) = chosen {
                                self.select_project(key);
                            }
                            if !self.sequencer.is_idle() {
                                ui.weak("switching...");
                            }
                        });
                    });
            });

        if let Some(key) = self.sequencer.current_key() {
            if let Some(resources) = self.index.resources(key) {
                let badge = format!("Resources on {key}: {}", resources.len());
                egui::Area::new(egui::Id::new("project-badge"))
                    .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 48.0))
                    .show(ctx, |ui| {
                        egui::Frame::popup(ui.style())
                            .fill(self.palette.overlay_bg)
                            .show(ui, |ui| {
                                ui.label(badge);
                            });
                    });
            }
        }

        self.show_info_panel(ctx);
    }

    fn select_project(&mut self, key: String) {
        // Switching projects always dismisses the open info panel.
        self.info_panel = None;
        self.sequencer
            .request_selection(&key, &self.index, Instant::now());
        self.selected_project = Some(key);
    }

    fn show_info_panel(&mut self, ctx: &egui::Context) {
        let Some(panel) = &self.info_panel else {
            return;
        };
        let resource = panel.resource.clone();
        let issues = panel.issues.clone();
        let mut open = true;
        let mut copy_url: Option<String> = None;

        egui::Window::new(&resource)
            .id(egui::Id::new("figure-info-panel"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -40.0))
            .collapsible(false)
            .resizable(false)
            .max_width(340.0)
            .open(&mut open)
            .show(ctx, |ui| {
                if issues.is_empty() {
                    ui.label("No delayed issues");
                    return;
                }
                ui.strong("Delayed issues:");
                for issue in &issues {
                    ui.horizontal(|ui| {
                        match &issue.url {
                            Some(url) => {
                                if ui.link(format!("• {}", issue.title)).clicked() {
                                    ui.ctx().open_url(egui::OpenUrl::new_tab(url));
                                }
                                if ui.small_button("copy link").clicked() {
                                    copy_url = Some(url.clone());
                                }
                            }
                            None => {
                                ui.label(format!("• {}", issue.title));
                            }
                        };
                    });
                }
            });

        if let Some(url) = copy_url {
            match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(url)) {
                Ok(()) => self.status = "Issue link copied to clipboard".to_string(),
                Err(err) => tracing::warn!("clipboard copy failed: {err}"),
            }
        }
        if !open {
            self.info_panel = None;
        }
    }

    fn show_resources_view(&mut self, ctx: &egui::Context) {
        self.ensure_fetch_started();

        let failure = match &self.fetch_state {
            FetchState::Failed(message) => Some(message.clone()),
            _ => None,
        };
        let loaded = matches!(self.fetch_state, FetchState::Loaded);

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(message) = failure {
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);
                    ui.colored_label(
                        egui::Color32::LIGHT_RED,
                        format!("Error fetching data: {message}"),
                    );
                    ui.add_space(8.0);
                    if ui.button("Reload").clicked() {
                        self.reload();
                    }
                });
            } else if loaded {
                ui.heading("Developer Resources");
                ui.weak(format!("Showing {} resources", self.details.len()));
                ui.separator();
                let details = self.details.clone();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for detail in &details {
                        self.show_resource_row(ui, detail);
                    }
                });
            } else {
                ui.centered_and_justified(|ui| {
                    ui.label("Loading resources data...");
                });
            }
        });
    }

    fn show_resource_row(&mut self, ui: &mut egui::Ui, detail: &ResourceDetail) {
        let expanded = self.expanded_resource.as_deref() == Some(detail.resource.as_str());
        if ui
            .selectable_label(expanded, format!("▸ {}", detail.resource))
            .clicked()
        {
            self.expanded_resource = if expanded {
                None
            } else {
                Some(detail.resource.clone())
            };
        }
        if !expanded {
            return;
        }

        ui.indent(("resource-metrics", &detail.resource), |ui| {
            egui::Grid::new(("resource-grid", &detail.resource))
                .num_columns(2)
                .spacing([24.0, 4.0])
                .show(ui, |ui| {
                    let mut metric = |label: &str, value: Option<String>| {
                        ui.label(label);
                        ui.label(value.unwrap_or_else(|| "-".to_string()));
                        ui.end_row();
                    };
                    metric(
                        "Current projects",
                        detail.current_projects_count.map(|v| v.to_string()),
                    );
                    metric(
                        "All projects",
                        detail.all_projects_count.map(|v| v.to_string()),
                    );
                    metric(
                        "Bandwidth today",
                        detail.bandwidth_today.map(|v| format!("{:.0}%", v * 100.0)),
                    );
                    metric(
                        "Closing rate",
                        detail.closing_rate.map(|v| format!("{:.0}%", v * 100.0)),
                    );
                    metric("Closed issues", detail.closed_issues.map(|v| v.to_string()));
                    metric("Cost", detail.cost.map(|v| format!("${v:.2}")));
                    metric(
                        "Delayed issues",
                        Some(detail.delayed_issues.len().to_string()),
                    );
                });
        });
        ui.separator();
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);

        match self.view_state {
            AppViewState::Landing => self.show_landing(ctx),
            AppViewState::Scene => self.show_scene_view(ctx),
            AppViewState::Resources => self.show_resources_view(ctx),
        }

        // The scene animates continuously (camera orbit plus any
        // transition); other views only poll the event queue.
        if self.view_state == AppViewState::Scene {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
