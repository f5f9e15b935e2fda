//! Desktop dashboard entry point: config resolution, logging, and
//! backend bridge wiring.

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::{DashboardApp, StartupConfig};

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
const SERVER_URL_ENV: &str = "DASHBOARD_SERVER_URL";
const CONFIG_FILE: &str = "dashboard.toml";

#[derive(Parser, Debug)]
#[command(about = "Delivery metrics desktop dashboard")]
struct Args {
    /// Metrics backend base URL. Falls back to DASHBOARD_SERVER_URL,
    /// then `dashboard.toml`, then the local mock backend.
    #[arg(long)]
    server_url: Option<String>,
}

fn resolve_server_url(
    flag: Option<String>,
    env: Option<String>,
    config_file: Option<&str>,
) -> String {
    if let Some(url) = flag.filter(|v| !v.trim().is_empty()) {
        return url;
    }
    if let Some(url) = env.filter(|v| !v.trim().is_empty()) {
        return url;
    }
    if let Some(raw) = config_file {
        if let Ok(file_cfg) = toml::from_str::<std::collections::HashMap<String, String>>(raw) {
            if let Some(url) = file_cfg.get("server_url") {
                return url.clone();
            }
        }
    }
    DEFAULT_SERVER_URL.to_string()
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let server_url = resolve_server_url(
        args.server_url,
        std::env::var(SERVER_URL_ENV).ok(),
        std::fs::read_to_string(CONFIG_FILE).ok().as_deref(),
    );
    tracing::info!(server_url, "starting dashboard");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(server_url.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Delivery Metrics Dashboard")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([960.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Delivery Metrics Dashboard",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(DashboardApp::bootstrap(
                cmd_tx,
                ui_rx,
                StartupConfig { server_url },
            )))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::{resolve_server_url, DEFAULT_SERVER_URL};

    #[test]
    fn flag_wins_over_everything() {
        let url = resolve_server_url(
            Some("http://flag:1".to_string()),
            Some("http://env:2".to_string()),
            Some("server_url = \"http://file:3\""),
        );
        assert_eq!(url, "http://flag:1");
    }

    #[test]
    fn env_wins_over_the_config_file() {
        let url = resolve_server_url(
            None,
            Some("http://env:2".to_string()),
            Some("server_url = \"http://file:3\""),
        );
        assert_eq!(url, "http://env:2");
    }

    #[test]
    fn config_file_beats_the_default() {
        let url = resolve_server_url(None, None, Some("server_url = \"http://file:3\""));
        assert_eq!(url, "http://file:3");
    }

    #[test]
    fn blank_overrides_are_skipped() {
        let url = resolve_server_url(Some("   ".to_string()), Some(String::new()), None);
        assert_eq!(url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn unparseable_config_files_fall_through() {
        let url = resolve_server_url(None, None, Some("not even toml ["));
        assert_eq!(url, DEFAULT_SERVER_URL);
    }
}
