//! Developer toolbox: a mock metrics backend for local dashboard work
//! and a payload inspector.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use clap::{Parser, Subcommand};
use client_core::ProjectIndex;
use serde_json::Value;
use shared::protocol::resource_details_from_value;
use tokio::net::TcpListener;

const SAMPLE_PAYLOAD: &str = include_str!("../assets/sample_payload.json");

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const BIND_ENV: &str = "DASHBOARD_MOCK_BIND";

#[derive(Parser, Debug)]
#[command(about = "Delivery metrics developer tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve a metrics payload on /v1/resource-details.
    ServeMock {
        /// Listen address; falls back to DASHBOARD_MOCK_BIND, then
        /// 127.0.0.1:8080.
        #[arg(long)]
        bind: Option<String>,
        /// JSON payload file; the built-in sample is used when omitted.
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
    /// Parse a payload file and print the derived project index.
    Inspect { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    match cli.command {
        Command::ServeMock { bind, fixture } => {
            let bind = bind
                .or_else(|| std::env::var(BIND_ENV).ok().filter(|v| !v.trim().is_empty()))
                .unwrap_or_else(|| DEFAULT_BIND.to_string());
            serve_mock(&bind, fixture).await
        }
        Command::Inspect { file } => inspect(&file),
    }
}

async fn serve_mock(bind: &str, fixture: Option<PathBuf>) -> Result<()> {
    let payload: Value = match fixture {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("could not read fixture '{}'", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("fixture '{}' is not valid JSON", path.display()))?
        }
        None => serde_json::from_str(SAMPLE_PAYLOAD).context("built-in sample payload is invalid")?,
    };

    // Fail fast if the payload would not decode on the dashboard side.
    let details = resource_details_from_value(payload.clone())
        .context("payload would be rejected by the dashboard")?;
    tracing::info!(resources = details.len(), "mock payload validated");

    let app = Router::new().route(
        "/v1/resource-details",
        get(move || {
            let payload = payload.clone();
            async move { Json(payload) }
        }),
    );

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(addr = %listener.local_addr()?, "mock metrics backend listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn inspect(file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("could not read '{}'", file.display()))?;
    let body: Value =
        serde_json::from_str(&raw).with_context(|| format!("'{}' is not JSON", file.display()))?;
    let details = resource_details_from_value(body)?;
    let index = ProjectIndex::from_details(&details);

    println!(
        "{} resources, {} projects",
        details.len(),
        index.project_count()
    );
    for key in index.keys() {
        println!(
            "project {key}: total bandwidth {:.2}",
            index.total_bandwidth(key).unwrap_or(0.0)
        );
        for record in index.resources(key).unwrap_or(&[]) {
            println!(
                "  {} ({:.0}% bandwidth, {} delayed issues)",
                record.name,
                record.bandwidth * 100.0,
                record.delayed_issues.len()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_sample_payload_decodes_and_indexes() {
        let body: Value = serde_json::from_str(SAMPLE_PAYLOAD).expect("sample is JSON");
        let details = resource_details_from_value(body).expect("sample decodes");
        let index = ProjectIndex::from_details(&details);

        assert_eq!(details.len(), 7);
        assert_eq!(index.keys(), ["atlas", "borealis", "cascade", "dusk"]);
        // atlas deliberately has more resources than the scene has
        // slots, so local runs exercise the truncation path.
        assert!(index.resources("atlas").expect("atlas exists").len() > 5);
    }
}
