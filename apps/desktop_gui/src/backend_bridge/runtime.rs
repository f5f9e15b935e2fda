//! Backend worker: a dedicated thread owning a tokio runtime that
//! services the UI command queue against the metrics backend.
//!
//! All GUI state lives on the UI thread; the worker only ever talks
//! back over the bounded event channel, so a slow or failed fetch can
//! never race the interface or touch it after teardown. When the GUI
//! drops its queue handle, `recv` fails and the worker winds down.

use std::thread;

use client_core::{MetricsClient, ProjectIndex};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(server_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = MetricsClient::new(server_url);
            tracing::info!(base_url = client.base_url(), "backend worker ready");

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::FetchResourceDetails => {
                        let _ = ui_tx.try_send(UiEvent::Info(
                            "Fetching resource details...".to_string(),
                        ));
                        match client.fetch_resource_details().await {
                            Ok(details) => {
                                let index = ProjectIndex::from_details(&details);
                                tracing::info!(
                                    resources = details.len(),
                                    projects = index.project_count(),
                                    "resource details loaded"
                                );
                                let _ = ui_tx.try_send(UiEvent::ResourceDetailsLoaded {
                                    details,
                                    index,
                                });
                            }
                            Err(err) => {
                                tracing::warn!("resource details fetch failed: {err}");
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_ingest(
                                    UiErrorContext::FetchResourceDetails,
                                    &err,
                                )));
                            }
                        }
                    }
                }
            }
            tracing::debug!("ui command queue closed; backend worker exiting");
        });
    });
}
