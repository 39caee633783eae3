//! Runtime bridge between the UI command queue and the store / remote
//! service. Runs on its own thread with its own tokio runtime.

use std::{sync::Arc, thread};

use client_core::TrackingClient;
use crossbeam_channel::{Receiver, Sender};
use shared::{
    domain::TrackingNumber,
    error::{ClassifiedError, ErrorCode, ErrorReport},
};
use storage::{StoreError, TrackingStore};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{AppMessage, UiError, UiErrorContext};
use crate::controller::orchestration::command_name;

pub struct BackendDeps {
    pub store: TrackingStore,
    pub client: Arc<TrackingClient>,
}

/// Spawns the worker. It exits once every command sender is dropped.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<AppMessage>,
    deps: BackendDeps,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.send(AppMessage::Failed(UiError::new(
                    UiErrorContext::BackendStartup,
                    ErrorReport::new(
                        ErrorCode::Io,
                        format!("backend worker startup failure: failed to build runtime: {err}"),
                    ),
                )));
                return;
            }
        };

        runtime.block_on(async move {
            tracing::info!(store = %deps.store.path().display(), "backend worker ready");

            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = command_name(&cmd), "backend received command");
                match cmd {
                    BackendCommand::FetchHistory { number } => {
                        let client = deps.client.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let message = fetch_history(&client, number).await;
                            let _ = ui_tx.send(message);
                        });
                    }
                    BackendCommand::LoadTrackingNumbers => {
                        let result = deps
                            .store
                            .ensure_initialized()
                            .await
                            .map(|state| state.tracking_numbers);
                        let _ = ui_tx.send(list_message(UiErrorContext::LoadList, result));
                    }
                    BackendCommand::AppendTrackingNumber { number } => {
                        let result = deps.store.append(number).await;
                        let _ = ui_tx.send(list_message(UiErrorContext::AppendNumber, result));
                    }
                    BackendCommand::RemoveTrackingNumber { index } => {
                        let result = deps.store.remove(index).await;
                        let _ = ui_tx.send(list_message(UiErrorContext::RemoveNumber, result));
                    }
                }
            }

            // Fetches still running are cancelled when the runtime drops.
            tracing::info!("backend worker stopped");
        });
    })
}

fn list_message(
    context: UiErrorContext,
    result: Result<Vec<TrackingNumber>, StoreError>,
) -> AppMessage {
    match result {
        Ok(numbers) => AppMessage::ListUpdated(numbers),
        Err(err) => {
            tracing::error!(code = ?err.code(), "store command failed: {err}");
            AppMessage::Failed(UiError::from_error(context, &err))
        }
    }
}

async fn fetch_history(client: &TrackingClient, number: TrackingNumber) -> AppMessage {
    match client.fetch_history(&number).await {
        Ok(record) => AppMessage::HistoryFetched(record),
        Err(err) => AppMessage::Failed(
            UiError::from_error(UiErrorContext::FetchHistory, &err).with_tracking_number(number),
        ),
    }
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
