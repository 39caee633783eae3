//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};
use shared::error::{ErrorCode, ErrorReport};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext};

pub fn command_name(cmd: &BackendCommand) -> &'static str {
    match cmd {
        BackendCommand::LoadTrackingNumbers => "load_tracking_numbers",
        BackendCommand::AppendTrackingNumber { .. } => "append_tracking_number",
        BackendCommand::RemoveTrackingNumber { .. } => "remove_tracking_number",
        BackendCommand::FetchHistory { .. } => "fetch_history",
    }
}

/// Queues a command for the backend worker. A full or closed queue comes
/// back as an error for the session to show; it never blocks the UI.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), UiError> {
    let cmd_name = command_name(&cmd);

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "backend command queue is full");
            Err(UiError::new(
                UiErrorContext::CommandQueue,
                ErrorReport::new(
                    ErrorCode::Fetch,
                    "Background queue is full; please retry in a moment",
                ),
            ))
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            Err(UiError::new(
                UiErrorContext::CommandQueue,
                ErrorReport::new(
                    ErrorCode::Io,
                    "Background worker stopped (possible startup failure); restart the tracker",
                ),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::TrackingNumber;

    #[test]
    fn queued_command_reaches_receiver() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let cmd = BackendCommand::FetchHistory {
            number: TrackingNumber("A".into()),
        };

        dispatch_backend_command(&tx, cmd.clone()).expect("queued");

        assert_eq!(rx.try_recv().expect("received"), cmd);
    }

    #[test]
    fn full_queue_is_reported_instead_of_blocking() {
        let (tx, _rx) = crossbeam_channel::bounded(1);
        dispatch_backend_command(&tx, BackendCommand::LoadTrackingNumbers).expect("first");

        let err = dispatch_backend_command(&tx, BackendCommand::LoadTrackingNumbers)
            .expect_err("second does not fit");

        assert_eq!(err.context(), UiErrorContext::CommandQueue);
    }

    #[test]
    fn closed_queue_is_reported() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        drop(rx);

        let err = dispatch_backend_command(&tx, BackendCommand::LoadTrackingNumbers)
            .expect_err("receiver gone");

        assert_eq!(err.code(), ErrorCode::Io);
    }
}
