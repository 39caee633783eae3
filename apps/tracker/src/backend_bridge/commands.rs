//! Backend commands queued from UI to backend worker.

use shared::domain::TrackingNumber;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    LoadTrackingNumbers,
    AppendTrackingNumber { number: TrackingNumber },
    /// Zero-based position in the persisted list.
    RemoveTrackingNumber { index: usize },
    FetchHistory { number: TrackingNumber },
}
