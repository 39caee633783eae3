use std::sync::Arc;

use shared::{
    domain::{TrackingHistoryEntry, TrackingNumber, TrackingRecord},
    protocol::{parse_wire_datetime, TrackingDetail},
};
use tracing::{debug, info, warn};

pub mod catalog;
pub mod error;
pub mod transport;

pub use catalog::{Catalog, StatusCatalog};
pub use error::FetchError;
pub use transport::{ShipxTransport, StatusSource, TrackingSource, DEFAULT_API_URL};

/// Looks up parcel histories and decorates every entry with its catalog
/// status. One attempt per call; nothing is cached on failure.
pub struct TrackingClient {
    source: Arc<dyn TrackingSource>,
    catalog: Arc<StatusCatalog>,
}

impl TrackingClient {
    pub fn new(source: Arc<dyn TrackingSource>, catalog: Arc<StatusCatalog>) -> Self {
        Self { source, catalog }
    }

    /// Both endpoints served by one transport, catalog included.
    pub fn over_http(transport: ShipxTransport) -> Self {
        let transport = Arc::new(transport);
        let catalog = Arc::new(StatusCatalog::new(transport.clone()));
        Self::new(transport, catalog)
    }

    pub fn catalog(&self) -> &Arc<StatusCatalog> {
        &self.catalog
    }

    pub async fn fetch_history(
        &self,
        number: &TrackingNumber,
    ) -> Result<TrackingRecord, FetchError> {
        let response = match self.source.fetch_tracking(number).await {
            Ok(response) => response,
            Err(err) => {
                if err.is_not_found() {
                    info!(tracking_number = %number, "tracking number unknown to the service");
                } else {
                    warn!(tracking_number = %number, "tracking lookup failed: {err}");
                }
                return Err(err);
            }
        };
        if response.tracking_number != number.as_str() {
            debug!(
                requested = %number,
                reported = %response.tracking_number,
                "service reported a different tracking number"
            );
        }

        let timestamps = response
            .tracking_details
            .iter()
            .map(|detail| decode_timestamp(number, detail))
            .collect::<Result<Vec<_>, _>>()?;

        let history = if timestamps.is_empty() {
            Vec::new()
        } else {
            let catalog = self.catalog.load().await?;
            response
                .tracking_details
                .into_iter()
                .zip(timestamps)
                .map(|(detail, timestamp)| TrackingHistoryEntry {
                    timestamp,
                    status: catalog.lookup(&detail.status),
                    status_code: detail.status,
                })
                .collect()
        };

        info!(tracking_number = %number, entries = history.len(), "tracking history fetched");
        // Keyed by the requested number so the session cache lines up with
        // the list entry that asked for it.
        Ok(TrackingRecord {
            tracking_number: number.clone(),
            history,
        })
    }
}

fn decode_timestamp(
    number: &TrackingNumber,
    detail: &TrackingDetail,
) -> Result<chrono::DateTime<chrono::Utc>, FetchError> {
    parse_wire_datetime(&detail.datetime).map_err(|err| FetchError::Decode {
        url: format!("tracking/{number}"),
        reason: format!("invalid datetime '{}': {err}", detail.datetime),
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
