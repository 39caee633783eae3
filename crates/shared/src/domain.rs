use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User-supplied parcel identifier. Opaque: never validated against the
/// courier's numbering scheme, and duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingNumber(pub String);

impl TrackingNumber {
    /// Trims surrounding whitespace and rejects empty input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub code: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingHistoryEntry {
    pub timestamp: DateTime<Utc>,
    /// Raw code as reported by the remote service, kept even when the
    /// catalog has no entry for it.
    pub status_code: String,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRecord {
    pub tracking_number: TrackingNumber,
    pub history: Vec<TrackingHistoryEntry>,
}

impl TrackingRecord {
    pub fn latest(&self) -> Option<&TrackingHistoryEntry> {
        self.history.iter().max_by_key(|entry| entry.timestamp)
    }
}

/// The durable document: `{"tracking_numbers": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub tracking_numbers: Vec<TrackingNumber>,
}

impl PersistedState {
    pub fn new(tracking_numbers: Vec<TrackingNumber>) -> Self {
        Self { tracking_numbers }
    }
}
