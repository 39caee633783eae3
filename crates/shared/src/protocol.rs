//! Wire shapes of the ShipX tracking API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Status;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusItem {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl From<StatusItem> for Status {
    fn from(value: StatusItem) -> Self {
        Self {
            code: value.name,
            title: value.title,
            description: value.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusesResponse {
    pub items: Vec<StatusItem>,
}

/// One history entry as sent by the service. The timestamp stays a string
/// here so the client can reject the whole record on a bad value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingDetail {
    pub datetime: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingResponse {
    pub tracking_number: String,
    #[serde(default)]
    pub tracking_details: Vec<TrackingDetail>,
}

/// Parses the wire date-time format (RFC 3339 with offset) into UTC.
pub fn parse_wire_datetime(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|value| value.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn decodes_tracking_payload_and_ignores_unknown_fields() {
        let raw = r#"{
            "tracking_number": "600012345678",
            "service": "inpost_locker_standard",
            "tracking_details": [
                {"status": "confirmed", "origin_status": "PPN", "datetime": "2021-03-01T10:15:00.000+01:00"}
            ]
        }"#;
        let response: TrackingResponse = serde_json::from_str(raw).expect("decode");
        assert_eq!(response.tracking_number, "600012345678");
        assert_eq!(response.tracking_details.len(), 1);
        assert_eq!(response.tracking_details[0].status, "confirmed");
    }

    #[test]
    fn wire_datetime_is_normalized_to_utc() {
        let parsed = parse_wire_datetime("2021-03-01T10:15:00.000+01:00").expect("parse");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2021, 3, 1, 9, 15, 0).unwrap());
        assert!(parse_wire_datetime("01.03.2021 10:15").is_err());
    }

    #[test]
    fn status_item_name_becomes_code() {
        let status = Status::from(StatusItem {
            name: "delivered".into(),
            title: "Dostarczona".into(),
            description: String::new(),
        });
        assert_eq!(status.code, "delivered");
        assert_eq!(status.title, "Dostarczona");
    }
}
