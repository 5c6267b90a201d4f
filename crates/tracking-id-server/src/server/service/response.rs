use chrono::{DateTime, Utc};
use core::time::Duration;
use serde::Serialize;
use tracking_id::{TrackingId, TrackingNumber, TrackingRecord};

/// Body of a successful `next-tracking-number` call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextTrackingNumberResponse {
    pub tracking_number: TrackingNumber,
    /// When the record was persisted.
    pub created_at: DateTime<Utc>,
}

impl From<TrackingRecord> for NextTrackingNumberResponse {
    fn from(record: TrackingRecord) -> Self {
        Self {
            tracking_number: record.tracking_number,
            created_at: record.generated_at,
        }
    }
}

/// A stored record together with the fields decoded from its tracking
/// number.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingNumberLookupResponse {
    pub tracking_number: TrackingNumber,
    pub id: u64,
    pub timestamp: u64,
    pub worker_id: u64,
    pub sequence: u64,
    /// Wall-clock time embedded in the ID.
    pub issued_at: Option<DateTime<Utc>>,
    pub record: TrackingRecord,
}

impl TrackingNumberLookupResponse {
    pub fn new(id: TrackingId, epoch: Duration, record: TrackingRecord) -> Self {
        Self {
            tracking_number: record.tracking_number.clone(),
            id: id.to_raw(),
            timestamp: id.timestamp(),
            worker_id: id.worker_id(),
            sequence: id.sequence(),
            issued_at: id.generated_at(epoch),
            record,
        }
    }
}
