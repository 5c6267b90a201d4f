use std::collections::HashMap;

use chrono::Utc;
#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{Store, StoreError};
use crate::{
    generator::{Mutex, MutexGuard},
    record::{NewTrackingRecord, TrackingRecord},
};

#[derive(Default)]
struct MemoryState {
    last_id: u64,
    records: HashMap<String, TrackingRecord>,
}

/// A [`Store`] that keeps records in process memory.
///
/// Uniqueness is checked and the record inserted under one lock, so
/// concurrent inserts of the same tracking number resolve to exactly one
/// success. Records are lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.records.len())
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.records.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            self.state.lock().map_err(|_| StoreError::Unavailable {
                reason: "memory store lock poisoned".to_owned(),
            })
        }
    }
}

impl Store for MemoryStore {
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(tracking_number = %record.tracking_number)))]
    async fn insert(&self, record: NewTrackingRecord) -> Result<TrackingRecord, StoreError> {
        let mut state = self.lock()?;
        let code = record.tracking_number.as_str();
        if state.records.contains_key(code) {
            return Err(StoreError::UniquenessViolation {
                tracking_number: code.to_owned(),
            });
        }

        state.last_id += 1;
        let record = record.into_record(state.last_id, Utc::now());
        state
            .records
            .insert(record.tracking_number.as_str().to_owned(), record.clone());
        Ok(record)
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.records.contains_key(code))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<TrackingRecord>, StoreError> {
        Ok(self.lock()?.records.get(code).cloned())
    }
}
