use core::future::Future;

use super::StoreError;
use crate::record::{NewTrackingRecord, TrackingRecord};

/// Durable storage for tracking records.
///
/// Implementations must enforce uniqueness of `tracking_number`: inserting a
/// number that already exists resolves to
/// [`StoreError::UniquenessViolation`] and leaves the existing record
/// untouched. Records are never updated once inserted.
pub trait Store: Send + Sync {
    /// Persists `record`, assigning its row ID and generation time.
    ///
    /// # Errors
    ///
    /// - [`StoreError::UniquenessViolation`] if the tracking number is taken
    /// - [`StoreError::Unavailable`] or [`StoreError::Rejected`] for any other
    ///   failure
    fn insert(
        &self,
        record: NewTrackingRecord,
    ) -> impl Future<Output = Result<TrackingRecord, StoreError>> + Send;

    /// Whether a record with the given tracking number exists.
    fn exists_by_code(&self, code: &str) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Looks up a record by its tracking number.
    fn find_by_code(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Option<TrackingRecord>, StoreError>> + Send;
}
