/// Errors reported by a [`Store`](crate::Store).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// A record with the same tracking number already exists. The caller may
    /// retry with a fresh number.
    #[error("tracking number {tracking_number} already exists")]
    UniquenessViolation { tracking_number: String },

    /// The store could not be reached or failed internally.
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    /// The store refused the record for a reason other than uniqueness.
    #[error("record rejected: {reason}")]
    Rejected { reason: String },
}

impl StoreError {
    /// Whether the failed insert may succeed with a different tracking
    /// number.
    pub const fn is_uniqueness_violation(&self) -> bool {
        matches!(self, Self::UniquenessViolation { .. })
    }
}
