/// A result type defaulting to the generator [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised while generating an ID.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The clock reads earlier than the last timestamp the generator issued.
    ///
    /// Fatal for the caller: the generator does not wait for the clock to
    /// catch up.
    #[error("clock moved backwards, refusing to generate id for {delta_ms} milliseconds")]
    ClockRegression { delta_ms: u64 },

    /// The clock reads past the largest timestamp the 41-bit field can hold.
    #[error("timestamp {millis} ms exceeds the 41-bit timestamp field")]
    TimestampOverflow { millis: u64 },

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. With the
    /// `parking-lot` feature mutexes do not poison and this is never
    /// produced.
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

/// Invalid generator configuration, reported at construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("worker id must be between 0 and {max}, got {worker_id}")]
    WorkerIdOutOfRange { worker_id: u64, max: u64 },
}
