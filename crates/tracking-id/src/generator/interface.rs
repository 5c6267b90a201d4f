use crate::{
    generator::{Poll, Result},
    id::TrackingId,
};
use core::time::Duration;

/// Pause between polls in [`IdGenerator::next_id`] while the sequence is
/// exhausted for the current millisecond.
pub const EXHAUSTED_BACKOFF: Duration = Duration::from_micros(100);

/// A minimal interface for generating [`TrackingId`]s.
pub trait IdGenerator {
    /// The worker ID embedded in every generated ID.
    fn worker_id(&self) -> u64;

    /// Attempts to generate the next ID without blocking.
    ///
    /// The returned [`Poll`] contains either:
    /// - the newly generated ID, or
    /// - a duration to yield/sleep if the sequence is exhausted.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock is behind the last issued
    ///   timestamp
    /// - [`Error::TimestampOverflow`] if the clock is past the 41-bit range
    /// - [`Error::LockPoisoned`] if the underlying lock is poisoned
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    /// [`Error::TimestampOverflow`]: crate::Error::TimestampOverflow
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    fn try_poll_id(&self) -> Result<Poll<TrackingId>>;

    /// Generates the next ID, calling `backoff` with the suggested wait (in
    /// milliseconds) each time the sequence is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`IdGenerator::try_poll_id`].
    fn try_next_id(&self, mut backoff: impl FnMut(u64)) -> Result<TrackingId> {
        loop {
            match self.try_poll_id()? {
                Poll::Ready { id } => return Ok(id),
                Poll::Pending { yield_for } => backoff(yield_for),
            }
        }
    }

    /// Generates the next ID, blocking the current thread while the sequence
    /// is exhausted.
    ///
    /// Waits in [`EXHAUSTED_BACKOFF`] steps instead of spinning; the generator
    /// lock is not held while waiting.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`IdGenerator::try_poll_id`].
    fn next_id(&self) -> Result<TrackingId> {
        self.try_next_id(|_| std::thread::sleep(EXHAUSTED_BACKOFF))
    }
}
