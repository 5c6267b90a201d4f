#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    generator::{ConfigError, Error, IdGenerator, Mutex, Poll, Result},
    id::TrackingId,
    time::TimeSource,
};
use core::cmp::Ordering;

/// A lock-based tracking ID generator suitable for multi-threaded
/// environments.
///
/// The generator owns its state (last issued timestamp and sequence, packed as
/// the last issued [`TrackingId`]) behind a single mutex. Share it between
/// callers with an [`Arc`]; create one instance per worker ID.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Never holds the lock while waiting for the next millisecond
/// - ✅ Reports clock regressions instead of issuing out-of-order IDs
///
/// [`Arc`]: std::sync::Arc
pub struct LockTrackingIdGenerator<T>
where
    T: TimeSource,
{
    pub(crate) state: Mutex<Option<TrackingId>>,
    pub(crate) worker_id: u64,
    pub(crate) time: T,
}

impl<T> LockTrackingIdGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new generator for `worker_id` that has not issued any ID.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WorkerIdOutOfRange`] if `worker_id` does not fit
    /// the 10-bit worker field.
    ///
    /// # Example
    /// ```
    /// use tracking_id::{IdGenerator, LockTrackingIdGenerator, SystemClock};
    ///
    /// let generator = LockTrackingIdGenerator::new(5, SystemClock::default()).unwrap();
    /// let id = generator.next_id().unwrap();
    /// assert_eq!(id.worker_id(), 5);
    /// ```
    pub fn new(worker_id: u64, time: T) -> Result<Self, ConfigError> {
        Self::check_worker_id(worker_id)?;
        Ok(Self {
            state: Mutex::new(None),
            worker_id,
            time,
        })
    }

    /// Creates a generator that resumes from explicit component values, as if
    /// it had just issued `(timestamp, worker_id, sequence)`.
    ///
    /// Useful for restoring state or controlling the starting point in tests.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WorkerIdOutOfRange`] if `worker_id` does not fit
    /// the 10-bit worker field.
    pub fn from_components(
        timestamp: u64,
        worker_id: u64,
        sequence: u64,
        time: T,
    ) -> Result<Self, ConfigError> {
        Self::check_worker_id(worker_id)?;
        let id = TrackingId::from_components(timestamp, worker_id, sequence);
        Ok(Self {
            state: Mutex::new(Some(id)),
            worker_id,
            time,
        })
    }

    fn check_worker_id(worker_id: u64) -> Result<(), ConfigError> {
        if worker_id > TrackingId::max_worker_id() {
            return Err(ConfigError::WorkerIdOutOfRange {
                worker_id,
                max: TrackingId::max_worker_id(),
            });
        }
        Ok(())
    }

    /// Attempts to generate the next available ID.
    ///
    /// Returns a new, time-ordered, unique ID if generation succeeds. If the
    /// sequence is exhausted and the clock has not advanced, returns
    /// [`Poll::Pending`] without changing state.
    ///
    /// # Errors
    /// - [`Error::ClockRegression`] if the clock reads earlier than the last
    ///   issued timestamp
    /// - [`Error::TimestampOverflow`] if the clock is past the 41-bit range
    /// - [`Error::LockPoisoned`] if the lock was poisoned
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<Poll<TrackingId>> {
        let mut last = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        // Read under the lock: a reading taken before acquiring it could be
        // older than a timestamp another caller stored meanwhile.
        let now = self.time.current_millis();
        if now > TrackingId::max_timestamp() {
            return Err(Error::TimestampOverflow { millis: now });
        }

        let Some(prev) = *last else {
            let id = TrackingId::from_components(now, self.worker_id, 0);
            *last = Some(id);
            return Ok(Poll::Ready { id });
        };

        let current_ts = prev.timestamp();
        match now.cmp(&current_ts) {
            Ordering::Equal => {
                if prev.has_sequence_room() {
                    let id = prev.increment_sequence();
                    *last = Some(id);
                    Ok(Poll::Ready { id })
                } else {
                    Ok(Poll::Pending { yield_for: 1 })
                }
            }
            Ordering::Greater => {
                let id = prev.rollover_to_timestamp(now);
                *last = Some(id);
                Ok(Poll::Ready { id })
            }
            Ordering::Less => Err(Self::cold_clock_behind(now, current_ts)),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, current_ts: u64) -> Error {
        let delta_ms = current_ts - now;
        #[cfg(feature = "tracing")]
        tracing::error!(delta_ms, "clock moved backwards");
        Error::ClockRegression { delta_ms }
    }
}

impl<T> IdGenerator for LockTrackingIdGenerator<T>
where
    T: TimeSource,
{
    fn worker_id(&self) -> u64 {
        self.worker_id
    }

    fn try_poll_id(&self) -> Result<Poll<TrackingId>> {
        self.try_poll_id()
    }
}
