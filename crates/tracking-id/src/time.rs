use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default epoch: Wednesday, January 1, 2020 00:00:00 UTC
pub const EPOCH: Duration = Duration::from_millis(1_577_836_800_000);

/// A trait for time sources that return milliseconds elapsed since a
/// configured epoch.
///
/// This abstraction allows you to plug in the system wall clock or a mocked
/// time source in tests.
///
/// # Example
///
/// ```
/// use tracking_id::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

/// Wall-clock time source anchored at a custom epoch.
///
/// Reads `SystemTime::now()` on every call, so an external clock adjustment
/// (NTP step, manual change) is visible to the generator, which refuses to
/// issue IDs while the clock is behind its last timestamp.
///
/// Instants before the epoch read as `0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    epoch: Duration,
}

impl Default for SystemClock {
    /// Constructs a clock aligned to the default [`EPOCH`].
    fn default() -> Self {
        Self::with_epoch(EPOCH)
    }
}

impl SystemClock {
    /// Constructs a clock using `epoch` (a [`Duration`] since 1970-01-01 UTC)
    /// as the origin (t = 0).
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self { epoch }
    }

    pub const fn epoch(&self) -> Duration {
        self.epoch
    }
}

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|now| now.checked_sub(self.epoch))
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}
