use core::{future::Future, time::Duration};

/// A trait that abstracts over how to sleep for a given [`Duration`] in async
/// contexts.
///
/// This keeps the async generator extension independent of the strategy used
/// to wait out an exhausted sequence (timer sleep or scheduler yield).
pub trait SleepProvider {
    /// The returned future is `Send` so that callers can be moved across
    /// threads by a work-stealing runtime.
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}
