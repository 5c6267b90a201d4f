use core::{future::Future, time::Duration};

use crate::{
    futures::{IdGeneratorAsyncExt, SleepProvider},
    generator::{IdGenerator, Result},
    id::TrackingId,
};

/// An implementation of [`SleepProvider`] using Tokio's timer.
///
/// This is the default provider for use in async applications built on Tokio.
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(dur)
    }
}

/// An implementation of [`SleepProvider`] using Tokio's yield.
///
/// This strategy avoids timer-based delays by yielding to the scheduler
/// immediately, which can improve responsiveness in low-concurrency scenarios
/// at the cost of tighter polling loops under load.
pub struct TokioYield;
impl SleepProvider for TokioYield {
    fn sleep_for(_dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::task::yield_now()
    }
}

/// Extension trait for asynchronously generating tracking IDs on the
/// [`tokio`](https://docs.rs/tokio) runtime, using [`TokioSleep`].
pub trait IdGeneratorAsyncTokioExt {
    /// Returns a future that resolves to the next available ID, sleeping on
    /// Tokio's timer while the sequence is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying generator fails.
    fn next_id_async(&self) -> impl Future<Output = Result<TrackingId>> + Send;
}

impl<G> IdGeneratorAsyncTokioExt for G
where
    G: IdGenerator + Sync,
{
    fn next_id_async(&self) -> impl Future<Output = Result<TrackingId>> + Send {
        <Self as IdGeneratorAsyncExt>::try_next_id_async::<TokioSleep>(self)
    }
}
