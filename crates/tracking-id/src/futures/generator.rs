use core::{future::Future, time::Duration};

use super::SleepProvider;
use crate::{
    generator::{IdGenerator, Poll, Result},
    id::TrackingId,
};

/// Extension trait for asynchronously generating tracking IDs.
///
/// Instead of blocking a runtime thread while the sequence is exhausted, the
/// returned future releases the generator lock and waits using the given
/// [`SleepProvider`] before polling again.
pub trait IdGeneratorAsyncExt {
    /// Returns a future that resolves to the next available ID.
    ///
    /// # Errors
    ///
    /// Resolves to an error as soon as the generator reports one; a clock
    /// regression is not retried.
    fn try_next_id_async<S>(&self) -> impl Future<Output = Result<TrackingId>> + Send
    where
        S: SleepProvider;
}

impl<G> IdGeneratorAsyncExt for G
where
    G: IdGenerator + Sync,
{
    fn try_next_id_async<S>(&self) -> impl Future<Output = Result<TrackingId>> + Send
    where
        S: SleepProvider,
    {
        async move {
            loop {
                let dur = match self.try_poll_id()? {
                    Poll::Ready { id } => return Ok(id),
                    Poll::Pending { yield_for } => Duration::from_millis(yield_for),
                };
                S::sleep_for(dur).await;
            }
        }
    }
}
