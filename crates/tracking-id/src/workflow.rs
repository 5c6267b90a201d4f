//! Generate a tracking number, persist it, and retry on collision.

use core::num::NonZeroU32;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    base36::TrackingNumber,
    futures::{IdGeneratorAsyncExt, TokioSleep},
    generator::{Error, IdGenerator},
    record::{NewTrackingRecord, TrackingRecord, TrackingRequest},
    store::{Store, StoreError},
};

/// Attempts made by a [`GenerationWorkflow`] unless configured otherwise.
pub const DEFAULT_MAX_ATTEMPTS: NonZeroU32 = NonZeroU32::new(5).unwrap();

/// Why a [`GenerationWorkflow`] run produced no record.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum WorkflowError {
    /// The generator's clock moved backwards. Not retried.
    #[error("clock moved backwards by {delta_ms} ms")]
    ClockRegression { delta_ms: u64 },

    /// Any other generator failure.
    #[error(transparent)]
    Generator(Error),

    /// Every attempt collided with an existing tracking number (or produced
    /// an unusable one).
    #[error("failed to generate a unique tracking number after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    /// The store failed for a reason other than uniqueness.
    #[error(transparent)]
    Store(StoreError),

    /// The run was cancelled or its deadline passed.
    #[error("tracking number generation cancelled")]
    Cancelled,
}

impl From<Error> for WorkflowError {
    fn from(err: Error) -> Self {
        match err {
            Error::ClockRegression { delta_ms } => Self::ClockRegression { delta_ms },
            other => Self::Generator(other),
        }
    }
}

/// Produces persisted, unique tracking records.
///
/// Each attempt draws a fresh ID from the generator, encodes it, and inserts
/// it into the store. A uniqueness violation moves on to the next attempt;
/// every other failure ends the run. The generator lock is never held while
/// the store is awaited.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use tracking_id::{
///     GenerationWorkflow, LockTrackingIdGenerator, MemoryStore, SystemClock, TrackingRequest,
///     TrackingRequestParams,
/// };
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let generator = Arc::new(LockTrackingIdGenerator::new(1, SystemClock::default()).unwrap());
/// let workflow = GenerationWorkflow::new(generator, Arc::new(MemoryStore::new()));
///
/// let request = TrackingRequest::try_from(TrackingRequestParams {
///     origin_country_id: "MY".into(),
///     destination_country_id: "ID".into(),
///     weight: "1.234".into(),
///     created_at: "2018-11-20T19:29:32+08:00".into(),
///     customer_id: "de619854-b59b-425e-9db4-943979e1bd49".into(),
///     customer_name: "RedBox Logistics".into(),
///     customer_slug: "redbox-logistics".into(),
/// })
/// .unwrap();
///
/// let record = workflow.generate_and_persist(&request).await.unwrap();
/// assert_eq!(record.details, request);
/// # }
/// ```
pub struct GenerationWorkflow<G, S> {
    generator: Arc<G>,
    store: Arc<S>,
    max_attempts: NonZeroU32,
}

impl<G, S> Clone for GenerationWorkflow<G, S> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
            store: Arc::clone(&self.store),
            max_attempts: self.max_attempts,
        }
    }
}

impl<G, S> GenerationWorkflow<G, S>
where
    G: IdGenerator + Send + Sync,
    S: Store,
{
    pub fn new(generator: Arc<G>, store: Arc<S>) -> Self {
        Self {
            generator,
            store,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: NonZeroU32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn max_attempts(&self) -> NonZeroU32 {
        self.max_attempts
    }

    pub fn generator(&self) -> &Arc<G> {
        &self.generator
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Generates and persists a tracking record for `request`.
    ///
    /// # Errors
    ///
    /// See [`WorkflowError`]; this variant never returns
    /// [`WorkflowError::Cancelled`] on its own, but may be wrapped in a
    /// timeout by the caller.
    pub async fn generate_and_persist(
        &self,
        request: &TrackingRequest,
    ) -> Result<TrackingRecord, WorkflowError> {
        self.generate_and_persist_until(request, &CancellationToken::new())
            .await
    }

    /// Like [`generate_and_persist`](Self::generate_and_persist), but stops
    /// with [`WorkflowError::Cancelled`] as soon as `cancel` fires, whether
    /// the run is waiting on the generator or the store.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::ClockRegression`] on the first clock regression
    /// - [`WorkflowError::Generator`] for any other generator failure
    /// - [`WorkflowError::Store`] for a non-uniqueness store failure
    /// - [`WorkflowError::GenerationExhausted`] when every attempt collided
    /// - [`WorkflowError::Cancelled`] when `cancel` fires
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub async fn generate_and_persist_until(
        &self,
        request: &TrackingRequest,
        cancel: &CancellationToken,
    ) -> Result<TrackingRecord, WorkflowError> {
        let attempts = self.max_attempts.get();
        for attempt in 1..=attempts {
            if cancel.is_cancelled() {
                return Err(WorkflowError::Cancelled);
            }

            let id = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(WorkflowError::Cancelled),
                id = self.generator.try_next_id_async::<TokioSleep>() => id?,
            };

            let code = id.encode();
            let Ok(tracking_number) = TrackingNumber::parse(code) else {
                #[cfg(feature = "tracing")]
                tracing::warn!(attempt, id = id.to_raw(), "encoded id is not a valid tracking number");
                continue;
            };

            let record = NewTrackingRecord {
                tracking_number,
                details: request.clone(),
            };

            let inserted = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(WorkflowError::Cancelled),
                inserted = self.store.insert(record) => inserted,
            };

            match inserted {
                Ok(record) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(attempt, tracking_number = %record.tracking_number, "tracking number persisted");
                    return Ok(record);
                }
                Err(StoreError::UniquenessViolation { tracking_number }) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(attempt, attempts, %tracking_number, "tracking number collision, retrying");
                }
                Err(err) => return Err(WorkflowError::Store(err)),
            }
        }

        Err(WorkflowError::GenerationExhausted { attempts })
    }
}
