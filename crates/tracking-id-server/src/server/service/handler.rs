//! HTTP entry points for issuing and looking up tracking numbers.
//!
//! - `GET /api/v1/next-tracking-number` validates the order details, then runs
//!   the generation workflow under the configured request deadline.
//! - `GET /api/v1/tracking-numbers/{tracking_number}` decodes a tracking
//!   number and returns the stored record.
//! - `GET /health` reports liveness.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use core::time::Duration;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use tracking_id::{
    GenerationWorkflow, LockTrackingIdGenerator, MemoryStore, Store, SystemClock, TrackingId,
    TrackingRequest, TrackingRequestParams, WorkflowError,
};

use super::{
    error::ApiError,
    response::{NextTrackingNumberResponse, TrackingNumberLookupResponse},
};
use crate::server::config::ServerConfig;

pub type Generator = LockTrackingIdGenerator<SystemClock>;

/// State shared by every request.
///
/// Holds the single generator instance for this process; it is never
/// recreated per request.
#[derive(Clone)]
pub struct AppState {
    workflow: GenerationWorkflow<Generator, MemoryStore>,
    epoch: Duration,
    request_timeout: Duration,
    shutdown: CancellationToken,
}

impl AppState {
    /// Builds the generator and store described by `config`.
    ///
    /// # Errors
    ///
    /// Fails if the configured worker ID is out of range.
    pub fn new(config: &ServerConfig, shutdown: CancellationToken) -> anyhow::Result<Self> {
        let clock = SystemClock::with_epoch(config.epoch);
        let generator = Arc::new(Generator::new(config.worker_id, clock)?);
        let store = Arc::new(MemoryStore::new());
        let workflow =
            GenerationWorkflow::new(generator, store).with_max_attempts(config.max_attempts);

        Ok(Self {
            workflow,
            epoch: config.epoch,
            request_timeout: config.request_timeout,
            shutdown,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/next-tracking-number", get(next_tracking_number))
        .route(
            "/api/v1/tracking-numbers/{tracking_number}",
            get(lookup_tracking_number),
        )
        .route("/health", get(health))
        .with_state(state)
}

#[instrument(skip_all)]
async fn next_tracking_number(
    State(state): State<AppState>,
    Query(params): Query<TrackingRequestParams>,
) -> Result<Json<NextTrackingNumberResponse>, ApiError> {
    if state.shutdown.is_cancelled() {
        return Err(ApiError::ShuttingDown);
    }

    let request = TrackingRequest::try_from(params)?;

    let cancel = state.shutdown.child_token();
    let run = state.workflow.generate_and_persist_until(&request, &cancel);
    let record = match tokio::time::timeout(state.request_timeout, run).await {
        Ok(Ok(record)) => record,
        Ok(Err(WorkflowError::Cancelled)) if state.shutdown.is_cancelled() => {
            return Err(ApiError::ShuttingDown);
        }
        Ok(Err(err)) => return Err(err.into()),
        Err(_elapsed) => {
            cancel.cancel();
            return Err(ApiError::DeadlineExceeded);
        }
    };

    tracing::info!(tracking_number = %record.tracking_number, "tracking number issued");
    Ok(Json(NextTrackingNumberResponse::from(record)))
}

#[instrument(skip(state))]
async fn lookup_tracking_number(
    State(state): State<AppState>,
    Path(tracking_number): Path<String>,
) -> Result<Json<TrackingNumberLookupResponse>, ApiError> {
    let id = TrackingId::decode(&tracking_number)?;
    let code = id.encode();

    let found = state.workflow.store().find_by_code(&code).await?;
    let record = found.ok_or(ApiError::NotFound {
        tracking_number: code,
    })?;

    Ok(Json(TrackingNumberLookupResponse::new(id, state.epoch, record)))
}

async fn health() -> &'static str {
    "ok"
}
