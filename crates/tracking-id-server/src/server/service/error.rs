use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracking_id::{Base36Error, StoreError, ValidationError, WorkflowError};

/// Errors returned by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid tracking number: {0}")]
    InvalidTrackingNumber(#[from] Base36Error),

    #[error("tracking number {tracking_number} not found")]
    NotFound { tracking_number: String },

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("request deadline exceeded")]
    DeadlineExceeded,

    #[error("server is shutting down")]
    ShuttingDown,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidTrackingNumber(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Workflow(WorkflowError::Cancelled) | Self::DeadlineExceeded => {
                StatusCode::GATEWAY_TIMEOUT
            }
            Self::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
            Self::Workflow(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid_request",
            Self::InvalidTrackingNumber(_) => "invalid_tracking_number",
            Self::NotFound { .. } => "not_found",
            Self::Workflow(WorkflowError::ClockRegression { .. }) => "clock_regression",
            Self::Workflow(WorkflowError::GenerationExhausted { .. }) => "generation_exhausted",
            Self::Workflow(WorkflowError::Cancelled) | Self::DeadlineExceeded => {
                "deadline_exceeded"
            }
            Self::Workflow(WorkflowError::Store(_)) | Self::Store(_) => "store_error",
            Self::Workflow(_) => "generator_error",
            Self::ShuttingDown => "shutting_down",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
