//! Errors surfaced at the HTTP boundary.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use foldersize_core::{AggregateError, PathError};

/// Failure of a single request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// URL does not carry the size selector.
    #[error("No such endpoint: {path}")]
    UnknownRoute { path: String },

    /// Folder path in the URL is not a valid repository path.
    #[error("Invalid folder path: {0}")]
    InvalidPath(#[source] PathError),

    /// The aggregation run failed.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    /// The blocking task running the aggregation died.
    #[error("Aggregation task failed: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnknownRoute { .. } => StatusCode::NOT_FOUND,
            Self::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Self::Aggregate(err) if err.is_target_error() => StatusCode::NOT_FOUND,
            Self::Aggregate(err) if err.repository_error().is_some_and(|e| e.is_unavailable()) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Aggregate(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(target: "foldersize::server", "error computing folder size: {}", self);
        } else {
            warn!(target: "foldersize::server", "rejected request: {}", self);
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
