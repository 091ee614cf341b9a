//! Application error types.
//!
//! Every failure leaves a handler as an [`ApiError`], which renders the flat
//! `{success, error, message}` envelope. Authentication failures are the one
//! exception: they carry their own `{code, description}` payload.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::store::StoreError;

/// Application errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("resource not found")]
    NotFound,

    #[error("unauthorised")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("unprocessable")]
    Unprocessable,

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("storage error")]
    Storage(#[source] StoreError),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Body of every non-auth error response.
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: u16,
    message: &'static str,
}

impl ApiError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(e) => e.status,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidBody(_) | ApiError::Storage(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Client-facing message for an envelope status.
fn envelope_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "resource not found",
        StatusCode::UNAUTHORIZED => "unauthorised",
        StatusCode::FORBIDDEN => "forbidden",
        StatusCode::UNPROCESSABLE_ENTITY => "unprocessable",
        _ => "Internal Server Error",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details are logged, never sent to the client
        match &self {
            ApiError::Auth(e) => return e.clone().into_response(),
            ApiError::InvalidBody(reason) => {
                tracing::warn!(%reason, "rejected request body");
            }
            ApiError::Storage(e) => {
                tracing::error!(error = %e, "storage error");
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
            }
            _ => {}
        }

        let body = ErrorEnvelope {
            success: false,
            error: status.as_u16(),
            message: envelope_message(status),
        };

        (status, Json(body)).into_response()
    }
}

/// Store outcomes map onto the coarse 404-vs-500 split.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            other => ApiError::Storage(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

/// A path segment that fails to parse addresses no resource.
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::NotFound
    }
}

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;
