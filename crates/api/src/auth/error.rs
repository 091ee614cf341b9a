//! Authentication errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// A rejected credential.
///
/// Rendered verbatim as `{"code", "description"}` with its own status rather
/// than the generic error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {description}")]
pub struct AuthError {
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human-readable explanation.
    pub description: &'static str,
    pub status: StatusCode,
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: &'static str,
    description: &'static str,
}

impl AuthError {
    const fn new(code: &'static str, description: &'static str, status: StatusCode) -> Self {
        Self {
            code,
            description,
            status,
        }
    }

    pub const fn header_missing() -> Self {
        Self::new(
            "authorization_header_missing",
            "Authorization header is expected.",
            StatusCode::UNAUTHORIZED,
        )
    }

    pub const fn not_bearer() -> Self {
        Self::new(
            "invalid_header",
            "Authorization header must start with \"Bearer\".",
            StatusCode::UNAUTHORIZED,
        )
    }

    pub const fn token_not_found() -> Self {
        Self::new("invalid_header", "Token not found.", StatusCode::UNAUTHORIZED)
    }

    pub const fn not_a_bearer_pair() -> Self {
        Self::new(
            "invalid_header",
            "Authorization header must be bearer token.",
            StatusCode::UNAUTHORIZED,
        )
    }

    pub const fn malformed() -> Self {
        Self::new(
            "invalid_header",
            "Authorization malformed.",
            StatusCode::UNAUTHORIZED,
        )
    }

    pub const fn expired() -> Self {
        Self::new("token_expired", "Token expired.", StatusCode::UNAUTHORIZED)
    }

    pub const fn incorrect_claims() -> Self {
        Self::new(
            "invalid_claims",
            "Incorrect claims. Please, check the audience and issuer.",
            StatusCode::UNAUTHORIZED,
        )
    }

    pub const fn unparsable() -> Self {
        Self::new(
            "invalid_header",
            "Unable to parse authentication token.",
            StatusCode::BAD_REQUEST,
        )
    }

    pub const fn key_not_found() -> Self {
        Self::new(
            "invalid_header",
            "Unable to find the appropriate key.",
            StatusCode::BAD_REQUEST,
        )
    }

    pub const fn permissions_missing() -> Self {
        Self::new(
            "invalid_claims",
            "Permissions not included in JWT.",
            StatusCode::BAD_REQUEST,
        )
    }

    pub const fn permission_not_found() -> Self {
        Self::new(
            "unauthorized",
            "Permission not found.",
            StatusCode::FORBIDDEN,
        )
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = AuthErrorBody {
            code: self.code,
            description: self.description,
        };
        (self.status, Json(body)).into_response()
    }
}
