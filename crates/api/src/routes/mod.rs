//! HTTP route handlers.

pub mod drinks;
pub mod front;
pub mod health;

use axum::Router;
use axum::http::Uri;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Assemble every route of the service.
///
/// Drink routes need the state up front so their permission guards can
/// share its token verifier.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(front::router())
        .merge(health::router())
        .merge(drinks::router(state))
        .fallback(not_found)
}

/// Unknown paths answer with the standard error envelope.
async fn not_found(uri: Uri) -> ApiError {
    debug!(path = %uri.path(), "no route");
    ApiError::NotFound
}
