//! Public landing endpoints.

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Shop name announced by the welcome endpoint.
pub const SHOP_NAME: &str = "Udacity Coffee Shop";

#[derive(Debug, Serialize)]
struct WelcomeResponse {
    success: bool,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct LoginResultsResponse {
    message: String,
}

/// GET /: welcome message.
async fn index() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        success: true,
        message: SHOP_NAME,
    })
}

/// GET /login-results: landing page after the identity provider redirects back.
async fn login_results() -> Json<LoginResultsResponse> {
    Json(LoginResultsResponse {
        message: format!("You are login to {SHOP_NAME}"),
    })
}

/// Create the front router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/login-results", get(login_results))
}
