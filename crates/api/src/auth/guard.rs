//! Permission guard for protected routes.
//!
//! [`requires_auth`] wraps a route so it only runs for callers whose token
//! carries a given permission. The verified [`Claims`] are stored in request
//! extensions, from where a handler receives them as its first argument.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::MethodRouter;
use tracing::debug;

use super::{AuthError, Claims, TokenVerifier, bearer_token};
use crate::error::ApiError;
use crate::state::AppState;

/// Guard state: the permission a route demands.
#[derive(Debug, Clone)]
pub struct PermissionGuard {
    verifier: Arc<TokenVerifier>,
    permission: &'static str,
}

impl PermissionGuard {
    pub fn new(verifier: Arc<TokenVerifier>, permission: &'static str) -> Self {
        Self {
            verifier,
            permission,
        }
    }

    pub fn permission(&self) -> &'static str {
        self.permission
    }
}

/// Wrap `route` so it only runs when the caller holds `permission`.
pub fn requires_auth(
    state: &AppState,
    permission: &'static str,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    let guard = PermissionGuard::new(state.verifier().clone(), permission);
    route.route_layer(middleware::from_fn_with_state(guard, enforce))
}

/// Check that `claims` grant `permission`.
pub fn check_permissions(permission: &str, claims: &Claims) -> Result<(), AuthError> {
    let Some(granted) = claims.permissions.as_deref() else {
        return Err(AuthError::permissions_missing());
    };

    if !granted.iter().any(|p| p == permission) {
        return Err(AuthError::permission_not_found());
    }

    Ok(())
}

/// Middleware verifying the bearer token and the guard's permission.
pub async fn enforce(
    State(guard): State<PermissionGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?.to_owned();
    let claims = guard.verifier.verify(&token).await?;

    if let Err(e) = check_permissions(guard.permission, &claims) {
        debug!(sub = %claims.sub, permission = guard.permission(), "permission denied");
        return Err(e.into());
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Claims>().cloned().ok_or_else(|| {
            ApiError::Internal(anyhow::anyhow!(
                "claims extracted on a route without requires_auth"
            ))
        })
    }
}
