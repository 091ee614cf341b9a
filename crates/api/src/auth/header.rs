//! `Authorization` header parsing.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

use super::AuthError;

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively and the value must be exactly
/// two whitespace-separated words.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(AuthError::header_missing());
    };
    let value = value.to_str().map_err(|_| AuthError::not_bearer())?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [] => Err(AuthError::header_missing()),
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::not_bearer()),
        [_] => Err(AuthError::token_not_found()),
        [_, token] => Ok(*token),
        _ => Err(AuthError::not_a_bearer_pair()),
    }
}
