//! Decoded bearer token claims.

use serde::{Deserialize, Serialize};

/// Claims of a verified access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer. Absence is rejected by validation, not by decoding.
    #[serde(default)]
    pub iss: Option<String>,
    /// Subject (identity-provider user id).
    #[serde(default)]
    pub sub: String,
    /// Audience. Absence is rejected by validation, not by decoding.
    #[serde(default)]
    pub aud: Option<Audience>,
    /// Issued at (Unix timestamp).
    #[serde(default)]
    pub iat: Option<i64>,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Granted permissions. `None` when the provider does not issue
    /// permission-based tokens at all.
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

/// The `aud` claim, which may be one audience or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Claims {
    /// Whether `permission` is in the granted set.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_deref()
            .is_some_and(|granted| granted.iter().any(|p| p == permission))
    }
}
