//! Bearer token authentication and permission checks.

pub mod claims;
mod error;
pub mod guard;
mod header;
pub mod keys;
pub mod verifier;

pub use claims::Claims;
pub use error::AuthError;
pub use guard::{PermissionGuard, check_permissions, requires_auth};
pub use header::bearer_token;
pub use keys::{HttpKeySource, KeySource, StaticKeySource};
pub use verifier::{TokenVerifier, VerifyError};

/// Permission required to read full recipes.
pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
/// Permission required to create drinks.
pub const POST_DRINKS: &str = "post:drinks";
/// Permission required to modify drinks.
pub const PATCH_DRINKS: &str = "patch:drinks";
/// Permission required to remove drinks.
pub const DELETE_DRINKS: &str = "delete:drinks";
