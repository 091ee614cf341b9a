//! Bearer token verification against the identity provider's key set.

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;
use tracing::debug;

use super::{AuthError, Claims, KeySource};
use crate::config::AuthConfig;
use crate::error::ApiError;

/// Why a token could not be verified.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The token itself was rejected.
    #[error(transparent)]
    Rejected(#[from] AuthError),

    /// The key set could not be obtained.
    #[error("signing keys unavailable: {0:#}")]
    KeysUnavailable(anyhow::Error),
}

impl From<VerifyError> for ApiError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Rejected(e) => ApiError::Auth(e),
            VerifyError::KeysUnavailable(e) => ApiError::Internal(e),
        }
    }
}

/// Verifies RS256 (or otherwise configured) access tokens.
#[derive(Clone)]
pub struct TokenVerifier {
    keys: Arc<dyn KeySource>,
    audience: String,
    issuer: String,
    algorithms: Vec<Algorithm>,
}

impl TokenVerifier {
    pub fn new(
        keys: Arc<dyn KeySource>,
        audience: impl Into<String>,
        issuer: impl Into<String>,
        algorithms: Vec<Algorithm>,
    ) -> Self {
        Self {
            keys,
            audience: audience.into(),
            issuer: issuer.into(),
            algorithms,
        }
    }

    /// Build a verifier for the configured audience and issuer.
    pub fn from_config(keys: Arc<dyn KeySource>, config: &AuthConfig) -> Self {
        Self::new(
            keys,
            &config.audience,
            &config.issuer,
            config.algorithms.clone(),
        )
    }

    /// Fetch the key set once, failing if it is unreachable or empty.
    pub async fn check_keys(&self) -> anyhow::Result<usize> {
        let keys = self.keys.key_set().await?;
        if keys.keys.is_empty() {
            anyhow::bail!("key set contains no keys");
        }
        Ok(keys.keys.len())
    }

    /// Verify a raw token and return its claims.
    pub async fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        let header = jsonwebtoken::decode_header(token).map_err(|e| {
            debug!(error = %e, "unparsable token header");
            AuthError::malformed()
        })?;
        let Some(kid) = header.kid else {
            return Err(AuthError::malformed().into());
        };

        let keys = self
            .keys
            .key_set()
            .await
            .map_err(VerifyError::KeysUnavailable)?;
        let Some(jwk) = keys.find(&kid) else {
            debug!(%kid, "no signing key with this id");
            return Err(AuthError::key_not_found().into());
        };

        let key = DecodingKey::from_jwk(jwk).map_err(|e| {
            debug!(error = %e, %kid, "published key is unusable");
            AuthError::unparsable()
        })?;

        let data = jsonwebtoken::decode::<Claims>(token, &key, &self.validation())
            .map_err(|e| classify(e.kind()))?;

        Ok(data.claims)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = self.algorithms.clone();
        validation.leeway = 0;
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation
    }
}

/// Map a decode failure onto the client-facing auth error.
fn classify(kind: &ErrorKind) -> AuthError {
    debug!(?kind, "token rejected");
    match kind {
        ErrorKind::ExpiredSignature => AuthError::expired(),
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => AuthError::incorrect_claims(),
        ErrorKind::MissingRequiredClaim(claim) if claim == "iss" || claim == "aud" => {
            AuthError::incorrect_claims()
        }
        _ => AuthError::unparsable(),
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("algorithms", &self.algorithms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::auth::StaticKeySource;
    use coffee_shop_test_utils::{TEST_AUDIENCE, jwks_json, test_issuer, test_token};

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(
            Arc::new(StaticKeySource::from_json(jwks_json()).unwrap()),
            TEST_AUDIENCE,
            test_issuer(),
            vec![Algorithm::RS256],
        )
    }

    async fn rejection(token: &str) -> AuthError {
        match verifier().verify(token).await.unwrap_err() {
            VerifyError::Rejected(e) => e,
            other => panic!("expected a rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn valid_token_yields_claims() {
        let token = test_token(&["get:drinks-detail", "post:drinks"]).sign();
        let claims = verifier().verify(&token).await.unwrap();

        assert_eq!(claims.iss, Some(test_issuer()));
        assert_eq!(claims.sub, "auth0|barista");
        assert!(claims.has_permission("post:drinks"));
    }

    #[tokio::test]
    async fn token_without_permissions_claim_still_verifies() {
        let token = test_token(&[]).without_permissions_claim().sign();
        let claims = verifier().verify(&token).await.unwrap();
        assert!(claims.permissions.is_none());
    }

    #[tokio::test]
    async fn garbage_is_malformed() {
        assert_eq!(rejection("not-a-token").await, AuthError::malformed());
        assert_eq!(rejection("a.b.c").await, AuthError::malformed());
    }

    #[tokio::test]
    async fn missing_kid_is_malformed() {
        let token = test_token(&[]).without_kid().sign();
        assert_eq!(rejection(&token).await, AuthError::malformed());
    }

    #[tokio::test]
    async fn unknown_kid_is_key_not_found() {
        let token = test_token(&[]).with_kid("rotated-away").sign();
        let err = rejection(&token).await;
        assert_eq!(err, AuthError::key_not_found());
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn expired_token() {
        let token = test_token(&[]).expired().sign();
        assert_eq!(rejection(&token).await, AuthError::expired());
    }

    #[tokio::test]
    async fn wrong_audience() {
        let token = test_token(&[]).with_audience("someone-else").sign();
        assert_eq!(rejection(&token).await, AuthError::incorrect_claims());
    }

    #[tokio::test]
    async fn wrong_issuer() {
        let token = test_token(&[]).with_issuer("https://evil.test/").sign();
        assert_eq!(rejection(&token).await, AuthError::incorrect_claims());
    }

    #[tokio::test]
    async fn missing_issuer_is_incorrect_claims() {
        let token = test_token(&[]).without_issuer().sign();
        let err = rejection(&token).await;
        assert_eq!(err, AuthError::incorrect_claims());
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_audience_is_incorrect_claims() {
        let token = test_token(&[]).without_audience().sign();
        assert_eq!(rejection(&token).await, AuthError::incorrect_claims());
    }

    #[tokio::test]
    async fn forged_signature_is_unparsable() {
        let token = test_token(&[]).signed_by_rogue_key().sign();
        assert_eq!(rejection(&token).await, AuthError::unparsable());
    }

    #[tokio::test]
    async fn disallowed_algorithm_is_unparsable() {
        let strict = TokenVerifier::new(
            Arc::new(StaticKeySource::from_json(jwks_json()).unwrap()),
            TEST_AUDIENCE,
            test_issuer(),
            vec![Algorithm::RS512],
        );
        let token = test_token(&[]).sign();
        let err = strict.verify(&token).await.unwrap_err();
        assert!(matches!(err, VerifyError::Rejected(e) if e == AuthError::unparsable()));
    }

    #[tokio::test]
    async fn check_keys_counts_published_keys() {
        assert_eq!(verifier().check_keys().await.unwrap(), 1);
    }

    #[test]
    fn unavailable_keys_become_internal_errors() {
        let err: ApiError = VerifyError::KeysUnavailable(anyhow::anyhow!("timeout")).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
