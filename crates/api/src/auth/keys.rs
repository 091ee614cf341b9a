//! Signing key sources.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use tracing::debug;

/// Supplies the identity provider's published signing keys.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn key_set(&self) -> Result<JwkSet>;
}

/// Fetches the key set over HTTP on every call.
#[derive(Debug, Clone)]
pub struct HttpKeySource {
    client: reqwest::Client,
    url: String,
}

impl HttpKeySource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build JWKS HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn key_set(&self) -> Result<JwkSet> {
        debug!(url = %self.url, "fetching signing keys");

        let jwks = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("failed to fetch key set from {}", self.url))?
            .error_for_status()
            .context("key set endpoint returned an error status")?
            .json::<JwkSet>()
            .await
            .context("key set is not a valid JWK set")?;

        Ok(jwks)
    }
}

/// A fixed key set.
#[derive(Debug, Clone)]
pub struct StaticKeySource {
    keys: JwkSet,
}

impl StaticKeySource {
    pub fn new(keys: JwkSet) -> Self {
        Self { keys }
    }

    /// Parse a JWK set from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let keys = serde_json::from_str(json).context("invalid JWK set JSON")?;
        Ok(Self::new(keys))
    }
}

#[async_trait]
impl KeySource for StaticKeySource {
    async fn key_set(&self) -> Result<JwkSet> {
        Ok(self.keys.clone())
    }
}
