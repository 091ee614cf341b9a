//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::auth::{HttpKeySource, KeySource, TokenVerifier};
use crate::config::Config;
use crate::db;
use crate::models::seed_drinks;
use crate::store::{DrinkStore, MemoryDrinkStore, PgDrinkStore};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Drink persistence.
    store: Arc<dyn DrinkStore>,

    /// Bearer token verifier.
    verifier: Arc<TokenVerifier>,
}

impl AppState {
    /// Bind the store and token verifier described by `config`.
    ///
    /// Connects to PostgreSQL (unless the memory store is selected), creates
    /// the drinks table, optionally resets it to the seed menu, and checks
    /// that the key set is reachable.
    pub async fn new(config: &Config) -> Result<Self> {
        let store: Arc<dyn DrinkStore> = if config.uses_memory_store() {
            warn!("using the in-memory drink store; data will not survive a restart");
            Arc::new(MemoryDrinkStore::new())
        } else {
            let pool = db::create_pool(config)
                .await
                .context("failed to create database pool")?;

            db::run_migrations(&pool)
                .await
                .context("failed to run migrations")?;

            Arc::new(PgDrinkStore::new(pool))
        };

        if config.reset_db_on_start {
            store
                .reset(seed_drinks())
                .await
                .context("failed to reset drinks table")?;
            info!("drinks table reset to the seed menu");
        }

        let keys: Arc<dyn KeySource> = Arc::new(
            HttpKeySource::new(&config.auth.jwks_url, config.auth.jwks_timeout)
                .context("failed to create key source")?,
        );
        let verifier = TokenVerifier::from_config(keys, &config.auth);

        if config.auth.check_on_start {
            let count = verifier
                .check_keys()
                .await
                .context("signing key set is unreachable")?;
            info!(keys = count, url = %config.auth.jwks_url, "signing key set reachable");
        }

        Ok(Self::from_parts(store, verifier))
    }

    /// Assemble state from an existing store and verifier.
    pub fn from_parts(store: Arc<dyn DrinkStore>, verifier: TokenVerifier) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                verifier: Arc::new(verifier),
            }),
        }
    }

    /// Get the drink store.
    pub fn store(&self) -> &Arc<dyn DrinkStore> {
        &self.inner.store
    }

    /// Get the token verifier.
    pub fn verifier(&self) -> &Arc<TokenVerifier> {
        &self.inner.verifier
    }

    /// Check if the store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.inner.store.healthy().await
    }

    /// Release store connections.
    pub async fn close(&self) {
        self.inner.store.close().await;
        info!("drink store closed");
    }
}
