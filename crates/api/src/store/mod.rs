//! Drink persistence.
//!
//! Every operation reports failures through [`StoreError`], so callers can
//! tell a missing row from a rejected write or a broken backend.

mod memory;
mod postgres;

pub use memory::MemoryDrinkStore;
pub use postgres::PgDrinkStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Drink, DrinkInput};

/// Failure of a store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed drink does not exist.
    #[error("drink not found")]
    NotFound,

    /// The write broke a uniqueness, non-null or size constraint.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// The backend itself failed.
    #[error("storage backend failure: {0:#}")]
    Backend(#[from] anyhow::Error),
}

/// Result type alias using StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// Backing table of drinks.
#[async_trait]
pub trait DrinkStore: Send + Sync {
    /// All drinks ordered by id ascending.
    async fn list_all(&self) -> StoreResult<Vec<Drink>>;

    async fn get_by_id(&self, id: i32) -> StoreResult<Drink>;

    /// Insert a new row and return it with its assigned id.
    ///
    /// Absent fields are written as NULL and fail the non-null constraint.
    async fn insert(&self, input: DrinkInput) -> StoreResult<Drink>;

    /// Persist in-place changes to an existing row.
    async fn update(&self, drink: &Drink) -> StoreResult<Drink>;

    async fn delete(&self, drink: &Drink) -> StoreResult<()>;

    /// Drop every row, restart ids at 1 and insert `seed`.
    async fn reset(&self, seed: Vec<DrinkInput>) -> StoreResult<()>;

    /// Whether the backend is reachable.
    async fn healthy(&self) -> bool;

    /// Release backend connections.
    async fn close(&self);
}
