//! PostgreSQL drink store.

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::error::ErrorKind;

use super::{DrinkStore, StoreError, StoreResult};
use crate::db;
use crate::models::{Drink, DrinkInput, Recipe};

/// SQLSTATE for a value too long for its column.
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

/// Raw drinks row; `recipe` is the stored JSON text.
#[derive(Debug, sqlx::FromRow)]
struct DrinkRow {
    id: i32,
    title: String,
    recipe: String,
}

impl TryFrom<DrinkRow> for Drink {
    type Error = StoreError;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        let recipe = Recipe::from_storage(&row.recipe)
            .with_context(|| format!("drink {} has an unreadable recipe", row.id))?;

        Ok(Drink {
            id: row.id,
            title: row.title,
            recipe,
        })
    }
}

/// Sort a sqlx failure into the store taxonomy.
fn classify(err: sqlx::Error, action: &'static str) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        let constraint = matches!(
            db_err.kind(),
            ErrorKind::UniqueViolation | ErrorKind::NotNullViolation | ErrorKind::CheckViolation
        ) || db_err.code().as_deref() == Some(STRING_DATA_RIGHT_TRUNCATION);

        if constraint {
            return StoreError::ConstraintViolation(db_err.message().to_string());
        }
    }

    StoreError::Backend(anyhow::Error::new(err).context(action))
}

fn encode_recipe(recipe: &Recipe) -> StoreResult<String> {
    recipe
        .to_storage()
        .context("failed to encode recipe")
        .map_err(StoreError::Backend)
}

/// Drink store backed by the `drinks` table.
#[derive(Debug, Clone)]
pub struct PgDrinkStore {
    pool: PgPool,
}

impl PgDrinkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DrinkStore for PgDrinkStore {
    async fn list_all(&self) -> StoreResult<Vec<Drink>> {
        let rows = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify(e, "failed to list drinks"))?;

        rows.into_iter().map(Drink::try_from).collect()
    }

    async fn get_by_id(&self, id: i32) -> StoreResult<Drink> {
        let row = sqlx::query_as::<_, DrinkRow>(
            "SELECT id, title, recipe FROM drinks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify(e, "failed to fetch drink by id"))?;

        row.ok_or(StoreError::NotFound)?.try_into()
    }

    async fn insert(&self, input: DrinkInput) -> StoreResult<Drink> {
        let recipe = input.recipe.as_ref().map(encode_recipe).transpose()?;

        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            INSERT INTO drinks (title, recipe)
            VALUES ($1, $2)
            RETURNING id, title, recipe
            "#,
        )
        .bind(input.title)
        .bind(recipe)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, "failed to insert drink"))?;

        row.try_into()
    }

    async fn update(&self, drink: &Drink) -> StoreResult<Drink> {
        let recipe = encode_recipe(&drink.recipe)?;

        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            UPDATE drinks SET title = $1, recipe = $2
            WHERE id = $3
            RETURNING id, title, recipe
            "#,
        )
        .bind(&drink.title)
        .bind(recipe)
        .bind(drink.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify(e, "failed to update drink"))?;

        row.ok_or(StoreError::NotFound)?.try_into()
    }

    async fn delete(&self, drink: &Drink) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = $1")
            .bind(drink.id)
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, "failed to delete drink"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn reset(&self, seed: Vec<DrinkInput>) -> StoreResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| classify(e, "failed to start transaction"))?;

        db::recreate_drinks_table(&mut tx).await?;

        for input in seed {
            let recipe = input.recipe.as_ref().map(encode_recipe).transpose()?;
            sqlx::query("INSERT INTO drinks (title, recipe) VALUES ($1, $2)")
                .bind(input.title)
                .bind(recipe)
                .execute(&mut *tx)
                .await
                .map_err(|e| classify(e, "failed to insert seed drink"))?;
        }

        tx.commit()
            .await
            .map_err(|e| classify(e, "failed to commit reset"))?;

        Ok(())
    }

    async fn healthy(&self) -> bool {
        db::check_health(&self.pool).await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
