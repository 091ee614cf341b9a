//! Database connection pool management.

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;

/// Drinks table definition.
const CREATE_DRINKS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS drinks (
        id     SERIAL PRIMARY KEY,
        title  VARCHAR(80)  NOT NULL UNIQUE,
        recipe VARCHAR(180) NOT NULL
    )
"#;

/// Create a PostgreSQL connection pool.
pub async fn create_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to PostgreSQL")?;

    Ok(pool)
}

/// Create the drinks table if it does not exist yet.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::query(CREATE_DRINKS_TABLE)
        .execute(pool)
        .await
        .context("failed to create drinks table")?;

    Ok(())
}

/// Drop and recreate the drinks table inside an open transaction.
pub(crate) async fn recreate_drinks_table(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
) -> Result<()> {
    sqlx::query("DROP TABLE IF EXISTS drinks")
        .execute(&mut **tx)
        .await
        .context("failed to drop drinks table")?;

    sqlx::query(CREATE_DRINKS_TABLE)
        .execute(&mut **tx)
        .await
        .context("failed to create drinks table")?;

    Ok(())
}

/// Check if the database connection is healthy.
pub async fn check_health(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}
