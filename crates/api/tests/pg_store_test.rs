//! PostgreSQL drink store tests.
//!
//! These need a reachable database in `DATABASE_URL` and drop the drinks
//! table, so they are ignored by default:
//!
//! ```text
//! DATABASE_URL=postgres://localhost/coffee_test cargo test -p coffee-shop-api -- --ignored
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use coffee_shop_api::db;
use coffee_shop_api::models::{DrinkInput, Ingredient, Recipe, seed_drinks};
use coffee_shop_api::store::{DrinkStore, PgDrinkStore, StoreError};
use sqlx::postgres::PgPoolOptions;
use tokio::sync::Mutex;

/// Tests share one table; run them one at a time.
static TABLE_LOCK: Mutex<()> = Mutex::const_new(());

async fn store() -> PgDrinkStore {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to PostgreSQL");
    db::run_migrations(&pool).await.unwrap();

    let store = PgDrinkStore::new(pool);
    store.reset(seed_drinks()).await.unwrap();
    store
}

fn input(title: &str, name: &str) -> DrinkInput {
    DrinkInput {
        title: Some(title.to_string()),
        recipe: Some(Recipe::new(vec![Ingredient {
            color: "brown".to_string(),
            name: name.to_string(),
            parts: 1,
        }])),
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn pg_reset_seeds_water() {
    let _guard = TABLE_LOCK.lock().await;
    let store = store().await;

    let drinks = store.list_all().await.unwrap();
    assert_eq!(drinks.len(), 1);
    assert_eq!(drinks[0].id, 1);
    assert_eq!(drinks[0].title, "water");
    assert!(store.healthy().await);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn pg_lifecycle() {
    let _guard = TABLE_LOCK.lock().await;
    let store = store().await;

    let mut mocha = store.insert(input("Mocha", "chocolate")).await.unwrap();
    assert_eq!(store.get_by_id(mocha.id).await.unwrap(), mocha);

    mocha.title = "Dark Mocha".to_string();
    let updated = store.update(&mocha).await.unwrap();
    assert_eq!(updated.title, "Dark Mocha");

    let titles: Vec<String> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.title)
        .collect();
    assert_eq!(titles, vec!["water", "Dark Mocha"]);

    store.delete(&updated).await.unwrap();
    assert!(matches!(
        store.get_by_id(updated.id).await.unwrap_err(),
        StoreError::NotFound
    ));
    assert!(matches!(
        store.delete(&updated).await.unwrap_err(),
        StoreError::NotFound
    ));
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn pg_rejects_constraint_violations() {
    let _guard = TABLE_LOCK.lock().await;
    let store = store().await;

    let duplicate = store.insert(input("water", "water")).await.unwrap_err();
    assert!(matches!(duplicate, StoreError::ConstraintViolation(_)));

    let long_title = "x".repeat(81);
    let too_long = store.insert(input(&long_title, "milk")).await.unwrap_err();
    assert!(matches!(too_long, StoreError::ConstraintViolation(_)));

    let untitled = DrinkInput {
        title: None,
        ..input("ignored", "milk")
    };
    assert!(matches!(
        store.insert(untitled).await.unwrap_err(),
        StoreError::ConstraintViolation(_)
    ));

    assert_eq!(store.list_all().await.unwrap().len(), 1);
}
