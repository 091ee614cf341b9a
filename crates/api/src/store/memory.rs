//! In-process drink store.
//!
//! Enforces the same constraints as the drinks table so handlers behave
//! identically against either backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{DrinkStore, StoreError, StoreResult};
use crate::models::drink::{RECIPE_MAX_LEN, TITLE_MAX_LEN};
use crate::models::{Drink, DrinkInput, Recipe};

/// Drink store held in process memory.
#[derive(Debug)]
pub struct MemoryDrinkStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug)]
struct MemoryInner {
    next_id: i32,
    rows: BTreeMap<i32, Drink>,
}

impl MemoryInner {
    fn empty() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }

    fn title_taken(&self, title: &str, except: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|d| d.title == title && Some(d.id) != except)
    }

    fn insert(&mut self, input: DrinkInput) -> StoreResult<Drink> {
        let title = input.title.ok_or_else(|| {
            StoreError::ConstraintViolation("null value in column \"title\"".to_string())
        })?;
        let recipe = input.recipe.ok_or_else(|| {
            StoreError::ConstraintViolation("null value in column \"recipe\"".to_string())
        })?;

        check_sizes(&title, &recipe)?;
        if self.title_taken(&title, None) {
            return Err(StoreError::ConstraintViolation(format!(
                "duplicate title {title:?}"
            )));
        }

        let drink = Drink {
            id: self.next_id,
            title,
            recipe,
        };
        self.next_id += 1;
        self.rows.insert(drink.id, drink.clone());

        Ok(drink)
    }
}

fn check_sizes(title: &str, recipe: &Recipe) -> StoreResult<()> {
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(StoreError::ConstraintViolation(format!(
            "title longer than {TITLE_MAX_LEN} characters"
        )));
    }

    let text = recipe
        .to_storage()
        .map_err(|e| StoreError::Backend(e.into()))?;
    if text.chars().count() > RECIPE_MAX_LEN {
        return Err(StoreError::ConstraintViolation(format!(
            "recipe longer than {RECIPE_MAX_LEN} characters"
        )));
    }

    Ok(())
}

impl MemoryDrinkStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryInner::empty()),
        }
    }

    /// Number of stored drinks.
    pub fn len(&self) -> usize {
        self.inner.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryDrinkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DrinkStore for MemoryDrinkStore {
    async fn list_all(&self) -> StoreResult<Vec<Drink>> {
        Ok(self.inner.lock().rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i32) -> StoreResult<Drink> {
        self.inner
            .lock()
            .rows
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, input: DrinkInput) -> StoreResult<Drink> {
        self.inner.lock().insert(input)
    }

    async fn update(&self, drink: &Drink) -> StoreResult<Drink> {
        let mut inner = self.inner.lock();

        if !inner.rows.contains_key(&drink.id) {
            return Err(StoreError::NotFound);
        }
        check_sizes(&drink.title, &drink.recipe)?;
        if inner.title_taken(&drink.title, Some(drink.id)) {
            return Err(StoreError::ConstraintViolation(format!(
                "duplicate title {:?}",
                drink.title
            )));
        }

        inner.rows.insert(drink.id, drink.clone());
        Ok(drink.clone())
    }

    async fn delete(&self, drink: &Drink) -> StoreResult<()> {
        self.inner
            .lock()
            .rows
            .remove(&drink.id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn reset(&self, seed: Vec<DrinkInput>) -> StoreResult<()> {
        let mut fresh = MemoryInner::empty();
        for input in seed {
            fresh.insert(input)?;
        }
        *self.inner.lock() = fresh;
        Ok(())
    }

    async fn healthy(&self) -> bool {
        true
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::models::{Ingredient, seed_drinks};

    fn input(title: &str) -> DrinkInput {
        DrinkInput {
            title: Some(title.to_string()),
            recipe: Some(Recipe::new(vec![Ingredient {
                color: "brown".to_string(),
                name: "coffee".to_string(),
                parts: 2,
            }])),
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryDrinkStore::new();
        let a = store.insert(input("Americano")).await.unwrap();
        let b = store.insert(input("Mocha")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = MemoryDrinkStore::new();
        for title in ["Cortado", "Americano", "Mocha"] {
            store.insert(input(title)).await.unwrap();
        }

        let ids: Vec<i32> = store.list_all().await.unwrap().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn duplicate_title_is_constraint_violation() {
        let store = MemoryDrinkStore::new();
        store.insert(input("Mocha")).await.unwrap();

        let err = store.insert(input("Mocha")).await.unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_fields_are_constraint_violations() {
        let store = MemoryDrinkStore::new();

        let no_title = DrinkInput {
            title: None,
            ..input("x")
        };
        assert!(matches!(
            store.insert(no_title).await.unwrap_err(),
            StoreError::ConstraintViolation(_)
        ));

        let no_recipe = DrinkInput {
            recipe: None,
            ..input("x")
        };
        assert!(matches!(
            store.insert(no_recipe).await.unwrap_err(),
            StoreError::ConstraintViolation(_)
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn over_long_title_rejected() {
        let store = MemoryDrinkStore::new();
        let err = store
            .insert(input(&"x".repeat(TITLE_MAX_LEN + 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn update_missing_row_is_not_found() {
        let store = MemoryDrinkStore::new();
        let mut ghost = store.insert(input("Ghost")).await.unwrap();
        ghost.id = 99;

        assert!(matches!(
            store.update(&ghost).await.unwrap_err(),
            StoreError::NotFound
        ));
    }

    #[tokio::test]
    async fn update_to_taken_title_rejected() {
        let store = MemoryDrinkStore::new();
        store.insert(input("Mocha")).await.unwrap();
        let mut latte = store.insert(input("Latte")).await.unwrap();

        latte.title = "Mocha".to_string();
        assert!(matches!(
            store.update(&latte).await.unwrap_err(),
            StoreError::ConstraintViolation(_)
        ));
        assert_eq!(store.get_by_id(2).await.unwrap().title, "Latte");
    }

    #[tokio::test]
    async fn update_keeps_own_title() {
        let store = MemoryDrinkStore::new();
        let mut latte = store.insert(input("Latte")).await.unwrap();
        latte.recipe = Recipe::default();

        let updated = store.update(&latte).await.unwrap();
        assert!(updated.recipe.ingredients().is_empty());
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let store = MemoryDrinkStore::new();
        let drink = store.insert(input("Espresso")).await.unwrap();

        store.delete(&drink).await.unwrap();
        assert!(matches!(
            store.delete(&drink).await.unwrap_err(),
            StoreError::NotFound
        ));
        assert!(matches!(
            store.get_by_id(drink.id).await.unwrap_err(),
            StoreError::NotFound
        ));
    }

    #[tokio::test]
    async fn reset_restarts_ids_with_seed() {
        let store = MemoryDrinkStore::new();
        store.insert(input("Mocha")).await.unwrap();
        store.insert(input("Latte")).await.unwrap();

        store.reset(seed_drinks()).await.unwrap();

        let drinks = store.list_all().await.unwrap();
        assert_eq!(drinks.len(), 1);
        assert_eq!(drinks[0].id, 1);
        assert_eq!(drinks[0].title, "water");
    }
}
