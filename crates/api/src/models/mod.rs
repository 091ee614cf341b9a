//! Data models.

pub mod drink;

pub use drink::{Drink, DrinkInput, Ingredient, Recipe, seed_drinks};
