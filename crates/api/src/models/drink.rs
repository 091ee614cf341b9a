//! Drink model and its JSON projections.
//!
//! A drink's recipe is an ordered list of ingredients. Storage keeps it as a
//! single JSON text blob; requests may send either a list or one bare
//! ingredient object, which is normalised to a one-element list.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Maximum title length accepted by the drinks table.
pub const TITLE_MAX_LEN: usize = 80;

/// Maximum length of the stored recipe text.
pub const RECIPE_MAX_LEN: usize = 180;

/// One ingredient of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub color: String,
    pub name: String,
    pub parts: i64,
}

/// Ordered list of ingredients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipe(Vec<Ingredient>);

/// Accepted wire shapes for a recipe.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecipeShape {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl Recipe {
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        Self(ingredients)
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.0
    }

    /// Encode to the text form kept in storage.
    pub fn to_storage(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }

    /// Decode the stored text form.
    pub fn from_storage(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

impl Serialize for Recipe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Recipe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RecipeShape::deserialize(deserializer)? {
            RecipeShape::Many(ingredients) => Recipe(ingredients),
            RecipeShape::One(ingredient) => Recipe(vec![ingredient]),
        })
    }
}

/// Drink record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    /// Store-assigned identifier.
    pub id: i32,

    /// Unique menu title.
    pub title: String,

    pub recipe: Recipe,
}

/// Fields supplied by a create or update request.
///
/// Absent keys stay `None` and leave the target untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DrinkInput {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub recipe: Option<Recipe>,
}

/// Ingredient as shown in the public listing (no name).
#[derive(Debug, Clone, Serialize)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: i64,
}

/// Public projection of a drink.
#[derive(Debug, Clone, Serialize)]
pub struct ShortDrink {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

/// Full projection of a drink.
#[derive(Debug, Clone, Serialize)]
pub struct LongDrink {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl Drink {
    pub fn short(&self) -> ShortDrink {
        ShortDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .ingredients()
                .iter()
                .map(|i| ShortIngredient {
                    color: i.color.clone(),
                    parts: i.parts,
                })
                .collect(),
        }
    }

    pub fn long(&self) -> LongDrink {
        LongDrink {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.ingredients().to_vec(),
        }
    }

    /// Apply the supplied fields in place.
    pub fn apply(&mut self, input: DrinkInput) {
        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(recipe) = input.recipe {
            self.recipe = recipe;
        }
    }
}

/// Rows written by a reset: a single glass of water.
pub fn seed_drinks() -> Vec<DrinkInput> {
    vec![DrinkInput {
        title: Some("water".to_string()),
        recipe: Some(Recipe::new(vec![Ingredient {
            color: "blue".to_string(),
            name: "water".to_string(),
            parts: 1,
        }])),
    }]
}
