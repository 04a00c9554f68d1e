//! Favourite recipe book.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::meal_model::{new_id, Meal, Recipe};

/// Favourite recipes, unique by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.name == name)
    }

    /// Keep a meal's recipe as a favourite
    ///
    /// Only meals with both a title and a recipe body are kept. A favourite
    /// with the same name is replaced. Returns whether the book changed.
    pub fn upsert_from_meal(&mut self, meal: &Meal) -> bool {
        let name = meal.title.trim();
        if name.is_empty() || meal.recipe.trim().is_empty() {
            return false;
        }

        let recipe = Recipe {
            id: new_id(),
            name: name.to_string(),
            ingredients: meal.ingredients.clone(),
            instructions: meal.recipe.clone(),
            image_keywords: Some(meal.image_keywords.clone()).filter(|k| !k.is_empty()),
            image_url: meal.image_url.clone(),
        };

        self.recipes.retain(|r| r.name != recipe.name);
        info!(name = %recipe.name, "Saved favourite recipe");
        self.recipes.push(recipe);
        true
    }

    /// Remove a favourite by id; returns whether one was removed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.id != id);
        before != self.recipes.len()
    }
}
