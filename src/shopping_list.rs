//! # Shopping List Module
//!
//! Folds every planned meal's ingredients through the [`IngredientNormalizer`]
//! into a counted, sorted and checkable shopping list. The list is derived data:
//! it is recomputed from the meals and the two state maps on every read.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::meal_model::Meal;
use crate::text_processing::IngredientNormalizer;

/// Canonical ingredient name -> flag
pub type StateMap = BTreeMap<String, bool>;

/// One line of the shopping list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub name: String,
    /// Number of (meal, entry segment) occurrences that normalized to `name`
    pub count: usize,
    pub checked: bool,
}

/// Locale-aware name ordering
///
/// Names compare case-insensitively first, so `apple` sits next to `Apple`.
/// Ties are broken on the exact spelling with lowercase ahead of uppercase
/// (`apple` before `Apple`), which keeps the order total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Aggregate the ingredients of all meals into the shopping list
///
/// Hidden names are skipped entirely. The result is sorted with
/// [`compare_names`] and depends only on the inputs.
///
/// # Arguments
///
/// * `meals` - Planned meals, in any order
/// * `checked` - Checked-state map
/// * `hidden` - Hidden-state map
/// * `normalizer` - Normalizer for the display language
pub fn aggregate(
    meals: &[Meal],
    checked: &StateMap,
    hidden: &StateMap,
    normalizer: &IngredientNormalizer,
) -> Vec<ShoppingItem> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for meal in meals {
        for entry in &meal.ingredients {
            for name in normalizer.normalize_entry(entry) {
                if is_set(hidden, &name) {
                    continue;
                }
                *counts.entry(name).or_insert(0) += 1;
            }
        }
    }

    let mut items: Vec<ShoppingItem> = counts
        .into_iter()
        .map(|(name, count)| ShoppingItem {
            checked: is_set(checked, &name),
            name,
            count,
        })
        .collect();
    items.sort_by(|a, b| compare_names(&a.name, &b.name));

    debug!(
        meals = meals.len(),
        items = items.len(),
        "Aggregated shopping list"
    );
    items
}

fn is_set(map: &StateMap, name: &str) -> bool {
    map.get(name).copied().unwrap_or(false)
}

/// Checked and hidden side tables of the shopping list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShoppingState {
    checked: StateMap,
    hidden: StateMap,
}

impl ShoppingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_maps(checked: StateMap, hidden: StateMap) -> Self {
        Self { checked, hidden }
    }

    pub fn checked(&self) -> &StateMap {
        &self.checked
    }

    pub fn hidden(&self) -> &StateMap {
        &self.hidden
    }

    pub fn is_checked(&self, name: &str) -> bool {
        is_set(&self.checked, name)
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        is_set(&self.hidden, name)
    }

    /// Flip the checked flag of a name and return the new value
    pub fn toggle_checked(&mut self, name: &str) -> bool {
        let flag = self.checked.entry(name.to_string()).or_insert(false);
        *flag = !*flag;
        debug!(ingredient = name, checked = *flag, "Toggled shopping item");
        *flag
    }

    /// Hide every checked name and drop the checked entries
    ///
    /// Returns the number of names that were hidden.
    pub fn clear_purchased(&mut self) -> usize {
        let purchased: Vec<String> = self
            .checked
            .iter()
            .filter(|(_, checked)| **checked)
            .map(|(name, _)| name.clone())
            .collect();

        for name in &purchased {
            self.hidden.insert(name.clone(), true);
            self.checked.remove(name);
        }

        info!(count = purchased.len(), "Cleared purchased items");
        purchased.len()
    }

    /// Aggregate `meals` against this state
    pub fn aggregate(&self, meals: &[Meal], normalizer: &IngredientNormalizer) -> Vec<ShoppingItem> {
        aggregate(meals, &self.checked, &self.hidden, normalizer)
    }
}
