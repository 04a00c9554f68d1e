//! # Meal Plan Data Model
//!
//! This module defines the data structures for a weekly meal plan: the
//! `(day, slot)` addressing scheme, planned meals, AI nutrition estimates and
//! favourite recipes.
//!
//! ## Core Concepts
//!
//! - **Day**: one of the seven weekdays
//! - **Slot**: one of the three meal times (breakfast, lunch, dinner)
//! - **Meal**: a dish planned at a `(day, slot)` address, holding free-text ingredients
//! - **Recipe**: a favourite dish kept in the recipe book
//!
//! ## Usage
//!
//! ```rust
//! use meal_planner::meal_model::{Day, MealEdit, Slot};
//!
//! let edit = MealEdit::new(Day::Monday, Slot::Breakfast, "Omelette")
//!     .with_ingredients(vec!["Egg 2".to_string(), "Milk".to_string()]);
//! assert!(!edit.is_empty());
//! ```

use chrono::{Datelike, Local, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::normalization_patterns::ENTRY_SEPARATORS;

/// A weekday of the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All days in plan order, Monday first
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// English label, also used as the localization key
    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    /// The current weekday according to the local clock
    pub fn today() -> Self {
        Local::now().weekday().into()
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Day::Monday,
            Weekday::Tue => Day::Tuesday,
            Weekday::Wed => Day::Wednesday,
            Weekday::Thu => Day::Thursday,
            Weekday::Fri => Day::Friday,
            Weekday::Sat => Day::Saturday,
            Weekday::Sun => Day::Sunday,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Day::ALL
            .iter()
            .copied()
            .find(|day| {
                let name = day.as_str().to_lowercase();
                name == wanted || (wanted.len() >= 3 && name.starts_with(&wanted))
            })
            .ok_or_else(|| format!("unknown day: {s}"))
    }
}

/// A meal time within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    Breakfast,
    Lunch,
    Dinner,
}

impl Slot {
    /// All slots in the order of the day
    pub const ALL: [Slot; 3] = [Slot::Breakfast, Slot::Lunch, Slot::Dinner];

    /// English label, also used as the localization key
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Breakfast => "Breakfast",
            Slot::Lunch => "Lunch",
            Slot::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Slot::ALL
            .iter()
            .copied()
            .find(|slot| slot.as_str().to_lowercase() == wanted)
            .ok_or_else(|| format!("unknown slot: {s}"))
    }
}

/// AI nutrition estimate for one serving
///
/// Magnitudes are free text ("450 kcal", "20g"). Numbers returned by the
/// text-generation service are accepted and kept in their textual form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default, deserialize_with = "magnitude")]
    pub calories: String,
    #[serde(default, deserialize_with = "magnitude")]
    pub carbs: String,
    #[serde(default, deserialize_with = "magnitude")]
    pub protein: String,
    #[serde(default, deserialize_with = "magnitude")]
    pub fat: String,
}

fn magnitude<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A dish planned at a `(day, slot)` address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    /// Stable identifier, allocated on first creation
    pub id: String,
    pub day: Day,
    #[serde(alias = "type")]
    pub slot: Slot,
    /// Dish name, may be empty when only ingredients were entered
    #[serde(default, alias = "menuName")]
    pub title: String,
    /// Free-text ingredient entries, each possibly holding comma-separated items
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub recipe: String,
    #[serde(default)]
    pub image_keywords: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Meal {
    /// Query used for image lookup: the keywords hint, else the title
    pub fn image_query(&self) -> Option<&str> {
        [self.image_keywords.trim(), self.title.trim()]
            .into_iter()
            .find(|q| !q.is_empty())
    }
}

/// The content of one meal edit, as submitted for a slot
#[derive(Debug, Clone, PartialEq)]
pub struct MealEdit {
    pub day: Day,
    pub slot: Slot,
    pub title: String,
    pub ingredients: Vec<String>,
    pub recipe: String,
    pub image_keywords: String,
    pub nutrition: Option<Nutrition>,
    pub image_url: Option<String>,
}

impl MealEdit {
    /// Start an edit for a slot with the given title
    pub fn new(day: Day, slot: Slot, title: &str) -> Self {
        Self {
            day,
            slot,
            title: title.to_string(),
            ingredients: Vec::new(),
            recipe: String::new(),
            image_keywords: String::new(),
            nutrition: None,
            image_url: None,
        }
    }

    pub fn with_ingredients(mut self, ingredients: Vec<String>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_recipe(mut self, recipe: &str) -> Self {
        self.recipe = recipe.to_string();
        self
    }

    pub fn with_image_keywords(mut self, keywords: &str) -> Self {
        self.image_keywords = keywords.to_string();
        self
    }

    pub fn with_nutrition(mut self, nutrition: Nutrition) -> Self {
        self.nutrition = Some(nutrition);
        self
    }

    /// An edit with an empty title and no ingredients means "delete this slot"
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.ingredients.is_empty()
    }
}

/// Split a comma separated input line into trimmed, non-empty ingredient entries
///
/// Uses the same separators as [`IngredientNormalizer::normalize_entry`](crate::text_processing::IngredientNormalizer::normalize_entry).
pub fn split_ingredient_input(input: &str) -> Vec<String> {
    input
        .split(ENTRY_SEPARATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// A favourite recipe kept in the recipe book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Allocate a fresh opaque identifier
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_parsing() {
        assert_eq!("monday".parse::<Day>().unwrap(), Day::Monday);
        assert_eq!("Tue".parse::<Day>().unwrap(), Day::Tuesday);
        assert_eq!(" SUNDAY ".parse::<Day>().unwrap(), Day::Sunday);
        assert!("mo".parse::<Day>().is_err());
        assert!("someday".parse::<Day>().is_err());
    }

    #[test]
    fn test_slot_parsing() {
        assert_eq!("lunch".parse::<Slot>().unwrap(), Slot::Lunch);
        assert!("brunch".parse::<Slot>().is_err());
    }

    #[test]
    fn test_weekday_conversion() {
        assert_eq!(Day::from(Weekday::Mon), Day::Monday);
        assert_eq!(Day::from(Weekday::Sun), Day::Sunday);
    }

    #[test]
    fn test_meal_reads_legacy_keys() {
        let json = r#"{"id":"a1","day":"Friday","type":"Dinner","menuName":"Kimchi Stew","ingredients":["Kimchi","Pork"],"recipe":""}"#;
        let meal: Meal = serde_json::from_str(json).unwrap();

        assert_eq!(meal.slot, Slot::Dinner);
        assert_eq!(meal.title, "Kimchi Stew");
        assert_eq!(meal.image_keywords, "");
        assert!(meal.image_url.is_none());
    }

    #[test]
    fn test_meal_writes_camel_case() {
        let meal = Meal {
            id: "a1".to_string(),
            day: Day::Monday,
            slot: Slot::Lunch,
            title: "Bibimbap".to_string(),
            ingredients: vec![],
            recipe: String::new(),
            image_keywords: "bibimbap bowl".to_string(),
            nutrition: None,
            image_url: Some("https://images.example/1.jpg".to_string()),
        };
        let value = serde_json::to_value(&meal).unwrap();

        assert_eq!(value["imageKeywords"], "bibimbap bowl");
        assert_eq!(value["imageUrl"], "https://images.example/1.jpg");
        assert!(value.get("nutrition").is_none());
    }

    #[test]
    fn test_nutrition_accepts_numbers() {
        let nutrition: Nutrition =
            serde_json::from_str(r#"{"calories": 450, "carbs": "60g", "protein": 20.5}"#).unwrap();

        assert_eq!(nutrition.calories, "450");
        assert_eq!(nutrition.carbs, "60g");
        assert_eq!(nutrition.protein, "20.5");
        assert_eq!(nutrition.fat, "");
    }

    #[test]
    fn test_image_query_prefers_keywords() {
        let mut meal: Meal = serde_json::from_str(
            r#"{"id":"x","day":"Monday","slot":"Lunch","title":"김치볶음밥"}"#,
        )
        .unwrap();
        assert_eq!(meal.image_query(), Some("김치볶음밥"));

        meal.image_keywords = "kimchi fried rice".to_string();
        assert_eq!(meal.image_query(), Some("kimchi fried rice"));

        meal.image_keywords.clear();
        meal.title.clear();
        assert_eq!(meal.image_query(), None);
    }

    #[test]
    fn test_split_ingredient_input() {
        assert_eq!(
            split_ingredient_input(" Onion, Garlic ,, Pork 300g "),
            vec!["Onion", "Garlic", "Pork 300g"]
        );
        assert!(split_ingredient_input(" , ").is_empty());
    }

    #[test]
    fn test_split_ingredient_input_accepts_full_width_comma() {
        assert_eq!(
            split_ingredient_input("양파，마늘, 대파 1대"),
            vec!["양파", "마늘", "대파 1대"]
        );
        assert!(split_ingredient_input("，,").is_empty());
    }
}
