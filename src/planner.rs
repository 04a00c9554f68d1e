//! # Planner Module
//!
//! [`MealPlanner`] is the application state: the meal store, the shopping
//! list side tables, the recipe book and the display preferences, loaded from
//! and written back to a [`KeyValueStore`]. It is built once and passed by
//! reference to whatever needs it.
//!
//! ## Usage
//!
//! ```rust
//! use meal_planner::meal_model::{Day, MealEdit, Slot};
//! use meal_planner::persistence::MemoryStore;
//! use meal_planner::planner::MealPlanner;
//!
//! let mut planner = MealPlanner::load(MemoryStore::new());
//! planner
//!     .save_meal(
//!         MealEdit::new(Day::Monday, Slot::Breakfast, "Omelette")
//!             .with_ingredients(vec!["Egg 2".to_string(), "Milk (low fat)".to_string()]),
//!     )
//!     .unwrap();
//!
//! let names: Vec<String> = planner.shopping_list().into_iter().map(|i| i.name).collect();
//! assert_eq!(names, vec!["Milk", "계란"]);
//! ```

use tracing::{debug, info, warn};

use crate::errors::StorageError;
use crate::image_search::{find_image, ImageSearch};
use crate::llm::TextGenerator;
use crate::localization::{Language, Theme};
use crate::meal_assistant::{analyze_week, generate_meal_info, WeeklyReport};
use crate::meal_model::{Day, Meal, MealEdit, Slot};
use crate::meal_store::{MealStore, SlotTicket};
use crate::persistence::{keys, load, save, KeyValueStore};
use crate::recipes::RecipeBook;
use crate::shopping_list::{ShoppingItem, ShoppingState, StateMap};
use crate::smart_merge::{override_items, SmartMerge};
use crate::text_processing::IngredientNormalizer;

/// What the home screen shows for one day
#[derive(Debug, Clone, PartialEq)]
pub struct TodaySummary {
    pub day: Day,
    /// One entry per slot, in slot order
    pub slots: Vec<(Slot, Option<Meal>)>,
    /// Normalized ingredients of the day's meals
    pub ingredients: Vec<ShoppingItem>,
    /// Unchecked items in the displayed shopping list
    pub items_needed: usize,
}

/// Application state of the meal planner
#[derive(Debug)]
pub struct MealPlanner<S: KeyValueStore> {
    store: S,
    meals: MealStore,
    shopping: ShoppingState,
    recipes: RecipeBook,
    language: Language,
    theme: Theme,
    merged: Option<Vec<String>>,
    smart_merge: SmartMerge,
}

impl<S: KeyValueStore> MealPlanner<S> {
    /// Load the planner state; missing keys start empty
    pub fn load(store: S) -> Self {
        let meals: Vec<Meal> = load(&store, keys::MEALS);
        let checked: StateMap = load(&store, keys::CHECKED);
        let hidden: StateMap = load(&store, keys::HIDDEN);
        let recipes: RecipeBook = load(&store, keys::RECIPES);
        let language: Language = load(&store, keys::LANGUAGE);
        let theme: Theme = load(&store, keys::THEME);

        info!(
            meals = meals.len(),
            recipes = recipes.recipes().len(),
            language = %language,
            "Loaded meal planner state"
        );

        Self {
            store,
            meals: MealStore::from_meals(meals),
            shopping: ShoppingState::from_maps(checked, hidden),
            recipes,
            language,
            theme,
            merged: None,
            smart_merge: SmartMerge::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn meals(&self) -> &[Meal] {
        self.meals.meals()
    }

    pub fn meal_store(&self) -> &MealStore {
        &self.meals
    }

    pub fn meal(&self, day: Day, slot: Slot) -> Option<&Meal> {
        self.meals.get(day, slot)
    }

    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    pub fn shopping_state(&self) -> &ShoppingState {
        &self.shopping
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Normalizer for the current display language
    pub fn normalizer(&self) -> IngredientNormalizer {
        IngredientNormalizer::new(self.language)
    }

    fn persist_meals(&mut self) -> Result<(), StorageError> {
        save(&mut self.store, keys::MEALS, self.meals.meals())
    }

    fn persist_shopping(&mut self) -> Result<(), StorageError> {
        save(&mut self.store, keys::CHECKED, self.shopping.checked())?;
        save(&mut self.store, keys::HIDDEN, self.shopping.hidden())
    }

    /// Apply a meal edit and keep its recipe as a favourite
    ///
    /// An edit without an image keeps the slot's cached image as long as the
    /// image query (keywords, else title) did not change.
    pub fn save_meal(&mut self, mut edit: MealEdit) -> Result<bool, StorageError> {
        let (day, slot) = (edit.day, edit.slot);

        if edit.image_url.is_none() {
            if let Some(existing) = self.meals.get(day, slot) {
                let query = [edit.image_keywords.trim(), edit.title.trim()]
                    .into_iter()
                    .find(|q| !q.is_empty());
                if existing.image_query() == query {
                    edit.image_url = existing.image_url.clone();
                }
            }
        }

        if !self.meals.upsert_meal(edit) {
            return Ok(false);
        }
        self.persist_meals()?;

        if let Some(meal) = self.meals.get(day, slot) {
            if self.recipes.upsert_from_meal(meal) {
                save(&mut self.store, keys::RECIPES, &self.recipes)?;
            }
        }
        Ok(true)
    }

    /// Delete the meal at an address
    pub fn clear_meal(&mut self, day: Day, slot: Slot) -> Result<bool, StorageError> {
        self.save_meal(MealEdit::new(day, slot, ""))
    }

    /// Move a meal, swapping with the one at the target address
    pub fn move_meal(&mut self, meal_id: &str, day: Day, slot: Slot) -> Result<bool, StorageError> {
        if !self.meals.move_meal(meal_id, day, slot) {
            return Ok(false);
        }
        self.persist_meals()?;
        Ok(true)
    }

    /// Remove every planned meal
    pub fn clear_week(&mut self) -> Result<(), StorageError> {
        self.meals.clear();
        self.persist_meals()
    }

    /// The locally aggregated shopping list
    pub fn shopping_list(&self) -> Vec<ShoppingItem> {
        self.shopping.aggregate(self.meals.meals(), &self.normalizer())
    }

    /// The smart-merged list when one is active, else the aggregated list
    pub fn displayed_shopping_list(&self) -> Vec<ShoppingItem> {
        match &self.merged {
            Some(names) => override_items(names, self.shopping.checked(), self.shopping.hidden()),
            None => self.shopping_list(),
        }
    }

    pub fn is_smart_merged(&self) -> bool {
        self.merged.is_some()
    }

    pub fn is_merging(&self) -> bool {
        self.smart_merge.is_merging()
    }

    pub fn toggle_checked(&mut self, name: &str) -> Result<bool, StorageError> {
        let checked = self.shopping.toggle_checked(name);
        self.persist_shopping()?;
        Ok(checked)
    }

    /// Hide every checked item; returns how many were hidden
    pub fn clear_purchased(&mut self) -> Result<usize, StorageError> {
        let count = self.shopping.clear_purchased();
        self.persist_shopping()?;
        Ok(count)
    }

    /// Replace the displayed list with an AI-cleaned one
    ///
    /// On failure the displayed list stays as it was and `false` is returned.
    pub async fn smart_merge(&mut self, generator: &dyn TextGenerator) -> bool {
        let names: Vec<String> = self.shopping_list().into_iter().map(|i| i.name).collect();
        let merge = self.smart_merge.clone();

        match merge.merge(generator, &names, self.language).await {
            Ok(merged) => {
                self.merged = Some(merged);
                true
            }
            Err(e) => {
                warn!(error = %e, "Keeping the local shopping list");
                false
            }
        }
    }

    /// Go back to the locally aggregated list
    pub fn reset_smart_merge(&mut self) {
        if self.merged.take().is_some() {
            debug!("Dropped smart merge override");
        }
    }

    /// Fill ingredients, recipe, image keywords and nutrition of a slot with AI
    ///
    /// The dish name is `title` or the current meal's title. Fields of the
    /// current meal are replaced only when generation succeeds.
    pub async fn fill_meal(
        &mut self,
        generator: &dyn TextGenerator,
        day: Day,
        slot: Slot,
        title: Option<&str>,
    ) -> Result<bool, StorageError> {
        let current = self.meals.get(day, slot).cloned();
        let title = match (title, &current) {
            (Some(title), _) if !title.trim().is_empty() => title.trim().to_string(),
            (_, Some(meal)) if !meal.title.trim().is_empty() => meal.title.clone(),
            _ => {
                debug!(%day, %slot, "Nothing to fill without a dish name");
                return Ok(false);
            }
        };

        let Some(info) = generate_meal_info(generator, &title, self.language).await else {
            return Ok(false);
        };

        let mut edit = MealEdit::new(day, slot, &title)
            .with_ingredients(info.ingredients)
            .with_recipe(&info.recipe)
            .with_image_keywords(&info.image_keywords);
        edit.nutrition = info.nutrition;
        if let Some(meal) = current.filter(|m| m.title == title) {
            edit.image_url = meal.image_url;
            if edit.image_keywords.is_empty() {
                edit.image_keywords = meal.image_keywords;
            }
        }

        self.save_meal(edit)
    }

    /// Capture what an image lookup for a slot needs
    pub fn begin_image_refresh(&self, day: Day, slot: Slot) -> Option<(SlotTicket, String)> {
        let meal = self.meals.get(day, slot)?;
        let query = meal.image_query()?.to_string();
        let ticket = self.meals.ticket(day, slot)?;
        Some((ticket, query))
    }

    /// Apply a looked-up image unless the slot changed since the lookup began
    pub fn complete_image_refresh(
        &mut self,
        ticket: SlotTicket,
        image_url: Option<String>,
    ) -> Result<bool, StorageError> {
        if !self.meals.apply_image(ticket, image_url) {
            return Ok(false);
        }
        self.persist_meals()?;
        Ok(true)
    }

    /// Look up and store a photo for a slot
    pub async fn refresh_image(
        &mut self,
        search: &dyn ImageSearch,
        day: Day,
        slot: Slot,
    ) -> Result<bool, StorageError> {
        let Some((ticket, query)) = self.begin_image_refresh(day, slot) else {
            return Ok(false);
        };
        match find_image(search, &query).await {
            Some(url) => self.complete_image_refresh(ticket, Some(url)),
            None => Ok(false),
        }
    }

    /// Nutrition analysis of the whole week
    pub async fn analyze_week(&self, generator: &dyn TextGenerator) -> WeeklyReport {
        analyze_week(generator, self.meals.meals(), self.language).await
    }

    pub fn today_summary(&self, day: Day) -> TodaySummary {
        let slots = Slot::ALL
            .iter()
            .map(|slot| (*slot, self.meals.get(day, *slot).cloned()))
            .collect();
        let todays: Vec<Meal> = self.meals.meals_for_day(day).into_iter().cloned().collect();
        let items_needed = self
            .displayed_shopping_list()
            .iter()
            .filter(|item| !item.checked)
            .count();

        TodaySummary {
            day,
            slots,
            ingredients: self.shopping.aggregate(&todays, &self.normalizer()),
            items_needed,
        }
    }

    /// Remove a favourite recipe by id
    pub fn remove_recipe(&mut self, id: &str) -> Result<bool, StorageError> {
        if !self.recipes.remove(id) {
            return Ok(false);
        }
        save(&mut self.store, keys::RECIPES, &self.recipes)?;
        Ok(true)
    }

    /// Change the display language
    ///
    /// Canonical names depend on the language, so a smart merge override is dropped.
    pub fn set_language(&mut self, language: Language) -> Result<(), StorageError> {
        if self.language != language {
            self.reset_smart_merge();
        }
        self.language = language;
        save(&mut self.store, keys::LANGUAGE, &language)?;
        info!(language = %language, "Language changed");
        Ok(())
    }

    pub fn toggle_language(&mut self) -> Result<Language, StorageError> {
        let language = self.language.toggle();
        self.set_language(language)?;
        Ok(language)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), StorageError> {
        self.theme = theme;
        save(&mut self.store, keys::THEME, &theme)?;
        info!(theme = theme.key(), "Theme changed");
        Ok(())
    }
}
