//! # Meal Store Module
//!
//! Holds the planned meals of the week. At most one meal exists per
//! `(day, slot)` address. Every mutation that touches an address bumps that
//! address's generation counter, so asynchronous results (image lookups) can
//! tell whether the meal they were computed for is still the current one.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::meal_model::{new_id, Day, Meal, MealEdit, Slot};

/// Proof of the generation of a slot at the time an asynchronous request began
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTicket {
    pub day: Day,
    pub slot: Slot,
    generation: u64,
}

/// Collection of planned meals keyed by `(day, slot)`
#[derive(Debug, Clone, Default)]
pub struct MealStore {
    meals: Vec<Meal>,
    generations: HashMap<(Day, Slot), u64>,
}

impl MealStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from persisted meals
    ///
    /// Later duplicates of an already occupied address are dropped, which
    /// restores the one-meal-per-slot invariant on damaged data.
    pub fn from_meals(meals: Vec<Meal>) -> Self {
        let mut store = Self::new();
        for meal in meals {
            if store.get(meal.day, meal.slot).is_some() {
                debug!(day = %meal.day, slot = %meal.slot, id = %meal.id, "Dropping duplicate persisted meal");
                continue;
            }
            store.meals.push(meal);
        }
        store
    }

    /// All meals in insertion order
    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.meals.len()
    }

    /// The meal planned at an address, if any
    pub fn get(&self, day: Day, slot: Slot) -> Option<&Meal> {
        self.meals.iter().find(|m| m.day == day && m.slot == slot)
    }

    /// Meals of one day, in slot order
    pub fn meals_for_day(&self, day: Day) -> Vec<&Meal> {
        Slot::ALL
            .iter()
            .filter_map(|slot| self.get(day, *slot))
            .collect()
    }

    /// Current generation of an address
    pub fn generation(&self, day: Day, slot: Slot) -> u64 {
        self.generations.get(&(day, slot)).copied().unwrap_or(0)
    }

    fn bump(&mut self, day: Day, slot: Slot) {
        *self.generations.entry((day, slot)).or_insert(0) += 1;
    }

    /// Create, update or delete the meal at the edit's address
    ///
    /// An edit with an empty title and no ingredients deletes the meal at
    /// that address, or does nothing if the address is empty. Any other edit
    /// updates the existing meal in place (keeping its id) or creates one
    /// with a fresh id.
    ///
    /// Returns `true` when the collection changed.
    pub fn upsert_meal(&mut self, edit: MealEdit) -> bool {
        let (day, slot) = (edit.day, edit.slot);
        let existing = self
            .meals
            .iter()
            .position(|m| m.day == day && m.slot == slot);

        if edit.is_empty() {
            return match existing {
                Some(index) => {
                    let removed = self.meals.remove(index);
                    self.bump(day, slot);
                    info!(%day, %slot, id = %removed.id, "Removed meal");
                    true
                }
                None => {
                    debug!(%day, %slot, "Empty edit on empty slot, nothing to do");
                    false
                }
            };
        }

        let id = match existing {
            Some(index) => self.meals[index].id.clone(),
            None => new_id(),
        };
        let meal = Meal {
            id,
            day,
            slot,
            title: edit.title,
            ingredients: edit.ingredients,
            recipe: edit.recipe,
            image_keywords: edit.image_keywords,
            nutrition: edit.nutrition,
            image_url: edit.image_url,
        };

        match existing {
            Some(index) => {
                info!(%day, %slot, id = %meal.id, "Updated meal");
                self.meals[index] = meal;
            }
            None => {
                info!(%day, %slot, id = %meal.id, "Created meal");
                self.meals.push(meal);
            }
        }
        self.bump(day, slot);
        true
    }

    /// Set the cached image of the meal at an address, leaving everything else untouched
    ///
    /// Does nothing when the address is empty.
    pub fn update_meal_image(&mut self, day: Day, slot: Slot, image_url: Option<String>) -> bool {
        match self.meals.iter_mut().find(|m| m.day == day && m.slot == slot) {
            Some(meal) => {
                meal.image_url = image_url;
                true
            }
            None => false,
        }
    }

    /// Capture the current generation of an occupied address
    pub fn ticket(&self, day: Day, slot: Slot) -> Option<SlotTicket> {
        self.get(day, slot).map(|_| SlotTicket {
            day,
            slot,
            generation: self.generation(day, slot),
        })
    }

    /// Apply an image found for a ticket, unless the slot changed in the meantime
    ///
    /// Returns `false` and leaves the meal untouched when the ticket is stale.
    pub fn apply_image(&mut self, ticket: SlotTicket, image_url: Option<String>) -> bool {
        let current = self.generation(ticket.day, ticket.slot);
        if current != ticket.generation {
            info!(
                day = %ticket.day,
                slot = %ticket.slot,
                requested = ticket.generation,
                current,
                "Discarding stale image result"
            );
            return false;
        }
        self.update_meal_image(ticket.day, ticket.slot, image_url)
    }

    /// Move a meal to another address, swapping with the meal already there
    ///
    /// Both meals keep their ids and content; only `day` and `slot` change.
    /// Unknown ids are ignored.
    pub fn move_meal(&mut self, meal_id: &str, target_day: Day, target_slot: Slot) -> bool {
        let Some(source) = self.meals.iter().position(|m| m.id == meal_id) else {
            debug!(%meal_id, "Move requested for unknown meal");
            return false;
        };
        let (source_day, source_slot) = (self.meals[source].day, self.meals[source].slot);
        if (source_day, source_slot) == (target_day, target_slot) {
            return false;
        }

        if let Some(target) = self
            .meals
            .iter()
            .position(|m| m.day == target_day && m.slot == target_slot)
        {
            self.meals[target].day = source_day;
            self.meals[target].slot = source_slot;
            info!(id = %self.meals[target].id, day = %source_day, slot = %source_slot, "Swapped meal into vacated slot");
        }
        self.meals[source].day = target_day;
        self.meals[source].slot = target_slot;
        info!(%meal_id, day = %target_day, slot = %target_slot, "Moved meal");

        self.bump(source_day, source_slot);
        self.bump(target_day, target_slot);
        true
    }

    /// Remove every meal
    pub fn clear(&mut self) {
        let addresses: Vec<(Day, Slot)> = self.meals.iter().map(|m| (m.day, m.slot)).collect();
        self.meals.clear();
        for (day, slot) in addresses {
            self.bump(day, slot);
        }
    }
}
