//! # Meal Planner
//!
//! A weekly meal planner: meals are assigned to `(day, slot)` addresses and
//! their free-text ingredients are aggregated into a deduplicated, counted and
//! checkable shopping list. Optional AI services fill in meal details, clean up
//! the shopping list and look up dish photos.

pub mod busy;
pub mod cli;
pub mod config;
pub mod errors;
pub mod image_search;
pub mod llm;
pub mod localization;
pub mod meal_assistant;
pub mod meal_model;
pub mod meal_store;
pub mod normalization_patterns;
pub mod persistence;
pub mod planner;
pub mod recipes;
pub mod shopping_list;
pub mod smart_merge;
pub mod text_processing;
