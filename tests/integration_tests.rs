//! # Integration Tests
//!
//! End-to-end behaviour of the planner over a JSON file store: meal edits,
//! moves, the shopping list laws and the AI-backed features with fake services.

use meal_planner::errors::ServiceError;
use meal_planner::image_search::FakeImageSearch;
use meal_planner::llm::FakeGenerator;
use meal_planner::localization::Language;
use meal_planner::meal_assistant::WeeklyReport;
use meal_planner::meal_model::{split_ingredient_input, Day, MealEdit, Slot};
use meal_planner::persistence::{keys, JsonFileStore, KeyValueStore};
use meal_planner::planner::MealPlanner;
use std::time::Duration;
use tempfile::TempDir;

fn open_planner(dir: &TempDir) -> MealPlanner<JsonFileStore> {
    let store = JsonFileStore::open(dir.path().join("planner.json")).unwrap();
    MealPlanner::load(store)
}

fn edit(day: Day, slot: Slot, title: &str, ingredients: &str) -> MealEdit {
    MealEdit::new(day, slot, title).with_ingredients(split_ingredient_input(ingredients))
}

#[test]
fn test_deletion_law() {
    let dir = tempfile::tempdir().unwrap();
    let mut planner = open_planner(&dir);

    planner.save_meal(edit(Day::Tuesday, Slot::Lunch, "Bibimbap", "Rice, Egg")).unwrap();
    assert!(planner.meal(Day::Tuesday, Slot::Lunch).is_some());

    assert!(planner.save_meal(MealEdit::new(Day::Tuesday, Slot::Lunch, "")).unwrap());
    assert!(planner.meal(Day::Tuesday, Slot::Lunch).is_none());

    assert!(!planner.save_meal(MealEdit::new(Day::Tuesday, Slot::Lunch, "")).unwrap());
    assert!(planner.meals().is_empty());
}

#[test]
fn test_update_keeps_id() {
    let dir = tempfile::tempdir().unwrap();
    let mut planner = open_planner(&dir);

    planner.save_meal(edit(Day::Monday, Slot::Dinner, "", "Tofu")).unwrap();
    let id = planner.meal(Day::Monday, Slot::Dinner).unwrap().id.clone();
    planner.save_meal(edit(Day::Monday, Slot::Dinner, "Tofu Stew", "Tofu, Onion")).unwrap();

    let meal = planner.meal(Day::Monday, Slot::Dinner).unwrap();
    assert_eq!(meal.id, id);
    assert_eq!(meal.title, "Tofu Stew");
    assert_eq!(planner.meals().len(), 1);
}

#[test]
fn test_swap_law() {
    let dir = tempfile::tempdir().unwrap();
    let mut planner = open_planner(&dir);
    planner.save_meal(edit(Day::Monday, Slot::Breakfast, "Toast", "Bread")).unwrap();
    planner.save_meal(edit(Day::Friday, Slot::Dinner, "Curry", "Rice, Potato")).unwrap();
    let a = planner.meal(Day::Monday, Slot::Breakfast).unwrap().clone();
    let b = planner.meal(Day::Friday, Slot::Dinner).unwrap().clone();

    assert!(planner.move_meal(&a.id, Day::Friday, Slot::Dinner).unwrap());

    let moved_a = planner.meal(Day::Friday, Slot::Dinner).unwrap();
    assert_eq!(moved_a.id, a.id);
    assert_eq!(moved_a.title, a.title);
    assert_eq!(moved_a.ingredients, a.ingredients);
    let moved_b = planner.meal(Day::Monday, Slot::Breakfast).unwrap();
    assert_eq!(moved_b.id, b.id);
    assert_eq!(moved_b.title, b.title);

    assert!(!planner.move_meal("no-such-id", Day::Sunday, Slot::Lunch).unwrap());
}

#[test]
fn test_clear_purchased_law_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut planner = open_planner(&dir);
        planner.save_meal(edit(Day::Monday, Slot::Dinner, "Mapo Tofu", "Tofu, Pork")).unwrap();
        planner.toggle_checked("두부").unwrap();
        assert_eq!(planner.clear_purchased().unwrap(), 1);
    }

    let mut planner = open_planner(&dir);
    planner.save_meal(edit(Day::Wednesday, Slot::Lunch, "Tofu Salad", "두부 1모, Lettuce")).unwrap();

    let names: Vec<String> = planner.shopping_list().into_iter().map(|i| i.name).collect();
    assert_eq!(names, vec!["Lettuce", "돼지고기"]);
}

#[test]
fn test_aggregation_counts_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut planner = open_planner(&dir);
    planner.save_meal(edit(Day::Monday, Slot::Breakfast, "", "Egg 2, Milk (low fat), 달걀")).unwrap();
    planner.save_meal(edit(Day::Tuesday, Slot::Breakfast, "", "apple, Apple 1")).unwrap();

    let list = planner.shopping_list();
    let summary: Vec<(&str, usize)> = list.iter().map(|i| (i.name.as_str(), i.count)).collect();
    assert_eq!(summary, vec![("apple", 1), ("Apple", 1), ("Milk", 1), ("계란", 2)]);
    assert_eq!(planner.shopping_list(), list);
}

#[test]
fn test_persisted_layout_uses_stable_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut planner = open_planner(&dir);
    planner.save_meal(edit(Day::Monday, Slot::Lunch, "Ramen", "Noodles")).unwrap();
    planner.toggle_checked("Noodles").unwrap();
    planner.set_language(Language::En).unwrap();

    let store = JsonFileStore::open(dir.path().join("planner.json")).unwrap();
    let meals = store.get(keys::MEALS).unwrap().unwrap();
    assert_eq!(meals[0]["title"], "Ramen");
    assert_eq!(meals[0]["slot"], "Lunch");
    assert_eq!(store.get(keys::CHECKED).unwrap().unwrap()["Noodles"], true);
    assert_eq!(store.get(keys::LANGUAGE).unwrap().unwrap(), "en");
}

#[tokio::test]
async fn test_fill_then_merge_then_analyze() {
    let dir = tempfile::tempdir().unwrap();
    let mut planner = open_planner(&dir);
    planner.set_language(Language::En).unwrap();

    let generator = FakeGenerator::new()
        .with_response(
            "\"normalized\"",
            r#"{"normalized": ["Kimchi", "Pork", "Tofu", "Scallion"]}"#,
        )
        .with_response(
            "nutrition coach",
            r#"{"analysis": "Protein rich week.", "advice": ["Add vegetables"]}"#,
        )
        .with_response(
            "Input: \"Kimchi Stew\"",
            r#"```json
{"ingredients": ["Kimchi", "Pork 200g", "Tofu 1/2", "Green onion"], "recipe": "Simmer.", "imageKeywords": "kimchi stew", "nutrition": {"calories": "450 kcal"}}
```"#,
        );

    assert!(planner
        .fill_meal(&generator, Day::Thursday, Slot::Dinner, Some("Kimchi Stew"))
        .await
        .unwrap());
    let names: Vec<String> = planner.shopping_list().into_iter().map(|i| i.name).collect();
    assert_eq!(names, vec!["Kimchi", "Pork", "Scallion", "Tofu"]);

    assert!(planner.smart_merge(&generator).await);
    assert!(planner.is_smart_merged());
    assert_eq!(planner.displayed_shopping_list().len(), 4);

    match planner.analyze_week(&generator).await {
        WeeklyReport::Ready(analysis) => assert_eq!(analysis.advice, vec!["Add vegetables"]),
        other => panic!("unexpected report: {other:?}"),
    }
}

#[tokio::test]
async fn test_services_failing_leave_state_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut planner = open_planner(&dir);
    planner.save_meal(edit(Day::Saturday, Slot::Lunch, "Bulgogi", "Beef")).unwrap();
    let before = planner.meals().to_vec();

    let offline = FakeGenerator::new().failing(ServiceError::Network("offline".to_string()));
    assert!(!planner.fill_meal(&offline, Day::Saturday, Slot::Lunch, None).await.unwrap());
    assert!(!planner.smart_merge(&offline).await);
    assert_eq!(planner.analyze_week(&offline).await, WeeklyReport::Failed);

    let search = FakeImageSearch::new().failing(ServiceError::Api {
        status: 403,
        message: "rate limited".to_string(),
    });
    assert!(!planner.refresh_image(&search, Day::Saturday, Slot::Lunch).await.unwrap());

    assert_eq!(planner.meals(), before.as_slice());
    assert!(!planner.is_smart_merged());
}

#[tokio::test]
async fn test_image_lookup_racing_an_edit_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let mut planner = open_planner(&dir);
    planner.save_meal(edit(Day::Sunday, Slot::Dinner, "Pizza", "Cheese")).unwrap();

    let search = FakeImageSearch::new()
        .with_image("Pizza", "https://img/pizza.jpg")
        .with_delay(Duration::from_millis(10));
    let (ticket, query) = planner.begin_image_refresh(Day::Sunday, Slot::Dinner).unwrap();

    planner.save_meal(edit(Day::Sunday, Slot::Dinner, "Pasta", "Noodles")).unwrap();
    let url = meal_planner::image_search::find_image(&search, &query).await;
    assert_eq!(url.as_deref(), Some("https://img/pizza.jpg"));

    assert!(!planner.complete_image_refresh(ticket, url).unwrap());
    assert!(planner.meal(Day::Sunday, Slot::Dinner).unwrap().image_url.is_none());
}
