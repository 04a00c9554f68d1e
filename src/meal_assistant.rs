//! # Meal Assistant Module
//!
//! Prompts and response handling for the AI features of the planner:
//! filling a meal's details from its title and analysing the week's
//! nutrition. Every failure here is soft: it is logged and reported as
//! "no new data".

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::llm::{extract_json_object, TextGenerator};
use crate::localization::Language;
use crate::meal_model::{Meal, Nutrition};

/// Details generated for a dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealInfo {
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub recipe: String,
    #[serde(default)]
    pub image_keywords: String,
    #[serde(default)]
    pub nutrition: Option<Nutrition>,
}

/// AI feedback on a week of meals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAnalysis {
    pub analysis: String,
    #[serde(default)]
    pub advice: Vec<String>,
}

/// Outcome of a weekly analysis request
#[derive(Debug, Clone, PartialEq)]
pub enum WeeklyReport {
    /// Nothing is planned, no request was sent
    NoMeals,
    Ready(WeeklyAnalysis),
    Failed,
}

fn language_directive(language: Language) -> String {
    format!("Output MUST be in {}.", language.english_name())
}

pub fn meal_info_prompt(title: &str, language: Language) -> String {
    format!(
        r#"You are a helpful cooking assistant.
The user will provide a menu name.
List the main ingredients required to cook this menu, write short step-by-step cooking instructions,
suggest English search keywords for a photo of the dish, and estimate the nutrition of one serving.
Return ONLY a JSON object with the keys "ingredients" (array of strings), "recipe" (string),
"imageKeywords" (string, always in English) and "nutrition" (object with "calories", "carbs", "protein", "fat" as strings).
Do not include any markdown formatting or explanations.
{}
Example input: "Kimchi Stew"
Example output: {{ "ingredients": ["Kimchi", "Pork", "Tofu", "Green Onion", "Onion"], "recipe": "1. Stir-fry the pork and kimchi. 2. Add water and tofu and simmer.", "imageKeywords": "kimchi stew", "nutrition": {{ "calories": "450 kcal", "carbs": "20g", "protein": "30g", "fat": "25g" }} }}

Input: "{}""#,
        language_directive(language),
        title.trim()
    )
}

pub fn weekly_analysis_prompt(meals: &[Meal], language: Language) -> String {
    let plan: Vec<String> = meals
        .iter()
        .map(|meal| {
            format!(
                "- {} {}: {} ({})",
                meal.day,
                meal.slot,
                meal.title,
                meal.ingredients.join(", ")
            )
        })
        .collect();

    format!(
        r#"You are a friendly nutrition coach.
Here is the user's meal plan for the week:
{}
Evaluate the overall nutritional balance of the week and give a few practical tips.
Return ONLY a JSON object with the keys "analysis" (string) and "advice" (array of strings).
Do not include any markdown formatting or explanations.
{}"#,
        plan.join("\n"),
        language_directive(language)
    )
}

/// Generate ingredients, recipe, image keywords and nutrition for a dish
///
/// Returns `None` for an empty title, on service failure, or when the answer
/// carries no usable JSON object.
#[instrument(skip(generator), fields(provider = generator.provider_name()))]
pub async fn generate_meal_info(
    generator: &dyn TextGenerator,
    title: &str,
    language: Language,
) -> Option<MealInfo> {
    if title.trim().is_empty() {
        return None;
    }

    let response = match generator.complete(&meal_info_prompt(title, language)).await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Failed to generate meal info");
            return None;
        }
    };

    match extract_json_object::<MealInfo>(&response) {
        Ok(mut info) => {
            info.ingredients.retain(|i| !i.trim().is_empty());
            info!(ingredients = info.ingredients.len(), "Generated meal info");
            Some(info)
        }
        Err(e) => {
            error!(error = %e, "Meal info response could not be parsed");
            None
        }
    }
}

/// Ask for a nutrition analysis of the planned week
#[instrument(skip(generator, meals), fields(provider = generator.provider_name(), meals = meals.len()))]
pub async fn analyze_week(
    generator: &dyn TextGenerator,
    meals: &[Meal],
    language: Language,
) -> WeeklyReport {
    if meals.is_empty() {
        return WeeklyReport::NoMeals;
    }

    let response = match generator.complete(&weekly_analysis_prompt(meals, language)).await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Weekly analysis request failed");
            return WeeklyReport::Failed;
        }
    };

    match extract_json_object::<WeeklyAnalysis>(&response) {
        Ok(analysis) => WeeklyReport::Ready(analysis),
        Err(e) => {
            error!(error = %e, "Weekly analysis response could not be parsed");
            WeeklyReport::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ServiceError;
    use crate::llm::FakeGenerator;
    use crate::meal_model::{Day, Slot};

    const STEW: &str = r#"```json
{
  "ingredients": ["Kimchi", "Pork 200g", "Tofu", " "],
  "recipe": "Simmer everything.",
  "imageKeywords": "kimchi stew",
  "nutrition": {"calories": 450, "carbs": "20g", "protein": "30g", "fat": "25g"}
}
```"#;

    #[tokio::test]
    async fn test_generate_meal_info() {
        let fake = FakeGenerator::new().with_response("Kimchi Stew", STEW);

        let info = generate_meal_info(&fake, "Kimchi Stew", Language::Ko)
            .await
            .unwrap();

        assert_eq!(info.ingredients, vec!["Kimchi", "Pork 200g", "Tofu"]);
        assert_eq!(info.image_keywords, "kimchi stew");
        assert_eq!(info.nutrition.unwrap().calories, "450");
        assert!(fake.prompts()[0].contains("Output MUST be in Korean."));
    }

    #[tokio::test]
    async fn test_generate_meal_info_soft_failures() {
        let fake = FakeGenerator::new().with_default_response(STEW);
        assert!(generate_meal_info(&fake, "  ", Language::En).await.is_none());
        assert_eq!(fake.call_count(), 0);

        let offline = FakeGenerator::new().failing(ServiceError::Network("offline".to_string()));
        assert!(generate_meal_info(&offline, "Bibimbap", Language::En).await.is_none());

        let garbled = FakeGenerator::new().with_default_response("{\"recipe\": \"no list\"}");
        assert!(generate_meal_info(&garbled, "Bibimbap", Language::En).await.is_none());
    }

    #[tokio::test]
    async fn test_analyze_week() {
        let meals = vec![Meal {
            id: "m1".to_string(),
            day: Day::Monday,
            slot: Slot::Dinner,
            title: "Bibimbap".to_string(),
            ingredients: vec!["Rice".to_string(), "Egg".to_string()],
            recipe: String::new(),
            image_keywords: String::new(),
            nutrition: None,
            image_url: None,
        }];
        let fake = FakeGenerator::new().with_default_response(
            r#"{"analysis": "Balanced.", "advice": ["Eat more greens"]}"#,
        );

        let report = analyze_week(&fake, &meals, Language::En).await;

        assert_eq!(
            report,
            WeeklyReport::Ready(WeeklyAnalysis {
                analysis: "Balanced.".to_string(),
                advice: vec!["Eat more greens".to_string()],
            })
        );
        assert!(fake.prompts()[0].contains("- Monday Dinner: Bibimbap (Rice, Egg)"));
    }

    #[tokio::test]
    async fn test_analyze_empty_week_sends_nothing() {
        let fake = FakeGenerator::new();
        assert_eq!(analyze_week(&fake, &[], Language::Ko).await, WeeklyReport::NoMeals);
        assert_eq!(fake.call_count(), 0);

    }

    #[tokio::test]
    async fn test_analyze_week_unparsable_answer_fails() {
        let meals: Vec<Meal> = serde_json::from_str(
            r#"[{"id":"m1","day":"Friday","slot":"Lunch","title":"Ramen"}]"#,
        )
        .unwrap();
        let broken = FakeGenerator::new().with_default_response("nope");
        assert_eq!(analyze_week(&broken, &meals, Language::Ko).await, WeeklyReport::Failed);
    }
}
