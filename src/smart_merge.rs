//! # Smart Merge Module
//!
//! AI-assisted cleanup of the aggregated shopping list. The result only
//! replaces the *displayed* list; meals and the checked/hidden maps are never
//! touched. One merge may be in flight at a time.

use tracing::{error, info, instrument};

use crate::busy::BusyFlag;
use crate::errors::ServiceError;
use crate::llm::{extract_string_list, TextGenerator};
use crate::localization::Language;
use crate::shopping_list::{ShoppingItem, StateMap};

/// Build the list-normalization prompt
pub fn merge_prompt(names: &[String], language: Language) -> String {
    let list = serde_json::to_string(names).unwrap_or_else(|_| format!("{names:?}"));
    format!(
        r#"You are a helpful shopping assistant.
The user will provide a shopping list of ingredient names collected from several recipes.
Merge duplicates and near-duplicates (different spellings, plural forms, quantities or notes) into one clean ingredient name each.
Return ONLY a JSON object with a single key "normalized" which is an array of strings.
Do not include any markdown formatting or explanations.
Output MUST be in {}.
Example input: ["Egg", "eggs", "Green onion", "Scallion 1"]
Example output: {{ "normalized": ["Egg", "Scallion"] }}

Input: {}"#,
        language.english_name(),
        list
    )
}

/// Smart-merge adapter with its own busy flag
#[derive(Debug, Clone, Default)]
pub struct SmartMerge {
    busy: BusyFlag,
}

impl SmartMerge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a merge is in flight
    pub fn is_merging(&self) -> bool {
        self.busy.is_busy()
    }

    /// Ask the text-generation service for a cleaned, deduplicated name list
    ///
    /// Returns [`ServiceError::Busy`] without calling the service while another
    /// merge is running. An empty input yields an empty list without a call.
    #[instrument(skip(self, generator, names), fields(provider = generator.provider_name(), names = names.len()))]
    pub async fn merge(
        &self,
        generator: &dyn TextGenerator,
        names: &[String],
        language: Language,
    ) -> Result<Vec<String>, ServiceError> {
        let _guard = self.busy.try_acquire().ok_or(ServiceError::Busy)?;

        if names.is_empty() {
            return Ok(Vec::new());
        }

        let response = generator
            .complete(&merge_prompt(names, language))
            .await
            .map_err(|e| {
                error!(error = %e, "Smart merge request failed");
                e
            })?;

        let merged = extract_string_list(&response, "normalized").map_err(|e| {
            error!(error = %e, "Smart merge response could not be parsed");
            e
        })?;

        let cleaned = dedup_names(merged);
        info!(before = names.len(), after = cleaned.len(), "Smart merge completed");
        Ok(cleaned)
    }
}

/// Trim names, drop empty ones and exact duplicates, keeping first occurrences
fn dedup_names(names: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty() && seen.insert(name.clone()))
        .collect()
}

/// Wrap merged names into display records
///
/// Each record has a count of one; `checked` is kept only for exact name
/// matches in the checked map. Hidden names are left out.
pub fn override_items(names: &[String], checked: &StateMap, hidden: &StateMap) -> Vec<ShoppingItem> {
    names
        .iter()
        .filter(|name| !hidden.get(name.as_str()).copied().unwrap_or(false))
        .map(|name| ShoppingItem {
            name: name.clone(),
            count: 1,
            checked: checked.get(name.as_str()).copied().unwrap_or(false),
        })
        .collect()
}
