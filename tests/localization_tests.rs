//! # Localization Tests
//!
//! Message retrieval in both display languages, argument formatting and the
//! fallback chain.

use meal_planner::localization::{Language, LocalizationManager};
use meal_planner::meal_model::{Day, Slot};
use std::collections::HashMap;

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_localization() -> LocalizationManager {
        LocalizationManager::new().expect("Failed to create localization manager")
    }

    #[test]
    fn test_every_day_and_slot_is_translated() {
        let manager = setup_localization();
        for language in Language::ALL {
            for day in Day::ALL {
                assert!(manager.has_message(day.as_str(), language), "{day} missing in {language}");
            }
            for slot in Slot::ALL {
                assert!(manager.has_message(slot.as_str(), language), "{slot} missing in {language}");
            }
        }
        assert_eq!(manager.get_message("Sunday", Language::Ko, None), "일요일");
        assert_eq!(manager.get_message("Lunch", Language::Ko, None), "점심");
    }

    #[test]
    fn test_get_message_with_args_map() {
        let manager = setup_localization();
        let mut args = HashMap::new();
        args.insert("count", "3");

        assert_eq!(
            manager.get_message("shopping-cleared", Language::En, Some(&args)),
            "Removed 3 purchased items."
        );
        assert_eq!(
            manager.get_message("shopping-cleared", Language::Ko, Some(&args)),
            "구매 완료 항목 3개를 삭제했습니다."
        );
    }

    #[test]
    fn test_translator_follows_language() {
        let manager = setup_localization();
        let ko = manager.translator(Language::Ko);
        let en = manager.translator(Language::En);

        assert_eq!(ko.t("shopping-title"), "장보기 목록");
        assert_eq!(en.t("shopping-title"), "Shopping List");
        assert_eq!(
            ko.t_args("home-summary", &[("day", "월요일")]),
            "월요일 요약입니다."
        );
    }

    #[test]
    fn test_missing_key_is_visible() {
        let manager = setup_localization();
        assert_eq!(
            manager.translator(Language::En).t("nonexistent-key"),
            "Missing translation: nonexistent-key"
        );
    }

    #[test]
    fn test_korean_messages_are_a_subset_of_english() {
        let manager = setup_localization();
        let keys = [
            "home-greeting",
            "home-todays-menu",
            "meal-saved",
            "shopping-merge-failed",
            "recipes-title",
            "analysis-no-meals",
            "settings-theme",
        ];
        for key in keys {
            assert!(manager.has_message(key, Language::En), "{key}");
            assert!(manager.has_message(key, Language::Ko), "{key}");
        }
    }
}
