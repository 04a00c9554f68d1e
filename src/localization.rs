//! # Localization Module
//!
//! Fluent message bundles for the two display languages. A message missing in
//! the requested language falls back to English, then to a visible marker.

use anyhow::{anyhow, Result};
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;
use unic_langid::LanguageIdentifier;

const EN_MESSAGES: &str = include_str!("../locales/en/main.ftl");
const KO_MESSAGES: &str = include_str!("../locales/ko/main.ftl");

/// Display language of the planner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ko,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Ko, Language::En];

    /// Two-letter language code
    pub fn code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }

    /// Name used in prompts sent to the text-generation service
    pub fn english_name(&self) -> &'static str {
        match self {
            Language::Ko => "Korean",
            Language::En => "English",
        }
    }

    /// The other language
    pub fn toggle(&self) -> Self {
        match self {
            Language::Ko => Language::En,
            Language::En => Language::Ko,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ko" | "korean" | "한국어" => Ok(Language::Ko),
            "en" | "english" => Ok(Language::En),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// Colour theme preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Dark,
    Nature,
    Monochrome,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Default, Theme::Dark, Theme::Nature, Theme::Monochrome];

    pub fn key(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Dark => "dark",
            Theme::Nature => "nature",
            Theme::Monochrome => "monochrome",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::Default => "Pastel Dream",
            Theme::Dark => "Neon Nights",
            Theme::Nature => "Forest Whisper",
            Theme::Monochrome => "Modern Mono",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Theme::ALL
            .iter()
            .copied()
            .find(|theme| theme.key() == wanted || theme.display_name().to_lowercase() == wanted)
            .ok_or_else(|| format!("unknown theme: {s}"))
    }
}

/// Localization manager holding one bundle per language
pub struct LocalizationManager {
    bundles: HashMap<Language, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a new localization manager with the embedded message files
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();
        for language in Language::ALL {
            bundles.insert(language, Self::create_bundle(language, Self::messages(language))?);
        }
        Ok(Self { bundles })
    }

    /// Embedded message file of a language
    fn messages(language: Language) -> &'static str {
        match language {
            Language::Ko => KO_MESSAGES,
            Language::En => EN_MESSAGES,
        }
    }

    /// Create a fluent bundle for a specific language
    fn create_bundle(language: Language, source: &str) -> Result<FluentBundle<FluentResource>> {
        let locale: LanguageIdentifier = language.code().parse()?;
        let mut bundle = FluentBundle::new(vec![locale]);
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string()).map_err(|(_, errors)| {
            anyhow!("invalid {} message file: {:?}", language.code(), errors)
        })?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("duplicate {} messages: {:?}", language.code(), errors))?;

        Ok(bundle)
    }

    /// Get a localized message, falling back to English and then to a marker
    pub fn get_message(
        &self,
        key: &str,
        language: Language,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let fluent_args = args.map(|args| {
            FluentArgs::from_iter(args.iter().map(|(k, v)| (*k, FluentValue::from(*v))))
        });

        [language, Language::En]
            .iter()
            .find_map(|lang| self.format(*lang, key, fluent_args.as_ref()))
            .unwrap_or_else(|| format!("Missing translation: {}", key))
    }

    /// Get a localized message with simple string arguments
    pub fn get_message_with_args(
        &self,
        key: &str,
        language: Language,
        args: &[(&str, &str)],
    ) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message(key, language, Some(&args_map))
    }

    /// Whether the language's own bundle carries the key
    pub fn has_message(&self, key: &str, language: Language) -> bool {
        self.bundles
            .get(&language)
            .map(|bundle| bundle.has_message(key))
            .unwrap_or(false)
    }

    /// Bind the manager to one language
    pub fn translator(&self, language: Language) -> Translator<'_> {
        Translator {
            manager: self,
            language,
        }
    }

    fn format(&self, language: Language, key: &str, args: Option<&FluentArgs>) -> Option<String> {
        let bundle = self.bundles.get(&language)?;
        let pattern = bundle.get_message(key)?.value()?;

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, args, &mut errors).into_owned();
        if !errors.is_empty() {
            warn!(key, language = %language, ?errors, "Message formatted with errors");
        }
        Some(value)
    }
}

/// A [`LocalizationManager`] bound to the current display language
#[derive(Clone, Copy)]
pub struct Translator<'a> {
    manager: &'a LocalizationManager,
    language: Language,
}

impl Translator<'_> {
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn t(&self, key: &str) -> String {
        self.manager.get_message(key, self.language, None)
    }

    pub fn t_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.manager.get_message_with_args(key, self.language, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parsing_and_toggle() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!("ko".parse::<Language>().unwrap(), Language::Ko);
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::default(), Language::Ko);
        assert_eq!(Language::Ko.toggle(), Language::En);
        assert_eq!(Language::En.toggle().toggle(), Language::En);
    }

    #[test]
    fn test_language_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Language::Ko).unwrap(), "\"ko\"");
        let parsed: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Language::En);
    }

    #[test]
    fn test_theme_parsing() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!("Forest Whisper".parse::<Theme>().unwrap(), Theme::Nature);
        assert!("rainbow".parse::<Theme>().is_err());
        assert_eq!(Theme::default().display_name(), "Pastel Dream");
    }

    #[test]
    fn test_day_and_slot_labels() {
        let manager = LocalizationManager::new().unwrap();
        assert_eq!(manager.get_message("Monday", Language::Ko, None), "월요일");
        assert_eq!(manager.get_message("Breakfast", Language::Ko, None), "아침");
        assert_eq!(manager.get_message("Dinner", Language::En, None), "Dinner");
    }

    #[test]
    fn test_bundle_loaded_for_every_language() {
        let manager = LocalizationManager::new().unwrap();
        for language in Language::ALL {
            assert!(manager.has_message("Monday", language), "no bundle for {language}");
        }
    }

    #[test]
    fn test_arguments_are_not_isolated() {
        let manager = LocalizationManager::new().unwrap();
        let text = manager.get_message_with_args("home-summary", Language::En, &[("day", "Friday")]);
        assert_eq!(text, "Here's your summary for Friday.");
    }

    #[test]
    fn test_fallback_to_english_then_marker() {
        let manager = LocalizationManager::new().unwrap();
        assert!(!manager.has_message("recipes-not-found", Language::Ko));
        assert_eq!(
            manager.get_message_with_args("recipes-not-found", Language::Ko, &[("id", "r1")]),
            "No recipe found with id r1."
        );
        assert_eq!(
            manager.get_message("no-such-key", Language::Ko, None),
            "Missing translation: no-such-key"
        );
    }
}
