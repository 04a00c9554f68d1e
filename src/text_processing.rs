//! # Text Processing Module
//!
//! This module turns free-text ingredient entries into canonical ingredient
//! names, the deduplication keys of the shopping list.
//!
//! ## Features
//!
//! - Comma splitting: `"Onion, Garlic"` is two independent candidates
//! - Quantity stripping in both directions (`"Pork 300g"`, `"1/2 Onion"`, `"계란2개"`)
//! - Removal of parenthetical notes and vague qualifiers (`"to taste"`, `"약간"`)
//! - Alternative resolution (`"Butter or Margarine"` keeps `"Butter"`)
//! - Bilingual synonym folding into the display language's canonical spelling
//!
//! The cleaning steps are an explicit ordered list of [`NormalizationRule`]s.
//! Each rule is independently callable, and a normalizer can be built with a
//! custom order.

use log::{debug, trace};
use std::fmt;

use crate::localization::Language;
use crate::normalization_patterns::{
    find_synonym_group, ALTERNATIVE_REGEX, ATTACHED_COUNT_REGEX, ENGLISH_VAGUE_REGEX,
    ENTRY_SEPARATORS, KOREAN_VAGUE_REGEX, LEADING_QUANTITY_REGEX, PARENTHETICAL_REGEX,
    TRAILING_QUANTITY_REGEX,
};

/// Upper bound on full passes over the rule list in [`IngredientNormalizer::normalize`]
const MAX_NORMALIZATION_PASSES: usize = 4;

/// A single named cleaning step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizationRule {
    /// Trim surrounding whitespace
    Trim,
    /// Remove balanced `(...)` annotations
    StripParenthetical,
    /// Remove whitespace + digits and everything after (`"Onion 1"`)
    StripTrailingQuantity,
    /// Remove a leading number or fraction (`"1/2 Onion"`)
    StripLeadingQuantity,
    /// Remove a count attached without a space (`"계란2개"`)
    StripAttachedCount,
    /// Remove a trailing vague qualifier and anything after it
    StripVagueQualifier,
    /// Keep only the first of several alternatives
    ResolveAlternative,
    /// Replace a known alias with its canonical spelling
    FoldSynonym,
    /// Trim once more before the result is used
    FinalTrim,
}

impl NormalizationRule {
    /// The default pipeline, in application order
    pub const DEFAULT_ORDER: [NormalizationRule; 9] = [
        NormalizationRule::Trim,
        NormalizationRule::StripParenthetical,
        NormalizationRule::StripTrailingQuantity,
        NormalizationRule::StripLeadingQuantity,
        NormalizationRule::StripAttachedCount,
        NormalizationRule::StripVagueQualifier,
        NormalizationRule::ResolveAlternative,
        NormalizationRule::FoldSynonym,
        NormalizationRule::FinalTrim,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NormalizationRule::Trim => "trim",
            NormalizationRule::StripParenthetical => "strip-parenthetical",
            NormalizationRule::StripTrailingQuantity => "strip-trailing-quantity",
            NormalizationRule::StripLeadingQuantity => "strip-leading-quantity",
            NormalizationRule::StripAttachedCount => "strip-attached-count",
            NormalizationRule::StripVagueQualifier => "strip-vague-qualifier",
            NormalizationRule::ResolveAlternative => "resolve-alternative",
            NormalizationRule::FoldSynonym => "fold-synonym",
            NormalizationRule::FinalTrim => "final-trim",
        }
    }

    /// Rules that only run once no parenthesis is left in the candidate
    pub fn requires_clean_parentheses(&self) -> bool {
        matches!(
            self,
            NormalizationRule::ResolveAlternative | NormalizationRule::FoldSynonym
        )
    }

    /// Apply this rule to one candidate; the output is always trimmed
    ///
    /// # Examples
    ///
    /// ```rust
    /// use meal_planner::localization::Language;
    /// use meal_planner::text_processing::NormalizationRule;
    ///
    /// let rule = NormalizationRule::StripParenthetical;
    /// assert_eq!(rule.apply("Milk (low fat)", Language::En), "Milk");
    /// ```
    pub fn apply(&self, input: &str, language: Language) -> String {
        if self.requires_clean_parentheses() && has_parenthetical_remnant(input) {
            trace!("Skipping rule '{}' on '{}': parenthesis remains", self.name(), input);
            return input.trim().to_string();
        }

        let output = match self {
            NormalizationRule::Trim | NormalizationRule::FinalTrim => input.to_string(),
            NormalizationRule::StripParenthetical => {
                // Innermost groups first, until no balanced group is left
                let mut stripped = input.to_string();
                while PARENTHETICAL_REGEX.is_match(&stripped) {
                    stripped = PARENTHETICAL_REGEX.replace_all(&stripped, " ").into_owned();
                }
                stripped.split_whitespace().collect::<Vec<_>>().join(" ")
            }
            NormalizationRule::StripTrailingQuantity => {
                TRAILING_QUANTITY_REGEX.replace(input, "").into_owned()
            }
            NormalizationRule::StripLeadingQuantity => {
                LEADING_QUANTITY_REGEX.replace(input, "").into_owned()
            }
            NormalizationRule::StripAttachedCount => {
                ATTACHED_COUNT_REGEX.replace(input, "").into_owned()
            }
            NormalizationRule::StripVagueQualifier => {
                let english = ENGLISH_VAGUE_REGEX.replace(input, "");
                KOREAN_VAGUE_REGEX.replace(&english, "").into_owned()
            }
            NormalizationRule::ResolveAlternative => ALTERNATIVE_REGEX
                .split(input)
                .next()
                .unwrap_or_default()
                .to_string(),
            NormalizationRule::FoldSynonym => match find_synonym_group(input.trim()) {
                Some(group) => group.canonical(language).to_string(),
                None => input.to_string(),
            },
        };

        output.trim().to_string()
    }
}

impl fmt::Display for NormalizationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether an opening or closing parenthesis is still present
pub fn has_parenthetical_remnant(candidate: &str) -> bool {
    candidate.contains('(') || candidate.contains(')')
}

/// Ingredient text normalizer for one display language
#[derive(Debug, Clone)]
pub struct IngredientNormalizer {
    language: Language,
    rules: Vec<NormalizationRule>,
}

impl IngredientNormalizer {
    /// Create a normalizer with the default rule order
    ///
    /// # Examples
    ///
    /// ```rust
    /// use meal_planner::localization::Language;
    /// use meal_planner::text_processing::IngredientNormalizer;
    ///
    /// let normalizer = IngredientNormalizer::new(Language::En);
    /// assert_eq!(normalizer.normalize("Pork 300g"), Some("Pork".to_string()));
    /// assert_eq!(normalizer.normalize("   "), None);
    /// ```
    pub fn new(language: Language) -> Self {
        Self::with_rules(language, NormalizationRule::DEFAULT_ORDER.to_vec())
    }

    /// Create a normalizer with a custom ordered rule list
    pub fn with_rules(language: Language, rules: Vec<NormalizationRule>) -> Self {
        debug!(
            "Creating IngredientNormalizer for '{}' with {} rules",
            language.code(),
            rules.len()
        );
        Self { language, rules }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn rules(&self) -> &[NormalizationRule] {
        &self.rules
    }

    /// Insert a rule right before `anchor`, or at the end if `anchor` is not in the list
    pub fn insert_rule_before(&mut self, rule: NormalizationRule, anchor: NormalizationRule) {
        let index = self
            .rules
            .iter()
            .position(|r| *r == anchor)
            .unwrap_or(self.rules.len());
        self.rules.insert(index, rule);
    }

    /// Remove every occurrence of a rule
    pub fn remove_rule(&mut self, rule: NormalizationRule) {
        self.rules.retain(|r| *r != rule);
    }

    /// Normalize one candidate name; `None` means the candidate is discarded
    ///
    /// The rule list is re-run until the name stops changing, so text exposed by
    /// a later rule (the first branch of an alternative, for instance) still goes
    /// through the earlier ones. No comma splitting happens here, see
    /// [`normalize_entry`](Self::normalize_entry).
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let mut current = raw.to_string();

        for pass in 0..MAX_NORMALIZATION_PASSES {
            let before = current.clone();

            for rule in &self.rules {
                let next = rule.apply(&current, self.language);
                if next != current {
                    trace!("Rule '{}': '{}' -> '{}'", rule, current, next);
                }
                current = next;
                if current.is_empty() {
                    debug!("Discarding ingredient '{}' after rule '{}'", raw, rule);
                    return None;
                }
            }

            if current == before {
                break;
            }
            if pass + 1 == MAX_NORMALIZATION_PASSES {
                debug!(
                    "Normalization of '{}' still changing after {} passes, keeping '{}'",
                    raw, MAX_NORMALIZATION_PASSES, current
                );
            }
        }

        Some(current)
    }

    /// Split a raw ingredient entry on commas and normalize each part independently
    ///
    /// # Examples
    ///
    /// ```rust
    /// use meal_planner::localization::Language;
    /// use meal_planner::text_processing::IngredientNormalizer;
    ///
    /// let normalizer = IngredientNormalizer::new(Language::En);
    /// assert_eq!(normalizer.normalize_entry("Onion 1, Garlic"), vec!["Onion", "Garlic"]);
    /// ```
    pub fn normalize_entry(&self, raw: &str) -> Vec<String> {
        raw.split(ENTRY_SEPARATORS)
            .filter_map(|segment| self.normalize(segment))
            .collect()
    }
}

impl Default for IngredientNormalizer {
    fn default() -> Self {
        Self::new(Language::default())
    }
}
