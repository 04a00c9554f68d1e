//! # Normalization Patterns Module
//!
//! This module contains the regex patterns, qualifier sets and synonym groups
//! used by the ingredient text normalizer.

use lazy_static::lazy_static;
use regex::Regex;

use crate::localization::Language;

/// Separators between independent ingredient entries: ASCII and full-width comma
pub const ENTRY_SEPARATORS: [char; 2] = [',', '，'];

/// Innermost balanced parenthetical annotation, e.g. "(low fat)"; nested groups need repeated passes
pub const PARENTHETICAL_PATTERN: &str = r"\([^()]*\)";

/// Whitespace followed by a digit and everything after it, e.g. " 300g"
pub const TRAILING_QUANTITY_PATTERN: &str = r"\s+\d.*$";

/// Leading number or fraction with an optional common unit, e.g. "1/2 " or "300g "
pub const LEADING_QUANTITY_PATTERN: &str =
    r"^\d+(?:[./]\d+)?(?:\s*(?:g|kg|ml|l|cups?|tbsp|tsp|개|컵|큰술|작은술)\b)?\s*";

/// Count suffix attached without a space, e.g. "2개" in "계란2개"
pub const ATTACHED_COUNT_PATTERN: &str = r"\d+\p{L}*$";

/// English vague quantities, only recognised after whitespace
pub const ENGLISH_VAGUE_PATTERN: &str =
    r"(?i)\s+(?:a\s+pinch(?:\s+of)?|pinch\s+of|to\s+taste|a\s+little|as\s+needed|a\s+dash(?:\s+of)?|optional)\b.*$";

/// Korean vague quantities, which are often written attached to the noun
pub const KOREAN_VAGUE_PATTERN: &str = r"\s*(?:약간|적당량|적당히|조금|소량|한\s?줌).*$";

/// Separator between alternative ingredients: " or ", " 또는 ", " / ", or a dangling one at the end
pub const ALTERNATIVE_PATTERN: &str = r"(?i)\s+(?:or|또는|/)(?:\s+|$)";

lazy_static! {
    pub static ref PARENTHETICAL_REGEX: Regex =
        Regex::new(PARENTHETICAL_PATTERN).expect("Parenthetical pattern should be valid");
    pub static ref TRAILING_QUANTITY_REGEX: Regex =
        Regex::new(TRAILING_QUANTITY_PATTERN).expect("Trailing quantity pattern should be valid");
    pub static ref LEADING_QUANTITY_REGEX: Regex =
        Regex::new(LEADING_QUANTITY_PATTERN).expect("Leading quantity pattern should be valid");
    pub static ref ATTACHED_COUNT_REGEX: Regex =
        Regex::new(ATTACHED_COUNT_PATTERN).expect("Attached count pattern should be valid");
    pub static ref ENGLISH_VAGUE_REGEX: Regex =
        Regex::new(ENGLISH_VAGUE_PATTERN).expect("English qualifier pattern should be valid");
    pub static ref KOREAN_VAGUE_REGEX: Regex =
        Regex::new(KOREAN_VAGUE_PATTERN).expect("Korean qualifier pattern should be valid");
    pub static ref ALTERNATIVE_REGEX: Regex =
        Regex::new(ALTERNATIVE_PATTERN).expect("Alternative pattern should be valid");
}

/// One ingredient concept with its canonical spelling per language
#[derive(Debug, Clone, Copy)]
pub struct SynonymGroup {
    pub english: &'static str,
    pub korean: &'static str,
    /// Exact, case-sensitive spellings folded into this group
    pub aliases: &'static [&'static str],
}

impl SynonymGroup {
    pub fn canonical(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.english,
            Language::Ko => self.korean,
        }
    }

    /// Whether the candidate is one of this group's spellings
    pub fn matches(&self, candidate: &str) -> bool {
        candidate == self.english || candidate == self.korean || self.aliases.contains(&candidate)
    }
}

/// Known ingredient aliases
pub const SYNONYM_GROUPS: &[SynonymGroup] = &[
    SynonymGroup {
        english: "Egg",
        korean: "계란",
        aliases: &["Eggs", "egg", "eggs", "달걀"],
    },
    SynonymGroup {
        english: "Scallion",
        korean: "대파",
        aliases: &[
            "Scallions", "scallion", "scallions", "Green onion", "Green Onion", "green onion",
            "Green onions", "green onions", "Spring onion", "spring onion", "파", "쪽파", "실파",
        ],
    },
    SynonymGroup {
        english: "Garlic",
        korean: "마늘",
        aliases: &["garlic", "Garlic cloves", "Minced garlic", "minced garlic", "다진 마늘", "다진마늘", "통마늘"],
    },
    SynonymGroup {
        english: "Onion",
        korean: "양파",
        aliases: &["onion", "Onions", "onions", "Yellow onion"],
    },
    SynonymGroup {
        english: "Soy sauce",
        korean: "간장",
        aliases: &["Soy Sauce", "soy sauce", "진간장", "양조간장"],
    },
    SynonymGroup {
        english: "Sesame oil",
        korean: "참기름",
        aliases: &["Sesame Oil", "sesame oil"],
    },
    SynonymGroup {
        english: "Red pepper flakes",
        korean: "고춧가루",
        aliases: &["Red Pepper Flakes", "red pepper flakes", "Gochugaru", "gochugaru", "고추가루"],
    },
    SynonymGroup {
        english: "Tofu",
        korean: "두부",
        aliases: &["tofu", "Bean curd", "bean curd"],
    },
    SynonymGroup {
        english: "Pork",
        korean: "돼지고기",
        aliases: &["pork", "돼지 고기"],
    },
    SynonymGroup {
        english: "Chili pepper",
        korean: "고추",
        aliases: &["Chili", "chili", "Chili peppers", "chili pepper", "청양고추", "풋고추"],
    },
];

/// Find the synonym group a candidate belongs to
pub fn find_synonym_group(candidate: &str) -> Option<&'static SynonymGroup> {
    SYNONYM_GROUPS.iter().find(|group| group.matches(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        assert!(!PARENTHETICAL_REGEX.as_str().is_empty());
        assert!(!TRAILING_QUANTITY_REGEX.as_str().is_empty());
        assert!(!LEADING_QUANTITY_REGEX.as_str().is_empty());
        assert!(!ATTACHED_COUNT_REGEX.as_str().is_empty());
        assert!(!ENGLISH_VAGUE_REGEX.as_str().is_empty());
        assert!(!KOREAN_VAGUE_REGEX.as_str().is_empty());
        assert!(!ALTERNATIVE_REGEX.as_str().is_empty());
    }

    #[test]
    fn test_each_spelling_belongs_to_one_group() {
        for group in SYNONYM_GROUPS {
            let spellings = group
                .aliases
                .iter()
                .copied()
                .chain([group.english, group.korean]);
            for spelling in spellings {
                let owners = SYNONYM_GROUPS.iter().filter(|g| g.matches(spelling)).count();
                assert_eq!(owners, 1, "'{}' belongs to {} groups", spelling, owners);
            }
        }
    }

    #[test]
    fn test_canonical_spellings_fold_to_themselves() {
        for group in SYNONYM_GROUPS {
            for language in [Language::En, Language::Ko] {
                let canonical = group.canonical(language);
                let owner = find_synonym_group(canonical).unwrap();
                assert_eq!(owner.canonical(language), canonical);
            }
        }
    }

    #[test]
    fn test_alternative_separator_needs_spaces() {
        assert!(ALTERNATIVE_REGEX.is_match("Butter or Margarine"));
        assert!(ALTERNATIVE_REGEX.is_match("파 또는 대파"));
        assert!(ALTERNATIVE_REGEX.is_match("Rice / Noodles"));
        assert!(ALTERNATIVE_REGEX.is_match("Onion or"));
        assert!(!ALTERNATIVE_REGEX.is_match("1/2 Onion"));
        assert!(!ALTERNATIVE_REGEX.is_match("Orange"));
    }
}
