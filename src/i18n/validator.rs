//! Catalog consistency validation.
//!
//! Every shipped catalog is checked against the canonical (English) catalog:
//! a key that the canonical catalog defines must exist in every other catalog,
//! and the `{placeholder}` names used by a message must survive translation.

use crate::i18n::{Language, LanguageStrings};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Report describing the differences between two catalogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogReport {
    /// Problems that make a catalog unusable (missing keys, broken placeholders)
    pub errors: Vec<String>,

    /// Non-critical findings (extra keys, empty values)
    pub warnings: Vec<String>,
}

impl CatalogReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// No errors and no warnings.
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for CatalogReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for catalog completeness.
pub struct CatalogValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl CatalogValidator {
    /// Compare `catalog` against `canonical`.
    pub fn validate(canonical: &LanguageStrings, catalog: &LanguageStrings) -> CatalogReport {
        let mut report = CatalogReport::new();

        for (key, source) in canonical.entries() {
            let Some(translated) = catalog.get(key) else {
                report
                    .errors
                    .push(format!("[{}] missing key '{}'", catalog.code, key));
                continue;
            };

            if translated.trim().is_empty() {
                report
                    .warnings
                    .push(format!("[{}] empty value for '{}'", catalog.code, key));
            }

            let expected = Self::extract_placeholders(source);
            let actual = Self::extract_placeholders(translated);
            if expected != actual {
                report.errors.push(format!(
                    "[{}] placeholder mismatch for '{}': expected {:?}, found {:?}",
                    catalog.code, key, expected, actual
                ));
            }
        }

        for key in catalog.keys() {
            if canonical.get(key).is_none() {
                report
                    .warnings
                    .push(format!("[{}] unknown key '{}'", catalog.code, key));
            }
        }

        report
    }

    /// Check the catalog of every enabled language against the canonical one.
    pub fn validate_enabled() -> CatalogReport {
        let canonical = LanguageStrings::for_language(Language::canonical());
        let mut report = CatalogReport::new();

        for language in Language::enabled().into_iter().filter(|lang| !lang.is_canonical()) {
            let found = Self::validate(canonical, LanguageStrings::for_language(language));
            report.errors.extend(found.errors);
            report.warnings.extend(found.warnings);
        }

        report
    }

    /// Whether a catalog defines every key in `keys`.
    pub fn missing_keys<'a>(
        catalog: &LanguageStrings,
        keys: impl IntoIterator<Item = &'a str>,
    ) -> Vec<&'a str> {
        keys.into_iter()
            .filter(|key| catalog.get(key).is_none())
            .collect()
    }

    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{([a-zA-Z_]+)\}").unwrap());

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::strings::{ARABIC_STRINGS, ENGLISH_STRINGS, KURDISH_STRINGS};

    #[test]
    fn test_shipped_catalogs_are_clean() {
        for catalog in [&ARABIC_STRINGS, &KURDISH_STRINGS] {
            let report = CatalogValidator::validate(&ENGLISH_STRINGS, catalog);
            assert!(report.is_clean(), "{:?}", report);
        }
    }

    #[test]
    fn test_validate_enabled_is_clean() {
        let report = CatalogValidator::validate_enabled();
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn test_canonical_against_itself_is_clean() {
        assert!(CatalogValidator::validate(&ENGLISH_STRINGS, &ENGLISH_STRINGS).is_clean());
    }

    #[test]
    fn test_extract_placeholders() {
        let found = CatalogValidator::extract_placeholders("Hi {name}, call {phone} or {name}");
        let expected: BTreeSet<String> = ["name", "phone"].iter().map(|s| s.to_string()).collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_extract_placeholders_none() {
        assert!(CatalogValidator::extract_placeholders("No placeholders").is_empty());
    }

    #[test]
    fn test_missing_keys() {
        let missing = CatalogValidator::missing_keys(
            &ENGLISH_STRINGS,
            ["calendar.title", "calendar.nonexistent"],
        );
        assert_eq!(missing, vec!["calendar.nonexistent"]);
    }

    #[test]
    fn test_report_flags() {
        let mut report = CatalogReport::default();
        assert!(report.is_clean());
        report.warnings.push("w".to_string());
        assert!(report.has_warnings());
        assert!(!report.has_errors());
        assert!(!report.is_clean());
    }
}
