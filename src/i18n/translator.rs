//! Key-based translation with fallback and placeholder interpolation.

use crate::i18n::{Language, LanguageStrings, TextDirection};

/// Translation capability consumed by the booking core.
pub trait Translate: Send + Sync {
    /// Resolve `key` and substitute `{placeholder}` params.
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String;

    /// Layout direction of the active language.
    fn direction(&self) -> TextDirection;
}

/// Catalog-backed translator for one language.
///
/// Lookup order: active language, default language (Kurdish), canonical
/// language (English), then the key itself.
#[derive(Debug, Clone, Copy)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn lookup(&self, key: &str) -> Option<&'static str> {
        [self.language, Language::fallback(), Language::canonical()]
            .into_iter()
            .find_map(|language| LanguageStrings::for_language(language).get(key))
    }
}

impl Translate for Translator {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
        match self.lookup(key) {
            Some(template) => interpolate(template, params),
            None => {
                tracing::debug!("Missing translation for '{}' ({})", key, self.language);
                key.to_string()
            }
        }
    }

    fn direction(&self) -> TextDirection {
        self.language.direction()
    }
}

/// Replace every `{name}` in `template` with its value from `params`.
///
/// Unknown placeholders are left untouched.
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_english() {
        let translator = Translator::new(Language::ENGLISH);
        assert_eq!(
            translator.translate("validation.date.required", &[]),
            "Please select a date"
        );
    }

    #[test]
    fn test_translate_kurdish() {
        let translator = Translator::new(Language::KURDISH);
        assert_eq!(translator.translate("booking.steps.service", &[]), "خزمەتگوزاری");
    }

    #[test]
    fn test_translate_with_params() {
        let translator = Translator::new(Language::ENGLISH);
        let text = translator.translate("booking.success.message", &[("name", "Rebaz")]);
        assert_eq!(text, "Thank you, Rebaz! Your booking request has been received.");
    }

    #[test]
    fn test_translate_arabic_with_params() {
        let translator = Translator::new(Language::ARABIC);
        let text = translator.translate("booking.success.contact", &[("phone", "+964 750 123 4567")]);
        assert!(text.contains("+964 750 123 4567"));
        assert!(!text.contains("{phone}"));
    }

    #[test]
    fn test_unknown_key_returns_key() {
        let translator = Translator::new(Language::ARABIC);
        assert_eq!(translator.translate("nope.nothing", &[]), "nope.nothing");
    }

    #[test]
    fn test_direction_follows_language() {
        assert_eq!(Translator::new(Language::ENGLISH).direction(), TextDirection::Ltr);
        assert_eq!(Translator::new(Language::KURDISH).direction(), TextDirection::Rtl);
    }

    #[test]
    fn test_interpolate_multiple_and_unknown() {
        assert_eq!(
            interpolate("{a} and {b} and {c}", &[("a", "1"), ("b", "2")]),
            "1 and 2 and {c}"
        );
    }

    #[test]
    fn test_interpolate_repeated_placeholder() {
        assert_eq!(interpolate("{x}-{x}", &[("x", "y")]), "y-y");
    }
}
