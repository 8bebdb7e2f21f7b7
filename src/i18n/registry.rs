//! Language registry: Single source of truth for all supported languages.
//!
//! The venue publishes in English, Arabic and Kurdish (Sorani). Kurdish is the
//! default UI language and the fallback for missing catalog entries, English is
//! the canonical catalog every other catalog is checked against.

use std::sync::OnceLock;

/// Writing direction of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    /// The value used for the HTML `dir` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, TextDirection::Rtl)
    }
}

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "ar", "ku")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "Arabic")
    pub name: &'static str,

    /// Native name of the language (e.g., "العربية", "کوردی")
    pub native_name: &'static str,

    /// Writing direction
    pub direction: TextDirection,

    /// Whether this is the canonical catalog (only one should be true)
    pub is_canonical: bool,

    /// Whether this is the default UI language and catalog fallback
    /// (only one should be true)
    pub is_default: bool,

    /// Whether this language is enabled for use
    pub enabled: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all enabled languages.
    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Get the canonical language configuration.
    ///
    /// # Panics
    /// Panics if there is not exactly one canonical language, which is a
    /// programming error in `default_languages`.
    pub fn canonical(&self) -> &LanguageConfig {
        self.single(|lang| lang.is_canonical, "canonical")
    }

    /// Get the default (and fallback) language configuration.
    ///
    /// # Panics
    /// Panics if there is not exactly one default language.
    pub fn default_language(&self) -> &LanguageConfig {
        self.single(|lang| lang.is_default, "default")
    }

    fn single(&self, predicate: impl Fn(&LanguageConfig) -> bool, what: &str) -> &LanguageConfig {
        let matches: Vec<_> = self.languages.iter().filter(|lang| predicate(lang)).collect();

        match matches.len() {
            0 => panic!("No {} language found in registry", what),
            1 => matches[0],
            _ => panic!("Multiple {} languages found in registry", what),
        }
    }
}

fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            direction: TextDirection::Ltr,
            is_canonical: true,
            is_default: false,
            enabled: true,
        },
        LanguageConfig {
            code: "ar",
            name: "Arabic",
            native_name: "العربية",
            direction: TextDirection::Rtl,
            is_canonical: false,
            is_default: false,
            enabled: true,
        },
        LanguageConfig {
            code: "ku",
            name: "Kurdish",
            native_name: "کوردی",
            direction: TextDirection::Rtl,
            is_canonical: false,
            is_default: true,
            enabled: true,
        },
    ]
}
