//! Internationalization (i18n) module for multi-language support.
//!
//! The booking core never renders text itself: it produces message keys
//! (`validation.name.tooShort`, `booking.success.message`, ...) and resolves
//! them through the [`Translate`] capability.
//!
//! # Architecture
//!
//! - `registry`: supported languages, their direction and default/canonical roles
//! - `language`: validated `Language` type
//! - `strings`: static catalogs for English, Arabic and Kurdish
//! - `translator`: key lookup with fallback and `{placeholder}` interpolation
//! - `validator`: catalog completeness checks
//!
//! # Example
//!
//! ```rust,ignore
//! use mam_center_booking::i18n::{Language, Translate, Translator};
//!
//! let translator = Translator::new(Language::from_code("ar")?);
//! assert!(translator.direction().is_rtl());
//! let title = translator.translate("booking.title", &[]);
//! ```

mod language;
mod registry;
pub mod strings;
mod translator;
mod validator;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry, TextDirection};
pub use strings::LanguageStrings;
pub use translator::{interpolate, Translate, Translator};
pub use validator::{CatalogReport, CatalogValidator};
