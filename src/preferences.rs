//! Persisted application preferences: theme, language and signed-in user.

use crate::i18n::{Language, TextDirection, Translator};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Storage key, also the default file stem.
pub const STORAGE_KEY: &str = "mam-center-storage";

const STORAGE_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub language: Language,
    pub user: Option<User>,
}

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to access preference storage: {0}")]
    Io(#[from] io::Error),

    #[error("stored preferences are not valid JSON: {0}")]
    Format(#[from] serde_json::Error),

    #[error("stored preferences have unsupported version {0}")]
    UnsupportedVersion(u32),
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    state: T,
    version: u32,
}

/// Backend for persisted preferences.
pub trait PreferenceStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Preferences>, PreferencesError>;
    fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError>;
}

/// JSON file holding `{"state": {...}, "version": 1}`.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Result<Option<Preferences>, PreferencesError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No stored preferences at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let envelope: Envelope<serde_json::Value> = serde_json::from_str(&text)?;
        if envelope.version != STORAGE_VERSION {
            return Err(PreferencesError::UnsupportedVersion(envelope.version));
        }
        Ok(Some(serde_json::from_value(envelope.state)?))
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let envelope = Envelope {
            state: preferences,
            version: STORAGE_VERSION,
        };
        let json = serde_json::to_string_pretty(&envelope)?;

        // Write then rename so a crash never leaves a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-process store for tests and embedding without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    saved: Mutex<Option<Preferences>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(preferences: Preferences) -> Self {
        Self {
            saved: Mutex::new(Some(preferences)),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Option<Preferences>, PreferencesError> {
        Ok(self.saved.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        *self.saved.lock().unwrap_or_else(|e| e.into_inner()) = Some(preferences.clone());
        Ok(())
    }
}

/// Current preferences, saved on every change and observable through a watch channel.
pub struct AppContext {
    store: Arc<dyn PreferenceStore>,
    state: watch::Sender<Preferences>,
}

impl AppContext {
    /// Load stored preferences, falling back to `defaults` when nothing is
    /// stored or the stored data cannot be read.
    pub fn load(store: Arc<dyn PreferenceStore>, defaults: Preferences) -> Self {
        let preferences = match store.load() {
            Ok(Some(stored)) => {
                debug!("Loaded preferences: language={}, theme={:?}", stored.language, stored.theme);
                stored
            }
            Ok(None) => defaults,
            Err(e) => {
                warn!("Ignoring stored preferences: {}", e);
                defaults
            }
        };

        let (state, _) = watch::channel(preferences);
        Self { store, state }
    }

    pub fn preferences(&self) -> Preferences {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Preferences> {
        self.state.subscribe()
    }

    pub fn language(&self) -> Language {
        self.state.borrow().language
    }

    pub fn theme(&self) -> Theme {
        self.state.borrow().theme
    }

    pub fn translator(&self) -> Translator {
        Translator::new(self.language())
    }

    pub fn direction(&self) -> TextDirection {
        self.language().direction()
    }

    pub fn set_language(&self, language: Language) -> Result<(), PreferencesError> {
        info!("Language set to {}", language);
        self.update(|preferences| preferences.language = language)
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), PreferencesError> {
        self.update(|preferences| preferences.theme = theme)
    }

    pub fn toggle_theme(&self) -> Result<Theme, PreferencesError> {
        self.update(|preferences| preferences.theme = preferences.theme.toggled())?;
        Ok(self.theme())
    }

    pub fn set_user(&self, user: Option<User>) -> Result<(), PreferencesError> {
        self.update(|preferences| preferences.user = user)
    }

    /// Apply the change and notify subscribers, then persist. A failed save
    /// keeps the in-memory change.
    fn update(&self, change: impl FnOnce(&mut Preferences)) -> Result<(), PreferencesError> {
        self.state.send_modify(change);
        let snapshot = self.preferences();
        self.store.save(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            name: "Lana".to_string(),
            email: "lana@example.org".to_string(),
        }
    }

    // ==================== Defaults ====================

    #[test]
    fn test_defaults_are_light_and_kurdish() {
        let preferences = Preferences::default();
        assert_eq!(preferences.theme, Theme::Light);
        assert_eq!(preferences.language, Language::KURDISH);
        assert!(preferences.user.is_none());
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    // ==================== File Store ====================

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("missing.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_envelope_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("mam-center-storage.json");
        let store = FilePreferenceStore::new(&path);

        let preferences = Preferences {
            theme: Theme::Dark,
            language: Language::ARABIC,
            user: Some(user()),
        };
        store.save(&preferences).unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["state"]["theme"], "dark");
        assert_eq!(json["state"]["language"], "ar");
        assert_eq!(json["state"]["user"]["name"], "Lana");

        assert_eq!(store.load().unwrap(), Some(preferences));
    }

    #[test]
    fn test_file_store_rejects_unknown_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"state":{"theme":"dark","language":"en","user":null},"version":2}"#).unwrap();

        let error = FilePreferenceStore::new(&path).load().unwrap_err();
        assert!(matches!(error, PreferencesError::UnsupportedVersion(2)));
    }

    #[test]
    fn test_file_store_rejects_unknown_language() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"state":{"theme":"dark","language":"xx","user":null},"version":1}"#).unwrap();

        let error = FilePreferenceStore::new(&path).load().unwrap_err();
        assert!(matches!(error, PreferencesError::Format(_)));
    }

    #[test]
    fn test_partial_state_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"state":{"theme":"dark"},"version":1}"#).unwrap();

        let preferences = FilePreferenceStore::new(&path).load().unwrap().unwrap();
        assert_eq!(preferences.theme, Theme::Dark);
        assert_eq!(preferences.language, Language::KURDISH);
    }

    // ==================== AppContext ====================

    #[test]
    fn test_context_falls_back_on_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{not json").unwrap();

        let context = AppContext::load(Arc::new(FilePreferenceStore::new(&path)), Preferences::default());
        assert_eq!(context.preferences(), Preferences::default());
    }

    #[test]
    fn test_context_uses_given_defaults_when_empty() {
        let defaults = Preferences {
            language: Language::ENGLISH,
            ..Default::default()
        };
        let context = AppContext::load(Arc::new(MemoryPreferenceStore::new()), defaults);
        assert_eq!(context.language(), Language::ENGLISH);
        assert_eq!(context.direction(), TextDirection::Ltr);
    }

    #[test]
    fn test_context_persists_every_change() {
        let store = Arc::new(MemoryPreferenceStore::new());
        let context = AppContext::load(store.clone(), Preferences::default());

        context.set_language(Language::ARABIC).unwrap();
        assert_eq!(context.toggle_theme().unwrap(), Theme::Dark);
        context.set_user(Some(user())).unwrap();

        let saved = store.load().unwrap().unwrap();
        assert_eq!(saved.language, Language::ARABIC);
        assert_eq!(saved.theme, Theme::Dark);
        assert_eq!(saved.user, Some(user()));
        assert_eq!(context.direction(), TextDirection::Rtl);
    }

    #[test]
    fn test_context_round_trips_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mam-center-storage.json");

        {
            let context = AppContext::load(Arc::new(FilePreferenceStore::new(&path)), Preferences::default());
            context.set_language(Language::ENGLISH).unwrap();
            context.set_theme(Theme::Dark).unwrap();
        }

        let context = AppContext::load(Arc::new(FilePreferenceStore::new(&path)), Preferences::default());
        assert_eq!(context.language(), Language::ENGLISH);
        assert_eq!(context.theme(), Theme::Dark);
    }

    #[test]
    fn test_subscribers_see_changes() {
        let context = AppContext::load(Arc::new(MemoryPreferenceStore::new()), Preferences::default());
        let mut rx = context.subscribe();
        assert!(!rx.has_changed().unwrap());

        context.set_language(Language::ENGLISH).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().language, Language::ENGLISH);
    }

    #[test]
    fn test_translator_follows_language() {
        let store = Arc::new(MemoryPreferenceStore::with(Preferences {
            language: Language::ENGLISH,
            ..Default::default()
        }));
        let context = AppContext::load(store, Preferences::default());
        assert_eq!(
            crate::i18n::Translate::translate(&context.translator(), "calendar.days.sun", &[]),
            "Sun"
        );
    }
}
