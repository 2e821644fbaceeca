//! Content-language preference: lookup, persistence, and change notification.

use std::path::PathBuf;
use std::sync::RwLock;

use log::{debug, info, warn};
use tokio::sync::broadcast::{self, Receiver, Sender};

use crate::config::{LanguageConfig, SelectedLanguageConfig};
use crate::config_persistence::{load_config_file, persist_language_selection};

const CHANGE_CHANNEL_CAPACITY: usize = 16;
const FALLBACK_INTERFACE_CODE: &str = "en";

/// Interface locale code to upstream language id.
const LANGUAGE_IDS_BY_CODE: &[(&str, &str)] = &[
    ("en", "5dd95034-d533-4b09-8687-cd2ed3682ab6"),
    ("te", "90255d91-aead-47c9-ba76-ea85e75dc68b"),
    ("hi", "d9badd6f-ffb3-4fff-91aa-b14c7af45e06"),
    ("kn", "22172f29-f60e-4875-be34-1fdb05106e3d"),
    ("ur", "ba9c4fc4-f346-470e-bdd4-8e3a6a0f3ed1"),
    ("ta", "f316a270-bf20-4a2c-90ae-3cb19fae65fb"),
];

/// Maps an interface code to a language id; unknown codes resolve to English.
pub fn language_id_for_code(code: &str) -> &'static str {
    let code = code.trim().to_ascii_lowercase();
    let lookup = |wanted: &str| {
        LANGUAGE_IDS_BY_CODE
            .iter()
            .find(|(candidate, _)| *candidate == wanted)
            .map(|(_, id)| *id)
    };
    lookup(&code)
        .or_else(|| lookup(FALLBACK_INTERFACE_CODE))
        .unwrap_or_default()
}

/// Process-wide "current language" lookup, consulted when a request has none.
pub trait CurrentLanguage: Send + Sync {
    fn current_language_id(&self) -> String;
}

/// Fixed language, for callers that never switch.
#[derive(Debug, Clone)]
pub struct StaticLanguage(pub String);

impl CurrentLanguage for StaticLanguage {
    fn current_language_id(&self) -> String {
        self.0.clone()
    }
}

/// Language chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePreference {
    pub id: String,
    pub code: String,
    pub name: String,
}

impl From<SelectedLanguageConfig> for LanguagePreference {
    fn from(selected: SelectedLanguageConfig) -> Self {
        Self {
            id: selected.id,
            code: selected.code,
            name: selected.name,
        }
    }
}

impl From<&LanguagePreference> for SelectedLanguageConfig {
    fn from(preference: &LanguagePreference) -> Self {
        Self {
            id: preference.id.clone(),
            code: preference.code.clone(),
            name: preference.name.clone(),
        }
    }
}

/// Notification sent to subscribers whenever the effective selection changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageChange {
    pub selected: Option<LanguagePreference>,
    /// Effective id after the change.
    pub language_id: String,
}

#[derive(Debug, Clone)]
struct LanguageState {
    selected: Option<LanguagePreference>,
    interface_code: String,
}

impl LanguageState {
    fn effective_id(&self) -> String {
        match &self.selected {
            Some(selected) if !selected.id.trim().is_empty() => selected.id.clone(),
            _ => language_id_for_code(&self.interface_code).to_string(),
        }
    }
}

/// Holds the selected language, persists changes, and fans them out to subscribers.
pub struct LanguagePreferenceStore {
    state: RwLock<LanguageState>,
    config_path: Option<PathBuf>,
    changes: Sender<LanguageChange>,
}

impl LanguagePreferenceStore {
    /// Creates a store seeded from config; `config_path` enables persistence.
    pub fn new(config: &LanguageConfig, config_path: Option<PathBuf>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(LanguageState {
                selected: config.selected.clone().map(LanguagePreference::from),
                interface_code: config.interface_code.clone(),
            }),
            config_path,
            changes,
        }
    }

    /// Subscribes to selection changes made after this call.
    pub fn on_language_preference_change(&self) -> Receiver<LanguageChange> {
        self.changes.subscribe()
    }

    pub fn selected(&self) -> Option<LanguagePreference> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.selected.clone())
    }

    /// Stores a new selection; a blank id is rejected.
    pub fn select(&self, preference: LanguagePreference) -> Result<(), String> {
        if preference.id.trim().is_empty() {
            return Err("language id cannot be empty".to_string());
        }
        self.apply_selection(Some(preference), true);
        Ok(())
    }

    pub fn clear(&self) {
        self.apply_selection(None, true);
    }

    /// Re-reads the persisted selection, e.g. after another process changed it.
    pub fn refresh_from_disk(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        let config = load_config_file(path);
        let persisted = config.language.selected.map(LanguagePreference::from);
        self.apply_selection(persisted, false);
    }

    fn apply_selection(&self, selected: Option<LanguagePreference>, persist: bool) {
        let change = {
            let Ok(mut state) = self.state.write() else {
                warn!("LanguagePreferenceStore: state lock poisoned, selection ignored");
                return;
            };
            if state.selected == selected {
                debug!("LanguagePreferenceStore: selection unchanged");
                return;
            }
            state.selected = selected;
            LanguageChange {
                selected: state.selected.clone(),
                language_id: state.effective_id(),
            }
        };

        if persist {
            if let Some(path) = &self.config_path {
                let persisted = change.selected.as_ref().map(SelectedLanguageConfig::from);
                persist_language_selection(path, persisted.as_ref());
            }
        }
        info!(
            "LanguagePreferenceStore: language changed to {}",
            change.language_id
        );
        let _ = self.changes.send(change);
    }
}

impl CurrentLanguage for LanguagePreferenceStore {
    fn current_language_id(&self) -> String {
        self.state
            .read()
            .map(|state| state.effective_id())
            .unwrap_or_else(|_| language_id_for_code(FALLBACK_INTERFACE_CODE).to_string())
    }
}
