use std::path::{Path, PathBuf};

use log::{info, warn};
use toml_edit::{value, DocumentMut, Item, Table};

use crate::config::{sanitize_config, Config, SelectedLanguageConfig};

pub const CONFIG_DIR_NAME: &str = "newsdesk";
pub const CONFIG_FILE_NAME: &str = "config.toml";

fn set_table_value_preserving_decor(table: &mut Table, key: &str, item: Item) {
    let existing_value_decor = table
        .get(key)
        .and_then(|current| current.as_value().map(|value| value.decor().clone()));
    table[key] = item;
    if let Some(existing_value_decor) = existing_value_decor {
        if let Some(next_value) = table[key].as_value_mut() {
            *next_value.decor_mut() = existing_value_decor;
        }
    }
}

fn ensure_table<'a>(parent: &'a mut Table, key: &str) -> &'a mut Table {
    let should_replace = !matches!(parent.get(key), Some(item) if item.is_table());
    if should_replace {
        parent.insert(key, Item::Table(Table::new()));
    }
    parent[key]
        .as_table_mut()
        .expect("table was inserted above")
}

fn write_language_to_document(
    document: &mut DocumentMut,
    selected: Option<&SelectedLanguageConfig>,
) {
    let language = ensure_table(document.as_table_mut(), "language");
    match selected {
        Some(selected) => {
            let selected_table = ensure_table(language, "selected");
            set_table_value_preserving_decor(selected_table, "id", value(selected.id.clone()));
            set_table_value_preserving_decor(
                selected_table,
                "code",
                value(selected.code.clone()),
            );
            set_table_value_preserving_decor(
                selected_table,
                "name",
                value(selected.name.clone()),
            );
        }
        None => {
            language.remove("selected");
        }
    }
}

/// Rewrites only the `[language.selected]` table of an existing config text.
pub fn serialize_language_with_preserved_comments(
    existing_text: &str,
    selected: Option<&SelectedLanguageConfig>,
) -> Result<String, String> {
    let mut document = existing_text
        .parse::<DocumentMut>()
        .map_err(|err| format!("failed to parse existing config: {err}"))?;
    write_language_to_document(&mut document, selected);
    Ok(document.to_string())
}

/// Persists the language selection, keeping comments and unrelated keys intact.
pub fn persist_language_selection(path: &Path, selected: Option<&SelectedLanguageConfig>) {
    let existing_text = std::fs::read_to_string(path).ok();
    let config_text = match existing_text {
        Some(existing_text) => {
            match serialize_language_with_preserved_comments(&existing_text, selected) {
                Ok(updated_text) => Some(updated_text),
                Err(err) => {
                    warn!(
                        "Failed to preserve config comments for {} ({}). Falling back to plain serialization.",
                        path.display(),
                        err
                    );
                    let mut config = toml::from_str::<Config>(&existing_text).unwrap_or_default();
                    config.language.selected = selected.cloned();
                    toml::to_string(&config).ok()
                }
            }
        }
        None => {
            let mut config = Config::default();
            config.language.selected = selected.cloned();
            toml::to_string(&config).ok()
        }
    };

    let Some(config_text) = config_text else {
        log::error!("Failed to serialize config for {}", path.display());
        return;
    };

    if let Err(err) = std::fs::write(path, config_text) {
        log::error!("Failed to persist config to {}: {}", path.display(), err);
    }
}

/// Default config location under the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|root| root.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Loads `path`, creating it with defaults when it does not exist yet.
///
/// Unreadable or unparsable files fall back to defaults without being overwritten.
pub fn load_config_file(path: &Path) -> Config {
    if !path.exists() {
        let default_config = sanitize_config(Config::default());
        info!(
            "Config file not found. Creating default config. path={}",
            path.display()
        );
        if let Some(parent) = path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                warn!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    err
                );
            }
        }
        match toml::to_string(&default_config) {
            Ok(text) => {
                if let Err(err) = std::fs::write(path, text) {
                    warn!("Failed to write default config {}: {}", path.display(), err);
                }
            }
            Err(err) => warn!("Failed to serialize default config: {}", err),
        }
        return default_config;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!(
                "Failed to read config file {}. Using defaults. error={}",
                path.display(),
                err
            );
            return sanitize_config(Config::default());
        }
    };

    match toml::from_str::<Config>(&content) {
        Ok(config) => sanitize_config(config),
        Err(err) => {
            warn!(
                "Failed to parse config file {}. Using defaults. error={}",
                path.display(),
                err
            );
            sanitize_config(Config::default())
        }
    }
}
