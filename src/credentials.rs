//! Keyring storage for the news API bearer token.

use keyring::Entry;

const API_TOKEN_SERVICE_NAME: &str = "newsdesk.api.token";

fn api_token_entry(profile: &str) -> Result<Entry, String> {
    Entry::new(API_TOKEN_SERVICE_NAME, profile)
        .map_err(|err| format!("failed to create keyring entry: {err}"))
}

/// Saves the bearer token for a profile into the OS keyring.
pub fn set_api_token(profile: &str, token: &str) -> Result<(), String> {
    let token = token.trim();
    if token.is_empty() {
        return Err("token cannot be empty".to_string());
    }
    let entry = api_token_entry(profile)?;
    entry
        .set_password(token)
        .map_err(|err| format!("failed to set keyring password: {err}"))
}

/// Loads the bearer token for a profile; `None` when nothing was stored.
pub fn get_api_token(profile: &str) -> Result<Option<String>, String> {
    let entry = api_token_entry(profile)?;
    match entry.get_password() {
        Ok(token) => Ok(Some(token)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(format!("failed to get keyring password: {err}")),
    }
}

pub fn clear_api_token(profile: &str) -> Result<(), String> {
    let entry = api_token_entry(profile)?;
    match entry.delete_password() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(err) => Err(format!("failed to delete keyring password: {err}")),
    }
}

/// Token for outgoing requests; keyring failures degrade to anonymous access.
pub fn load_api_token_or_anonymous(profile: &str) -> Option<String> {
    match get_api_token(profile) {
        Ok(Some(token)) if !token.trim().is_empty() => Some(token),
        Ok(_) => {
            log::debug!("Credentials: no API token stored for profile {}", profile);
            None
        }
        Err(err) => {
            log::warn!("Credentials: {}; continuing without a token", err);
            None
        }
    }
}
