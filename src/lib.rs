//! Related-content resolution and resilient article lookup for a news API.

pub mod backends;
pub mod catalog_sweep;
pub mod category_catalog;
pub mod category_lead;
pub mod config;
pub mod config_persistence;
pub mod content;
pub mod credentials;
pub mod degraded_fetch;
pub mod errors;
pub mod language;
pub mod related_resolver;
