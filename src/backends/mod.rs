//! News backend abstractions and concrete implementations.

#[cfg(test)]
pub mod fake;
pub mod news_api;

use crate::content::{Category, ContentItem, Language};
use crate::errors::ApiError;

/// Parameters of one category-filtered search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Comma-joined category ids.
    pub category_ids: String,
    pub language_id: String,
    pub state_id: Option<String>,
    pub district_id: Option<String>,
    /// 1-based.
    pub page: u32,
    pub limit: u32,
}

impl SearchQuery {
    pub fn new(category_ids: impl Into<String>, language_id: impl Into<String>) -> Self {
        Self {
            category_ids: category_ids.into(),
            language_id: language_id.into(),
            state_id: None,
            district_id: None,
            page: 1,
            limit: 8,
        }
    }

    pub fn region(mut self, state_id: &str, district_id: &str) -> Self {
        self.state_id = Some(state_id.to_string());
        self.district_id = Some(district_id.to_string());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }
}

/// Result of a search call; `items` may be empty without being an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub items: Vec<ContentItem>,
}

/// Interface implemented by concrete news API adapters.
pub trait NewsBackend: Send + Sync {
    fn search_by_categories(&self, query: &SearchQuery) -> Result<SearchPage, ApiError>;
    fn list_categories(&self, language_id: &str) -> Result<Vec<Category>, ApiError>;
    fn get_one(&self, id: &str) -> Result<ContentItem, ApiError>;
    fn list_languages(&self) -> Result<Vec<Language>, ApiError>;
}
