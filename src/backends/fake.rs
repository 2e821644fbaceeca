//! Deterministic in-memory backend used by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::backends::{NewsBackend, SearchPage, SearchQuery};
use crate::content::{Category, ContentItem, Language};
use crate::errors::{ApiError, ApiErrorKind};

type SearchHandler = Box<dyn Fn(&SearchQuery) -> Result<Vec<ContentItem>, ApiError> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    Search(SearchQuery),
    ListCategories(String),
    GetOne(String),
    ListLanguages,
}

/// Records every call and answers from scripted responses.
///
/// Search answers come from `on_search` when set, otherwise from the scripted
/// queue in call order; an exhausted queue answers with an empty page.
#[derive(Default)]
pub struct FakeNewsBackend {
    calls: Mutex<Vec<FakeCall>>,
    search_handler: Option<SearchHandler>,
    scripted_searches: Mutex<VecDeque<Result<Vec<ContentItem>, ApiError>>>,
    categories: Option<Result<Vec<Category>, ApiError>>,
    items: HashMap<String, ContentItem>,
    get_one_failure: Option<ApiError>,
}

pub fn item(id: &str) -> ContentItem {
    ContentItem::new(id, format!("Story {id}"))
}

pub fn items(ids: &[&str]) -> Vec<ContentItem> {
    ids.iter().map(|id| item(id)).collect()
}

pub fn category(id: &str) -> Category {
    Category {
        id: id.to_string(),
        name: format!("Category {id}"),
        icon: None,
        color: None,
        active: true,
        language_id: None,
    }
}

pub fn failure(operation: &'static str) -> ApiError {
    ApiError::new(ApiErrorKind::Network, operation, "simulated outage")
}

impl FakeNewsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_search<F>(mut self, handler: F) -> Self
    where
        F: Fn(&SearchQuery) -> Result<Vec<ContentItem>, ApiError> + Send + Sync + 'static,
    {
        self.search_handler = Some(Box::new(handler));
        self
    }

    pub fn script_search(self, response: Result<Vec<ContentItem>, ApiError>) -> Self {
        if let Ok(mut queue) = self.scripted_searches.lock() {
            queue.push_back(response);
        }
        self
    }

    pub fn with_categories(mut self, categories: Result<Vec<Category>, ApiError>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn with_item(mut self, item: ContentItem) -> Self {
        self.items.insert(item.id.clone(), item);
        self
    }

    pub fn failing_get_one(mut self, error: ApiError) -> Self {
        self.get_one_failure = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn search_calls(&self) -> Vec<SearchQuery> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                FakeCall::Search(query) => Some(query),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: FakeCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl NewsBackend for FakeNewsBackend {
    fn search_by_categories(&self, query: &SearchQuery) -> Result<SearchPage, ApiError> {
        self.record(FakeCall::Search(query.clone()));
        let response = match &self.search_handler {
            Some(handler) => handler(query),
            None => self
                .scripted_searches
                .lock()
                .ok()
                .and_then(|mut queue| queue.pop_front())
                .unwrap_or_else(|| Ok(Vec::new())),
        };
        response.map(|items| SearchPage { items })
    }

    fn list_categories(&self, language_id: &str) -> Result<Vec<Category>, ApiError> {
        self.record(FakeCall::ListCategories(language_id.to_string()));
        self.categories.clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn get_one(&self, id: &str) -> Result<ContentItem, ApiError> {
        self.record(FakeCall::GetOne(id.to_string()));
        if let Some(error) = &self.get_one_failure {
            return Err(error.clone());
        }
        self.items.get(id).cloned().ok_or_else(|| {
            ApiError::new(ApiErrorKind::NotFound, "get_one", format!("no item {id}"))
                .with_status(404)
        })
    }

    fn list_languages(&self) -> Result<Vec<Language>, ApiError> {
        self.record(FakeCall::ListLanguages);
        Ok(Vec::new())
    }
}
