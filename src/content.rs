//! Read-only news records shared by the resolver, the synthesizer, and the API adapter.

use serde::Serialize;

/// Media attachment rendered alongside an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaAttachment {
    pub media_type: String,
    pub url: String,
    pub caption: String,
}

/// Engagement counters reported by the news API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngagementCounters {
    pub views: u64,
    pub unique_views: u64,
    pub likes: u64,
    pub dislikes: u64,
    pub shares: u64,
    pub comments: u64,
}

/// Lifecycle flags of an item as published upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleFlags {
    /// Raw upstream status, usually `published`.
    pub status: String,
    pub approved: bool,
    pub deleted: bool,
}

impl Default for LifecycleFlags {
    fn default() -> Self {
        Self {
            status: "published".to_string(),
            approved: false,
            deleted: false,
        }
    }
}

impl LifecycleFlags {
    pub fn is_published(&self) -> bool {
        self.status.eq_ignore_ascii_case("published") && !self.deleted
    }
}

/// One news article. Values are never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub short_content: String,
    pub long_content: String,
    pub category_id: String,
    pub category_name: String,
    pub language_id: String,
    pub language_name: String,
    pub state_id: String,
    pub state_name: String,
    pub district_id: String,
    pub district_name: String,
    pub author_name: String,
    pub source: Option<String>,
    pub read_time_minutes: Option<u32>,
    pub published_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub media: Vec<MediaAttachment>,
    pub lifecycle: LifecycleFlags,
    pub engagement: EngagementCounters,
}

impl ContentItem {
    /// Creates an item carrying only an id and title; every other field is empty.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slug: String::new(),
            excerpt: None,
            short_content: String::new(),
            long_content: String::new(),
            category_id: String::new(),
            category_name: String::new(),
            language_id: String::new(),
            language_name: String::new(),
            state_id: String::new(),
            state_name: String::new(),
            district_id: String::new(),
            district_name: String::new(),
            author_name: String::new(),
            source: None,
            read_time_minutes: None,
            published_at: None,
            created_at: None,
            updated_at: None,
            media: Vec::new(),
            lifecycle: LifecycleFlags::default(),
            engagement: EngagementCounters::default(),
        }
    }

    /// First image-like attachment, used for thumbnails.
    pub fn lead_media(&self) -> Option<&MediaAttachment> {
        self.media.first()
    }
}

/// Category metadata as listed by the catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub active: bool,
    pub language_id: Option<String>,
}

/// Selectable content language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    pub id: String,
    pub code: String,
    pub name: String,
}

/// Input of the related-content resolver.
///
/// Empty strings are treated as absent, matching how callers pass
/// unset route parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionRequest {
    pub category_id: Option<String>,
    pub language_id: String,
    pub state_id: Option<String>,
    pub district_id: Option<String>,
    pub exclude_id: String,
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl ResolutionRequest {
    pub fn new(language_id: impl Into<String>, exclude_id: impl Into<String>) -> Self {
        Self {
            language_id: language_id.into(),
            exclude_id: exclude_id.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_region(
        mut self,
        state_id: impl Into<String>,
        district_id: impl Into<String>,
    ) -> Self {
        self.state_id = Some(state_id.into());
        self.district_id = Some(district_id.into());
        self
    }

    pub fn category(&self) -> Option<&str> {
        present(&self.category_id)
    }

    pub fn state(&self) -> Option<&str> {
        present(&self.state_id)
    }

    pub fn district(&self) -> Option<&str> {
        present(&self.district_id)
    }

    pub fn language(&self) -> Option<&str> {
        Some(self.language_id.trim()).filter(|value| !value.is_empty())
    }
}
