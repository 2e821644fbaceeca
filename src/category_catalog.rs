//! Curated category-id tables and the live category catalog.
//!
//! The curated tables widen related-content searches when the upstream
//! taxonomy for a language cannot be discovered. Each table is deduplicated
//! and every id carries exactly one topic, so replacing them with a taxonomy
//! service does not touch the resolver chain.

use std::collections::HashSet;

use crate::content::Category;

/// Bumped whenever a curated table changes.
pub const CATALOG_VERSION: u32 = 2;

/// Topical bucket a curated category id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryTopic {
    Politics,
    Breaking,
    Sports,
    Technology,
    Entertainment,
    Business,
    National,
    International,
    General,
}

impl CategoryTopic {
    /// Guesses a topic from a display name; unmatched names are `General`.
    pub fn classify(name: &str) -> Self {
        let lowered = name.to_lowercase();
        let contains_any = |needles: &[&str]| needles.iter().any(|needle| lowered.contains(needle));
        if contains_any(&["international", "world", "global", "foreign", "overseas"]) {
            Self::International
        } else if contains_any(&["national", "india", "domestic"]) {
            Self::National
        } else if contains_any(&["breaking", "urgent", "latest", "flash"]) {
            Self::Breaking
        } else if contains_any(&["politic"]) {
            Self::Politics
        } else if contains_any(&["sport"]) {
            Self::Sports
        } else if contains_any(&["tech"]) {
            Self::Technology
        } else if contains_any(&["entertainment", "cinema", "movie"]) {
            Self::Entertainment
        } else if contains_any(&["business", "market", "economy"]) {
            Self::Business
        } else {
            Self::General
        }
    }
}

/// One curated category id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub topic: CategoryTopic,
}

const fn entry(id: &'static str, topic: CategoryTopic) -> CatalogEntry {
    CatalogEntry { id, topic }
}

use self::CategoryTopic::{
    Breaking, Business, Entertainment, International, National, Politics, Sports, Technology,
};

/// Common topical buckets searched with the item's language.
pub const CORE_TOPICAL: &[CatalogEntry] = &[
    entry("288f3453-5f22-4909-a5ff-77d945714fbf", Politics),
    entry("4b99bb8b-849d-4e4d-bc1f-833ff18de8b5", Breaking),
    entry("7c8d9e0f-1a2b-3c4d-5e6f-7a8b9c0d1e2f", Sports),
    entry("8d9e0f1a-2b3c-4d5e-6f7a-8b9c0d1e2f3a", Technology),
    entry("9e0f1a2b-3c4d-5e6f-7a8b-9c0d1e2f3a4b", Entertainment),
    entry("0f1a2b3c-4d5e-6f7a-8b9c-0d1e2f3a4b5c", Business),
    entry("8b9c0d1e-2f3a-4b5c-6d7e-8f9a0b1c2d3e", National),
    entry("9c0d1e2f-3a4b-5c6d-7e8f-9a0b1c2d3e4f", National),
    entry("2b3c4d5e-6f7a-8b9c-0d1e-2f3a4b5c6d7e", International),
    entry("3c4d5e6f-7a8b-9c0d-1e2f-3a4b5c6d7e8f", International),
    entry("4a7781ef-f7d7-4fbf-bdd4-581482c47ccd", Breaking),
    entry("f26c2d2a-2de0-4036-ac09-eb8be2e1b5ae", Breaking),
];

/// Second, differently-curated set used when the item's language may be unknown.
pub const BROAD_TOPICAL: &[CatalogEntry] = &[
    entry("288f3453-5f22-4909-a5ff-77d945714fbf", Politics),
    entry("4b99bb8b-849d-4e4d-bc1f-833ff18de8b5", Breaking),
    entry("7c8d9e0f-1a2b-3c4d-5e6f-7a8b9c0d1e2f", Sports),
    entry("8d9e0f1a-2b3c-4d5e-6f7a-8b9c0d1e2f3a", Technology),
    entry("9e0f1a2b-3c4d-5e6f-7a8b-9c0d1e2f3a4b", Entertainment),
    entry("0f1a2b3c-4d5e-6f7a-8b9c-0d1e2f3a4b5c", Business),
    entry("1a2b3c4d-5e6f-7a8b-9c0d-1e2f3a4b5c6d", National),
    entry("2b3c4d5e-6f7a-8b9c-0d1e-2f3a4b5c6d7e", International),
    entry("3c4d5e6f-7a8b-9c0d-1e2f-3a4b5c6d7e8f", International),
    entry("4d5e6f7a-8b9c-0d1e-2f3a-4b5c6d7e8f9a", International),
];

/// Last-resort superset, including breaking/urgent/latest/flash variants.
pub const COMPREHENSIVE: &[CatalogEntry] = &[
    entry("288f3453-5f22-4909-a5ff-77d945714fbf", Politics),
    entry("4b99bb8b-849d-4e4d-bc1f-833ff18de8b5", Breaking),
    entry("7c8d9e0f-1a2b-3c4d-5e6f-7a8b9c0d1e2f", Sports),
    entry("8d9e0f1a-2b3c-4d5e-6f7a-8b9c0d1e2f3a", Technology),
    entry("9e0f1a2b-3c4d-5e6f-7a8b-9c0d1e2f3a4b", Entertainment),
    entry("0f1a2b3c-4d5e-6f7a-8b9c-0d1e2f3a4b5c", Business),
    entry("1a2b3c4d-5e6f-7a8b-9c0d-1e2f3a4b5c6d", National),
    entry("2b3c4d5e-6f7a-8b9c-0d1e-2f3a4b5c6d7e", International),
    entry("3c4d5e6f-7a8b-9c0d-1e2f-3a4b5c6d7e8f", International),
    entry("4d5e6f7a-8b9c-0d1e-2f3a-4b5c6d7e8f9a", International),
    entry("8b9c0d1e-2f3a-4b5c-6d7e-8f9a0b1c2d3e", National),
    entry("9c0d1e2f-3a4b-5c6d-7e8f-9a0b1c2d3e4f", National),
    entry("0d1e2f3a-4b5c-6d7e-8f9a-0b1c2d3e4f5a", National),
    entry("1e2f3a4b-5c6d-7e8f-9a0b-1c2d3e4f5a6b", National),
    entry("4a7781ef-f7d7-4fbf-bdd4-581482c47ccd", Breaking),
    entry("f26c2d2a-2de0-4036-ac09-eb8be2e1b5ae", Breaking),
    entry("9c70fa99-10a7-42c1-8dcb-db0cbfed8bb0", Breaking),
    entry("bd387718-9498-48a8-bbf1-b5a4253eac57", Breaking),
    entry("5e6f7a8b-9c0d-1e2f-3a4b-5c6d7e8f9a0b", International),
    entry("6f7a8b9c-0d1e-2f3a-4b5c-6d7e8f9a0b1c", International),
    entry("7a8b9c0d-1e2f-3a4b-5c6d-7e8f9a0b1c2d", International),
];

/// Wide sweep used when a tapped category has no items of its own.
pub const CATEGORY_LEAD_SWEEP: &[CatalogEntry] = &[
    entry("288f3453-5f22-4909-a5ff-77d945714fbf", Politics),
    entry("4b99bb8b-849d-4e4d-bc1f-833ff18de8b5", Breaking),
    entry("316d058b-0234-49d9-82d0-b776fca559c9", Politics),
    entry("9cd87cb8-b0b6-4b5d-9e6b-02780925322e", Politics),
    entry("eedcf9f6-a7b9-4ba8-bfd4-2e2090943cfb", Politics),
    entry("245c6300-6948-4469-b1a0-7b1613827a7a", Politics),
    entry("917dc7f8-44a3-4f56-a57c-b635fb24bac5", Politics),
    entry("0cab1bb2-b628-4e4f-a401-d69ea375868f", Politics),
    entry("40c4b7ab-c38a-4cdc-9d97-6db86ec6d598", Politics),
    entry("4a7781ef-f7d7-4fbf-bdd4-581482c47ccd", Breaking),
    entry("f26c2d2a-2de0-4036-ac09-eb8be2e1b5ae", Breaking),
    entry("9c70fa99-10a7-42c1-8dcb-db0cbfed8bb0", Breaking),
    entry("bd387718-9498-48a8-bbf1-b5a4253eac57", Breaking),
    entry("0e391f8c-3f08-434c-b5b5-9b4c17ea41bd", Breaking),
    entry("94ff8b97-489f-4080-9f1b-d16a4fd25e98", Breaking),
    entry("027382ac-f70d-4ef9-925a-b4cdd52e8dde", Breaking),
    entry("d2f52a8b-2fcb-47b7-8d85-defea6862b17", Breaking),
    entry("1ad88ec6-6730-42cd-ab01-256c80ee3152", Sports),
    entry("8d5953a6-b0c4-44e4-b52e-3e87fbd91781", Sports),
    entry("bf960e88-d18e-49fd-9083-3fab00dbcead", Sports),
    entry("bcbbb088-c504-4147-95f1-2d4883a8cb92", Sports),
    entry("eab908b8-eaf8-4812-ba02-cf7203a20865", Sports),
    entry("22ee5226-a422-4a30-a997-bac59ec24a29", Sports),
    entry("ebb9fd74-e14f-4908-a58f-57a3e745c042", Sports),
    entry("a553d9b4-42ea-42e0-806f-8c69f703981a", Technology),
    entry("9c4bdb16-66a1-4e74-898d-ccaea3b68484", Technology),
    entry("9c1b079f-4acc-4d84-99f7-4f54693fa8c9", Entertainment),
    entry("f60379af-613c-42e6-9612-ee666555c0a1", Entertainment),
    entry("810133ef-03e2-45d0-9ed1-9f54fc51ebe9", Business),
    entry("b15266d7-7bdd-47b1-aaba-d890e28c97ab", Business),
    entry("4fa0bcdd-c669-400a-a089-69ba2f167c21", Business),
    entry("600eb8ca-578d-4916-b081-ef5a139f46d4", Business),
    entry("0aa7cc71-0925-4f46-a5f6-048d216bed45", Business),
    entry("72f30614-e6ae-4bac-b9d6-6d41c03cd710", Business),
    entry("afbe031c-6b2f-40fc-8feb-6e3b2a6c0fc8", Business),
    entry("bfc5bf40-ae42-4bd6-af62-cd39a09dcb57", Business),
    entry("2b3c4d5e-6f7a-8b9c-0d1e-2f3a4b5c6d7e", International),
    entry("3c4d5e6f-7a8b-9c0d-1e2f-3a4b5c6d7e8f", International),
    entry("4d5e6f7a-8b9c-0d1e-2f3a-4b5c6d7e8f9a", International),
    entry("5e6f7a8b-9c0d-1e2f-3a4b-5c6d7e8f9a0b", International),
    entry("6f7a8b9c-0d1e-2f3a-4b5c-6d7e8f9a0b1c", International),
    entry("7a8b9c0d-1e2f-3a4b-5c6d-7e8f9a0b1c2d", International),
    entry("8b9c0d1e-2f3a-4b5c-6d7e-8f9a0b1c2d3e", National),
    entry("9c0d1e2f-3a4b-5c6d-7e8f-9a0b1c2d3e4f", National),
    entry("0d1e2f3a-4b5c-6d7e-8f9a-0b1c2d3e4f5a", National),
    entry("1e2f3a4b-5c6d-7e8f-9a0b-1c2d3e4f5a6b", National),
];

/// Keeps the first occurrence of every non-empty id, preserving order.
pub fn dedup_ids<'a, I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    ids.into_iter()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(*id))
        .map(ToOwned::to_owned)
        .collect()
}

/// Comma-joined id parameter for a curated table.
pub fn table_param(table: &[CatalogEntry]) -> String {
    join_ids(&dedup_ids(table.iter().map(|entry| entry.id)))
}

pub fn join_ids(ids: &[String]) -> String {
    ids.join(",")
}

/// Categories listed for one language, in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    /// Builds a catalog, dropping blank and repeated ids.
    pub fn from_categories(categories: Vec<Category>) -> Self {
        let mut seen = HashSet::new();
        let categories = categories
            .into_iter()
            .filter(|category| {
                let id = category.id.trim();
                !id.is_empty() && seen.insert(id.to_string())
            })
            .collect();
        Self { categories }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|category| category.id.clone())
            .collect()
    }

    pub fn first_ids(&self, count: usize) -> Vec<String> {
        self.categories
            .iter()
            .take(count)
            .map(|category| category.id.clone())
            .collect()
    }

    pub fn active(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(|category| category.active)
    }
}
/// Resolves a category icon or media path against `image_base_url`.
/// Resolves a category icon path against `image_base_url`.
///
/// Absolute `http(s)` URLs and paths without a configured base pass through unchanged.
pub fn resolve_image_url(icon: Option<&str>, image_base_url: &str) -> Option<String> {
    let icon = icon.map(str::trim).filter(|icon| !icon.is_empty())?;
    let lowered = icon.to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        return Some(icon.to_string());
    }
    let base = image_base_url.trim();
    if base.is_empty() {
        return Some(icon.to_string());
    }
    Some(format!(
        "{}/{}",
        base.trim_end_matches('/'),
        icon.trim_start_matches('/')
    ))
}
