//! First item to open when a category is tapped.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::backends::{NewsBackend, SearchQuery};
use crate::catalog_sweep::{sweep_catalog, SweepPlan};
use crate::category_catalog::{table_param, CategoryCatalog, CategoryTopic, CATEGORY_LEAD_SWEEP};
use crate::config::CategoryLeadConfig;
use crate::content::ContentItem;

const LEAD_LIMIT: u32 = 1;

/// Finds a lead item for a category, widening to curated and live catalogs.
pub struct CategoryLeadResolver {
    backend: Arc<dyn NewsBackend>,
    config: CategoryLeadConfig,
}

impl CategoryLeadResolver {
    pub fn new(backend: Arc<dyn NewsBackend>, config: CategoryLeadConfig) -> Self {
        Self { backend, config }
    }

    /// Returns `None` when no category anywhere has an item in `language_id`.
    pub fn find_lead(&self, category_id: &str, language_id: &str) -> Option<ContentItem> {
        let category_id = category_id.trim();
        let language_id = language_id.trim();
        if language_id.is_empty() {
            warn!("CategoryLead: no language id, nothing to search");
            return None;
        }

        if !category_id.is_empty() {
            if let Some(item) = self.first_item(category_id.to_string(), language_id, "category") {
                return Some(item);
            }
        }

        let curated = table_param(CATEGORY_LEAD_SWEEP);
        self.first_item(curated, language_id, "sweep")
            .or_else(|| self.sweep_live_catalog(category_id, language_id))
    }

    fn first_item(
        &self,
        category_ids: String,
        language_id: &str,
        step: &str,
    ) -> Option<ContentItem> {
        let query = SearchQuery::new(category_ids, language_id).limit(LEAD_LIMIT);
        match self.backend.search_by_categories(&query) {
            Ok(page) => {
                let item = page.items.into_iter().next();
                if let Some(found) = &item {
                    info!("CategoryLead[{}]: lead item {}", step, found.id);
                } else {
                    debug!("CategoryLead[{}]: no items", step);
                }
                item
            }
            Err(err) => {
                warn!("CategoryLead[{}]: search failed: {}", step, err);
                None
            }
        }
    }

    fn sweep_live_catalog(&self, category_id: &str, language_id: &str) -> Option<ContentItem> {
        let catalog = match self.backend.list_categories(language_id) {
            Ok(categories) => CategoryCatalog::from_categories(categories),
            Err(err) => {
                warn!("CategoryLead[catalog]: category list failed: {}", err);
                return None;
            }
        };
        if let Some(category) = catalog.get(category_id) {
            debug!(
                "CategoryLead: '{}' classified as {:?}",
                category.name,
                CategoryTopic::classify(&category.name)
            );
        }

        let plan = SweepPlan {
            batch_size: self.config.batch_size.max(1),
            pages_per_batch: self.config.max_pages_per_batch.max(1),
            max_batches: usize::MAX,
            limit: LEAD_LIMIT,
        };
        let (items, stats) = sweep_catalog(
            self.backend.as_ref(),
            "CategoryLead[catalog]",
            &catalog.ids(),
            language_id,
            plan,
            None,
        );
        let lead = items.into_iter().next();
        if lead.is_none() {
            info!(
                "CategoryLead: no news available after {} catalog request(s), {} failed batch(es)",
                stats.requests, stats.failed_batches
            );
        }
        lead
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::CategoryLeadResolver;
    use crate::backends::fake::{category, failure, items, FakeCall, FakeNewsBackend};
    use crate::category_catalog::{table_param, CATEGORY_LEAD_SWEEP};
    use crate::config::CategoryLeadConfig;

    fn resolver(backend: &Arc<FakeNewsBackend>) -> CategoryLeadResolver {
        CategoryLeadResolver::new(backend.clone(), CategoryLeadConfig::default())
    }

    #[test]
    fn test_category_with_items_answers_in_one_call() {
        let backend = Arc::new(FakeNewsBackend::new().script_search(Ok(items(&["first"]))));

        let lead = resolver(&backend).find_lead("C1", "L1");

        assert_eq!(lead.map(|item| item.id), Some("first".to_string()));
        let calls = backend.search_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].category_ids, "C1");
        assert_eq!(calls[0].limit, 1);
        assert_eq!(calls[0].page, 1);
    }

    #[test]
    fn test_empty_category_falls_back_to_curated_sweep() {
        let backend = Arc::new(
            FakeNewsBackend::new()
                .script_search(Ok(Vec::new()))
                .script_search(Ok(items(&["curated"]))),
        );

        let lead = resolver(&backend).find_lead("C1", "L1");

        assert_eq!(lead.map(|item| item.id), Some("curated".to_string()));
        assert_eq!(
            backend.search_calls()[1].category_ids,
            table_param(CATEGORY_LEAD_SWEEP)
        );
    }

    #[test]
    fn test_live_catalog_is_swept_in_batches_and_pages() {
        let live: Vec<_> = (0..60).map(|index| category(&format!("c{index}"))).collect();
        let backend = Arc::new(
            FakeNewsBackend::new()
                .with_categories(Ok(live))
                .on_search(|query| {
                    if query.category_ids.starts_with("c50,") && query.page == 2 {
                        Ok(items(&["deep"]))
                    } else {
                        Ok(Vec::new())
                    }
                }),
        );

        let lead = resolver(&backend).find_lead("C1", "L1");

        assert_eq!(lead.map(|item| item.id), Some("deep".to_string()));
        let calls = backend.search_calls();
        // Category, curated sweep, three pages of batch one, two pages of batch two.
        assert_eq!(calls.len(), 7);
        assert_eq!(calls[2].category_ids.split(',').count(), 50);
        assert_eq!(calls[5].category_ids.split(',').count(), 10);
    }

    #[test]
    fn test_failures_are_skipped_and_none_means_no_news() {
        let backend = Arc::new(
            FakeNewsBackend::new()
                .on_search(|_| Err(failure("search")))
                .with_categories(Ok(vec![category("c1"), category("c2")])),
        );

        assert!(resolver(&backend).find_lead("C1", "L1").is_none());
        assert!(backend
            .calls()
            .contains(&FakeCall::ListCategories("L1".to_string())));
    }

    #[test]
    fn test_blank_category_skips_first_step() {
        let backend = Arc::new(FakeNewsBackend::new().script_search(Ok(items(&["curated"]))));

        let lead = resolver(&backend).find_lead(" ", "L1");

        assert!(lead.is_some());
        assert_eq!(
            backend.search_calls()[0].category_ids,
            table_param(CATEGORY_LEAD_SWEEP)
        );
    }

    #[test]
    fn test_blank_language_makes_no_calls() {
        let backend = Arc::new(FakeNewsBackend::new());
        assert!(resolver(&backend).find_lead("C1", "").is_none());
        assert!(backend.calls().is_empty());
    }
}
