//! Related-content lookup through an ordered chain of widening searches.
//!
//! Each strategy runs only when every earlier one produced nothing usable.
//! A failed call is logged and counted as "no results", so the chain as a
//! whole never fails; exhausting it yields an empty list.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::backends::{NewsBackend, SearchQuery};
use crate::catalog_sweep::{sweep_catalog, SweepPlan};
use crate::category_catalog::{
    table_param, CatalogEntry, CategoryCatalog, BROAD_TOPICAL, CATALOG_VERSION, COMPREHENSIVE,
    CORE_TOPICAL,
};
use crate::config::RelatedConfig;
use crate::content::{ContentItem, ResolutionRequest};
use crate::errors::ApiError;
use crate::language::CurrentLanguage;

/// One step of the fallback chain, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Category, language, state, and district together.
    ExactContext,
    /// Category and language, region dropped.
    CategoryLanguage,
    /// Core curated topical ids with the request language.
    KnownCategories,
    /// Broad curated ids with the request or current language.
    BroaderKnownCategories,
    /// Live category catalog of the resolved language.
    DynamicCatalog,
    /// Largest curated superset with the resolved language.
    Comprehensive,
}

impl Strategy {
    pub const CHAIN: [Strategy; 6] = [
        Strategy::ExactContext,
        Strategy::CategoryLanguage,
        Strategy::KnownCategories,
        Strategy::BroaderKnownCategories,
        Strategy::DynamicCatalog,
        Strategy::Comprehensive,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::ExactContext => "exact_context",
            Self::CategoryLanguage => "category_language",
            Self::KnownCategories => "known_categories",
            Self::BroaderKnownCategories => "broader_known_categories",
            Self::DynamicCatalog => "dynamic_catalog",
            Self::Comprehensive => "comprehensive",
        }
    }
}

/// Outcome of a resolve call with the strategy that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub items: Vec<ContentItem>,
    /// `None` when every strategy came back empty.
    pub strategy: Option<Strategy>,
}

/// Request sizing shared by every strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverLimits {
    pub page_limit: u32,
    pub dynamic_catalog_take: usize,
    pub dynamic_catalog_max_batches: usize,
    pub dynamic_catalog_pages_per_batch: u32,
}

impl Default for ResolverLimits {
    fn default() -> Self {
        Self::from(&RelatedConfig::default())
    }
}

impl From<&RelatedConfig> for ResolverLimits {
    fn from(config: &RelatedConfig) -> Self {
        Self {
            page_limit: config.page_limit.max(1),
            dynamic_catalog_take: config.dynamic_catalog_take.max(1),
            dynamic_catalog_max_batches: config.dynamic_catalog_max_batches.max(1),
            dynamic_catalog_pages_per_batch: config.dynamic_catalog_pages_per_batch.max(1),
        }
    }
}

/// Finds items related to a primary item by progressively widening the search scope.
pub struct RelatedContentResolver {
    backend: Arc<dyn NewsBackend>,
    language: Arc<dyn CurrentLanguage>,
    limits: ResolverLimits,
}

impl RelatedContentResolver {
    pub fn new(
        backend: Arc<dyn NewsBackend>,
        language: Arc<dyn CurrentLanguage>,
        limits: ResolverLimits,
    ) -> Self {
        Self {
            backend,
            language,
            limits,
        }
    }

    /// Returns at most `max_results` related items, never including `request.exclude_id`.
    pub fn resolve(&self, request: &ResolutionRequest, max_results: usize) -> Vec<ContentItem> {
        self.resolve_detailed(request, max_results).items
    }

    /// Like `resolve`, also reporting which strategy answered.
    pub fn resolve_detailed(&self, request: &ResolutionRequest, max_results: usize) -> Resolution {
        if max_results == 0 {
            debug!("RelatedResolver: max_results is 0, skipping lookup");
            return Resolution::default();
        }
        debug!(
            "RelatedResolver: resolving category={:?} language={:?} state={:?} district={:?} exclude={}",
            request.category(),
            request.language(),
            request.state(),
            request.district(),
            request.exclude_id
        );

        for strategy in Strategy::CHAIN {
            let outcome = match self.run_strategy(strategy, request) {
                Some(outcome) => outcome,
                None => {
                    debug!(
                        "RelatedResolver[strategy={}]: preconditions not met, skipped",
                        strategy.label()
                    );
                    continue;
                }
            };
            let candidates = match outcome {
                Ok(candidates) => candidates,
                Err(err) => {
                    warn!(
                        "RelatedResolver[strategy={}]: search failed, continuing: {}",
                        strategy.label(),
                        err
                    );
                    continue;
                }
            };
            let items = exclude_and_truncate(candidates, &request.exclude_id, max_results);
            if items.is_empty() {
                debug!("RelatedResolver[strategy={}]: no usable items", strategy.label());
                continue;
            }
            info!(
                "RelatedResolver[strategy={}]: found {} related item(s)",
                strategy.label(),
                items.len()
            );
            return Resolution {
                items,
                strategy: Some(strategy),
            };
        }

        info!("RelatedResolver: no related content after all strategies");
        Resolution::default()
    }

    /// Runs one strategy; `None` when its preconditions do not hold.
    fn run_strategy(
        &self,
        strategy: Strategy,
        request: &ResolutionRequest,
    ) -> Option<Result<Vec<ContentItem>, ApiError>> {
        match strategy {
            Strategy::ExactContext => {
                let category = request.category()?;
                let language = request.language()?;
                let state = request.state()?;
                let district = request.district()?;
                let query = SearchQuery::new(category, language)
                    .region(state, district)
                    .limit(self.limits.page_limit);
                Some(self.search(&query))
            }
            Strategy::CategoryLanguage => {
                let category = request.category()?;
                let language = request.language()?;
                Some(self.search(&self.table_query(category.to_string(), language)))
            }
            Strategy::KnownCategories => {
                let language = request.language()?;
                Some(self.search_table(CORE_TOPICAL, language))
            }
            Strategy::BroaderKnownCategories => {
                let language = self.resolved_language(request)?;
                Some(self.search_table(BROAD_TOPICAL, &language))
            }
            Strategy::DynamicCatalog => {
                let language = self.resolved_language(request)?;
                Some(self.search_live_catalog(&language, &request.exclude_id))
            }
            Strategy::Comprehensive => {
                let language = self.resolved_language(request)?;
                Some(self.search_table(COMPREHENSIVE, &language))
            }
        }
    }

    /// Request language, or the process-wide current language when the request has none.
    fn resolved_language(&self, request: &ResolutionRequest) -> Option<String> {
        if let Some(language) = request.language() {
            return Some(language.to_string());
        }
        let current = self.language.current_language_id();
        let current = current.trim();
        (!current.is_empty()).then(|| current.to_string())
    }

    fn table_query(&self, category_ids: String, language: &str) -> SearchQuery {
        SearchQuery::new(category_ids, language).limit(self.limits.page_limit)
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<ContentItem>, ApiError> {
        self.backend.search_by_categories(query).map(|page| page.items)
    }

    fn search_table(
        &self,
        table: &[CatalogEntry],
        language: &str,
    ) -> Result<Vec<ContentItem>, ApiError> {
        debug!(
            "RelatedResolver: searching {} curated ids (catalog v{})",
            table.len(),
            CATALOG_VERSION
        );
        self.search(&self.table_query(table_param(table), language))
    }

    fn search_live_catalog(
        &self,
        language: &str,
        exclude_id: &str,
    ) -> Result<Vec<ContentItem>, ApiError> {
        let catalog = CategoryCatalog::from_categories(self.backend.list_categories(language)?);
        if catalog.is_empty() {
            debug!("RelatedResolver: live catalog for {} is empty", language);
            return Ok(Vec::new());
        }
        debug!(
            "RelatedResolver: live catalog for {} lists {} categories",
            language,
            catalog.len()
        );
        let batch_size = self.limits.dynamic_catalog_take;
        let plan = SweepPlan {
            batch_size,
            pages_per_batch: self.limits.dynamic_catalog_pages_per_batch,
            max_batches: self.limits.dynamic_catalog_max_batches,
            limit: self.limits.page_limit,
        };
        let exclude = Some(exclude_id.trim()).filter(|id| !id.is_empty());
        let (items, _) = sweep_catalog(
            self.backend.as_ref(),
            "RelatedResolver[strategy=dynamic_catalog]",
            &catalog.first_ids(batch_size.saturating_mul(plan.max_batches)),
            language,
            plan,
            exclude,
        );
        Ok(items)
    }
}

/// Drops the excluded id, keeps upstream order, and caps the length.
fn exclude_and_truncate(
    items: Vec<ContentItem>,
    exclude_id: &str,
    max_results: usize,
) -> Vec<ContentItem> {
    let exclude_id = exclude_id.trim();
    items
        .into_iter()
        .filter(|item| exclude_id.is_empty() || item.id != exclude_id)
        .take(max_results)
        .collect()
}
