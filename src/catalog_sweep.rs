//! Batched, paged search over a long list of category ids.

use log::{debug, warn};

use crate::backends::{NewsBackend, SearchQuery};
use crate::category_catalog::join_ids;
use crate::content::ContentItem;

/// Shape of one sweep: ids per request, pages tried per batch, and batches tried overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPlan {
    pub batch_size: usize,
    pub pages_per_batch: u32,
    pub max_batches: usize,
    pub limit: u32,
}

/// Counters reported by a sweep, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub requests: usize,
    pub failed_batches: usize,
}

/// Searches `ids` batch by batch and page by page, returning the first page
/// that still has items after dropping `exclude_id`.
///
/// A failed request abandons the rest of its batch and moves on to the next
/// one. Returns an empty list when nothing matched.
pub fn sweep_catalog(
    backend: &dyn NewsBackend,
    label: &str,
    ids: &[String],
    language_id: &str,
    plan: SweepPlan,
    exclude_id: Option<&str>,
) -> (Vec<ContentItem>, SweepStats) {
    let mut stats = SweepStats::default();
    let batch_size = plan.batch_size.max(1);
    for (batch_index, batch) in ids.chunks(batch_size).take(plan.max_batches).enumerate() {
        let category_ids = join_ids(batch);
        for page in 1..=plan.pages_per_batch.max(1) {
            let query = SearchQuery::new(category_ids.clone(), language_id)
                .page(page)
                .limit(plan.limit);
            stats.requests += 1;
            match backend.search_by_categories(&query) {
                Ok(result) => {
                    let kept: Vec<ContentItem> = result
                        .items
                        .into_iter()
                        .filter(|item| exclude_id != Some(item.id.as_str()))
                        .collect();
                    if !kept.is_empty() {
                        debug!(
                            "{}: found {} item(s) in batch {}, page {}",
                            label,
                            kept.len(),
                            batch_index + 1,
                            page
                        );
                        return (kept, stats);
                    }
                }
                Err(err) => {
                    warn!("{}: batch {} failed: {}", label, batch_index + 1, err);
                    stats.failed_batches += 1;
                    break;
                }
            }
        }
    }
    (Vec::new(), stats)
}

#[cfg(test)]
mod tests {
    use super::{sweep_catalog, SweepPlan};
    use crate::backends::fake::{failure, items, FakeNewsBackend};

    fn ids(count: usize) -> Vec<String> {
        (0..count).map(|index| format!("C{index}")).collect()
    }

    fn plan() -> SweepPlan {
        SweepPlan {
            batch_size: 2,
            pages_per_batch: 3,
            max_batches: usize::MAX,
            limit: 1,
        }
    }

    #[test]
    fn test_sweep_walks_pages_then_batches_until_first_hit() {
        let backend = FakeNewsBackend::new().on_search(|query| {
            if query.category_ids == "C2,C3" && query.page == 2 {
                Ok(items(&["hit"]))
            } else {
                Ok(Vec::new())
            }
        });

        let (found, stats) = sweep_catalog(&backend, "test", &ids(5), "L1", plan(), None);
        assert_eq!(found[0].id, "hit");
        assert_eq!(stats.requests, 5);
        let pages: Vec<(String, u32)> = backend
            .search_calls()
            .into_iter()
            .map(|query| (query.category_ids, query.page))
            .collect();
        assert_eq!(
            pages,
            vec![
                ("C0,C1".to_string(), 1),
                ("C0,C1".to_string(), 2),
                ("C0,C1".to_string(), 3),
                ("C2,C3".to_string(), 1),
                ("C2,C3".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_sweep_skips_failed_batch() {
        let backend = FakeNewsBackend::new().on_search(|query| {
            if query.category_ids == "C0,C1" {
                Err(failure("search"))
            } else {
                Ok(items(&["later"]))
            }
        });

        let (found, stats) = sweep_catalog(&backend, "test", &ids(4), "L1", plan(), None);
        assert_eq!(found[0].id, "later");
        assert_eq!(stats.failed_batches, 1);
        assert_eq!(stats.requests, 2);
    }

    #[test]
    fn test_sweep_ignores_pages_holding_only_the_excluded_item() {
        let backend = FakeNewsBackend::new().on_search(|query| match query.page {
            1 => Ok(items(&["self"])),
            _ => Ok(items(&["self", "other"])),
        });

        let (found, _) = sweep_catalog(&backend, "test", &ids(2), "L1", plan(), Some("self"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "other");
    }

    #[test]
    fn test_sweep_respects_batch_cap_and_empty_ids() {
        let backend = FakeNewsBackend::new();
        let capped = SweepPlan {
            max_batches: 1,
            pages_per_batch: 1,
            ..plan()
        };
        let (found, stats) = sweep_catalog(&backend, "test", &ids(6), "L1", capped, None);
        assert!(found.is_empty());
        assert_eq!(stats.requests, 1);

        let (found, stats) = sweep_catalog(&backend, "test", &[], "L1", plan(), None);
        assert!(found.is_empty());
        assert_eq!(stats.requests, 0);
    }
}
