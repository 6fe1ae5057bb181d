//! Relationship cache for second-order lookups.
//!
//! Memoizes a solution's directly-addressed problems, keyed by solution id.
//! Concurrent requests for the same id share one fetch; a failed fetch is
//! cached as an empty list so it is not retried on every rebuild. Entries
//! are never evicted; call [`RelationshipCache::invalidate`] when the
//! underlying data is known to have changed.

use crate::models::Problem;
use crate::source::EntitySource;
use moka::future::Cache;
use std::fmt;
use std::sync::Arc;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of entries in cache (approximate)
    pub entry_count: u64,
}

/// Solution id → directly-addressed problems.
#[derive(Clone)]
pub struct RelationshipCache {
    inner: Cache<String, Arc<Vec<Problem>>>,
    source: Arc<dyn EntitySource>,
}

impl fmt::Debug for RelationshipCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipCache")
            .field("source", &self.source.describe())
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

impl RelationshipCache {
    pub fn new(source: Arc<dyn EntitySource>) -> Self {
        Self {
            inner: Cache::builder().build(),
            source,
        }
    }

    /// Cached problems for a solution, fetching once on a miss.
    pub async fn get(&self, solution_id: &str) -> Arc<Vec<Problem>> {
        let source = Arc::clone(&self.source);
        let id = solution_id.to_string();
        self.inner
            .get_with(solution_id.to_string(), async move {
                match source.fetch_problems_for_solution(&id).await {
                    Ok(problems) => {
                        tracing::debug!(solution_id = %id, count = problems.len(), "fetched direct problems");
                        Arc::new(problems)
                    }
                    Err(e) => {
                        tracing::warn!(solution_id = %id, error = %e, "direct problem lookup failed, caching empty result");
                        Arc::new(Vec::new())
                    }
                }
            })
            .await
    }

    /// Cached value without fetching.
    pub async fn peek(&self, solution_id: &str) -> Option<Arc<Vec<Problem>>> {
        self.inner.get(solution_id).await
    }

    pub fn contains(&self, solution_id: &str) -> bool {
        self.inner.contains_key(solution_id)
    }

    /// Drop one entry so the next `get` fetches again.
    pub async fn invalidate(&self, solution_id: &str) {
        tracing::debug!(solution_id, "invalidating direct problems");
        self.inner.invalidate(solution_id).await;
    }

    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}
