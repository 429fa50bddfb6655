use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use moka::future::Cache;

use super::{PolicyRetriever, PolicySnippet};
use crate::config::Config;

type CacheKey = (String, usize);

/// Caching front for a [`PolicyRetriever`].
///
/// Owned by the advisor; call [`PolicyKnowledgeBase::shutdown`] to drop
/// everything it has cached.
pub struct PolicyKnowledgeBase<R> {
    retriever: R,
    cache: Cache<CacheKey, Arc<Vec<PolicySnippet>>>,
    top_k: usize,
}

#[inline]
fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

impl<R: PolicyRetriever> PolicyKnowledgeBase<R> {
    pub fn new(retriever: R, capacity: u64, ttl: Duration, top_k: usize) -> Self {
        Self {
            retriever,
            cache: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            top_k,
        }
    }

    pub fn from_config(retriever: R, config: &Config) -> Self {
        Self::new(
            retriever,
            config.policy_cache_capacity,
            config.policy_cache_ttl,
            config.policy_top_k,
        )
    }

    pub fn retriever(&self) -> &R {
        &self.retriever
    }

    pub async fn search(&self, query: &str, k: usize) -> Arc<Vec<PolicySnippet>> {
        let query = normalize(query);
        self.cache
            .get_with((query.clone(), k), async {
                Arc::new(self.retriever.search(&query, k).await)
            })
            .await
    }

    /// Snippets relevant to one leave type, using the configured `top_k`.
    pub async fn snippets_for(&self, leave_type_name: &str) -> Vec<PolicySnippet> {
        self.search(leave_type_name, self.top_k).await.as_ref().clone()
    }

    /// Pre-load snippets for the given leave types.
    pub async fn warmup<'a>(&self, leave_type_names: impl IntoIterator<Item = &'a str>) {
        let futures: Vec<_> = leave_type_names
            .into_iter()
            .map(|name| self.search(name, self.top_k))
            .collect();

        // Await all lookups concurrently
        let loaded = join_all(futures).await;
        tracing::info!(count = loaded.len(), "policy snippet cache warmup complete");
    }

    pub fn shutdown(&self) {
        self.cache.invalidate_all();
    }
}
