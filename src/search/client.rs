//! Retrying, fail-closed search client.

use std::time::Duration;

use backon::Retryable;
use futures::future::join_all;
use tracing::{debug, warn};

use super::backoff::LinearBackoffBuilder;
use super::{SearchDepth, SearchResult, SharedSearchProvider};
use crate::config::SearchConfig;
use crate::constants::search::MAX_ATTEMPTS;
use crate::types::ScopeError;

#[derive(Clone)]
pub struct SearchClient {
    provider: SharedSearchProvider,
    depth: SearchDepth,
    backoff: LinearBackoffBuilder,
}

impl SearchClient {
    pub fn new(provider: SharedSearchProvider, config: &SearchConfig) -> Self {
        Self {
            provider,
            depth: config.depth,
            backoff: LinearBackoffBuilder::new(
                Duration::from_millis(config.retry_base_delay_ms),
                config.max_attempts.clamp(1, MAX_ATTEMPTS),
            ),
        }
    }

    /// Configured default search depth
    pub fn depth(&self) -> SearchDepth {
        self.depth
    }

    /// Run one query. Transient failures are retried with linear backoff;
    /// exhausted or non-retryable failures yield an empty list.
    pub async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: usize,
    ) -> Vec<SearchResult> {
        let provider = &self.provider;
        let outcome = (move || async move { provider.search(query, depth, max_results).await })
            .retry(self.backoff)
            .sleep(tokio::time::sleep)
            .when(|err: &ScopeError| err.is_retryable())
            .notify(|err: &ScopeError, delay: Duration| {
                warn!(query, ?delay, "Search attempt failed, retrying: {}", err);
            })
            .await;

        match outcome {
            Ok(hits) => {
                debug!(query, hits = hits.len(), "Search returned");
                hits.into_iter()
                    .map(|hit| SearchResult::from_hit(hit, query))
                    .collect()
            }
            Err(err) => {
                warn!(query, "Search failed, continuing without results: {}", err);
                Vec::new()
            }
        }
    }

    /// Run several queries and concatenate their results in query order.
    /// Each result keeps the query that produced it.
    pub async fn search_many(
        &self,
        queries: &[String],
        depth: SearchDepth,
        max_results: usize,
    ) -> Vec<SearchResult> {
        join_all(
            queries
                .iter()
                .map(|query| self.search(query, depth, max_results)),
        )
        .await
        .into_iter()
        .flatten()
        .collect()
    }
}
