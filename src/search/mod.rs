//! Web search layer.
//!
//! A [`SearchProvider`] performs one raw query against the upstream API.
//! [`SearchClient`] wraps it with bounded linear-backoff retries and fails
//! closed: exhausted queries yield an empty list and a warning, never an error.

mod backoff;
mod client;
mod tavily;

pub use backoff::LinearBackoffBuilder;
pub use client::SearchClient;
pub use tavily::TavilyProvider;

pub use crate::config::SearchDepth;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::types::Result;

/// Hit as returned by the provider, ranked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub content: String,
    pub score: f64,
}

/// A ranked hit tagged with the query that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
    pub relevance_score: f64,
    pub source_query: String,
}

impl SearchResult {
    pub fn from_hit(hit: SearchHit, query: &str) -> Self {
        Self {
            title: hit.title,
            url: hit.url,
            content: hit.content,
            relevance_score: hit.score,
            source_query: query.to_string(),
        }
    }
}

/// Render results as prompt context blocks
pub fn render_context(results: &[SearchResult]) -> String {
    let mut context = String::new();
    for result in results {
        context.push_str(&format!(
            "Title: {}\nContent: {}\nSource: {}\n\n",
            result.title, result.content, result.url
        ));
    }
    context
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: usize,
    ) -> Result<Vec<SearchHit>>;

    fn name(&self) -> &str;
}

pub type SharedSearchProvider = Arc<dyn SearchProvider + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_context_blocks() {
        let results = vec![SearchResult::from_hit(
            SearchHit {
                title: "Acme Annual Report".into(),
                url: "https://acme.com/ir".into(),
                content: "Acme makes anvils".into(),
                score: 0.9,
            },
            "acme annual report",
        )];
        assert_eq!(
            render_context(&results),
            "Title: Acme Annual Report\nContent: Acme makes anvils\nSource: https://acme.com/ir\n\n"
        );
        assert_eq!(results[0].source_query, "acme annual report");
    }
}
