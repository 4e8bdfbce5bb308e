//! Tavily search API provider.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{SearchDepth, SearchHit, SearchProvider};
use crate::config::SearchConfig;
use crate::types::{ErrorClassifier, Result, ScopeError};

const PROVIDER: &str = "tavily";

pub struct TavilyProvider {
    api_key: SecretString,
    api_base: String,
    exclude_domains: Vec<String>,
    client: reqwest::Client,
}

impl std::fmt::Debug for TavilyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("exclude_domains", &self.exclude_domains)
            .finish()
    }
}

impl TavilyProvider {
    pub fn new(config: &SearchConfig, api_key: SecretString) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScopeError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            exclude_domains: config.exclude_domains.clone(),
            client,
        })
    }

    fn build_request<'a>(
        &'a self,
        query: &'a str,
        depth: SearchDepth,
        max_results: usize,
    ) -> TavilyRequest<'a> {
        TavilyRequest {
            api_key: self.api_key.expose_secret(),
            query,
            search_depth: depth,
            max_results,
            exclude_domains: &self.exclude_domains,
        }
    }
}

#[async_trait]
impl SearchProvider for TavilyProvider {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        max_results: usize,
    ) -> Result<Vec<SearchHit>> {
        let url = format!("{}/search", self.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&self.build_request(query, depth, max_results))
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("Tavily API error ({}): {}", status, body),
                PROVIDER,
            )
            .into());
        }

        let body: TavilyResponse = response
            .json()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER))?;

        debug!(query, hits = body.results.len(), "Tavily search complete");
        Ok(body.results.into_iter().map(SearchHit::from).collect())
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: SearchDepth,
    max_results: usize,
    #[serde(skip_serializing_if = "no_domains")]
    exclude_domains: &'a [String],
}

fn no_domains(domains: &&[String]) -> bool {
    domains.is_empty()
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: f64,
}

impl From<TavilyResult> for SearchHit {
    fn from(r: TavilyResult) -> Self {
        Self {
            title: r.title,
            url: r.url,
            content: r.content,
            score: r.score,
        }
    }
}
