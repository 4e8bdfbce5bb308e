//! GitHub repository search.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use super::{CatalogProvider, Platform, ResourceMetrics, ResourceRecord, http_client};
use crate::config::{Credentials, ResourcesConfig};
use crate::types::{ErrorClassifier, Result};

const PROVIDER: &str = "github";

pub struct GitHubProvider {
    api_base: String,
    token: Option<SecretString>,
    client: reqwest::Client,
}

impl std::fmt::Debug for GitHubProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubProvider")
            .field("api_base", &self.api_base)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl GitHubProvider {
    pub fn new(config: &ResourcesConfig, credentials: &Credentials) -> Result<Self> {
        Ok(Self {
            api_base: config.github_api_base.trim_end_matches('/').to_string(),
            token: credentials.github_token.clone(),
            client: http_client(config.timeout_secs)?,
        })
    }

    fn query(term: &str) -> String {
        format!("{} machine learning AI dataset", term)
    }
}

#[async_trait]
impl CatalogProvider for GitHubProvider {
    fn platform(&self) -> Platform {
        Platform::GitHub
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<ResourceRecord>> {
        let url = format!("{}/search/repositories", self.api_base);
        let query = Self::query(term);
        let per_page = limit.to_string();
        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .query(&[
                ("q", query.as_str()),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
            ]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("GitHub API error ({}): {}", status, body),
                PROVIDER,
            )
            .into());
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER))?;

        debug!(term, found = body.items.len(), "GitHub search complete");
        Ok(body
            .items
            .into_iter()
            .filter(|r| !r.html_url.is_empty())
            .take(limit)
            .map(|r| r.into_record(term))
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Repository>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    #[serde(default)]
    name: String,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    stargazers_count: Option<u64>,
    #[serde(default)]
    forks_count: Option<u64>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

impl Repository {
    fn into_record(self, term: &str) -> ResourceRecord {
        ResourceRecord::new(
            Platform::GitHub,
            self.name,
            self.html_url,
            self.description.unwrap_or_default(),
        )
        .with_term(term)
        .with_metrics(ResourceMetrics {
            stars: self.stargazers_count,
            forks: self.forks_count,
            language: self.language,
            updated_at: self.updated_at,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_shape() {
        assert_eq!(
            GitHubProvider::query("retail"),
            "retail machine learning AI dataset"
        );
    }

    #[test]
    fn test_search_response_maps_repositories() {
        let body: SearchResponse = serde_json::from_str(
            r#"{"total_count": 1, "items": [{"name": "recommenders",
                "html_url": "https://github.com/microsoft/recommenders",
                "description": null, "stargazers_count": 18000, "forks_count": 3000,
                "language": "Python", "updated_at": "2024-05-01T00:00:00Z"}]}"#,
        )
        .unwrap();
        let record = body.items.into_iter().next().unwrap().into_record("retail");
        assert_eq!(record.title, "recommenders");
        assert_eq!(record.description, "");
        assert_eq!(record.metrics.stars, Some(18000));
        assert_eq!(record.metrics.language.as_deref(), Some("Python"));
    }
}
