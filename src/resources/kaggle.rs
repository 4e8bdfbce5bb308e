//! Kaggle dataset catalog.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use super::{CatalogProvider, Platform, ResourceMetrics, ResourceRecord, http_client};
use crate::config::{Credentials, ResourcesConfig};
use crate::types::{ErrorClassifier, Result};

const PROVIDER: &str = "kaggle";

pub struct KaggleProvider {
    api_base: String,
    username: Option<String>,
    key: Option<SecretString>,
    client: reqwest::Client,
}

impl std::fmt::Debug for KaggleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KaggleProvider")
            .field("api_base", &self.api_base)
            .field("username", &self.username)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl KaggleProvider {
    pub fn new(config: &ResourcesConfig, credentials: &Credentials) -> Result<Self> {
        Ok(Self {
            api_base: config.kaggle_api_base.trim_end_matches('/').to_string(),
            username: credentials.kaggle_username.clone(),
            key: credentials.kaggle_key.clone(),
            client: http_client(config.timeout_secs)?,
        })
    }
}

#[async_trait]
impl CatalogProvider for KaggleProvider {
    fn platform(&self) -> Platform {
        Platform::Kaggle
    }

    fn is_configured(&self) -> bool {
        self.username.is_some() && self.key.is_some()
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<ResourceRecord>> {
        let url = format!("{}/datasets/list", self.api_base);
        let mut request = self
            .client
            .get(&url)
            .query(&[("search", term), ("sortBy", "votes"), ("page", "1")]);
        if let (Some(user), Some(key)) = (&self.username, &self.key) {
            request = request.basic_auth(user, Some(key.expose_secret()));
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
                &format!("Kaggle API error ({}): {}", status, body),
                PROVIDER,
            )
            .into());
        }

        let datasets: Vec<KaggleDataset> = response
            .json()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER))?;

        debug!(term, found = datasets.len(), "Kaggle search complete");
        Ok(datasets
            .into_iter()
            .filter(|d| !d.reference.is_empty())
            .take(limit)
            .map(|d| d.into_record(term))
            .collect())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KaggleDataset {
    #[serde(rename = "ref", default)]
    reference: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    total_bytes: Option<u64>,
    #[serde(default)]
    vote_count: Option<u64>,
    #[serde(default)]
    download_count: Option<u64>,
}

impl KaggleDataset {
    fn into_record(self, term: &str) -> ResourceRecord {
        let url = format!("https://www.kaggle.com/datasets/{}", self.reference);
        let title = if self.title.is_empty() {
            self.reference
        } else {
            self.title
        };
        ResourceRecord::new(
            Platform::Kaggle,
            title,
            url,
            self.subtitle.unwrap_or_default(),
        )
        .with_term(term)
        .with_metrics(ResourceMetrics {
            votes: self.vote_count,
            downloads: self.download_count,
            size_bytes: self.total_bytes,
            ..Default::default()
        })
    }
}
