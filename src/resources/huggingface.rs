//! HuggingFace Hub datasets and models.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use super::{CatalogProvider, Platform, ResourceMetrics, ResourceRecord, http_client};
use crate::config::{Credentials, ResourcesConfig};
use crate::types::{ErrorClassifier, Result};

const PROVIDER: &str = "huggingface";

pub struct HuggingFaceProvider {
    api_base: String,
    token: Option<SecretString>,
    client: reqwest::Client,
}

impl std::fmt::Debug for HuggingFaceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceProvider")
            .field("api_base", &self.api_base)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
enum HubKind {
    Dataset,
    Model,
}

impl HubKind {
    fn path(&self) -> &'static str {
        match self {
            Self::Dataset => "datasets",
            Self::Model => "models",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Dataset => "dataset",
            Self::Model => "model",
        }
    }

    fn page_url(&self, id: &str) -> String {
        match self {
            Self::Dataset => format!("https://huggingface.co/datasets/{}", id),
            Self::Model => format!("https://huggingface.co/{}", id),
        }
    }
}

impl HuggingFaceProvider {
    pub fn new(config: &ResourcesConfig, credentials: &Credentials) -> Result<Self> {
        Ok(Self {
            api_base: config.huggingface_api_base.trim_end_matches('/').to_string(),
            token: credentials.huggingface_token.clone(),
            client: http_client(config.timeout_secs)?,
        })
    }

    async fn list(&self, kind: HubKind, term: &str, limit: usize) -> Result<Vec<ResourceRecord>> {
        let url = format!("{}/{}", self.api_base, kind.path());
        let limit_param = limit.to_string();
        let mut request = self
            .client
            .get(&url)
            .query(&[("search", term), ("limit", limit_param.as_str())]);
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
                &format!("HuggingFace API error ({}): {}", status, body),
                PROVIDER,
            )
            .into());
        }

        let entries: Vec<HubEntry> = response
            .json()
            .await
            .map_err(|e| ErrorClassifier::classify_transport(&e, PROVIDER))?;

        Ok(entries
            .into_iter()
            .filter(|e| !e.id.is_empty())
            .take(limit)
            .map(|e| e.into_record(kind, term))
            .collect())
    }
}

#[async_trait]
impl CatalogProvider for HuggingFaceProvider {
    fn platform(&self) -> Platform {
        Platform::HuggingFace
    }

    /// Datasets first, then models
    async fn search(&self, term: &str, limit: usize) -> Result<Vec<ResourceRecord>> {
        let mut records = self.list(HubKind::Dataset, term, limit).await?;
        records.extend(self.list(HubKind::Model, term, limit).await?);
        debug!(term, found = records.len(), "HuggingFace search complete");
        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HubEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    downloads: Option<u64>,
    #[serde(default)]
    likes: Option<u64>,
    #[serde(default)]
    last_modified: Option<String>,
}

impl HubEntry {
    fn into_record(self, kind: HubKind, term: &str) -> ResourceRecord {
        let url = kind.page_url(&self.id);
        ResourceRecord::new(
            Platform::HuggingFace,
            self.id,
            url,
            self.description.unwrap_or_default(),
        )
        .with_term(term)
        .with_metrics(ResourceMetrics {
            downloads: self.downloads,
            likes: self.likes,
            updated_at: self.last_modified,
            kind: Some(kind.label().to_string()),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_urls_by_kind() {
        let entry: HubEntry =
            serde_json::from_str(r#"{"id": "ProsusAI/finbert", "downloads": 10, "likes": 3}"#)
                .unwrap();
        let model = entry.into_record(HubKind::Model, "finance");
        assert_eq!(model.url, "https://huggingface.co/ProsusAI/finbert");
        assert_eq!(model.metrics.kind.as_deref(), Some("model"));
        assert_eq!(model.description, "");

        let entry: HubEntry = serde_json::from_str(
            r#"{"id": "takala/financial_phrasebank", "description": "Sentences", "lastModified": "2024-01-01"}"#,
        )
        .unwrap();
        let dataset = entry.into_record(HubKind::Dataset, "finance");
        assert_eq!(
            dataset.url,
            "https://huggingface.co/datasets/takala/financial_phrasebank"
        );
        assert_eq!(dataset.metrics.updated_at.as_deref(), Some("2024-01-01"));
        assert_eq!(Platform::from_url(&dataset.url), Some(Platform::HuggingFace));
    }
}
