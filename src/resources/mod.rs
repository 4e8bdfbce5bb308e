//! Dataset, model and repository catalogs.
//!
//! Two distinct gathering paths live here:
//! - [`ResourceCollectors`]: domain-wide, one collector per catalog API, run
//!   under a shared wall-clock [`Deadline`] with static fallbacks.
//! - [`fetch_datasets`]: per use case, site-restricted web searches ranked
//!   catalog-first and trimmed to a 3..=6 reference set.

mod collector;
mod datasets;
mod fallback;
mod github;
mod huggingface;
mod kaggle;
mod terms;

pub use collector::{
    CollectedResources, CollectorReport, CollectorStatus, Deadline, ResourceCollector,
    ResourceCollectors,
};
pub use datasets::{DatasetLink, dataset_queries, fetch_datasets, select_references};
pub use fallback::fallback_records;
pub use github::GitHubProvider;
pub use huggingface::HuggingFaceProvider;
pub use kaggle::KaggleProvider;
pub use terms::derive_search_terms;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::types::{Result, ScopeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Kaggle,
    HuggingFace,
    GitHub,
}

impl Platform {
    /// Priority order used when ranking references
    pub const ALL: [Platform; 3] = [Self::Kaggle, Self::HuggingFace, Self::GitHub];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Kaggle => "Kaggle",
            Self::HuggingFace => "HuggingFace",
            Self::GitHub => "GitHub",
        }
    }

    pub fn host(&self) -> &'static str {
        match self {
            Self::Kaggle => "kaggle.com",
            Self::HuggingFace => "huggingface.co",
            Self::GitHub => "github.com",
        }
    }

    /// Classify a url by host. Unparseable urls and other hosts yield `None`.
    pub fn from_url(raw: &str) -> Option<Self> {
        let parsed = url::Url::parse(raw).ok()?;
        let host = parsed.host_str()?.to_ascii_lowercase();
        Self::ALL.into_iter().find(|platform| {
            let suffix = platform.host();
            host == suffix || host.ends_with(&format!(".{}", suffix))
        })
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Catalog-specific popularity and provenance fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// "dataset" or "model" for HuggingFace entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub title: String,
    pub url: String,
    pub description: String,
    pub platform: Platform,
    pub search_term: String,
    #[serde(default)]
    pub metrics: ResourceMetrics,
}

impl ResourceRecord {
    pub fn new(
        platform: Platform,
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: description.into(),
            platform,
            search_term: String::new(),
            metrics: ResourceMetrics::default(),
        }
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_metrics(mut self, metrics: ResourceMetrics) -> Self {
        self.metrics = metrics;
        self
    }
}

/// One catalog API: keyword in, metadata records out
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    fn platform(&self) -> Platform;

    /// Whether credentials required by the API are present
    fn is_configured(&self) -> bool {
        true
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<ResourceRecord>>;
}

pub type SharedCatalog = Arc<dyn CatalogProvider + Send + Sync>;

/// HTTP client shared by the catalog providers. GitHub rejects requests
/// without a user agent.
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("marketscope/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ScopeError::Config(format!("Failed to create HTTP client: {}", e)))
}
