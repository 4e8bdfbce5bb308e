//! Domain-wide resource collection under a shared wall-clock budget.
//!
//! Each catalog gets one [`ResourceCollector`]. [`ResourceCollectors`] runs
//! them concurrently against a single [`Deadline`]: a collector is skipped
//! without any network call when the deadline has passed or too little
//! budget remains, and a started collector is bounded by what is left.
//! Provider errors and timeouts degrade to the curated fallback tables.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{
    GitHubProvider, HuggingFaceProvider, KaggleProvider, Platform,
    ResourceRecord, SharedCatalog, fallback_records,
};
use crate::ai::with_timeout;
use crate::config::{Credentials, ResourcesConfig};
use crate::constants::resources::MAX_QUERY_TERMS;
use crate::types::{ErrorKind, Result, ScopeError, StageError};

/// Shared wall-clock budget
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.start.elapsed())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectorStatus {
    /// Live records from the catalog API
    Collected,
    /// Curated records stood in for some or all terms
    Fallback,
    /// Not started: deadline passed or too little budget left
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorReport {
    pub platform: Platform,
    pub status: CollectorStatus,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StageError>,
}

/// One catalog, at most [`MAX_QUERY_TERMS`] queries per collection
pub struct ResourceCollector {
    catalog: SharedCatalog,
    max_per_catalog: usize,
}

impl ResourceCollector {
    pub fn new(catalog: SharedCatalog, max_per_catalog: usize) -> Self {
        Self {
            catalog,
            max_per_catalog,
        }
    }

    pub fn platform(&self) -> Platform {
        self.catalog.platform()
    }

    /// Domain term first, then the first keyword
    pub fn query_terms(keywords: &[String], domain: &str) -> Vec<String> {
        let mut terms: Vec<String> = Vec::with_capacity(MAX_QUERY_TERMS);
        let candidates = std::iter::once(domain).chain(keywords.first().map(String::as_str));
        for term in candidates.map(str::trim).filter(|t| !t.is_empty()) {
            if !terms.iter().any(|t| t.eq_ignore_ascii_case(term)) {
                terms.push(term.to_string());
            }
        }
        terms.truncate(MAX_QUERY_TERMS);
        terms
    }

    /// Collect records, never failing. `budget` bounds the whole collection.
    pub async fn collect(
        &self,
        keywords: &[String],
        domain: &str,
        budget: Duration,
    ) -> (Vec<ResourceRecord>, CollectorReport) {
        let platform = self.platform();
        let terms = Self::query_terms(keywords, domain);
        let curated = |terms: &[String]| -> Vec<ResourceRecord> {
            terms
                .iter()
                .flat_map(|term| fallback_records(platform, domain, term))
                .collect()
        };

        if !self.catalog.is_configured() {
            info!(%platform, "No credentials, using curated records");
            let records = dedupe_by_url(curated(&terms));
            let summary = report(platform, CollectorStatus::Fallback, &records, None);
            return (records, summary);
        }

        let catalog = &self.catalog;
        let limit = self.max_per_catalog;
        let work = async {
            let mut records = Vec::new();
            let mut failure = None;
            for term in &terms {
                match catalog.search(term, limit).await {
                    Ok(found) => records.extend(found),
                    Err(err) => {
                        warn!(%platform, term = term.as_str(), "Catalog search failed: {}", err);
                        records.extend(fallback_records(platform, domain, term));
                        failure = Some(StageError::new(ErrorKind::CollectorError, err.to_string()));
                    }
                }
            }
            Ok::<_, ScopeError>((records, failure))
        };

        let operation = format!("{} collection", platform);
        let (records, status, error) = match with_timeout(budget, work, &operation).await {
            Ok((records, None)) => (records, CollectorStatus::Collected, None),
            Ok((records, Some(error))) => (records, CollectorStatus::Fallback, Some(error)),
            Err(err) => {
                warn!(%platform, ?budget, "Collector exceeded budget: {}", err);
                (
                    curated(&terms),
                    CollectorStatus::Fallback,
                    Some(StageError::new(ErrorKind::CollectorTimeout, err.to_string())),
                )
            }
        };

        let records = dedupe_by_url(records);
        let summary = report(platform, status, &records, error);
        (records, summary)
    }
}

fn report(
    platform: Platform,
    status: CollectorStatus,
    records: &[ResourceRecord],
    error: Option<StageError>,
) -> CollectorReport {
    CollectorReport {
        platform,
        status,
        records: records.len(),
        error,
    }
}

fn dedupe_by_url(records: Vec<ResourceRecord>) -> Vec<ResourceRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.url.clone()))
        .collect()
}

/// Flat domain-wide resource report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectedResources {
    pub industry: String,
    pub search_terms_used: Vec<String>,
    pub kaggle: Vec<ResourceRecord>,
    pub huggingface: Vec<ResourceRecord>,
    pub github: Vec<ResourceRecord>,
    pub status: String,
    #[serde(default)]
    pub collectors: Vec<CollectorReport>,
}

impl CollectedResources {
    pub fn empty(industry: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            industry: industry.into(),
            status: status.into(),
            ..Default::default()
        }
    }

    pub fn records(&self, platform: Platform) -> &[ResourceRecord] {
        match platform {
            Platform::Kaggle => &self.kaggle,
            Platform::HuggingFace => &self.huggingface,
            Platform::GitHub => &self.github,
        }
    }

    pub fn records_mut(&mut self, platform: Platform) -> &mut Vec<ResourceRecord> {
        match platform {
            Platform::Kaggle => &mut self.kaggle,
            Platform::HuggingFace => &mut self.huggingface,
            Platform::GitHub => &mut self.github,
        }
    }

    pub fn total(&self) -> usize {
        self.kaggle.len() + self.huggingface.len() + self.github.len()
    }
}

pub struct ResourceCollectors {
    collectors: Vec<ResourceCollector>,
    budget: Duration,
    min_remaining: Duration,
}

impl ResourceCollectors {
    pub fn new(catalogs: Vec<SharedCatalog>, config: &ResourcesConfig) -> Self {
        Self {
            collectors: catalogs
                .into_iter()
                .map(|catalog| ResourceCollector::new(catalog, config.max_per_catalog))
                .collect(),
            budget: Duration::from_secs(config.collection_budget_secs),
            min_remaining: Duration::from_secs(config.min_collector_secs),
        }
    }

    /// Kaggle, HuggingFace and GitHub collectors from configuration
    pub fn from_config(config: &ResourcesConfig, credentials: &Credentials) -> Result<Self> {
        let catalogs: Vec<SharedCatalog> = vec![
            std::sync::Arc::new(KaggleProvider::new(config, credentials)?),
            std::sync::Arc::new(HuggingFaceProvider::new(config, credentials)?),
            std::sync::Arc::new(GitHubProvider::new(config, credentials)?),
        ];
        Ok(Self::new(catalogs, config))
    }

    /// Collect from every catalog under a fresh deadline
    pub async fn collect_all(&self, keywords: &[String], domain: &str) -> CollectedResources {
        self.collect_within(keywords, domain, Deadline::after(self.budget))
            .await
    }

    #[instrument(skip(self, keywords, deadline), fields(collectors = self.collectors.len()))]
    pub async fn collect_within(
        &self,
        keywords: &[String],
        domain: &str,
        deadline: Deadline,
    ) -> CollectedResources {
        let runs = self.collectors.iter().map(|collector| async move {
            let platform = collector.platform();
            let remaining = deadline.remaining();
            if deadline.is_expired() {
                warn!(%platform, "Collection deadline passed, skipping");
                return (Vec::new(), report(platform, CollectorStatus::Skipped, &[], None));
            }
            if remaining < self.min_remaining {
                warn!(%platform, ?remaining, "Not enough budget left, skipping");
                return (Vec::new(), report(platform, CollectorStatus::Skipped, &[], None));
            }
            info!(%platform, ?remaining, "Collecting resources");
            collector.collect(keywords, domain, remaining).await
        });

        let mut collected = CollectedResources::empty(domain, "completed");
        collected.search_terms_used = keywords.to_vec();
        for (records, summary) in join_all(runs).await {
            collected.records_mut(summary.platform).extend(records);
            collected.collectors.push(summary);
        }

        info!(
            elapsed_ms = deadline.elapsed().as_millis() as u64,
            kaggle = collected.kaggle.len(),
            huggingface = collected.huggingface.len(),
            github = collected.github.len(),
            "Resource collection complete"
        );
        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockCatalog;
    use crate::types::ErrorCategory;
    use std::sync::Arc;

    fn record(platform: Platform, url: &str) -> ResourceRecord {
        ResourceRecord::new(platform, url, url, "")
    }

    fn config(budget: u64, min: u64) -> ResourcesConfig {
        ResourcesConfig {
            collection_budget_secs: budget,
            min_collector_secs: min,
            ..Default::default()
        }
    }

    #[test]
    fn test_query_terms_domain_then_first_keyword() {
        let keywords = vec!["fraud detection".to_string(), "chatbot".to_string()];
        assert_eq!(
            ResourceCollector::query_terms(&keywords, "Finance"),
            vec!["Finance", "fraud detection"]
        );
        assert_eq!(
            ResourceCollector::query_terms(&[], "  "),
            Vec::<String>::new()
        );
        assert_eq!(
            ResourceCollector::query_terms(&["finance".to_string()], "Finance"),
            vec!["Finance"]
        );
    }

    #[tokio::test]
    async fn test_expired_deadline_skips_every_collector() {
        let mocks: Vec<Arc<MockCatalog>> = Platform::ALL
            .into_iter()
            .map(|p| Arc::new(MockCatalog::new(p)))
            .collect();
        let catalogs: Vec<SharedCatalog> = mocks.iter().map(|m| m.clone() as SharedCatalog).collect();
        let collectors = ResourceCollectors::new(catalogs, &config(30, 5));

        let started = Instant::now();
        let result = collectors
            .collect_within(&[], "Healthcare", Deadline::after(Duration::ZERO))
            .await;

        assert!(started.elapsed() < Duration::from_millis(100));
        assert_eq!(result.total(), 0);
        assert!(mocks.iter().all(|m| m.calls() == 0));
        assert!(
            result
                .collectors
                .iter()
                .all(|c| c.status == CollectorStatus::Skipped)
        );
    }

    #[tokio::test]
    async fn test_low_remaining_budget_skips() {
        let mock = Arc::new(MockCatalog::new(Platform::GitHub));
        let collectors = ResourceCollectors::new(vec![mock.clone() as SharedCatalog], &config(30, 5));
        let result = collectors
            .collect_within(&[], "Retail", Deadline::after(Duration::from_secs(2)))
            .await;
        assert_eq!(mock.calls(), 0);
        assert_eq!(result.collectors[0].status, CollectorStatus::Skipped);
    }

    #[tokio::test]
    async fn test_live_records_grouped_and_deduplicated() {
        let kaggle = Arc::new(MockCatalog::new(Platform::Kaggle).records(vec![
            record(Platform::Kaggle, "https://www.kaggle.com/datasets/a/one"),
            record(Platform::Kaggle, "https://www.kaggle.com/datasets/a/one"),
        ]));
        let github = Arc::new(
            MockCatalog::new(Platform::GitHub)
                .records(vec![record(Platform::GitHub, "https://github.com/o/r")]),
        );
        let collectors =
            ResourceCollectors::new(
            vec![kaggle.clone() as SharedCatalog, github.clone()],
            &config(30, 5),
        );
        let keywords = vec!["customer".to_string()];
        let result = collectors.collect_all(&keywords, "Retail").await;

        assert_eq!(kaggle.calls(), 2);
        assert_eq!(result.kaggle.len(), 1);
        assert_eq!(result.github.len(), 1);
        assert!(result.huggingface.is_empty());
        assert_eq!(result.search_terms_used, keywords);
        assert_eq!(result.industry, "Retail");
        assert!(
            result
                .collectors
                .iter()
                .all(|c| c.status == CollectorStatus::Collected)
        );
    }

    #[tokio::test]
    async fn test_provider_error_uses_curated_table() {
        let mock = Arc::new(MockCatalog::new(Platform::Kaggle).failing(ErrorCategory::Network));
        let collector = ResourceCollector::new(mock, 5);
        let (records, summary) = collector
            .collect(&[], "Finance", Duration::from_secs(5))
            .await;
        assert_eq!(
            records[0].url,
            "https://www.kaggle.com/datasets/mlg-ulb/creditcardfraud"
        );
        assert_eq!(summary.status, CollectorStatus::Fallback);
        assert_eq!(summary.error.unwrap().kind, ErrorKind::CollectorError);
    }

    #[tokio::test]
    async fn test_provider_error_unknown_domain_is_empty() {
        let mock = Arc::new(MockCatalog::new(Platform::GitHub).failing(ErrorCategory::Unavailable));
        let collector = ResourceCollector::new(mock, 5);
        let (records, summary) = collector
            .collect(&[], "Mining", Duration::from_secs(5))
            .await;
        assert!(records.is_empty());
        assert_eq!(summary.records, 0);
    }

    #[tokio::test]
    async fn test_slow_collector_times_out_to_fallback() {
        let mock = Arc::new(
            MockCatalog::new(Platform::HuggingFace)
                .records(vec![record(Platform::HuggingFace, "https://huggingface.co/x")])
                .delay(Duration::from_secs(5)),
        );
        let collector = ResourceCollector::new(mock, 5);
        let (records, summary) = collector
            .collect(&[], "Healthcare", Duration::from_millis(50))
            .await;
        assert_eq!(summary.error.unwrap().kind, ErrorKind::CollectorTimeout);
        assert!(
            records
                .iter()
                .any(|r| r.url == "https://huggingface.co/emilyalsentzer/Bio_ClinicalBERT")
        );
    }

    #[tokio::test]
    async fn test_unconfigured_catalog_never_called() {
        let mock = Arc::new(MockCatalog::new(Platform::Kaggle).unconfigured());
        let collector = ResourceCollector::new(mock.clone(), 5);
        let (records, summary) = collector
            .collect(&["fraud detection".to_string()], "Banking", Duration::from_secs(5))
            .await;
        assert_eq!(mock.calls(), 0);
        assert_eq!(summary.status, CollectorStatus::Fallback);
        assert!(summary.error.is_none());
        // both terms map to the same curated record
        assert_eq!(records.len(), 1);
    }
}
