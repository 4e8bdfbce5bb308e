//! Per-use-case reference lookup through web search.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Platform;
use crate::constants::resources::{MAX_REFERENCES, MIN_REFERENCES, QUERY_DESCRIPTION_CHARS};
use crate::search::{SearchClient, SearchResult};

/// Results requested per targeted query
const RESULTS_PER_QUERY: usize = 10;

/// Quota shares by platform, in priority order
const QUOTA_SHARES: [(Platform, f64); 2] = [(Platform::Kaggle, 0.40), (Platform::HuggingFace, 0.30)];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetLink {
    pub title: String,
    pub url: String,
}

impl From<SearchResult> for DatasetLink {
    fn from(result: SearchResult) -> Self {
        let title = if result.title.trim().is_empty() {
            result.url.clone()
        } else {
            result.title
        };
        Self {
            title,
            url: result.url,
        }
    }
}

/// Two site-restricted queries per catalog: one with the description
/// prefix folded in, one with the title alone.
pub fn dataset_queries(use_case: &str, description: &str) -> Vec<String> {
    let prefix: String = description.chars().take(QUERY_DESCRIPTION_CHARS).collect();
    let base = format!("{} {}", use_case, prefix);
    vec![
        format!("{} dataset site:kaggle.com", base),
        format!("{} dataset site:kaggle.com", use_case),
        format!("{} dataset site:huggingface.co", base),
        format!("{} dataset site:huggingface.co", use_case),
        format!("{} (dataset OR api OR repository) site:github.com", base),
        format!("{} (dataset OR api OR repository) site:github.com", use_case),
    ]
}

/// Search the three catalogs for one use case and pick 3..=6 references.
pub async fn fetch_datasets(
    search: &SearchClient,
    use_case: &str,
    description: &str,
) -> Vec<DatasetLink> {
    let queries = dataset_queries(use_case, description);
    let hits = search
        .search_many(&queries, search.depth(), RESULTS_PER_QUERY)
        .await;
    let candidates: Vec<DatasetLink> = hits
        .into_iter()
        .filter(|hit| !hit.url.is_empty())
        .map(DatasetLink::from)
        .collect();
    let picked = select_references(candidates);
    debug!(use_case, references = picked.len(), "Dataset references selected");
    picked
}

/// Deduplicate by url, keep catalog hosts only, and fill a target of
/// `clamp(n, 3, 6)` with a 40/30/30 Kaggle/HuggingFace/GitHub split. Each
/// quota is at least one when that catalog has candidates; any shortfall is
/// backfilled in priority order.
pub fn select_references(candidates: Vec<DatasetLink>) -> Vec<DatasetLink> {
    let mut seen = HashSet::new();
    let mut pools: [Vec<DatasetLink>; 3] = Default::default();
    for link in candidates {
        if !seen.insert(link.url.clone()) {
            continue;
        }
        if let Some(platform) = Platform::from_url(&link.url) {
            pools[pool_index(platform)].push(link);
        }
    }

    let available: usize = pools.iter().map(Vec::len).sum();
    let target = available.clamp(MIN_REFERENCES, MAX_REFERENCES);
    if target <= MIN_REFERENCES {
        return pools.into_iter().flatten().take(target).collect();
    }

    let mut quotas = [0usize; 3];
    for (platform, share) in QUOTA_SHARES {
        let index = pool_index(platform);
        let wanted = ((target as f64) * share).round() as usize;
        quotas[index] = pools[index].len().min(wanted.max(1));
    }
    let github = pool_index(Platform::GitHub);
    let rest = target.saturating_sub(quotas[0] + quotas[1]);
    quotas[github] = pools[github].len().min(rest.max(1));

    let mut taken = [0usize; 3];
    let mut picked = Vec::with_capacity(target);
    for (index, pool) in pools.iter().enumerate() {
        picked.extend(pool.iter().take(quotas[index]).cloned());
        taken[index] = quotas[index].min(pool.len());
    }

    // Backfill one item per pool per round, Kaggle first
    while picked.len() < target {
        let before = picked.len();
        for (index, pool) in pools.iter().enumerate() {
            if picked.len() >= target {
                break;
            }
            if let Some(link) = pool.get(taken[index]) {
                picked.push(link.clone());
                taken[index] += 1;
            }
        }
        if picked.len() == before {
            break;
        }
    }
    picked.truncate(target);
    picked
}

fn pool_index(platform: Platform) -> usize {
    match platform {
        Platform::Kaggle => 0,
        Platform::HuggingFace => 1,
        Platform::GitHub => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::testing::{MockSearch, hit};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn link(url: &str) -> DatasetLink {
        DatasetLink {
            title: url.to_string(),
            url: url.to_string(),
        }
    }

    fn kaggle(n: usize) -> String {
        format!("https://www.kaggle.com/datasets/u/d{}", n)
    }
    fn hf(n: usize) -> String {
        format!("https://huggingface.co/datasets/u/d{}", n)
    }
    fn gh(n: usize) -> String {
        format!("https://github.com/u/r{}", n)
    }

    fn platforms(links: &[DatasetLink]) -> Vec<Platform> {
        links
            .iter()
            .filter_map(|l| Platform::from_url(&l.url))
            .collect()
    }

    #[test]
    fn test_queries_two_per_catalog() {
        let description = "x".repeat(300);
        let queries = dataset_queries("Churn Prediction", &description);
        assert_eq!(queries.len(), 6);
        assert!(queries[0].contains(&"x".repeat(120)));
        assert!(!queries[0].contains(&"x".repeat(121)));
        assert_eq!(queries[1], "Churn Prediction dataset site:kaggle.com");
        assert!(queries[5].ends_with("site:github.com"));
    }

    #[test]
    fn test_quota_split_at_six() {
        let mut candidates = Vec::new();
        for n in 0..5 {
            candidates.push(link(&gh(n)));
            candidates.push(link(&hf(n)));
            candidates.push(link(&kaggle(n)));
        }
        let picked = select_references(candidates);
        assert_eq!(
            platforms(&picked),
            vec![
                Platform::Kaggle,
                Platform::Kaggle,
                Platform::HuggingFace,
                Platform::HuggingFace,
                Platform::GitHub,
                Platform::GitHub,
            ]
        );
    }

    #[test]
    fn test_backfill_when_catalog_missing() {
        let candidates = (0..5).map(|n| link(&kaggle(n))).chain([link(&gh(0))]).collect();
        let picked = select_references(candidates);
        assert_eq!(picked.len(), 6);
        assert_eq!(
            platforms(&picked),
            vec![
                Platform::Kaggle,
                Platform::Kaggle,
                Platform::GitHub,
                Platform::Kaggle,
                Platform::Kaggle,
                Platform::Kaggle,
            ]
        );
    }

    #[test]
    fn test_small_pool_returns_priority_order() {
        let picked = select_references(vec![link(&gh(0)), link(&kaggle(0))]);
        assert_eq!(platforms(&picked), vec![Platform::Kaggle, Platform::GitHub]);
    }

    #[test]
    fn test_non_catalog_urls_and_duplicates_dropped() {
        let picked = select_references(vec![
            link("https://example.com/data"),
            link(&kaggle(1)),
            link(&kaggle(1)),
            link(&hf(1)),
            link(&gh(1)),
        ]);
        assert_eq!(picked.len(), 3);
        assert!(picked.iter().all(|l| !l.url.contains("example.com")));
    }

    #[tokio::test]
    async fn test_fetch_datasets_end_to_end() {
        let mock = Arc::new(
            MockSearch::new()
                .respond(
                    "Fraud Detection dataset site:kaggle.com",
                    vec![hit(&kaggle(1)), hit(&kaggle(2))],
                )
                .respond(
                    "Fraud Detection dataset site:huggingface.co",
                    vec![hit(&hf(1)), hit(&kaggle(1))],
                )
                .respond(
                    "Fraud Detection (dataset OR api OR repository) site:github.com",
                    vec![hit(&gh(1)), hit("https://blog.example.com/post")],
                ),
        );
        let client = SearchClient::new(mock, &SearchConfig::default());
        let picked = fetch_datasets(&client, "Fraud Detection", "").await;
        assert_eq!(picked.len(), 4);
        assert_eq!(picked[0].url, kaggle(1));
    }

    proptest! {
        #[test]
        fn prop_bounds_and_uniqueness(
            urls in prop::collection::vec((0usize..4, 0usize..8), 0..40)
        ) {
            let candidates: Vec<DatasetLink> = urls
                .iter()
                .map(|(host, n)| match host {
                    0 => link(&kaggle(*n)),
                    1 => link(&hf(*n)),
                    2 => link(&gh(*n)),
                    _ => link(&format!("https://example.org/{}", n)),
                })
                .collect();
            let distinct_catalog: HashSet<_> = candidates
                .iter()
                .filter(|l| Platform::from_url(&l.url).is_some())
                .map(|l| l.url.clone())
                .collect();

            let picked = select_references(candidates);
            let unique: HashSet<_> = picked.iter().map(|l| l.url.clone()).collect();

            prop_assert_eq!(unique.len(), picked.len());
            prop_assert!(picked.len() <= MAX_REFERENCES);
            if distinct_catalog.len() >= MIN_REFERENCES {
                prop_assert!(picked.len() >= MIN_REFERENCES);
            } else {
                prop_assert_eq!(picked.len(), distinct_catalog.len());
            }
        }
    }
}
