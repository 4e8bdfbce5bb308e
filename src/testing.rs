//! In-memory providers for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::ai::{CompletionRequest, LlmProvider, LlmResponse};
use crate::resources::{CatalogProvider, Platform, ResourceRecord};
use crate::search::{SearchDepth, SearchHit, SearchProvider};
use crate::types::{ErrorCategory, Result, ScopeError};

pub fn hit(url: &str) -> SearchHit {
    SearchHit {
        title: format!("Result {}", url),
        url: url.to_string(),
        content: format!("Snippet for {}", url),
        score: 0.5,
    }
}

/// Search provider answering exact queries from a table
#[derive(Default)]
pub struct MockSearch {
    responses: HashMap<String, Vec<SearchHit>>,
    default: Vec<SearchHit>,
    failures: usize,
    failure_category: Option<ErrorCategory>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, query: &str, hits: Vec<SearchHit>) -> Self {
        self.responses.insert(query.to_string(), hits);
        self
    }

    /// Hits for any query without an exact entry
    pub fn respond_any(mut self, hits: Vec<SearchHit>) -> Self {
        self.default = hits;
        self
    }

    /// The first `n` calls fail with `category`
    pub fn fail_first(mut self, n: usize, category: ErrorCategory) -> Self {
        self.failures = n;
        self.failure_category = Some(category);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(
        &self,
        query: &str,
        _depth: SearchDepth,
        max_results: usize,
    ) -> Result<Vec<SearchHit>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(category) = self.failure_category
            && call < self.failures
        {
            return Err(ScopeError::provider(category, "scripted search failure"));
        }
        let hits = self.responses.get(query).unwrap_or(&self.default);
        Ok(hits.iter().take(max_results).cloned().collect())
    }

    fn name(&self) -> &str {
        "mock-search"
    }
}

enum Reply {
    Text(String),
    Fail(ErrorCategory),
}

/// Completion provider scripted by prompt substring. Rules are checked in
/// insertion order against the system and user text.
#[derive(Default)]
pub struct MockLlm {
    rules: Vec<(String, Reply)>,
    otherwise: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, when: &str, text: &str) -> Self {
        self.rules
            .push((when.to_string(), Reply::Text(text.to_string())));
        self
    }

    pub fn fail(mut self, when: &str, category: ErrorCategory) -> Self {
        self.rules.push((when.to_string(), Reply::Fail(category)));
        self
    }

    pub fn otherwise(mut self, text: &str) -> Self {
        self.otherwise = Some(text.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for MockLlm {
    async fn complete(&self, request: &CompletionRequest) -> Result<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let haystack = format!(
            "{}\n{}",
            request.system.as_deref().unwrap_or_default(),
            request.user
        );
        let rule = self
            .rules
            .iter()
            .find(|(needle, _)| haystack.contains(needle.as_str()));
        match rule {
            Some((_, Reply::Text(text))) => Ok(LlmResponse::text_only(text.clone())),
            Some((_, Reply::Fail(category))) => {
                Err(ScopeError::provider(*category, "scripted completion failure"))
            }
            None => match &self.otherwise {
                Some(text) => Ok(LlmResponse::text_only(text.clone())),
                None => Err(ScopeError::provider(
                    ErrorCategory::BadRequest,
                    "no scripted reply",
                )),
            },
        }
    }

    fn name(&self) -> &str {
        "mock-llm"
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

/// Catalog returning a fixed record list
pub struct MockCatalog {
    platform: Platform,
    records: Vec<ResourceRecord>,
    failure: Option<ErrorCategory>,
    configured: bool,
    delay: Duration,
    calls: AtomicUsize,
}

impl MockCatalog {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            records: Vec::new(),
            failure: None,
            configured: true,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn records(mut self, records: Vec<ResourceRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn failing(mut self, category: ErrorCategory) -> Self {
        self.failure = Some(category);
        self
    }

    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogProvider for MockCatalog {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn search(&self, term: &str, limit: usize) -> Result<Vec<ResourceRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(category) = self.failure {
            return Err(ScopeError::provider(category, "scripted catalog failure"));
        }
        Ok(self
            .records
            .iter()
            .take(limit)
            .cloned()
            .map(|r| r.with_term(term))
            .collect())
    }
}
