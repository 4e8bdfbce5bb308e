//! Stage 2: use-case generation.
//!
//! Trend search, then one generation call that returns the formatted
//! use-case text. Prioritization and GenAI solution proposals are follow-up
//! calls whose failures are annotated rather than fatal. The formatted text
//! is stored as-is; [`UseCaseReport::use_cases`] parses it on demand.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::parser::{UseCase, parse_use_cases};
use super::prompts;
use super::research::ResearchReport;
use crate::ai::{CompletionRequest, SharedProvider};
use crate::config::Config;
use crate::constants::search::TREND_RESULTS_PER_QUERY;
use crate::industry::IndustryCategory;
use crate::search::{SearchClient, SearchResult, render_context};
use crate::types::StageError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseCaseReport {
    pub industry: String,
    pub category: IndustryCategory,
    #[serde(default)]
    pub trend_queries: Vec<String>,
    #[serde(default)]
    pub trend_results: Vec<SearchResult>,
    /// Generated text, parsed on demand
    pub formatted_use_cases: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prioritization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genai_solutions: Option<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<StageError>,
}

impl UseCaseReport {
    pub fn use_cases(&self) -> Vec<UseCase> {
        parse_use_cases(&self.formatted_use_cases)
    }
}

pub fn trend_queries(industry: &str) -> Vec<String> {
    vec![
        format!("{industry} AI use cases machine learning applications 2024"),
        format!("{industry} digital transformation artificial intelligence automation"),
        format!("{industry} AI implementation success stories case studies"),
        format!("{industry} machine learning business value ROI"),
    ]
}

pub struct UseCaseGenerator {
    search: SearchClient,
    llm: SharedProvider,
    count: usize,
    temperature: f32,
    creative_temperature: f32,
    max_tokens: u32,
}

impl UseCaseGenerator {
    pub fn new(search: SearchClient, llm: SharedProvider, config: &Config) -> Self {
        Self {
            search,
            llm,
            count: config.pipeline.use_case_count,
            temperature: config.llm.temperature,
            creative_temperature: config.llm.creative_temperature,
            max_tokens: super::token_cap(config),
        }
    }

    #[instrument(skip(self, research), fields(company = %research.company_name, industry = %research.identified_industry))]
    pub async fn run(&self, research: &ResearchReport) -> Result<UseCaseReport, StageError> {
        let industry = research.identified_industry.as_str();
        let company = research.company_name.as_str();
        let category = IndustryCategory::classify(industry);

        // Step 1: trends, the only step the rest depends on
        let queries = trend_queries(industry);
        let trend_results = self
            .search
            .search_many(&queries, self.search.depth(), TREND_RESULTS_PER_QUERY)
            .await;
        if trend_results.is_empty() {
            return Err(StageError::search_failed(format!(
                "no AI trend results for {}",
                industry
            )));
        }

        // Step 2: generation
        let request = CompletionRequest::new(
            prompts::use_case_user(
                company,
                industry,
                &research.analysis_json(),
                &render_context(&trend_results),
                self.count,
            ),
            self.creative_temperature,
            self.max_tokens,
        )
        .with_system(prompts::use_case_system(category, company, industry, self.count));
        let formatted_use_cases = self
            .complete_text(&request)
            .await
            .map_err(|detail| StageError::generation_failed(format!("use cases: {}", detail)))?;

        let mut report = UseCaseReport {
            industry: industry.to_string(),
            category,
            trend_queries: queries,
            trend_results,
            formatted_use_cases,
            prioritization: None,
            genai_solutions: None,
            status: "completed".to_string(),
            errors: Vec::new(),
        };

        // Step 3: prioritization
        let request = CompletionRequest::new(
            prompts::prioritization_user(
                company,
                industry,
                &report.formatted_use_cases,
                &research.prompt_document(),
            ),
            self.temperature,
            self.max_tokens,
        )
        .with_system(prompts::prioritization_system(company, industry, self.count));
        match self.complete_text(&request).await {
            Ok(text) => report.prioritization = Some(text),
            Err(detail) => report
                .errors
                .push(StageError::generation_failed(format!("prioritization: {}", detail))),
        }

        // Step 4: GenAI solutions
        let request = CompletionRequest::new(
            prompts::genai_user(company, industry, &research.analysis_json()),
            self.creative_temperature,
            self.max_tokens,
        )
        .with_system(prompts::genai_system(category, company, industry));
        match self.complete_text(&request).await {
            Ok(text) => report.genai_solutions = Some(text),
            Err(detail) => report
                .errors
                .push(StageError::generation_failed(format!("genai solutions: {}", detail))),
        }

        info!(
            %category,
            parsed = report.use_cases().len(),
            annotations = report.errors.len(),
            "Use-case generation complete"
        );
        Ok(report)
    }

    /// Non-empty completion text, or a failure description
    async fn complete_text(&self, request: &CompletionRequest) -> Result<String, String> {
        match self.llm.complete(request).await {
            Ok(response) if !response.text.trim().is_empty() => Ok(response.text),
            Ok(_) => {
                warn!("Completion returned empty text");
                Err("empty completion".to_string())
            }
            Err(err) => {
                warn!("Completion failed: {}", err);
                Err(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockLlm, MockSearch, hit};
    use crate::types::{ErrorCategory, ErrorKind};
    use std::sync::Arc;

    fn research(industry: &str) -> ResearchReport {
        ResearchReport {
            company_name: "Acme".to_string(),
            identified_industry: industry.to_string(),
            status: "completed".to_string(),
            ..Default::default()
        }
    }

    fn generator(search: MockSearch, llm: Arc<MockLlm>) -> UseCaseGenerator {
        let config = Config::default();
        UseCaseGenerator::new(SearchClient::new(Arc::new(search), &config.search), llm, &config)
    }

    fn formatted(count: usize) -> String {
        (1..=count)
            .map(|n| format!("**Use Case {n}: Case {n}**\n**Objective/Use Case:** Goal {n}\n\n"))
            .collect()
    }

    #[test]
    fn test_trend_queries() {
        let queries = trend_queries("Retail");
        assert_eq!(queries.len(), 4);
        assert_eq!(queries[3], "Retail machine learning business value ROI");
    }

    #[tokio::test]
    async fn test_empty_trend_search_is_fatal() {
        let llm = Arc::new(MockLlm::new().otherwise("unused"));
        let err = generator(MockSearch::new(), llm.clone())
            .run(&research("Retail"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::SearchFailed);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_full_generation() {
        let search = MockSearch::new().respond_any(vec![hit("https://news.example.com/ai")]);
        let text = formatted(10);
        let llm = Arc::new(
            MockLlm::new()
                .reply(prompts::USE_CASE_MARKER, &text)
                .reply(prompts::PRIORITIZE_MARKER, "Start with case 3")
                .reply(prompts::GENAI_MARKER, "1. Document search"),
        );
        let report = generator(search, llm.clone())
            .run(&research("Hospital Networks"))
            .await
            .unwrap();

        assert_eq!(report.category, IndustryCategory::Healthcare);
        assert_eq!(report.trend_results.len(), 4);
        assert_eq!(report.use_cases().len(), 10);
        assert_eq!(report.prioritization.as_deref(), Some("Start with case 3"));
        assert_eq!(report.genai_solutions.as_deref(), Some("1. Document search"));
        assert!(report.errors.is_empty());

        let requests = llm.requests();
        assert_eq!(requests.len(), 3);
        let system = requests[0].system.as_deref().unwrap();
        assert!(system.contains("healthcare and medical companies"));
        assert_eq!(requests[0].temperature, Config::default().llm.creative_temperature);
    }

    #[tokio::test]
    async fn test_generation_failure_is_stage_error() {
        let search = MockSearch::new().respond_any(vec![hit("https://news.example.com/ai")]);
        let llm = Arc::new(MockLlm::new().fail(prompts::USE_CASE_MARKER, ErrorCategory::RateLimit));
        let err = generator(search, llm).run(&research("Retail")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::GenerationFailed);
    }

    #[tokio::test]
    async fn test_empty_generation_is_stage_error() {
        let search = MockSearch::new().respond_any(vec![hit("https://news.example.com/ai")]);
        let llm = Arc::new(MockLlm::new().reply(prompts::USE_CASE_MARKER, "   \n"));
        let err = generator(search, llm).run(&research("Retail")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::GenerationFailed);
    }

    #[tokio::test]
    async fn test_follow_up_failures_are_annotated() {
        let search = MockSearch::new().respond_any(vec![hit("https://news.example.com/ai")]);
        let text = formatted(3);
        let llm = Arc::new(
            MockLlm::new()
                .reply(prompts::USE_CASE_MARKER, &text)
                .fail(prompts::PRIORITIZE_MARKER, ErrorCategory::Transient)
                .reply(prompts::GENAI_MARKER, ""),
        );
        let report = generator(search, llm).run(&research("Retail")).await.unwrap();

        assert_eq!(report.status, "completed");
        assert!(report.prioritization.is_none());
        assert!(report.genai_solutions.is_none());
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors.iter().all(|e| e.kind == ErrorKind::GenerationFailed));
    }
}
