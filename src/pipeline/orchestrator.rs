//! Stage sequencing and fallback policy.
//!
//! | Stage | Failure | Outcome |
//! |-------|---------|---------|
//! | 1 research | `search_failed` | canned research, else run `failed` |
//! | 1 research | panic | run `failed` |
//! | 2 use cases | error or panic | built-in use cases once, else run `partial` |
//! | 3 resources | timeout or panic | empty resource set |
//!
//! A run that reaches final assembly is `completed` unless it was marked
//! `partial` on the way. Every outcome is returned as an [`AnalysisReport`];
//! nothing escapes [`Orchestrator::run`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{error, info, instrument, warn};

use super::canned;
use super::mapper::{MappingSource, ResourceMapper, ResourceMapping, UseCaseInput};
use super::persist::{ArtifactPaths, ReportWriter};
use super::report::{AnalysisReport, FinalProposal};
use super::research::{ResearchReport, Researcher};
use super::usecases::{UseCaseGenerator, UseCaseReport};
use crate::ai::{OpenAiProvider, SharedProvider, with_timeout};
use crate::config::{Config, Credentials};
use crate::resources::{ResourceCollectors, SharedCatalog};
use crate::search::{SearchClient, SharedSearchProvider, TavilyProvider};
use crate::types::{ErrorKind, Result, ScopeError, StageError};

/// One analysis run
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub company: String,
    /// Map these instead of the generated use cases in Stage 3
    pub predefined_use_cases: Option<Vec<UseCaseInput>>,
}

impl AnalysisRequest {
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            predefined_use_cases: None,
        }
    }

    pub fn with_use_cases(mut self, use_cases: Vec<UseCaseInput>) -> Self {
        self.predefined_use_cases = Some(use_cases);
        self
    }
}

pub struct Orchestrator {
    researcher: Researcher,
    generator: UseCaseGenerator,
    mapper: ResourceMapper,
    config: Config,
}

impl Orchestrator {
    /// Wire the stages over explicit providers. Configuration is validated
    /// before anything runs.
    pub fn new(
        search: SharedSearchProvider,
        llm: SharedProvider,
        catalogs: Vec<SharedCatalog>,
        config: Config,
    ) -> Result<Self> {
        config.validate()?;
        let search = SearchClient::new(search, &config.search);
        Ok(Self {
            researcher: Researcher::new(search.clone(), llm.clone(), &config),
            generator: UseCaseGenerator::new(search.clone(), llm, &config),
            mapper: ResourceMapper::new(
                search,
                ResourceCollectors::new(catalogs, &config.resources),
            ),
            config,
        })
    }

    /// Production wiring: OpenAI, Tavily and the three catalog APIs.
    /// Missing or malformed required credentials abort here.
    pub fn from_config(config: Config, credentials: &Credentials) -> Result<Self> {
        credentials.validate()?;
        config.validate()?;

        let openai_key = credentials
            .openai_api_key
            .clone()
            .ok_or_else(|| ScopeError::Config("OPENAI_API_KEY is not set".to_string()))?;
        let tavily_key = credentials
            .tavily_api_key
            .clone()
            .ok_or_else(|| ScopeError::Config("TAVILY_API_KEY is not set".to_string()))?;

        let llm: SharedProvider = Arc::new(OpenAiProvider::new(&config.llm, openai_key)?);
        let search: SharedSearchProvider =
            Arc::new(TavilyProvider::new(&config.search, tavily_key)?);
        let collectors = ResourceCollectors::from_config(&config.resources, credentials)?;

        let client = SearchClient::new(search, &config.search);
        Ok(Self {
            researcher: Researcher::new(client.clone(), llm.clone(), &config),
            generator: UseCaseGenerator::new(client.clone(), llm, &config),
            mapper: ResourceMapper::new(client, collectors),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run(&self, company: &str) -> AnalysisReport {
        self.run_request(&AnalysisRequest::new(company)).await
    }

    #[instrument(skip(self, request), fields(company = %request.company))]
    pub async fn run_request(&self, request: &AnalysisRequest) -> AnalysisReport {
        info!("Starting complete analysis");
        let mut report = AnalysisReport::new(&request.company);

        let outcome = AssertUnwindSafe(self.execute(request, &mut report))
            .catch_unwind()
            .await;
        if let Err(panic) = outcome {
            let message = panic_message(panic);
            error!("Analysis workflow panicked: {}", message);
            report.fail(format!("Unexpected failure: {}", message));
        }

        info!(
            status = %report.workflow_status,
            use_cases = report.counts.use_cases,
            resources = report.counts.resources,
            "Analysis finished"
        );
        report
    }

    async fn execute(&self, request: &AnalysisRequest, report: &mut AnalysisReport) {
        let company = request.company.as_str();
        let pipeline = &self.config.pipeline;

        info!("Stage 1: company and industry research");
        let Some(research) = self.research_stage(company, report).await else {
            return;
        };
        report.set_research(research.clone());

        info!("Stage 2: use-case generation");
        let use_cases = self.use_case_stage(&research, report).await;
        if let Some(use_cases) = &use_cases {
            report.set_use_cases(use_cases.clone());
        }

        info!("Stage 3: resource mapping");
        let industry = use_cases
            .as_ref()
            .map(|u| u.industry.clone())
            .unwrap_or_else(|| research.identified_industry.clone());
        let mapping = if pipeline.fast_mode {
            info!("Fast mode: using canned resources");
            ResourceMapping {
                rows: Vec::new(),
                collected: canned::fast_resources(company),
            }
        } else {
            let source = match (&request.predefined_use_cases, &use_cases) {
                (Some(list), _) => MappingSource::Predefined(list),
                (None, Some(generated)) => MappingSource::Generated(generated),
                (None, None) => MappingSource::Empty,
            };
            self.resource_stage(source, &industry, report).await
        };

        info!("Final assembly");
        let paths = ArtifactPaths::new(
            &self.config.output,
            company,
            &mapping.collected.industry,
            report.timestamp,
        );
        report.set_resources(mapping);
        let proposal = FinalProposal::assemble(report, Some(paths.resources.display().to_string()));
        report.set_proposal(proposal);

        let writer = ReportWriter::new(paths, &self.config.output);
        writer.write_markdown(report);
        report.record_path(writer.paths().json.display().to_string());
        report.finish();

        if let Err(err) = writer.write_json(report) {
            error!("Failed to save complete results: {}", err);
        }
    }

    async fn research_stage(&self, company: &str, report: &mut AnalysisReport) -> Option<ResearchReport> {
        if self.config.pipeline.ultra_fast_mode {
            info!("Ultra-fast mode: using research template");
            return Some(canned::ultra_fast_research(company));
        }

        match self.researcher.run(company).await {
            Ok(research) => Some(research),
            Err(err) => {
                report.record_stage_error(err.clone());
                if err.kind == ErrorKind::SearchFailed && self.config.pipeline.research_fallback {
                    warn!("Primary search failed, using fallback research");
                    Some(canned::fallback_research(company))
                } else {
                    error!("Research stage failed: {}", err);
                    report.fail(format!("Research stage failed: {}", err));
                    None
                }
            }
        }
    }

    async fn use_case_stage(
        &self,
        research: &ResearchReport,
        report: &mut AnalysisReport,
    ) -> Option<UseCaseReport> {
        let outcome = AssertUnwindSafe(self.generator.run(research))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(StageError::generation_failed(panic_message(panic))));

        match outcome {
            Ok(use_cases) => Some(use_cases),
            Err(err) => {
                report.record_stage_error(err.clone());
                if self.config.pipeline.use_case_fallback {
                    warn!("Use-case generation failed, using built-in use cases: {}", err);
                    Some(canned::fallback_use_cases(&research.identified_industry))
                } else {
                    warn!("Use-case generation failed, continuing without use cases: {}", err);
                    report.mark_partial(format!("Use-case stage failed: {}", err));
                    None
                }
            }
        }
    }

    async fn resource_stage(
        &self,
        source: MappingSource<'_>,
        industry: &str,
        report: &mut AnalysisReport,
    ) -> ResourceMapping {
        let budget = Duration::from_secs(self.config.pipeline.resource_stage_timeout_secs);
        let work = async {
            AssertUnwindSafe(self.mapper.run(source, industry))
                .catch_unwind()
                .await
                .map_err(|panic| ScopeError::Stage {
                    stage: "resources".to_string(),
                    error: StageError::new(ErrorKind::CollectorError, panic_message(panic)),
                })
        };

        match with_timeout(budget, work, "resource stage").await {
            Ok(mapping) => mapping,
            Err(err) => {
                warn!("Resource stage failed, continuing without resources: {}", err);
                let error = match err {
                    ScopeError::Stage { error, .. } => error,
                    other => StageError::new(ErrorKind::CollectorTimeout, other.to_string()),
                };
                report.record_stage_error(error);
                ResourceMapping::empty(industry, "failed")
            }
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "Unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{CompletionRequest, LlmProvider, LlmResponse};
    use crate::pipeline::prompts;
    use crate::pipeline::report::WorkflowStatus;
    use crate::pipeline::research::company_queries;
    use crate::pipeline::usecases::trend_queries;
    use crate::resources::Platform;
    use crate::testing::{MockCatalog, MockLlm, MockSearch, hit};
    use crate::types::ErrorCategory;
    use async_trait::async_trait;
    use tempfile::TempDir;

    fn formatted(count: usize) -> String {
        (1..=count)
            .map(|n| format!("**Use Case {n}: Case {n}**\n**Objective/Use Case:** Goal {n}\n\n"))
            .collect()
    }

    fn config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.output.reports_dir = dir.path().join("reports");
        config.output.output_dir = dir.path().join("output");
        config.search.retry_base_delay_ms = 0;
        config
    }

    fn catalogs() -> Vec<SharedCatalog> {
        Platform::ALL
            .into_iter()
            .map(|p| Arc::new(MockCatalog::new(p)) as SharedCatalog)
            .collect()
    }

    fn generating_llm() -> Arc<MockLlm> {
        Arc::new(
            MockLlm::new()
                .reply(prompts::IDENTIFY_MARKER, "Retail")
                .reply(prompts::ANALYSIS_MARKER, "prose analysis")
                .reply(prompts::USE_CASE_MARKER, &formatted(10))
                .reply(prompts::PRIORITIZE_MARKER, "Start with case 1")
                .reply(prompts::GENAI_MARKER, "1. Shopping assistant"),
        )
    }

    /// Company searches come back empty; trend searches for the fallback
    /// industry do not
    fn acme_search() -> MockSearch {
        trend_queries("Technology")
            .iter()
            .fold(MockSearch::new(), |search, q| {
                search.respond(q, vec![hit("https://news.example.com/ai")])
            })
    }

    fn orchestrator(search: MockSearch, llm: Arc<MockLlm>, config: Config) -> Orchestrator {
        Orchestrator::new(Arc::new(search), llm, catalogs(), config).unwrap()
    }

    #[tokio::test]
    async fn test_empty_company_search_masked_by_fallback() {
        let dir = TempDir::new().unwrap();
        let report = orchestrator(acme_search(), generating_llm(), config(&dir))
            .run("Acme")
            .await;

        assert_eq!(report.workflow_status, WorkflowStatus::Completed);
        let research = report.stage_outputs.research.as_ref().unwrap();
        assert_eq!(research.identified_industry, "Technology");
        assert_eq!(research.status, "fallback_completed");
        assert_eq!(report.stage_errors[0].kind, ErrorKind::SearchFailed);

        let use_cases = report.stage_outputs.use_cases.as_ref().unwrap();
        assert_eq!(use_cases.status, "completed");
        assert_eq!(use_cases.industry, "Technology");
        assert_eq!(report.counts.use_cases, 10);
        assert_eq!(
            report.stage_outputs.resources.as_ref().unwrap().collected.industry,
            "Technology"
        );

        assert!(report.final_proposal.is_some());
        assert_eq!(report.persisted_file_paths.len(), 4);
        for path in &report.persisted_file_paths {
            assert!(std::path::Path::new(path).exists(), "{path} missing");
        }
    }

    #[tokio::test]
    async fn test_same_mocks_same_shape() {
        let dir = TempDir::new().unwrap();
        let first = orchestrator(acme_search(), generating_llm(), config(&dir))
            .run("Acme")
            .await;
        let second = orchestrator(acme_search(), generating_llm(), config(&dir))
            .run("Acme")
            .await;
        assert_eq!(first.workflow_status, second.workflow_status);
        assert_eq!(first.counts, second.counts);
        assert_ne!(first.run_id, second.run_id);
    }

    #[tokio::test]
    async fn test_generation_failure_uses_builtin_cases() {
        let dir = TempDir::new().unwrap();
        let llm = Arc::new(MockLlm::new().fail(prompts::USE_CASE_MARKER, ErrorCategory::RateLimit));
        let report = orchestrator(acme_search(), llm, config(&dir)).run("Acme").await;

        assert_eq!(report.workflow_status, WorkflowStatus::Completed);
        let use_cases = report.stage_outputs.use_cases.as_ref().unwrap();
        assert_eq!(use_cases.status, "fallback_completed");
        assert_eq!(report.counts.use_cases, 10);
        assert!(
            report
                .stage_errors
                .iter()
                .any(|e| e.kind == ErrorKind::GenerationFailed)
        );
    }

    #[tokio::test]
    async fn test_use_case_failure_without_fallback_is_partial() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.pipeline.use_case_fallback = false;
        // no trend results at all
        let report = orchestrator(MockSearch::new(), generating_llm(), config)
            .run("Acme")
            .await;

        assert_eq!(report.workflow_status, WorkflowStatus::Partial);
        assert!(report.error.as_deref().unwrap().contains("search_failed"));
        assert!(report.stage_outputs.use_cases.is_none());
        // downstream still ran and persisted
        assert!(report.stage_outputs.resources.is_some());
        assert_eq!(report.counts.use_cases, 0);
        assert!(!report.persisted_file_paths.is_empty());
    }

    #[tokio::test]
    async fn test_research_failure_without_fallback_fails_run() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.pipeline.research_fallback = false;
        let llm = generating_llm();
        let report = orchestrator(MockSearch::new(), llm.clone(), config)
            .run("Acme")
            .await;

        assert_eq!(report.workflow_status, WorkflowStatus::Failed);
        assert!(report.error.as_deref().unwrap().starts_with("Research stage failed"));
        assert!(report.stage_outputs.research.is_none());
        assert!(report.persisted_file_paths.is_empty());
        assert_eq!(llm.calls(), 0);
        assert!(!dir.path().join("reports").exists());
    }

    #[tokio::test]
    async fn test_speed_presets_skip_research_and_collectors() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.pipeline.fast_mode = true;
        config.pipeline.ultra_fast_mode = true;
        let llm = generating_llm();
        let report = orchestrator(acme_search(), llm.clone(), config)
            .run("apple")
            .await;

        assert_eq!(report.workflow_status, WorkflowStatus::Completed);
        let research = report.stage_outputs.research.as_ref().unwrap();
        assert_eq!(research.status, "ultra_fast_completed");
        assert_eq!(research.company_name, "Apple");
        let resources = report.stage_outputs.resources.as_ref().unwrap();
        assert_eq!(resources.collected.status, "fast_fallback_completed");
        assert_eq!(report.counts.resources, 3);
        // identify and analysis never asked; fast mode caps tokens
        let requests = llm.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.max_tokens <= 2000));
    }

    #[tokio::test]
    async fn test_slow_resource_stage_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.pipeline.resource_stage_timeout_secs = 1;
        let slow: Vec<SharedCatalog> = Platform::ALL
            .into_iter()
            .map(|p| Arc::new(MockCatalog::new(p).delay(Duration::from_secs(3))) as SharedCatalog)
            .collect();
        let orchestrator =
            Orchestrator::new(Arc::new(acme_search()), generating_llm(), slow, config).unwrap();
        let report = orchestrator.run("Acme").await;

        assert_eq!(report.workflow_status, WorkflowStatus::Completed);
        let resources = report.stage_outputs.resources.as_ref().unwrap();
        assert_eq!(resources.collected.total(), 0);
        assert_eq!(resources.collected.status, "failed");
        assert!(
            report
                .stage_errors
                .iter()
                .any(|e| e.kind == ErrorKind::CollectorTimeout)
        );
    }

    #[tokio::test]
    async fn test_predefined_use_cases_drive_reference_rows() {
        let dir = TempDir::new().unwrap();
        let request = AnalysisRequest::new("Acme")
            .with_use_cases(vec![UseCaseInput::new("Fraud Detection", "Flag payments")]);
        let report = orchestrator(acme_search(), generating_llm(), config(&dir))
            .run_request(&request)
            .await;

        let rows = &report.stage_outputs.resources.as_ref().unwrap().rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].use_case, "Fraud Detection");
    }

    struct PanickingLlm;

    #[async_trait]
    impl LlmProvider for PanickingLlm {
        async fn complete(&self, _request: &CompletionRequest) -> Result<LlmResponse> {
            panic!("provider exploded");
        }

        fn name(&self) -> &str {
            "panicking"
        }

        fn model(&self) -> &str {
            "none"
        }
    }

    #[tokio::test]
    async fn test_unexpected_panic_becomes_failed_status() {
        let dir = TempDir::new().unwrap();
        let search = company_queries("Acme")
            .iter()
            .fold(MockSearch::new(), |s, q| s.respond(q, vec![hit("https://acme.com")]));
        let orchestrator =
            Orchestrator::new(Arc::new(search), Arc::new(PanickingLlm), catalogs(), config(&dir))
                .unwrap();
        let report = orchestrator.run("Acme").await;

        assert_eq!(report.workflow_status, WorkflowStatus::Failed);
        assert!(report.error.as_deref().unwrap().contains("provider exploded"));
    }

    #[test]
    fn test_missing_credentials_fail_fast() {
        let result = Orchestrator::from_config(Config::default(), &Credentials::default());
        assert!(matches!(result, Err(ScopeError::Config(_))));
    }
}
