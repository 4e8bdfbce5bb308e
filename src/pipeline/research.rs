//! Stage 1: company and industry research.
//!
//! ```text
//! SearchCompany -> IdentifyIndustry -> SearchIndustry -> Analyze -> Done
//!       |
//!       +-> Failed (no company results at all)
//! ```
//!
//! Only an empty company search is fatal. A failed industry identification
//! falls back to a default label, an empty industry search is annotated, and
//! the analysis call keeps the raw model text when it cannot be decoded.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::prompts;
use crate::ai::{CompletionRequest, Extracted, SharedProvider, decode_or_preserve};
use crate::config::Config;
use crate::constants::{pipeline::DEFAULT_INDUSTRY, search::MIN_RESULTS_PER_QUERY};
use crate::search::{SearchClient, SearchResult, render_context};
use crate::types::lenient::{flexible_text, lenient_items, or_default, string_list};
use crate::types::{ErrorKind, StageError};

// =============================================================================
// Analysis Document
// =============================================================================

/// A named entry with free-text description (business unit, product, segment)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedItem {
    #[serde(deserialize_with = "flexible_text")]
    pub name: String,
    #[serde(deserialize_with = "flexible_text")]
    pub description: String,
}

impl From<String> for NamedItem {
    fn from(name: String) -> Self {
        Self {
            name,
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Competitor {
    #[serde(deserialize_with = "flexible_text")]
    pub name: String,
    #[serde(deserialize_with = "flexible_text")]
    pub reason: String,
}

impl From<String> for Competitor {
    fn from(name: String) -> Self {
        Self {
            name,
            reason: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trend {
    #[serde(alias = "name", deserialize_with = "flexible_text")]
    pub trend: String,
    #[serde(deserialize_with = "flexible_text")]
    pub description: String,
}

impl From<String> for Trend {
    fn from(trend: String) -> Self {
        Self {
            trend,
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusArea {
    #[serde(alias = "name", deserialize_with = "flexible_text")]
    pub area: String,
    #[serde(deserialize_with = "flexible_text")]
    pub description: String,
}

impl From<String> for FocusArea {
    fn from(area: String) -> Self {
        Self {
            area,
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Opportunity {
    #[serde(alias = "name", deserialize_with = "flexible_text")]
    pub opportunity: String,
    #[serde(deserialize_with = "flexible_text")]
    pub description: String,
}

impl From<String> for Opportunity {
    fn from(opportunity: String) -> Self {
        Self {
            opportunity,
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Citation {
    #[serde(deserialize_with = "flexible_text")]
    pub title: String,
    #[serde(deserialize_with = "flexible_text")]
    pub url: String,
    #[serde(deserialize_with = "flexible_text")]
    pub source: String,
}

impl From<String> for Citation {
    fn from(text: String) -> Self {
        if text.starts_with("http://") || text.starts_with("https://") {
            Self {
                url: text,
                ..Default::default()
            }
        } else {
            Self {
                title: text,
                ..Default::default()
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyAnalysis {
    #[serde(alias = "businesses", deserialize_with = "lenient_items")]
    pub business_units: Vec<NamedItem>,
    #[serde(deserialize_with = "lenient_items")]
    pub products: Vec<NamedItem>,
    #[serde(deserialize_with = "lenient_items")]
    pub segments: Vec<NamedItem>,
    #[serde(deserialize_with = "flexible_text")]
    pub business_model: String,
    #[serde(deserialize_with = "string_list")]
    pub key_offerings: Vec<String>,
    #[serde(deserialize_with = "flexible_text")]
    pub strategic_focus: String,
    #[serde(deserialize_with = "lenient_items")]
    pub competitors: Vec<Competitor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndustryAnalysis {
    #[serde(deserialize_with = "lenient_items")]
    pub market_trends: Vec<Trend>,
    #[serde(alias = "strategic_focus", deserialize_with = "lenient_items")]
    pub strategic_focus_areas: Vec<FocusArea>,
    #[serde(deserialize_with = "lenient_items")]
    pub growth_opportunities: Vec<Opportunity>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredAnalysis {
    #[serde(deserialize_with = "or_default")]
    pub company_analysis: CompanyAnalysis,
    #[serde(deserialize_with = "or_default")]
    pub industry_analysis: IndustryAnalysis,
    #[serde(deserialize_with = "lenient_items")]
    pub citations: Vec<Citation>,
}

impl StructuredAnalysis {
    /// Nothing recognizable was decoded
    pub fn is_empty(&self) -> bool {
        self.company_analysis == CompanyAnalysis::default()
            && self.industry_analysis == IndustryAnalysis::default()
            && self.citations.is_empty()
    }

    fn dedupe_citations(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.citations
            .retain(|c| c.url.is_empty() || seen.insert(c.url.clone()));
    }
}

/// Analysis document: decoded structure, or the raw model text under
/// `raw_analysis` when decoding failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResearchAnalysis {
    Raw { raw_analysis: String },
    Structured(StructuredAnalysis),
}

impl Default for ResearchAnalysis {
    fn default() -> Self {
        Self::Raw {
            raw_analysis: String::new(),
        }
    }
}

impl ResearchAnalysis {
    /// Decode-or-preserve over a completion. The second value annotates a
    /// degraded parse.
    pub fn from_completion(text: &str) -> (Self, Option<StageError>) {
        match decode_or_preserve::<StructuredAnalysis>(text) {
            Extracted::Decoded(mut analysis) if !analysis.is_empty() => {
                analysis.dedupe_citations();
                (Self::Structured(analysis), None)
            }
            Extracted::Decoded(_) | Extracted::Raw(_) => (
                Self::Raw {
                    raw_analysis: text.to_string(),
                },
                Some(StageError::new(
                    ErrorKind::ParseDegraded,
                    "analysis kept as raw text",
                )),
            ),
        }
    }

    pub fn structured(&self) -> Option<&StructuredAnalysis> {
        match self {
            Self::Structured(analysis) => Some(analysis),
            Self::Raw { .. } => None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Raw { raw_analysis } => Some(raw_analysis),
            Self::Structured(_) => None,
        }
    }
}

// =============================================================================
// Stage Output
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchReport {
    pub company_name: String,
    pub identified_industry: String,
    pub analysis: ResearchAnalysis,
    pub status: String,
    #[serde(default)]
    pub company_queries: Vec<String>,
    #[serde(default)]
    pub company_results: Vec<SearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_query: Option<String>,
    #[serde(default)]
    pub industry_results: Vec<SearchResult>,
    /// Recoverable problems absorbed by the stage
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<StageError>,
}

impl ResearchReport {
    fn new(company: &str) -> Self {
        Self {
            company_name: company.to_string(),
            ..Default::default()
        }
    }

    /// Company document handed to later prompts
    pub fn prompt_document(&self) -> String {
        let document = serde_json::json!({
            "company_name": self.company_name,
            "identified_industry": self.identified_industry,
            "analysis": self.analysis,
        });
        serde_json::to_string_pretty(&document).unwrap_or_default()
    }

    /// The analysis alone, as pretty JSON
    pub fn analysis_json(&self) -> String {
        serde_json::to_string_pretty(&self.analysis).unwrap_or_default()
    }
}

// =============================================================================
// Researcher
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResearchPhase {
    SearchCompany,
    IdentifyIndustry,
    SearchIndustry,
    Analyze,
    Done,
    Failed,
}

/// Company battery: site-restricted structure queries first, background last
pub fn company_queries(company: &str) -> Vec<String> {
    let site = company.to_lowercase().replace(' ', "");
    vec![
        format!("site:{site}.com subsidiaries OR brands OR business units"),
        format!(
            "{company} list of subsidiaries site:investor.{site}.com OR site:{site}.com/investors"
        ),
        format!("{company} annual report 2024 subsidiaries pdf"),
        format!("{company} major products platforms services official site"),
        format!("{company} brands list official"),
        format!("{company} acquisitions 2023 2024 2025 list"),
        format!("{company} business segments site:{site}.com"),
        format!("site:wikipedia.org {company} subsidiaries brands (background only)"),
    ]
}

pub fn industry_query(industry: &str) -> String {
    format!(
        "{industry} industry latest trends 2024 market dynamics growth opportunities strategic focus \
         AI artificial intelligence automation digital transformation competitive landscape"
    )
}

pub struct Researcher {
    search: SearchClient,
    llm: SharedProvider,
    max_results: usize,
    temperature: f32,
    reasoning_temperature: f32,
    max_tokens: u32,
}

impl Researcher {
    pub fn new(search: SearchClient, llm: SharedProvider, config: &Config) -> Self {
        Self {
            search,
            llm,
            max_results: config.search.max_results,
            temperature: config.llm.temperature,
            reasoning_temperature: config.llm.reasoning_temperature,
            max_tokens: super::token_cap(config),
        }
    }

    #[instrument(skip(self), fields(llm = self.llm.name()))]
    pub async fn run(&self, company: &str) -> Result<ResearchReport, StageError> {
        let mut report = ResearchReport::new(company);
        let mut phase = ResearchPhase::SearchCompany;

        loop {
            debug!(?phase, "Research phase");
            phase = match phase {
                ResearchPhase::SearchCompany => self.search_company(&mut report).await,
                ResearchPhase::IdentifyIndustry => self.identify_industry(&mut report).await,
                ResearchPhase::SearchIndustry => self.search_industry(&mut report).await,
                ResearchPhase::Analyze => self.analyze(&mut report).await,
                ResearchPhase::Done => {
                    report.status = "completed".to_string();
                    info!(
                        industry = %report.identified_industry,
                        structured = report.analysis.structured().is_some(),
                        "Research complete"
                    );
                    return Ok(report);
                }
                ResearchPhase::Failed => {
                    warn!(company, "Company search returned nothing");
                    return Err(StageError::search_failed(format!(
                        "no search results for {}",
                        company
                    )));
                }
            };
        }
    }

    async fn search_company(&self, report: &mut ResearchReport) -> ResearchPhase {
        let queries = company_queries(&report.company_name);
        let per_query = MIN_RESULTS_PER_QUERY.max(self.max_results / queries.len());
        report.company_results = self
            .search
            .search_many(&queries, self.search.depth(), per_query)
            .await;
        report.company_queries = queries;
        info!(results = report.company_results.len(), "Company search done");

        if report.company_results.is_empty() {
            ResearchPhase::Failed
        } else {
            ResearchPhase::IdentifyIndustry
        }
    }

    async fn identify_industry(&self, report: &mut ResearchReport) -> ResearchPhase {
        let prompt = prompts::identify_industry(&render_context(&report.company_results));
        let request = CompletionRequest::new(prompt, self.reasoning_temperature, self.max_tokens);

        let label = match self.llm.complete(&request).await {
            Ok(response) => clean_label(&response.text),
            Err(err) => {
                warn!("Industry identification failed: {}", err);
                None
            }
        };
        report.identified_industry = match label {
            Some(label) => label,
            None => {
                report.errors.push(StageError::generation_failed(format!(
                    "industry identification unusable, defaulted to {}",
                    DEFAULT_INDUSTRY
                )));
                DEFAULT_INDUSTRY.to_string()
            }
        };
        ResearchPhase::SearchIndustry
    }

    async fn search_industry(&self, report: &mut ResearchReport) -> ResearchPhase {
        let query = industry_query(&report.identified_industry);
        report.industry_results = self
            .search
            .search(&query, self.search.depth(), self.max_results)
            .await;
        if report.industry_results.is_empty() {
            report.errors.push(StageError::search_failed(format!(
                "no industry results for {}",
                report.identified_industry
            )));
        }
        report.industry_query = Some(query);
        ResearchPhase::Analyze
    }

    async fn analyze(&self, report: &mut ResearchReport) -> ResearchPhase {
        let request = CompletionRequest::new(
            prompts::analysis_user(
                &render_context(&report.company_results),
                &render_context(&report.industry_results),
            ),
            self.temperature,
            self.max_tokens,
        )
        .with_system(prompts::analysis_system());

        match self.llm.complete(&request).await {
            Ok(response) => {
                let (analysis, degraded) = ResearchAnalysis::from_completion(&response.text);
                report.analysis = analysis;
                report.errors.extend(degraded);
            }
            Err(err) => {
                warn!("Analysis call failed: {}", err);
                report.analysis = ResearchAnalysis::default();
                report
                    .errors
                    .push(StageError::generation_failed(err.to_string()));
            }
        }
        ResearchPhase::Done
    }
}

/// Bare industry label from model text: first line, no quotes or trailing dot
fn clean_label(text: &str) -> Option<String> {
    let line = text.trim().lines().next().unwrap_or_default();
    let label = line
        .trim_start_matches("Industry:")
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '*' | '.'));
    (!label.is_empty()).then(|| label.to_string())
}
