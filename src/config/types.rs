//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/marketscope/) and project (.marketscope/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{llm, output, pipeline, resources, search};
use crate::types::{Result, ScopeError};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Completion provider settings
    pub llm: LlmConfig,

    /// Web search settings
    pub search: SearchConfig,

    /// Dataset/model/repository catalog settings
    pub resources: ResourcesConfig,

    /// Stage sequencing and fallback policy
    pub pipeline: PipelineConfig,

    /// Report output settings
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            search: SearchConfig::default(),
            resources: ResourcesConfig::default(),
            pipeline: PipelineConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `ScopeError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("llm.temperature", self.llm.temperature),
            ("llm.reasoning_temperature", self.llm.reasoning_temperature),
            ("llm.creative_temperature", self.llm.creative_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(ScopeError::Config(format!(
                    "{} must be between 0.0 and 2.0, got {}",
                    name, value
                )));
            }
        }

        if self.llm.timeout_secs == 0 {
            return Err(ScopeError::Config(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(ScopeError::Config(
                "llm.max_tokens must be greater than 0".to_string(),
            ));
        }

        if !(1..=search::MAX_ATTEMPTS).contains(&self.search.max_attempts) {
            return Err(ScopeError::Config(format!(
                "search.max_attempts must be between 1 and {}, got {}",
                search::MAX_ATTEMPTS,
                self.search.max_attempts
            )));
        }

        if self.search.max_results == 0 {
            return Err(ScopeError::Config(
                "search.max_results must be greater than 0".to_string(),
            ));
        }

        if self.resources.collection_budget_secs == 0 {
            return Err(ScopeError::Config(
                "resources.collection_budget_secs must be greater than 0".to_string(),
            ));
        }

        if self.resources.max_per_catalog == 0 {
            return Err(ScopeError::Config(
                "resources.max_per_catalog must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.resource_stage_timeout_secs == 0 {
            return Err(ScopeError::Config(
                "pipeline.resource_stage_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.use_case_count == 0 {
            return Err(ScopeError::Config(
                "pipeline.use_case_count must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub api_base: String,
    /// Temperature for analysis calls
    pub temperature: f32,
    /// Temperature for industry identification
    pub reasoning_temperature: f32,
    /// Temperature for use-case and solution generation
    pub creative_temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: llm::DEFAULT_MODEL.to_string(),
            api_base: llm::DEFAULT_API_BASE.to_string(),
            temperature: llm::TEMPERATURE,
            reasoning_temperature: llm::REASONING_TEMPERATURE,
            creative_temperature: llm::CREATIVE_TEMPERATURE,
            max_tokens: llm::MAX_TOKENS,
            timeout_secs: llm::TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Search Configuration
// =============================================================================

/// Search depth requested from the provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    #[default]
    Advanced,
}

impl std::fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchDepth::Basic => write!(f, "basic"),
            SearchDepth::Advanced => write!(f, "advanced"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub api_base: String,
    pub depth: SearchDepth,
    /// Total result budget for the company battery and the industry query
    pub max_results: usize,
    /// Attempts per query, first call included
    pub max_attempts: usize,
    /// Linear backoff base: the n-th retry waits n * base
    pub retry_base_delay_ms: u64,
    pub exclude_domains: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base: search::DEFAULT_API_BASE.to_string(),
            depth: SearchDepth::Advanced,
            max_results: search::MAX_SEARCH_RESULTS,
            max_attempts: search::MAX_ATTEMPTS,
            retry_base_delay_ms: search::RETRY_BASE_DELAY_MS,
            exclude_domains: search::EXCLUDED_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
            timeout_secs: 30,
        }
    }
}

// =============================================================================
// Resources Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    /// Shared deadline across the three collectors
    pub collection_budget_secs: u64,
    /// Skip a collector when less than this remains
    pub min_collector_secs: u64,
    pub max_per_catalog: usize,
    pub kaggle_api_base: String,
    pub huggingface_api_base: String,
    pub github_api_base: String,
    pub timeout_secs: u64,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            collection_budget_secs: resources::COLLECTION_BUDGET_SECS,
            min_collector_secs: resources::MIN_COLLECTOR_SECS,
            max_per_catalog: resources::MAX_PER_CATALOG,
            kaggle_api_base: resources::KAGGLE_API_BASE.to_string(),
            huggingface_api_base: resources::HUGGINGFACE_API_BASE.to_string(),
            github_api_base: resources::GITHUB_API_BASE.to_string(),
            timeout_secs: resources::CATALOG_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Pipeline Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Use cases requested from the generator
    pub use_case_count: usize,
    /// Replace the resource stage with canned records
    pub fast_mode: bool,
    /// Replace the research stage with canned company templates
    pub ultra_fast_mode: bool,
    /// Fall back to canned research when company search finds nothing
    pub research_fallback: bool,
    /// Fall back to the built-in use-case list when generation fails
    pub use_case_fallback: bool,
    /// Wall-clock cap for the whole resource stage
    pub resource_stage_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            use_case_count: pipeline::USE_CASE_COUNT,
            fast_mode: false,
            ultra_fast_mode: false,
            research_fallback: true,
            use_case_fallback: true,
            resource_stage_timeout_secs: pipeline::RESOURCE_STAGE_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report JSON and summary markdown
    pub reports_dir: PathBuf,
    /// Dataset and resource markdown
    pub output_dir: PathBuf,
    /// Also write the human-readable summary
    pub write_summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from(output::REPORTS_DIR),
            output_dir: PathBuf::from(output::OUTPUT_DIR),
            write_summary: true,
        }
    }
}
