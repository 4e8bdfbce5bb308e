//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Search provider constants
pub mod search {
    /// Default Tavily endpoint
    pub const DEFAULT_API_BASE: &str = "https://api.tavily.com";

    /// Total result budget spread across the company query battery
    pub const MAX_SEARCH_RESULTS: usize = 50;

    /// Lower bound for per-query results in the company battery
    pub const MIN_RESULTS_PER_QUERY: usize = 5;

    /// Results requested per AI-trend query
    pub const TREND_RESULTS_PER_QUERY: usize = 5;

    /// Maximum attempts per query (first call plus retries)
    pub const MAX_ATTEMPTS: usize = 3;

    /// Linear backoff base delay (milliseconds)
    pub const RETRY_BASE_DELAY_MS: u64 = 1000;

    /// Domains never worth citing in a research report
    pub const EXCLUDED_DOMAINS: &[&str] = &["facebook.com", "twitter.com", "instagram.com"];
}

/// LLM provider constants
pub mod llm {
    pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &str = "gpt-4o";

    /// Temperature for analytical calls
    pub const TEMPERATURE: f32 = 0.3;

    /// Temperature for critical reasoning (industry identification)
    pub const REASONING_TEMPERATURE: f32 = 0.1;

    /// Temperature for use-case and solution generation
    pub const CREATIVE_TEMPERATURE: f32 = 0.7;

    pub const MAX_TOKENS: u32 = 4000;

    /// Token cap used when fast mode is on
    pub const FAST_MODE_MAX_TOKENS: u32 = 2000;

    /// Request timeout (seconds)
    pub const TIMEOUT_SECS: u64 = 120;
}

/// Resource collection constants
pub mod resources {
    /// Shared wall-clock budget for the three collectors (seconds)
    pub const COLLECTION_BUDGET_SECS: u64 = 30;

    /// A collector is skipped when less than this remains (seconds)
    pub const MIN_COLLECTOR_SECS: u64 = 5;

    /// Records kept per catalog
    pub const MAX_PER_CATALOG: usize = 5;

    /// Query terms a collector may use (domain term + first keyword)
    pub const MAX_QUERY_TERMS: usize = 2;

    /// Per-use-case reference bounds
    pub const MIN_REFERENCES: usize = 3;
    pub const MAX_REFERENCES: usize = 6;

    /// Description prefix folded into per-use-case queries (chars)
    pub const QUERY_DESCRIPTION_CHARS: usize = 120;

    /// Derived search terms kept for the domain-wide collectors
    pub const MAX_SEARCH_TERMS: usize = 10;

    pub const KAGGLE_API_BASE: &str = "https://www.kaggle.com/api/v1";
    pub const HUGGINGFACE_API_BASE: &str = "https://huggingface.co/api";
    pub const GITHUB_API_BASE: &str = "https://api.github.com";

    /// Request timeout for catalog providers (seconds)
    pub const CATALOG_TIMEOUT_SECS: u64 = 10;
}

/// Pipeline constants
pub mod pipeline {
    /// Use cases requested from the generator
    pub const USE_CASE_COUNT: usize = 10;

    /// Industry label used when identification fails
    pub const DEFAULT_INDUSTRY: &str = "Technology";

    /// Cap on the resource stage (seconds)
    pub const RESOURCE_STAGE_TIMEOUT_SECS: u64 = 300;

    /// Title length in rendered dataset tables (chars, ellipsis included)
    pub const REFERENCE_TITLE_CHARS: usize = 80;
}

/// Output locations
pub mod output {
    pub const REPORTS_DIR: &str = "reports";
    pub const OUTPUT_DIR: &str = "output";
}
