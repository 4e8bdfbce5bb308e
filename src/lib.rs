//! MarketScope - AI market research for a named company
//!
//! Turns a company name into an AI adoption proposal in three stages:
//!
//! 1. **Research**: web search plus LLM analysis identifies the industry and
//!    the company's position in it.
//! 2. **Use cases**: industry AI trends feed a generator that writes a fixed
//!    number of use cases, a prioritization and GenAI solution ideas.
//! 3. **Resources**: Kaggle, HuggingFace and GitHub are searched for
//!    domain-wide resources, and each use case gets reference datasets.
//!
//! Every stage has a fallback, so a run ends `completed`, `partial` or
//! `failed` with an [`AnalysisReport`] either way.
//!
//! ## Quick Start
//!
//! ```ignore
//! use marketscope::{Config, Credentials, Orchestrator};
//!
//! let orchestrator = Orchestrator::from_config(Config::default(), &Credentials::from_env())?;
//! let report = orchestrator.run("Acme Corp").await;
//! println!("{} use cases", report.counts.use_cases);
//! ```
//!
//! ## Modules
//!
//! - [`search`]: web search client with linear-backoff retries
//! - [`ai`]: completion client and JSON extraction
//! - [`resources`]: catalog collectors and per-use-case dataset lookup
//! - [`pipeline`]: the three stages, the parser, the orchestrator and persistence
//! - [`config`]: layered configuration and credentials

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod industry;
pub mod pipeline;
pub mod resources;
pub mod search;
pub mod types;

#[cfg(test)]
mod testing;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader, Credentials};
pub use types::error::{ErrorCategory, ErrorKind, Result, ScopeError, StageError};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use pipeline::{
    AnalysisReport, AnalysisRequest, Orchestrator, ResourceMapper, Researcher, UseCase,
    UseCaseGenerator, UseCaseInput, WorkflowStatus, parse_use_cases,
};

// =============================================================================
// Provider Re-exports
// =============================================================================

pub use ai::{LlmProvider, OpenAiProvider, SharedProvider, with_timeout};
pub use resources::{CatalogProvider, ResourceCollectors, SharedCatalog};
pub use search::{SearchClient, SearchProvider, SharedSearchProvider, TavilyProvider};
