//! Three-stage research pipeline.
//!
//! ```text
//! Researcher -> UseCaseGenerator -> ResourceMapper
//!      |               |                 |
//!   canned         fallback        empty / fast
//!  research        use cases         resources
//! ```
//!
//! Data flows strictly forward. [`Orchestrator`] sequences the stages,
//! applies the fallback policy and persists the [`AnalysisReport`].

pub mod canned;
pub mod mapper;
pub mod orchestrator;
pub mod parser;
pub mod persist;
pub mod prompts;
pub mod render;
pub mod report;
pub mod research;
pub mod usecases;

pub use mapper::{MappingSource, ReferenceRow, ResourceMapper, ResourceMapping, UseCaseInput};
pub use orchestrator::{AnalysisRequest, Orchestrator};
pub use parser::{UseCase, parse_use_cases};
pub use report::{AnalysisReport, FinalProposal, ReportCounts, WorkflowStatus};
pub use research::{ResearchAnalysis, ResearchReport, Researcher, StructuredAnalysis};
pub use usecases::{UseCaseGenerator, UseCaseReport};

use crate::config::Config;
use crate::constants::llm::FAST_MODE_MAX_TOKENS;

/// Completion token cap, lowered in fast mode
pub(crate) fn token_cap(config: &Config) -> u32 {
    if config.pipeline.fast_mode {
        config.llm.max_tokens.min(FAST_MODE_MAX_TOKENS)
    } else {
        config.llm.max_tokens
    }
}
