//! Completion client layer: provider trait, OpenAI implementation,
//! prompt builder, decode-or-preserve extraction and timeout helpers.

pub mod extract;
pub mod prompt;
pub mod provider;
pub mod timeout;

pub use extract::{Extracted, decode_or_preserve};
pub use prompt::PromptBuilder;
pub use provider::{
    CompletionRequest, LlmProvider, LlmResponse, OpenAiProvider, SharedProvider, TokenUsage,
};
pub use timeout::with_timeout;
