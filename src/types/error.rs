//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Layers
//!
//! - [`ProviderError`]: failures from external collaborators (LLM, search,
//!   catalogs), classified into an [`ErrorCategory`] so callers can decide
//!   whether a retry is worthwhile.
//! - [`ScopeError`]: the crate-wide error for unexpected failures
//!   (I/O, persistence, configuration).
//! - [`StageError`]: the recoverable, serializable outcome of a pipeline stage
//!   that the orchestrator inspects to pick a fallback.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories used for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited - wait then retry
    RateLimit,
    /// Context/token limit exceeded
    TokenLimit,
    /// Authentication failed - fail fast, don't retry
    Auth,
    /// Network/connectivity issues - retry with backoff
    Network,
    /// Provider unavailable
    Unavailable,
    /// Invalid request - don't retry, fix request
    BadRequest,
    /// Provider response could not be decoded
    ParseError,
    /// Temporary server issues
    Transient,
    /// Unknown error - conservative retry
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::TokenLimit => write!(f, "TOKEN_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Whether another attempt against the same provider can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimit
                | Self::Network
                | Self::Transient
                | Self::ParseError
                | Self::Unavailable
                | Self::Unknown
        )
    }
}

// =============================================================================
// Provider Error
// =============================================================================

/// Failure reported by an external provider, with category and origin
#[derive(Debug, Clone)]
pub struct ProviderError {
    pub category: ErrorCategory,
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for ProviderError {}

impl ProviderError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps raw provider failures onto an [`ErrorCategory`]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an error message from any provider
    pub fn classify(message: &str, provider: &str) -> ProviderError {
        let lower = message.to_lowercase();

        let category = if lower.contains("rate limit")
            || lower.contains("429")
            || lower.contains("too many requests")
            || lower.contains("quota exceeded")
        {
            ErrorCategory::RateLimit
        } else if lower.contains("token")
            && (lower.contains("limit") || lower.contains("exceed") || lower.contains("maximum"))
            || lower.contains("context length")
        {
            ErrorCategory::TokenLimit
        } else if lower.contains("401")
            || lower.contains("403")
            || lower.contains("api key")
            || lower.contains("unauthorized")
            || lower.contains("forbidden")
        {
            ErrorCategory::Auth
        } else if lower.contains("connection")
            || lower.contains("dns")
            || lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("unreachable")
        {
            ErrorCategory::Network
        } else if lower.contains("503")
            || lower.contains("502")
            || lower.contains("service unavailable")
            || lower.contains("overloaded")
        {
            ErrorCategory::Unavailable
        } else if lower.contains("400") || lower.contains("bad request") {
            ErrorCategory::BadRequest
        } else if lower.contains("decode") || lower.contains("json") || lower.contains("parse") {
            ErrorCategory::ParseError
        } else {
            ErrorCategory::Unknown
        };

        ProviderError::with_provider(category, message, provider)
    }

    /// Classify HTTP status code directly (more accurate than string matching)
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> ProviderError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 | 422 => ErrorCategory::BadRequest,
            500 | 502 | 503 | 504 => ErrorCategory::Transient,
            404 => ErrorCategory::Unavailable,
            _ => ErrorCategory::Unknown,
        };
        ProviderError::with_provider(category, message, provider)
    }

    /// Classify a transport-level reqwest failure
    pub fn classify_transport(err: &reqwest::Error, provider: &str) -> ProviderError {
        let category = if err.is_timeout() || err.is_connect() {
            ErrorCategory::Network
        } else if err.is_decode() {
            ErrorCategory::ParseError
        } else if let Some(status) = err.status() {
            return Self::classify_http_status(status.as_u16(), &err.to_string(), provider);
        } else {
            ErrorCategory::Unknown
        };
        ProviderError::with_provider(category, err.to_string(), provider)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Structured provider error with category
    #[error("Provider error: {0}")]
    Provider(ProviderError),

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to persist {path}: {message}")]
    Persist { path: String, message: String },

    #[error("Stage {stage} failed: {error}")]
    Stage { stage: String, error: StageError },
}

impl From<ProviderError> for ScopeError {
    fn from(err: ProviderError) -> Self {
        ScopeError::Provider(err)
    }
}

pub type Result<T> = std::result::Result<T, ScopeError>;

impl ScopeError {
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    pub fn persist(path: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::Persist {
            path: path.to_string(),
            message: message.into(),
        }
    }

    pub fn provider(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self::Provider(ProviderError::new(category, message))
    }

    /// Whether this error is worth retrying against the same provider
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Provider(e) => e.is_retryable(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }
}

// =============================================================================
// Pipeline Stage Errors
// =============================================================================

/// Stage-level failure taxonomy recorded in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No search results after exhausting retries
    SearchFailed,
    /// Completion call raised or returned unusable content
    GenerationFailed,
    /// Structured decode failed, raw text preserved
    ParseDegraded,
    /// A resource collector exceeded its budget
    CollectorTimeout,
    /// A resource provider errored
    CollectorError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SearchFailed => "search_failed",
            Self::GenerationFailed => "generation_failed",
            Self::ParseDegraded => "parse_degraded",
            Self::CollectorTimeout => "collector_timeout",
            Self::CollectorError => "collector_error",
        };
        f.write_str(s)
    }
}

/// Recoverable stage failure: a kind plus human-readable detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{kind}: {detail}")]
pub struct StageError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl StageError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn search_failed(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::SearchFailed, detail)
    }

    pub fn generation_failed(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::GenerationFailed, detail)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
    }

    #[test]
    fn test_error_category_retryable() {
        assert!(ErrorCategory::RateLimit.is_retryable());
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Transient.is_retryable());
        assert!(!ErrorCategory::Auth.is_retryable());
        assert!(!ErrorCategory::BadRequest.is_retryable());
        assert!(!ErrorCategory::TokenLimit.is_retryable());
    }

    #[test]
    fn test_classify_messages() {
        assert_eq!(
            ErrorClassifier::classify("Rate limit exceeded", "tavily").category,
            ErrorCategory::RateLimit
        );
        assert_eq!(
            ErrorClassifier::classify("Invalid API key provided", "openai").category,
            ErrorCategory::Auth
        );
        assert_eq!(
            ErrorClassifier::classify("Connection timed out after 30s", "kaggle").category,
            ErrorCategory::Network
        );
        assert_eq!(
            ErrorClassifier::classify("Something weird happened", "test").category,
            ErrorCategory::Unknown
        );
    }

    #[test]
    fn test_classify_http_status() {
        let auth = ErrorClassifier::classify_http_status(401, "Unauthorized", "tavily");
        assert_eq!(auth.category, ErrorCategory::Auth);
        assert!(!auth.is_retryable());

        let server = ErrorClassifier::classify_http_status(502, "Bad gateway", "tavily");
        assert_eq!(server.category, ErrorCategory::Transient);
        assert!(server.is_retryable());
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::with_provider(ErrorCategory::RateLimit, "slow down", "openai");
        assert_eq!(err.to_string(), "[openai:RATE_LIMIT] slow down");
    }

    #[test]
    fn test_stage_error_wire_format() {
        let err = StageError::search_failed("no results for Acme");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "search_failed");
        assert_eq!(err.to_string(), "search_failed: no results for Acme");
    }
}
