pub mod error;
pub mod lenient;

pub use error::{
    ErrorCategory, ErrorClassifier, ErrorKind, ProviderError, Result, ScopeError, StageError,
};
