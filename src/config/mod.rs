//! Configuration Management
//!
//! Hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/marketscope/config.toml)
//! 3. Project config (.marketscope/config.toml)
//! 4. Environment variables (MARKETSCOPE_*)
//! 5. CLI arguments (highest priority)
//!
//! Credentials are kept apart from [`Config`]: they come only from the
//! environment and are never serialized.

mod credentials;
mod loader;
mod types;

pub use credentials::Credentials;
pub use loader::ConfigLoader;
pub use types::*;
