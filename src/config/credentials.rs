//! Provider credentials.
//!
//! Read from the environment once at startup and held as secrets. Never
//! serialized; `Debug` output is redacted.

use secrecy::{ExposeSecret, SecretString};

use crate::types::{Result, ScopeError};

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const TAVILY_API_KEY: &str = "TAVILY_API_KEY";
pub const KAGGLE_USERNAME: &str = "KAGGLE_USERNAME";
pub const KAGGLE_KEY: &str = "KAGGLE_KEY";
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const HUGGINGFACE_TOKEN: &str = "HUGGINGFACE_TOKEN";

#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<SecretString>,
    pub tavily_api_key: Option<SecretString>,
    pub kaggle_username: Option<String>,
    pub kaggle_key: Option<SecretString>,
    pub github_token: Option<SecretString>,
    pub huggingface_token: Option<SecretString>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<SecretString>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Credentials")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("tavily_api_key", &redact(&self.tavily_api_key))
            .field("kaggle_username", &self.kaggle_username)
            .field("kaggle_key", &redact(&self.kaggle_key))
            .field("github_token", &redact(&self.github_token))
            .field("huggingface_token", &redact(&self.huggingface_token))
            .finish()
    }
}

fn read_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Credentials {
    /// Load credentials from the process environment, trimming whitespace
    pub fn from_env() -> Self {
        Self {
            openai_api_key: read_var(OPENAI_API_KEY).map(SecretString::from),
            tavily_api_key: read_var(TAVILY_API_KEY).map(SecretString::from),
            kaggle_username: read_var(KAGGLE_USERNAME),
            kaggle_key: read_var(KAGGLE_KEY).map(SecretString::from),
            github_token: read_var(GITHUB_TOKEN).map(SecretString::from),
            huggingface_token: read_var(HUGGINGFACE_TOKEN).map(SecretString::from),
        }
    }

    /// Fail fast when a required key is missing or malformed
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        let mut invalid = Vec::new();

        for (name, value, prefix) in [
            (OPENAI_API_KEY, &self.openai_api_key, "sk-"),
            (TAVILY_API_KEY, &self.tavily_api_key, "tvly-"),
        ] {
            match value {
                None => missing.push(name),
                Some(key) if !key.expose_secret().starts_with(prefix) => {
                    invalid.push(format!("{} (must start with '{}')", name, prefix))
                }
                Some(_) => {}
            }
        }

        if !missing.is_empty() {
            return Err(ScopeError::Config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }
        if !invalid.is_empty() {
            return Err(ScopeError::Config(format!(
                "Invalid API key format: {}",
                invalid.join(", ")
            )));
        }
        Ok(())
    }

    /// Per-variable status lines safe to print
    pub fn status(&self) -> Vec<(&'static str, String)> {
        let tail = |v: &Option<SecretString>| match v {
            Some(key) => {
                let key = key.expose_secret();
                let suffix: String = key
                    .chars()
                    .rev()
                    .take(4)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                format!("Set (ends with ...{})", suffix)
            }
            None => "Not set".to_string(),
        };
        let set = |present: bool| if present { "Set" } else { "Not set" }.to_string();

        vec![
            (OPENAI_API_KEY, tail(&self.openai_api_key)),
            (TAVILY_API_KEY, tail(&self.tavily_api_key)),
            (KAGGLE_USERNAME, set(self.kaggle_username.is_some())),
            (KAGGLE_KEY, set(self.kaggle_key.is_some())),
            (GITHUB_TOKEN, set(self.github_token.is_some())),
            (HUGGINGFACE_TOKEN, set(self.huggingface_token.is_some())),
        ]
    }
}
