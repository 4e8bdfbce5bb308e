//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/marketscope/config.toml)
//! 3. Project config (.marketscope/config.toml)
//! 4. Environment variables (MARKETSCOPE_* prefix, `__` separates sections)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::credentials::Credentials;
use super::types::Config;
use crate::types::{Result, ScopeError};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // MARKETSCOPE_PIPELINE__FAST_MODE -> pipeline.fast_mode
        figment = figment.merge(Env::prefixed("MARKETSCOPE_").split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| ScopeError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| ScopeError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/marketscope/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("marketscope"))
    }

    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn project_dir() -> PathBuf {
        PathBuf::from(".marketscope")
    }

    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Render the effective configuration in `toml`, `json` or `yaml`
    pub fn render(config: &Config, format: &str) -> Result<String> {
        match format {
            "json" => Ok(serde_json::to_string_pretty(config)?),
            "yaml" => Ok(serde_yaml::to_string(config)?),
            _ => toml::to_string_pretty(config).map_err(|e| ScopeError::Config(e.to_string())),
        }
    }

    /// Show current effective configuration and credential status
    pub fn show_config(format: &str) -> Result<()> {
        let config = Self::load()?;
        println!("{}", Self::render(&config, format)?);

        if format != "json" && format != "yaml" {
            println!("# Credentials");
            for (name, status) in Credentials::from_env().status() {
                println!("# {:<18} {}", name, status);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a default project configuration into `dir`
    pub fn init_in(dir: &Path, force: bool) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let config_path = dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_project_config())?;
            info!("Created project config: {}", config_path.display());
        } else {
            info!("Project config exists: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Initialize project configuration in the current directory
    pub fn init_project(force: bool) -> Result<PathBuf> {
        Self::init_in(&Self::project_dir(), force)
    }

    fn default_project_config() -> String {
        r#"# MarketScope Project Configuration
# Credentials are read from the environment (OPENAI_API_KEY, TAVILY_API_KEY,
# KAGGLE_USERNAME, KAGGLE_KEY, GITHUB_TOKEN, HUGGINGFACE_TOKEN).

version = "1.0"

[llm]
model = "gpt-4o"
temperature = 0.3
creative_temperature = 0.7
max_tokens = 4000

[search]
depth = "advanced"
max_results = 50
max_attempts = 3

[resources]
collection_budget_secs = 30
max_per_catalog = 5

[pipeline]
fast_mode = false
ultra_fast_mode = false
research_fallback = true
use_case_fallback = true

[output]
reports_dir = "reports"
output_dir = "output"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_project_config_parses() {
        let temp_dir = TempDir::new().unwrap();
        let path = ConfigLoader::init_in(&temp_dir.path().join(".marketscope"), false).unwrap();
        assert!(path.exists());

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.llm.model, "gpt-4o");
        assert!(config.pipeline.use_case_fallback);
    }

    #[test]
    fn test_init_does_not_overwrite_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(".marketscope");
        let path = ConfigLoader::init_in(&dir, false).unwrap();
        fs::write(&path, "version = \"2.0\"\n").unwrap();

        ConfigLoader::init_in(&dir, false).unwrap();
        assert_eq!(ConfigLoader::load_from_file(&path).unwrap().version, "2.0");

        ConfigLoader::init_in(&dir, true).unwrap();
        assert_eq!(ConfigLoader::load_from_file(&path).unwrap().version, "1.0");
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[llm]\ntemperature = 9.0\n").unwrap();
        assert!(matches!(
            ConfigLoader::load_from_file(&path),
            Err(ScopeError::Config(_))
        ));
    }

    #[test]
    fn test_render_formats() {
        let config = Config::default();
        assert!(ConfigLoader::render(&config, "toml").unwrap().contains("[pipeline]"));
        assert!(ConfigLoader::render(&config, "json").unwrap().contains("\"use_case_count\""));
        assert!(ConfigLoader::render(&config, "yaml").unwrap().contains("fast_mode"));
    }

    #[test]
    fn test_env_override() {
        // SAFETY: This test runs in isolation
        unsafe {
            std::env::set_var("MARKETSCOPE_LLM__MODEL", "test-model");
        }
        let config = ConfigLoader::load().unwrap();
        assert_eq!(config.llm.model, "test-model");
        unsafe {
            std::env::remove_var("MARKETSCOPE_LLM__MODEL");
        }
    }
}
