//! Config Command
//!
//! Manage MarketScope configuration.
//!
//! Usage:
//!   marketscope config show [-f json|yaml|toml]
//!   marketscope config path
//!   marketscope config init [--force]

use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the merged effective configuration
pub fn show(format: &str) -> Result<()> {
    ConfigLoader::show_config(format)
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Initialize project configuration
pub fn init(force: bool) -> Result<()> {
    let path = ConfigLoader::init_project(force)?;
    println!("✓ Initialized project configuration");
    println!("  Config: {}", path.display());
    Ok(())
}
