//! Datasets Command
//!
//! Looks up reference datasets for a single use case without running the
//! rest of the pipeline. Needs only the search credential.
//!
//! Usage:
//!   marketscope datasets "Churn Prediction" --description "Keep customers"

use std::sync::Arc;

use crate::cli::Output;
use crate::config::{ConfigLoader, Credentials};
use crate::pipeline::render::truncate_title;
use crate::resources::fetch_datasets;
use crate::search::{SearchClient, SharedSearchProvider, TavilyProvider};
use crate::types::{Result, ScopeError};

pub async fn run(title: &str, description: &str) -> Result<()> {
    let config = ConfigLoader::load()?;
    let key = Credentials::from_env()
        .tavily_api_key
        .ok_or_else(|| ScopeError::Config("TAVILY_API_KEY is not set".to_string()))?;
    let provider: SharedSearchProvider = Arc::new(TavilyProvider::new(&config.search, key)?);
    let search = SearchClient::new(provider, &config.search);

    let output = Output::new();
    output.header(&format!("References for {}", title));
    let links = fetch_datasets(&search, title, description).await;
    if links.is_empty() {
        output.warning("No dataset found");
        return Ok(());
    }
    for link in &links {
        output.field(&truncate_title(&link.title), &link.url);
    }
    Ok(())
}
