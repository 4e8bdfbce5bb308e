//! Stage 3: resource mapping.
//!
//! Two independent gathering paths, both persisted:
//! - per use case, [`fetch_datasets`] picks 3..=6 catalog references for a
//!   table row;
//! - domain-wide, the catalog collectors run once over search terms derived
//!   from the use-case text.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::parser::UseCase;
use super::usecases::UseCaseReport;
use crate::resources::{
    CollectedResources, DatasetLink, ResourceCollectors, derive_search_terms, fetch_datasets,
};
use crate::search::SearchClient;

/// A use case to look up references for. Caller-supplied lists may use
/// `title`/`objective` instead of `name`/`description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCaseInput {
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default, alias = "objective")]
    pub description: String,
}

impl UseCaseInput {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl From<&UseCase> for UseCaseInput {
    fn from(use_case: &UseCase) -> Self {
        Self::new(use_case.title.clone(), use_case.description())
    }
}

/// Where Stage 3 takes its use cases from
#[derive(Debug, Clone, Copy)]
pub enum MappingSource<'a> {
    Generated(&'a UseCaseReport),
    Predefined(&'a [UseCaseInput]),
    /// Stage 2 produced nothing
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub use_case: String,
    pub description: String,
    pub references: Vec<DatasetLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMapping {
    pub rows: Vec<ReferenceRow>,
    pub collected: CollectedResources,
}

impl ResourceMapping {
    /// Empty mapping for a stage that was skipped or failed
    pub fn empty(industry: &str, status: &str) -> Self {
        Self {
            rows: Vec::new(),
            collected: CollectedResources::empty(industry, status),
        }
    }
}

pub struct ResourceMapper {
    search: SearchClient,
    collectors: ResourceCollectors,
}

impl ResourceMapper {
    pub fn new(search: SearchClient, collectors: ResourceCollectors) -> Self {
        Self { search, collectors }
    }

    #[instrument(skip(self, source))]
    pub async fn run(&self, source: MappingSource<'_>, industry: &str) -> ResourceMapping {
        let (inputs, text): (Vec<UseCaseInput>, String) = match source {
            MappingSource::Generated(report) => (
                report.use_cases().iter().map(UseCaseInput::from).collect(),
                report.formatted_use_cases.clone(),
            ),
            MappingSource::Predefined(list) => {
                let inputs: Vec<UseCaseInput> = list
                    .iter()
                    .filter(|input| !input.name.trim().is_empty())
                    .cloned()
                    .collect();
                let text = inputs
                    .iter()
                    .map(|i| format!("{} {}", i.name, i.description))
                    .collect::<Vec<_>>()
                    .join("\n");
                (inputs, text)
            }
            MappingSource::Empty => (Vec::new(), String::new()),
        };

        if inputs.is_empty() {
            warn!("No use cases to map to references");
        }
        let rows = self.reference_rows(&inputs).await;

        let terms = derive_search_terms(&text);
        let collected = self.collectors.collect_all(&terms, industry).await;

        info!(
            rows = rows.len(),
            references = rows.iter().map(|r| r.references.len()).sum::<usize>(),
            resources = collected.total(),
            "Resource mapping complete"
        );
        ResourceMapping { rows, collected }
    }

    /// One row per use case, looked up one after another
    pub async fn reference_rows(&self, inputs: &[UseCaseInput]) -> Vec<ReferenceRow> {
        let mut rows = Vec::with_capacity(inputs.len());
        for input in inputs {
            let references = fetch_datasets(&self.search, &input.name, &input.description).await;
            rows.push(ReferenceRow {
                use_case: input.name.clone(),
                description: input.description.clone(),
                references,
            });
        }
        rows
    }
}
