//! Report artifacts on disk.
//!
//! Markdown artifacts are best-effort: a failed write is logged and the file
//! is left out of the report. The JSON document is written last, after the
//! run is sealed, and lists its own path.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::render;
use super::report::AnalysisReport;
use crate::config::OutputConfig;
use crate::types::{Result, ScopeError};

/// Lowercase, spaces to underscores, nothing that could escape a directory
pub fn slug(name: &str) -> String {
    let slug: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    if slug.is_empty() || slug.chars().all(|c| c == '.' || c == '_') {
        "unknown".to_string()
    } else {
        slug
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub json: PathBuf,
    pub summary: PathBuf,
    pub datasets: PathBuf,
    pub resources: PathBuf,
}

impl ArtifactPaths {
    pub fn new(
        config: &OutputConfig,
        company: &str,
        industry: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let company = slug(company);
        let stamp = timestamp.format("%Y%m%d_%H%M%S");
        let industry = if industry.trim().is_empty() {
            "unknown".to_string()
        } else {
            slug(industry)
        };
        Self {
            json: config
                .reports_dir
                .join(format!("complete_analysis_{}_{}.json", company, stamp)),
            summary: config
                .reports_dir
                .join(format!("summary_report_{}_{}.md", company, stamp)),
            datasets: config
                .output_dir
                .join(format!("datasets_{}_{}.md", company, stamp)),
            resources: config.output_dir.join(format!("resources_{}.md", industry)),
        }
    }
}

pub fn write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| ScopeError::persist(parent.display(), e.to_string()))?;
    }
    fs::write(path, content).map_err(|e| ScopeError::persist(path.display(), e.to_string()))
}

pub struct ReportWriter {
    paths: ArtifactPaths,
    write_summary: bool,
}

impl ReportWriter {
    pub fn new(paths: ArtifactPaths, config: &OutputConfig) -> Self {
        Self {
            paths,
            write_summary: config.write_summary,
        }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Resource listing, dataset table and summary. Records each path that
    /// was written.
    pub fn write_markdown(&self, report: &mut AnalysisReport) {
        let mut written = Vec::new();

        if let Some(mapping) = &report.stage_outputs.resources {
            let listing = render::resources_markdown(&mapping.collected);
            written.push(self.try_write(&self.paths.resources, &listing));

            match render::datasets_markdown(&mapping.rows) {
                Some(table) => written.push(self.try_write(&self.paths.datasets, &table)),
                None => warn!("No use cases to tabulate, skipping dataset table"),
            }
        }

        if self.write_summary {
            let summary = render::summary_markdown(report);
            written.push(self.try_write(&self.paths.summary, &summary));
        }

        for path in written.into_iter().flatten() {
            report.record_path(path);
        }
    }

    /// Full report as pretty JSON. Only a sealed report is written.
    pub fn write_json(&self, report: &AnalysisReport) -> Result<()> {
        if !report.is_sealed() {
            return Err(ScopeError::persist(
                self.paths.json.display(),
                format!("run is still {}", report.workflow_status),
            ));
        }
        let json = serde_json::to_string_pretty(report)?;
        write_text(&self.paths.json, &json)?;
        info!(path = %self.paths.json.display(), "Complete results saved");
        Ok(())
    }

    fn try_write(&self, path: &Path, content: &str) -> Option<String> {
        match write_text(path, content) {
            Ok(()) => {
                info!(path = %path.display(), "Artifact written");
                Some(path.display().to_string())
            }
            Err(err) => {
                warn!("Skipping artifact: {}", err);
                None
            }
        }
    }
}
