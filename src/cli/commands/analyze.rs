//! Analyze Command
//!
//! Runs the three-stage pipeline for one company and prints where the
//! artifacts landed.
//!
//! Usage:
//!   marketscope analyze "Acme Corp" [--fast] [--ultra-fast] [--output DIR]

use std::path::PathBuf;

use crate::cli::Output;
use crate::config::{Config, ConfigLoader, Credentials};
use crate::pipeline::{AnalysisReport, AnalysisRequest, Orchestrator, UseCaseInput, WorkflowStatus};
use crate::types::{Result, ScopeError};

#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub company: String,
    pub fast: bool,
    pub ultra_fast: bool,
    /// Root for both `reports/` and `output/`
    pub output: Option<PathBuf>,
    pub no_summary: bool,
    /// JSON list of `{name, description}` to map instead of generated cases
    pub use_cases: Option<PathBuf>,
}

/// CLI flags override the loaded configuration
pub fn apply_options(config: &mut Config, options: &AnalyzeOptions) {
    if options.fast {
        config.pipeline.fast_mode = true;
    }
    if options.ultra_fast {
        config.pipeline.ultra_fast_mode = true;
    }
    if let Some(root) = &options.output {
        config.output.reports_dir = root.join("reports");
        config.output.output_dir = root.join("output");
    }
    if options.no_summary {
        config.output.write_summary = false;
    }
}

fn load_use_cases(path: &PathBuf) -> Result<Vec<UseCaseInput>> {
    let content = std::fs::read_to_string(path)?;
    let inputs: Vec<UseCaseInput> = serde_json::from_str(&content)?;
    if inputs.is_empty() {
        return Err(ScopeError::Config(format!(
            "{} contains no use cases",
            path.display()
        )));
    }
    Ok(inputs)
}

pub async fn run(options: AnalyzeOptions) -> Result<WorkflowStatus> {
    let company = options.company.trim();
    if company.is_empty() {
        return Err(ScopeError::Config("company name must not be empty".to_string()));
    }

    let mut config = ConfigLoader::load()?;
    apply_options(&mut config, &options);

    let mut request = AnalysisRequest::new(company);
    if let Some(path) = &options.use_cases {
        request = request.with_use_cases(load_use_cases(path)?);
    }

    let orchestrator = Orchestrator::from_config(config, &Credentials::from_env())?;
    let output = Output::new();
    output.header(&format!("Market research: {}", company));
    if orchestrator.config().pipeline.ultra_fast_mode {
        output.info("Ultra-fast mode: research comes from templates");
    }
    if orchestrator.config().pipeline.fast_mode {
        output.info("Fast mode: resource collection is skipped");
    }

    let report = orchestrator.run_request(&request).await;
    print_report(&output, &report);
    Ok(report.workflow_status)
}

fn print_report(output: &Output, report: &AnalysisReport) {
    output.section("Result");
    output.status(report.workflow_status);
    output.field("Run", report.run_id);
    output.field("Industry", report.industry());
    output.field("Use cases", report.counts.use_cases);
    output.field("Resources", report.counts.resources);
    output.field("References", report.counts.references);

    for error in &report.stage_errors {
        output.warning(&error.to_string());
    }

    match report.workflow_status {
        WorkflowStatus::Failed => {
            output.error(report.error.as_deref().unwrap_or("analysis failed"));
            return;
        }
        WorkflowStatus::Partial => {
            output.warning(report.error.as_deref().unwrap_or("analysis degraded"));
        }
        _ => output.success("Analysis complete"),
    }

    if !report.persisted_file_paths.is_empty() {
        output.section("Files");
        for path in &report.persisted_file_paths {
            println!("  {}", path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        let options = AnalyzeOptions {
            company: "Acme".to_string(),
            fast: true,
            output: Some(PathBuf::from("/tmp/run")),
            no_summary: true,
            ..Default::default()
        };
        apply_options(&mut config, &options);

        assert!(config.pipeline.fast_mode);
        assert!(!config.pipeline.ultra_fast_mode);
        assert_eq!(config.output.reports_dir, PathBuf::from("/tmp/run/reports"));
        assert_eq!(config.output.output_dir, PathBuf::from("/tmp/run/output"));
        assert!(!config.output.write_summary);
    }

    #[test]
    fn test_use_case_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cases.json");
        std::fs::write(
            &path,
            r#"[{"name": "Churn", "description": "Keep customers"}, {"title": "Fraud"}]"#,
        )
        .unwrap();
        let inputs = load_use_cases(&path).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[1].name, "Fraud");

        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(load_use_cases(&path), Err(ScopeError::Config(_))));
    }

    #[tokio::test]
    async fn test_blank_company_rejected() {
        let result = run(AnalyzeOptions {
            company: "   ".to_string(),
            ..Default::default()
        })
        .await;
        assert!(matches!(result, Err(ScopeError::Config(_))));
    }
}
