//! Root report aggregate and final proposal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::mapper::ResourceMapping;
use super::research::{ResearchAnalysis, ResearchReport};
use super::usecases::UseCaseReport;
use crate::resources::Platform;
use crate::types::StageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    InProgress,
    Completed,
    Partial,
    Failed,
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Partial => "partial",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageOutputs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research: Option<ResearchReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_cases: Option<UseCaseReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceMapping>,
}

/// Derived counts, recomputed whenever a stage output lands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCounts {
    pub use_cases: usize,
    pub resources: usize,
    pub references: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub company_name: String,
    pub timestamp: DateTime<Utc>,
    pub workflow_status: WorkflowStatus,
    pub stage_outputs: StageOutputs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_proposal: Option<FinalProposal>,
    #[serde(default)]
    pub persisted_file_paths: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stage failures that were masked by a fallback or degraded the run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stage_errors: Vec<StageError>,
    pub counts: ReportCounts,
    /// Set by `finish` and `fail`; a partial run keeps accepting stage output
    #[serde(skip)]
    sealed: bool,
}

impl AnalysisReport {
    pub fn new(company: &str) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            company_name: company.to_string(),
            timestamp: Utc::now(),
            workflow_status: WorkflowStatus::InProgress,
            stage_outputs: StageOutputs::default(),
            final_proposal: None,
            persisted_file_paths: Vec::new(),
            error: None,
            stage_errors: Vec::new(),
            counts: ReportCounts::default(),
            sealed: false,
        }
    }

    /// Changes are refused once the run is sealed
    fn writable(&self) -> bool {
        if self.sealed {
            warn!(status = %self.workflow_status, "Report already finished, ignoring update");
            return false;
        }
        true
    }

    pub fn set_research(&mut self, research: ResearchReport) {
        if self.writable() {
            self.stage_outputs.research = Some(research);
            self.refresh_counts();
        }
    }

    pub fn set_use_cases(&mut self, use_cases: UseCaseReport) {
        if self.writable() {
            self.stage_outputs.use_cases = Some(use_cases);
            self.refresh_counts();
        }
    }

    pub fn set_resources(&mut self, resources: ResourceMapping) {
        if self.writable() {
            self.stage_outputs.resources = Some(resources);
            self.refresh_counts();
        }
    }

    pub fn set_proposal(&mut self, proposal: FinalProposal) {
        if self.writable() {
            self.final_proposal = Some(proposal);
        }
    }

    pub fn record_stage_error(&mut self, error: StageError) {
        if self.writable() {
            self.stage_errors.push(error);
        }
    }

    pub fn record_path(&mut self, path: impl Into<String>) {
        if self.writable() {
            self.persisted_file_paths.push(path.into());
        }
    }

    /// Degrade the run. Stays `partial` until it is finished.
    pub fn mark_partial(&mut self, error: impl Into<String>) {
        if self.writable() {
            self.error = Some(error.into());
            self.workflow_status = WorkflowStatus::Partial;
        }
    }

    /// Terminal failure; later updates are ignored
    pub fn fail(&mut self, error: impl Into<String>) {
        if self.writable() {
            self.error = Some(error.into());
            self.workflow_status = WorkflowStatus::Failed;
            self.sealed = true;
        }
    }

    /// Close the run: `completed` unless already degraded
    pub fn finish(&mut self) -> WorkflowStatus {
        if self.workflow_status == WorkflowStatus::InProgress {
            self.workflow_status = WorkflowStatus::Completed;
        }
        self.sealed = true;
        self.workflow_status
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    fn refresh_counts(&mut self) {
        let outputs = &self.stage_outputs;
        self.counts = ReportCounts {
            use_cases: outputs
                .use_cases
                .as_ref()
                .map(|u| u.use_cases().len())
                .unwrap_or(0),
            resources: outputs
                .resources
                .as_ref()
                .map(|r| r.collected.total())
                .unwrap_or(0),
            references: outputs
                .resources
                .as_ref()
                .map(|r| r.rows.iter().map(|row| row.references.len()).sum())
                .unwrap_or(0),
        };
    }

    pub fn industry(&self) -> &str {
        self.stage_outputs
            .research
            .as_ref()
            .map(|r| r.identified_industry.as_str())
            .unwrap_or_default()
    }
}

// =============================================================================
// Final Proposal
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub company: String,
    pub industry: String,
    pub analysis_date: DateTime<Utc>,
    pub total_use_cases_generated: usize,
    pub total_resources_found: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub phase: String,
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub kaggle_datasets: usize,
    pub huggingface_resources: usize,
    pub github_repositories: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalProposal {
    pub executive_summary: ExecutiveSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_overview: Option<ResearchAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_recommendations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genai_solutions: Option<String>,
    pub implementation_roadmap: Vec<RoadmapPhase>,
    pub resource_summary: ResourceSummary,
    pub next_steps: Vec<String>,
}

const ROADMAP: [(&str, [&str; 3]); 5] = [
    (
        "Phase 1 - Discovery (1-2 weeks)",
        [
            "Stakeholder alignment and scope definition",
            "Data inventory and access provisioning",
            "Success metrics and KPI baselining",
        ],
    ),
    (
        "Phase 2 - Prototype (3-4 weeks)",
        [
            "Feature engineering and model baselines",
            "Rapid iterations with offline evaluation",
            "Demo with business stakeholders",
        ],
    ),
    (
        "Phase 3 - Pilot (4-6 weeks)",
        [
            "Integrate data pipelines (batch/stream)",
            "Deploy API or notebook for a limited audience",
            "A/B testing and KPI uplift measurement",
        ],
    ),
    (
        "Phase 4 - Productionization (4-8 weeks)",
        [
            "MLOps setup (CI/CD, model registry, monitoring)",
            "Security, compliance and rollback strategy",
            "Runbooks and handover",
        ],
    ),
    (
        "Phase 5 - Scale & Enablement (ongoing)",
        [
            "Scale to additional use cases",
            "Training and center of excellence",
            "Continuous improvement backlog",
        ],
    ),
];

const NEXT_STEPS: [&str; 5] = [
    "Review and validate the proposed use cases with business stakeholders",
    "Conduct detailed feasibility assessment for priority use cases",
    "Develop proof-of-concept for the highest priority use case",
    "Establish AI governance framework and data infrastructure",
    "Plan team training and skill development initiatives",
];

/// Fixed five-phase plan; does not depend on the generated content
pub fn implementation_roadmap() -> Vec<RoadmapPhase> {
    ROADMAP
        .iter()
        .map(|(phase, tasks)| RoadmapPhase {
            phase: phase.to_string(),
            tasks: tasks.iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}

impl FinalProposal {
    pub fn assemble(report: &AnalysisReport, resource_file: Option<String>) -> Self {
        let outputs = &report.stage_outputs;
        let use_cases = outputs.use_cases.as_ref();
        let collected = outputs.resources.as_ref().map(|r| &r.collected);
        let count = |platform: Platform| collected.map(|c| c.records(platform).len()).unwrap_or(0);

        Self {
            executive_summary: ExecutiveSummary {
                company: report.company_name.clone(),
                industry: report.industry().to_string(),
                analysis_date: report.timestamp,
                total_use_cases_generated: report.counts.use_cases,
                total_resources_found: report.counts.resources,
            },
            company_overview: outputs.research.as_ref().map(|r| r.analysis.clone()),
            top_recommendations: use_cases.and_then(|u| u.prioritization.clone()),
            genai_solutions: use_cases.and_then(|u| u.genai_solutions.clone()),
            implementation_roadmap: implementation_roadmap(),
            resource_summary: ResourceSummary {
                kaggle_datasets: count(Platform::Kaggle),
                huggingface_resources: count(Platform::HuggingFace),
                github_repositories: count(Platform::GitHub),
                resource_file,
            },
            next_steps: NEXT_STEPS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::canned;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&WorkflowStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(WorkflowStatus::Partial.to_string(), "partial");
    }

    #[test]
    fn test_counts_follow_stage_outputs() {
        let mut report = AnalysisReport::new("Acme");
        report.set_research(canned::fallback_research("Acme"));
        report.set_use_cases(canned::fallback_use_cases("Technology"));
        report.set_resources(ResourceMapping {
            rows: Vec::new(),
            collected: canned::fast_resources("Acme"),
        });
        assert_eq!(report.counts.use_cases, 10);
        assert_eq!(report.counts.resources, 3);
        assert_eq!(report.industry(), "Technology");
    }

    #[test]
    fn test_partial_is_sticky() {
        let mut report = AnalysisReport::new("Acme");
        report.mark_partial("use cases unavailable");
        assert_eq!(report.finish(), WorkflowStatus::Partial);
        assert_eq!(report.error.as_deref(), Some("use cases unavailable"));
    }

    #[test]
    fn test_finished_report_is_frozen() {
        let mut report = AnalysisReport::new("Acme");
        assert_eq!(report.finish(), WorkflowStatus::Completed);
        report.set_research(canned::fallback_research("Acme"));
        report.mark_partial("late");
        report.fail("late");
        assert!(report.stage_outputs.research.is_none());
        assert_eq!(report.workflow_status, WorkflowStatus::Completed);
        assert!(report.error.is_none());
    }

    #[test]
    fn test_proposal_assembly() {
        let mut report = AnalysisReport::new("Acme");
        report.set_research(canned::fallback_research("Acme"));
        report.set_use_cases(canned::fallback_use_cases("Technology"));
        let proposal = FinalProposal::assemble(&report, Some("output/resources_technology.md".into()));

        assert_eq!(proposal.executive_summary.total_use_cases_generated, 10);
        assert_eq!(proposal.implementation_roadmap.len(), 5);
        assert_eq!(proposal.next_steps.len(), 5);
        assert!(proposal.top_recommendations.is_some());
        assert!(proposal.genai_solutions.is_none());
        assert_eq!(proposal.resource_summary.kaggle_datasets, 0);
    }
}
