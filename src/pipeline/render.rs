//! Markdown rendering for persisted artifacts.

use std::fmt::Write;

use super::mapper::ReferenceRow;
use super::report::{AnalysisReport, FinalProposal};
use crate::constants::pipeline::REFERENCE_TITLE_CHARS;
use crate::resources::{CollectedResources, Platform, ResourceRecord};

const FOOTER: &str = "*Generated by marketscope*";

/// Titles of `REFERENCE_TITLE_CHARS` or more are cut to fit, ellipsis included
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() < REFERENCE_TITLE_CHARS {
        return title.to_string();
    }
    let kept: String = title.chars().take(REFERENCE_TITLE_CHARS - 3).collect();
    format!("{}...", kept)
}

/// Table cells cannot hold raw pipes or line breaks
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Use case to reference links table. `None` when there are no rows.
pub fn datasets_markdown(rows: &[ReferenceRow]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }
    let mut md = String::from("| Use Case | Description | References |\n|---|---|---|\n");
    for row in rows {
        let references = if row.references.is_empty() {
            "No dataset found".to_string()
        } else {
            row.references
                .iter()
                .map(|link| {
                    format!(
                        "- <a href=\"{}\" target=\"_blank\">{}</a>",
                        link.url,
                        cell(&truncate_title(&link.title))
                    )
                })
                .collect::<Vec<_>>()
                .join(" <br> ")
        };
        let _ = writeln!(
            md,
            "| {} | {} | {} |",
            cell(&row.use_case),
            cell(&row.description),
            references
        );
    }
    Some(md)
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

fn record_details(platform: Platform, record: &ResourceRecord) -> Vec<(&'static str, String)> {
    let m = &record.metrics;
    let description = if record.description.trim().is_empty() {
        "No description available".to_string()
    } else {
        record.description.clone()
    };
    let term = if record.search_term.is_empty() {
        "N/A".to_string()
    } else {
        record.search_term.clone()
    };
    let mut details = vec![("Description", description)];
    match platform {
        Platform::Kaggle => {
            details.push(("Search Term", term));
            details.push(("Votes", or_na(m.votes)));
            details.push(("Downloads", or_na(m.downloads)));
        }
        Platform::HuggingFace => {
            details.push(("Type", or_na(m.kind.as_deref())));
            details.push(("Search Term", term));
            details.push(("Downloads", or_na(m.downloads)));
            details.push(("Likes", or_na(m.likes)));
        }
        Platform::GitHub => {
            details.push(("Language", or_na(m.language.as_deref())));
            details.push(("Search Term", term));
            details.push(("Stars", or_na(m.stars)));
            details.push(("Forks", or_na(m.forks)));
            details.push(("Last Updated", or_na(m.updated_at.as_deref())));
        }
    }
    details
}

fn section_title(platform: Platform) -> (&'static str, &'static str) {
    match platform {
        Platform::Kaggle => ("Kaggle Datasets", "No Kaggle datasets found."),
        Platform::HuggingFace => ("HuggingFace Resources", "No HuggingFace resources found."),
        Platform::GitHub => ("GitHub Repositories", "No GitHub repositories found."),
    }
}

/// Domain-wide catalog listing
pub fn resources_markdown(collected: &CollectedResources) -> String {
    let industry = if collected.industry.is_empty() {
        "Unknown"
    } else {
        collected.industry.as_str()
    };
    let mut md = String::new();
    let _ = writeln!(md, "# AI/ML Resources for {} Industry\n", industry);
    let _ = writeln!(
        md,
        "Datasets, models and repositories relevant for AI/ML implementation in the {} industry.\n",
        industry
    );
    let _ = writeln!(
        md,
        "## Search Terms Used\n{}\n\n---\n",
        collected.search_terms_used.join(", ")
    );

    for platform in Platform::ALL {
        let (title, empty) = section_title(platform);
        let _ = writeln!(md, "## {}\n", title);
        let records = collected.records(platform);
        if records.is_empty() {
            let _ = writeln!(md, "{}\n", empty);
            continue;
        }
        for (i, record) in records.iter().enumerate() {
            let _ = writeln!(
                md,
                "### {}. <a href=\"{}\" target=\"_blank\">{}</a>",
                i + 1,
                record.url,
                record.title
            );
            for (label, value) in record_details(platform, record) {
                let _ = writeln!(md, "- **{}**: {}", label, value);
            }
            md.push('\n');
        }
    }

    let _ = write!(
        md,
        "---\n\n{}\n*Industry: {}*\n*Total Resources: {}*\n",
        FOOTER,
        industry,
        collected.total()
    );
    md
}

/// Human-readable executive summary of a finished run
pub fn summary_markdown(report: &AnalysisReport) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# Market Research Analysis Report\n");
    let _ = writeln!(md, "## Company: {}\n", report.company_name);

    let Some(proposal) = report.final_proposal.as_ref() else {
        let _ = writeln!(md, "Status: **{}**\n", report.workflow_status);
        if let Some(error) = &report.error {
            let _ = writeln!(md, "Error: {}\n", error);
        }
        let _ = writeln!(md, "---\n\n{}", FOOTER);
        return md;
    };

    write_executive_summary(&mut md, proposal);

    let _ = writeln!(md, "### Top Recommendations\n");
    let _ = writeln!(
        md,
        "{}\n",
        proposal
            .top_recommendations
            .as_deref()
            .unwrap_or("No prioritization available.")
    );

    let _ = writeln!(md, "### GenAI Solutions\n");
    let _ = writeln!(
        md,
        "{}\n",
        proposal
            .genai_solutions
            .as_deref()
            .unwrap_or("No GenAI solutions available.")
    );

    let _ = writeln!(md, "### Implementation Roadmap\n");
    for phase in &proposal.implementation_roadmap {
        let _ = writeln!(md, "**{}**", phase.phase);
        for task in &phase.tasks {
            let _ = writeln!(md, "- {}", task);
        }
        md.push('\n');
    }

    let resources = &proposal.resource_summary;
    let _ = writeln!(md, "### Resources Available\n");
    let _ = writeln!(md, "- **Kaggle Datasets**: {}", resources.kaggle_datasets);
    let _ = writeln!(
        md,
        "- **HuggingFace Resources**: {}",
        resources.huggingface_resources
    );
    let _ = writeln!(
        md,
        "- **GitHub Repositories**: {}\n",
        resources.github_repositories
    );
    if let Some(file) = &resources.resource_file {
        let _ = writeln!(md, "[View Detailed Resources]({})\n", file);
    }

    let _ = writeln!(md, "### Next Steps\n");
    for (i, step) in proposal.next_steps.iter().enumerate() {
        let _ = writeln!(md, "{}. {}", i + 1, step);
    }
    let _ = write!(md, "\n---\n\n{}\n", FOOTER);
    md
}

fn write_executive_summary(md: &mut String, proposal: &FinalProposal) {
    let summary = &proposal.executive_summary;
    let industry = if summary.industry.is_empty() {
        "N/A"
    } else {
        summary.industry.as_str()
    };
    let _ = writeln!(md, "### Executive Summary");
    let _ = writeln!(md, "- **Industry**: {}", industry);
    let _ = writeln!(
        md,
        "- **Analysis Date**: {}",
        summary.analysis_date.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(
        md,
        "- **Use Cases Generated**: {}",
        summary.total_use_cases_generated
    );
    let _ = writeln!(md, "- **Resources Found**: {}\n", summary.total_resources_found);
}
