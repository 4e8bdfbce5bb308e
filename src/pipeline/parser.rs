//! Use-case text parser.
//!
//! Generated use cases arrive as one markdown-ish text block. Every record
//! starts with the literal `**Use Case` marker and carries bold field markers
//! (`**Objective/Use Case:**`, `**AI Application:**`, ...). This module is the
//! single place that turns that text into [`UseCase`] records; the report,
//! the resource stage and the CLI all go through [`parse_use_cases`].
//!
//! Parsing is total. Malformed input degrades to fewer fields or fewer
//! records, never to a panic or an error.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Literal that opens every use-case record
pub const RECORD_MARKER: &str = "**Use Case";

static FIELD_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?im)(?:^|\*\*)[ \t]*(",
        r"objective(?:\s*/\s*use\s+case)?",
        r"|ai\s+application",
        r"|cross[- ]functional\s+benefits?",
        r"|business\s+impact",
        r"|kpis?",
        r"|effort\s*(?:&|and)\s*cost",
        r"|risks?\s*(?:&|and)\s*compliance",
        r")[ \t]*(?::\*\*|\*\*[ \t]*:|:)",
    ))
    .expect("field marker pattern is valid")
});

/// Trailing source list the generator appends after the last record. Only a
/// heading line counts: `## Sources`, `**Citations**` or a bare `References:`.
static TRAILER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?im)^[ \t]*(?:",
        r"#+[ \t]*(?:citations|sources|references)\b[^\n]*",
        r"|\*\*[ \t]*(?:citations|sources|references)[ \t]*:?[ \t]*\*\*[ \t]*:?",
        r"|(?:citations|sources|references)[ \t]*:?",
        r")[ \t\r]*$",
    ))
    .expect("trailer pattern is valid")
});

static LENIENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*([^*\n]+)\*\*[\s\S]*?\*\*Objective[^:\n]*:(.*)")
        .expect("lenient pattern is valid")
});

/// One parsed use case. Position in the parsed list is its identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseCase {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_application: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_functional_benefit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort_cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risks: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Objective,
    AiApplication,
    CrossFunctionalBenefit,
    BusinessImpact,
    Kpis,
    EffortCost,
    Risks,
}

impl Field {
    fn from_marker(marker: &str) -> Option<Self> {
        let lower = marker.to_lowercase();
        let field = if lower.starts_with("objective") {
            Self::Objective
        } else if lower.starts_with("ai") {
            Self::AiApplication
        } else if lower.starts_with("cross") {
            Self::CrossFunctionalBenefit
        } else if lower.starts_with("business") {
            Self::BusinessImpact
        } else if lower.starts_with("kpi") {
            Self::Kpis
        } else if lower.starts_with("effort") {
            Self::EffortCost
        } else if lower.starts_with("risk") {
            Self::Risks
        } else {
            return None;
        };
        Some(field)
    }
}

impl UseCase {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Objective => &mut self.objective,
            Field::AiApplication => &mut self.ai_application,
            Field::CrossFunctionalBenefit => &mut self.cross_functional_benefit,
            Field::BusinessImpact => &mut self.business_impact,
            Field::Kpis => &mut self.kpis,
            Field::EffortCost => &mut self.effort_cost,
            Field::Risks => &mut self.risks,
        }
    }

    /// Best available one-paragraph description
    pub fn description(&self) -> &str {
        self.objective
            .as_deref()
            .or(self.ai_application.as_deref())
            .unwrap_or_default()
    }
}

/// Parse generated use-case text. One record per [`RECORD_MARKER`]; when the
/// text has no marker at all, a lenient `**Title** ... **Objective:**` scan
/// is tried instead.
pub fn parse_use_cases(text: &str) -> Vec<UseCase> {
    let segments: Vec<&str> = text.split(RECORD_MARKER).skip(1).collect();
    if segments.is_empty() {
        return parse_lenient(text);
    }

    let last = segments.len() - 1;
    segments
        .into_iter()
        .enumerate()
        .map(|(index, segment)| parse_record(index + 1, segment, index == last))
        .collect()
}

fn parse_record(position: usize, segment: &str, is_last: bool) -> UseCase {
    let markers: Vec<(Field, usize, usize)> = FIELD_MARKER
        .captures_iter(segment)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let field = Field::from_marker(caps.get(1)?.as_str())?;
            Some((field, whole.start(), whole.end()))
        })
        .collect();

    // a source list can only follow the last field of the last record
    let end = if is_last {
        let after = markers.last().map_or(0, |&(_, _, value_start)| value_start);
        TRAILER
            .find_at(segment, after)
            .map_or(segment.len(), |m| m.start())
    } else {
        segment.len()
    };

    let heading = match markers.first() {
        Some(&(_, start, _)) => &segment[..start],
        None => segment[..end].trim_start().lines().next().unwrap_or_default(),
    };
    let mut use_case = UseCase {
        title: title_from_heading(heading).unwrap_or_else(|| format!("Use Case {}", position)),
        ..Default::default()
    };

    for (i, &(field, _, value_start)) in markers.iter().enumerate() {
        let value_end = markers
            .get(i + 1)
            .map(|&(_, start, _)| start)
            .unwrap_or(end);
        let slot = use_case.slot(field);
        if slot.is_none() {
            *slot = clean(&segment[value_start..value_end]);
        }
    }
    use_case
}

/// `" 3: Demand Forecasting**\n"` -> `"Demand Forecasting"`, `" 3**"` -> `"3"`
fn title_from_heading(heading: &str) -> Option<String> {
    let heading = heading.trim_start();
    let line = heading.lines().next().unwrap_or_default();
    let title = match line.split_once(':') {
        Some((_, rest)) if !clean_str(rest).is_empty() => rest,
        _ => line,
    };
    clean(title)
}

fn parse_lenient(text: &str) -> Vec<UseCase> {
    LENIENT
        .captures_iter(text)
        .filter_map(|caps| {
            let title = clean(caps.get(1)?.as_str())?;
            Some(UseCase {
                title,
                objective: caps.get(2).and_then(|m| clean(m.as_str())),
                ..Default::default()
            })
        })
        .collect()
}

fn clean_str(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '*')
}

fn clean(value: &str) -> Option<String> {
    let cleaned = clean_str(value);
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn block(n: usize) -> String {
        format!(
            "**Use Case {n}**\n\
             **Objective/Use Case:** Objective for case {n}.\n\
             **AI Application:** Gradient boosted trees.\n\
             **Cross-Functional Benefit:** Sales: faster quotes; Ops: fewer stockouts; Finance: tighter budgets\n\n"
        )
    }

    #[test]
    fn test_ten_blocks_in_order() {
        let text: String = (1..=10).map(block).collect();
        let parsed = parse_use_cases(&text);

        assert_eq!(parsed.len(), 10);
        for (i, use_case) in parsed.iter().enumerate() {
            assert_eq!(use_case.title, (i + 1).to_string());
            assert_eq!(
                use_case.objective.as_deref(),
                Some(format!("Objective for case {}.", i + 1).as_str())
            );
            assert!(use_case.business_impact.is_none());
        }
        assert_eq!(
            parsed[0].ai_application.as_deref(),
            Some("Gradient boosted trees.")
        );
    }

    #[test]
    fn test_full_schema_and_title_after_colon() {
        let text = "Intro text\n\n\
            **Use Case 1: Predictive Maintenance**\n\
            **Objective/Use Case:** Reduce unplanned downtime.\n\
            **AI Application:** Anomaly detection on sensor streams.\n\
            **Cross-Functional Benefit:** Maintenance: planned work\n\
            **Business Impact:**\n- Fewer outages\n- Lower repair spend\n\
            **KPIs:** Leading KPI: alerts triaged; Lagging KPI: downtime hours\n\
            **Effort & Cost:** Effort: M; Cost Band: Medium\n\
            **Risks & Compliance:** Sensor drift; mitigated by recalibration\n\n\
            ## Citations\n- https://example.com/report\n";
        let parsed = parse_use_cases(text);

        assert_eq!(parsed.len(), 1);
        let case = &parsed[0];
        assert_eq!(case.title, "Predictive Maintenance");
        assert_eq!(case.business_impact.as_deref(), Some("- Fewer outages\n- Lower repair spend"));
        assert_eq!(case.effort_cost.as_deref(), Some("Effort: M; Cost Band: Medium"));
        assert_eq!(
            case.risks.as_deref(),
            Some("Sensor drift; mitigated by recalibration")
        );
        assert_eq!(
            case.kpis.as_deref(),
            Some("Leading KPI: alerts triaged; Lagging KPI: downtime hours")
        );
    }

    #[test]
    fn test_wrapped_line_starting_with_sources_keeps_later_fields() {
        let text = "**Use Case 1: Demand Forecasting**\n\
            **AI Application:** Gradient boosting over\n\
            sources such as POS feeds and weather.\n\
            **Business Impact:** Lower stockouts\n\
            **KPIs:** Forecast error\n\n\
            **Use Case 2: Pricing**\n\
            **Objective:** Set prices\n\
            References: competitor feeds\n\
            **KPIs:** Margin\n";
        let parsed = parse_use_cases(text);

        assert_eq!(parsed.len(), 2);
        assert_eq!(
            parsed[0].ai_application.as_deref(),
            Some("Gradient boosting over\nsources such as POS feeds and weather.")
        );
        assert_eq!(parsed[0].business_impact.as_deref(), Some("Lower stockouts"));
        assert_eq!(parsed[0].kpis.as_deref(), Some("Forecast error"));
        assert_eq!(
            parsed[1].objective.as_deref(),
            Some("Set prices\nReferences: competitor feeds")
        );
        assert_eq!(parsed[1].kpis.as_deref(), Some("Margin"));
    }

    #[test]
    fn test_source_heading_trimmed_from_last_record_only() {
        let text = "**Use Case 1: Churn**\n\
            **Objective:** Keep customers\n\
            **Sources**\n- https://example.com/a\n\n\
            **Use Case 2: Fraud**\n\
            **KPIs:** Chargebacks\n\n\
            Sources:\n- https://example.com/b\n";
        let parsed = parse_use_cases(text);

        assert_eq!(
            parsed[0].objective.as_deref(),
            Some("Keep customers\n**Sources**\n- https://example.com/a")
        );
        assert_eq!(parsed[1].kpis.as_deref(), Some("Chargebacks"));
    }

    #[test]
    fn test_marker_variants() {
        let text = "**Use Case 2: Churn**\n\
            **Objective**: Keep customers.\n\
            Ai application: Survival models.\n\
            **Cross Functional Benefits:** Support: earlier outreach\n\
            **Risks and Compliance:** Consent management\n";
        let case = &parse_use_cases(text)[0];
        assert_eq!(case.objective.as_deref(), Some("Keep customers."));
        assert_eq!(case.ai_application.as_deref(), Some("Survival models."));
        assert_eq!(
            case.cross_functional_benefit.as_deref(),
            Some("Support: earlier outreach")
        );
        assert_eq!(case.risks.as_deref(), Some("Consent management"));
    }

    #[test]
    fn test_missing_fields_stay_absent() {
        let parsed = parse_use_cases("**Use Case 1: Lonely Title**\nsome prose without markers");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "Lonely Title");
        assert_eq!(parsed[0].objective, None);
        assert_eq!(parsed[0].description(), "");
    }

    #[test]
    fn test_empty_segment_gets_positional_title() {
        let parsed = parse_use_cases("**Use Case**\n**Objective:** x\n**Use Case");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].title, "Use Case 1");
        assert_eq!(parsed[0].objective.as_deref(), Some("x"));
        assert_eq!(parsed[1].title, "Use Case 2");
    }

    #[test]
    fn test_lenient_fallback_only_without_markers() {
        let text = "**Smart Pricing**\nSome intro\n**Objective:** Price dynamically\n\
                    **Route Planning**\n**Objective:** Shorter routes\n";
        let parsed = parse_use_cases(text);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].title, "Smart Pricing");
        assert_eq!(parsed[0].objective.as_deref(), Some("Price dynamically"));
        assert_eq!(parsed[1].title, "Route Planning");
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert!(parse_use_cases("").is_empty());
        assert!(parse_use_cases("no markers here at all").is_empty());
        let nested = parse_use_cases("**Use Case **Use Case **Objective:****Use Case:");
        assert_eq!(nested.len(), 3);
        assert!(nested.iter().all(|c| !c.title.is_empty()));
    }

    #[test]
    fn test_idempotent() {
        let text: String = (1..=3).map(block).collect();
        assert_eq!(parse_use_cases(&text), parse_use_cases(&text));
    }

    proptest! {
        #[test]
        fn prop_never_panics(text in "\\PC*") {
            let _ = parse_use_cases(&text);
        }

        #[test]
        fn prop_never_panics_on_marker_soup(
            parts in prop::collection::vec(
                prop::sample::select(vec![
                    "**Use Case", "**Objective:**", "**AI Application:**", ":", "**", "\n",
                    "Citations", "KPIs:", "title", " ", "é",
                ]),
                0..40,
            )
        ) {
            let _ = parse_use_cases(&parts.concat());
        }

        #[test]
        fn prop_one_record_per_marker(
            titles in prop::collection::vec("[A-Za-z][A-Za-z ]{0,20}", 1..12)
        ) {
            let text: String = titles
                .iter()
                .enumerate()
                .map(|(i, t)| format!(
                    "**Use Case {}: {}**\n**Objective/Use Case:** o\n**AI Application:** a\n\n",
                    i + 1, t
                ))
                .collect();
            let parsed = parse_use_cases(&text);
            prop_assert_eq!(parsed.len(), titles.len());
            prop_assert!(parsed.iter().all(|c| !c.title.is_empty()));
        }
    }
}
