//! Prompt construction for every completion call in the pipeline.
//!
//! Prompt text is kept out of the stage logic so stages can be exercised
//! with scripted providers that match on stable section headers.

use crate::ai::PromptBuilder;
use crate::industry::IndustryCategory;

/// Section header of the industry identification prompt
pub const IDENTIFY_MARKER: &str = "identify the primary industry";
/// Header shared by the analysis system prompt
pub const ANALYSIS_MARKER: &str = "REQUIRED JSON OUTPUT FORMAT";
/// Header shared by the use-case generation user prompt
pub const USE_CASE_MARKER: &str = "DISTRIBUTION REQUIREMENT";
/// Header shared by the prioritization system prompt
pub const PRIORITIZE_MARKER: &str = "Your task is to prioritize";
/// Header shared by the GenAI solutions system prompt
pub const GENAI_MARKER: &str = "GenAI solutions architect";

const ANALYSIS_SCHEMA: &str = r#"{
  "company_analysis": {
    "businesses": [{"name": "Business Unit Name", "description": "What this unit does"}],
    "products": [{"name": "Product/Service Name", "description": "Features and purpose"}],
    "segments": [{"name": "Market Segment Name", "description": "Target audience"}],
    "business_model": "Overall business model description",
    "key_offerings": ["Offering 1", "Offering 2"],
    "strategic_focus": "Current strategic priorities",
    "competitors": [{"name": "Competitor Name", "reason": "Segment, geography or product overlap"}]
  },
  "industry_analysis": {
    "market_trends": [{"trend": "Trend Name", "description": "Impact of the trend"}],
    "strategic_focus": [{"area": "Focus Area Name", "description": "Why it matters"}],
    "growth_opportunities": [{"opportunity": "Opportunity Name", "description": "Reasoning"}]
  },
  "citations": [{"title": "Source Title", "url": "https://...", "source": "Company IR / SEC / Reuters"}]
}"#;

/// Category split of the generated use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Distribution {
    /// Traditional AI/ML (forecasting, vision, NLP, optimization)
    pub ai: usize,
    pub genai: usize,
    pub non_ai: usize,
}

impl Distribution {
    /// Half AI/ML, three tenths GenAI, the rest non-AI
    pub fn for_count(count: usize) -> Self {
        let ai = count / 2;
        let genai = ((count as f64) * 0.3).round() as usize;
        let genai = genai.min(count - ai);
        Self {
            ai,
            genai,
            non_ai: count - ai - genai,
        }
    }
}

/// User prompt for the industry label. Expects a bare label back.
pub fn identify_industry(company_context: &str) -> String {
    PromptBuilder::new()
        .text(&format!(
            "Based on the following company information, {} this company operates in.\n\
             Return only the industry name (e.g., \"Healthcare\", \"Automotive\", \"Finance\", \"Retail\", \"Manufacturing\").",
            IDENTIFY_MARKER
        ))
        .section("Company Information", company_context)
        .text("Industry:")
        .build()
}

pub fn analysis_system() -> String {
    PromptBuilder::new()
        .role(
            "business analyst",
            "industry research and company analysis",
        )
        .numbered(
            "ANALYSIS FRAMEWORK",
            &[
                "Break complex information into logical components",
                "Consider multiple viewpoints and stakeholders",
                "Connect the current state to future opportunities",
                "Support every claim with the provided sources",
            ],
        )
        .text(&format!(
            "{} (exhaustive lists, competitors and citations):",
            ANALYSIS_MARKER
        ))
        .code("json", ANALYSIS_SCHEMA)
        .numbered(
            "FOCUS AREAS",
            &[
                "Every business unit, subsidiary and brand",
                "All major products and services",
                "All market segments the company operates in",
                "Latest industry trends and market dynamics",
                "Strategic focus areas",
                "Growth opportunities with specific reasoning",
                "Technology adoption and AI readiness",
                "Competitive landscape and market position",
            ],
        )
        .text(
            "Respond with the JSON document only. Every list item should be supportable by the \
             sources, and the citations array is required.",
        )
        .build()
}

pub fn analysis_user(company_context: &str, industry_context: &str) -> String {
    PromptBuilder::new()
        .text(
            "Analyze the following company and industry information and provide real, specific \
             detail with competitors and citations.",
        )
        .section("COMPANY INFORMATION", company_context)
        .section("INDUSTRY INFORMATION", industry_context)
        .numbered(
            "CRITICAL REQUIREMENTS",
            &[
                "BUSINESSES: actual business units and subsidiaries by name",
                "PRODUCTS: specific products and services by name",
                "SEGMENTS: actual market segments",
                "TRENDS: current industry trends from the sources",
                "STRATEGIC FOCUS: priorities from recent company reports",
                "GROWTH OPPORTUNITIES: grounded in current market analysis",
                "COMPETITORS: a short rationale for each",
                "CITATIONS: full URLs and source names, official filings first",
            ],
        )
        .build()
}

/// System prompt for use-case generation, picked by industry category
pub fn use_case_system(
    category: IndustryCategory,
    company: &str,
    industry: &str,
    count: usize,
) -> String {
    let focus_header = match category {
        IndustryCategory::Default => "Focus on general business areas".to_string(),
        _ => format!("Focus areas for {} industry", industry),
    };
    PromptBuilder::new()
        .role("AI/ML consultant", category.audience())
        .text(&format!(
            "Your task is to generate exactly {} detailed, structured AI/ML use cases for {} in the {} industry.",
            count, company, industry
        ))
        .numbered(&focus_header, category.focus_areas())
        .bullets(
            "Each use case must include",
            &[
                "Clear, actionable objective",
                "Specific AI/ML technology application",
                "Cross-functional benefits for at least 3 departments",
                "Industry-relevant implementation approach",
                "Measurable business impact",
            ],
        )
        .text(&format!(
            "Generate exactly {} use cases following the requested format precisely.",
            count
        ))
        .build()
}

pub fn use_case_user(
    company: &str,
    industry: &str,
    analysis_json: &str,
    trends_context: &str,
    count: usize,
) -> String {
    let split = Distribution::for_count(count);
    PromptBuilder::new()
        .text(&format!(
            "Generate exactly {} detailed development use cases for {} in the {} industry.",
            count, company, industry
        ))
        .section("COMPANY ANALYSIS", analysis_json)
        .section("INDUSTRY", industry)
        .section("AI TRENDS IN INDUSTRY", trends_context)
        .bullets(
            &format!("{} (STRICT)", USE_CASE_MARKER),
            &[
                format!(
                    "{} of {} MUST be AI-related (AI/ML/DL excluding GenAI): computer vision, forecasting, optimization, anomaly detection, recommendation systems",
                    split.ai, count
                ),
                format!(
                    "{} of {} MUST be GenAI: RAG, agents, copilots, content generation, document AI, natural-language interfaces",
                    split.genai, count
                ),
                format!(
                    "{} of {} MUST be non-AI development: new products, partnerships, process automation without AI, data governance, integration, UX",
                    split.non_ai, count
                ),
                "Address weakness signals and capability gaps observed in the research, not only market trends".to_string(),
            ],
        )
        .text("FORMAT REQUIREMENTS (STRICT, SAME SCHEMA FOR ALL USE CASES):")
        .text(
            "**Use Case 1: [Clear, Descriptive Title]**\n\
             **Objective/Use Case:** [problem context, business driver, affected processes, desired outcomes]\n\
             **AI Application:** [techniques, model family, training vs. fine-tune vs. RAG, deployment pattern, privacy]\n\
             **Cross-Functional Benefit:** [Department 1: benefit; Department 2: benefit; Department 3: benefit]\n\
             **Business Impact:** [qualitative value bullets tied to measurable KPIs]\n\
             **KPIs:** [Leading KPI: ...; Lagging KPI: ...]\n\
             **Effort & Cost:** [Effort: S/M/L; Cost Band: Low/Medium/High]\n\
             **Risks & Compliance:** [key risks, regulatory constraints, mitigation]",
        )
        .constraints(&[
            "Do NOT include numeric percentages anywhere in the output.",
            "Do NOT include a Pilot Plan section.",
        ])
        .text(&format!(
            "Continue this pattern for all {} use cases. After the last use case add a section named \
             \"Citations\" as a bullet list of the authoritative sources used (full URLs).",
            count
        ))
        .build()
}

pub fn prioritization_system(company: &str, industry: &str, count: usize) -> String {
    PromptBuilder::new()
        .role("strategic AI consultant", &format!("{} industry implementations", industry))
        .numbered(
            &format!("{} the {} AI/ML use cases for {} based on", PRIORITIZE_MARKER, count, company),
            &[
                "Business Impact (High/Medium/Low)",
                "Implementation Feasibility (High/Medium/Low)",
                "Data Availability (High/Medium/Low)",
                "Technical Complexity (High/Medium/Low)",
                "Timeline to Value (Quick/Medium/Long-term)",
                "ROI Potential (High/Medium/Low)",
            ],
        )
        .bullets(
            "Provide a structured prioritization with",
            &[
                format!("Priority ranking (1-{})", count),
                "Implementation timeline (Phase 1: 0-6 months, Phase 2: 6-18 months, Phase 3: 18+ months)".to_string(),
                "Resource requirements".to_string(),
                "Success metrics".to_string(),
                "Risk assessment".to_string(),
            ],
        )
        .build()
}

pub fn prioritization_user(
    company: &str,
    industry: &str,
    formatted_use_cases: &str,
    research_document: &str,
) -> String {
    PromptBuilder::new()
        .text(&format!(
            "Prioritize these use cases for {} in the {} industry:",
            company, industry
        ))
        .section("USE CASES", formatted_use_cases)
        .section("COMPANY DATA", research_document)
        .text("Provide detailed prioritization with clear justification and an implementation roadmap.")
        .build()
}

pub fn genai_system(category: IndustryCategory, company: &str, industry: &str) -> String {
    let audience = match category {
        IndustryCategory::Manufacturing
        | IndustryCategory::Technology
        | IndustryCategory::Healthcare
        | IndustryCategory::Finance
        | IndustryCategory::Agriculture => category.audience(),
        _ => "business applications",
    };
    let mut deliverables = vec![
        "Solution name and clear description".to_string(),
        format!("Specific business benefits for {}", industry),
        "Technical implementation approach".to_string(),
    ];
    deliverables.extend(category.genai_consideration().map(str::to_string));
    deliverables.extend([
        "Expected ROI and success metrics".to_string(),
        "Implementation timeline and resources".to_string(),
    ]);

    PromptBuilder::new()
        .text(&format!("You are a {} specializing in {}.", GENAI_MARKER, audience))
        .text(&format!(
            "Generate 5-7 specific Generative AI solutions for {} in the {} industry.",
            company, industry
        ))
        .numbered("Focus on these GenAI applications", category.genai_focus())
        .bullets("For each solution, provide", &deliverables[..])
        .build()
}

pub fn genai_user(company: &str, industry: &str, analysis_json: &str) -> String {
    PromptBuilder::new()
        .text(&format!(
            "Generate GenAI solutions for {} in the {} industry:",
            company, industry
        ))
        .section("COMPANY ANALYSIS", analysis_json)
        .text("Focus on practical, high-impact GenAI applications that complement traditional AI/ML use cases.")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_for_ten() {
        assert_eq!(
            Distribution::for_count(10),
            Distribution {
                ai: 5,
                genai: 3,
                non_ai: 2
            }
        );
    }

    #[test]
    fn test_distribution_always_sums() {
        for count in 1..=25 {
            let split = Distribution::for_count(count);
            assert_eq!(split.ai + split.genai + split.non_ai, count);
        }
    }

    #[test]
    fn test_use_case_prompts_forbid_percentages() {
        let user = use_case_user("Acme", "Retail", "{}", "", 10);
        assert!(user.contains("5 of 10 MUST be AI-related"));
        assert!(user.contains("Do NOT include numeric percentages"));
        assert!(user.contains("**Risks & Compliance:**"));
        assert!(!user.contains('%'));
    }

    #[test]
    fn test_use_case_system_uses_category() {
        let prompt = use_case_system(IndustryCategory::Healthcare, "Acme", "Hospitals", 10);
        assert!(prompt.contains("healthcare and medical companies"));
        assert!(prompt.contains("Focus areas for Hospitals industry"));

        let fallback = use_case_system(IndustryCategory::Default, "Acme", "Mining", 10);
        assert!(fallback.contains("Focus on general business areas"));
    }

    #[test]
    fn test_genai_consideration_only_for_specialized_categories() {
        let healthcare = genai_system(IndustryCategory::Healthcare, "Acme", "Healthcare");
        assert!(healthcare.contains("HIPAA compliance considerations"));
        assert!(healthcare.contains(GENAI_MARKER));

        let retail = genai_system(IndustryCategory::Retail, "Acme", "Retail");
        assert!(retail.contains("business applications"));
        assert!(!retail.contains("considerations"));
    }
}
