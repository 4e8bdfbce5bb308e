//! Zero-network stand-ins for stage output.
//!
//! Used by the orchestrator for fallback after a stage failure and for the
//! fast and ultra-fast presets.

use super::research::{
    CompanyAnalysis, IndustryAnalysis, Opportunity, ResearchAnalysis, ResearchReport,
    StructuredAnalysis, Trend,
};
use super::usecases::UseCaseReport;
use crate::constants::pipeline::DEFAULT_INDUSTRY;
use crate::industry::IndustryCategory;
use crate::resources::{CollectedResources, Platform, ResourceRecord};

pub const ULTRA_FAST_STATUS: &str = "ultra_fast_completed";
pub const FALLBACK_STATUS: &str = "fallback_completed";
pub const FAST_RESOURCES_STATUS: &str = "fast_fallback_completed";

struct Template {
    company: &'static str,
    industry: &'static str,
    business_model: &'static str,
    key_offerings: &'static [&'static str],
    strategic_focus: &'static str,
    market_trends: &'static [&'static str],
    growth_opportunities: &'static [&'static str],
}

const KNOWN_COMPANIES: &[Template] = &[
    Template {
        company: "Tesla",
        industry: "Automotive",
        business_model: "Electric vehicle manufacturer and clean energy company",
        key_offerings: &[
            "Electric vehicles",
            "Energy storage",
            "Solar panels",
            "Autonomous driving",
        ],
        strategic_focus: "Sustainable transportation and energy solutions",
        market_trends: &[
            "Electric vehicle adoption",
            "Autonomous driving",
            "Sustainability",
        ],
        growth_opportunities: &[
            "AI-powered autonomous vehicles",
            "Energy management",
            "Manufacturing optimization",
        ],
    },
    Template {
        company: "Apple",
        industry: "Technology",
        business_model: "Consumer electronics and software company",
        key_offerings: &["iPhone", "iPad", "Mac", "Apple Watch", "Services", "Software"],
        strategic_focus: "Innovation, user experience and ecosystem integration",
        market_trends: &["Mobile computing", "Wearables", "Services", "AI integration"],
        growth_opportunities: &[
            "AI-powered features",
            "Health monitoring",
            "Augmented reality",
        ],
    },
];

fn generic_analysis(company: &str, opportunities: &[&str]) -> StructuredAnalysis {
    StructuredAnalysis {
        company_analysis: CompanyAnalysis {
            business_model: format!("{} is a technology company", company),
            key_offerings: vec!["Technology products and services".to_string()],
            strategic_focus: "Innovation and growth".to_string(),
            ..Default::default()
        },
        industry_analysis: IndustryAnalysis {
            market_trends: vec![
                Trend::from("Digital transformation".to_string()),
                Trend::from("AI adoption".to_string()),
            ],
            growth_opportunities: opportunities
                .iter()
                .map(|o| Opportunity::from(o.to_string()))
                .collect(),
            ..Default::default()
        },
        citations: Vec::new(),
    }
}

fn from_template(template: &Template) -> StructuredAnalysis {
    StructuredAnalysis {
        company_analysis: CompanyAnalysis {
            business_model: template.business_model.to_string(),
            key_offerings: template.key_offerings.iter().map(|s| s.to_string()).collect(),
            strategic_focus: template.strategic_focus.to_string(),
            ..Default::default()
        },
        industry_analysis: IndustryAnalysis {
            market_trends: template
                .market_trends
                .iter()
                .map(|t| Trend::from(t.to_string()))
                .collect(),
            growth_opportunities: template
                .growth_opportunities
                .iter()
                .map(|o| Opportunity::from(o.to_string()))
                .collect(),
            ..Default::default()
        },
        citations: Vec::new(),
    }
}

/// Templated research for the ultra-fast preset. Known companies match
/// case-insensitively; anything else gets the generic template.
pub fn ultra_fast_research(company: &str) -> ResearchReport {
    let known = KNOWN_COMPANIES
        .iter()
        .find(|t| t.company.eq_ignore_ascii_case(company.trim()));

    let (company_name, industry, analysis) = match known {
        Some(template) => (
            template.company.to_string(),
            template.industry,
            from_template(template),
        ),
        None => (
            company.to_string(),
            DEFAULT_INDUSTRY,
            generic_analysis(
                company,
                &["AI/ML implementation", "Automation", "Data analytics"],
            ),
        ),
    };

    ResearchReport {
        company_name,
        identified_industry: industry.to_string(),
        analysis: ResearchAnalysis::Structured(analysis),
        status: ULTRA_FAST_STATUS.to_string(),
        ..Default::default()
    }
}

/// Minimal research used after the company search came back empty
pub fn fallback_research(company: &str) -> ResearchReport {
    ResearchReport {
        company_name: company.to_string(),
        identified_industry: DEFAULT_INDUSTRY.to_string(),
        analysis: ResearchAnalysis::Structured(generic_analysis(
            company,
            &["AI/ML implementation"],
        )),
        status: FALLBACK_STATUS.to_string(),
        ..Default::default()
    }
}

struct GenericCase {
    title: &'static str,
    objective: &'static str,
    ai_application: &'static str,
    benefit: &'static str,
}

const GENERIC_USE_CASES: [GenericCase; 10] = [
    GenericCase {
        title: "Supply Chain Optimization",
        objective: "Enhance demand forecasting, inventory planning and logistics to reduce costs, waste and stockouts while speeding delivery.",
        ai_application: "Time-series forecasting (Prophet/LSTM), multi-echelon inventory optimization and route optimization with heuristics.",
        benefit: "Operations, Finance, Logistics",
    },
    GenericCase {
        title: "Predictive Maintenance",
        objective: "Predict equipment failures to minimize unplanned downtime and optimize maintenance schedules.",
        ai_application: "Sensor-based anomaly detection and Remaining Useful Life (RUL) estimation with gradient boosting and LSTMs.",
        benefit: "Manufacturing, Operations, Finance",
    },
    GenericCase {
        title: "Personalized Recommendations",
        objective: "Increase conversion and order value via personalized product and content recommendations across channels.",
        ai_application: "Collaborative filtering, content-based and hybrid recommenders; re-ranking with session context.",
        benefit: "Marketing, Sales, Product",
    },
    GenericCase {
        title: "Customer Churn Prediction",
        objective: "Identify at-risk customers and trigger retention offers to reduce churn and raise lifetime value.",
        ai_application: "Classification models on behavioral, transactional and support signals; uplift modeling.",
        benefit: "Customer Success, Marketing, Finance",
    },
    GenericCase {
        title: "Fraud Detection",
        objective: "Detect and prevent fraudulent transactions with minimal false positives.",
        ai_application: "Supervised and semi-supervised anomaly detection; graph-based fraud rings; feature stores.",
        benefit: "Risk, Compliance, Engineering",
    },
    GenericCase {
        title: "Dynamic Pricing Optimization",
        objective: "Optimize prices to balance margin, volume and competitiveness in real time.",
        ai_application: "Price elasticity modeling, contextual bandits and constrained optimization.",
        benefit: "Revenue, Sales, Finance",
    },
    GenericCase {
        title: "Demand Forecasting",
        objective: "Forecast demand at SKU and channel granularity to inform procurement and replenishment.",
        ai_application: "Hierarchical forecasting, causal features (promotions, seasonality) and feature-importance diagnostics.",
        benefit: "Supply Chain, Merchandising, Finance",
    },
    GenericCase {
        title: "Defect Detection (Computer Vision)",
        objective: "Improve quality by detecting defects on the line and reducing scrap and rework.",
        ai_application: "CNNs and vision transformers for visual inspection; active learning for continuous improvement.",
        benefit: "Quality, Manufacturing, R&D",
    },
    GenericCase {
        title: "Support Ticket Triage (NLP)",
        objective: "Auto-classify, route and summarize support tickets to cut response times.",
        ai_application: "Text classification with fine-tuned transformers; summarization for agent assistance.",
        benefit: "Customer Success, IT, Operations",
    },
    GenericCase {
        title: "Inventory Optimization",
        objective: "Right-size safety stock and reorder points to improve cash flow and service levels.",
        ai_application: "Probabilistic demand modeling, service-level constraints and stochastic optimization.",
        benefit: "Supply Chain, Finance, Operations",
    },
];

/// Formatted text for the generic use cases, in the same marker schema the
/// generator asks the model for
pub fn generic_use_case_text() -> String {
    GENERIC_USE_CASES
        .iter()
        .enumerate()
        .map(|(i, case)| {
            format!(
                "**Use Case {}: {}**\n**Objective/Use Case:** {}\n**AI Application:** {}\n**Cross-Functional Benefit:** {}",
                i + 1,
                case.title,
                case.objective,
                case.ai_application,
                case.benefit
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Hardcoded use cases substituted when generation fails
pub fn fallback_use_cases(industry: &str) -> UseCaseReport {
    UseCaseReport {
        industry: industry.to_string(),
        category: IndustryCategory::classify(industry),
        trend_queries: Vec::new(),
        trend_results: Vec::new(),
        formatted_use_cases: generic_use_case_text(),
        prioritization: Some("Basic prioritization based on implementation complexity".to_string()),
        genai_solutions: None,
        status: FALLBACK_STATUS.to_string(),
        errors: Vec::new(),
    }
}

/// One placeholder record per catalog for the fast preset
pub fn fast_resources(company: &str) -> CollectedResources {
    let mut collected = CollectedResources::empty("General", FAST_RESOURCES_STATUS);
    collected.search_terms_used = vec!["industry".into(), "AI".into(), "ML".into()];
    collected.kaggle.push(
        ResourceRecord::new(
            Platform::Kaggle,
            format!("{} Industry Dataset", company),
            "https://www.kaggle.com/datasets",
            "Industry-specific datasets for AI/ML applications",
        )
        .with_term("industry"),
    );
    collected.huggingface.push(
        ResourceRecord::new(
            Platform::HuggingFace,
            "Industry AI Models",
            "https://huggingface.co/models",
            "Pre-trained models for industry applications",
        )
        .with_term("industry"),
    );
    collected.github.push(
        ResourceRecord::new(
            Platform::GitHub,
            "AI Industry Solutions",
            "https://github.com",
            "Open source AI solutions for industry applications",
        )
        .with_term("industry"),
    );
    collected
}
