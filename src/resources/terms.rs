//! Search terms for the domain-wide collectors.

use crate::constants::resources::MAX_SEARCH_TERMS;

const BASE_TERMS: &[&str] = &[
    "machine learning",
    "artificial intelligence",
    "natural language processing",
    "computer vision",
    "predictive analytics",
    "recommendation system",
    "time series forecasting",
    "classification",
    "regression",
    "clustering",
];

const DOMAIN_KEYWORDS: &[&str] = &[
    "customer",
    "sales",
    "inventory",
    "supply chain",
    "operations",
    "fraud detection",
    "sentiment analysis",
    "chatbot",
    "automation",
    "optimization",
    "forecasting",
    "personalization",
    "recommendation",
];

/// Domain keywords found in the use-case text come first so the collectors'
/// first keyword reflects the generated content; generic AI/ML terms fill
/// the rest. Deduplicated, order preserved, capped.
pub fn derive_search_terms(use_case_text: &str) -> Vec<String> {
    let haystack = use_case_text.to_lowercase();
    let mut terms: Vec<String> = Vec::with_capacity(MAX_SEARCH_TERMS);
    let found = DOMAIN_KEYWORDS
        .iter()
        .filter(|kw| haystack.contains(*kw))
        .chain(BASE_TERMS.iter());
    for term in found {
        if terms.len() == MAX_SEARCH_TERMS {
            break;
        }
        if !terms.iter().any(|t| t == term) {
            terms.push(term.to_string());
        }
    }
    terms
}
