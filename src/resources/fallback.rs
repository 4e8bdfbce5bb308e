//! Static curated records used when a catalog is unreachable or
//! uncredentialed. Keyed by industry category; unknown domains get nothing.

use super::{Platform, ResourceRecord};
use crate::industry::IndustryCategory;

type Entry = (&'static str, &'static str, &'static str);

fn kaggle_table(category: IndustryCategory) -> &'static [Entry] {
    use IndustryCategory as C;
    match category {
        C::Healthcare => &[
            (
                "Medical Cost Personal Datasets",
                "https://www.kaggle.com/datasets/mirichoi0218/insurance",
                "Healthcare insurance cost prediction dataset",
            ),
            (
                "Stroke Prediction Dataset",
                "https://www.kaggle.com/datasets/fedesoriano/stroke-prediction-dataset",
                "Clinical features for predicting stroke events",
            ),
        ],
        C::Finance => &[(
            "Credit Card Fraud Detection",
            "https://www.kaggle.com/datasets/mlg-ulb/creditcardfraud",
            "Dataset for credit card fraud detection",
        )],
        C::Retail => &[
            (
                "Online Retail Dataset",
                "https://www.kaggle.com/datasets/vijayuv/onlineretail",
                "Online retail transaction data",
            ),
            (
                "E-Commerce Data",
                "https://www.kaggle.com/datasets/carrie1/ecommerce-data",
                "Actual transactions from a UK retailer",
            ),
        ],
        C::Manufacturing => &[(
            "Machine Predictive Maintenance Classification",
            "https://www.kaggle.com/datasets/shivamb/machine-predictive-maintenance-classification",
            "Synthetic sensor data for predictive maintenance",
        )],
        C::Technology => &[(
            "Telco Customer Churn",
            "https://www.kaggle.com/datasets/blastchar/telco-customer-churn",
            "Customer churn behaviour for a telecom provider",
        )],
        C::Energy => &[(
            "Hourly Energy Consumption",
            "https://www.kaggle.com/datasets/robikscube/hourly-energy-consumption",
            "Hourly power consumption data from PJM",
        )],
        C::Agriculture => &[(
            "Crop Recommendation Dataset",
            "https://www.kaggle.com/datasets/atharvaingle/crop-recommendation-dataset",
            "Soil and weather features for crop recommendation",
        )],
        C::Transportation => &[(
            "DataCo Smart Supply Chain",
            "https://www.kaggle.com/datasets/shashwatwork/dataco-smart-supply-chain-for-big-data-analysis",
            "Supply chain orders, shipping and delivery data",
        )],
        C::Education => &[(
            "Students Performance in Exams",
            "https://www.kaggle.com/datasets/spscientist/students-performance-in-exams",
            "Marks secured by students in various subjects",
        )],
        C::RealEstate => &[(
            "California Housing Prices",
            "https://www.kaggle.com/datasets/camnugent/california-housing-prices",
            "Median house values for California districts",
        )],
        C::Default => &[],
    }
}

fn huggingface_table(category: IndustryCategory) -> &'static [Entry] {
    use IndustryCategory as C;
    const BERT: Entry = (
        "bert-base-uncased",
        "https://huggingface.co/bert-base-uncased",
        "BERT model for text classification and NLP tasks",
    );
    match category {
        C::Healthcare => &[
            (
                "emilyalsentzer/Bio_ClinicalBERT",
                "https://huggingface.co/emilyalsentzer/Bio_ClinicalBERT",
                "BERT model pretrained on clinical notes",
            ),
            BERT,
        ],
        C::Finance => &[
            (
                "ProsusAI/finbert",
                "https://huggingface.co/ProsusAI/finbert",
                "Financial sentiment analysis model",
            ),
            (
                "takala/financial_phrasebank",
                "https://huggingface.co/datasets/takala/financial_phrasebank",
                "Sentences from financial news labelled by sentiment",
            ),
        ],
        C::Retail => &[
            (
                "amazon_polarity",
                "https://huggingface.co/datasets/amazon_polarity",
                "Amazon product reviews labelled by polarity",
            ),
            BERT,
        ],
        C::Manufacturing => &[(
            "microsoft/resnet-50",
            "https://huggingface.co/microsoft/resnet-50",
            "Image classification backbone for visual inspection",
        )],
        C::Default => &[],
        _ => &[BERT],
    }
}

fn github_table(category: IndustryCategory) -> &'static [Entry] {
    use IndustryCategory as C;
    const AWESOME_ML: Entry = (
        "awesome-machine-learning",
        "https://github.com/josephmisiti/awesome-machine-learning",
        "A curated list of awesome Machine Learning frameworks, libraries and software",
    );
    match category {
        C::Healthcare => &[
            (
                "awesome-healthcare",
                "https://github.com/kakoni/awesome-healthcare",
                "Curated list of open source healthcare software and resources",
            ),
            AWESOME_ML,
        ],
        C::Finance => &[(
            "financial-machine-learning",
            "https://github.com/firmai/financial-machine-learning",
            "Practical machine learning tools for finance",
        )],
        C::Retail => &[(
            "recommenders",
            "https://github.com/microsoft/recommenders",
            "Best practices on recommendation systems",
        )],
        C::Manufacturing => &[(
            "anomalib",
            "https://github.com/openvinotoolkit/anomalib",
            "Anomaly detection library for visual inspection",
        )],
        C::Energy => &[(
            "pvlib-python",
            "https://github.com/pvlib/pvlib-python",
            "Simulating the performance of photovoltaic energy systems",
        )],
        C::Agriculture => &[(
            "awesome-agriculture",
            "https://github.com/brycejohnston/awesome-agriculture",
            "Open source technology for agriculture and farming",
        )],
        C::Transportation => &[(
            "or-tools",
            "https://github.com/google/or-tools",
            "Operations research tools for routing and scheduling",
        )],
        C::Education => &[(
            "ML-For-Beginners",
            "https://github.com/microsoft/ML-For-Beginners",
            "Classic machine learning curriculum",
        )],
        C::RealEstate => &[(
            "handson-ml2",
            "https://github.com/ageron/handson-ml2",
            "Notebooks including the California housing walkthrough",
        )],
        C::Technology => &[AWESOME_ML],
        C::Default => &[],
    }
}

/// Curated records for a platform and domain, tagged with the search term.
pub fn fallback_records(platform: Platform, domain: &str, term: &str) -> Vec<ResourceRecord> {
    let category = IndustryCategory::classify(domain);
    let table = match platform {
        Platform::Kaggle => kaggle_table(category),
        Platform::HuggingFace => huggingface_table(category),
        Platform::GitHub => github_table(category),
    };
    table
        .iter()
        .map(|(title, url, description)| {
            ResourceRecord::new(platform, *title, *url, *description).with_term(term)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_domain_has_records_everywhere() {
        for platform in Platform::ALL {
            let records = fallback_records(platform, "Healthcare", "diagnosis");
            assert!(!records.is_empty(), "{platform}");
            assert!(records.iter().all(|r| r.platform == platform));
            assert!(records.iter().all(|r| r.search_term == "diagnosis"));
            assert!(
                records
                    .iter()
                    .all(|r| Platform::from_url(&r.url) == Some(platform))
            );
        }
    }

    #[test]
    fn test_unknown_domain_is_empty() {
        for platform in Platform::ALL {
            assert!(fallback_records(platform, "Mining", "x").is_empty());
        }
    }

    #[test]
    fn test_every_category_has_kaggle_entry() {
        for category in IndustryCategory::ALL {
            let empty = kaggle_table(category).is_empty();
            assert_eq!(empty, category == IndustryCategory::Default, "{category}");
        }
    }
}
