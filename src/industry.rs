//! Industry category lookup.
//!
//! A free-form industry label (as identified by the research stage) is mapped
//! onto a small closed set of categories. The category drives prompt template
//! selection, GenAI focus areas and the static fallback resource tables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndustryCategory {
    Manufacturing,
    Technology,
    Healthcare,
    Finance,
    Agriculture,
    Retail,
    Energy,
    Transportation,
    RealEstate,
    Education,
    Default,
}

/// Ordered keyword table. The first category with a matching keyword wins.
const KEYWORDS: &[(IndustryCategory, &[&str])] = &[
    (
        IndustryCategory::Manufacturing,
        &[
            "manufacturing",
            "steel",
            "automotive",
            "aerospace",
            "chemical",
            "pharmaceutical",
            "textile",
            "food processing",
            "machinery",
            "industrial",
        ],
    ),
    (
        IndustryCategory::Technology,
        &[
            "technology",
            "software",
            "it",
            "tech",
            "digital",
            "cyber",
            "data",
            "cloud",
            "saas",
            "fintech",
            "edtech",
            "healthtech",
        ],
    ),
    (
        IndustryCategory::Healthcare,
        &[
            "healthcare",
            "medical",
            "pharmaceutical",
            "biotech",
            "hospital",
            "clinic",
            "health",
            "medicine",
            "life sciences",
        ],
    ),
    (
        IndustryCategory::Finance,
        &[
            "finance",
            "banking",
            "insurance",
            "financial",
            "investment",
            "fintech",
            "credit",
            "lending",
        ],
    ),
    (
        IndustryCategory::Agriculture,
        &[
            "agriculture",
            "farming",
            "food",
            "agri",
            "crop",
            "livestock",
            "dairy",
            "poultry",
            "fisheries",
            "forestry",
        ],
    ),
    (
        IndustryCategory::Retail,
        &[
            "retail",
            "ecommerce",
            "e-commerce",
            "shopping",
            "fashion",
            "consumer",
            "marketplace",
            "commerce",
        ],
    ),
    (
        IndustryCategory::Energy,
        &[
            "energy",
            "oil",
            "gas",
            "renewable",
            "solar",
            "wind",
            "utilities",
            "power",
            "electricity",
            "nuclear",
        ],
    ),
    (
        IndustryCategory::Transportation,
        &[
            "transportation",
            "logistics",
            "shipping",
            "aviation",
            "railway",
            "trucking",
            "delivery",
            "supply chain",
        ],
    ),
    (
        IndustryCategory::RealEstate,
        &[
            "real estate",
            "construction",
            "property",
            "building",
            "infrastructure",
            "architecture",
            "engineering",
        ],
    ),
    (
        IndustryCategory::Education,
        &[
            "education",
            "training",
            "learning",
            "school",
            "university",
            "edtech",
            "academic",
        ],
    ),
];

/// Keywords at or below this length only match whole words ("it" must not
/// match "capital").
const SHORT_KEYWORD_LEN: usize = 4;

impl IndustryCategory {
    pub const ALL: [IndustryCategory; 11] = [
        Self::Manufacturing,
        Self::Technology,
        Self::Healthcare,
        Self::Finance,
        Self::Agriculture,
        Self::Retail,
        Self::Energy,
        Self::Transportation,
        Self::RealEstate,
        Self::Education,
        Self::Default,
    ];

    /// Classify a free-form industry label. Pure; never fails.
    pub fn classify(industry: &str) -> Self {
        let normalized = industry.to_lowercase();
        let words: Vec<&str> = normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        KEYWORDS
            .iter()
            .find(|(_, keywords)| {
                keywords
                    .iter()
                    .any(|kw| keyword_matches(&normalized, &words, kw))
            })
            .map(|(category, _)| *category)
            .unwrap_or(Self::Default)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manufacturing => "manufacturing",
            Self::Technology => "technology",
            Self::Healthcare => "healthcare",
            Self::Finance => "finance",
            Self::Agriculture => "agriculture",
            Self::Retail => "retail",
            Self::Energy => "energy",
            Self::Transportation => "transportation",
            Self::RealEstate => "real_estate",
            Self::Education => "education",
            Self::Default => "default",
        }
    }

    /// Audience phrase used in consultant prompts
    pub fn audience(&self) -> &'static str {
        match self {
            Self::Manufacturing => "manufacturing and industrial companies",
            Self::Technology => "technology and IT companies",
            Self::Healthcare => "healthcare and medical companies",
            Self::Finance => "financial services companies",
            Self::Agriculture => "agriculture and food companies",
            Self::Retail => "retail and e-commerce companies",
            Self::Energy => "energy and utilities companies",
            Self::Transportation => "transportation and logistics companies",
            Self::RealEstate => "real estate and construction companies",
            Self::Education => "education and training companies",
            Self::Default => "business use case generation",
        }
    }

    /// Ten focus areas the use-case prompt asks the model to cover
    pub fn focus_areas(&self) -> &'static [&'static str] {
        match self {
            Self::Manufacturing => &[
                "Predictive maintenance and equipment optimization",
                "Quality control and defect detection",
                "Supply chain optimization and demand forecasting",
                "Process optimization and energy management",
                "Customer service and engagement",
                "Knowledge management and documentation",
                "Product design and development",
                "Contract and document processing",
                "Strategic planning and decision support",
                "Safety and compliance monitoring",
            ],
            Self::Technology => &[
                "Software development automation and code generation",
                "Customer experience and personalization",
                "Data analytics and business intelligence",
                "Cybersecurity and threat detection",
                "Cloud infrastructure optimization",
                "Product recommendation systems",
                "Natural language processing applications",
                "DevOps and deployment automation",
                "Sales and marketing automation",
                "Customer support and chatbots",
            ],
            Self::Healthcare => &[
                "Medical diagnosis and imaging analysis",
                "Drug discovery and development",
                "Patient monitoring and care management",
                "Electronic health records optimization",
                "Clinical decision support systems",
                "Telemedicine and remote care",
                "Medical research and data analysis",
                "Healthcare operations optimization",
                "Patient engagement and communication",
                "Regulatory compliance and reporting",
            ],
            Self::Finance => &[
                "Fraud detection and prevention",
                "Credit risk assessment and scoring",
                "Algorithmic trading and portfolio management",
                "Customer service and chatbots",
                "Regulatory compliance and reporting",
                "Anti-money laundering (AML) systems",
                "Insurance underwriting and claims processing",
                "Personalized financial advice",
                "Market analysis and forecasting",
                "Operational risk management",
            ],
            Self::Agriculture => &[
                "Precision agriculture and crop monitoring",
                "Livestock health and management",
                "Weather prediction and climate adaptation",
                "Soil analysis and nutrient optimization",
                "Pest and disease detection",
                "Supply chain and logistics optimization",
                "Food safety and quality control",
                "Yield prediction and optimization",
                "Water management and irrigation",
                "Market analysis and pricing optimization",
            ],
            Self::Retail => &[
                "Personalized product recommendations",
                "Inventory management and demand forecasting",
                "Customer service and chatbots",
                "Price optimization and dynamic pricing",
                "Fraud detection and prevention",
                "Visual search and product discovery",
                "Supply chain optimization",
                "Customer analytics and segmentation",
                "Marketing automation and personalization",
                "Store operations and layout optimization",
            ],
            Self::Energy => &[
                "Energy demand forecasting and grid optimization",
                "Predictive maintenance for power infrastructure",
                "Renewable energy integration and management",
                "Smart grid and distribution optimization",
                "Energy trading and market analysis",
                "Customer energy management and billing",
                "Environmental monitoring and compliance",
                "Asset performance optimization",
                "Cybersecurity for critical infrastructure",
                "Carbon footprint tracking and reduction",
            ],
            Self::Transportation => &[
                "Route optimization and fleet management",
                "Predictive maintenance for vehicles",
                "Demand forecasting and capacity planning",
                "Real-time tracking and visibility",
                "Driver behavior monitoring and safety",
                "Fuel efficiency and emissions reduction",
                "Customer service and delivery optimization",
                "Supply chain visibility and coordination",
                "Risk management and insurance",
                "Autonomous vehicle integration",
            ],
            Self::RealEstate => &[
                "Property valuation and pricing optimization",
                "Construction project management and scheduling",
                "Building energy efficiency and smart systems",
                "Property maintenance and facility management",
                "Market analysis and investment decisions",
                "Customer relationship management",
                "Risk assessment and insurance",
                "Regulatory compliance and permitting",
                "Virtual property tours and visualization",
                "Tenant screening and management",
            ],
            Self::Education => &[
                "Personalized learning and adaptive education",
                "Student performance analytics and intervention",
                "Automated grading and assessment",
                "Virtual tutoring and learning assistants",
                "Curriculum optimization and content generation",
                "Student engagement and retention",
                "Administrative process automation",
                "Learning management system optimization",
                "Career guidance and pathway planning",
                "Research and academic analytics",
            ],
            Self::Default => &[
                "Process automation and optimization",
                "Customer experience enhancement",
                "Data analytics and insights",
                "Predictive analytics and forecasting",
                "Operational efficiency improvements",
                "Cost reduction and optimization",
                "Revenue generation opportunities",
                "Risk management and compliance",
                "Employee productivity and engagement",
                "Innovation and competitive advantage",
            ],
        }
    }

    /// GenAI application areas. Categories without a dedicated list share
    /// the general one.
    pub fn genai_focus(&self) -> &'static [&'static str] {
        match self {
            Self::Manufacturing => &[
                "Technical documentation and SOP generation",
                "Equipment maintenance manuals and troubleshooting guides",
                "Quality control reports and compliance documentation",
                "Training materials for safety and operations",
                "Supplier communication and contract processing",
                "Customer technical support chatbots",
                "Process optimization recommendations",
                "Safety incident analysis and reporting",
            ],
            Self::Technology => &[
                "Code generation and documentation automation",
                "Technical support and developer assistance",
                "API documentation and integration guides",
                "Customer onboarding and training materials",
                "Bug report analysis and resolution suggestions",
                "Product requirement generation and refinement",
                "Technical blog and content creation",
                "Code review and quality assurance assistance",
            ],
            Self::Healthcare => &[
                "Medical documentation and clinical notes generation",
                "Patient education materials and treatment guides",
                "Research paper analysis and literature reviews",
                "Regulatory compliance documentation",
                "Medical training and continuing education content",
                "Patient communication and appointment scheduling",
                "Clinical decision support and treatment recommendations",
                "Medical coding and billing assistance",
            ],
            Self::Finance => &[
                "Financial report generation and analysis",
                "Regulatory compliance documentation",
                "Customer financial education and guidance",
                "Risk assessment and credit analysis reports",
                "Investment research and market analysis",
                "Customer service and financial advisory chatbots",
                "Fraud detection and investigation reports",
                "Training materials for financial products",
            ],
            Self::Agriculture => &[
                "Farming guides and crop management documentation",
                "Weather analysis and agricultural advisory content",
                "Livestock health monitoring and care instructions",
                "Supply chain and logistics documentation",
                "Food safety and quality control reports",
                "Market analysis and pricing recommendations",
                "Sustainable farming practice guides",
                "Agricultural training and education materials",
            ],
            _ => &[
                "Document search and knowledge management systems",
                "Automated report generation and documentation",
                "AI-powered chatbots (internal and customer-facing)",
                "Content creation and personalization",
                "Code generation and technical documentation",
                "Email and communication automation",
                "Training and onboarding assistants",
                "Contract and compliance document processing",
            ],
        }
    }

    /// Extra consideration the GenAI prompt asks for, if any
    pub fn genai_consideration(&self) -> Option<&'static str> {
        match self {
            Self::Manufacturing => Some("Integration with existing manufacturing systems"),
            Self::Technology => Some("Integration with existing development workflows"),
            Self::Healthcare => Some("HIPAA compliance considerations"),
            Self::Finance => Some("Regulatory compliance considerations"),
            Self::Agriculture => Some("Sustainability considerations"),
            _ => None,
        }
    }
}

impl std::fmt::Display for IndustryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn keyword_matches(normalized: &str, words: &[&str], keyword: &str) -> bool {
    if keyword.len() <= SHORT_KEYWORD_LEN && !keyword.contains(' ') {
        words.contains(&keyword)
    } else {
        normalized.contains(keyword)
    }
}
