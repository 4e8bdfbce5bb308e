//! Prompt Builder
//!
//! Standardized prompt construction for the research and generation stages.
//! Sections render in insertion order so prompts stay deterministic.

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Role definition with expertise area
    Role { expertise: String, task: String },
    /// Numbered list under a header
    Numbered { header: String, items: Vec<String> },
    /// Bulleted list under a header
    Bullets { header: String, items: Vec<String> },
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
    /// Fenced block with language tag
    Code { language: String, content: String },
    /// Hard constraints the output must respect
    Constraints(Vec<String>),
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role definition section
    pub fn role(mut self, expertise: &str, task: &str) -> Self {
        self.sections.push(PromptSection::Role {
            expertise: expertise.to_string(),
            task: task.to_string(),
        });
        self
    }

    pub fn numbered<S: AsRef<str>>(mut self, header: &str, items: &[S]) -> Self {
        self.sections.push(PromptSection::Numbered {
            header: header.to_string(),
            items: items.iter().map(|s| s.as_ref().to_string()).collect(),
        });
        self
    }

    pub fn bullets<S: AsRef<str>>(mut self, header: &str, items: &[S]) -> Self {
        self.sections.push(PromptSection::Bullets {
            header: header.to_string(),
            items: items.iter().map(|s| s.as_ref().to_string()).collect(),
        });
        self
    }

    /// Add text section
    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: None,
            content: content.to_string(),
        });
        self
    }

    /// Add text section with header
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    /// Add code block
    pub fn code(mut self, language: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Code {
            language: language.to_string(),
            content: content.to_string(),
        });
        self
    }

    pub fn constraints<S: AsRef<str>>(mut self, rules: &[S]) -> Self {
        self.sections.push(PromptSection::Constraints(
            rules.iter().map(|s| s.as_ref().to_string()).collect(),
        ));
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role { expertise, task } => {
                    prompt.push_str(&format!(
                        "You are an expert {} specializing in {}.\n\n",
                        expertise, task
                    ));
                }
                PromptSection::Numbered { header, items } => {
                    prompt.push_str(&format!("{}:\n", header));
                    for (i, item) in items.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, item));
                    }
                    prompt.push('\n');
                }
                PromptSection::Bullets { header, items } => {
                    prompt.push_str(&format!("{}:\n", header));
                    for item in items {
                        prompt.push_str(&format!("- {}\n", item));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("{}:\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Code { language, content } => {
                    prompt.push_str(&format!("```{}\n", language));
                    prompt.push_str(&content);
                    prompt.push_str("\n```\n\n");
                }
                PromptSection::Constraints(rules) => {
                    prompt.push_str("CONSTRAINTS:\n");
                    for rule in rules {
                        prompt.push_str(&format!("- {}\n", rule));
                    }
                    prompt.push('\n');
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_prompt() {
        let prompt = PromptBuilder::new()
            .role("business analyst", "industry research")
            .numbered("FOCUS AREAS", &["Business units", "Competitors"])
            .build();

        assert!(prompt.starts_with("You are an expert business analyst specializing in industry research."));
        assert!(prompt.contains("FOCUS AREAS:\n1. Business units\n2. Competitors"));
    }

    #[test]
    fn test_sections_keep_order() {
        let prompt = PromptBuilder::new()
            .section("COMPANY INFORMATION", "alpha")
            .section("INDUSTRY INFORMATION", "beta")
            .build();

        let company = prompt.find("COMPANY INFORMATION").unwrap();
        let industry = prompt.find("INDUSTRY INFORMATION").unwrap();
        assert!(company < industry);
    }

    #[test]
    fn test_code_and_constraints() {
        let prompt = PromptBuilder::new()
            .code("json", "{}")
            .constraints(&["Do NOT include numeric percentages"])
            .build();

        assert!(prompt.contains("```json\n{}\n```"));
        assert!(prompt.ends_with("- Do NOT include numeric percentages"));
    }
}
