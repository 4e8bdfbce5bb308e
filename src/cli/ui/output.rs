use console::style;

use crate::pipeline::WorkflowStatus;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    pub fn field(&self, label: &str, value: impl std::fmt::Display) {
        println!("  {:<14} {}", style(label).dim(), value);
    }

    pub fn status(&self, status: WorkflowStatus) {
        let label = status.to_string();
        let styled = match status {
            WorkflowStatus::Completed => style(label).green().bold(),
            WorkflowStatus::Partial => style(label).yellow().bold(),
            WorkflowStatus::Failed => style(label).red().bold(),
            WorkflowStatus::InProgress => style(label).blue(),
        };
        self.field("Status", styled);
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
