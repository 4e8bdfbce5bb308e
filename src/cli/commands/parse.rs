//! Parse Command
//!
//! Turns a saved block of generated use-case text into records.
//!
//! Usage:
//!   marketscope parse use_cases.md [--format json]

use std::path::Path;

use crate::cli::Output;
use crate::pipeline::{UseCase, parse_use_cases};
use crate::types::Result;

pub fn render(use_cases: &[UseCase], format: &str) -> Result<String> {
    if format == "json" {
        return Ok(serde_json::to_string_pretty(use_cases)?);
    }

    let mut lines = Vec::new();
    for (i, use_case) in use_cases.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, use_case.title));
        let description = use_case.description();
        if !description.is_empty() {
            lines.push(format!("   {}", description));
        }
    }
    Ok(lines.join("\n"))
}

pub fn run(file: &Path, format: &str) -> Result<()> {
    let text = std::fs::read_to_string(file)?;
    let use_cases = parse_use_cases(&text);

    if format != "json" {
        let output = Output::new();
        if use_cases.is_empty() {
            output.warning(&format!("No use cases found in {}", file.display()));
            return Ok(());
        }
        output.header(&format!("{} use cases", use_cases.len()));
    }
    println!("{}", render(&use_cases, format)?);
    Ok(())
}
