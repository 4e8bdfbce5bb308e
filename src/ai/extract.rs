//! Structured extraction from model text.
//!
//! Decode-or-preserve: model output that was asked to be JSON is decoded when
//! possible, and otherwise kept verbatim. Extraction never fails.
//!
//! Attempts, in order:
//! 1. a fenced block tagged `json`
//! 2. the first fenced block of any tag
//! 3. the whole text
//!
//! Each candidate is decoded as-is first, then after light repair (trailing
//! commas, unbalanced brackets, prose around the object).

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Outcome of decode-or-preserve
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    Decoded(T),
    /// Decode failed; the exact model text
    Raw(String),
}

impl<T> Extracted<T> {
    pub fn is_decoded(&self) -> bool {
        matches!(self, Extracted::Decoded(_))
    }
}

/// Decode `content` into `T`, or preserve it verbatim.
pub fn decode_or_preserve<T: DeserializeOwned>(content: &str) -> Extracted<T> {
    for candidate in candidates(content) {
        if let Some(value) = parse_value(candidate)
            && let Ok(decoded) = serde_json::from_value::<T>(value)
        {
            return Extracted::Decoded(decoded);
        }
    }
    warn!(
        chars = content.len(),
        "Structured decode failed, preserving raw model text"
    );
    Extracted::Raw(content.to_string())
}

/// Ordered decode candidates for `content`
pub fn candidates(content: &str) -> Vec<&str> {
    let mut out = Vec::with_capacity(3);
    if let Some(block) = fenced_block(content, Some("json")) {
        out.push(block);
    }
    if let Some(block) = fenced_block(content, None)
        && !out.contains(&block)
    {
        out.push(block);
    }
    out.push(content);
    out
}

/// Body of the first ``` fence, optionally requiring a language tag.
/// An unterminated fence runs to the end of the text.
pub fn fenced_block<'a>(content: &'a str, tag: Option<&str>) -> Option<&'a str> {
    let opener = match tag {
        Some(tag) => format!("```{}", tag),
        None => "```".to_string(),
    };
    let start = content.find(&opener)? + opener.len();
    let rest = &content[start..];
    // Skip the remainder of the opening line (language tag or nothing)
    let body_start = match tag {
        Some(_) => 0,
        None => rest.find('\n').map(|i| i + 1).unwrap_or(rest.len()),
    };
    let body = &rest[body_start..];
    let end = body.find("```").unwrap_or(body.len());
    Some(body[..end].trim())
}

fn parse_value(candidate: &str) -> Option<Value> {
    let cleaned = candidate.trim().trim_start_matches('\u{feff}').trim();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        return Some(value);
    }

    let repaired = fix_trailing_commas(&balance_brackets(cleaned));
    if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
        debug!("JSON decoded after repair");
        return Some(value);
    }

    let embedded = extract_embedded_object(cleaned)?;
    serde_json::from_str::<Value>(&fix_trailing_commas(embedded)).ok()
}

/// Drop commas that directly precede `]` or `}`
fn fix_trailing_commas(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len());
    let mut in_string = false;
    let mut escape = false;

    for (i, &ch) in chars.iter().enumerate() {
        if escape {
            escape = false;
        } else if ch == '\\' && in_string {
            escape = true;
        } else if ch == '"' {
            in_string = !in_string;
        } else if ch == ',' && !in_string {
            let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            if matches!(next, Some(']') | Some('}')) {
                continue;
            }
        }
        result.push(ch);
    }
    result
}

/// Close an unterminated string and any unclosed brackets, innermost first
fn balance_brackets(s: &str) -> String {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escape = false;

    for ch in s.chars() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            '{' if !in_string => stack.push('}'),
            '[' if !in_string => stack.push(']'),
            '}' | ']' if !in_string => {
                stack.pop();
            }
            _ => {}
        }
    }

    let mut result = s.to_string();
    if in_string {
        result.push('"');
    }
    while let Some(closer) = stack.pop() {
        result.push(closer);
    }
    result
}

/// The first balanced `{...}` in text that has prose around it
fn extract_embedded_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (i, ch) in s[start..].char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&s[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
