//! Lenient serde helpers for model-generated JSON.
//!
//! LLM output drifts: a list of objects arrives as a list of strings, a
//! single string shows up where an array was requested, numbers appear where
//! text was expected. These deserializers absorb that drift instead of
//! failing the whole document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Render any JSON value as text. Strings pass through, `null` becomes empty.
pub fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Array(items) => items
            .into_iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

/// Deserialize a text field that may arrive as any JSON value.
pub fn flexible_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_text(Value::deserialize(deserializer)?))
}

/// Deserialize a list of strings from an array, a single string, or null.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .into_iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect(),
        other => {
            let text = value_to_text(other);
            if text.is_empty() { Vec::new() } else { vec![text] }
        }
    })
}

/// Deserialize a nested record, treating `null` as the default value.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Item<T> {
    Text(String),
    Full(T),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Items<T> {
    Many(Vec<Item<T>>),
    One(Item<T>),
}

/// Deserialize a list of records where each entry may be an object or a bare
/// string, and the list itself may be a single entry or null.
pub fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + From<String>,
{
    let items: Option<Items<T>> = Option::deserialize(deserializer)?;
    let items = match items {
        None => Vec::new(),
        Some(Items::Many(items)) => items,
        Some(Items::One(item)) => vec![item],
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            Item::Text(text) => T::from(text),
            Item::Full(full) => full,
        })
        .collect())
}
