//! Shape check for stored section lists.
//!
//! Stored configurations are untrusted: they may be missing, of the wrong
//! type, or (in records written by an old bug) a serialized error object.
//! Validation runs once, at load time, and yields either a usable list or
//! the reason it was rejected. The caller owns the fallback policy.

use crate::sections::{SectionEntry, SectionKind};
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigShape {
    Valid(Vec<SectionEntry>),
    Invalid(InvalidReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("no configuration stored")]
    Missing,
    #[error("stored value is a serialized error object")]
    ErrorObject,
    #[error("expected a list, found {0}")]
    NotAList(&'static str),
    #[error("element {index}: {problem}")]
    BadElement { index: usize, problem: &'static str },
    #[error("duplicate section id '{0}'")]
    DuplicateId(String),
}

/// Validates a stored value. Every element needs a string `id` and a boolean
/// `enabled`; the remaining fields are filled in leniently:
/// `name` from the registry (or the id), `order` from the element position,
/// `settings`/`content` as empty maps. The result is sorted by `order`,
/// ties keeping their stored position.
pub fn validate_sections(stored: Option<&Value>) -> ConfigShape {
    let items = match stored {
        None | Some(Value::Null) => return ConfigShape::Invalid(InvalidReason::Missing),
        Some(Value::Array(items)) => items,
        Some(Value::Object(map)) if looks_like_error(map) => {
            return ConfigShape::Invalid(InvalidReason::ErrorObject)
        }
        Some(other) => return ConfigShape::Invalid(InvalidReason::NotAList(type_name(other))),
    };

    let mut seen = HashSet::new();
    let mut sections = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let Value::Object(fields) = item else {
            return ConfigShape::Invalid(InvalidReason::BadElement {
                index,
                problem: "not an object",
            });
        };
        let Some(id) = fields.get("id").and_then(Value::as_str) else {
            return ConfigShape::Invalid(InvalidReason::BadElement {
                index,
                problem: "missing string id",
            });
        };
        let Some(enabled) = fields.get("enabled").and_then(Value::as_bool) else {
            return ConfigShape::Invalid(InvalidReason::BadElement {
                index,
                problem: "missing boolean enabled",
            });
        };
        if !seen.insert(id.to_string()) {
            return ConfigShape::Invalid(InvalidReason::DuplicateId(id.to_string()));
        }

        sections.push(SectionEntry {
            id: id.to_string(),
            name: fields
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| default_name(id)),
            enabled,
            order: fields
                .get("order")
                .and_then(as_order)
                .unwrap_or(index as u32),
            settings: object_field(fields, "settings"),
            content: object_field(fields, "content"),
        });
    }

    sections.sort_by_key(|s| s.order);
    ConfigShape::Valid(sections)
}

/// An object carrying the usual error fields instead of section entries.
fn looks_like_error(map: &Map<String, Value>) -> bool {
    ["message", "stack", "error"]
        .iter()
        .any(|field| map.contains_key(*field))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn as_order(value: &Value) -> Option<u32> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        .and_then(|n| u32::try_from(n).ok())
}

fn default_name(id: &str) -> String {
    SectionKind::from_id(id)
        .map(|kind| kind.display_name().to_string())
        .unwrap_or_else(|| id.to_string())
}

fn object_field(fields: &Map<String, Value>, name: &str) -> Map<String, Value> {
    match fields.get(name) {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}
