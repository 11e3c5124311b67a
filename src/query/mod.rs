// src/query/mod.rs

//! Bazel query results
//!
//! The converter consumes the JSON encodings Bazel produces for query output:
//!
//! - `bazel cquery --output=jsonproto`: `{"results": [{"target": {...}}]}`
//! - `bazel query --output=jsonproto`: `{"target": [{...}]}`
//! - `bazel query --output=streamed_jsonproto`: one target object per line
//!
//! Only rule targets produce records. Source files, generated files, package
//! groups and environment groups are accepted and dropped.

mod record;

pub use record::{AttrKind, AttrSpec, Attribute, AttributeValue, RuleRecord};

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// Target categories of a query result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum TargetType {
    Rule,
    SourceFile,
    GeneratedFile,
    PackageGroup,
    EnvironmentGroup,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct RawTarget {
    #[serde(rename = "type")]
    target_type: Option<TargetType>,
    rule: Option<RawRule>,
}

#[derive(Debug, Deserialize)]
struct ConfiguredTarget {
    target: RawTarget,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRule {
    name: String,
    rule_class: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    attribute: Vec<RawAttribute>,
}

/// Proto3 JSON omits default values, so `type` decides the variant
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAttribute {
    name: String,
    #[serde(rename = "type", default)]
    attr_type: Option<String>,
    boolean_value: Option<bool>,
    string_value: Option<String>,
    string_list_value: Option<Vec<String>>,
    #[serde(default)]
    explicitly_specified: bool,
}

impl RawAttribute {
    fn into_attribute(self) -> Option<(String, Attribute)> {
        let value = match self.attr_type.as_deref() {
            Some("BOOLEAN") => AttributeValue::Bool(self.boolean_value.unwrap_or(false)),
            Some("STRING" | "LABEL" | "OUTPUT" | "NODEP_LABEL") => {
                AttributeValue::String(self.string_value.unwrap_or_default())
            }
            Some(t) if t.ends_with("_LIST") => {
                AttributeValue::StringList(self.string_list_value.unwrap_or_default())
            }
            Some(_) => return None,
            // Untyped attributes (hand-written fixtures): infer from the value present
            None => match (self.boolean_value, self.string_value, self.string_list_value) {
                (Some(b), _, _) => AttributeValue::Bool(b),
                (_, Some(s), _) => AttributeValue::String(s),
                (_, _, Some(list)) => AttributeValue::StringList(list),
                _ => return None,
            },
        };
        Some((self.name, Attribute::new(value, self.explicitly_specified)))
    }
}

impl RawTarget {
    fn into_record(self) -> Option<RuleRecord> {
        match self.target_type {
            Some(TargetType::Rule) | None => {}
            Some(_) => return None,
        }
        let rule = self.rule?;
        let mut record = RuleRecord::new(rule.name, rule.rule_class, rule.location);
        record.attributes = rule
            .attribute
            .into_iter()
            .filter_map(RawAttribute::into_attribute)
            .collect();
        Some(record)
    }
}

/// Decode a query result into rule records, in input order
pub fn decode(input: &str) -> Result<Vec<RuleRecord>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let targets = match serde_json::from_str::<Value>(input) {
        Ok(document) => targets_from_document(document)?,
        // More than one top-level value: a streamed result
        Err(_) => serde_json::Deserializer::from_str(input)
            .into_iter::<RawTarget>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
    };

    Ok(targets.into_iter().filter_map(RawTarget::into_record).collect())
}

fn targets_from_document(document: Value) -> Result<Vec<RawTarget>> {
    match document {
        Value::Object(ref map) if map.contains_key("results") => {
            let results: Vec<ConfiguredTarget> =
                serde_json::from_value(map["results"].clone())?;
            Ok(results.into_iter().map(|r| r.target).collect())
        }
        Value::Object(ref map) if map.get("target").is_some_and(Value::is_array) => {
            Ok(serde_json::from_value(map["target"].clone())?)
        }
        Value::Object(_) => Ok(vec![serde_json::from_value(document)?]),
        Value::Array(_) => Ok(serde_json::from_value(document)?),
        other => Err(Error::Decode(format!(
            "expected a query result object, found {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
