//! The JSON-shaped input contract (§6): a parsed-but-untyped knowledge
//! base, deserialized directly via `serde` the way the teacher
//! (de)serializes its own PL/RQ ASTs.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Top-level maps use `IndexMap`, not `HashMap`, so that ingestion-time
/// computations that iterate all entities/concepts (e.g. `key_type`'s
/// last-writer-wins unification in `kb::build`) are deterministic in terms
/// of input order, matching Python's insertion-ordered `dict` in
/// `original_source/src/kopl/data.py`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawKnowledgeBase {
    pub entities: IndexMap<String, RawEntity>,
    pub concepts: IndexMap<String, RawConcept>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawConcept {
    pub name: String,
    #[serde(default, rename = "subclassOf")]
    pub subclass_of: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntity {
    pub name: String,
    #[serde(default, rename = "instanceOf")]
    pub instance_of: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<RawAttribute>,
    #[serde(default)]
    pub relations: Vec<RawRelation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAttribute {
    pub key: String,
    pub value: RawValue,
    #[serde(default)]
    pub qualifiers: HashMap<String, Vec<RawValue>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn flipped(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRelation {
    pub relation: String,
    pub direction: Direction,
    pub object: String,
    #[serde(default)]
    pub qualifiers: HashMap<String, Vec<RawValue>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawValue {
    String { value: String },
    Quantity { value: serde_json::Value, unit: String },
    Year { value: serde_json::Value },
    Date { value: serde_json::Value },
}

impl RawValue {
    pub fn type_tag(&self) -> &'static str {
        match self {
            RawValue::String { .. } => "string",
            RawValue::Quantity { .. } => "quantity",
            RawValue::Year { .. } => "year",
            RawValue::Date { .. } => "date",
        }
    }

    /// The payload rendered as a plain string, regardless of whether the
    /// JSON document spelled it as a string or a number.
    pub fn payload_as_str(&self) -> String {
        let raw = match self {
            RawValue::String { value } => return value.clone(),
            RawValue::Quantity { value, .. } | RawValue::Year { value } | RawValue::Date { value } => value,
        };
        match raw {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn unit(&self) -> Option<&str> {
        match self {
            RawValue::Quantity { unit, .. } => Some(unit.as_str()),
            _ => None,
        }
    }
}
