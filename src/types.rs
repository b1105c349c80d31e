//! Core types for the factory domain context service.

use crate::error::ContextError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Named factory dataset. Each domain is backed by exactly one tabular resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Inventory,
    Production,
    Logistics,
    Maintenance,
    Quality,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Inventory,
        Domain::Production,
        Domain::Logistics,
        Domain::Maintenance,
        Domain::Quality,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Inventory => "inventory",
            Domain::Production => "production",
            Domain::Logistics => "logistics",
            Domain::Maintenance => "maintenance",
            Domain::Quality => "quality",
        }
    }

    /// File name used when no override is configured, e.g. `inventory_data.csv`.
    pub fn default_file_name(&self) -> String {
        format!("{}_data.csv", self.as_str())
    }

    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|d| d.as_str().to_string()).collect()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Domain::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == trimmed)
            .ok_or_else(|| ContextError::UnknownDomain(s.to_string()))
    }
}

/// Requested operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Read,
    Query,
    Analyze,
    Update,
    /// Placeholder forecast; always answers with a fixed value.
    Predict,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::Read,
        Intent::Query,
        Intent::Analyze,
        Intent::Update,
        Intent::Predict,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Read => "read",
            Intent::Query => "query",
            Intent::Analyze => "analyze",
            Intent::Update => "update",
            Intent::Predict => "predict",
        }
    }

    /// Whether the intent mutates the domain's resource.
    pub fn is_write(&self) -> bool {
        matches!(self, Intent::Update)
    }

    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|i| i.as_str().to_string()).collect()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Intent::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == trimmed)
            .ok_or_else(|| ContextError::UnknownIntent(s.to_string()))
    }
}

/// A single cell value.
///
/// Serializes untagged, so records render as plain JSON objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "boolean",
            Scalar::Int(_) | Scalar::Float(_) => "number",
            Scalar::Text(_) => "text",
        }
    }

    /// Convert a JSON value from a request. Arrays and objects are rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ContextError> {
        use serde_json::Value;
        match value {
            Value::Null => Ok(Scalar::Null),
            Value::Bool(b) => Ok(Scalar::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Scalar::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Scalar::Float(f))
                } else {
                    Err(ContextError::InvalidRequest(format!(
                        "number {} is out of range",
                        n
                    )))
                }
            }
            Value::String(s) => Ok(Scalar::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => Err(ContextError::InvalidRequest(format!(
                "expected a scalar value, got {}",
                value
            ))),
        }
    }

    /// Typed equality used by filters and `==`.
    ///
    /// Numbers compare by value across integer and float; `null` equals nothing.
    pub fn matches(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Null, _) | (_, Scalar::Null) => false,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Ordering between comparable values.
    ///
    /// `Ok(None)` when either side is null (the comparison is false);
    /// `Err` when the types cannot be ordered against each other.
    pub fn try_order(&self, other: &Scalar) -> Result<Option<Ordering>, String> {
        match (self, other) {
            (Scalar::Null, _) | (_, Scalar::Null) => Ok(None),
            (Scalar::Int(a), Scalar::Int(b)) => Ok(Some(a.cmp(b))),
            (Scalar::Text(a), Scalar::Text(b)) => Ok(Some(a.cmp(b))),
            (Scalar::Bool(a), Scalar::Bool(b)) => Ok(Some(a.cmp(b))),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => Ok(a.partial_cmp(&b)),
                _ => Err(format!(
                    "cannot order {} against {}",
                    self.type_name(),
                    other.type_name()
                )),
            },
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// One row of a resource, keyed by column name in resource column order.
pub type Record = IndexMap<String, Scalar>;
