//! Typed request payloads decoded from the JSON `data` of a call.

use crate::analysis::AnalysisKind;
use crate::error::ContextError;
use crate::types::Scalar;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// `data` must be an object; `null` counts as an empty one.
fn object(data: &Value) -> Result<Map<String, Value>, ContextError> {
    match data {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map.clone()),
        other => Err(ContextError::InvalidRequest(format!(
            "request data must be an object, got {}",
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn scalar_map(field: &str, value: Option<&Value>) -> Result<IndexMap<String, Scalar>, ContextError> {
    match value {
        None | Some(Value::Null) => Ok(IndexMap::new()),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| {
                Scalar::from_json(value)
                    .map(|scalar| (key.clone(), scalar))
                    .map_err(|_| {
                        ContextError::InvalidRequest(format!(
                            "'{}.{}' must be a scalar, got {}",
                            field,
                            key,
                            json_type(value)
                        ))
                    })
            })
            .collect(),
        Some(other) => Err(ContextError::InvalidRequest(format!(
            "'{}' must be an object, got {}",
            field,
            json_type(other)
        ))),
    }
}

/// Equality filters for `read`, AND-combined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadParams {
    pub filter: Vec<(String, Scalar)>,
}

impl ReadParams {
    pub fn from_json(data: &Value) -> Result<Self, ContextError> {
        let data = object(data)?;
        let filter = scalar_map("filter", data.get("filter"))?
            .into_iter()
            .collect();
        Ok(Self { filter })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pub query: String,
    /// `None` means the configured default limit
    pub limit: Option<usize>,
}

impl QueryParams {
    pub fn from_json(data: &Value) -> Result<Self, ContextError> {
        let data = object(data)?;
        let query = match data.get("query") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(ContextError::InvalidRequest(format!(
                    "'query' must be a string, got {}",
                    json_type(other)
                )))
            }
        };
        let limit = match data.get("limit") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => match n.as_u64() {
                Some(limit) => Some(usize::try_from(limit).unwrap_or(usize::MAX)),
                None => {
                    return Err(ContextError::InvalidRequest(format!(
                        "'limit' must be a non-negative integer, got {}",
                        n
                    )))
                }
            },
            Some(other) => {
                return Err(ContextError::InvalidRequest(format!(
                    "'limit' must be a non-negative integer, got {}",
                    json_type(other)
                )))
            }
        };
        Ok(Self { query, limit })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeParams {
    pub kind: AnalysisKind,
}

impl AnalyzeParams {
    pub fn from_json(data: &Value) -> Result<Self, ContextError> {
        let data = object(data)?;
        let kind = match data.get("type") {
            None | Some(Value::Null) => AnalysisKind::Summary,
            Some(Value::String(s)) => s.parse()?,
            Some(other) => {
                return Err(ContextError::InvalidRequest(format!(
                    "'type' must be a string, got {}",
                    json_type(other)
                )))
            }
        };
        Ok(Self { kind })
    }
}

/// Positional row id and the column values to write.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateParams {
    pub id: i64,
    pub updates: IndexMap<String, Scalar>,
}

impl UpdateParams {
    pub fn from_json(data: &Value) -> Result<Self, ContextError> {
        let data = object(data)?;
        let id = match data.get("id") {
            Some(Value::Number(n)) => n.as_i64().ok_or_else(|| {
                ContextError::InvalidRequest(format!("'id' must be an integer, got {}", n))
            })?,
            None | Some(Value::Null) => {
                return Err(ContextError::InvalidRequest(
                    "'id' is required for update".to_string(),
                ))
            }
            Some(other) => {
                return Err(ContextError::InvalidRequest(format!(
                    "'id' must be an integer, got {}",
                    json_type(other)
                )))
            }
        };
        let updates = scalar_map("updates", data.get("updates"))?;
        Ok(Self { id, updates })
    }
}
