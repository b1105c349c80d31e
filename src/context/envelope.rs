//! Response envelope returned by every context call.

use crate::analysis::{ColumnSummary, Trends};
use crate::error::ContextError;
use crate::types::{Domain, Intent, Record};
use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Structured result of one call. Absent fields are omitted from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Record>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<IndexMap<String, ColumnSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trends: Option<Trends>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored_columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_intents: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_domains: Option<Vec<String>>,
    /// snake_case error category, set only on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// RFC 3339 UTC time the envelope was built
    pub timestamp: String,
}

impl Envelope {
    fn blank(success: bool) -> Self {
        Self {
            success,
            domain: None,
            intent: None,
            query: None,
            data: None,
            count: None,
            columns: None,
            analysis: None,
            total_records: None,
            trends: None,
            message: None,
            updated_columns: None,
            ignored_columns: None,
            prediction: None,
            confidence: None,
            available_intents: None,
            available_domains: None,
            kind: None,
            error: None,
            timestamp: now_rfc3339(),
        }
    }

    /// Successful envelope echoing the call's domain and intent.
    pub fn ok(domain: Domain, intent: Intent) -> Self {
        Self {
            domain: Some(domain.to_string()),
            intent: Some(intent.to_string()),
            ..Self::blank(true)
        }
    }

    /// Failed envelope for `err`, echoing whatever the caller sent.
    pub fn failure(domain: Option<&str>, intent: Option<&str>, err: &ContextError) -> Self {
        let mut envelope = Self {
            domain: domain.map(str::to_string),
            intent: intent.map(str::to_string),
            kind: Some(err.kind().to_string()),
            error: Some(err.to_string()),
            ..Self::blank(false)
        };
        match err {
            ContextError::UnknownDomain(_) => envelope.available_domains = Some(Domain::names()),
            ContextError::UnknownIntent(_) => envelope.available_intents = Some(Intent::names()),
            _ => {}
        }
        envelope
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({
                "success": false,
                "error": format!("failed to serialize envelope: {}", e),
                "timestamp": self.timestamp,
            })
        })
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
