//! Error types
//!
//! `ContextError` is the taxonomy reported inside response envelopes. It never
//! crosses the service boundary as an `Err`; `DomainContextService::call`
//! folds it into a failed envelope. `ApiError` covers everything around the
//! service: configuration, logging setup and the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while serving a domain context call.
#[derive(Debug, Error)]
pub enum ContextError {
    /// Domain is not one of the fixed factory domains
    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    /// Intent is not one of read, query, analyze, update, predict
    #[error("Unknown intent: {0}")]
    UnknownIntent(String),

    /// Query expression could not be parsed or evaluated
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    /// The durable resource could not be read or written
    #[error("Resource I/O failed for {}: {message}", path.display())]
    ResourceIo { path: PathBuf, message: String },

    /// Update addressed a row that does not exist
    #[error("Update matched no record: {0}")]
    NoOpUpdate(String),

    /// Analysis type not defined for this domain or resource
    #[error("Unsupported analysis: {0}")]
    UnsupportedAnalysis(String),

    /// Request data had the wrong shape
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Caller identity lacks the capability for the intent
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl ContextError {
    /// Stable snake_case name of the error category, echoed as `kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            ContextError::UnknownDomain(_) => "unknown_domain",
            ContextError::UnknownIntent(_) => "unknown_intent",
            ContextError::MalformedQuery(_) => "malformed_query",
            ContextError::ResourceIo { .. } => "resource_io",
            ContextError::NoOpUpdate(_) => "no_op_update",
            ContextError::UnsupportedAnalysis(_) => "unsupported_analysis",
            ContextError::InvalidRequest(_) => "invalid_request",
            ContextError::Unauthorized(_) => "unauthorized",
        }
    }

    pub(crate) fn resource_io(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ContextError::ResourceIo {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Errors outside the envelope boundary: configuration, logging, CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Context(#[from] ContextError),
}
