//! Domain Context Service
//!
//! Uniform accessor over the factory datasets. Every call names a domain, an
//! intent and a JSON payload, and always yields an [`Envelope`]; faults are
//! reported inside the envelope rather than as `Err`.

pub mod envelope;
pub mod request;
pub mod service;

pub use envelope::Envelope;
pub use request::{AnalyzeParams, QueryParams, ReadParams, UpdateParams};
pub use service::{DomainContextService, ServiceSettings, PREDICTION_PLACEHOLDER};
