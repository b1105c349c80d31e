//! Factory Context: uniform access to smart-factory domain datasets
//!
//! Each factory domain (inventory, production, logistics, maintenance,
//! quality) is backed by one tabular resource. The [`DomainContextService`]
//! reads, queries, analyzes and updates those resources on behalf of agents
//! and answers every call with a structured [`Envelope`].

pub mod agent;
pub mod analysis;
pub mod concurrency;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod query;
pub mod store;
pub mod table;
pub mod tooling;
pub mod types;

pub use context::{DomainContextService, Envelope};
pub use error::{ApiError, ContextError};
pub use types::{Domain, Intent, Record, Scalar};
