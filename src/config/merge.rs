//! Config composition: merge policy and the service that applies it.

pub mod policy;
pub mod service;
