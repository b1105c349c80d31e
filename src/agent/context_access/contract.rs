//! Context access contract.

use crate::context::{DomainContextService, Envelope};
use serde_json::Value;

/// Anything that can serve `call(domain, intent, data)`.
pub trait ContextAccess: Send + Sync {
    fn call(&self, domain: &str, intent: &str, data: &Value) -> Envelope;
}

impl ContextAccess for DomainContextService {
    fn call(&self, domain: &str, intent: &str, data: &Value) -> Envelope {
        DomainContextService::call(self, domain, intent, data)
    }
}
