//! Context access on behalf of a named agent.

use super::contract::ContextAccess;
use crate::agent::AgentIdentity;
use crate::context::Envelope;
use crate::types::{Domain, Intent};
use serde_json::Value;
use std::sync::Arc;

/// Wraps a context service with an agent identity.
///
/// Intents the agent may not issue against a domain are answered with an
/// `unauthorized` envelope without reaching the service. Unknown domains and
/// intents pass through so the service reports them in its usual order.
pub struct AgentContextAccess {
    inner: Arc<dyn ContextAccess>,
    identity: AgentIdentity,
}

impl AgentContextAccess {
    pub fn new(inner: Arc<dyn ContextAccess>, identity: AgentIdentity) -> Self {
        Self { inner, identity }
    }

    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }
}

impl ContextAccess for AgentContextAccess {
    fn call(&self, domain: &str, intent: &str, data: &Value) -> Envelope {
        let agent_id = self.identity.agent_id.as_str();
        tracing::debug!(agent_id, domain, intent, "agent context call");

        if let (Ok(parsed_domain), Ok(parsed_intent)) =
            (domain.parse::<Domain>(), intent.parse::<Intent>())
        {
            if let Err(err) = self.identity.verify(parsed_domain, parsed_intent) {
                tracing::warn!(agent_id, domain, intent, "agent call rejected");
                return Envelope::failure(Some(domain), Some(intent), &err);
            }
        }

        let envelope = self.inner.call(domain, intent, data);
        if !envelope.success {
            tracing::debug!(agent_id, error = ?envelope.error, "agent call failed");
        }
        envelope
    }
}
