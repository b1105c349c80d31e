//! Agent registry and identity types.

use crate::error::ContextError;
use crate::types::{Domain, Intent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Agent role defining what operations an agent can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// Reader agents can read, query and analyze domain context
    Reader,
    /// Writer agents can also update domain resources
    Writer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Read,
    Write,
}

/// Agent identity with role and capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentIdentity {
    pub agent_id: String,
    pub role: AgentRole,
    pub capabilities: Vec<Capability>,
    pub description: String,
    /// Domain the agent specializes in and may update; the supervisor has none
    pub home_domain: Option<Domain>,
}

impl AgentIdentity {
    /// Create a new agent identity; capabilities follow from the role.
    pub fn new(agent_id: impl Into<String>, role: AgentRole) -> Self {
        let capabilities = match role {
            AgentRole::Reader => vec![Capability::Read],
            AgentRole::Writer => vec![Capability::Read, Capability::Write],
        };

        Self {
            agent_id: agent_id.into(),
            role,
            capabilities,
            description: String::new(),
            home_domain: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_home_domain(mut self, domain: Domain) -> Self {
        self.home_domain = Some(domain);
        self
    }

    pub fn can_read(&self) -> bool {
        self.capabilities.contains(&Capability::Read)
    }

    pub fn can_write(&self) -> bool {
        self.capabilities.contains(&Capability::Write)
    }

    /// Verify that the agent may issue `intent` against `domain`.
    ///
    /// Writers with a home domain may only write there.
    pub fn verify(&self, domain: Domain, intent: Intent) -> Result<(), ContextError> {
        let allowed = if intent.is_write() {
            self.can_write()
        } else {
            self.can_read()
        };
        if !allowed {
            return Err(ContextError::Unauthorized(format!(
                "Agent {} (role: {:?}) cannot {}",
                self.agent_id, self.role, intent
            )));
        }
        match self.home_domain {
            Some(home) if intent.is_write() && home != domain => {
                Err(ContextError::Unauthorized(format!(
                    "Agent {} may only {} {}, not {}",
                    self.agent_id, intent, home, domain
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Registry of known agent identities, ordered by id.
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: BTreeMap<String, AgentIdentity>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The factory roster: one writer per domain plus the read-only supervisor.
    pub fn factory_default() -> Self {
        let mut registry = Self::new();
        let writers = [
            (
                "inventory_agent",
                Domain::Inventory,
                "Stock levels, reorder management, material availability",
            ),
            (
                "production_agent",
                Domain::Production,
                "Production planning, scheduling, machine optimization",
            ),
            (
                "logistics_agent",
                Domain::Logistics,
                "Shipping, delivery, order tracking",
            ),
            (
                "maintenance_agent",
                Domain::Maintenance,
                "Equipment health, predictive maintenance, repairs",
            ),
            (
                "quality_control_agent",
                Domain::Quality,
                "Quality monitoring, defect tracking, compliance",
            ),
        ];
        for (agent_id, domain, description) in writers {
            registry.register(
                AgentIdentity::new(agent_id, AgentRole::Writer)
                    .with_description(description)
                    .with_home_domain(domain),
            );
        }
        registry.register(
            AgentIdentity::new("supervisory_agent", AgentRole::Reader)
                .with_description("Coordinator for cross-domain factory requests"),
        );
        registry
    }

    pub fn register(&mut self, identity: AgentIdentity) {
        self.agents.insert(identity.agent_id.clone(), identity);
    }

    pub fn get(&self, agent_id: &str) -> Option<&AgentIdentity> {
        self.agents.get(agent_id)
    }

    /// Get an agent identity by ID or return an error
    pub fn get_or_error(&self, agent_id: &str) -> Result<&AgentIdentity, ContextError> {
        self.get(agent_id)
            .ok_or_else(|| ContextError::Unauthorized(format!("Agent not found: {}", agent_id)))
    }

    pub fn list_all(&self) -> Vec<&AgentIdentity> {
        self.agents.values().collect()
    }
}
