//! Agent access to domain context.
//!
//! Contract for issuing context calls, and the identity-checking adapter agents
//! go through.

pub mod agent_access;
pub mod contract;

pub use agent_access::AgentContextAccess;
pub use contract::ContextAccess;
