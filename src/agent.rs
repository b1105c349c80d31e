//! Agent Read/Write Model
//!
//! Named factory agents and the boundary between reading and writing domain
//! context. Writer agents may update resources; reader agents may only read,
//! query and analyze.

pub mod context_access;
mod registry;

pub use context_access::{AgentContextAccess, ContextAccess};
pub use registry::{AgentIdentity, AgentRegistry, AgentRole, Capability};
