//! Tooling & Integration Layer
//!
//! Command-line access to the domain context service and the text renderers
//! it uses.

pub mod cli;
pub mod format;

pub use cli::{load_config, Cli, CliContext, CommandOutput, Commands};
