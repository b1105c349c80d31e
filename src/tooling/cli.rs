//! CLI Tooling
//!
//! Command-line interface over the domain context service. Every data command
//! builds the same JSON payload an agent would send and renders the envelope.

use crate::agent::{AgentContextAccess, AgentRegistry, ContextAccess};
use crate::config::{ConfigLoader, FactoryConfig};
use crate::context::{DomainContextService, Envelope};
use crate::error::ApiError;
use crate::tooling::format::{
    format_agents_text, format_domains_text, format_envelope_text, DomainEntry,
};
use crate::types::Domain;
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Factory context CLI - uniform access to smart-factory domain datasets
#[derive(Parser)]
#[command(name = "factory-context", version)]
#[command(about = "Read, query, analyze and update smart-factory domain datasets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (replaces global and workspace config files)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List domains and their resource files
    Domains {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Read records, optionally filtered by column equality
    Read {
        #[arg(long)]
        domain: String,
        /// Equality filter, repeatable
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,
        /// Output format (json or text)
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Select records with a boolean expression
    Query {
        #[arg(long)]
        domain: String,
        /// Expression such as `current_stock < reorder_point`; empty matches all
        #[arg(long, default_value = "")]
        expr: String,
        /// Maximum number of records returned
        #[arg(long)]
        limit: Option<u64>,
        /// Output format (json or text)
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Summary statistics or production trends
    Analyze {
        #[arg(long)]
        domain: String,
        /// Analysis type (summary or trends)
        #[arg(long = "type", default_value = "summary")]
        kind: String,
        /// Output format (json or text)
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Overwrite columns of one record by row id
    Update {
        #[arg(long)]
        domain: String,
        /// Zero-based row position
        #[arg(long, allow_negative_numbers = true)]
        id: i64,
        /// Column assignment, repeatable
        #[arg(long = "set", value_name = "KEY=VALUE", required = true)]
        set: Vec<String>,
        /// Output format (json or text)
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Issue a raw call and print the envelope as JSON
    Call {
        domain: String,
        intent: String,
        /// Request data as a JSON object
        #[arg(long, default_value = "{}")]
        data: String,
        /// Issue the call as this agent
        #[arg(long)]
        agent: Option<String>,
    },
    /// List the agent roster
    Agents {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Rendered command result; `success` is false when the envelope failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub rendered: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(rendered: String) -> Self {
        Self {
            rendered,
            success: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
}

fn parse_format(format: &str) -> Result<OutputFormat, ApiError> {
    match format {
        "json" => Ok(OutputFormat::Json),
        "text" => Ok(OutputFormat::Text),
        other => Err(ApiError::InvalidArgument(format!(
            "Invalid format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

/// Load configuration the way the CLI does: an explicit file replaces both
/// file layers; otherwise global and workspace files are merged. Values are
/// checked when the service is built from the result.
pub fn load_config(
    workspace_root: &Path,
    config_path: Option<&Path>,
) -> Result<FactoryConfig, ApiError> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load(workspace_root)?,
    };
    Ok(config)
}

/// Parse `key=value`; the value is JSON when it parses, else a plain string.
fn parse_assignment(raw: &str) -> Result<(String, Value), ApiError> {
    let (key, value) = raw.split_once('=').ok_or_else(|| {
        ApiError::InvalidArgument(format!("Expected KEY=VALUE, got '{}'", raw))
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ApiError::InvalidArgument(format!(
            "Missing column name in '{}'",
            raw
        )));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn assignments(raw: &[String]) -> Result<Map<String, Value>, ApiError> {
    raw.iter().map(|a| parse_assignment(a)).collect()
}

/// CLI context holding the loaded configuration and service
pub struct CliContext {
    service: Arc<DomainContextService>,
    agents: AgentRegistry,
    workspace_root: PathBuf,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = load_config(&workspace_root, config_path.as_deref())?;
        Self::from_config(workspace_root, &config)
    }

    /// Create a CLI context from already-loaded configuration
    pub fn from_config(workspace_root: PathBuf, config: &FactoryConfig) -> Result<Self, ApiError> {
        let service = DomainContextService::from_config(config, &workspace_root)?;
        Ok(Self {
            service: Arc::new(service),
            agents: AgentRegistry::factory_default(),
            workspace_root,
        })
    }

    pub fn service(&self) -> &DomainContextService {
        &self.service
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        match command {
            Commands::Domains { format } => {
                let format = parse_format(format)?;
                let entries: Vec<DomainEntry> = Domain::ALL
                    .iter()
                    .map(|domain| {
                        let path = self.service.resource_location(*domain);
                        DomainEntry {
                            domain: domain.to_string(),
                            exists: path.is_file(),
                            path,
                        }
                    })
                    .collect();
                let rendered = match format {
                    OutputFormat::Json => {
                        serde_json::to_string_pretty(&json!({ "domains": entries }))?
                    }
                    OutputFormat::Text => format_domains_text(&entries),
                };
                Ok(CommandOutput::ok(rendered))
            }
            Commands::Read {
                domain,
                filters,
                format,
            } => {
                let format = parse_format(format)?;
                let data = json!({ "filter": assignments(filters)? });
                self.run(domain, "read", &data, format)
            }
            Commands::Query {
                domain,
                expr,
                limit,
                format,
            } => {
                let format = parse_format(format)?;
                let mut data = json!({ "query": expr });
                if let Some(limit) = limit {
                    data["limit"] = json!(limit);
                }
                self.run(domain, "query", &data, format)
            }
            Commands::Analyze {
                domain,
                kind,
                format,
            } => {
                let format = parse_format(format)?;
                self.run(domain, "analyze", &json!({ "type": kind }), format)
            }
            Commands::Update {
                domain,
                id,
                set,
                format,
            } => {
                let format = parse_format(format)?;
                let data = json!({ "id": id, "updates": assignments(set)? });
                self.run(domain, "update", &data, format)
            }
            Commands::Call {
                domain,
                intent,
                data,
                agent,
            } => {
                let data: Value = serde_json::from_str(data)?;
                let envelope = match agent {
                    Some(agent_id) => match self.agents.get_or_error(agent_id) {
                        Ok(identity) => {
                            let inner: Arc<dyn ContextAccess> = self.service.clone();
                            AgentContextAccess::new(inner, identity.clone())
                                .call(domain, intent, &data)
                        }
                        Err(err) => Envelope::failure(Some(domain), Some(intent), &err),
                    },
                    None => self.service.call(domain, intent, &data),
                };
                render(&envelope, OutputFormat::Json)
            }
            Commands::Agents { format } => {
                let agents = self.agents.list_all();
                let rendered = match parse_format(format)? {
                    OutputFormat::Json => {
                        serde_json::to_string_pretty(&json!({
                            "agents": agents,
                            "total": agents.len(),
                        }))?
                    }
                    OutputFormat::Text => format_agents_text(&agents),
                };
                Ok(CommandOutput::ok(rendered))
            }
        }
    }

    fn run(
        &self,
        domain: &str,
        intent: &str,
        data: &Value,
        format: OutputFormat,
    ) -> Result<CommandOutput, ApiError> {
        let envelope = self.service.call(domain, intent, data);
        render(&envelope, format)
    }
}

fn render(envelope: &Envelope, format: OutputFormat) -> Result<CommandOutput, ApiError> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(envelope)?,
        OutputFormat::Text => format_envelope_text(envelope),
    };
    Ok(CommandOutput {
        rendered,
        success: envelope.success,
    })
}
