//! Format envelopes, the domain list and the agent roster as text.

use crate::agent::{AgentIdentity, AgentRole};
use crate::analysis::Trends;
use crate::context::Envelope;
use crate::table::format_cell;
use crate::types::{Record, Scalar};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::PathBuf;

/// One row of `domains` output.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DomainEntry {
    pub domain: String,
    pub path: PathBuf,
    pub exists: bool,
}

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn stat(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn cell_text(value: &Scalar) -> String {
    match value {
        Scalar::Null => "-".to_string(),
        other => format_cell(other),
    }
}

/// Human-readable rendering of an envelope.
pub fn format_envelope_text(envelope: &Envelope) -> String {
    let mut out = String::new();
    let scope = match (&envelope.domain, &envelope.intent) {
        (Some(domain), Some(intent)) => format!("{} / {}", domain, intent),
        (Some(domain), None) => domain.clone(),
        _ => String::new(),
    };

    if !envelope.success {
        let kind = envelope.kind.as_deref().unwrap_or("error");
        let error = envelope.error.as_deref().unwrap_or("unknown failure");
        out.push_str(&format!("{} [{}] {}\n", "Error".red().bold(), kind, error));
        if let Some(domains) = &envelope.available_domains {
            out.push_str(&format!("  Available domains: {}\n", domains.join(", ")));
        }
        if let Some(intents) = &envelope.available_intents {
            out.push_str(&format!("  Available intents: {}\n", intents.join(", ")));
        }
        return out;
    }

    if !scope.is_empty() {
        out.push_str(&format!("{}\n\n", format_section_heading(&scope)));
    }
    if let Some(query) = envelope.query.as_deref().filter(|q| !q.is_empty()) {
        out.push_str(&format!("  Query: {}\n\n", query));
    }
    if let Some(records) = &envelope.data {
        out.push_str(&format_records(records, envelope.columns.as_deref()));
        out.push_str(&format!("\n{} record(s)\n", records.len()));
    }
    if let Some(analysis) = &envelope.analysis {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec![
            "Column", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
        ]);
        for (column, s) in analysis {
            table.add_row(vec![
                column.clone(),
                s.count.to_string(),
                stat(s.mean),
                stat(s.std),
                stat(s.min),
                stat(s.p25),
                stat(s.p50),
                stat(s.p75),
                stat(s.max),
            ]);
        }
        out.push_str(&format!("{}\n", table));
        if let Some(total) = envelope.total_records {
            out.push_str(&format!("\nTotal records: {}\n", total));
        }
    }
    if let Some(trends) = &envelope.trends {
        out.push_str(&format_trends(trends));
    }
    if let Some(message) = &envelope.message {
        out.push_str(&format!("{}\n", message));
    }
    if let Some(updated) = envelope.updated_columns.as_ref().filter(|c| !c.is_empty()) {
        out.push_str(&format!("  Updated: {}\n", updated.join(", ")));
    }
    if let Some(ignored) = envelope.ignored_columns.as_ref().filter(|c| !c.is_empty()) {
        out.push_str(&format!("  Ignored (no such column): {}\n", ignored.join(", ")));
    }
    if let Some(prediction) = &envelope.prediction {
        out.push_str(&format!(
            "Prediction: {} (confidence {})\n",
            prediction,
            stat(envelope.confidence)
        ));
    }
    out
}

fn format_records(records: &[Record], columns: Option<&[String]>) -> String {
    let header: Vec<String> = match columns {
        Some(columns) => columns.to_vec(),
        None => records
            .first()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default(),
    };
    if records.is_empty() {
        return "No matching records.\n".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(header.clone());
    for record in records {
        table.add_row(
            header
                .iter()
                .map(|c| record.get(c).map(cell_text).unwrap_or_default())
                .collect::<Vec<_>>(),
        );
    }
    format!("{}\n", table)
}

fn format_trends(trends: &Trends) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["avg_output_rate".to_string(), stat(trends.avg_output_rate)]);
    table.add_row(vec!["avg_quality".to_string(), stat(trends.avg_quality)]);
    table.add_row(vec!["total_downtime".to_string(), stat(trends.total_downtime)]);
    table.add_row(vec!["window".to_string(), trends.window.to_string()]);
    format!("{}\n", table)
}

pub fn format_domains_text(entries: &[DomainEntry]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Domain", "Resource", "Present"]);
    for entry in entries {
        table.add_row(vec![
            entry.domain.clone(),
            entry.path.display().to_string(),
            if entry.exists { "yes" } else { "no" }.to_string(),
        ]);
    }
    format!("{}\n\n{}\n", format_section_heading("Domains"), table)
}

pub fn format_agents_text(agents: &[&AgentIdentity]) -> String {
    if agents.is_empty() {
        return "No agents registered.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Agent", "Role", "Domain", "Description"]);
    for agent in agents {
        let role = match agent.role {
            AgentRole::Reader => "Reader",
            AgentRole::Writer => "Writer",
        };
        table.add_row(vec![
            agent.agent_id.clone(),
            role.to_string(),
            agent
                .home_domain
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            agent.description.clone(),
        ]);
    }
    format!(
        "{}\n\n{}\n\nTotal: {} agent(s)",
        format_section_heading("Agents"),
        table,
        agents.len()
    )
}
