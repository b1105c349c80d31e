//! Statistical Analysis
//!
//! Descriptive statistics over every numeric column, and the production
//! trend window (mean output rate, mean quality score, total downtime over the
//! most recent records by timestamp).

use crate::error::ContextError;
use crate::table::Table;
use crate::types::Scalar;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Number of most recent production records considered by trend analysis.
pub const DEFAULT_TREND_WINDOW: usize = 50;

/// Analysis selected by the `type` field of an analyze request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Summary,
    Trends,
}

impl std::str::FromStr for AnalysisKind {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "summary" => Ok(AnalysisKind::Summary),
            "trends" => Ok(AnalysisKind::Trends),
            other => Err(ContextError::UnsupportedAnalysis(format!(
                "unknown analysis type '{}' (expected 'summary' or 'trends')",
                other
            ))),
        }
    }
}

/// Descriptive statistics for one numeric column.
///
/// Fields are `None` when undefined for the number of non-null values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub p25: Option<f64>,
    #[serde(rename = "50%")]
    pub p50: Option<f64>,
    #[serde(rename = "75%")]
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    pub fn from_values(mut values: Vec<f64>) -> Self {
        values.retain(|v| v.is_finite());
        values.sort_by(f64::total_cmp);

        let count = values.len();
        let mean = mean(&values);
        let std = match (mean, count) {
            (Some(m), n) if n > 1 => {
                let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
                Some((ss / (n - 1) as f64).sqrt())
            }
            _ => None,
        };

        Self {
            count,
            mean,
            std,
            min: values.first().copied(),
            p25: quantile(&values, 0.25),
            p50: quantile(&values, 0.5),
            p75: quantile(&values, 0.75),
            max: values.last().copied(),
        }
    }
}

/// Summary statistics for every numeric column, in column order.
pub fn summarize(table: &Table) -> IndexMap<String, ColumnSummary> {
    let all_rows: Vec<usize> = (0..table.len()).collect();
    table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.kind.is_numeric())
        .map(|(idx, c)| {
            (
                c.name.clone(),
                ColumnSummary::from_values(table.numeric_values(idx, &all_rows)),
            )
        })
        .collect()
}

/// Production trend figures over the most recent window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    pub avg_output_rate: Option<f64>,
    pub avg_quality: Option<f64>,
    pub total_downtime: Option<f64>,
    /// Number of records the figures were computed over.
    pub window: usize,
}

/// Trend figures over the `window` most recent records by `timestamp`.
///
/// Requires a `timestamp` column. Records are stably sorted ascending with
/// null timestamps last, matching the order the resource would be read in
/// after a sort.
pub fn production_trends(table: &Table, window: usize) -> Result<Trends, ContextError> {
    let ts_col = table.column_index("timestamp").ok_or_else(|| {
        ContextError::UnsupportedAnalysis(
            "trends require a 'timestamp' column".to_string(),
        )
    })?;

    let mut keyed = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let stamp = match table.cell(row, ts_col) {
            None | Some(Scalar::Null) => None,
            Some(Scalar::Text(raw)) => Some(parse_timestamp(raw).ok_or_else(|| {
                ContextError::UnsupportedAnalysis(format!(
                    "row {}: cannot parse timestamp '{}'",
                    row, raw
                ))
            })?),
            Some(other) => {
                return Err(ContextError::UnsupportedAnalysis(format!(
                    "row {}: timestamp is a {}, not a date-time",
                    row,
                    other.type_name()
                )))
            }
        };
        keyed.push((stamp, row));
    }

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let skip = keyed.len().saturating_sub(window);
    let recent: Vec<usize> = keyed[skip..].iter().map(|(_, row)| *row).collect();

    Ok(Trends {
        avg_output_rate: numeric_column(table, "output_rate", &recent)?
            .and_then(|values| mean(&values)),
        avg_quality: numeric_column(table, "quality_score", &recent)?
            .and_then(|values| mean(&values)),
        total_downtime: numeric_column(table, "downtime_minutes", &recent)?
            .map(|values| values.iter().sum()),
        window: recent.len(),
    })
}

/// `Ok(None)` when the column is absent; error when it holds non-numeric data.
fn numeric_column(
    table: &Table,
    name: &str,
    rows: &[usize],
) -> Result<Option<Vec<f64>>, ContextError> {
    let idx = match table.column_index(name) {
        Some(idx) => idx,
        None => return Ok(None),
    };
    let kind = table.column_type(idx);
    if !kind.map(|k| k.is_numeric()).unwrap_or(false) && !table.is_empty() {
        let all_null = (0..table.len()).all(|r| matches!(table.cell(r, idx), Some(Scalar::Null)));
        if !all_null {
            return Err(ContextError::UnsupportedAnalysis(format!(
                "column '{}' is not numeric",
                name
            )));
        }
    }
    Ok(Some(table.numeric_values(idx, rows)))
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Linear interpolation between closest ranks over sorted values.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    const FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
