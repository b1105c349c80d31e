//! Tabular Resources
//!
//! In-memory form of a domain resource: an ordered column list and rows of
//! scalar cells. Column types are inferred once at load time so numbers stay
//! numeric and identifiers stay strings across a load/save cycle.

use crate::types::{Record, Scalar};
use serde::{Deserialize, Serialize};

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::Text => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
}

/// A domain resource loaded into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Scalar>>,
}

impl Table {
    /// Build a table from header names and raw text cells, inferring column types.
    ///
    /// Rows shorter than the header are padded with nulls.
    pub fn from_raw(headers: Vec<String>, raw_rows: Vec<Vec<String>>) -> Self {
        let kinds: Vec<ColumnType> = (0..headers.len())
            .map(|idx| infer_column_type(raw_rows.iter().filter_map(|r| r.get(idx))))
            .collect();

        let rows = raw_rows
            .into_iter()
            .map(|raw| {
                kinds
                    .iter()
                    .enumerate()
                    .map(|(idx, kind)| match raw.get(idx) {
                        Some(cell) => parse_cell(cell, *kind),
                        None => Scalar::Null,
                    })
                    .collect()
            })
            .collect();

        let columns = headers
            .into_iter()
            .zip(kinds)
            .map(|(name, kind)| Column { name, kind })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Position of a column, or `None` when the resource has no such column.
    ///
    /// Callers treat `None` as "matches nothing", never as a failure.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_type(&self, idx: usize) -> Option<ColumnType> {
        self.columns.get(idx).map(|c| c.kind)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Scalar>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Scalar> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Materialize a row as a record keyed by column name.
    pub fn record(&self, row: usize) -> Option<Record> {
        let cells = self.rows.get(row)?;
        Some(
            self.columns
                .iter()
                .zip(cells)
                .map(|(c, v)| (c.name.clone(), v.clone()))
                .collect(),
        )
    }

    pub fn records(&self, rows: &[usize]) -> Vec<Record> {
        rows.iter().filter_map(|&r| self.record(r)).collect()
    }

    /// Rows whose cells equal every `(column, value)` pair.
    ///
    /// A filter naming a column the resource does not have yields no rows.
    pub fn filter_eq(&self, filters: &[(String, Scalar)]) -> Vec<usize> {
        let mut resolved = Vec::with_capacity(filters.len());
        for (name, value) in filters {
            match self.column_index(name) {
                Some(idx) => resolved.push((idx, value)),
                None => return Vec::new(),
            }
        }

        (0..self.rows.len())
            .filter(|&row| {
                resolved
                    .iter()
                    .all(|(idx, value)| self.rows[row][*idx].matches(value))
            })
            .collect()
    }

    /// The value `value` becomes once written to `(row, col)`, saved and reloaded.
    ///
    /// Numbers convert between integer and float columns when no precision is
    /// lost, and blank text becomes null. Anything that would re-type the column on reload is refused with
    /// the reason; a column with no other values takes whatever type
    /// `value` has.
    pub fn coerce(&self, row: usize, col: usize, value: &Scalar) -> Result<Scalar, String> {
        let kind = self
            .column_type(col)
            .ok_or_else(|| format!("no column at position {}", col))?;
        let value = match (kind, value) {
            (_, Scalar::Float(f)) if !f.is_finite() => {
                return Err(format!("{} cannot be stored", f));
            }
            (ColumnType::Integer, Scalar::Float(f)) if f.fract() == 0.0 && f.abs() < 9.0e15 => {
                Scalar::Int(*f as i64)
            }
            (ColumnType::Float, Scalar::Int(i)) => Scalar::Float(*i as f64),
            (_, other) => other.clone(),
        };

        let rendered = format_cell(&value);
        let mut has_other = false;
        let cells: Vec<String> = self
            .rows
            .iter()
            .enumerate()
            .map(|(r, cells)| {
                if r == row {
                    return rendered.clone();
                }
                let cell = cells.get(col).unwrap_or(&Scalar::Null);
                has_other |= !cell.is_null();
                format_cell(cell)
            })
            .collect();

        let reread = infer_column_type(cells.iter());
        if has_other && reread != kind {
            return Err(format!(
                "expected a {} value, got {} {}",
                kind.as_str(),
                value.type_name(),
                if rendered.is_empty() { "\"\"" } else { rendered.as_str() }
            ));
        }
        Ok(parse_cell(&rendered, reread))
    }

    /// Overwrite one cell. Returns false when the row or column is out of range.
    pub fn set_cell(&mut self, row: usize, col: usize, value: Scalar) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Non-null numeric values of a column in row order.
    pub fn numeric_values(&self, col: usize, rows: &[usize]) -> Vec<f64> {
        rows.iter()
            .filter_map(|&r| self.rows.get(r).and_then(|cells| cells.get(col)))
            .filter_map(Scalar::as_f64)
            .collect()
    }
}

fn infer_column_type<'a>(cells: impl Iterator<Item = &'a String>) -> ColumnType {
    let mut seen = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;

    for cell in cells {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        seen = true;
        if all_int && cell.parse::<i64>().is_err() {
            all_int = false;
        }
        if all_float && parse_number(cell).is_none() {
            all_float = false;
        }
        if all_bool && parse_bool(cell).is_none() {
            all_bool = false;
        }
        if !all_int && !all_float && !all_bool {
            break;
        }
    }

    match (seen, all_int, all_float, all_bool) {
        (false, ..) => ColumnType::Text,
        (true, true, _, _) => ColumnType::Integer,
        (true, false, true, _) => ColumnType::Float,
        (true, false, false, true) => ColumnType::Boolean,
        _ => ColumnType::Text,
    }
}

fn parse_cell(cell: &str, kind: ColumnType) -> Scalar {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Scalar::Null;
    }
    match kind {
        ColumnType::Integer => trimmed
            .parse::<i64>()
            .map(Scalar::Int)
            .unwrap_or_else(|_| Scalar::Text(cell.to_string())),
        ColumnType::Float => parse_number(trimmed)
            .map(Scalar::Float)
            .unwrap_or_else(|| Scalar::Text(cell.to_string())),
        ColumnType::Boolean => parse_bool(trimmed)
            .map(Scalar::Bool)
            .unwrap_or_else(|| Scalar::Text(cell.to_string())),
        ColumnType::Text => Scalar::Text(cell.to_string()),
    }
}

/// Numeric cells must contain a digit; `inf` or `NaN` text stays text.
fn parse_number(cell: &str) -> Option<f64> {
    if !cell.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    cell.parse::<f64>().ok()
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Render a cell for delimited text so its column type survives a reload.
pub fn format_cell(value: &Scalar) -> String {
    match value {
        Scalar::Null => String::new(),
        Scalar::Bool(true) => "True".to_string(),
        Scalar::Bool(false) => "False".to_string(),
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) if !f.is_finite() => String::new(),
        Scalar::Float(f) => {
            let rendered = f.to_string();
            if rendered.contains(|c: char| matches!(c, '.' | 'e' | 'E')) {
                rendered
            } else {
                format!("{}.0", rendered)
            }
        }
        Scalar::Text(s) => s.clone(),
    }
}
