//! Query Expressions
//!
//! A deliberately small boolean language over a single record: column
//! comparisons (`==`, `!=`, `<`, `<=`, `>`, `>=`), list membership
//! (`in`, `not in`), and the connectives `and`/`&`, `or`/`|`, `not`/`~` with
//! parentheses. Columns are bare identifiers or `` `backtick quoted` ``.
//!
//! A query that names a column the resource lacks selects nothing.

mod eval;
pub mod lexer;
pub mod parser;

use crate::error::ContextError;
use crate::table::Table;
use std::fmt;

pub use parser::{CmpOp, Expr, Operand};

/// Parse or evaluation failure with the byte offset it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryError {
    pub offset: Option<usize>,
    pub message: String,
}

impl QueryError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset: Some(offset),
            message: message.into(),
        }
    }

    /// Error found while binding or evaluating, with no single source position.
    pub fn unplaced(message: impl Into<String>) -> Self {
        Self {
            offset: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{} (at offset {})", self.message, offset),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for QueryError {}

impl From<QueryError> for ContextError {
    fn from(err: QueryError) -> Self {
        ContextError::MalformedQuery(err.to_string())
    }
}

/// A parsed query expression. An empty source matches every record.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    source: String,
    expr: Option<Expr>,
}

impl Query {
    pub fn parse(source: &str) -> Result<Self, QueryError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Ok(Self {
                source: String::new(),
                expr: None,
            });
        }
        let tokens = lexer::tokenize(source)?;
        let expr = parser::Parser::new(tokens, source.len()).parse()?;
        Ok(Self {
            source: source.to_string(),
            expr: Some(expr),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match_all(&self) -> bool {
        self.expr.is_none()
    }

    pub fn expr(&self) -> Option<&Expr> {
        self.expr.as_ref()
    }

    /// Row positions of matching records in resource order, at most `limit`.
    pub fn select(&self, table: &Table, limit: usize) -> Result<Vec<usize>, QueryError> {
        let expr = match &self.expr {
            None => return Ok((0..table.len().min(limit)).collect()),
            Some(expr) => expr,
        };

        let bound = match eval::Bound::bind(expr, table)? {
            Some(bound) => bound,
            None => {
                tracing::debug!(query = %self.source, "query references absent column; no match");
                return Ok(Vec::new());
            }
        };

        let mut selected = Vec::new();
        for (idx, row) in table.rows().iter().enumerate() {
            if selected.len() >= limit {
                break;
            }
            if bound.matches(row)? {
                selected.push(idx);
            }
        }
        Ok(selected)
    }
}
