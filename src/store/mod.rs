//! Resource Store
//!
//! Durable backing for domain resources. A store reads a domain's full
//! resource and overwrites it wholesale; it keeps no cache between calls.

pub mod csv_file;

use crate::error::ContextError;
use crate::table::Table;
use crate::types::Domain;
use std::path::PathBuf;

pub use csv_file::CsvResourceStore;

/// Resource store interface
pub trait ResourceStore: Send + Sync {
    /// Read the domain's full resource.
    fn load(&self, domain: Domain) -> Result<Table, ContextError>;

    /// Replace the domain's resource with `table`.
    fn save(&self, domain: Domain, table: &Table) -> Result<(), ContextError>;

    /// Where the domain's resource lives, for diagnostics.
    fn location(&self, domain: Domain) -> PathBuf;
}
