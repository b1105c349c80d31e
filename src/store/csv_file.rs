//! CSV-backed resource store: one delimited file with a header row per domain.

use super::ResourceStore;
use crate::error::ContextError;
use crate::table::{format_cell, Table};
use crate::types::Domain;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub struct CsvResourceStore {
    paths: HashMap<Domain, PathBuf>,
}

impl CsvResourceStore {
    /// Store with the default `<domain>_data.csv` layout under `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let paths = Domain::ALL
            .iter()
            .map(|d| (*d, data_dir.join(d.default_file_name())))
            .collect();
        Self { paths }
    }

    /// Store with explicit per-domain paths; domains left out use the default layout.
    pub fn with_paths(data_dir: impl AsRef<Path>, overrides: HashMap<Domain, PathBuf>) -> Self {
        let mut store = Self::new(data_dir);
        store.paths.extend(overrides);
        store
    }

    fn path(&self, domain: Domain) -> PathBuf {
        self.paths
            .get(&domain)
            .cloned()
            .unwrap_or_else(|| PathBuf::from(domain.default_file_name()))
    }
}

impl ResourceStore for CsvResourceStore {
    fn load(&self, domain: Domain) -> Result<Table, ContextError> {
        let path = self.path(domain);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .map_err(|e| ContextError::resource_io(&path, e))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ContextError::resource_io(&path, e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| ContextError::resource_io(&path, e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        tracing::trace!(domain = %domain, rows = rows.len(), path = %path.display(), "loaded resource");
        Ok(Table::from_raw(headers, rows))
    }

    fn save(&self, domain: Domain, table: &Table) -> Result<(), ContextError> {
        let path = self.path(domain);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        // Write beside the target, then rename over it.
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ContextError::resource_io(&path, e))?;
        {
            let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
            writer
                .write_record(table.columns().iter().map(|c| c.name.as_str()))
                .map_err(|e| ContextError::resource_io(&path, e))?;
            for row in table.rows() {
                writer
                    .write_record(row.iter().map(format_cell))
                    .map_err(|e| ContextError::resource_io(&path, e))?;
            }
            writer
                .flush()
                .map_err(|e| ContextError::resource_io(&path, e))?;
        }
        tmp.as_file_mut()
            .flush()
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| ContextError::resource_io(&path, e))?;
        tmp.persist(&path)
            .map_err(|e| ContextError::resource_io(&path, e.error))?;

        tracing::trace!(domain = %domain, rows = table.len(), path = %path.display(), "persisted resource");
        Ok(())
    }

    fn location(&self, domain: Domain) -> PathBuf {
        self.path(domain)
    }
}
