//! The service behind `call(domain, intent, data)`.

use super::envelope::Envelope;
use super::request::{AnalyzeParams, QueryParams, ReadParams, UpdateParams};
use crate::analysis::{self, AnalysisKind, DEFAULT_TREND_WINDOW};
use crate::concurrency::DomainLockManager;
use crate::config::FactoryConfig;
use crate::error::{ApiError, ContextError};
use crate::query::Query;
use crate::store::{CsvResourceStore, ResourceStore};
use crate::types::{Domain, Intent, Scalar};
use indexmap::IndexMap;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Fixed answer of the `predict` intent.
pub const PREDICTION_PLACEHOLDER: &str =
    "LSTM prediction placeholder - integrate your trained model here";

const PREDICTION_CONFIDENCE: f64 = 0.85;

/// Tunables applied when a request leaves them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    pub default_limit: usize,
    pub trend_window: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            default_limit: 100,
            trend_window: DEFAULT_TREND_WINDOW,
        }
    }
}

/// Uniform read/query/analyze/update access to the domain resources.
///
/// Every call reloads the resource from the store. Calls on one domain are
/// serialized against updates by a per-domain lock; distinct domains never
/// block each other.
pub struct DomainContextService {
    store: Arc<dyn ResourceStore>,
    locks: DomainLockManager,
    settings: ServiceSettings,
}

impl DomainContextService {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self::with_settings(store, ServiceSettings::default())
    }

    pub fn with_settings(store: Arc<dyn ResourceStore>, settings: ServiceSettings) -> Self {
        Self {
            store,
            locks: DomainLockManager::new(),
            settings,
        }
    }

    /// Build a CSV-backed service from loaded configuration.
    pub fn from_config(config: &FactoryConfig, workspace_root: &Path) -> Result<Self, ApiError> {
        config.validate()?;
        let (data_dir, files) = config.storage.resolve_paths(workspace_root)?;
        tracing::debug!(data_dir = %data_dir.display(), "opening csv resource store");
        let store = CsvResourceStore::with_paths(data_dir, files);
        Ok(Self::with_settings(
            Arc::new(store),
            ServiceSettings {
                default_limit: config.query.default_limit,
                trend_window: config.analysis.trend_window,
            },
        ))
    }

    pub fn settings(&self) -> ServiceSettings {
        self.settings
    }

    pub fn resource_location(&self, domain: Domain) -> PathBuf {
        self.store.location(domain)
    }

    /// Validate a domain name.
    pub fn resolve(&self, domain: &str) -> Result<Domain, ContextError> {
        domain.parse()
    }

    /// Serve one call. Never fails: errors become a failed envelope.
    pub fn call(&self, domain: &str, intent: &str, data: &Value) -> Envelope {
        tracing::debug!(domain, intent, "context call");
        match self.dispatch(domain, intent, data) {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::warn!(domain, intent, kind = err.kind(), error = %err, "context call failed");
                Envelope::failure(Some(domain), Some(intent), &err)
            }
        }
    }

    fn dispatch(&self, domain: &str, intent: &str, data: &Value) -> Result<Envelope, ContextError> {
        let domain = self.resolve(domain)?;
        let intent: Intent = intent.parse()?;
        match intent {
            Intent::Read => {
                let params = ReadParams::from_json(data)?;
                self.read(domain, &params.filter)
            }
            Intent::Query => {
                let params = QueryParams::from_json(data)?;
                self.query(domain, &params.query, params.limit)
            }
            Intent::Analyze => {
                let params = AnalyzeParams::from_json(data)?;
                self.analyze(domain, params.kind)
            }
            Intent::Update => {
                let params = UpdateParams::from_json(data)?;
                self.update(domain, params.id, &params.updates)
            }
            Intent::Predict => Ok(self.predict(domain)),
        }
    }

    /// All records matching every equality filter, with the full column list.
    pub fn read(&self, domain: Domain, filter: &[(String, Scalar)]) -> Result<Envelope, ContextError> {
        let lock = self.locks.get_lock(&domain);
        let _guard = lock.read();
        let table = self.store.load(domain)?;

        let rows = table.filter_eq(filter);
        let data = table.records(&rows);
        Ok(Envelope {
            count: Some(data.len()),
            data: Some(data),
            columns: Some(table.column_names()),
            ..Envelope::ok(domain, Intent::Read)
        })
    }

    /// First `limit` records satisfying `query_expr`, in resource order.
    pub fn query(
        &self,
        domain: Domain,
        query_expr: &str,
        limit: Option<usize>,
    ) -> Result<Envelope, ContextError> {
        let query = Query::parse(query_expr)?;
        let limit = limit.unwrap_or(self.settings.default_limit);

        let lock = self.locks.get_lock(&domain);
        let _guard = lock.read();
        let table = self.store.load(domain)?;

        let rows = query.select(&table, limit)?;
        let data = table.records(&rows);
        Ok(Envelope {
            query: Some(query_expr.to_string()),
            count: Some(data.len()),
            data: Some(data),
            columns: Some(table.column_names()),
            ..Envelope::ok(domain, Intent::Query)
        })
    }

    pub fn analyze(&self, domain: Domain, kind: AnalysisKind) -> Result<Envelope, ContextError> {
        if kind == AnalysisKind::Trends && domain != Domain::Production {
            return Err(ContextError::UnsupportedAnalysis(format!(
                "trends are only available for the production domain, not {}",
                domain
            )));
        }

        let lock = self.locks.get_lock(&domain);
        let _guard = lock.read();
        let table = self.store.load(domain)?;

        match kind {
            AnalysisKind::Summary => Ok(Envelope {
                analysis: Some(analysis::summarize(&table)),
                total_records: Some(table.len()),
                ..Envelope::ok(domain, Intent::Analyze)
            }),
            AnalysisKind::Trends => {
                let trends = analysis::production_trends(&table, self.settings.trend_window)?;
                Ok(Envelope {
                    trends: Some(trends),
                    ..Envelope::ok(domain, Intent::Analyze)
                })
            }
        }
    }

    /// Overwrite cells of row `id` and persist the whole resource.
    ///
    /// Keys that do not name a column are reported back and otherwise ignored.
    /// A value that would change its column's type on reload rejects the whole
    /// update. Nothing is written when no key applies.
    pub fn update(
        &self,
        domain: Domain,
        id: i64,
        updates: &IndexMap<String, Scalar>,
    ) -> Result<Envelope, ContextError> {
        let lock = self.locks.get_lock(&domain);
        let _guard = lock.write();
        let mut table = self.store.load(domain)?;

        let row = usize::try_from(id)
            .ok()
            .filter(|row| *row < table.len())
            .ok_or_else(|| {
                ContextError::NoOpUpdate(format!(
                    "no record with id {} in {} ({} records)",
                    id,
                    domain,
                    table.len()
                ))
            })?;

        let mut writes = Vec::new();
        let mut ignored = Vec::new();
        for (column, value) in updates {
            match table.column_index(column) {
                Some(col) => {
                    let value = table.coerce(row, col, value).map_err(|reason| {
                        ContextError::InvalidRequest(format!("column '{}': {}", column, reason))
                    })?;
                    writes.push((column.clone(), col, value));
                }
                None => ignored.push(column.clone()),
            }
        }

        let mut updated = Vec::with_capacity(writes.len());
        for (column, col, value) in writes {
            if table.set_cell(row, col, value) {
                updated.push(column);
            }
        }

        let message = if updated.is_empty() {
            "No matching columns; record unchanged".to_string()
        } else {
            self.store.save(domain, &table)?;
            tracing::info!(domain = %domain, id, columns = ?updated, "record updated");
            "Record updated successfully".to_string()
        };

        Ok(Envelope {
            message: Some(message),
            updated_columns: Some(updated),
            ignored_columns: Some(ignored),
            ..Envelope::ok(domain, Intent::Update)
        })
    }

    /// Fixed placeholder forecast.
    pub fn predict(&self, domain: Domain) -> Envelope {
        Envelope {
            prediction: Some(PREDICTION_PLACEHOLDER.to_string()),
            confidence: Some(PREDICTION_CONFIDENCE),
            ..Envelope::ok(domain, Intent::Predict)
        }
    }
}
