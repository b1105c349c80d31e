//! Concurrent access safety for domain resources
//!
//! Provides per-domain locking so that read, query and analyze calls can run
//! side by side while an update holds its domain exclusively across the whole
//! load-modify-save sequence.

use crate::types::Domain;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-domain lock manager.
///
/// Calls against different domains never contend; calls against the same
/// domain share a read-write lock.
pub struct DomainLockManager {
    /// Lazily populated map from domain to its lock
    locks: Arc<RwLock<HashMap<Domain, Arc<RwLock<()>>>>>,
}

impl DomainLockManager {
    pub fn new() -> Self {
        Self {
            locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get or create the lock for a domain.
    pub fn get_lock(&self, domain: &Domain) -> Arc<RwLock<()>> {
        {
            let map = self.locks.read();
            if let Some(lock) = map.get(domain) {
                return lock.clone();
            }
        }

        // Re-check under the write lock; another thread may have inserted it.
        let mut map = self.locks.write();
        map.entry(*domain)
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }
}

impl Default for DomainLockManager {
    fn default() -> Self {
        Self::new()
    }
}
