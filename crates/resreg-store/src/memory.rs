//! In-memory résumé store.
//!
//! [`InMemoryResumeStore`] keeps every history in a `HashMap` behind a single
//! `RwLock`. Submissions and deletes hold the write guard for the whole
//! operation, which serializes them per identity (and, more coarsely, across
//! identities). Data is lost when the store is dropped.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;

use crate::record::{ResumeRecord, StoreStats};
use crate::traits::ResumeStore;

/// An in-memory implementation of [`ResumeStore`].
#[derive(Debug, Default)]
pub struct InMemoryResumeStore {
    histories: RwLock<HashMap<String, Vec<ResumeRecord>>>,
}

impl InMemoryResumeStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // Every critical section either finishes its single push/remove or leaves
    // the map untouched, so a poisoned guard still protects consistent data.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<ResumeRecord>>> {
        self.histories.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<ResumeRecord>>> {
        self.histories.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResumeStore for InMemoryResumeStore {
    fn submit(&self, email: &str, body: Bytes) -> ResumeRecord {
        let mut histories = self.write();
        let history = histories.entry(email.to_string()).or_default();
        let version = history.len() as u64 + 1;
        let record = ResumeRecord::new(version, email, body);
        history.push(record.clone());

        tracing::debug!(email, version, size = record.size(), "stored resume version");
        record
    }

    fn find_current(&self, email: &str) -> Option<ResumeRecord> {
        self.read().get(email).and_then(|h| h.last()).cloned()
    }

    fn find_by_version(&self, email: &str, version: u64) -> Option<ResumeRecord> {
        // History index i always holds version i + 1.
        let index = usize::try_from(version.checked_sub(1)?).ok()?;
        self.read().get(email).and_then(|h| h.get(index)).cloned()
    }

    fn delete_all(&self, email: &str) -> bool {
        let removed = self.write().remove(email);
        if let Some(history) = &removed {
            tracing::debug!(email, versions = history.len(), "dropped resume history");
        }
        removed.is_some()
    }

    fn version_count(&self, email: &str) -> u64 {
        self.read().get(email).map(|h| h.len() as u64).unwrap_or(0)
    }

    fn stats(&self) -> StoreStats {
        let histories = self.read();
        StoreStats {
            identities: histories.len(),
            records: histories.values().map(Vec::len).sum(),
        }
    }
}
