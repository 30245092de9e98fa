//! The [`ResumeStore`] trait defining the versioned storage interface.

use bytes::Bytes;

use crate::record::{ResumeRecord, StoreStats};

/// Storage backend for per-identity résumé histories.
///
/// Implementations must be thread-safe (`Send + Sync`). `submit` and
/// `delete_all` must be atomic with respect to every other operation on the
/// same identity: no two of them may interleave their read-modify-write
/// steps.
pub trait ResumeStore: Send + Sync {
    /// Append a new version for `email` and return it.
    ///
    /// The new version is one more than the number of versions currently
    /// held for `email`, so the first submission (or the first one after
    /// [`delete_all`](Self::delete_all)) is version 1.
    fn submit(&self, email: &str, body: Bytes) -> ResumeRecord;

    /// The highest version held for `email`, or `None` if there is no history.
    fn find_current(&self, email: &str) -> Option<ResumeRecord>;

    /// The record with exactly `version`, or `None` if it does not exist.
    ///
    /// Any version outside `1..=N` yields `None`.
    fn find_by_version(&self, email: &str, version: u64) -> Option<ResumeRecord>;

    /// Drop the whole history of `email`.
    ///
    /// Returns `true` if a history existed. Deleting an unknown identity is
    /// not an error.
    fn delete_all(&self, email: &str) -> bool;

    /// Number of versions currently held for `email`.
    fn version_count(&self, email: &str) -> u64 {
        self.find_current(email).map(|r| r.version()).unwrap_or(0)
    }

    /// Counters over the whole store.
    fn stats(&self) -> StoreStats;
}
