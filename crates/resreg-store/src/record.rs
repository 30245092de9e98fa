//! Stored résumé versions.

use std::hash::{Hash, Hasher};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One immutable version of a résumé.
///
/// Equality and hashing consider only `version` and `email`; the body is
/// opaque content and does not participate.
#[derive(Clone, Debug)]
pub struct ResumeRecord {
    version: u64,
    email: String,
    body: Bytes,
}

impl ResumeRecord {
    pub(crate) fn new(version: u64, email: impl Into<String>, body: Bytes) -> Self {
        Self {
            version,
            email: email.into(),
            body,
        }
    }

    /// Version number, starting at 1 for the first submission of an identity.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The owning email identity.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The submitted document bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Length of the body in bytes.
    pub fn size(&self) -> usize {
        self.body.len()
    }

    /// Suggested download name for this version, e.g. `resume_v3.txt`.
    pub fn versioned_file_name(&self) -> String {
        format!("resume_v{}.txt", self.version)
    }
}

impl PartialEq for ResumeRecord {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.email == other.email
    }
}

impl Eq for ResumeRecord {}

impl Hash for ResumeRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version.hash(state);
        self.email.hash(state);
    }
}

/// Point-in-time counters over the whole store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Identities that currently have at least one version.
    pub identities: usize,
    /// Versions held across all identities.
    pub records: usize,
}
