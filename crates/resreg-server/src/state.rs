//! Shared application state for the HTTP handlers.

use std::sync::Arc;

use resreg_store::{InMemoryResumeStore, ResumeStore};

/// State handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ResumeStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ResumeStore>) -> Self {
        Self { store }
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryResumeStore::new()))
    }

    pub fn store(&self) -> &dyn ResumeStore {
        self.store.as_ref()
    }
}
