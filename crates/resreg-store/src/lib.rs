//! Versioned résumé storage for the résumé registry.
//!
//! Every identity (an email address) owns an append-only history of résumé
//! versions. Versions are numbered `1..=N` in submission order with no gaps;
//! deleting an identity drops the whole history and the next submission
//! starts again at version 1.
//!
//! # Modules
//!
//! - [`record`] — [`ResumeRecord`] and [`StoreStats`]
//! - [`traits`] — The [`ResumeStore`] trait defining the storage interface
//! - [`memory`] — In-memory [`InMemoryResumeStore`]

pub mod memory;
pub mod record;
pub mod traits;

pub use bytes::Bytes;
pub use memory::InMemoryResumeStore;
pub use record::{ResumeRecord, StoreStats};
pub use traits::ResumeStore;
