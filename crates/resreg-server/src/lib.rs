//! HTTP transport for the résumé registry.
//!
//! Decodes requests into `(email, body)` pairs, calls the
//! [`ResumeStore`](resreg_store::ResumeStore), and encodes the results as
//! HTTP responses: uploads answer `201 Created` with a `Location` header,
//! downloads stream the stored bytes as an attachment, and missing records
//! answer `404` with a JSON error body.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, ServerError, ServerResult};
pub use handler::SubmitResponse;
pub use router::build_router;
pub use server::{shutdown_signal, ResumeRegistryServer};
pub use state::AppState;
