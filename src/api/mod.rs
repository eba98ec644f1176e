//! HTTP API over a loaded `TriageSession`.
//!
//! Routes are nested under `/api/`. The session is read-only, so handlers
//! share one `Arc` without locking and run extraction inline.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer};
pub use types::ApiContext;
