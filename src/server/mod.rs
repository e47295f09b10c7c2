//! HTTP surface of the service
//!
//! ```text
//! GET  /healthz - liveness check against the Miniflux API
//! POST /process - run one processing pass over unread entries
//! ```
//!
//! Concurrent `/process` calls are not serialized: two overlapping passes may
//! fetch and process the same unread entries, since Miniflux exposes no lock
//! or lease to claim them.

pub mod api;
pub mod http;

pub use api::{create_router, HEALTH_CHECK_TIMEOUT};
pub use http::{AppState, HttpServer, ServerError};
