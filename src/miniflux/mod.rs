//! Miniflux REST API access
//!
//! The rest of the crate only talks to Miniflux through the [`FeedApi`]
//! trait, so handlers and the processor can run against any implementation.
//! [`MinifluxClient`] is the reqwest-backed one used in production.
//!
//! Consumed endpoints:
//!
//! ```text
//! GET  /v1/entries          - list entries matching a filter
//! POST /v1/entries/{id}/save - save (bookmark) one entry
//! PUT  /v1/entries          - update the status of several entries
//! GET  /v1/me               - current user, used as a liveness check
//! ```

pub mod client;
pub mod models;

use async_trait::async_trait;
use thiserror::Error;

pub use client::MinifluxClient;
pub use models::{Entry, EntryResultSet, EntryStatus, Filter, User};

/// Result type for Miniflux API calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the Miniflux API or the transport underneath it
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport or decoding failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 401 from the server
    #[error("unauthorized (bad credentials)")]
    Unauthorized,

    /// 403 from the server
    #[error("access forbidden")]
    Forbidden,

    /// 404 from the server
    #[error("resource not found")]
    NotFound,

    /// 400 from the server
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 5xx from the server
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Any other non-success status
    #[error("unexpected status code: {0}")]
    UnexpectedStatus(u16),

    /// The endpoint or token cannot be used to build a client
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

/// Operations this service needs from the feed reader
///
/// Implementations must be safe to share across concurrent request handlers.
#[async_trait]
pub trait FeedApi: Send + Sync {
    /// List entries matching `filter` (a single page)
    async fn entries(&self, filter: &Filter) -> ApiResult<EntryResultSet>;

    /// Save an entry for later
    async fn save_entry(&self, entry_id: i64) -> ApiResult<()>;

    /// Set the status of the given entries
    async fn update_entries(&self, entry_ids: &[i64], status: EntryStatus) -> ApiResult<()>;

    /// Identify the authenticated user
    async fn me(&self) -> ApiResult<User>;
}
