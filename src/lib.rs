//! fluxsave - saves and marks as read unread Miniflux entries
//!
//! A small HTTP service that asks a Miniflux instance to save every unread
//! entry and mark it as read, either once at startup or whenever `/process`
//! is called.
//!
//! # Architecture
//!
//! - [`config`] - Environment-backed configuration
//! - [`miniflux`] - Miniflux API client and the [`FeedApi`](miniflux::FeedApi) seam
//! - [`processor`] - The save-then-mark-read pass over unread entries
//! - [`server`] - `/healthz` and `/process` routes and the background server
//! - [`lifecycle`] - One-shot and daemon run modes with graceful shutdown
//! - [`error`] - Crate-wide error type
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fluxsave::config::Config;
//! use fluxsave::miniflux::MinifluxClient;
//! use fluxsave::lifecycle::{shutdown_signal, Lifecycle, RunMode};
//! use fluxsave::server::AppState;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = MinifluxClient::new(&config.api_url, &config.api_token)?;
//!     let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//!
//!     Lifecycle::new(RunMode::from_daemon_flag(config.daemon))
//!         .run(AppState::new(Arc::new(client)), listener, shutdown_signal())
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod miniflux;
pub mod processor;
pub mod server;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::lifecycle::{Lifecycle, Phase, RunMode};
    pub use crate::miniflux::{FeedApi, Filter, MinifluxClient};
    pub use crate::processor::{EntryProcessor, ProcessResult};
    pub use crate::server::AppState;
}

pub use error::{Error, Result};
pub use processor::{EntryProcessor, ProcessResult};
