//! Unified error handling for the fluxsave crate
//!
//! Each concern owns a focused error type:
//!
//! - [`ConfigError`] - missing or malformed environment configuration
//! - [`ApiError`] - failures talking to the Miniflux API
//! - [`ServerError`] - binding, serving and draining the HTTP listener
//!
//! [`Error`] wraps all of them so the binary can propagate a single type.

use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::miniflux::ApiError;
pub use crate::server::ServerError;

/// Unified error type for the fluxsave crate
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Remote API errors
    #[error("Miniflux API error: {0}")]
    Api(#[from] ApiError),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}

/// Result type alias using the unified [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
