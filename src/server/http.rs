//! Background HTTP server
//!
//! The listener is bound by the caller, served on a spawned task, and drained
//! on request with a bounded grace period.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::miniflux::FeedApi;
use crate::processor::EntryProcessor;

use super::api::{create_router, HEALTH_CHECK_TIMEOUT};

// ============================================================================
// App State
// ============================================================================

/// Shared application state
///
/// Every handler gets a clone; the API client behind it is shared.
#[derive(Clone)]
pub struct AppState {
    /// Miniflux API client
    pub api: Arc<dyn FeedApi>,

    /// Processor running over the same client
    pub processor: EntryProcessor,

    /// Time budget for the health check
    pub health_timeout: Duration,
}

impl AppState {
    pub fn new(api: Arc<dyn FeedApi>) -> Self {
        Self {
            processor: EntryProcessor::new(api.clone()),
            api,
            health_timeout: HEALTH_CHECK_TIMEOUT,
        }
    }

    /// Override the health check time budget
    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// Router with request tracing applied
    ///
    /// No request-level timeout: a `/process` pass always runs to completion.
    pub fn build_router(&self) -> Router {
        create_router(self.clone()).layer(TraceLayer::new_for_http())
    }
}

// ============================================================================
// HTTP Server
// ============================================================================

/// Handle to an HTTP server running on a background task
pub struct HttpServer {
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl HttpServer {
    /// Start serving `router` on `listener` in the background
    pub fn spawn(listener: TcpListener, router: Router) -> Result<Self, ServerError> {
        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::BindError(e.to_string()))?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    // A dropped sender also starts draining
                    let _ = shutdown_rx.await;
                })
                .await
        });

        tracing::info!("Server starting on {}", local_addr);

        Ok(Self {
            local_addr,
            shutdown_tx,
            handle,
        })
    }

    /// Address the server is listening on
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait up to `grace` for in-flight requests
    ///
    /// Requests still running at the deadline are abandoned.
    pub async fn shutdown(self, grace: Duration) -> Result<(), ServerError> {
        tracing::info!("Shutting down server...");

        let Self {
            shutdown_tx,
            mut handle,
            ..
        } = self;

        let _ = shutdown_tx.send(());

        match tokio::time::timeout(grace, &mut handle).await {
            Ok(Ok(Ok(()))) => {
                tracing::info!("Server stopped");
                Ok(())
            }
            Ok(Ok(Err(e))) => Err(ServerError::ServeError(e.to_string())),
            Ok(Err(e)) => Err(ServerError::ServeError(e.to_string())),
            Err(_) => {
                handle.abort();
                Err(ServerError::ShutdownTimeout(grace))
            }
        }
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Debug, Clone)]
pub enum ServerError {
    /// Failed to bind to address
    BindError(String),

    /// Server task failed
    ServeError(String),

    /// In-flight requests outlived the grace period
    ShutdownTimeout(Duration),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BindError(msg) => write!(f, "Failed to bind: {}", msg),
            Self::ServeError(msg) => write!(f, "Server error: {}", msg),
            Self::ShutdownTimeout(grace) => {
                write!(f, "Server forced to shutdown after {:?}", grace)
            }
        }
    }
}

impl std::error::Error for ServerError {}

// ============================================================================
// Tests
// ============================================================================
