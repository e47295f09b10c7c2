//! Process lifecycle
//!
//! ```text
//! Starting ──> Serving ──> Draining ──> Stopped
//! ```
//!
//! The HTTP server always runs in the background. In one-shot mode the
//! lifecycle runs a single processing pass and then drains; in daemon mode it
//! waits for a termination signal first.

use std::future::Future;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::miniflux::Filter;
use crate::processor::ProcessResult;
use crate::server::{AppState, HttpServer, ServerError};

/// Grace period for in-flight requests during shutdown
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(30);

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Serving,
    Draining,
    Stopped,
}

/// How long the process stays up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One processing pass, then shut down
    OneShot,
    /// Serve until a termination signal arrives
    Daemon,
}

impl RunMode {
    pub fn from_daemon_flag(daemon: bool) -> Self {
        if daemon {
            Self::Daemon
        } else {
            Self::OneShot
        }
    }
}

/// What a completed run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Result of the startup pass, one-shot mode only
    pub pass: Option<ProcessResult>,
}

/// Drives the server through its phases
pub struct Lifecycle {
    mode: RunMode,
    grace_period: Duration,
    phase: watch::Sender<Phase>,
}

impl Lifecycle {
    pub fn new(mode: RunMode) -> Self {
        let (phase, _) = watch::channel(Phase::Starting);
        Self {
            mode,
            grace_period: DEFAULT_GRACE_PERIOD,
            phase,
        }
    }

    /// Set the shutdown grace period
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Watch phase transitions
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    /// Serve on `listener` until the mode's stop condition, then drain
    ///
    /// `signal` is awaited only in daemon mode, and at most once.
    pub async fn run<F>(
        &self,
        state: AppState,
        listener: TcpListener,
        signal: F,
    ) -> Result<RunOutcome, ServerError>
    where
        F: Future<Output = ()>,
    {
        let server = match HttpServer::spawn(listener, state.build_router()) {
            Ok(server) => server,
            Err(e) => {
                self.set_phase(Phase::Stopped);
                return Err(e);
            }
        };
        self.set_phase(Phase::Serving);

        let pass = match self.mode {
            RunMode::OneShot => {
                tracing::info!("Running a single processing pass");
                Some(state.processor.process(&Filter::unread()).await)
            }
            RunMode::Daemon => {
                tracing::info!("Running as daemon, waiting for termination signal");
                signal.await;
                None
            }
        };

        self.set_phase(Phase::Draining);
        let result = server.shutdown(self.grace_period).await;
        self.set_phase(Phase::Stopped);

        result.map(|()| RunOutcome { pass })
    }

    fn set_phase(&self, phase: Phase) {
        tracing::debug!(?phase, "Lifecycle transition");
        self.phase.send_replace(phase);
    }
}

/// Resolve on SIGINT or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to wait for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
