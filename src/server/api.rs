//! Route handlers
//!
//! Handlers never fail: remote errors are turned into status codes and JSON
//! bodies here.

use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::miniflux::Filter;
use crate::processor::ProcessResult;

use super::http::AppState;

/// Time budget for the `/healthz` check
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Response Types
// ============================================================================

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            message: None,
            error: None,
        }
    }

    fn unhealthy(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            timestamp: None,
            message: Some(message.into()),
            error,
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

/// Create the service router
///
/// Requests with any other method on a known path get `405 Method Not Allowed`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/process", post(process_entries))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Check the Miniflux API within the configured time budget
async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    match tokio::time::timeout(state.health_timeout, state.api.me()).await {
        Ok(Ok(_user)) => (StatusCode::OK, Json(HealthResponse::healthy())),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::unhealthy(
                    "Cannot connect to Miniflux API",
                    Some(e.to_string()),
                )),
            )
        }
        Err(_elapsed) => {
            tracing::warn!(timeout = ?state.health_timeout, "Health check timed out");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::unhealthy("Health check timeout", None)),
            )
        }
    }
}

/// Run one processing pass over unread entries
async fn process_entries(State(state): State<AppState>) -> Json<ProcessResult> {
    tracing::info!("Processing unread entries...");
    Json(state.processor.process(&Filter::unread()).await)
}
