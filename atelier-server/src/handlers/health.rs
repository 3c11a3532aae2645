//! Health check handlers
//!
//! Provides health and readiness endpoints for monitoring and orchestration.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status: always "healthy" when the process answers
    pub status: &'static str,
    /// Server version from Cargo.toml
    pub version: &'static str,
    /// Service name
    pub service: &'static str,
}

/// GET /health - Health check endpoint
///
/// Used for monitoring and load balancer health checks.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "atelier-server",
    })
}

/// Readiness response for orchestration probes
#[derive(Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Whether the service is ready to accept traffic
    pub ready: bool,
    /// Catalog backend: "postgres" or "memory"
    pub catalog: &'static str,
    /// Classifier backend in use
    pub classifier: &'static str,
    /// Optional message explaining a not-ready status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /ready - Readiness probe
///
/// Returns ready=false when the catalog backend cannot be reached. The
/// classifiers are intentionally not probed here: a down classifier
/// degrades to fail-open publishing, it never blocks traffic.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Readiness state", body = ReadyResponse)
    )
)]
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    let catalog = if state.catalog.is_persistent() {
        "postgres"
    } else {
        "memory"
    };

    match state.catalog.check_health().await {
        Ok(()) => Json(ReadyResponse {
            ready: true,
            catalog,
            classifier: state.classifier_name,
            message: None,
        }),
        Err(e) => {
            tracing::error!(error = %e, "Catalog health check failed");
            Json(ReadyResponse {
                ready: false,
                catalog,
                classifier: state.classifier_name,
                message: Some("catalog unreachable".to_string()),
            })
        }
    }
}
