//! Health check endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` when the database answers, `down` otherwise
    pub status: String,
    /// Version of the service
    pub version: String,
    /// Why the database check failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Open connections in the pool (readiness only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<u32>,
    /// Idle connections in the pool (readiness only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_idle: Option<usize>,
}

impl HealthResponse {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            reason: None,
            pool_size: None,
            pool_idle: None,
        }
    }

    fn down(reason: String) -> Self {
        Self {
            status: "down".to_string(),
            reason: Some(reason),
            ..Self::ok()
        }
    }
}

async fn probe(state: &crate::AppState) -> (StatusCode, HealthResponse) {
    match state.repository.ping().await {
        Ok(()) => (StatusCode::OK, HealthResponse::ok()),
        Err(e) => {
            tracing::warn!(error = %e, "health_check_failed");
            (StatusCode::SERVICE_UNAVAILABLE, HealthResponse::down(e.to_string()))
        }
    }
}

/// Health check endpoint (round trip to the database)
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<crate::AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, body) = probe(&state).await;
    (status, Json(body))
}

/// Readiness check endpoint, with connection pool figures
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn readiness_check(
    State(state): State<crate::AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let (status, mut body) = probe(&state).await;
    body.pool_size = Some(state.repository.pool.size());
    body.pool_idle = Some(state.repository.pool.num_idle());
    (status, Json(body))
}
