use axum::{extract::State, Json};
use config_engine::{ProbeFailurePolicy, StatusStoreKind};
use domain_schema::now_iso;
use serde::Serialize;
use utoipa::ToSchema;

use crate::server::CuraServer;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    /// Current timestamp in ISO-8601 format
    #[schema(example = "2024-01-15T10:30:00.000Z")]
    pub timestamp: String,
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Backend RNA service this proxy forwards to
    #[schema(example = "http://localhost:8080")]
    pub backend_url: String,
}

/// Version information response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    #[schema(example = "curatb-server")]
    pub name: String,
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Answer given when the status probe cannot reach the backend
    #[schema(value_type = String, example = "assume_untrained")]
    pub probe_failure: ProbeFailurePolicy,
    #[schema(value_type = String, example = "file")]
    pub status_store: StatusStoreKind,
}

/// Health check handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Proxy is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(server): State<CuraServer>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: now_iso(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend_url: server.backend.base_url().to_string(),
    })
}

/// Version information handler
#[utoipa::path(
    get,
    path = "/version",
    tag = "health",
    responses(
        (status = 200, description = "Build and policy information", body = VersionResponse)
    )
)]
pub async fn version_info(State(server): State<CuraServer>) -> Json<VersionResponse> {
    Json(VersionResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        probe_failure: server.settings.probe_failure,
        status_store: server.settings.status_store,
    })
}
