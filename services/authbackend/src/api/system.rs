//! Health and API description handlers.
//!
//! # Purpose and responsibility
//! Lightweight endpoints for probes and tooling. The policy is compiled
//! before the listener binds, so a serving process is always ready.
use crate::api::openapi::ApiDoc;
use crate::api::types::HealthStatus;
use axum::Json;
use utoipa::OpenApi;

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service health", body = HealthStatus)
    )
)]
/// Return `ok` once the service is serving.
pub(crate) async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}

/// Serve the generated OpenAPI document.
pub(crate) async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
