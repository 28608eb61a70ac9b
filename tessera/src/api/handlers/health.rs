use axum::Json;
use serde::{Deserialize, Serialize};

use crate::config::SERVICE_NAME;

/// Liveness payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

/// `GET /`
///
/// Always 200; does not touch the OCR engine.
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthStatus),
    )
)]
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        message: SERVICE_NAME.to_string(),
    })
}
