//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
}

/// `GET /`
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Backend is running!",
    })
}
