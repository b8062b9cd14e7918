// SPDX-License-Identifier: GPL-3.0-only

use axum::{Json, Router, routing::get};
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(health_check))
        .route("/api/v1/health/", get(health_check))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server working OK",
    })
}
