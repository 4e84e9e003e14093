use crate::services::get_metrics;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "contact-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Persistence is best-effort, so nothing external gates readiness.
pub async fn readiness_check() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
