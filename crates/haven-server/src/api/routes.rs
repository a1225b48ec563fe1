//! REST API router and shared response helpers.

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::api::{incidents, routing};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/incidents",
            post(incidents::create_incident).get(incidents::list_incidents),
        )
        .route("/api/incidents/exclusions", get(incidents::get_exclusions))
        .route("/api/incidents/cleanup", post(incidents::cleanup_incidents))
        .route("/api/routes", post(routing::calculate_route))
        .route("/api/routes/simple", post(routing::simple_route))
        .route("/api/routes/test", get(routing::test_route))
        .fallback(not_found)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}

pub(crate) fn bad_request(
    message: &str,
    field: Option<&str>,
) -> (StatusCode, Json<serde_json::Value>) {
    let mut payload = json!({ "error": message });
    if let Some(field) = field {
        payload["field"] = serde_json::Value::String(field.to_string());
    }
    (StatusCode::BAD_REQUEST, Json(payload))
}
