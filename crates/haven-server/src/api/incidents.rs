//! Incident API endpoints.
//!
//! Report submission, listing, routing exclusions, and the cleanup
//! maintenance hook.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::api::routes::bad_request;
use crate::exclusions::{resolve_exclusions, Corridor};
use crate::state::AppState;
use haven_core::ReportIncidentRequest;

/// Create a new incident report.
pub async fn create_incident(
    State(state): State<Arc<AppState>>,
    Json(report): Json<ReportIncidentRequest>,
) -> Response {
    match state.incidents().create(report).await {
        Ok(incident) => {
            tracing::info!(
                "New incident reported: {:?} at [{}, {}]",
                incident.kind,
                incident.lat,
                incident.lng
            );
            (StatusCode::CREATED, Json(incident)).into_response()
        }
        Err(err) => bad_request(&err.message, err.field.as_deref()).into_response(),
    }
}

/// List all incidents.
pub async fn list_incidents(State(state): State<Arc<AppState>>) -> Response {
    match state.incidents().list_all().await {
        Ok(incidents) => Json(incidents).into_response(),
        Err(err) => {
            tracing::error!("Failed to list incidents: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}

/// Query parameters for the exclusions endpoint. Any omitted coordinate
/// selects the all-recent-hazards fallback mode.
#[derive(Debug, Deserialize)]
pub struct ExclusionsQuery {
    #[serde(rename = "startLat")]
    pub start_lat: Option<f64>,
    #[serde(rename = "startLng")]
    pub start_lng: Option<f64>,
    #[serde(rename = "endLat")]
    pub end_lat: Option<f64>,
    #[serde(rename = "endLng")]
    pub end_lng: Option<f64>,
    pub buffer: Option<f64>,
}

/// Routing-provider-formatted exclusion coordinates for recent hazards.
pub async fn get_exclusions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExclusionsQuery>,
) -> Response {
    let corridor = match (
        query.start_lat,
        query.start_lng,
        query.end_lat,
        query.end_lng,
    ) {
        (Some(start_lat), Some(start_lng), Some(end_lat), Some(end_lng)) => Some(Corridor {
            start_lat,
            start_lng,
            end_lat,
            end_lng,
        }),
        _ => None,
    };
    let buffer_km = query.buffer.unwrap_or(state.config().default_buffer_km);

    match resolve_exclusions(
        state.incidents(),
        corridor,
        buffer_km,
        state.config().hazard_max_age_hours,
    )
    .await
    {
        Ok(exclude_locations) => {
            tracing::info!(
                "Returning {} exclusion coordinates for Valhalla",
                exclude_locations.len()
            );
            Json(json!({ "exclude_locations": exclude_locations })).into_response()
        }
        Err(err) => {
            tracing::error!("Failed to resolve exclusions: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CleanupRequest {
    pub older_than_days: Option<i64>,
    /// Explicit confirmation string, must be "CLEANUP".
    pub confirm: Option<String>,
}

/// Remove incidents older than a cutoff. Disabled unless the deployment
/// opts in via configuration.
pub async fn cleanup_incidents(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CleanupRequest>,
) -> Response {
    if !state.config().allow_cleanup {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "Incident cleanup disabled",
                "hint": "Set HAVEN_ALLOW_CLEANUP=1 to enable"
            })),
        )
            .into_response();
    }

    if req.confirm.as_deref() != Some("CLEANUP") {
        return bad_request("Cleanup requires confirm=CLEANUP", Some("confirm")).into_response();
    }

    let days = req.older_than_days.unwrap_or(7);
    if days <= 0 {
        return bad_request("older_than_days must be positive", Some("older_than_days"))
            .into_response();
    }

    match state.incidents().cleanup_older_than(days).await {
        Ok(removed) => {
            tracing::info!("Cleaned up {} old incidents", removed);
            Json(json!({ "removed": removed })).into_response()
        }
        Err(err) => {
            tracing::error!("Incident cleanup failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}
