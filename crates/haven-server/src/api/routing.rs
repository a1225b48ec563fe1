//! Route calculation endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::api::routes::bad_request;
use crate::route_planner::{
    self, RouteCalcError, RouteCalculationRequest, SimpleRouteRequest,
};
use crate::state::AppState;
use haven_core::Location;
use haven_valhalla::Costing;

/// Calculate an optimal route with incident avoidance plus a baseline
/// for comparison.
pub async fn calculate_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteCalculationRequest>,
) -> Response {
    match route_planner::calculate_route(state.as_ref(), request).await {
        Ok(response) => {
            tracing::info!(
                "Route calculated: {} miles, {} minutes, avoided {} incidents",
                response.optimal_route.summary.distance_miles,
                response.optimal_route.summary.duration_minutes,
                response.avoided_incidents
            );
            Json(response).into_response()
        }
        Err(err) => route_error(err),
    }
}

/// Calculate a single route without any exclusion logic.
pub async fn simple_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SimpleRouteRequest>,
) -> Response {
    match route_planner::simple_route(state.as_ref(), request).await {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => route_error(err),
    }
}

/// Smoke-test the routing provider with a fixed Miami to West Palm Beach
/// corridor.
pub async fn test_route(State(state): State<Arc<AppState>>) -> Response {
    let start = Location {
        lat: 25.7617,
        lon: -80.1918,
    };
    let end = Location {
        lat: 26.7153,
        lon: -80.0534,
    };

    match state
        .valhalla()
        .route_with_exclusions(start, end, &[], Costing::Auto)
        .await
    {
        Ok(route) => {
            let summary = route.summarize();
            Json(json!({
                "message": "Valhalla routing is working!",
                "test_route": {
                    "distance_miles": summary.distance_miles,
                    "duration_minutes": summary.duration_minutes,
                    "status": route.trip.status_message,
                }
            }))
            .into_response()
        }
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Route test failed",
                "details": err.to_string(),
            })),
        )
            .into_response(),
    }
}

fn route_error(err: RouteCalcError) -> Response {
    match err {
        RouteCalcError::Validation(err) => {
            bad_request(&err.message, err.field.as_deref()).into_response()
        }
        RouteCalcError::Routing(err) => {
            tracing::error!("Route calculation failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to calculate route",
                    "details": err.to_string(),
                })),
            )
                .into_response()
        }
    }
}
