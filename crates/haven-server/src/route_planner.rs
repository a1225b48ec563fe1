//! Route orchestration: exclusion resolution, provider calls, response
//! packaging, and end-to-end timing.

use std::time::Instant;

use haven_core::{Location, ValidationError};
use haven_valhalla::{Costing, RouteDirection, RouteResponse, RouteSummary, RoutingError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::exclusions::{resolve_exclusions, Corridor};
use crate::state::AppState;

const MISSING_ENDPOINTS: &str = "Missing required fields: start and end locations with lat/lon";

#[derive(Debug, Deserialize)]
pub struct RouteCalculationRequest {
    pub start: Option<EndpointInput>,
    pub end: Option<EndpointInput>,
    #[serde(default)]
    pub costing: Option<Costing>,
    #[serde(default)]
    pub avoid_incidents: Option<bool>,
    #[serde(default)]
    pub buffer_km: Option<f64>,
}

/// Route endpoint as received on the wire; both fields are checked before
/// any work happens.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EndpointInput {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SimpleRouteRequest {
    pub start: Option<EndpointInput>,
    pub end: Option<EndpointInput>,
    #[serde(default)]
    pub costing: Option<Costing>,
}

/// One formatted route: summary, turn list, encoded geometry.
#[derive(Debug, Serialize)]
pub struct RoutePayload {
    pub summary: RouteSummary,
    pub directions: Vec<RouteDirection>,
    pub geometry: String,
}

impl RoutePayload {
    pub fn from_response(route: &RouteResponse) -> Self {
        Self {
            summary: route.summarize(),
            directions: route.directions(),
            geometry: route.geometry().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RouteCalculationResponse {
    pub optimal_route: RoutePayload,
    pub baseline_route: RoutePayload,
    pub avoided_incidents: usize,
    pub exclusions_used: Vec<Location>,
    pub calculation_time_ms: u64,
}

#[derive(Debug, Error)]
pub enum RouteCalcError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Routing(#[from] RoutingError),
}

/// Calculate an exclusion-aware route plus its no-exclusion baseline.
///
/// Resolver failures are logged and tolerated: routing is still attempted
/// with an empty exclusion set rather than failing the whole request.
pub async fn calculate_route(
    state: &AppState,
    request: RouteCalculationRequest,
) -> Result<RouteCalculationResponse, RouteCalcError> {
    let started = Instant::now();

    let (start, end) = validate_endpoints(request.start, request.end)?;
    let costing = request.costing.unwrap_or_default();
    let avoid_incidents = request.avoid_incidents.unwrap_or(true);
    let buffer_km = request
        .buffer_km
        .unwrap_or(state.config().default_buffer_km);

    let mut exclusions: Vec<Location> = Vec::new();
    if avoid_incidents {
        let corridor = Corridor {
            start_lat: start.lat,
            start_lng: start.lon,
            end_lat: end.lat,
            end_lng: end.lon,
        };
        match resolve_exclusions(
            state.incidents(),
            Some(corridor),
            buffer_km,
            state.config().hazard_max_age_hours,
        )
        .await
        {
            Ok(found) => {
                info!("Found {} incidents to avoid along route", found.len());
                exclusions = found;
            }
            Err(err) => {
                warn!("Failed to resolve incident exclusions: {}", err);
            }
        }
    }

    let options = state
        .valhalla()
        .route_options(start, end, &exclusions, costing)
        .await?;

    Ok(RouteCalculationResponse {
        optimal_route: RoutePayload::from_response(&options.optimal),
        baseline_route: RoutePayload::from_response(&options.baseline),
        avoided_incidents: options.avoided_incidents,
        exclusions_used: exclusions,
        calculation_time_ms: started.elapsed().as_millis() as u64,
    })
}

/// Calculate a single route with no exclusion logic at all.
pub async fn simple_route(
    state: &AppState,
    request: SimpleRouteRequest,
) -> Result<RoutePayload, RouteCalcError> {
    let (start, end) = validate_endpoints(request.start, request.end)?;
    let costing = request.costing.unwrap_or_default();

    let route = state
        .valhalla()
        .route_with_exclusions(start, end, &[], costing)
        .await?;

    Ok(RoutePayload::from_response(&route))
}

fn validate_endpoints(
    start: Option<EndpointInput>,
    end: Option<EndpointInput>,
) -> Result<(Location, Location), ValidationError> {
    Ok((
        validate_endpoint(start, "start")?,
        validate_endpoint(end, "end")?,
    ))
}

fn validate_endpoint(
    endpoint: Option<EndpointInput>,
    field: &str,
) -> Result<Location, ValidationError> {
    let endpoint =
        endpoint.ok_or_else(|| ValidationError::for_field(MISSING_ENDPOINTS, field))?;
    match (endpoint.lat, endpoint.lon) {
        (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
            Ok(Location { lat, lon })
        }
        _ => Err(ValidationError::for_field(MISSING_ENDPOINTS, field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_require_both_coordinates() {
        let full = EndpointInput {
            lat: Some(25.7617),
            lon: Some(-80.1918),
        };
        let partial = EndpointInput {
            lat: Some(25.7617),
            lon: None,
        };

        assert!(validate_endpoints(Some(full), Some(full)).is_ok());
        assert!(validate_endpoints(None, Some(full)).is_err());
        assert!(validate_endpoints(Some(full), Some(partial)).is_err());

        let err = validate_endpoints(Some(partial), Some(full)).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("start"));
        assert_eq!(err.message, MISSING_ENDPOINTS);
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let bad = EndpointInput {
            lat: Some(f64::NAN),
            lon: Some(-80.0),
        };
        let good = EndpointInput {
            lat: Some(26.0),
            lon: Some(-80.0),
        };
        assert!(validate_endpoints(Some(bad), Some(good)).is_err());
    }
}
