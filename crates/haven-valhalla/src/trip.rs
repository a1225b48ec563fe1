//! Valhalla wire types and route post-processing.

use haven_core::Location;
use serde::{Deserialize, Serialize};

/// Routing profile accepted by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Costing {
    #[default]
    Auto,
    Bicycle,
    Pedestrian,
}

/// Request body for `POST /route`.
#[derive(Debug, Clone, Serialize)]
pub struct RouteRequest {
    pub locations: Vec<Location>,
    pub costing: Costing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<ExcludeLocations>,
    pub directions_options: DirectionsOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExcludeLocations {
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectionsOptions {
    pub units: String,
}

impl Default for DirectionsOptions {
    fn default() -> Self {
        Self {
            units: "miles".to_string(),
        }
    }
}

/// Top-level provider response.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    pub trip: Trip,
}

/// The provider reports its own status inside the payload; a non-zero
/// `status` is a failure even when the HTTP call succeeded.
#[derive(Debug, Clone, Deserialize)]
pub struct Trip {
    #[serde(default)]
    pub locations: Vec<Location>,
    pub legs: Vec<TripLeg>,
    pub summary: TripSummary,
    pub status: i64,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub units: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TripLeg {
    pub maneuvers: Vec<Maneuver>,
    pub summary: TripSummary,
    /// Encoded polyline at 1e-6 coordinate scale, passed through verbatim.
    pub shape: String,
}

/// Distance is in the requested units (miles), time in seconds.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TripSummary {
    pub time: f64,
    pub length: f64,
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Maneuver {
    pub instruction: String,
    pub time: f64,
    pub length: f64,
    #[serde(default)]
    pub street_names: Option<Vec<String>>,
}

/// Human-usable route summary for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_miles: f64,
    pub duration_minutes: i64,
    pub duration_seconds: f64,
    pub bounds: SummaryBounds,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SummaryBounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

/// One maneuver step in a turn list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDirection {
    pub instruction: String,
    pub distance_miles: f64,
    pub duration_seconds: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_names: Option<Vec<String>>,
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl RouteResponse {
    /// Summarize the trip: distance to one decimal mile, duration in
    /// whole minutes, plus the route bounding box.
    pub fn summarize(&self) -> RouteSummary {
        let summary = &self.trip.summary;
        RouteSummary {
            distance_miles: round_tenth(summary.length),
            duration_minutes: (summary.time / 60.0).round() as i64,
            duration_seconds: summary.time,
            bounds: SummaryBounds {
                min_lat: summary.min_lat,
                min_lon: summary.min_lon,
                max_lat: summary.max_lat,
                max_lon: summary.max_lon,
            },
        }
    }

    /// Flatten every leg's maneuver list, in order, into a turn list.
    pub fn directions(&self) -> Vec<RouteDirection> {
        let mut directions = Vec::new();
        for leg in &self.trip.legs {
            for maneuver in &leg.maneuvers {
                directions.push(RouteDirection {
                    instruction: maneuver.instruction.clone(),
                    distance_miles: round_tenth(maneuver.length),
                    duration_seconds: maneuver.time.round() as i64,
                    street_names: maneuver.street_names.clone(),
                });
            }
        }
        directions
    }

    /// Encoded polyline for the first leg, empty when the trip has none.
    pub fn geometry(&self) -> &str {
        self.trip
            .legs
            .first()
            .map(|leg| leg.shape.as_str())
            .unwrap_or("")
    }
}
