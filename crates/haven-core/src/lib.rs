//! Core types and spatial math for the Haven community map.

pub mod error;
pub mod models;
pub mod spatial;

pub use error::ValidationError;
pub use models::{
    Incident, IncidentKind, Location, NewIncident, ReportIncidentRequest, ReportLocation,
    ANONYMOUS_REPORTER,
};
pub use spatial::{
    bucket_key, bucket_keys_in_bounds, haversine_distance_km, route_bounds, SpatialBounds,
};
