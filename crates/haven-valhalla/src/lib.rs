//! Haven Valhalla - routing provider client
//!
//! Handles all communication with the external Valhalla routing engine,
//! including the process-wide request throttle the provider's rate limit
//! requires.

pub mod client;
pub mod trip;

pub use client::{RouteOptions, RoutingError, ValhallaClient, DEFAULT_BASE_URL};
pub use trip::{
    Costing, Maneuver, RouteDirection, RouteRequest, RouteResponse, RouteSummary, SummaryBounds,
    Trip, TripLeg, TripSummary,
};
