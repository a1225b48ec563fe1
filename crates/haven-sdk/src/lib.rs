//! Haven SDK - client for the Haven community map API.
//!
//! Used by the CLI tools and suitable for any service that wants to
//! submit reports or request hazard-avoiding routes.

pub mod client;

pub use client::{HavenClient, RouteCalculation, RoutePlanRequest};
