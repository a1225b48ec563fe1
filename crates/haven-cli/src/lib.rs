//! Haven CLI - command line tools for the community map.
//!
//! Binaries:
//! - report_incident: submit a single hazard/resource report
//! - plan_route: request a hazard-avoiding route and print directions
//! - seed_demo: populate a server with the demo incident set

pub mod demo;

pub use demo::demo_reports;
