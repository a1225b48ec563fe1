//! Demo incident set for seeding a fresh server.

use haven_core::{ReportIncidentRequest, ReportLocation};

fn report(kind: &str, description: &str, lat: f64, lng: f64) -> ReportIncidentRequest {
    ReportIncidentRequest {
        kind: Some(kind.to_string()),
        description: Some(description.to_string()),
        location: Some(ReportLocation {
            lat: Some(lat),
            lng: Some(lng),
        }),
        reported_by: Some("demo-seeder".to_string()),
    }
}

/// A small South Florida scenario: two hazards along the I-95 corridor
/// plus a few open resources.
pub fn demo_reports() -> Vec<ReportIncidentRequest> {
    vec![
        report(
            "debris_road",
            "Tree down across both lanes near Davie Blvd",
            26.1224,
            -80.1373,
        ),
        report(
            "downed_powerline",
            "Power line hanging over the northbound shoulder",
            26.3587,
            -80.0831,
        ),
        report(
            "shelter_available",
            "High school gym open, cots and water",
            26.1445,
            -80.1776,
        ),
        report(
            "gas_available",
            "Station on US 1 pumping, short line",
            25.8576,
            -80.1830,
        ),
        report(
            "food_available",
            "Hot meals at the community center until 8pm",
            26.7153,
            -80.0534,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_reports_all_validate() {
        for report in demo_reports() {
            report.validate().expect("demo report should be valid");
        }
    }
}
