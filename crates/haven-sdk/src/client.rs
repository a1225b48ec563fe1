//! HTTP client for the Haven API.

use anyhow::{anyhow, Result};
use haven_core::{Incident, Location, ReportIncidentRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client for connecting to a Haven server.
pub struct HavenClient {
    base_url: String,
    client: reqwest::Client,
}

/// Route request as the API accepts it.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlanRequest {
    pub start: Location,
    pub end: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub costing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_incidents: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_km: Option<f64>,
}

/// Route calculation result. The per-route payloads are kept as raw JSON;
/// callers usually only need the summaries.
#[derive(Debug, Deserialize)]
pub struct RouteCalculation {
    pub optimal_route: Value,
    pub baseline_route: Value,
    pub avoided_incidents: usize,
    pub exclusions_used: Vec<Location>,
    pub calculation_time_ms: u64,
}

#[derive(Debug, Deserialize)]
struct ExclusionsResponse {
    exclude_locations: Vec<Location>,
}

impl HavenClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Submit an incident report.
    pub async fn report_incident(&self, report: &ReportIncidentRequest) -> Result<Incident> {
        let url = format!("{}/api/incidents", self.base_url);
        let response = self.client.post(&url).json(report).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Incident report rejected: {} {}", status, body));
        }

        Ok(response.json().await?)
    }

    /// Fetch every incident on the map.
    pub async fn list_incidents(&self) -> Result<Vec<Incident>> {
        let url = format!("{}/api/incidents", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Incident listing failed: {} {}", status, body));
        }

        Ok(response.json().await?)
    }

    /// Fetch routing exclusions, optionally scoped to a corridor
    /// (`start_lat, start_lng, end_lat, end_lng`).
    pub async fn exclusions(
        &self,
        corridor: Option<(f64, f64, f64, f64)>,
        buffer_km: Option<f64>,
    ) -> Result<Vec<Location>> {
        let url = format!("{}/api/incidents/exclusions", self.base_url);
        let mut request = self.client.get(&url);

        if let Some((start_lat, start_lng, end_lat, end_lng)) = corridor {
            request = request.query(&[
                ("startLat", start_lat),
                ("startLng", start_lng),
                ("endLat", end_lat),
                ("endLng", end_lng),
            ]);
        }
        if let Some(buffer_km) = buffer_km {
            request = request.query(&[("buffer", buffer_km)]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Exclusion fetch failed: {} {}", status, body));
        }

        let payload: ExclusionsResponse = response.json().await?;
        Ok(payload.exclude_locations)
    }

    /// Calculate a hazard-avoiding route with its baseline.
    pub async fn calculate_route(&self, request: &RoutePlanRequest) -> Result<RouteCalculation> {
        let url = format!("{}/api/routes", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Route calculation failed: {} {}", status, body));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_request_omits_unset_options() {
        let request = RoutePlanRequest {
            start: Location {
                lat: 25.7617,
                lon: -80.1918,
            },
            end: Location {
                lat: 26.7153,
                lon: -80.0534,
            },
            costing: None,
            avoid_incidents: None,
            buffer_km: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("costing").is_none());
        assert!(value.get("avoid_incidents").is_none());
        assert_eq!(value["start"]["lon"], -80.1918);
    }
}
