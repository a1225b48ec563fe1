//! Core data models for community incident reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::spatial;

/// Attribution used when a report arrives without a reporter name.
pub const ANONYMOUS_REPORTER: &str = "Anonymous";

/// Kind of community report.
///
/// Hazards mark locations routing should avoid; resources mark available
/// aid. The set is closed: unknown kinds are rejected at validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentKind {
    DebrisRoad,
    DownedPowerline,
    FoodAvailable,
    GasAvailable,
    PowerAvailable,
    ShelterAvailable,
}

impl IncidentKind {
    /// Hazard kinds exclude nearby road segments from routing.
    pub fn is_hazard(self) -> bool {
        matches!(self, Self::DebrisRoad | Self::DownedPowerline)
    }

    /// Parse the wire name used in report submissions.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "debris_road" => Some(Self::DebrisRoad),
            "downed_powerline" => Some(Self::DownedPowerline),
            "food_available" => Some(Self::FoodAvailable),
            "gas_available" => Some(Self::GasAvailable),
            "power_available" => Some(Self::PowerAvailable),
            "shelter_available" => Some(Self::ShelterAvailable),
            _ => None,
        }
    }
}

/// A stored community report.
///
/// `id` is stable for the incident's lifetime; coordinates, kind and
/// timestamp are immutable after creation (there is no update operation).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub kind: IncidentKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub reported_by: String,
}

impl Incident {
    /// Grid key for store indexing. Derived and recomputed on demand,
    /// never persisted as an extra field on the record.
    pub fn bucket_key(&self) -> String {
        spatial::bucket_key(self.lat, self.lng)
    }
}

/// Provider-facing coordinate pair.
///
/// Valhalla spells longitude `lon`, not `lng`; the rename at this
/// boundary is part of the provider contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// Incoming incident report, unvalidated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportIncidentRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub location: Option<ReportLocation>,
    #[serde(default, rename = "reportedBy")]
    pub reported_by: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReportLocation {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// A report that passed validation. The store assigns `id` and
/// `timestamp` when it persists one of these.
#[derive(Debug, Clone)]
pub struct NewIncident {
    pub lat: f64,
    pub lng: f64,
    pub kind: IncidentKind,
    pub description: String,
    pub reported_by: String,
}

impl ReportIncidentRequest {
    /// Validate a raw report into a `NewIncident`.
    ///
    /// A missing or out-of-range location is rejected rather than
    /// defaulted, so a report can never silently land at (0, 0).
    pub fn validate(self) -> Result<NewIncident, ValidationError> {
        let kind = match self.kind.as_deref().map(str::trim) {
            None | Some("") => {
                return Err(ValidationError::for_field(
                    "Missing required fields: type and description",
                    "type",
                ));
            }
            Some(raw) => IncidentKind::parse(raw).ok_or_else(|| {
                ValidationError::for_field(format!("Unknown incident type: {}", raw), "type")
            })?,
        };

        let description = match self.description.as_deref().map(str::trim) {
            None | Some("") => {
                return Err(ValidationError::for_field(
                    "Missing required fields: type and description",
                    "description",
                ));
            }
            Some(text) => text.to_string(),
        };

        let location = self.location.ok_or_else(|| {
            ValidationError::for_field("Missing report location with lat/lng", "location")
        })?;
        let (lat, lng) = match (location.lat, location.lng) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => {
                return Err(ValidationError::for_field(
                    "Missing report location with lat/lng",
                    "location",
                ));
            }
        };
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ValidationError::for_field("Latitude out of range", "lat"));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(ValidationError::for_field("Longitude out of range", "lng"));
        }

        let reported_by = self
            .reported_by
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| ANONYMOUS_REPORTER.to_string());

        Ok(NewIncident {
            lat,
            lng,
            kind,
            description,
            reported_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(kind: &str, description: &str, lat: f64, lng: f64) -> ReportIncidentRequest {
        ReportIncidentRequest {
            kind: Some(kind.to_string()),
            description: Some(description.to_string()),
            location: Some(ReportLocation {
                lat: Some(lat),
                lng: Some(lng),
            }),
            reported_by: None,
        }
    }

    #[test]
    fn hazard_kinds_are_exactly_two() {
        assert!(IncidentKind::DebrisRoad.is_hazard());
        assert!(IncidentKind::DownedPowerline.is_hazard());
        assert!(!IncidentKind::FoodAvailable.is_hazard());
        assert!(!IncidentKind::GasAvailable.is_hazard());
        assert!(!IncidentKind::PowerAvailable.is_hazard());
        assert!(!IncidentKind::ShelterAvailable.is_hazard());
    }

    #[test]
    fn kind_wire_names_round_trip() {
        for name in [
            "debris_road",
            "downed_powerline",
            "food_available",
            "gas_available",
            "power_available",
            "shelter_available",
        ] {
            let kind = IncidentKind::parse(name).expect(name);
            let encoded = serde_json::to_value(kind).unwrap();
            assert_eq!(encoded, serde_json::Value::String(name.to_string()));
        }
        assert!(IncidentKind::parse("flooding").is_none());
    }

    #[test]
    fn valid_report_passes() {
        let new = report("debris_road", "tree down", 26.1224, -80.1373)
            .validate()
            .unwrap();
        assert_eq!(new.kind, IncidentKind::DebrisRoad);
        assert_eq!(new.lat, 26.1224);
        assert_eq!(new.lng, -80.1373);
        assert_eq!(new.reported_by, ANONYMOUS_REPORTER);
    }

    #[test]
    fn missing_type_or_description_is_rejected() {
        let mut missing_type = report("debris_road", "tree down", 26.0, -80.0);
        missing_type.kind = None;
        let err = missing_type.validate().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("type"));

        let mut blank_description = report("debris_road", "tree down", 26.0, -80.0);
        blank_description.description = Some("   ".to_string());
        let err = blank_description.validate().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("description"));
    }

    #[test]
    fn missing_location_is_rejected_not_defaulted() {
        let mut no_location = report("debris_road", "tree down", 26.0, -80.0);
        no_location.location = None;
        let err = no_location.validate().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("location"));

        let partial = ReportIncidentRequest {
            location: Some(ReportLocation {
                lat: Some(26.0),
                lng: None,
            }),
            ..report("debris_road", "tree down", 26.0, -80.0)
        };
        assert!(partial.validate().is_err());
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        assert!(report("debris_road", "x", 91.0, -80.0).validate().is_err());
        assert!(report("debris_road", "x", 26.0, 181.0).validate().is_err());
        assert!(report("debris_road", "x", f64::NAN, -80.0)
            .validate()
            .is_err());
    }

    #[test]
    fn incident_serializes_with_wire_field_names() {
        let incident = Incident {
            id: "abc".to_string(),
            lat: 26.1224,
            lng: -80.1373,
            kind: IncidentKind::DownedPowerline,
            description: "line across NE 4th".to_string(),
            timestamp: Utc::now(),
            reported_by: ANONYMOUS_REPORTER.to_string(),
        };
        let value = serde_json::to_value(&incident).unwrap();
        assert_eq!(value["type"], "downed_powerline");
        assert_eq!(value["reportedBy"], ANONYMOUS_REPORTER);
        assert!(value.get("lng").is_some());
        assert!(value.get("lon").is_none());
    }
}
