//! Incident-to-exclusion resolution around a route corridor.

use chrono::Utc;
use haven_core::{route_bounds, Incident, Location};

use crate::persistence::StorageError;
use crate::store::{within_age, IncidentStore};

/// A route corridor described by its endpoints. Coordinates are in the
/// incident store's `lat`/`lng` convention.
#[derive(Debug, Clone, Copy)]
pub struct Corridor {
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
}

/// Resolve recent hazards into routing exclusion points.
///
/// With a corridor, hazards are looked up inside the buffered bounding
/// box. Without one, every recent hazard qualifies regardless of
/// location - a distinct degraded mode kept for backward-compatible
/// callers, never merged with the corridor path.
///
/// Pure read: no side effects beyond the store query.
pub async fn resolve_exclusions(
    store: &IncidentStore,
    corridor: Option<Corridor>,
    buffer_km: f64,
    max_age_hours: f64,
) -> Result<Vec<Location>, StorageError> {
    let hazards = match corridor {
        Some(corridor) => {
            let bounds = route_bounds(
                corridor.start_lat,
                corridor.start_lng,
                corridor.end_lat,
                corridor.end_lng,
                buffer_km,
            );
            store.query_hazards_near(bounds, max_age_hours).await?
        }
        None => {
            let now = Utc::now();
            store
                .list_all()
                .await?
                .into_iter()
                .filter(|incident| {
                    incident.kind.is_hazard() && within_age(incident, max_age_hours, now)
                })
                .collect()
        }
    };

    Ok(hazards.into_iter().map(to_exclusion).collect())
}

/// The `lng` -> `lon` rename happens here, at the provider boundary.
fn to_exclusion(incident: Incident) -> Location {
    Location {
        lat: incident.lat,
        lon: incident.lng,
    }
}
