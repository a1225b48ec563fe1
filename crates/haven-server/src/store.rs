//! Incident storage.
//!
//! Two variants behind one contract: a plain in-memory store for the demo
//! deployment, and a persistent store backed by a remote key-value service
//! with an in-memory mirror for fallback. The variant is chosen once at
//! startup from configuration.

use chrono::{DateTime, Duration, Utc};
use haven_core::{Incident, NewIncident, ReportIncidentRequest, SpatialBounds, ValidationError};
use std::sync::RwLock;
use uuid::Uuid;

use crate::persistence::{PersistentIncidentStore, StorageError};

/// Incident store. All variants satisfy the same filter semantics;
/// backends that can only approximate must re-check candidates against
/// the exact predicate before returning.
pub enum IncidentStore {
    Memory(MemoryIncidentStore),
    Persistent(PersistentIncidentStore),
}

impl IncidentStore {
    pub fn in_memory() -> Self {
        Self::Memory(MemoryIncidentStore::new())
    }

    pub fn persistent(store: PersistentIncidentStore) -> Self {
        Self::Persistent(store)
    }

    /// Validate and store a report.
    ///
    /// Once validation passes, creation always succeeds: a persistent
    /// backend failure is logged and absorbed by the in-memory mirror,
    /// never surfaced to the reporter.
    pub async fn create(&self, report: ReportIncidentRequest) -> Result<Incident, ValidationError> {
        let incident = materialize(report.validate()?);
        match self {
            Self::Memory(store) => store.insert(incident.clone()),
            Self::Persistent(store) => store.store_incident(incident.clone()).await,
        }
        Ok(incident)
    }

    /// All incidents, in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Incident>, StorageError> {
        match self {
            Self::Memory(store) => Ok(store.list_all()),
            Self::Persistent(store) => store.list_all().await,
        }
    }

    /// Hazard incidents inside `bounds` (inclusive) reported within the
    /// last `max_age_hours`.
    pub async fn query_hazards_near(
        &self,
        bounds: SpatialBounds,
        max_age_hours: f64,
    ) -> Result<Vec<Incident>, StorageError> {
        match self {
            Self::Memory(store) => Ok(store.query_hazards_near(&bounds, max_age_hours)),
            Self::Persistent(store) => store.query_hazards_near(&bounds, max_age_hours).await,
        }
    }

    /// Maintenance hook: drop incidents older than `days`. Returns the
    /// number removed.
    pub async fn cleanup_older_than(&self, days: i64) -> Result<usize, StorageError> {
        match self {
            Self::Memory(store) => Ok(store.cleanup_older_than(days)),
            Self::Persistent(store) => store.cleanup_older_than(days).await,
        }
    }
}

/// Assign server-side identity and creation time to a validated report.
fn materialize(report: NewIncident) -> Incident {
    Incident {
        id: Uuid::new_v4().to_string(),
        lat: report.lat,
        lng: report.lng,
        kind: report.kind,
        description: report.description,
        timestamp: Utc::now(),
        reported_by: report.reported_by,
    }
}

/// The exact hazard-query predicate every store variant must enforce.
pub(crate) fn matches_hazard_query(
    incident: &Incident,
    bounds: &SpatialBounds,
    max_age_hours: f64,
    now: DateTime<Utc>,
) -> bool {
    incident.kind.is_hazard()
        && bounds.contains(incident.lat, incident.lng)
        && within_age(incident, max_age_hours, now)
}

pub(crate) fn within_age(incident: &Incident, max_age_hours: f64, now: DateTime<Utc>) -> bool {
    let age = now.signed_duration_since(incident.timestamp);
    age <= Duration::milliseconds((max_age_hours * 3_600_000.0) as i64)
}

/// In-memory incident store. Insertion order is the listing order.
pub struct MemoryIncidentStore {
    incidents: RwLock<Vec<Incident>>,
}

impl MemoryIncidentStore {
    pub fn new() -> Self {
        Self {
            incidents: RwLock::new(Vec::new()),
        }
    }

    pub fn insert(&self, incident: Incident) {
        self.incidents
            .write()
            .expect("incident store lock poisoned")
            .push(incident);
    }

    pub fn list_all(&self) -> Vec<Incident> {
        self.incidents
            .read()
            .expect("incident store lock poisoned")
            .clone()
    }

    pub fn query_hazards_near(&self, bounds: &SpatialBounds, max_age_hours: f64) -> Vec<Incident> {
        let now = Utc::now();
        self.incidents
            .read()
            .expect("incident store lock poisoned")
            .iter()
            .filter(|incident| matches_hazard_query(incident, bounds, max_age_hours, now))
            .cloned()
            .collect()
    }

    pub fn cleanup_older_than(&self, days: i64) -> usize {
        let cutoff = Utc::now() - Duration::days(days);
        let mut incidents = self
            .incidents
            .write()
            .expect("incident store lock poisoned");
        let before = incidents.len();
        incidents.retain(|incident| incident.timestamp >= cutoff);
        before - incidents.len()
    }
}

impl Default for MemoryIncidentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_core::{IncidentKind, ReportLocation};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn incident_at(lat: f64, lng: f64, kind: IncidentKind, age_minutes: i64) -> Incident {
        Incident {
            id: Uuid::new_v4().to_string(),
            lat,
            lng,
            kind,
            description: "test".to_string(),
            timestamp: Utc::now() - Duration::minutes(age_minutes),
            reported_by: "test".to_string(),
        }
    }

    fn report(kind: &str, lat: f64, lng: f64) -> ReportIncidentRequest {
        ReportIncidentRequest {
            kind: Some(kind.to_string()),
            description: Some("test report".to_string()),
            location: Some(ReportLocation {
                lat: Some(lat),
                lng: Some(lng),
            }),
            reported_by: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_identity_and_preserves_order() {
        let store = IncidentStore::in_memory();

        let first = store
            .create(report("debris_road", 26.1, -80.1))
            .await
            .unwrap();
        let second = store
            .create(report("shelter_available", 26.2, -80.2))
            .await
            .unwrap();

        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[1].id, second.id);
    }

    #[tokio::test]
    async fn create_rejects_invalid_reports() {
        let store = IncidentStore::in_memory();
        let mut bad = report("debris_road", 26.1, -80.1);
        bad.description = None;
        assert!(store.create(bad).await.is_err());
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[test]
    fn hazard_query_filters_kind_bounds_and_age() {
        let store = MemoryIncidentStore::new();
        let bounds = SpatialBounds {
            north: 26.2,
            south: 26.0,
            east: -80.0,
            west: -80.2,
        };

        let fresh_hazard = incident_at(26.1, -80.1, IncidentKind::DebrisRoad, 60);
        store.insert(fresh_hazard.clone());
        // Resource inside bounds: excluded by kind.
        store.insert(incident_at(26.1, -80.1, IncidentKind::FoodAvailable, 60));
        // Hazard outside bounds: excluded by location.
        store.insert(incident_at(27.0, -80.1, IncidentKind::DownedPowerline, 60));
        // Hazard older than the window: excluded by age.
        store.insert(incident_at(26.1, -80.1, IncidentKind::DebrisRoad, 25 * 60));

        let matches = store.query_hazards_near(&bounds, 24.0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, fresh_hazard.id);
    }

    #[test]
    fn hazard_query_age_window_is_inclusive() {
        let store = MemoryIncidentStore::new();
        let bounds = SpatialBounds {
            north: 27.0,
            south: 25.0,
            east: -79.0,
            west: -81.0,
        };

        store.insert(incident_at(26.0, -80.0, IncidentKind::DebrisRoad, 24 * 60 - 1));
        store.insert(incident_at(26.0, -80.0, IncidentKind::DebrisRoad, 24 * 60 + 1));

        assert_eq!(store.query_hazards_near(&bounds, 24.0).len(), 1);
    }

    #[test]
    fn boundary_coordinates_are_included() {
        let store = MemoryIncidentStore::new();
        let bounds = SpatialBounds {
            north: 26.2,
            south: 26.0,
            east: -80.0,
            west: -80.2,
        };
        store.insert(incident_at(26.2, -80.2, IncidentKind::DebrisRoad, 1));
        assert_eq!(store.query_hazards_near(&bounds, 24.0).len(), 1);
    }

    #[test]
    fn hazard_query_matches_brute_force_over_random_incidents() {
        let store = MemoryIncidentStore::new();
        let bounds = SpatialBounds {
            north: 26.5,
            south: 25.5,
            east: -79.5,
            west: -80.5,
        };
        let kinds = [
            IncidentKind::DebrisRoad,
            IncidentKind::DownedPowerline,
            IncidentKind::FoodAvailable,
            IncidentKind::GasAvailable,
            IncidentKind::PowerAvailable,
            IncidentKind::ShelterAvailable,
        ];

        let mut rng = StdRng::seed_from_u64(42);
        let mut inserted = Vec::new();
        for _ in 0..300 {
            let incident = incident_at(
                rng.random_range(24.0..28.0),
                rng.random_range(-82.0..-78.0),
                kinds[rng.random_range(0..kinds.len())],
                rng.random_range(0..48 * 60),
            );
            inserted.push(incident.clone());
            store.insert(incident);
        }

        let now = Utc::now();
        let mut expected: Vec<String> = inserted
            .iter()
            .filter(|incident| matches_hazard_query(incident, &bounds, 24.0, now))
            .map(|incident| incident.id.clone())
            .collect();
        let mut actual: Vec<String> = store
            .query_hazards_near(&bounds, 24.0)
            .into_iter()
            .map(|incident| incident.id)
            .collect();

        expected.sort();
        actual.sort();
        assert_eq!(expected, actual);
    }

    #[test]
    fn cleanup_removes_only_stale_incidents() {
        let store = MemoryIncidentStore::new();
        store.insert(incident_at(26.0, -80.0, IncidentKind::DebrisRoad, 10 * 24 * 60));
        store.insert(incident_at(26.0, -80.0, IncidentKind::DebrisRoad, 60));

        let removed = store.cleanup_older_than(7);
        assert_eq!(removed, 1);
        assert_eq!(store.list_all().len(), 1);
    }
}
