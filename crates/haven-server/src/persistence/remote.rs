//! KV-backed incident store with an in-memory write-through mirror.

use chrono::{Duration, Utc};
use dashmap::DashMap;
use haven_core::{bucket_keys_in_bounds, Incident, SpatialBounds};
use std::collections::HashMap;
use tracing::warn;

use crate::persistence::{KvClient, StorageError};
use crate::store::matches_hazard_query;

const INCIDENT_PREFIX: &str = "incident:";

/// Above this many candidate grid cells a single full-prefix scan is
/// cheaper than per-cell key listings. Correctness is unaffected: every
/// candidate is re-verified against the exact predicate either way.
const MAX_PREFIX_QUERIES: usize = 64;

/// Incident store backed by the remote key-value service.
///
/// Every write lands in the local mirror first, so a backend outage
/// degrades reads to mirror contents instead of failing the request.
pub struct PersistentIncidentStore {
    kv: KvClient,
    mirror: DashMap<String, Incident>,
}

/// Keys embed the spatial bucket so bounding-box queries can narrow by
/// prefix before exact filtering.
fn storage_key(incident: &Incident) -> String {
    format!("{}{}:{}", INCIDENT_PREFIX, incident.bucket_key(), incident.id)
}

/// Collapse duplicates by `id`, keeping the record with the latest
/// timestamp. Bucket-straddling queries can see one incident twice.
fn dedupe_by_latest(incidents: Vec<Incident>) -> Vec<Incident> {
    let mut unique: HashMap<String, Incident> = HashMap::new();
    for incident in incidents {
        match unique.get(&incident.id) {
            Some(existing) if existing.timestamp >= incident.timestamp => {}
            _ => {
                unique.insert(incident.id.clone(), incident);
            }
        }
    }
    let mut result: Vec<Incident> = unique.into_values().collect();
    result.sort_by_key(|incident| incident.timestamp);
    result
}

impl PersistentIncidentStore {
    pub fn new(kv: KvClient) -> Self {
        Self {
            kv,
            mirror: DashMap::new(),
        }
    }

    /// Write through to the mirror and the backend. Backend failure is
    /// logged and swallowed; the report is already safe in the mirror.
    pub async fn store_incident(&self, incident: Incident) {
        self.mirror.insert(incident.id.clone(), incident.clone());

        let key = storage_key(&incident);
        if let Err(err) = self.kv.put_json(&key, &incident).await {
            warn!("Failed to persist incident {}: {}", incident.id, err);
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Incident>, StorageError> {
        match self.fetch_by_prefix(INCIDENT_PREFIX).await {
            Ok(incidents) => Ok(dedupe_by_latest(incidents)),
            Err(err) => {
                warn!("KV store unavailable, serving incidents from mirror: {}", err);
                Ok(self.mirror_snapshot())
            }
        }
    }

    pub async fn query_hazards_near(
        &self,
        bounds: &SpatialBounds,
        max_age_hours: f64,
    ) -> Result<Vec<Incident>, StorageError> {
        let now = Utc::now();
        let candidates = match self.fetch_candidates(bounds).await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!("KV store unavailable, querying mirror: {}", err);
                self.mirror_snapshot()
            }
        };

        // Narrow-then-verify: prefix narrowing is approximate, the exact
        // predicate decides membership.
        let verified = candidates
            .into_iter()
            .filter(|incident| matches_hazard_query(incident, bounds, max_age_hours, now))
            .collect();
        Ok(dedupe_by_latest(verified))
    }

    pub async fn cleanup_older_than(&self, days: i64) -> Result<usize, StorageError> {
        let cutoff = Utc::now() - Duration::days(days);
        self.mirror.retain(|_, incident| incident.timestamp >= cutoff);

        let keys = match self.kv.list_keys(INCIDENT_PREFIX).await {
            Ok(keys) => keys,
            Err(err) => {
                warn!("KV store unavailable, cleanup limited to mirror: {}", err);
                return Ok(0);
            }
        };

        let mut removed = 0;
        for key in keys {
            let incident: Option<Incident> = self.kv.get_json(&key).await?;
            if let Some(incident) = incident {
                if incident.timestamp < cutoff {
                    self.kv.delete(&key).await?;
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    async fn fetch_candidates(&self, bounds: &SpatialBounds) -> Result<Vec<Incident>, StorageError> {
        let cells = bucket_keys_in_bounds(bounds);
        if cells.len() > MAX_PREFIX_QUERIES {
            return self.fetch_by_prefix(INCIDENT_PREFIX).await;
        }

        let mut incidents = Vec::new();
        for cell in cells {
            let prefix = format!("{}{}:", INCIDENT_PREFIX, cell);
            incidents.extend(self.fetch_by_prefix(&prefix).await?);
        }
        Ok(incidents)
    }

    async fn fetch_by_prefix(&self, prefix: &str) -> Result<Vec<Incident>, StorageError> {
        let keys = self.kv.list_keys(prefix).await?;
        let mut incidents = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(incident) = self.kv.get_json::<Incident>(&key).await? {
                incidents.push(incident);
            }
        }
        Ok(incidents)
    }

    fn mirror_snapshot(&self) -> Vec<Incident> {
        let mut incidents: Vec<Incident> = self
            .mirror
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        incidents.sort_by_key(|incident| incident.timestamp);
        incidents
    }
}
