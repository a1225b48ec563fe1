//! Application state shared across all request handlers.

use std::time::Duration;

use haven_valhalla::ValhallaClient;
use tracing::info;

use crate::config::Config;
use crate::persistence::{KvClient, PersistentIncidentStore};
use crate::store::IncidentStore;

/// Application state: the incident store, the routing gateway, and the
/// configuration they were built from.
pub struct AppState {
    config: Config,
    incidents: IncidentStore,
    valhalla: ValhallaClient,
}

impl AppState {
    /// Build state from configuration. The incident store variant is
    /// chosen here, once, by presence of the KV credential; both variants
    /// satisfy the same contract.
    pub fn new(config: Config) -> Self {
        let valhalla = ValhallaClient::with_options(
            config.valhalla_url.clone(),
            Duration::from_millis(config.valhalla_throttle_ms),
            Duration::from_secs(config.valhalla_timeout_s),
        );

        let incidents = match (config.kv_url.as_deref(), config.kv_api_key.as_deref()) {
            (Some(url), Some(api_key)) => {
                info!("Using persistent KV incident store at {}", url);
                IncidentStore::persistent(PersistentIncidentStore::new(KvClient::new(
                    url,
                    api_key,
                    config.kv_store_name.clone(),
                )))
            }
            _ => {
                info!("Using in-memory incident store");
                IncidentStore::in_memory()
            }
        };

        Self {
            config,
            incidents,
            valhalla,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn incidents(&self) -> &IncidentStore {
        &self.incidents
    }

    pub fn valhalla(&self) -> &ValhallaClient {
        &self.valhalla
    }
}
