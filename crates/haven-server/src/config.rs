//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub valhalla_url: String,
    /// Minimum spacing between outbound Valhalla calls, in milliseconds.
    pub valhalla_throttle_ms: u64,
    pub valhalla_timeout_s: u64,
    /// Persistent KV store; both URL and API key must be present for the
    /// persistent incident store to be selected at startup.
    pub kv_url: Option<String>,
    pub kv_api_key: Option<String>,
    pub kv_store_name: String,
    pub hazard_max_age_hours: f64,
    pub default_buffer_km: f64,
    pub frontend_origin: Option<String>,
    pub allow_cleanup: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("HAVEN_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3001),
            valhalla_url: env::var("HAVEN_VALHALLA_URL")
                .unwrap_or_else(|_| haven_valhalla::DEFAULT_BASE_URL.to_string()),
            valhalla_throttle_ms: env::var("HAVEN_VALHALLA_THROTTLE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1100),
            valhalla_timeout_s: env::var("HAVEN_VALHALLA_TIMEOUT_S")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            kv_url: env::var("HAVEN_KV_URL").ok().filter(|s| !s.is_empty()),
            kv_api_key: env::var("HAVEN_KV_API_KEY").ok().filter(|s| !s.is_empty()),
            kv_store_name: env::var("HAVEN_KV_STORE")
                .unwrap_or_else(|_| "incident-storage".to_string()),
            hazard_max_age_hours: env::var("HAVEN_HAZARD_MAX_AGE_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(24.0),
            default_buffer_km: env::var("HAVEN_DEFAULT_BUFFER_KM")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2.0),
            frontend_origin: env::var("HAVEN_FRONTEND_ORIGIN")
                .ok()
                .filter(|s| !s.is_empty()),
            allow_cleanup: env::var("HAVEN_ALLOW_CLEANUP")
                .map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}
