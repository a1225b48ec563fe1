//! Valhalla API HTTP client with a process-wide request throttle.

use std::time::Duration;

use haven_core::Location;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::trip::{Costing, DirectionsOptions, ExcludeLocations, RouteRequest, RouteResponse};

/// Public Valhalla instance used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://valhalla1.openstreetmap.de";

/// The provider enforces roughly one call per caller per second; 1.1 s
/// keeps us safely under it.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(1100);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A routing call failed.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// The request exceeded the client timeout.
    #[error("Valhalla request timed out")]
    Timeout,
    /// Transport-level failure (connect, DNS, body read).
    #[error("Valhalla request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// Non-success HTTP status from the provider.
    #[error("Valhalla API error: {status} {message}")]
    Status { status: u16, message: String },
    /// The HTTP call succeeded but the payload carries a failure status.
    #[error("Route calculation failed: {message}")]
    Trip { status: i64, message: String },
}

impl RoutingError {
    /// Timeout/gateway-type failures, eligible for the one retry without
    /// exclusions.
    pub fn is_gateway_error(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::Status { status, .. } => matches!(status, 502 | 503 | 504),
            _ => false,
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

/// Optimal and baseline routes for the same corridor.
#[derive(Debug, Clone)]
pub struct RouteOptions {
    pub optimal: RouteResponse,
    pub baseline: RouteResponse,
    /// Count of exclusions supplied to the optimal call, by definition,
    /// not a measured diff between the two paths.
    pub avoided_incidents: usize,
}

/// HTTP client for the Valhalla `/route` endpoint.
///
/// The last-request instant is owned by the client and guarded by an async
/// mutex; concurrent callers serialize on it so the provider never sees
/// two calls inside the minimum interval.
pub struct ValhallaClient {
    client: reqwest::Client,
    base_url: String,
    min_request_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl ValhallaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, MIN_REQUEST_INTERVAL, REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit throttle interval and request
    /// timeout (both configurable from the server environment).
    pub fn with_options(
        base_url: impl Into<String>,
        min_request_interval: Duration,
        request_timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(request_timeout)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
            min_request_interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Wait out the minimum interval since the previous provider call.
    ///
    /// The guard is held across the sleep, so callers queue instead of
    /// racing on the same "time since last call" reading.
    async fn throttle(&self) {
        let mut last_request = self.last_request.lock().await;
        if let Some(previous) = *last_request {
            let elapsed = previous.elapsed();
            if elapsed < self.min_request_interval {
                let wait = self.min_request_interval - elapsed;
                debug!("Throttling Valhalla request: waiting {:?}", wait);
                tokio::time::sleep(wait).await;
            }
        }
        *last_request = Some(Instant::now());
    }

    /// Calculate a route.
    ///
    /// Checks both failure layers: the HTTP status of the call, then the
    /// provider's own `trip.status` inside the payload.
    pub async fn route(&self, request: &RouteRequest) -> Result<RouteResponse, RoutingError> {
        self.throttle().await;

        let url = format!("{}/route", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(RoutingError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RoutingError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let payload: RouteResponse = response
            .json()
            .await
            .map_err(RoutingError::from_reqwest)?;

        if payload.trip.status != 0 {
            return Err(RoutingError::Trip {
                status: payload.trip.status,
                message: payload.trip.status_message.clone(),
            });
        }

        Ok(payload)
    }

    /// Calculate a route between `start` and `end`, routing around the
    /// given exclusion points.
    pub async fn route_with_exclusions(
        &self,
        start: Location,
        end: Location,
        exclusions: &[Location],
        costing: Costing,
    ) -> Result<RouteResponse, RoutingError> {
        let exclude = if exclusions.is_empty() {
            None
        } else {
            Some(ExcludeLocations {
                locations: exclusions.to_vec(),
            })
        };

        let request = RouteRequest {
            locations: vec![start, end],
            costing,
            exclude,
            directions_options: DirectionsOptions::default(),
        };

        self.route(&request).await
    }

    /// Calculate the exclusion-aware route and a no-exclusion baseline.
    ///
    /// The two calls run sequentially, never concurrently, so the shared
    /// throttle stays honest. If the optimal call fails with a
    /// timeout/gateway-type error, one retry without exclusions is reused
    /// as both results; if that retry also fails, the original error
    /// propagates.
    pub async fn route_options(
        &self,
        start: Location,
        end: Location,
        exclusions: &[Location],
        costing: Costing,
    ) -> Result<RouteOptions, RoutingError> {
        info!(
            "Calculating optimal route with {} exclusions",
            exclusions.len()
        );
        let optimal = match self
            .route_with_exclusions(start, end, exclusions, costing)
            .await
        {
            Ok(route) => route,
            Err(err) if err.is_gateway_error() => {
                warn!("Valhalla unavailable ({}), retrying without exclusions", err);
                match self.route_with_exclusions(start, end, &[], costing).await {
                    Ok(route) => {
                        return Ok(RouteOptions {
                            optimal: route.clone(),
                            baseline: route,
                            avoided_incidents: 0,
                        });
                    }
                    Err(retry_err) => {
                        warn!("Fallback route also failed: {}", retry_err);
                        return Err(err);
                    }
                }
            }
            Err(err) => return Err(err),
        };

        info!("Calculating baseline route without exclusions");
        let baseline = self
            .route_with_exclusions(start, end, &[], costing)
            .await?;

        Ok(RouteOptions {
            optimal,
            baseline,
            avoided_incidents: exclusions.len(),
        })
    }
}
