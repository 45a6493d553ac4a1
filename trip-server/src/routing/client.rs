//! Routing provider HTTP client.
//!
//! Issues one directions request per point-to-point lookup and reduces
//! the response to a duration in whole minutes. All failure modes come
//! back as `RoutingError`; no retries are attempted here.

use async_trait::async_trait;

use crate::domain::LatLng;

use super::DurationSource;
use super::error::RoutingError;
use super::types::DirectionsResponse;

/// Default base URL for the directions provider.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Default travel mode for lookups.
const DEFAULT_MODE: &str = "driving";

/// Configuration for the routing client.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// API key passed as a query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to the production provider)
    pub base_url: String,
    /// Travel mode sent with every request
    pub mode: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RoutingConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            mode: DEFAULT_MODE.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing or a substitute provider).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom travel mode.
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Directions API client.
///
/// Any provider speaking the same contract (top-level status plus a
/// route list whose first leg carries a duration in seconds) is a valid
/// substitute via `with_base_url`.
#[derive(Debug, Clone)]
pub struct RoutingClient {
    http: reqwest::Client,
    base_url: String,
    mode: String,
    api_key: String,
}

impl RoutingClient {
    /// Create a new routing client with the given configuration.
    pub fn new(config: RoutingConfig) -> Result<Self, RoutingError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            mode: config.mode,
            api_key: config.api_key,
        })
    }

    /// Look up the travel duration between two points, in whole minutes.
    ///
    /// Issues a single GET request. The provider reports seconds; the
    /// result is rounded half-up to minutes.
    pub async fn duration(
        &self,
        origin: LatLng,
        destination: LatLng,
    ) -> Result<u32, RoutingError> {
        let url = format!("{}/directions/json", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("origin", origin.to_string()),
                ("destination", destination.to_string()),
                ("mode", self.mode.clone()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let directions: DirectionsResponse =
            serde_json::from_str(&body).map_err(|e| RoutingError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        if directions.status != "OK" {
            return Err(RoutingError::Provider {
                status: directions.status,
                message: directions.error_message,
            });
        }

        let seconds = directions
            .routes
            .first()
            .and_then(|route| route.legs.first())
            .and_then(|leg| leg.duration.as_ref())
            .map(|duration| duration.value)
            .ok_or(RoutingError::NoRoute)?;

        Ok(minutes_from_seconds(seconds))
    }
}

#[async_trait]
impl DurationSource for RoutingClient {
    async fn travel_minutes(
        &self,
        origin: LatLng,
        destination: LatLng,
    ) -> Result<u32, RoutingError> {
        self.duration(origin, destination).await
    }
}

/// Convert provider seconds to whole minutes, rounding half up.
pub(crate) fn minutes_from_seconds(seconds: u64) -> u32 {
    (seconds as f64 / 60.0).round() as u32
}
