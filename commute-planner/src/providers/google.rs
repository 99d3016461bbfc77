//! Google Maps adapter (geocoding + time-dependent routing).
//!
//! Google wraps every response in a `status` field; `"OK"` means
//! usable results follow. The Directions API wants the departure time
//! as Unix epoch seconds and reports a traffic-adjusted figure in
//! `duration_in_traffic` — when that field is absent the plain
//! `duration` is a traffic-free estimate.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{Coordinates, RouteInfo};

use super::error::ProviderError;
use super::RouteProvider;

/// Default base URL for the Google Maps APIs.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

/// Configuration for the Google Maps adapter.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// API key, passed as a query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to production Google)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GoogleConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    duration: Option<DurationValue>,
    /// Present only when Google computed a traffic-adjusted figure.
    duration_in_traffic: Option<DurationValue>,
}

#[derive(Debug, Deserialize)]
struct DurationValue {
    value: u32,
}

/// Google Maps API adapter.
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GoogleProvider {
    /// Create a new Google Maps adapter with the given configuration.
    pub fn new(config: GoogleConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config.base_url,
        })
    }

    fn geocode_url(&self, address: &str) -> String {
        format!(
            "{}/maps/api/geocode/json?address={}&key={}",
            self.base_url,
            urlencoding::encode(address),
            self.api_key
        )
    }

    fn directions_url(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        depart_at: DateTime<Tz>,
    ) -> String {
        format!(
            "{}/maps/api/directions/json?origin={}&destination={}&departure_time={}&key={}",
            self.base_url,
            origin,
            destination,
            depart_at.timestamp(),
            self.api_key
        )
    }

    async fn read_body(&self, url: &str) -> Result<String, ProviderError> {
        debug!(url = %url, "Google request");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited { provider: "Google" });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }

    /// Map a non-OK application status to the shared taxonomy.
    fn status_error(status: &str, query: &str) -> ProviderError {
        if status == "OVER_QUERY_LIMIT" {
            return ProviderError::RateLimited { provider: "Google" };
        }
        warn!(status = %status, query = %query, "Google reported no usable result");
        ProviderError::NoResult {
            query: query.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl RouteProvider for GoogleProvider {
    async fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError> {
        let url = self.geocode_url(address);
        let body = self.read_body(&url).await?;

        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Json {
                message: e.to_string(),
            })?;

        if parsed.status != "OK" {
            return Err(Self::status_error(&parsed.status, address));
        }

        let best = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NoResult {
                query: address.to_string(),
            })?;

        let location = best.geometry.location;
        Coordinates::new(location.lat, location.lng).map_err(|e| ProviderError::Json {
            message: e.to_string(),
        })
    }

    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        depart_at: DateTime<Tz>,
    ) -> Result<RouteInfo, ProviderError> {
        let url = self.directions_url(origin, destination, depart_at);
        let body = self.read_body(&url).await?;

        let parsed: DirectionsResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Json {
                message: e.to_string(),
            })?;

        let query = format!("{origin} -> {destination}");

        if parsed.status != "OK" {
            return Err(Self::status_error(&parsed.status, &query));
        }

        let leg = parsed
            .routes
            .into_iter()
            .next()
            .and_then(|route| route.legs.into_iter().next())
            .ok_or_else(|| ProviderError::NoResult { query })?;

        // Prefer the traffic-adjusted duration; fall back to the plain one
        // and record that traffic was not reflected.
        match (leg.duration_in_traffic, leg.duration) {
            (Some(traffic), _) => Ok(RouteInfo::new(traffic.value, true)),
            (None, Some(plain)) => Ok(RouteInfo::new(plain.value, false)),
            (None, None) => Err(ProviderError::Json {
                message: "leg carries neither duration_in_traffic nor duration".to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "Google"
    }
}
