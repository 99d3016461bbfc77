//! TomTom adapter (geocoding + time-dependent routing).
//!
//! Geocoding embeds the address in the URL path; routing takes
//! colon-separated `lat,lon` pairs. With `traffic=true` TomTom's
//! `travelTimeInSeconds` includes traffic delay, and the response
//! carries a `trafficDelayInSeconds` field confirming it.

use chrono::{DateTime, SecondsFormat};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{Coordinates, RouteInfo};

use super::error::ProviderError;
use super::RouteProvider;

/// Default base URL for the TomTom API.
const DEFAULT_BASE_URL: &str = "https://api.tomtom.com";

/// Configuration for the TomTom adapter.
#[derive(Debug, Clone)]
pub struct TomTomConfig {
    /// API key, passed as a query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to production TomTom)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TomTomConfig {
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

/// Geocoding response: a ranked list of results with a position object.
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    position: Position,
}

#[derive(Debug, Deserialize)]
struct Position {
    lat: f64,
    lon: f64,
}

/// Routing response: a list of routes with a summary.
#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    summary: RouteSummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteSummary {
    travel_time_in_seconds: u32,
    /// Present only when the figure was computed with live traffic.
    traffic_delay_in_seconds: Option<u32>,
}

/// TomTom API adapter.
#[derive(Debug, Clone)]
pub struct TomTomProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TomTomProvider {
    /// Create a new TomTom adapter with the given configuration.
    pub fn new(config: TomTomConfig) -> Result<Self, ProviderError> {
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
            "{}/search/2/geocode/{}.json?key={}",
            self.base_url,
            urlencoding::encode(address),
            self.api_key
        )
    }

    fn route_url(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        depart_at: DateTime<Tz>,
    ) -> String {
        let depart_at = depart_at.to_rfc3339_opts(SecondsFormat::Secs, false);
        format!(
            "{}/routing/1/calculateRoute/{}:{}/json?key={}&departAt={}&traffic=true",
            self.base_url,
            origin,
            destination,
            self.api_key,
            urlencoding::encode(&depart_at)
        )
    }

    /// Common status triage for both endpoints.
    async fn read_body(&self, url: &str) -> Result<String, ProviderError> {
        debug!(url = %url, "TomTom request");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited { provider: "TomTom" });
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
}

#[async_trait::async_trait]
impl RouteProvider for TomTomProvider {
    async fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError> {
        let url = self.geocode_url(address);
        let body = self.read_body(&url).await?;

        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Json {
                message: e.to_string(),
            })?;

        let Some(best) = parsed.results.into_iter().next() else {
            warn!(address = %address, "TomTom geocoding found no match");
            return Err(ProviderError::NoResult {
                query: address.to_string(),
            });
        };

        Coordinates::new(best.position.lat, best.position.lon).map_err(|e| ProviderError::Json {
            message: e.to_string(),
        })
    }

    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        depart_at: DateTime<Tz>,
    ) -> Result<RouteInfo, ProviderError> {
        let url = self.route_url(origin, destination, depart_at);
        let body = self.read_body(&url).await?;

        let parsed: RouteResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Json {
                message: e.to_string(),
            })?;

        let Some(route) = parsed.routes.into_iter().next() else {
            warn!(%origin, %destination, "TomTom found no route");
            return Err(ProviderError::NoResult {
                query: format!("{origin}:{destination}"),
            });
        };

        // A missing trafficDelayInSeconds means TomTom silently served a
        // traffic-free estimate for this departure time.
        Ok(RouteInfo::new(
            route.summary.travel_time_in_seconds,
            route.summary.traffic_delay_in_seconds.is_some(),
        ))
    }

    fn name(&self) -> &'static str {
        "TomTom"
    }
}
