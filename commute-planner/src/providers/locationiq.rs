//! LocationIQ adapter (geocoding only).
//!
//! LocationIQ's search endpoint returns candidate locations with
//! string-typed `lat`/`lon` fields, and publishes a limit of one
//! request per second (HTTP 429 on violation). The adapter paces
//! itself slightly above that limit between consecutive calls, so
//! callers never have to think about it. Routing is not offered.

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::{Coordinates, RouteInfo};

use super::error::ProviderError;
use super::RouteProvider;

/// Default base URL for the LocationIQ API.
const DEFAULT_BASE_URL: &str = "https://us1.locationiq.com";

/// Published limit is one request per second; stay a little above it.
const DEFAULT_MIN_CALL_INTERVAL: Duration = Duration::from_millis(1100);

/// Configuration for the LocationIQ adapter.
#[derive(Debug, Clone)]
pub struct LocationIqConfig {
    /// API key, passed as a query parameter
    pub api_key: String,
    /// Base URL for the API (defaults to production LocationIQ)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Minimum spacing between consecutive requests
    pub min_call_interval: Duration,
}

impl LocationIqConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            min_call_interval: DEFAULT_MIN_CALL_INTERVAL,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom pacing interval (for testing).
    pub fn with_min_call_interval(mut self, interval: Duration) -> Self {
        self.min_call_interval = interval;
        self
    }
}

/// One candidate location; coordinates arrive as numeric strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// LocationIQ API adapter.
///
/// Implements only the geocoding half of the provider contract; pair
/// it with a full-capability backend via
/// [`FallbackProvider`](super::FallbackProvider) to get routing.
#[derive(Debug, Clone)]
pub struct LocationIqProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    min_interval: Duration,
    last_call: Arc<Mutex<Option<Instant>>>,
}

impl LocationIqProvider {
    /// Create a new LocationIQ adapter with the given configuration.
    pub fn new(config: LocationIqConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config.base_url,
            min_interval: config.min_call_interval,
            last_call: Arc::new(Mutex::new(None)),
        })
    }

    fn search_url(&self, address: &str) -> String {
        format!(
            "{}/v1/search?key={}&q={}&format=json",
            self.base_url,
            self.api_key,
            urlencoding::encode(address)
        )
    }

    /// Block until at least `min_interval` has passed since the last call.
    async fn pace(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn parse_hit(hit: &SearchHit, query: &str) -> Result<Coordinates, ProviderError> {
        let lat: f64 = hit.lat.parse().map_err(|_| ProviderError::Json {
            message: format!("non-numeric latitude {:?} for {query}", hit.lat),
        })?;
        let lon: f64 = hit.lon.parse().map_err(|_| ProviderError::Json {
            message: format!("non-numeric longitude {:?} for {query}", hit.lon),
        })?;

        Coordinates::new(lat, lon).map_err(|e| ProviderError::Json {
            message: e.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl RouteProvider for LocationIqProvider {
    async fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError> {
        self.pace().await;

        let url = self.search_url(address);
        debug!(url = %url, "LocationIQ request");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                provider: "LocationIQ",
            });
        }

        // LocationIQ answers 404 when it cannot geocode the query.
        if status == reqwest::StatusCode::NOT_FOUND {
            warn!(address = %address, "LocationIQ geocoding found no match");
            return Err(ProviderError::NoResult {
                query: address.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let hits: Vec<SearchHit> = serde_json::from_str(&body).map_err(|e| ProviderError::Json {
            message: e.to_string(),
        })?;

        let Some(best) = hits.first() else {
            warn!(address = %address, "LocationIQ geocoding found no match");
            return Err(ProviderError::NoResult {
                query: address.to_string(),
            });
        };

        Self::parse_hit(best, address)
    }

    async fn route(
        &self,
        _origin: Coordinates,
        _destination: Coordinates,
        _depart_at: DateTime<Tz>,
    ) -> Result<RouteInfo, ProviderError> {
        // Configuration mistake, not a transient condition: fail
        // immediately, no network call.
        warn!("routing requested from the geocoding-only LocationIQ backend");
        Err(ProviderError::Unsupported {
            provider: "LocationIQ",
            operation: "routing",
        })
    }

    fn name(&self) -> &'static str {
        "LocationIQ"
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn provider() -> LocationIqProvider {
        LocationIqProvider::new(LocationIqConfig::new("test-key")).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = LocationIqConfig::new("test-key");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.min_call_interval, Duration::from_millis(1100));
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn search_url_encodes_query() {
        let url = provider().search_url("Hawthorne, CA");

        assert!(url.contains("/v1/search"));
        assert!(url.contains("q=Hawthorne%2C%20CA"));
        assert!(url.contains("format=json"));
    }

    #[test]
    fn parses_string_coordinates() {
        let hit = SearchHit {
            lat: "33.92126".to_string(),
            lon: "-118.32822".to_string(),
        };

        let coords = LocationIqProvider::parse_hit(&hit, "test").unwrap();
        assert!((coords.latitude() - 33.92126).abs() < f64::EPSILON);
        assert!((coords.longitude() + 118.32822).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_non_numeric_coordinates() {
        let hit = SearchHit {
            lat: "not-a-number".to_string(),
            lon: "-118.3".to_string(),
        };

        let err = LocationIqProvider::parse_hit(&hit, "test").unwrap_err();
        assert!(matches!(err, ProviderError::Json { .. }));
    }

    #[test]
    fn deserialize_search_hits() {
        let json = r#"[
            {"place_id": "331486", "lat": "33.92126", "lon": "-118.32822",
             "display_name": "Rocket Road, Hawthorne, CA"},
            {"place_id": "331487", "lat": "33.90000", "lon": "-118.30000",
             "display_name": "Somewhere else"}
        ]"#;

        let hits: Vec<SearchHit> = serde_json::from_str(json).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].lat, "33.92126");
    }

    #[tokio::test]
    async fn route_is_unsupported() {
        // Unroutable base URL proves no network call is attempted.
        let config = LocationIqConfig::new("test-key").with_base_url("http://127.0.0.1:1");
        let provider = LocationIqProvider::new(config).unwrap();

        let origin = Coordinates::new(33.92, -118.33).unwrap();
        let destination = Coordinates::new(33.68, -117.83).unwrap();
        let depart_at = chrono_tz::America::Los_Angeles
            .with_ymd_and_hms(2026, 8, 7, 6, 30, 0)
            .unwrap();

        let err = provider
            .route(origin, destination, depart_at)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProviderError::Unsupported {
                provider: "LocationIQ",
                operation: "routing",
            }
        ));
    }
}
