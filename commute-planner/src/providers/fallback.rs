//! Primary-with-fallback composite adapter.

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::warn;

use crate::domain::{Coordinates, RouteInfo};

use super::error::ProviderError;
use super::RouteProvider;

/// Composes two adapters behind the plain provider contract.
///
/// Geocoding tries the primary first and falls back on any failure;
/// routing always goes straight to the fallback adapter, because the
/// primary slot is meant for a cheap geocoding-only backend. Since the
/// composite implements [`RouteProvider`] itself, composites nest.
pub struct FallbackProvider {
    primary: Box<dyn RouteProvider>,
    fallback: Box<dyn RouteProvider>,
}

impl FallbackProvider {
    /// Create a composite from a primary and a fallback adapter.
    pub fn new(primary: Box<dyn RouteProvider>, fallback: Box<dyn RouteProvider>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait::async_trait]
impl RouteProvider for FallbackProvider {
    async fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError> {
        match self.primary.geocode(address).await {
            Ok(coords) => Ok(coords),
            Err(e) => {
                warn!(
                    provider = self.primary.name(),
                    error = %e,
                    "primary geocoding failed, trying fallback"
                );
                // One fallback attempt; its result is returned as-is.
                self.fallback.geocode(address).await
            }
        }
    }

    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        depart_at: DateTime<Tz>,
    ) -> Result<RouteInfo, ProviderError> {
        self.fallback.route(origin, destination, depart_at).await
    }

    fn name(&self) -> &'static str {
        "fallback composite"
    }
}
