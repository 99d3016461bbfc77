//! Mapping provider adapters.
//!
//! One adapter per backend, each converting between the normalized
//! domain types and its backend's wire format and mapping
//! backend-specific failures into the shared [`ProviderError`]
//! taxonomy. [`FallbackProvider`] composes two adapters behind the
//! same contract, so a composite can stand in anywhere a plain
//! adapter is expected.

mod error;
mod fallback;
mod google;
mod locationiq;
mod tomtom;

pub use error::ProviderError;
pub use fallback::FallbackProvider;
pub use google::{GoogleConfig, GoogleProvider};
pub use locationiq::{LocationIqConfig, LocationIqProvider};
pub use tomtom::{TomTomConfig, TomTomProvider};

use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;

use crate::domain::{Coordinates, RouteInfo};

/// Contract shared by every mapping backend.
///
/// Adapters are stateless apart from configuration and hold no request
/// state between calls; the scanner issues calls strictly one at a
/// time, so implementations need not support concurrent use.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Convert a free-text address into normalized coordinates.
    ///
    /// All failure modes (transport, no match, rate limit, malformed
    /// response) surface uniformly as a [`ProviderError`]; callers
    /// treat them as "no result" and adapters log the cause.
    async fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError>;

    /// Request a time-dependent route between two points.
    ///
    /// The result's traffic flag is `true` only when the backend
    /// confirmed traffic-adjusted figures for this departure time.
    /// Geocoding-only backends return [`ProviderError::Unsupported`]
    /// without attempting a network call.
    async fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        depart_at: DateTime<Tz>,
    ) -> Result<RouteInfo, ProviderError>;

    /// Short provider name for diagnostics.
    fn name(&self) -> &'static str;
}
