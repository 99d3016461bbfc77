//! Geographic coordinates, validated at construction.

use std::fmt;

/// Error returned for coordinates outside the valid range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("coordinates out of range: latitude {latitude}, longitude {longitude}")]
pub struct InvalidCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A geographic point in the normalized representation shared by all
/// provider adapters.
///
/// Latitude must lie in [-90, 90] and longitude in [-180, 180]; the
/// constructor rejects anything else, so code that receives a
/// `Coordinates` can trust its validity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinates {
    /// Renders as `lat,lon`, the form the routing backends embed in URLs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
