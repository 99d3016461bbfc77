//! Environment configuration and provider selection.
//!
//! API keys are read from environment variables (a `.env` file is
//! honored). Credential and timezone problems are fatal: they abort
//! the run at startup, before any network activity.

use chrono_tz::Tz;

use crate::providers::{
    FallbackProvider, GoogleConfig, GoogleProvider, LocationIqConfig, LocationIqProvider,
    ProviderError, RouteProvider, TomTomConfig, TomTomProvider,
};

pub const TOMTOM_KEY_VAR: &str = "TOMTOM_API_KEY";
pub const GOOGLE_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const LOCATIONIQ_KEY_VAR: &str = "LOCATIONIQ_API_KEY";
pub const TIMEZONE_VAR: &str = "COMMUTE_TZ";
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// Fatal configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required API key is absent from the environment
    #[error("required environment variable {0} is not set")]
    MissingKey(&'static str),

    /// The configured timezone is not a valid IANA name
    #[error(
        "invalid timezone {0:?}: use an IANA name such as \"America/New_York\" or \"Europe/London\""
    )]
    InvalidTimezone(String),

    /// An HTTP client could not be constructed
    #[error("failed to initialize the {provider} client: {source}")]
    ClientInit {
        provider: &'static str,
        #[source]
        source: ProviderError,
    },
}

/// Which mapping backend (or combination) to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderChoice {
    /// Google Maps for geocoding and routing (the default).
    Google,
    /// TomTom for geocoding and routing.
    TomTom,
    /// LocationIQ geocoding paired with Google Maps routing via the
    /// fallback composite.
    LocationIqWithGoogle,
}

impl ProviderChoice {
    /// Parse a numeric menu choice.
    pub fn from_menu(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Google),
            "2" => Some(Self::TomTom),
            "3" => Some(Self::LocationIqWithGoogle),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Google => "Google Maps",
            Self::TomTom => "TomTom",
            Self::LocationIqWithGoogle => "LocationIQ geocoding with Google Maps routing",
        }
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingKey(name))
}

/// Resolve the commute timezone from `COMMUTE_TZ`, defaulting to
/// America/Los_Angeles. An unparseable name is fatal.
pub fn commute_timezone() -> Result<Tz, ConfigError> {
    let name = std::env::var(TIMEZONE_VAR).unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string());
    name.parse().map_err(|_| ConfigError::InvalidTimezone(name))
}

/// Build the selected provider, failing fast when a credential it
/// needs is missing.
pub fn build_provider(choice: ProviderChoice) -> Result<Box<dyn RouteProvider>, ConfigError> {
    match choice {
        ProviderChoice::Google => Ok(Box::new(google_provider()?)),
        ProviderChoice::TomTom => {
            let key = require_env(TOMTOM_KEY_VAR)?;
            let provider =
                TomTomProvider::new(TomTomConfig::new(key)).map_err(|source| {
                    ConfigError::ClientInit {
                        provider: "TomTom",
                        source,
                    }
                })?;
            Ok(Box::new(provider))
        }
        ProviderChoice::LocationIqWithGoogle => {
            let key = require_env(LOCATIONIQ_KEY_VAR)?;
            let primary =
                LocationIqProvider::new(LocationIqConfig::new(key)).map_err(|source| {
                    ConfigError::ClientInit {
                        provider: "LocationIQ",
                        source,
                    }
                })?;
            let fallback = google_provider()?;
            Ok(Box::new(FallbackProvider::new(
                Box::new(primary),
                Box::new(fallback),
            )))
        }
    }
}

fn google_provider() -> Result<GoogleProvider, ConfigError> {
    let key = require_env(GOOGLE_KEY_VAR)?;
    GoogleProvider::new(GoogleConfig::new(key)).map_err(|source| ConfigError::ClientInit {
        provider: "Google",
        source,
    })
}
