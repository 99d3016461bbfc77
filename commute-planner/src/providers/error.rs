//! Provider error taxonomy.

/// Errors from a mapping provider.
///
/// Every variant except `Unsupported` is a per-call condition the
/// caller treats uniformly as a failed lookup. `Unsupported` indicates
/// a caller or configuration mistake (routing requested from a
/// geocoding-only backend) and is raised without any network activity.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Backend responded successfully but found no match or route
    #[error("no result for {query}")]
    NoResult { query: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Rate limited by the backend (HTTP 429)
    #[error("rate limited by {provider}")]
    RateLimited { provider: &'static str },

    /// Operation not offered by this backend
    #[error("{provider} does not support {operation}")]
    Unsupported {
        provider: &'static str,
        operation: &'static str,
    },
}
