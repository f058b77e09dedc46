//! Error types for DNS provider operations
//!
//! Every adapter reports failures through this one enum so callers can
//! match on the condition (zone missing, ambiguous record, ...) without
//! knowing which vendor produced it.

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for DNS provider operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing credential keys, invalid options)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The provider type tag is not known (or not compiled in)
    #[error("Unknown DNS provider type: {0}")]
    UnknownProviderType(String),

    /// The zone could not be located at the provider
    #[error("Could not find zone by the given name: {0}")]
    ZoneNotFound(String),

    /// No record matched where exactly one was required
    #[error("Could not find record {name} in zone {zone}")]
    RecordNotFound {
        /// Zone that was searched
        zone: String,
        /// Record name that was searched for
        name: String,
    },

    /// More than one record matched where exactly one was required
    #[error("Found {count} matching DNS records with name {name} in zone {zone}")]
    AmbiguousMatch {
        /// Zone that was searched
        zone: String,
        /// Record name that was searched for
        name: String,
        /// Number of matching records
        count: usize,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// HTTP transport errors (connection, timeout, body decoding)
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unknown provider type error
    pub fn unknown_provider_type(name: impl Into<String>) -> Self {
        Self::UnknownProviderType(name.into())
    }

    /// Create a zone-not-found error
    pub fn zone_not_found(zone: impl Into<String>) -> Self {
        Self::ZoneNotFound(zone.into())
    }

    /// Create a record-not-found error
    pub fn record_not_found(zone: impl Into<String>, name: impl Into<String>) -> Self {
        Self::RecordNotFound {
            zone: zone.into(),
            name: name.into(),
        }
    }

    /// Create an ambiguous-match error
    pub fn ambiguous_match(zone: impl Into<String>, name: impl Into<String>, count: usize) -> Self {
        Self::AmbiguousMatch {
            zone: zone.into(),
            name: name.into(),
            count,
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Map a non-success HTTP status from a vendor API into an error
    ///
    /// `context` names the call that failed (e.g. "list zones") and is
    /// included in the message together with the response body.
    pub fn from_status(provider: &str, context: &str, status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 | 403 => Self::auth(format!(
                "{provider}: {context}: invalid credentials or insufficient permissions (status {status})"
            )),
            429 => Self::provider(
                provider,
                format!("{context}: rate limit exceeded (status {status})"),
            ),
            500..=599 => Self::provider(
                provider,
                format!("{context}: server error {status} - {body}"),
            ),
            _ => Self::provider(provider, format!("{context}: {status} - {body}")),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}
