//! Configuration types for DNS providers
//!
//! A [`ProviderConfig`] names the backend, the zone and the credentials;
//! [`ProviderOptions`] carries the transport knobs shared by all adapters.

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default HTTP timeout for vendor API requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Supported DNS hosting backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Cloudflare API v4
    Cloudflare,
    /// Google Cloud DNS v1
    #[serde(rename = "googleclouddns")]
    GoogleCloudDns,
    /// Open Telekom Cloud DNS (OpenStack Designate v2)
    #[serde(rename = "opentelekomcloud")]
    OpenTelekomCloud,
}

impl ProviderType {
    /// All provider types, in a stable order
    pub const ALL: [ProviderType; 3] = [
        ProviderType::Cloudflare,
        ProviderType::GoogleCloudDns,
        ProviderType::OpenTelekomCloud,
    ];

    /// The provider type tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Cloudflare => "cloudflare",
            ProviderType::GoogleCloudDns => "googleclouddns",
            ProviderType::OpenTelekomCloud => "opentelekomcloud",
        }
    }

    /// Credential keys that must be present for this provider
    pub fn required_credential_keys(&self) -> &'static [&'static str] {
        match self {
            ProviderType::Cloudflare => &["token"],
            ProviderType::GoogleCloudDns => &["project_id"],
            ProviderType::OpenTelekomCloud => {
                &["region", "domainName", "tenantName", "username", "password"]
            }
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ProviderType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::unknown_provider_type(s))
    }
}

/// How a provider that caches zone lookups keeps that cache current
///
/// Only adapters that resolve zones from a construction-time map (Google
/// Cloud DNS) consult this policy; the others look zones up on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ZoneRefreshPolicy {
    /// Zones are listed once when the provider is built
    #[default]
    Never,
    /// Zones are listed again (once) when a lookup misses
    OnMiss,
    /// Zones are listed again before a lookup once the map is older than `secs`
    Interval {
        /// Maximum age of the zone map in seconds
        secs: u64,
    },
}

/// Transport and behavior options shared by all adapters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderOptions {
    /// Timeout for each vendor API request, in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Override for the vendor API base URL
    #[serde(default)]
    pub api_endpoint: Option<String>,

    /// Override for the identity (authentication) endpoint
    #[serde(default)]
    pub identity_endpoint: Option<String>,

    /// Zone cache refresh policy
    #[serde(default)]
    pub zone_refresh: ZoneRefreshPolicy,

    /// Pre-built HTTP client to use instead of constructing one
    #[serde(skip)]
    pub http_client: Option<reqwest::Client>,
}

impl ProviderOptions {
    /// Set the API base URL override
    pub fn with_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = Some(endpoint.into());
        self
    }

    /// Set the identity endpoint override
    pub fn with_identity_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.identity_endpoint = Some(endpoint.into());
        self
    }

    /// Set the zone refresh policy
    pub fn with_zone_refresh(mut self, policy: ZoneRefreshPolicy) -> Self {
        self.zone_refresh = policy;
        self
    }

    /// Use a pre-built HTTP client
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Request timeout as a [`Duration`]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Return the configured HTTP client, or build one with the timeout
    pub fn build_http_client(&self) -> Result<reqwest::Client> {
        if let Some(client) = &self.http_client {
            return Ok(client.clone());
        }

        reqwest::Client::builder()
            .timeout(self.http_timeout())
            .user_agent(concat!("dnsproviders/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.http_timeout_secs == 0 {
            return Err(Error::config("http_timeout_secs must be > 0"));
        }

        if let ZoneRefreshPolicy::Interval { secs: 0 } = self.zone_refresh {
            return Err(Error::config("zone refresh interval must be > 0"));
        }

        for endpoint in [&self.api_endpoint, &self.identity_endpoint]
            .into_iter()
            .flatten()
        {
            if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
                return Err(Error::config(format!(
                    "endpoint must use HTTP or HTTPS scheme. Got: {}",
                    endpoint
                )));
            }
        }

        Ok(())
    }
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout_secs(),
            api_endpoint: None,
            identity_endpoint: None,
            zone_refresh: ZoneRefreshPolicy::default(),
            http_client: None,
        }
    }
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

/// Everything needed to construct a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which backend to use
    #[serde(rename = "type")]
    pub provider_type: ProviderType,

    /// Target zone (informational for most adapters)
    #[serde(default)]
    pub zone: String,

    /// Vendor-specific credentials
    pub credentials: Credentials,

    /// Transport options
    #[serde(default)]
    pub options: ProviderOptions,
}

impl ProviderConfig {
    /// Create a configuration with default options
    pub fn new(provider_type: ProviderType, zone: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            provider_type,
            zone: zone.into(),
            credentials,
            options: ProviderOptions::default(),
        }
    }

    /// Replace the options
    pub fn with_options(mut self, options: ProviderOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse a configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the configuration
    ///
    /// Checks that the credential keys required by the provider type are
    /// present and that the options are usable.
    pub fn validate(&self) -> Result<()> {
        self.credentials.require_all(
            self.provider_type.as_str(),
            self.provider_type.required_credential_keys(),
        )?;
        self.options.validate()
    }
}
