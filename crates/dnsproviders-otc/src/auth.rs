//! Keystone v3 password authentication
//!
//! A session is a project-scoped token plus the DNS endpoint from the
//! service catalog. Sessions are cached and renewed when they come within
//! five minutes of expiry.
//!
//! ## Security Requirements
//!
//! - Passwords and tokens NEVER appear in logs or Debug output

use chrono::{DateTime, TimeDelta, Utc};
use dnsproviders_core::{Credentials, Error, ProviderOptions, ProviderType, Result};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;

pub const CREDENTIAL_KEY_REGION: &str = "region";
pub const CREDENTIAL_KEY_DOMAIN_NAME: &str = "domainName";
pub const CREDENTIAL_KEY_TENANT_NAME: &str = "tenantName";
pub const CREDENTIAL_KEY_USERNAME: &str = "username";
pub const CREDENTIAL_KEY_PASSWORD: &str = "password";

/// Renew a cached session this long before it expires
const RENEW_MARGIN_SECS: i64 = 300;

const PROVIDER: &str = "opentelekomcloud";

/// Keystone identity endpoint for a region
pub fn identity_endpoint(region: &str) -> String {
    format!("https://iam.{}.otc.t-systems.com/v3", region)
}

/// DNS endpoint used when the catalog does not list one
pub fn default_dns_endpoint(region: &str) -> String {
    format!("https://dns.{}.otc.t-systems.com", region)
}

/// Password credentials scoped to a project
#[derive(Clone)]
pub struct PasswordAuth {
    pub identity_endpoint: String,
    pub region: String,
    pub domain_name: String,
    pub tenant_name: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for PasswordAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordAuth")
            .field("identity_endpoint", &self.identity_endpoint)
            .field("region", &self.region)
            .field("domain_name", &self.domain_name)
            .field("tenant_name", &self.tenant_name)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

impl PasswordAuth {
    /// Read credentials; every key is required
    ///
    /// `options.identity_endpoint` overrides the regional Keystone URL.
    pub fn from_credentials(credentials: &Credentials, options: &ProviderOptions) -> Result<Self> {
        let provider = ProviderType::OpenTelekomCloud.as_str();
        credentials.require_all(provider, ProviderType::OpenTelekomCloud.required_credential_keys())?;

        let region = credentials.require(provider, CREDENTIAL_KEY_REGION)?.to_string();
        let identity_endpoint = options
            .identity_endpoint
            .clone()
            .unwrap_or_else(|| identity_endpoint(&region));

        Ok(Self {
            identity_endpoint: identity_endpoint.trim_end_matches('/').to_string(),
            domain_name: credentials.require(provider, CREDENTIAL_KEY_DOMAIN_NAME)?.to_string(),
            tenant_name: credentials.require(provider, CREDENTIAL_KEY_TENANT_NAME)?.to_string(),
            username: credentials.require(provider, CREDENTIAL_KEY_USERNAME)?.to_string(),
            password: credentials.require(provider, CREDENTIAL_KEY_PASSWORD)?.to_string(),
            region,
        })
    }

    fn request_body(&self) -> serde_json::Value {
        json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "name": self.username,
                            "password": self.password,
                            "domain": { "name": self.domain_name }
                        }
                    }
                },
                "scope": {
                    "project": {
                        "name": self.tenant_name,
                        "domain": { "name": self.domain_name }
                    }
                }
            }
        })
    }
}

/// An authenticated, project-scoped session
#[derive(Clone)]
pub struct Session {
    /// Value for the `X-Auth-Token` header
    pub token: String,
    /// DNS API base URL (without `/v2`)
    pub dns_endpoint: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<REDACTED>")
            .field("dns_endpoint", &self.dns_endpoint)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Session {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + TimeDelta::seconds(RENEW_MARGIN_SECS) < self.expires_at
    }
}

#[derive(Deserialize)]
struct TokenBody {
    token: TokenInfo,
}

#[derive(Deserialize)]
struct TokenInfo {
    expires_at: DateTime<Utc>,
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogEntry {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<CatalogEndpoint>,
}

#[derive(Deserialize)]
struct CatalogEndpoint {
    interface: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    region_id: Option<String>,
    url: String,
}

/// Find the public DNS endpoint for `region` in a service catalog
fn dns_endpoint_from_catalog(catalog: &[CatalogEntry], region: &str) -> Option<String> {
    let public: Vec<&CatalogEndpoint> = catalog
        .iter()
        .filter(|entry| entry.service_type == "dns")
        .flat_map(|entry| entry.endpoints.iter())
        .filter(|endpoint| endpoint.interface == "public")
        .collect();

    public
        .iter()
        .find(|e| e.region.as_deref() == Some(region) || e.region_id.as_deref() == Some(region))
        .or_else(|| public.first())
        .map(|e| e.url.clone())
}

/// Issues and caches Keystone sessions
pub struct KeystoneAuthenticator {
    auth: PasswordAuth,
    client: reqwest::Client,
    cached: Mutex<Option<Session>>,
}

impl std::fmt::Debug for KeystoneAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeystoneAuthenticator")
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl KeystoneAuthenticator {
    pub fn new(auth: PasswordAuth, client: reqwest::Client) -> Self {
        Self {
            auth,
            client,
            cached: Mutex::new(None),
        }
    }

    /// Return a fresh session, authenticating if needed
    pub async fn session(&self) -> Result<Session> {
        let mut cached = self.cached.lock().await;

        if let Some(session) = cached.as_ref().filter(|s| s.is_fresh(Utc::now())) {
            return Ok(session.clone());
        }

        let session = self.authenticate().await?;
        *cached = Some(session.clone());
        Ok(session)
    }

    async fn authenticate(&self) -> Result<Session> {
        let url = format!("{}/auth/tokens", self.auth.identity_endpoint);
        tracing::debug!(
            url = %url,
            user = %self.auth.username,
            project = %self.auth.tenant_name,
            "authenticating with Keystone"
        );

        let response = self
            .client
            .post(&url)
            .json(&self.auth.request_body())
            .send()
            .await
            .map_err(|e| Error::http(format!("failed to initialize authenticated client: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::from_status(PROVIDER, "authenticate", status, &body));
        }

        let token = response
            .headers()
            .get("x-subject-token")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| Error::auth("Keystone response carried no X-Subject-Token header"))?;

        let body: TokenBody = response
            .json()
            .await
            .map_err(|e| Error::auth(format!("invalid Keystone token response: {}", e)))?;

        let dns_endpoint = dns_endpoint_from_catalog(&body.token.catalog, &self.auth.region)
            .unwrap_or_else(|| default_dns_endpoint(&self.auth.region));

        tracing::debug!(dns_endpoint = %dns_endpoint, expires_at = %body.token.expires_at, "Keystone session established");
        Ok(Session {
            token,
            dns_endpoint,
            expires_at: body.token.expires_at,
        })
    }
}
