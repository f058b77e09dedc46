//! OAuth2 access tokens for Cloud DNS
//!
//! Service-account credentials are exchanged for a bearer token with the
//! JWT-bearer grant (RFC 7523): an RS256 assertion signed with the account's
//! private key is POSTed to the account's `token_uri`. Tokens are cached and
//! refreshed shortly before they expire.
//!
//! ## Security Requirements
//!
//! - Private keys and access tokens NEVER appear in logs or Debug output

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use dnsproviders_core::{Credentials, Error, ProviderOptions, ProviderType, Result};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// OAuth2 scope granting read/write access to Cloud DNS
pub const CLOUD_DNS_SCOPE: &str = "https://www.googleapis.com/auth/ndev.clouddns.readwrite";

/// Token endpoint used when the credentials do not name one
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each assertion
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh a cached token this long before it expires
const REFRESH_MARGIN_SECS: i64 = 60;

const PROVIDER: &str = "googleclouddns";

/// Source of bearer tokens for Cloud DNS requests
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Return a currently valid access token
    async fn token(&self) -> Result<String>;
}

/// A fixed token, for callers that obtain tokens elsewhere
pub struct StaticTokenSource(String);

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticTokenSource").field(&"<REDACTED>").finish()
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// The parts of a service-account key needed to mint tokens
#[derive(Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub private_key_id: Option<String>,
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<REDACTED>")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Read the key from flattened service-account credentials
    ///
    /// `client_email` and `private_key` are required; `token_uri` falls back
    /// to [`DEFAULT_TOKEN_URI`].
    pub fn from_credentials(credentials: &Credentials) -> Result<Self> {
        let provider = ProviderType::GoogleCloudDns.as_str();
        Ok(Self {
            client_email: credentials.require(provider, "client_email")?.to_string(),
            private_key: credentials.require(provider, "private_key")?.to_string(),
            private_key_id: credentials
                .get("private_key_id")
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            token_uri: credentials
                .get("token_uri")
                .filter(|uri| !uri.is_empty())
                .unwrap_or(DEFAULT_TOKEN_URI)
                .to_string(),
        })
    }
}

/// JWT claims of a service-account assertion
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + TimeDelta::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Token source backed by a service-account key
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for ServiceAccountTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountTokenSource")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountTokenSource {
    /// Create a token source
    ///
    /// `options.identity_endpoint` overrides the key's `token_uri`.
    ///
    /// # Errors
    ///
    /// `Error::Config` if the private key is not a valid RSA PEM key.
    pub fn new(mut key: ServiceAccountKey, options: &ProviderOptions) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            Error::config(format!("invalid private_key in googleclouddns credentials: {}", e))
        })?;

        if let Some(endpoint) = &options.identity_endpoint {
            key.token_uri = endpoint.clone();
        }

        Ok(Self {
            key,
            encoding_key,
            client: options.build_http_client()?,
            cached: Mutex::new(None),
        })
    }

    /// Build and sign an assertion issued at `now`
    pub fn assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let claims = AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: CLOUD_DNS_SCOPE.to_string(),
            aud: self.key.token_uri.clone(),
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|e| Error::auth(format!("failed to sign service account assertion: {}", e)))
    }

    async fn exchange(&self, now: DateTime<Utc>) -> Result<CachedToken> {
        let assertion = self.assertion(now)?;

        tracing::debug!(token_uri = %self.key.token_uri, "requesting Cloud DNS access token");
        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| Error::http(format!("token exchange failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // invalid_grant and friends come back as 400
            if status == reqwest::StatusCode::BAD_REQUEST {
                return Err(Error::auth(format!(
                    "{}: token exchange rejected: {}",
                    PROVIDER, body
                )));
            }
            return Err(Error::from_status(PROVIDER, "token exchange", status, &body));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::auth(format!("invalid token response: {}", e)))?;

        let expires_at = TimeDelta::try_seconds(token.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                Error::auth(format!(
                    "invalid token response: expires_in {} out of range",
                    token.expires_in
                ))
            })?;

        Ok(CachedToken {
            value: token.access_token,
            expires_at,
        })
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokenSource {
    async fn token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let token = self.exchange(now).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }
}
