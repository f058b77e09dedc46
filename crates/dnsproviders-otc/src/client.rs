//! HTTPS implementation of [`OtcDnsApi`]
//!
//! ## API Reference
//!
//! - OTC DNS (Designate v2): https://docs.otc.t-systems.com/domain-name-service/api-ref/
//! - List Zones: GET `/v2/zones?name=...`
//! - List Record Sets: GET `/v2/zones/:zone_id/recordsets?name=...`
//! - Create Record Set: POST `/v2/zones/:zone_id/recordsets`
//! - Update Record Set: PUT `/v2/zones/:zone_id/recordsets/:recordset_id`
//! - Delete Record Set: DELETE `/v2/zones/:zone_id/recordsets/:recordset_id`
//!
//! Listings are paginated through `links.next`, an absolute URL.

use crate::api::{OtcDnsApi, RecordSet, RecordSetCreate, RecordSetUpdate, Zone};
use crate::auth::{KeystoneAuthenticator, PasswordAuth, Session};
use async_trait::async_trait;
use dnsproviders_core::{Error, ProviderOptions, Result};
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;

const PROVIDER: &str = "opentelekomcloud";

#[derive(Debug, Default, Deserialize)]
struct Links {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ZonesPage {
    #[serde(default)]
    zones: Vec<Zone>,
    #[serde(default)]
    links: Links,
}

#[derive(Debug, Deserialize)]
struct RecordSetsPage {
    #[serde(default)]
    recordsets: Vec<RecordSet>,
    #[serde(default)]
    links: Links,
}

/// OTC DNS client authenticated through Keystone
#[derive(Debug)]
pub struct HttpOtcDnsApi {
    /// Keystone session source
    auth: KeystoneAuthenticator,

    /// Overrides the catalog's DNS endpoint
    endpoint_override: Option<String>,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl HttpOtcDnsApi {
    /// Create a client
    ///
    /// `options.api_endpoint` overrides the DNS endpoint from the service
    /// catalog; `options.identity_endpoint` the Keystone URL.
    pub fn new(auth: PasswordAuth, options: &ProviderOptions) -> Result<Self> {
        let client = options.build_http_client()?;
        Ok(Self {
            auth: KeystoneAuthenticator::new(auth, client.clone()),
            endpoint_override: options
                .api_endpoint
                .as_deref()
                .map(|e| e.trim_end_matches('/').to_string()),
            client,
        })
    }

    /// `{endpoint}/v2` for the current session
    fn base_url(&self, session: &Session) -> String {
        let endpoint = self
            .endpoint_override
            .as_deref()
            .unwrap_or(&session.dns_endpoint)
            .trim_end_matches('/');
        let endpoint = endpoint.strip_suffix("/v2").unwrap_or(endpoint);
        format!("{}/v2", endpoint)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        context: &str,
        session: &Session,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = request
            .header("X-Auth-Token", &session.token)
            .send()
            .await
            .map_err(|e| Error::http(format!("{}: HTTP request failed: {}", context, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());

        if !status.is_success() {
            return Err(Error::from_status(PROVIDER, context, status, &body));
        }

        // DELETE may answer with an empty body
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| {
            Error::provider(PROVIDER, format!("{}: failed to parse response: {}", context, e))
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        context: &str,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T> {
        let session = self.auth.session().await?;
        let url = format!("{}{}", self.base_url(&session), path);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(context, &session, request).await
    }

    /// GET `path?name=...` and every `links.next` page after it
    async fn list_pages<P, T>(
        &self,
        context: &str,
        path: &str,
        name: &str,
        split: impl Fn(P) -> (Vec<T>, Option<String>),
    ) -> Result<Vec<T>>
    where
        P: DeserializeOwned,
    {
        let session = self.auth.session().await?;
        let mut request = self.client.get(format!("{}{}", self.base_url(&session), path));
        if !name.is_empty() {
            request = request.query(&[("name", name)]);
        }

        let mut items = Vec::new();
        loop {
            let page: P = self.send(context, &session, request).await?;
            let (batch, next) = split(page);
            items.extend(batch);

            match next.filter(|n| !n.is_empty()) {
                Some(next) => request = self.client.get(next),
                None => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl OtcDnsApi for HttpOtcDnsApi {
    async fn list_zones(&self, name: &str) -> Result<Vec<Zone>> {
        let zones = self
            .list_pages("list zones", "/zones", name, |page: ZonesPage| {
                (page.zones, page.links.next)
            })
            .await?;
        tracing::debug!("Listed {} OTC zone(s) matching {}", zones.len(), name);
        Ok(zones)
    }

    async fn list_recordsets(&self, zone_id: &str, name: &str) -> Result<Vec<RecordSet>> {
        let path = format!("/zones/{}/recordsets", zone_id);
        let recordsets = self
            .list_pages("list record sets", &path, name, |page: RecordSetsPage| {
                (page.recordsets, page.links.next)
            })
            .await?;
        tracing::debug!("Listed {} OTC record set(s) matching {}", recordsets.len(), name);
        Ok(recordsets)
    }

    async fn create_recordset(&self, zone_id: &str, recordset: &RecordSetCreate) -> Result<RecordSet> {
        let body = serde_json::to_value(recordset)?;
        self.request(
            "create record set",
            Method::POST,
            &format!("/zones/{}/recordsets", zone_id),
            Some(&body),
        )
        .await
    }

    async fn update_recordset(
        &self,
        zone_id: &str,
        recordset_id: &str,
        update: &RecordSetUpdate,
    ) -> Result<RecordSet> {
        let body = serde_json::to_value(update)?;
        self.request(
            "update record set",
            Method::PUT,
            &format!("/zones/{}/recordsets/{}", zone_id, recordset_id),
            Some(&body),
        )
        .await
    }

    async fn delete_recordset(&self, zone_id: &str, recordset_id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .request(
                "delete record set",
                Method::DELETE,
                &format!("/zones/{}/recordsets/{}", zone_id, recordset_id),
                None,
            )
            .await?;
        Ok(())
    }
}
