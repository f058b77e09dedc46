//! HTTPS implementation of [`CloudDnsApi`]
//!
//! ## API Reference
//!
//! - Cloud DNS v1: https://cloud.google.com/dns/docs/reference/rest/v1
//! - List Managed Zones: GET `/projects/:project/managedZones?pageToken=...`
//! - List Record Sets: GET `/projects/:project/managedZones/:zone/rrsets?pageToken=...`
//! - Patch Record Set: PATCH `/projects/:project/managedZones/:zone/rrsets/:name/:type`
//! - Create Change: POST `/projects/:project/managedZones/:zone/changes`

use crate::api::{Change, CloudDnsApi, ManagedZone, ResourceRecordSet};
use crate::auth::TokenSource;
use async_trait::async_trait;
use dnsproviders_core::{Error, ProviderOptions, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Cloud DNS API base URL
pub const CLOUD_DNS_API_BASE: &str = "https://dns.googleapis.com/dns/v1";

const PROVIDER: &str = "googleclouddns";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManagedZonesPage {
    #[serde(default)]
    managed_zones: Vec<ManagedZone>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RrsetsPage {
    #[serde(default)]
    rrsets: Vec<ResourceRecordSet>,
    next_page_token: Option<String>,
}

/// Cloud DNS v1 client for one project
pub struct HttpCloudDnsApi {
    /// GCP project ID
    project: String,

    /// API base URL without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Bearer token source
    tokens: Arc<dyn TokenSource>,
}

impl std::fmt::Debug for HttpCloudDnsApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCloudDnsApi")
            .field("project", &self.project)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpCloudDnsApi {
    /// Create a new client
    ///
    /// `options.api_endpoint` overrides the API base URL.
    pub fn new(
        project: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
        options: &ProviderOptions,
    ) -> Result<Self> {
        let project = project.into();
        if project.is_empty() {
            return Err(Error::config("Google Cloud DNS project_id cannot be empty"));
        }

        let base_url = options
            .api_endpoint
            .as_deref()
            .unwrap_or(CLOUD_DNS_API_BASE)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            project,
            base_url,
            client: options.build_http_client()?,
            tokens,
        })
    }

    fn zone_url(&self, managed_zone: &str) -> String {
        format!(
            "{}/projects/{}/managedZones/{}",
            self.base_url, self.project, managed_zone
        )
    }

    /// Send a request, returning `None` for "304 Not Modified"
    async fn send<T: DeserializeOwned>(
        &self,
        context: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>> {
        let token = self.tokens.token().await?;
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| Error::http(format!("{}: HTTP request failed: {}", context, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_MODIFIED {
            tracing::debug!("{}: not modified", context);
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());

        if !status.is_success() {
            return Err(Error::from_status(PROVIDER, context, status, &body));
        }

        serde_json::from_str(&body).map(Some).map_err(|e| {
            Error::provider(PROVIDER, format!("{}: failed to parse response: {}", context, e))
        })
    }

    /// GET every page of a listing
    async fn list_pages<P, T>(
        &self,
        context: &str,
        url: &str,
        split: impl Fn(P) -> (Vec<T>, Option<String>),
    ) -> Result<Vec<T>>
    where
        P: DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.client.get(url);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: P = self
                .send(context, request)
                .await?
                .ok_or_else(|| Error::provider(PROVIDER, format!("{}: empty response", context)))?;
            let (batch, next) = split(page);
            items.extend(batch);

            match next.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl CloudDnsApi for HttpCloudDnsApi {
    async fn list_managed_zones(&self) -> Result<Vec<ManagedZone>> {
        let url = format!("{}/projects/{}/managedZones", self.base_url, self.project);
        let zones = self
            .list_pages("list managed zones", &url, |page: ManagedZonesPage| {
                (page.managed_zones, page.next_page_token)
            })
            .await?;

        tracing::debug!("Listed {} managed zone(s) in project {}", zones.len(), self.project);
        Ok(zones)
    }

    async fn list_rrsets(&self, managed_zone: &str) -> Result<Vec<ResourceRecordSet>> {
        let url = format!("{}/rrsets", self.zone_url(managed_zone));
        let rrsets = self
            .list_pages("list record sets", &url, |page: RrsetsPage| {
                (page.rrsets, page.next_page_token)
            })
            .await?;

        tracing::debug!("Listed {} record set(s) in {}", rrsets.len(), managed_zone);
        Ok(rrsets)
    }

    async fn patch_rrset(&self, managed_zone: &str, rrset: &ResourceRecordSet) -> Result<()> {
        let url = format!(
            "{}/rrsets/{}/{}",
            self.zone_url(managed_zone),
            rrset.name,
            rrset.record_type
        );
        let request = self.client.patch(&url).json(rrset);
        let _: Option<serde_json::Value> = self.send("patch record set", request).await?;
        Ok(())
    }

    async fn create_change(&self, managed_zone: &str, change: &Change) -> Result<()> {
        let url = format!("{}/changes", self.zone_url(managed_zone));
        let request = self.client.post(&url).json(change);
        let _: Option<serde_json::Value> = self.send("create change", request).await?;
        Ok(())
    }
}
