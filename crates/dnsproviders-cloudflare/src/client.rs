//! HTTPS implementation of [`CloudflareApi`]
//!
//! ## API Reference
//!
//! - Cloudflare API v4: https://developers.cloudflare.com/api/
//! - List Zones: GET `/zones?name=...`
//! - List DNS Records: GET `/zones/:zone_id/dns_records?name=...&type=...&page=...`
//! - Create DNS Record: POST `/zones/:zone_id/dns_records`
//! - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`
//! - Delete DNS Record: DELETE `/zones/:zone_id/dns_records/:record_id`

use crate::api::{CloudflareApi, DnsRecord, DnsRecordRequest, RecordFilter};
use async_trait::async_trait;
use dnsproviders_core::{Error, ProviderOptions, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Records requested per page when listing
const PAGE_SIZE: u32 = 100;

const PROVIDER: &str = "cloudflare";

/// Cloudflare API response envelope
#[derive(Debug, Deserialize)]
struct CloudflareResponse<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<CloudflareMessage>,
    result: Option<T>,
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
struct CloudflareMessage {
    code: u32,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    page: u32,
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct CloudflareZone {
    id: String,
    name: String,
}

fn format_errors(errors: &[CloudflareMessage]) -> String {
    errors
        .iter()
        .map(|e| format!("Code {}: {}", e.code, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Cloudflare API v4 client authenticated with an API token
pub struct HttpCloudflareApi {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for HttpCloudflareApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCloudflareApi")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpCloudflareApi {
    /// Create a new client
    ///
    /// `options.api_endpoint` overrides the API base URL.
    pub fn new(api_token: impl Into<String>, options: &ProviderOptions) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let base_url = options
            .api_endpoint
            .as_deref()
            .unwrap_or(CLOUDFLARE_API_BASE)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_token,
            base_url,
            client: options.build_http_client()?,
        })
    }

    /// Send a request and unwrap the response envelope
    async fn send<T: DeserializeOwned>(
        &self,
        context: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<(T, Option<ResultInfo>)> {
        let response = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::http(format!("{}: HTTP request failed: {}", context, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());

        if !status.is_success() {
            // Prefer the structured error list when the body carries one
            let detail = serde_json::from_str::<CloudflareResponse<serde_json::Value>>(&body)
                .ok()
                .filter(|r| !r.errors.is_empty())
                .map(|r| format_errors(&r.errors))
                .unwrap_or(body);
            return Err(Error::from_status(PROVIDER, context, status, &detail));
        }

        let envelope: CloudflareResponse<T> = serde_json::from_str(&body).map_err(|e| {
            Error::provider(PROVIDER, format!("{}: failed to parse response: {}", context, e))
        })?;

        if !envelope.success {
            return Err(Error::provider(
                PROVIDER,
                format!("{}: {}", context, format_errors(&envelope.errors)),
            ));
        }

        let result = envelope.result.ok_or_else(|| {
            Error::provider(PROVIDER, format!("{}: API returned success but no result", context))
        })?;

        Ok((result, envelope.result_info))
    }
}

#[async_trait]
impl CloudflareApi for HttpCloudflareApi {
    async fn zone_id_by_name(&self, zone: &str) -> Result<String> {
        tracing::debug!("Looking up Cloudflare zone ID for {}", zone);

        let url = format!("{}/zones", self.base_url);
        let request = self.client.get(&url).query(&[("name", zone)]);
        let (zones, _): (Vec<CloudflareZone>, _) = self.send("list zones", request).await?;

        let zone_id = zones
            .into_iter()
            .find(|z| z.name == zone)
            .map(|z| z.id)
            .ok_or_else(|| Error::zone_not_found(zone))?;

        tracing::debug!("Found zone ID: {}", zone_id);
        Ok(zone_id)
    }

    async fn list_dns_records(&self, zone_id: &str, filter: &RecordFilter) -> Result<Vec<DnsRecord>> {
        let url = format!("{}/zones/{}/dns_records", self.base_url, zone_id);
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let mut query = vec![
                ("page", page.to_string()),
                ("per_page", PAGE_SIZE.to_string()),
            ];
            if let Some(name) = &filter.name {
                query.push(("name", name.clone()));
            }
            if let Some(record_type) = &filter.record_type {
                query.push(("type", record_type.clone()));
            }

            let request = self.client.get(&url).query(&query);
            let (batch, info): (Vec<DnsRecord>, _) = self.send("list dns records", request).await?;
            records.extend(batch);

            match info {
                Some(info) if info.page < info.total_pages => page = info.page + 1,
                _ => break,
            }
        }

        tracing::debug!("Listed {} Cloudflare record(s) in zone {}", records.len(), zone_id);
        Ok(records)
    }

    async fn create_dns_record(&self, zone_id: &str, record: &DnsRecordRequest) -> Result<DnsRecord> {
        let url = format!("{}/zones/{}/dns_records", self.base_url, zone_id);
        let request = self.client.post(&url).json(record);
        let (created, _) = self.send("create dns record", request).await?;
        Ok(created)
    }

    async fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DnsRecordRequest,
    ) -> Result<DnsRecord> {
        let url = format!("{}/zones/{}/dns_records/{}", self.base_url, zone_id, record_id);
        let request = self.client.put(&url).json(record);
        let (updated, _) = self.send("update dns record", request).await?;
        Ok(updated)
    }

    async fn delete_dns_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        let url = format!("{}/zones/{}/dns_records/{}", self.base_url, zone_id, record_id);
        let request = self.client.delete(&url);
        let _: (serde_json::Value, _) = self.send("delete dns record", request).await?;
        Ok(())
    }
}
