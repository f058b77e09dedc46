//! Narrow port over the Cloudflare API v4
//!
//! The provider's reconciliation logic only talks to [`CloudflareApi`];
//! [`HttpCloudflareApi`](crate::client::HttpCloudflareApi) implements it
//! over HTTPS and tests substitute an in-memory fake.

use async_trait::async_trait;
use dnsproviders_core::Result;
use serde::{Deserialize, Serialize};

/// A DNS record as stored by Cloudflare
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DnsRecord {
    /// Record ID
    pub id: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: String,
    /// Fully-qualified record name (no trailing dot)
    pub name: String,
    /// Record value
    pub content: String,
    /// Time-to-live; 1 means "automatic"
    #[serde(default)]
    pub ttl: u32,
    /// Whether traffic is proxied through Cloudflare
    #[serde(default)]
    pub proxied: bool,
}

/// Body of a create or update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsRecordRequest {
    /// Record type
    #[serde(rename = "type")]
    pub record_type: String,
    /// Record name
    pub name: String,
    /// Record value
    pub content: String,
    /// Time-to-live
    pub ttl: u32,
    /// Whether traffic is proxied through Cloudflare
    pub proxied: bool,
}

/// Server-side filter for record listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Exact record name
    pub name: Option<String>,
    /// Record type
    pub record_type: Option<String>,
}

impl RecordFilter {
    /// Filter on name only; an empty name matches every record
    pub fn by_name(name: &str) -> Self {
        Self {
            name: (!name.is_empty()).then(|| name.to_string()),
            record_type: None,
        }
    }

    /// Filter on name and type
    pub fn by_name_and_type(name: &str, record_type: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            record_type: Some(record_type.to_string()),
        }
    }

    /// Whether `record` passes the filter
    pub fn matches(&self, record: &DnsRecord) -> bool {
        self.name.as_ref().is_none_or(|n| *n == record.name)
            && self
                .record_type
                .as_ref()
                .is_none_or(|t| *t == record.record_type)
    }
}

/// Cloudflare operations used by the provider
#[async_trait]
pub trait CloudflareApi: Send + Sync {
    /// Resolve a zone name to its zone ID
    ///
    /// Fails with `Error::ZoneNotFound` when no zone has exactly that name.
    async fn zone_id_by_name(&self, zone: &str) -> Result<String>;

    /// List every record in the zone passing `filter`, across all pages
    async fn list_dns_records(&self, zone_id: &str, filter: &RecordFilter) -> Result<Vec<DnsRecord>>;

    /// Create a record
    async fn create_dns_record(&self, zone_id: &str, record: &DnsRecordRequest) -> Result<DnsRecord>;

    /// Replace a record
    async fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DnsRecordRequest,
    ) -> Result<DnsRecord>;

    /// Delete a record
    async fn delete_dns_record(&self, zone_id: &str, record_id: &str) -> Result<()>;
}
