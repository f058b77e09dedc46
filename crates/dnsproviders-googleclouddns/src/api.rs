//! Narrow port over the Cloud DNS v1 API
//!
//! Only the calls the provider needs: list managed zones, list record sets,
//! patch a record set, and submit a change.

use async_trait::async_trait;
use dnsproviders_core::Result;
use serde::{Deserialize, Serialize};

/// A managed zone
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedZone {
    /// Managed-zone name (the Cloud DNS identifier, e.g. `example-com`)
    pub name: String,
    /// DNS name of the zone, with trailing dot
    pub dns_name: String,
}

/// A resource record set as stored by Cloud DNS
///
/// Names carry a trailing dot. Deletions must echo the record set exactly
/// as listed, so fields not modelled here (`kind`, `routingPolicy`,
/// `signatureRrdatas`, ...) are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecordSet {
    /// Fully-qualified name with trailing dot
    pub name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: String,
    /// Time-to-live in seconds
    #[serde(default)]
    pub ttl: u32,
    /// Record data; empty for record sets served by a routing policy
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rrdatas: Vec<String>,
    /// Remaining fields as returned by Cloud DNS
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ResourceRecordSet {
    /// Create a plain record set
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        ttl: u32,
        rrdatas: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            ttl,
            rrdatas,
            extra: serde_json::Map::new(),
        }
    }
}

/// An atomic set of additions and deletions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Change {
    /// Record sets to add
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additions: Vec<ResourceRecordSet>,
    /// Record sets to delete
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deletions: Vec<ResourceRecordSet>,
}

/// Cloud DNS operations used by the provider
#[async_trait]
pub trait CloudDnsApi: Send + Sync {
    /// List every managed zone in the project, across all pages
    async fn list_managed_zones(&self) -> Result<Vec<ManagedZone>>;

    /// List every record set in a managed zone, across all pages
    async fn list_rrsets(&self, managed_zone: &str) -> Result<Vec<ResourceRecordSet>>;

    /// Replace the record set identified by `rrset.name` and `rrset.record_type`
    ///
    /// "Not modified" counts as success.
    async fn patch_rrset(&self, managed_zone: &str, rrset: &ResourceRecordSet) -> Result<()>;

    /// Submit a change
    ///
    /// "Not modified" counts as success.
    async fn create_change(&self, managed_zone: &str, change: &Change) -> Result<()>;
}
