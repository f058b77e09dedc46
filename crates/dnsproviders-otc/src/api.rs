//! Narrow port over the OTC DNS (OpenStack Designate v2) API

use async_trait::async_trait;
use dnsproviders_core::Result;
use serde::{Deserialize, Serialize};

/// A DNS zone
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Zone {
    /// Zone ID
    pub id: String,
    /// Zone name with trailing dot
    pub name: String,
}

/// A record set as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordSet {
    /// Record set ID
    pub id: String,
    /// Fully-qualified name with trailing dot
    pub name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: String,
    /// Time-to-live
    #[serde(default)]
    pub ttl: u32,
    /// Record values, as stored (possibly quoted)
    #[serde(default)]
    pub records: Vec<String>,
}

/// Body of a create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSetCreate {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
    pub records: Vec<String>,
}

/// Body of an update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSetUpdate {
    pub ttl: u32,
    pub records: Vec<String>,
}

/// OTC DNS operations used by the provider
#[async_trait]
pub trait OtcDnsApi: Send + Sync {
    /// List zones, filtered server-side by `name`
    async fn list_zones(&self, name: &str) -> Result<Vec<Zone>>;

    /// List record sets in a zone, filtered server-side by `name`
    ///
    /// The server-side filter is not an exact match; callers compare names
    /// themselves.
    async fn list_recordsets(&self, zone_id: &str, name: &str) -> Result<Vec<RecordSet>>;

    /// Create a record set
    async fn create_recordset(&self, zone_id: &str, recordset: &RecordSetCreate) -> Result<RecordSet>;

    /// Update a record set's TTL and values
    async fn update_recordset(
        &self,
        zone_id: &str,
        recordset_id: &str,
        update: &RecordSetUpdate,
    ) -> Result<RecordSet>;

    /// Delete a record set
    async fn delete_recordset(&self, zone_id: &str, recordset_id: &str) -> Result<()>;
}
