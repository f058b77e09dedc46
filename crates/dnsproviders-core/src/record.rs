//! Record data shape shared by every provider

use serde::{Deserialize, Serialize};

/// IPv4 address record
pub const RECORD_TYPE_A: &str = "A";
/// IPv6 address record
pub const RECORD_TYPE_AAAA: &str = "AAAA";
/// Canonical name record
pub const RECORD_TYPE_CNAME: &str = "CNAME";
/// Text record
pub const RECORD_TYPE_TXT: &str = "TXT";

/// A DNS resource record set as reported by a provider
///
/// `content` holds every value stored under one name and type (for example
/// several A-record addresses). Records are built from vendor responses and
/// are not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Record type (e.g. "A", "AAAA", "CNAME")
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub record_type: String,

    /// Record name, in the naming convention of the provider that returned it
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Record values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<String>,

    /// Time-to-live in seconds
    #[serde(default, skip_serializing_if = "is_zero")]
    pub ttl: u32,
}

impl Record {
    /// Create a record
    pub fn new(
        record_type: impl Into<String>,
        name: impl Into<String>,
        content: Vec<String>,
        ttl: u32,
    ) -> Self {
        Self {
            record_type: record_type.into(),
            name: name.into(),
            content,
            ttl,
        }
    }
}

fn is_zero(ttl: &u32) -> bool {
    *ttl == 0
}

/// Result of a create-or-update operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No matching record existed; a new record set was created
    Created,
    /// A matching record existed with different values and was updated
    Updated,
    /// A matching record already had the requested values (no-op)
    Unchanged,
}

impl UpsertOutcome {
    /// Whether the provider changed anything
    pub fn is_mutation(&self) -> bool {
        !matches!(self, UpsertOutcome::Unchanged)
    }
}

impl std::fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            UpsertOutcome::Created => "created",
            UpsertOutcome::Updated => "updated",
            UpsertOutcome::Unchanged => "unchanged",
        })
    }
}
