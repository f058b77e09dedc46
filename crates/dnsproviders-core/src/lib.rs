// # dnsproviders-core
//
// Core library for managing DNS records across hosting backends.
//
// ## Architecture Overview
//
// - **Provider**: Trait for listing, upserting and deleting records in a zone
// - **ProviderFactory**: Trait for building a provider from configuration
// - **ProviderRegistry**: Registry mapping provider types to factories
// - **Record**: Vendor-neutral record set shape
// - **Credentials**: Opaque, redacted credential map
// - **Logger**: Informational logging collaborator (defaults to `tracing`)
//
// Adapters live in their own crates (`dnsproviders-cloudflare`,
// `dnsproviders-googleclouddns`, `dnsproviders-otc`) and depend only on
// this crate.

pub mod config;
pub mod credentials;
pub mod error;
pub mod logger;
pub mod record;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use config::{ProviderConfig, ProviderOptions, ProviderType, ZoneRefreshPolicy};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use logger::{Logger, SharedLogger, TracingLogger, default_logger, format_fields};
pub use record::{
    RECORD_TYPE_A, RECORD_TYPE_AAAA, RECORD_TYPE_CNAME, RECORD_TYPE_TXT, Record, UpsertOutcome,
};
pub use registry::ProviderRegistry;
pub use traits::{Provider, ProviderFactory};

/// Strip a single trailing dot from a DNS name
pub fn trim_trailing_dot(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Ensure a DNS name ends with a dot
pub fn with_trailing_dot(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}
