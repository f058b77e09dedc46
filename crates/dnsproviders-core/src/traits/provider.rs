// # DNS Provider Trait
//
// Defines the interface for managing DNS records through a hosting
// backend's API.
//
// ## Implementations
//
// - Cloudflare: `dnsproviders-cloudflare` crate
// - Google Cloud DNS: `dnsproviders-googleclouddns` crate
// - Open Telekom Cloud: `dnsproviders-otc` crate
//
// ## Usage
//
// ```rust,ignore
// use dnsproviders_core::Provider;
//
// async fn point_www(provider: &dyn Provider) -> dnsproviders_core::Result<()> {
//     provider
//         .create_or_update_dns_record("example.com", "www.example.com", "A", "192.0.2.10", 300, false)
//         .await?;
//     Ok(())
// }
// ```

use crate::config::ProviderConfig;
use crate::logger::SharedLogger;
use crate::record::{Record, UpsertOutcome};
use async_trait::async_trait;

/// Common interface for managing DNS records in a zone
///
/// The interface is a capability contract: every adapter offers the three
/// operations, but ambiguity and not-found semantics differ per backend.
///
/// | adapter | upsert matches by | delete with no match | multiple matches |
/// |---|---|---|---|
/// | cloudflare | name + type | `Ok(0)` | every match is updated / deleted |
/// | googleclouddns | name + type | `Ok(0)` | first match is updated; all deleted |
/// | opentelekomcloud | name | `RecordNotFound` | `AmbiguousMatch` |
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
/// They hold no mutable state besides token and zone caches.
///
/// # Retries
///
/// Providers never retry. Every vendor failure is returned to the caller
/// immediately.
#[async_trait]
pub trait Provider: Send + Sync {
    /// List the record sets in a zone
    ///
    /// If `name` is non-empty only record sets whose name matches exactly
    /// are returned.
    ///
    /// # Errors
    ///
    /// - `Error::ZoneNotFound` if the zone cannot be located
    /// - any vendor API failure
    async fn get_dns_records(&self, zone: &str, name: &str) -> Result<Vec<Record>, crate::Error>;

    /// Change the existing record if found, or add a new one
    ///
    /// # Idempotency
    ///
    /// If a matching record already holds `content` with `ttl` nothing is
    /// sent to the vendor and `UpsertOutcome::Unchanged` is returned.
    ///
    /// # Parameters
    ///
    /// - `zone`: the zone holding the record
    /// - `name`: the record name, in the adapter's naming convention
    /// - `record_type`: record type (e.g. "A")
    /// - `content`: the single value to store
    /// - `ttl`: time-to-live in seconds
    /// - `proxy`: proxy through the vendor's edge (Cloudflare only)
    async fn create_or_update_dns_record(
        &self,
        zone: &str,
        name: &str,
        record_type: &str,
        content: &str,
        ttl: u32,
        proxy: bool,
    ) -> Result<UpsertOutcome, crate::Error>;

    /// Delete all record sets for `name`
    ///
    /// Returns the number of record sets deleted. An empty `name` is
    /// rejected with `Error::InvalidInput`.
    async fn delete_dns_record(&self, zone: &str, name: &str) -> Result<usize, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing providers from configuration
///
/// One factory exists per adapter crate; the [`ProviderRegistry`]
/// dispatches to it by provider type. Construction is async because some
/// adapters authenticate or list zones before they are usable.
///
/// [`ProviderRegistry`]: crate::registry::ProviderRegistry
#[async_trait]
pub trait ProviderFactory: Send + Sync {
    /// Create a provider instance from configuration
    async fn create(
        &self,
        config: &ProviderConfig,
        logger: SharedLogger,
    ) -> Result<Box<dyn Provider>, crate::Error>;
}
