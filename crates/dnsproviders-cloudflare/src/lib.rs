// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare implementation of the `Provider`
// interface.
//
// ## Behavior
//
// - Zone name → zone ID is resolved on every call (no caching)
// - Upsert lists records by lowercased name and uppercased type; each match
//   whose content, TTL or proxy flag differs is updated, matches are left alone
// - Delete removes every record with the name, one API call per record, and
//   keeps going after a failure so one bad record does not strand the rest
// - Record names are fully-qualified without a trailing dot
//
// ## Credentials
//
// - `token`: API token with Zone:DNS:Edit permission
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output

pub mod api;
pub mod client;

pub use api::{CloudflareApi, DnsRecord, DnsRecordRequest, RecordFilter};
pub use client::{CLOUDFLARE_API_BASE, HttpCloudflareApi};

use async_trait::async_trait;
use dnsproviders_core::{
    Credentials, Error, Provider, ProviderConfig, ProviderFactory, ProviderOptions,
    ProviderRegistry, ProviderType, Record, Result, SharedLogger, UpsertOutcome,
    trim_trailing_dot,
};
use std::sync::Arc;

/// Credential key holding the API token
pub const CREDENTIAL_KEY_TOKEN: &str = "token";

/// Cloudflare's "automatic" TTL value
pub const AUTOMATIC_TTL: u32 = 1;

/// Cloudflare DNS provider
pub struct CloudflareProvider {
    /// Vendor port
    api: Arc<dyn CloudflareApi>,

    /// Informational logger
    logger: SharedLogger,
}

impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider").finish_non_exhaustive()
    }
}

impl CloudflareProvider {
    /// Create a provider talking to the Cloudflare API
    ///
    /// # Errors
    ///
    /// `Error::Config` if the `token` credential is missing or empty.
    pub fn new(credentials: &Credentials, options: &ProviderOptions, logger: SharedLogger) -> Result<Self> {
        let token = credentials.require(ProviderType::Cloudflare.as_str(), CREDENTIAL_KEY_TOKEN)?;
        let api = HttpCloudflareApi::new(token, options)?;
        Ok(Self::with_api(Arc::new(api), logger))
    }

    /// Create a provider over any [`CloudflareApi`] implementation
    pub fn with_api(api: Arc<dyn CloudflareApi>, logger: SharedLogger) -> Self {
        Self { api, logger }
    }

    async fn zone_id(&self, zone: &str) -> Result<String> {
        self.api.zone_id_by_name(trim_trailing_dot(zone)).await
    }

    fn to_record(record: DnsRecord) -> Record {
        Record::new(record.record_type, record.name, vec![record.content], record.ttl)
    }

    /// Whether an existing record already holds the requested values
    ///
    /// Proxied records always report the automatic TTL, so TTL is only
    /// compared for unproxied records.
    fn is_current(existing: &DnsRecord, content: &str, ttl: u32, proxy: bool) -> bool {
        existing.content == content
            && existing.proxied == proxy
            && (proxy || existing.ttl == ttl)
    }
}

#[async_trait]
impl Provider for CloudflareProvider {
    async fn get_dns_records(&self, zone: &str, name: &str) -> Result<Vec<Record>> {
        let zone_id = self.zone_id(zone).await?;
        let records = self
            .api
            .list_dns_records(&zone_id, &RecordFilter::by_name(name))
            .await?;

        Ok(records.into_iter().map(Self::to_record).collect())
    }

    async fn create_or_update_dns_record(
        &self,
        zone: &str,
        name: &str,
        record_type: &str,
        content: &str,
        ttl: u32,
        proxy: bool,
    ) -> Result<UpsertOutcome> {
        let zone_id = self.zone_id(zone).await?;

        let request = DnsRecordRequest {
            record_type: record_type.to_uppercase(),
            name: name.to_lowercase(),
            content: content.to_string(),
            ttl,
            proxied: proxy,
        };

        let existing = self
            .api
            .list_dns_records(
                &zone_id,
                &RecordFilter::by_name_and_type(&request.name, &request.record_type),
            )
            .await?;

        if existing.is_empty() {
            self.logger.info(
                "CreateOrUpdateDNSRecord creating",
                &[("zone", &zone), ("name", &name), ("content", &content)],
            );
            if let Err(e) = self.api.create_dns_record(&zone_id, &request).await {
                tracing::warn!("Cannot create DNS record {} in zone {}: {}", name, zone, e);
                return Err(e);
            }
            return Ok(UpsertOutcome::Created);
        }

        let mut outcome = UpsertOutcome::Unchanged;
        for record in &existing {
            if Self::is_current(record, content, ttl, proxy) {
                self.logger.info(
                    "CreateOrUpdateDNSRecord existing record matches",
                    &[("name", &name), ("content", &content)],
                );
                continue;
            }

            self.logger.info(
                "CreateOrUpdateDNSRecord updating",
                &[("name", &name), ("content", &content), ("id", &record.id)],
            );
            if let Err(e) = self.api.update_dns_record(&zone_id, &record.id, &request).await {
                tracing::warn!("Cannot update DNS record {} in zone {}: {}", name, zone, e);
                return Err(e);
            }
            outcome = UpsertOutcome::Updated;
        }

        Ok(outcome)
    }

    async fn delete_dns_record(&self, zone: &str, name: &str) -> Result<usize> {
        if name.is_empty() {
            return Err(Error::invalid_input("no name specified to delete"));
        }

        let zone_id = self.zone_id(zone).await?;
        let records = self
            .api
            .list_dns_records(&zone_id, &RecordFilter::by_name(name))
            .await?;

        let mut deleted = 0;
        let mut failures = Vec::new();
        for record in &records {
            match self.api.delete_dns_record(&zone_id, &record.id).await {
                Ok(()) => {
                    tracing::info!("Deleted Cloudflare record {} ({})", record.name, record.id);
                    deleted += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to delete Cloudflare record {}: {}", record.id, e);
                    failures.push((record, e));
                }
            }
        }

        if let Some((record, err)) = failures.first() {
            return Err(Error::provider(
                "cloudflare",
                format!(
                    "delete DNS record {} ({} {}) failed, {} ({} of {} deletions failed)",
                    record.id,
                    record.record_type,
                    record.name,
                    err,
                    failures.len(),
                    records.len()
                ),
            ));
        }

        Ok(deleted)
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}

/// Factory for creating Cloudflare providers
pub struct CloudflareFactory;

#[async_trait]
impl ProviderFactory for CloudflareFactory {
    async fn create(&self, config: &ProviderConfig, logger: SharedLogger) -> Result<Box<dyn Provider>> {
        if config.provider_type != ProviderType::Cloudflare {
            return Err(Error::config("Invalid config for Cloudflare provider"));
        }

        Ok(Box::new(CloudflareProvider::new(
            &config.credentials,
            &config.options,
            logger,
        )?))
    }
}

/// Register the Cloudflare provider with a registry
///
/// # Example
///
/// ```rust
/// use dnsproviders_core::{ProviderRegistry, ProviderType};
///
/// let registry = ProviderRegistry::new();
/// dnsproviders_cloudflare::register(&registry);
/// assert!(registry.has_provider(ProviderType::Cloudflare));
/// ```
pub fn register(registry: &ProviderRegistry) {
    registry.register_provider(ProviderType::Cloudflare, Box::new(CloudflareFactory));
}
