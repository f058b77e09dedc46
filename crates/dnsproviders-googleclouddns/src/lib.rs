// # Google Cloud DNS Provider
//
// This crate provides the Google Cloud DNS implementation of the `Provider`
// interface.
//
// ## Behavior
//
// - Managed zones are listed once at construction into a DNS name →
//   managed-zone map; `ZoneRefreshPolicy` decides when it is listed again
// - Record names get a trailing dot before comparison or mutation and lose
//   it again in `get_dns_records` results
// - Upsert finds the record set with the exact name and type; it is skipped
//   when its first value and TTL already match, patched otherwise, and
//   created through a change when absent
// - Delete removes every record set with the name in a single change
// - "304 Not Modified" from Cloud DNS counts as success
//
// ## Credentials
//
// Flattened service-account JSON: `project_id` (required), `client_email`
// and `private_key` (required for authentication), `private_key_id`,
// `token_uri` (defaults to Google's OAuth2 endpoint).

pub mod api;
pub mod auth;
pub mod client;
pub mod zones;

pub use api::{Change, CloudDnsApi, ManagedZone, ResourceRecordSet};
pub use auth::{ServiceAccountKey, ServiceAccountTokenSource, StaticTokenSource, TokenSource};
pub use client::{CLOUD_DNS_API_BASE, HttpCloudDnsApi};
pub use zones::ZoneCache;

use async_trait::async_trait;
use dnsproviders_core::{
    Credentials, Error, Provider, ProviderConfig, ProviderFactory, ProviderOptions,
    ProviderRegistry, ProviderType, Record, Result, SharedLogger, UpsertOutcome,
    ZoneRefreshPolicy, trim_trailing_dot, with_trailing_dot,
};
use std::sync::Arc;

/// Credential key holding the GCP project ID
pub const CREDENTIAL_KEY_PROJECT_ID: &str = "project_id";

/// Google Cloud DNS provider
pub struct GoogleCloudDnsProvider {
    /// Vendor port
    api: Arc<dyn CloudDnsApi>,

    /// DNS zone → managed zone
    zones: ZoneCache,

    /// Informational logger
    logger: SharedLogger,
}

impl std::fmt::Debug for GoogleCloudDnsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCloudDnsProvider")
            .field("zones", &self.zones)
            .finish_non_exhaustive()
    }
}

impl GoogleCloudDnsProvider {
    /// Create a provider from service-account credentials
    ///
    /// Lists the project's managed zones before returning, so bad
    /// credentials surface here rather than on the first operation.
    pub async fn new(
        credentials: &Credentials,
        options: &ProviderOptions,
        logger: SharedLogger,
    ) -> Result<Self> {
        let project = credentials.require(ProviderType::GoogleCloudDns.as_str(), CREDENTIAL_KEY_PROJECT_ID)?;
        let key = ServiceAccountKey::from_credentials(credentials)?;
        let tokens = ServiceAccountTokenSource::new(key, options)?;

        logger.info("initializing google cloud DNS", &[("project", &project)]);
        let api = HttpCloudDnsApi::new(project, Arc::new(tokens), options)?;

        Self::with_api(Arc::new(api), options.zone_refresh, logger).await
    }

    /// Create a provider over any [`CloudDnsApi`] implementation
    pub async fn with_api(
        api: Arc<dyn CloudDnsApi>,
        zone_refresh: ZoneRefreshPolicy,
        logger: SharedLogger,
    ) -> Result<Self> {
        let zones = ZoneCache::load(api.as_ref(), zone_refresh, logger.clone()).await?;
        logger.info("google cloud DNS", &[("managedZones", &zones.snapshot().await)]);

        Ok(Self { api, zones, logger })
    }

    async fn managed_zone(&self, zone: &str) -> Result<String> {
        self.zones.resolve(self.api.as_ref(), zone).await
    }
}

#[async_trait]
impl Provider for GoogleCloudDnsProvider {
    async fn get_dns_records(&self, zone: &str, name: &str) -> Result<Vec<Record>> {
        let managed_zone = self.managed_zone(zone).await?;
        let name = trim_trailing_dot(name);

        let records = self
            .api
            .list_rrsets(&managed_zone)
            .await?
            .into_iter()
            .filter(|rrset| name.is_empty() || trim_trailing_dot(&rrset.name) == name)
            .map(|rrset| {
                Record::new(
                    rrset.record_type,
                    trim_trailing_dot(&rrset.name),
                    rrset.rrdatas,
                    rrset.ttl,
                )
            })
            .collect();

        Ok(records)
    }

    async fn create_or_update_dns_record(
        &self,
        zone: &str,
        name: &str,
        record_type: &str,
        content: &str,
        ttl: u32,
        _proxy: bool,
    ) -> Result<UpsertOutcome> {
        let managed_zone = self.managed_zone(zone).await?;
        let name = with_trailing_dot(name);
        let record_type = record_type.to_uppercase();

        let existing = self
            .api
            .list_rrsets(&managed_zone)
            .await?
            .into_iter()
            .find(|rrset| rrset.name == name && rrset.record_type == record_type);

        match existing {
            Some(rrset)
                if rrset.rrdatas.first().map(String::as_str) == Some(content) && rrset.ttl == ttl =>
            {
                self.logger.info("update dns record not needed", &[("record", &rrset)]);
                Ok(UpsertOutcome::Unchanged)
            }
            Some(rrset) => {
                let updated = ResourceRecordSet {
                    rrdatas: vec![content.to_string()],
                    ttl,
                    ..rrset
                };
                self.logger.info("update dns record", &[("new", &updated)]);
                if let Err(e) = self.api.patch_rrset(&managed_zone, &updated).await {
                    tracing::warn!("Update existing dns record {} failed: {}", name, e);
                    return Err(e);
                }
                Ok(UpsertOutcome::Updated)
            }
            None => {
                let rrset =
                    ResourceRecordSet::new(name.clone(), record_type, ttl, vec![content.to_string()]);
                self.logger.info("create dns record", &[("new", &rrset)]);
                let change = Change {
                    additions: vec![rrset],
                    deletions: Vec::new(),
                };
                if let Err(e) = self.api.create_change(&managed_zone, &change).await {
                    tracing::warn!("Failed to create dns entry for {}: {}", name, e);
                    return Err(e);
                }
                Ok(UpsertOutcome::Created)
            }
        }
    }

    async fn delete_dns_record(&self, zone: &str, name: &str) -> Result<usize> {
        if name.is_empty() {
            return Err(Error::invalid_input("no name specified to delete"));
        }

        let managed_zone = self.managed_zone(zone).await?;
        let name = with_trailing_dot(name);

        // Deletions must match the listed record sets exactly
        let deletions: Vec<ResourceRecordSet> = self
            .api
            .list_rrsets(&managed_zone)
            .await?
            .into_iter()
            .filter(|rrset| rrset.name == name)
            .collect();

        if deletions.is_empty() {
            tracing::debug!("No record sets named {} in {}", name, managed_zone);
            return Ok(0);
        }

        let count = deletions.len();
        let change = Change {
            additions: Vec::new(),
            deletions,
        };
        if let Err(e) = self.api.create_change(&managed_zone, &change).await {
            tracing::warn!("Failed to delete dns entries for {}: {}", name, e);
            return Err(e);
        }

        tracing::info!("Deleted {} record set(s) named {} from {}", count, name, managed_zone);
        Ok(count)
    }

    fn provider_name(&self) -> &'static str {
        "googleclouddns"
    }
}

/// Factory for creating Google Cloud DNS providers
pub struct GoogleCloudDnsFactory;

#[async_trait]
impl ProviderFactory for GoogleCloudDnsFactory {
    async fn create(&self, config: &ProviderConfig, logger: SharedLogger) -> Result<Box<dyn Provider>> {
        if config.provider_type != ProviderType::GoogleCloudDns {
            return Err(Error::config("Invalid config for Google Cloud DNS provider"));
        }

        let provider =
            GoogleCloudDnsProvider::new(&config.credentials, &config.options, logger).await?;
        Ok(Box::new(provider))
    }
}

/// Register the Google Cloud DNS provider with a registry
pub fn register(registry: &ProviderRegistry) {
    registry.register_provider(ProviderType::GoogleCloudDns, Box::new(GoogleCloudDnsFactory));
}
