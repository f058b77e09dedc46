// # Open Telekom Cloud DNS Provider
//
// This crate provides the Open Telekom Cloud (OTC) implementation of the
// `Provider` interface, over Keystone v3 authentication and the Designate v2
// compatible DNS API.
//
// ## Behavior
//
// - Record names are relative to the zone: `test-abc` in `example.com` is
//   `test-abc.example.com.` at the vendor; a name ending in a dot is taken
//   as already fully qualified
// - Record values are sent wrapped in double quotes (unless already quoted)
//   and returned with the quotes stripped
// - Exactly one record set must match for update and delete; more than one
//   is an ambiguous match and nothing is changed
// - Deleting a name with no record set is a record-not-found error
//
// ## Credentials
//
// - `region`, `domainName`, `tenantName`, `username`, `password`

pub mod api;
pub mod auth;
pub mod client;

pub use api::{OtcDnsApi, RecordSet, RecordSetCreate, RecordSetUpdate, Zone};
pub use auth::{KeystoneAuthenticator, PasswordAuth, Session};
pub use client::HttpOtcDnsApi;

use async_trait::async_trait;
use dnsproviders_core::{
    Credentials, Error, Provider, ProviderConfig, ProviderFactory, ProviderOptions,
    ProviderRegistry, ProviderType, Record, Result, SharedLogger, UpsertOutcome,
    trim_trailing_dot, with_trailing_dot,
};
use std::sync::Arc;

/// Wrap a value in double quotes unless it already starts or ends with one
pub fn quote(content: &str) -> String {
    if content.starts_with('"') || content.ends_with('"') {
        content.to_string()
    } else {
        format!("\"{}\"", content)
    }
}

/// Strip surrounding double quotes
pub fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

/// Fully-qualified vendor name for a zone-relative record name
fn qualify(name: &str, zone_fqdn: &str) -> String {
    if name.is_empty() || name == "@" {
        zone_fqdn.to_string()
    } else if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.{}", name, zone_fqdn)
    }
}

/// Zone-relative name for a vendor name; the apex is `@`
fn relative_name(fqdn: &str, zone_fqdn: &str) -> String {
    if fqdn.eq_ignore_ascii_case(zone_fqdn) {
        return "@".to_string();
    }
    fqdn.strip_suffix(zone_fqdn)
        .and_then(|prefix| prefix.strip_suffix('.'))
        .unwrap_or_else(|| trim_trailing_dot(fqdn))
        .to_string()
}

/// Open Telekom Cloud DNS provider
pub struct OtcProvider {
    /// Vendor port
    api: Arc<dyn OtcDnsApi>,

    /// Informational logger
    logger: SharedLogger,
}

impl std::fmt::Debug for OtcProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtcProvider").finish_non_exhaustive()
    }
}

impl OtcProvider {
    /// Create a provider talking to OTC
    ///
    /// Authentication happens lazily on the first API call.
    pub fn new(credentials: &Credentials, options: &ProviderOptions, logger: SharedLogger) -> Result<Self> {
        let auth = PasswordAuth::from_credentials(credentials, options)?;
        let api = HttpOtcDnsApi::new(auth, options)?;
        Ok(Self::with_api(Arc::new(api), logger))
    }

    /// Create a provider over any [`OtcDnsApi`] implementation
    pub fn with_api(api: Arc<dyn OtcDnsApi>, logger: SharedLogger) -> Self {
        Self { api, logger }
    }

    async fn find_zone(&self, zone: &str) -> Result<Zone> {
        let zone_fqdn = with_trailing_dot(zone);
        self.api
            .list_zones(&zone_fqdn)
            .await?
            .into_iter()
            .find(|z| z.name == zone_fqdn)
            .ok_or_else(|| Error::zone_not_found(zone))
    }

    /// Record sets whose name is exactly `fqdn`
    async fn matching(&self, zone_id: &str, fqdn: &str) -> Result<Vec<RecordSet>> {
        Ok(self
            .api
            .list_recordsets(zone_id, fqdn)
            .await?
            .into_iter()
            .filter(|r| r.name.eq_ignore_ascii_case(fqdn))
            .collect())
    }

    fn to_record(recordset: RecordSet, zone_fqdn: &str) -> Record {
        Record::new(
            recordset.record_type,
            relative_name(&recordset.name, zone_fqdn),
            recordset
                .records
                .iter()
                .map(|v| unquote(v).to_string())
                .collect(),
            recordset.ttl,
        )
    }
}

#[async_trait]
impl Provider for OtcProvider {
    async fn get_dns_records(&self, zone: &str, name: &str) -> Result<Vec<Record>> {
        let found = self.find_zone(zone).await?;

        let recordsets = if name.is_empty() {
            self.api.list_recordsets(&found.id, "").await?
        } else {
            self.matching(&found.id, &qualify(name, &found.name)).await?
        };

        Ok(recordsets
            .into_iter()
            .map(|r| Self::to_record(r, &found.name))
            .collect())
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
        let found = self.find_zone(zone).await?;
        let fqdn = qualify(name, &found.name);
        let mut matches = self.matching(&found.id, &fqdn).await?;

        match matches.len() {
            0 => {
                let create = RecordSetCreate {
                    name: fqdn,
                    record_type: record_type.to_uppercase(),
                    ttl,
                    records: vec![quote(content)],
                };
                self.logger.info("create dns record", &[("zone", &zone), ("new", &create)]);
                if let Err(e) = self.api.create_recordset(&found.id, &create).await {
                    tracing::warn!(
                        "Failed to create record in zone {} ({}) with name {}: {}",
                        found.id,
                        zone,
                        name,
                        e
                    );
                    return Err(e);
                }
                Ok(UpsertOutcome::Created)
            }
            1 => {
                let existing = matches.remove(0);
                if !existing.record_type.eq_ignore_ascii_case(record_type) {
                    return Err(Error::invalid_input(format!(
                        "record {} in zone {} has type {}, cannot set type {}",
                        name, zone, existing.record_type, record_type
                    )));
                }

                let unchanged = existing.ttl == ttl
                    && existing.records.len() == 1
                    && unquote(&existing.records[0]) == unquote(content);
                if unchanged {
                    self.logger.info("update dns record not needed", &[("record", &existing)]);
                    return Ok(UpsertOutcome::Unchanged);
                }

                let update = RecordSetUpdate {
                    ttl,
                    records: vec![quote(content)],
                };
                self.logger.info(
                    "update dns record",
                    &[("id", &existing.id), ("new", &update)],
                );
                if let Err(e) = self.api.update_recordset(&found.id, &existing.id, &update).await {
                    tracing::warn!("Failed to update record for zone {} (name='{}'): {}", zone, name, e);
                    return Err(e);
                }
                Ok(UpsertOutcome::Updated)
            }
            count => Err(Error::ambiguous_match(zone, name, count)),
        }
    }

    async fn delete_dns_record(&self, zone: &str, name: &str) -> Result<usize> {
        if name.is_empty() {
            return Err(Error::invalid_input("no name specified to delete"));
        }

        let found = self.find_zone(zone).await?;
        let matches = self.matching(&found.id, &qualify(name, &found.name)).await?;

        match matches.as_slice() {
            [] => Err(Error::record_not_found(zone, name)),
            [existing] => {
                self.api.delete_recordset(&found.id, &existing.id).await?;
                tracing::info!("Deleted OTC record set {} ({})", existing.name, existing.id);
                Ok(1)
            }
            _ => Err(Error::ambiguous_match(zone, name, matches.len())),
        }
    }

    fn provider_name(&self) -> &'static str {
        "opentelekomcloud"
    }
}

/// Factory for creating OTC providers
pub struct OtcFactory;

#[async_trait]
impl ProviderFactory for OtcFactory {
    async fn create(&self, config: &ProviderConfig, logger: SharedLogger) -> Result<Box<dyn Provider>> {
        if config.provider_type != ProviderType::OpenTelekomCloud {
            return Err(Error::config("Invalid config for Open Telekom Cloud provider"));
        }

        Ok(Box::new(OtcProvider::new(&config.credentials, &config.options, logger)?))
    }
}

/// Register the OTC provider with a registry
pub fn register(registry: &ProviderRegistry) {
    registry.register_provider(ProviderType::OpenTelekomCloud, Box::new(OtcFactory));
}
