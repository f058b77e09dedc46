//! DNS zone name → managed-zone name map
//!
//! Cloud DNS addresses zones by managed-zone name (`example-com`), callers
//! by DNS name (`example.com`). The map is listed once at construction and
//! then kept current according to the [`ZoneRefreshPolicy`].

use crate::api::CloudDnsApi;
use dnsproviders_core::{Error, Result, SharedLogger, ZoneRefreshPolicy, trim_trailing_dot};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct ZoneMap {
    /// DNS name (no trailing dot) → managed-zone name
    by_dns_name: BTreeMap<String, String>,
    loaded_at: Instant,
}

/// Cached managed-zone lookup
pub struct ZoneCache {
    policy: ZoneRefreshPolicy,
    state: RwLock<ZoneMap>,
    logger: SharedLogger,
}

impl std::fmt::Debug for ZoneCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneCache")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

async fn list_zone_map(api: &dyn CloudDnsApi) -> Result<ZoneMap> {
    let by_dns_name = api
        .list_managed_zones()
        .await?
        .into_iter()
        .map(|mz| (trim_trailing_dot(&mz.dns_name).to_string(), mz.name))
        .collect();

    Ok(ZoneMap {
        by_dns_name,
        loaded_at: Instant::now(),
    })
}

impl ZoneCache {
    /// List the project's managed zones and build the cache
    pub async fn load(
        api: &dyn CloudDnsApi,
        policy: ZoneRefreshPolicy,
        logger: SharedLogger,
    ) -> Result<Self> {
        Ok(Self {
            policy,
            state: RwLock::new(list_zone_map(api).await?),
            logger,
        })
    }

    /// Snapshot of the current map
    pub async fn snapshot(&self) -> BTreeMap<String, String> {
        self.state.read().await.by_dns_name.clone()
    }

    /// Resolve a zone (with or without trailing dot) to its managed-zone name
    ///
    /// # Errors
    ///
    /// `Error::ZoneNotFound` if the zone is not in the map after whatever
    /// refresh the policy allows. A failed interval refresh keeps the
    /// cached map.
    pub async fn resolve(&self, api: &dyn CloudDnsApi, zone: &str) -> Result<String> {
        let key = trim_trailing_dot(zone);

        if let ZoneRefreshPolicy::Interval { secs } = self.policy {
            self.refresh_if_older_than(api, Duration::from_secs(secs)).await;
        }

        if let Some(name) = self.lookup(key).await {
            return Ok(name);
        }

        if self.policy == ZoneRefreshPolicy::OnMiss {
            self.refresh(api).await?;
            if let Some(name) = self.lookup(key).await {
                return Ok(name);
            }
        }

        Err(Error::zone_not_found(zone))
    }

    async fn lookup(&self, key: &str) -> Option<String> {
        self.state.read().await.by_dns_name.get(key).cloned()
    }

    async fn refresh_if_older_than(&self, api: &dyn CloudDnsApi, max_age: Duration) {
        if self.state.read().await.loaded_at.elapsed() < max_age {
            return;
        }

        let mut state = self.state.write().await;
        // Another caller may have refreshed while this one waited for the lock
        if state.loaded_at.elapsed() < max_age {
            return;
        }

        match list_zone_map(api).await {
            Ok(map) => {
                tracing::info!("Refreshed Cloud DNS managed zones: {:?}", map.by_dns_name);
                *state = map;
            }
            Err(e) => {
                tracing::warn!("Managed zone refresh failed, keeping cached zones: {}", e);
                self.logger.info(
                    "managed zone refresh failed, using cached zones",
                    &[("error", &e.to_string())],
                );
            }
        }
    }

    async fn refresh(&self, api: &dyn CloudDnsApi) -> Result<()> {
        let map = list_zone_map(api).await?;
        tracing::info!("Refreshed Cloud DNS managed zones: {:?}", map.by_dns_name);
        *self.state.write().await = map;
        Ok(())
    }
}
