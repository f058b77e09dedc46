//! Provider registry
//!
//! The registry maps provider types to factories, so adapters are selected
//! by configuration instead of a hard-coded match in the caller.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dnsproviders_core::{ProviderConfig, ProviderRegistry, ProviderType};
//!
//! let registry = ProviderRegistry::new();
//! dnsproviders_cloudflare::register(&registry);
//!
//! let config = ProviderConfig::new(ProviderType::Cloudflare, "", credentials);
//! let provider = registry.create_provider(&config, None).await?;
//! ```
//!
//! ## Registration
//!
//! Each adapter crate exposes a `register` function:
//!
//! ```rust,ignore
//! pub fn register(registry: &ProviderRegistry) {
//!     registry.register_provider(ProviderType::Cloudflare, Box::new(CloudflareFactory));
//! }
//! ```

use crate::config::{ProviderConfig, ProviderType};
use crate::error::{Error, Result};
use crate::logger::{SharedLogger, default_logger};
use crate::traits::{Provider, ProviderFactory};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Registry of provider factories
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered provider factories
    providers: RwLock<HashMap<ProviderType, Arc<dyn ProviderFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider factory, replacing any previous one for the type
    pub fn register_provider(&self, provider_type: ProviderType, factory: Box<dyn ProviderFactory>) {
        let mut providers = self
            .providers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        providers.insert(provider_type, Arc::from(factory));
    }

    /// Create a provider from configuration
    ///
    /// The configuration is validated first, so missing credential keys are
    /// reported before any network call. When `logger` is `None` the
    /// provider logs through `tracing`.
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn Provider>)`: Created provider instance
    /// - `Err(Error::UnknownProviderType)`: If no factory is registered for the type
    /// - `Err(Error)`: If validation or construction fails
    pub async fn create_provider(
        &self,
        config: &ProviderConfig,
        logger: Option<SharedLogger>,
    ) -> Result<Box<dyn Provider>> {
        let factory = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&config.provider_type)
            .cloned()
            .ok_or_else(|| Error::unknown_provider_type(config.provider_type.as_str()))?;

        config.validate()?;

        tracing::debug!(provider = %config.provider_type, "creating DNS provider");
        factory
            .create(config, logger.unwrap_or_else(default_logger))
            .await
    }

    /// List all registered provider types
    pub fn list_providers(&self) -> Vec<ProviderType> {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut types: Vec<ProviderType> = providers.keys().copied().collect();
        types.sort_by_key(|t| t.as_str());
        types
    }

    /// Check if a provider type is registered
    pub fn has_provider(&self, provider_type: ProviderType) -> bool {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&provider_type)
    }
}
