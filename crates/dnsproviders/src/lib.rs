// # dnsproviders
//
// One interface for managing DNS records in a zone, whichever backend hosts
// it. Adapters are compiled in through cargo features:
//
// - `cloudflare`: Cloudflare API v4
// - `googleclouddns`: Google Cloud DNS v1
// - `otc`: Open Telekom Cloud DNS
//
// ## Example
//
// ```rust,ignore
// use dnsproviders::{Credentials, get_provider};
//
// let credentials = Credentials::new().with("token", api_token);
// let provider = get_provider("cloudflare", "example.com", credentials, None).await?;
// provider
//     .create_or_update_dns_record("example.com", "www.example.com", "A", "192.0.2.1", 300, false)
//     .await?;
// ```

pub use dnsproviders_core::*;

#[cfg(feature = "cloudflare")]
pub use dnsproviders_cloudflare as cloudflare;

#[cfg(feature = "googleclouddns")]
pub use dnsproviders_googleclouddns as googleclouddns;

#[cfg(feature = "otc")]
pub use dnsproviders_otc as otc;

/// A registry with every compiled-in adapter registered
pub fn default_registry() -> ProviderRegistry {
    let registry = ProviderRegistry::new();

    #[cfg(feature = "cloudflare")]
    dnsproviders_cloudflare::register(&registry);

    #[cfg(feature = "googleclouddns")]
    dnsproviders_googleclouddns::register(&registry);

    #[cfg(feature = "otc")]
    dnsproviders_otc::register(&registry);

    registry
}

/// Build a provider by type tag with default options
///
/// # Errors
///
/// - `Error::UnknownProviderType` if the tag is unknown or its feature is off
/// - `Error::Config` if required credential keys are missing
/// - Any error the adapter raises while connecting (Google lists managed
///   zones during construction)
pub async fn get_provider(
    provider_type: &str,
    zone: &str,
    credentials: Credentials,
    logger: Option<SharedLogger>,
) -> Result<Box<dyn Provider>> {
    get_provider_with_options(provider_type, zone, credentials, logger, ProviderOptions::default())
        .await
}

/// Build a provider by type tag
pub async fn get_provider_with_options(
    provider_type: &str,
    zone: &str,
    credentials: Credentials,
    logger: Option<SharedLogger>,
    options: ProviderOptions,
) -> Result<Box<dyn Provider>> {
    let config = ProviderConfig::new(provider_type.parse()?, zone, credentials).with_options(options);
    create_provider(&config, logger).await
}

/// Build a provider from a full configuration
pub async fn create_provider(
    config: &ProviderConfig,
    logger: Option<SharedLogger>,
) -> Result<Box<dyn Provider>> {
    tracing::debug!(provider = %config.provider_type, zone = %config.zone, "getting DNS provider");
    default_registry().create_provider(config, logger).await
}
