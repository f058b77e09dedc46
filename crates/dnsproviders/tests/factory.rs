//! Factory selection across the built-in adapters

use dnsproviders::{
    Credentials, Error, ProviderOptions, ProviderType, default_registry, get_provider,
    get_provider_with_options,
};
use httpmock::prelude::*;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::json;

#[test]
fn default_registry_has_every_adapter() {
    let registry = default_registry();
    assert_eq!(
        registry.list_providers(),
        vec![
            ProviderType::Cloudflare,
            ProviderType::GoogleCloudDns,
            ProviderType::OpenTelekomCloud,
        ]
    );
}

#[tokio::test]
async fn unknown_provider_type() {
    let err = get_provider("route53", "example.com", Credentials::new(), None)
        .await
        .err().unwrap();
    assert!(matches!(err, Error::UnknownProviderType(ref t) if t == "route53"));
}

#[tokio::test]
async fn cloudflare_requires_token() {
    let err = get_provider("cloudflare", "example.com", Credentials::new(), None)
        .await
        .err().unwrap();
    assert!(err.to_string().contains("missing key token in cloudflare dns provider credentials data"));

    let provider = get_provider(
        "cloudflare",
        "example.com",
        Credentials::new().with("token", "cf-token"),
        None,
    )
    .await
    .unwrap();
    assert_eq!(provider.provider_name(), "cloudflare");
}

#[tokio::test]
async fn googleclouddns_requires_project_id() {
    let err = get_provider("googleclouddns", "example.com", Credentials::new(), None)
        .await
        .err().unwrap();
    assert!(matches!(err, Error::Config(ref m) if m.contains("project_id")));
}

#[tokio::test]
async fn otc_builds_without_network() {
    let credentials = Credentials::new()
        .with("region", "eu-de")
        .with("domainName", "OTC-EU-DE-0001")
        .with("tenantName", "eu-de")
        .with("username", "user")
        .with("password", "pass");

    let provider = get_provider("opentelekomcloud", "example.com.", credentials, None)
        .await
        .unwrap();
    assert_eq!(provider.provider_name(), "opentelekomcloud");
}

#[tokio::test]
async fn injected_http_client_carries_every_request() {
    let server = MockServer::start_async().await;
    let zones = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/zones")
                .query_param("name", "example.com")
                .header("x-request-source", "injected-client")
                .header("authorization", "Bearer cf-token");
            then.status(200).json_body(json!({
                "success": true,
                "errors": [],
                "result": [{ "id": "zone-123", "name": "example.com" }]
            }));
        })
        .await;
    let records = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/zones/zone-123/dns_records")
                .header("x-request-source", "injected-client");
            then.status(200).json_body(json!({
                "success": true,
                "errors": [],
                "result": [{
                    "id": "rec-1", "type": "A", "name": "www.example.com",
                    "content": "192.0.2.1", "ttl": 300, "proxied": false
                }],
                "result_info": { "page": 1, "total_pages": 1 }
            }));
        })
        .await;

    let mut headers = HeaderMap::new();
    headers.insert("x-request-source", HeaderValue::from_static("injected-client"));
    let client = reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .unwrap();

    let options = ProviderOptions::default()
        .with_api_endpoint(server.base_url())
        .with_http_client(client);
    let provider = get_provider_with_options(
        "cloudflare",
        "example.com",
        Credentials::new().with("token", "cf-token"),
        None,
        options,
    )
    .await
    .unwrap();

    let found = provider.get_dns_records("example.com", "").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].content, vec!["192.0.2.1".to_string()]);

    zones.assert_async().await;
    records.assert_async().await;
}
