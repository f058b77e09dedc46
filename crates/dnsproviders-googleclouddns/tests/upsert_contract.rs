//! Contract Test: Google Cloud DNS record reconciliation
//!
//! Constraints verified:
//! - Zones resolve through the map built at construction
//! - Upsert creates through a change, patches on difference, skips on match
//! - Delete sends one change carrying the record sets exactly as listed

mod common;

use common::*;
use dnsproviders_core::{Error, Provider, UpsertOutcome, ZoneRefreshPolicy};
use dnsproviders_googleclouddns::{GoogleCloudDnsProvider, ResourceRecordSet};
use serde_json::json;
use std::sync::Arc;

async fn provider(api: &Arc<FakeCloudDns>, logger: &Arc<RecordingLogger>) -> GoogleCloudDnsProvider {
    GoogleCloudDnsProvider::with_api(api.clone(), ZoneRefreshPolicy::Never, logger.clone())
        .await
        .unwrap()
}

#[tokio::test]
async fn construction_lists_zones_once() {
    let api = Arc::new(FakeCloudDns::new());
    let logger = Arc::new(RecordingLogger::default());
    let provider = provider(&api, &logger).await;

    provider.get_dns_records(ZONE, "").await.unwrap();
    provider.get_dns_records("example.com.", "").await.unwrap();

    assert_eq!(api.zone_lists(), 1);
    assert!(logger.contains("example-com"));
}

#[tokio::test]
async fn upsert_creates_patches_and_skips() {
    let api = Arc::new(FakeCloudDns::new());
    let logger = Arc::new(RecordingLogger::default());
    let provider = provider(&api, &logger).await;

    let outcome = provider
        .create_or_update_dns_record(ZONE, "test-abc.example.com", "A", "192.0.2.1", 300, false)
        .await
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::Created);

    let changes = api.changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].additions[0].name, "test-abc.example.com.");
    assert!(changes[0].deletions.is_empty());

    let outcome = provider
        .create_or_update_dns_record(ZONE, "test-abc.example.com", "A", "192.0.2.2", 300, false)
        .await
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::Updated);
    assert_eq!(api.patch_calls(), 1);

    let mutations = api.mutations();
    let outcome = provider
        .create_or_update_dns_record(ZONE, "test-abc.example.com.", "A", "192.0.2.2", 300, false)
        .await
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::Unchanged);
    assert_eq!(api.mutations(), mutations);
    assert!(logger.contains("update dns record not needed"));

    let records = provider.get_dns_records(ZONE, "test-abc.example.com").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "test-abc.example.com");
    assert_eq!(records[0].content, vec!["192.0.2.2".to_string()]);
    assert_eq!(records[0].ttl, 300);
}

#[tokio::test]
async fn upsert_replaces_content_list_wholesale() {
    let api = Arc::new(FakeCloudDns::new());
    let logger = Arc::new(RecordingLogger::default());
    let provider = provider(&api, &logger).await;

    api.seed("www.example.com.", "A", 300, &["192.0.2.1", "192.0.2.2"]);

    let outcome = provider
        .create_or_update_dns_record(ZONE, "www.example.com", "A", "192.0.2.1", 600, false)
        .await
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::Updated);

    let rrsets = api.rrsets();
    assert_eq!(rrsets[0].rrdatas, vec!["192.0.2.1".to_string()]);
    assert_eq!(rrsets[0].ttl, 600);
}

#[tokio::test]
async fn upsert_matches_type_exactly() {
    let api = Arc::new(FakeCloudDns::new());
    let logger = Arc::new(RecordingLogger::default());
    let provider = provider(&api, &logger).await;

    api.seed("www.example.com.", "AAAA", 300, &["2001:db8::1"]);

    let outcome = provider
        .create_or_update_dns_record(ZONE, "www.example.com", "a", "192.0.2.1", 300, false)
        .await
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::Created);
    assert_eq!(api.rrsets().len(), 2);
    assert_eq!(api.rrsets()[1].record_type, "A");
}

#[tokio::test]
async fn get_filters_by_name() {
    let api = Arc::new(FakeCloudDns::new());
    let logger = Arc::new(RecordingLogger::default());
    let provider = provider(&api, &logger).await;

    api.seed("example.com.", "NS", 21600, &["ns-cloud-a1.googledomains.com."]);
    api.seed("www.example.com.", "A", 300, &["192.0.2.1"]);
    api.seed("www.example.com.", "TXT", 300, &["\"hello\""]);

    assert_eq!(provider.get_dns_records(ZONE, "").await.unwrap().len(), 3);
    assert_eq!(provider.get_dns_records(ZONE, "www.example.com").await.unwrap().len(), 2);
    assert_eq!(provider.get_dns_records(ZONE, "www.example.com.").await.unwrap().len(), 2);
    assert!(provider.get_dns_records(ZONE, "nope.example.com").await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_sends_exact_record_sets() {
    let api = Arc::new(FakeCloudDns::new());
    let logger = Arc::new(RecordingLogger::default());
    let provider = provider(&api, &logger).await;

    api.seed("www.example.com.", "A", 300, &["192.0.2.1"]);
    api.seed("www.example.com.", "TXT", 120, &["\"hello\""]);
    api.seed("mail.example.com.", "A", 300, &["192.0.2.7"]);

    let deleted = provider.delete_dns_record(ZONE, "www.example.com").await.unwrap();
    assert_eq!(deleted, 2);

    let changes = api.changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].deletions.len(), 2);
    assert_eq!(changes[0].deletions[1].ttl, 120);
    assert!(provider.get_dns_records(ZONE, "www.example.com").await.unwrap().is_empty());
    assert_eq!(api.rrsets().len(), 1);
}

#[tokio::test]
async fn delete_keeps_routing_policy_of_listed_set() {
    let api = Arc::new(FakeCloudDns::new());
    let logger = Arc::new(RecordingLogger::default());
    let provider = provider(&api, &logger).await;

    let routed: ResourceRecordSet = serde_json::from_value(json!({
        "kind": "dns#resourceRecordSet",
        "name": "geo.example.com.",
        "type": "A",
        "ttl": 300,
        "routingPolicy": {
            "geo": { "items": [{ "location": "us-east1", "rrdatas": ["192.0.2.10"] }] }
        }
    }))
    .unwrap();
    api.seed_rrset(routed.clone());

    let deleted = provider.delete_dns_record(ZONE, "geo.example.com").await.unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(api.changes()[0].deletions, vec![routed]);
    assert!(api.rrsets().is_empty());
}

#[tokio::test]
async fn delete_without_match_sends_nothing() {
    let api = Arc::new(FakeCloudDns::new());
    let logger = Arc::new(RecordingLogger::default());
    let provider = provider(&api, &logger).await;

    let deleted = provider.delete_dns_record(ZONE, "www.example.com").await.unwrap();
    assert_eq!(deleted, 0);
    assert_eq!(api.change_calls(), 0);
}

#[tokio::test]
async fn delete_with_empty_name_is_rejected() {
    let api = Arc::new(FakeCloudDns::new());
    let logger = Arc::new(RecordingLogger::default());
    let provider = provider(&api, &logger).await;

    api.seed("www.example.com.", "A", 300, &["192.0.2.1"]);
    let err = provider.delete_dns_record(ZONE, "").await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(api.rrsets().len(), 1);
}

#[tokio::test]
async fn unknown_zone_fails_without_record_calls() {
    let api = Arc::new(FakeCloudDns::new());
    let logger = Arc::new(RecordingLogger::default());
    let provider = provider(&api, &logger).await;

    let err = provider.get_dns_records("other.org", "").await.unwrap_err();
    assert!(matches!(err, Error::ZoneNotFound(ref z) if z == "other.org"));

    let err = provider
        .create_or_update_dns_record("other.org", "www.other.org", "A", "192.0.2.1", 300, false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ZoneNotFound(_)));

    assert_eq!(api.rrset_lists(), 0);
    assert_eq!(api.mutations(), 0);
}
