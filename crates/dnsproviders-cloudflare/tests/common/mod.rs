//! Test doubles for Cloudflare provider contract tests
//!
//! [`FakeCloudflare`] keeps records in memory and counts mutating calls so
//! tests can assert that idempotent upserts do not touch the API.

#![allow(dead_code)]

use async_trait::async_trait;
use dnsproviders_cloudflare::{CloudflareApi, DnsRecord, DnsRecordRequest, RecordFilter};
use dnsproviders_core::logger::Field;
use dnsproviders_core::{Error, Logger, Result, format_fields};
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const ZONE: &str = "example.com";
pub const ZONE_ID: &str = "zone-123";

/// In-memory Cloudflare account holding a single zone
#[derive(Default)]
pub struct FakeCloudflare {
    records: Mutex<Vec<DnsRecord>>,
    next_id: AtomicUsize,
    failing_deletes: Mutex<HashSet<String>>,
    zone_lookups: AtomicUsize,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl FakeCloudflare {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record and return its ID
    pub fn seed(&self, record_type: &str, name: &str, content: &str, ttl: u32, proxied: bool) -> String {
        let id = format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.records.lock().unwrap().push(DnsRecord {
            id: id.clone(),
            record_type: record_type.to_string(),
            name: name.to_string(),
            content: content.to_string(),
            ttl,
            proxied,
        });
        id
    }

    /// Make deleting `record_id` fail
    pub fn fail_delete(&self, record_id: &str) {
        self.failing_deletes.lock().unwrap().insert(record_id.to_string());
    }

    /// Overwrite the stored TTL of a record
    pub fn set_ttl(&self, record_id: &str, ttl: u32) {
        if let Some(record) = self.records.lock().unwrap().iter_mut().find(|r| r.id == record_id) {
            record.ttl = ttl;
        }
    }

    pub fn records(&self) -> Vec<DnsRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn zone_lookups(&self) -> usize {
        self.zone_lookups.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Total number of mutating calls
    pub fn mutations(&self) -> usize {
        self.create_calls() + self.update_calls() + self.delete_calls()
    }

    fn check_zone(zone_id: &str) -> Result<()> {
        if zone_id == ZONE_ID {
            Ok(())
        } else {
            Err(Error::provider("cloudflare", format!("unknown zone id {}", zone_id)))
        }
    }
}

#[async_trait]
impl CloudflareApi for FakeCloudflare {
    async fn zone_id_by_name(&self, zone: &str) -> Result<String> {
        self.zone_lookups.fetch_add(1, Ordering::SeqCst);
        if zone == ZONE {
            Ok(ZONE_ID.to_string())
        } else {
            Err(Error::zone_not_found(zone))
        }
    }

    async fn list_dns_records(&self, zone_id: &str, filter: &RecordFilter) -> Result<Vec<DnsRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Self::check_zone(zone_id)?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn create_dns_record(&self, zone_id: &str, record: &DnsRecordRequest) -> Result<DnsRecord> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Self::check_zone(zone_id)?;
        let id = self.seed(
            &record.record_type,
            &record.name,
            &record.content,
            record.ttl,
            record.proxied,
        );
        Ok(self.records().into_iter().find(|r| r.id == id).unwrap())
    }

    async fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DnsRecordRequest,
    ) -> Result<DnsRecord> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        Self::check_zone(zone_id)?;
        let mut records = self.records.lock().unwrap();
        let existing = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| Error::provider("cloudflare", "record not found"))?;
        existing.record_type = record.record_type.clone();
        existing.name = record.name.clone();
        existing.content = record.content.clone();
        existing.ttl = record.ttl;
        existing.proxied = record.proxied;
        Ok(existing.clone())
    }

    async fn delete_dns_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Self::check_zone(zone_id)?;
        if self.failing_deletes.lock().unwrap().contains(record_id) {
            return Err(Error::provider("cloudflare", "delete rejected"));
        }
        self.records.lock().unwrap().retain(|r| r.id != record_id);
        Ok(())
    }
}

/// Logger that keeps every message for later assertions
#[derive(Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl Logger for RecordingLogger {
    fn info(&self, message: &str, fields: &[Field<'_>]) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("{} {}", message, format_fields(fields)));
    }
}
