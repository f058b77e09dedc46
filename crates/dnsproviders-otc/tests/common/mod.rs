//! Test doubles for OTC provider contract tests

#![allow(dead_code)]

use async_trait::async_trait;
use dnsproviders_core::{Error, Result};
use dnsproviders_otc::{OtcDnsApi, RecordSet, RecordSetCreate, RecordSetUpdate, Zone};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const ZONE: &str = "example.com.";
pub const ZONE_ID: &str = "zone-1";

/// In-memory OTC DNS with a single zone
///
/// The record set listing filters by substring, like the real service.
#[derive(Default)]
pub struct FakeOtcDns {
    recordsets: Mutex<Vec<RecordSet>>,
    next_id: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    recordset_lists: AtomicUsize,
}

impl FakeOtcDns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record set with values stored exactly as given
    pub fn seed(&self, fqdn: &str, record_type: &str, ttl: u32, records: &[&str]) -> String {
        let id = format!("rs-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.recordsets.lock().unwrap().push(RecordSet {
            id: id.clone(),
            name: fqdn.to_string(),
            record_type: record_type.to_string(),
            ttl,
            records: records.iter().map(|s| s.to_string()).collect(),
        });
        id
    }

    pub fn recordsets(&self) -> Vec<RecordSet> {
        self.recordsets.lock().unwrap().clone()
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

    pub fn recordset_lists(&self) -> usize {
        self.recordset_lists.load(Ordering::SeqCst)
    }

    pub fn mutations(&self) -> usize {
        self.create_calls() + self.update_calls() + self.delete_calls()
    }

    fn check_zone(zone_id: &str) -> Result<()> {
        if zone_id == ZONE_ID {
            Ok(())
        } else {
            Err(Error::provider("opentelekomcloud", "zone not found"))
        }
    }
}

#[async_trait]
impl OtcDnsApi for FakeOtcDns {
    async fn list_zones(&self, name: &str) -> Result<Vec<Zone>> {
        let zone = Zone {
            id: ZONE_ID.to_string(),
            name: ZONE.to_string(),
        };
        // Fuzzy like the real filter: "ample.com." also returns the zone
        Ok(if ZONE.contains(name) { vec![zone] } else { Vec::new() })
    }

    async fn list_recordsets(&self, zone_id: &str, name: &str) -> Result<Vec<RecordSet>> {
        self.recordset_lists.fetch_add(1, Ordering::SeqCst);
        Self::check_zone(zone_id)?;
        Ok(self
            .recordsets()
            .into_iter()
            .filter(|r| r.name.contains(name))
            .collect())
    }

    async fn create_recordset(&self, zone_id: &str, recordset: &RecordSetCreate) -> Result<RecordSet> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Self::check_zone(zone_id)?;
        let records: Vec<&str> = recordset.records.iter().map(String::as_str).collect();
        let id = self.seed(&recordset.name, &recordset.record_type, recordset.ttl, &records);
        self.recordsets()
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::provider("opentelekomcloud", "lost record"))
    }

    async fn update_recordset(
        &self,
        zone_id: &str,
        recordset_id: &str,
        update: &RecordSetUpdate,
    ) -> Result<RecordSet> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        Self::check_zone(zone_id)?;
        let mut recordsets = self.recordsets.lock().unwrap();
        let existing = recordsets
            .iter_mut()
            .find(|r| r.id == recordset_id)
            .ok_or_else(|| Error::provider("opentelekomcloud", "record set not found"))?;
        existing.ttl = update.ttl;
        existing.records = update.records.clone();
        Ok(existing.clone())
    }

    async fn delete_recordset(&self, zone_id: &str, recordset_id: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Self::check_zone(zone_id)?;
        self.recordsets.lock().unwrap().retain(|r| r.id != recordset_id);
        Ok(())
    }
}
