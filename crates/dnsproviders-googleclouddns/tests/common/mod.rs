//! Test doubles for Google Cloud DNS provider contract tests

#![allow(dead_code)]

use async_trait::async_trait;
use dnsproviders_core::logger::Field;
use dnsproviders_core::{Error, Logger, Result, format_fields};
use dnsproviders_googleclouddns::{Change, CloudDnsApi, ManagedZone, ResourceRecordSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const ZONE: &str = "example.com";
pub const MANAGED_ZONE: &str = "example-com";

/// In-memory Cloud DNS project with one managed zone
pub struct FakeCloudDns {
    rrsets: Mutex<Vec<ResourceRecordSet>>,
    changes: Mutex<Vec<Change>>,
    zone_lists: AtomicUsize,
    rrset_lists: AtomicUsize,
    patch_calls: AtomicUsize,
    change_calls: AtomicUsize,
}

impl Default for FakeCloudDns {
    fn default() -> Self {
        Self {
            rrsets: Mutex::new(Vec::new()),
            changes: Mutex::new(Vec::new()),
            zone_lists: AtomicUsize::new(0),
            rrset_lists: AtomicUsize::new(0),
            patch_calls: AtomicUsize::new(0),
            change_calls: AtomicUsize::new(0),
        }
    }
}

impl FakeCloudDns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, name: &str, record_type: &str, ttl: u32, rrdatas: &[&str]) {
        self.rrsets.lock().unwrap().push(ResourceRecordSet::new(
            name,
            record_type,
            ttl,
            rrdatas.iter().map(|s| s.to_string()).collect(),
        ));
    }

    pub fn seed_rrset(&self, rrset: ResourceRecordSet) {
        self.rrsets.lock().unwrap().push(rrset);
    }

    pub fn rrsets(&self) -> Vec<ResourceRecordSet> {
        self.rrsets.lock().unwrap().clone()
    }

    /// Changes submitted so far, in order
    pub fn changes(&self) -> Vec<Change> {
        self.changes.lock().unwrap().clone()
    }

    pub fn zone_lists(&self) -> usize {
        self.zone_lists.load(Ordering::SeqCst)
    }

    pub fn rrset_lists(&self) -> usize {
        self.rrset_lists.load(Ordering::SeqCst)
    }

    pub fn patch_calls(&self) -> usize {
        self.patch_calls.load(Ordering::SeqCst)
    }

    pub fn change_calls(&self) -> usize {
        self.change_calls.load(Ordering::SeqCst)
    }

    pub fn mutations(&self) -> usize {
        self.patch_calls() + self.change_calls()
    }

    fn check_zone(managed_zone: &str) -> Result<()> {
        if managed_zone == MANAGED_ZONE {
            Ok(())
        } else {
            Err(Error::provider("googleclouddns", format!("unknown managed zone {}", managed_zone)))
        }
    }
}

#[async_trait]
impl CloudDnsApi for FakeCloudDns {
    async fn list_managed_zones(&self) -> Result<Vec<ManagedZone>> {
        self.zone_lists.fetch_add(1, Ordering::SeqCst);
        Ok(vec![ManagedZone {
            name: MANAGED_ZONE.to_string(),
            dns_name: format!("{}.", ZONE),
        }])
    }

    async fn list_rrsets(&self, managed_zone: &str) -> Result<Vec<ResourceRecordSet>> {
        self.rrset_lists.fetch_add(1, Ordering::SeqCst);
        Self::check_zone(managed_zone)?;
        Ok(self.rrsets())
    }

    async fn patch_rrset(&self, managed_zone: &str, rrset: &ResourceRecordSet) -> Result<()> {
        self.patch_calls.fetch_add(1, Ordering::SeqCst);
        Self::check_zone(managed_zone)?;
        let mut rrsets = self.rrsets.lock().unwrap();
        let existing = rrsets
            .iter_mut()
            .find(|r| r.name == rrset.name && r.record_type == rrset.record_type)
            .ok_or_else(|| Error::provider("googleclouddns", "record set not found"))?;
        *existing = rrset.clone();
        Ok(())
    }

    async fn create_change(&self, managed_zone: &str, change: &Change) -> Result<()> {
        self.change_calls.fetch_add(1, Ordering::SeqCst);
        Self::check_zone(managed_zone)?;
        let mut rrsets = self.rrsets.lock().unwrap();
        for deletion in &change.deletions {
            let index = rrsets
                .iter()
                .position(|r| r == deletion)
                .ok_or_else(|| Error::provider("googleclouddns", "deletion does not match"))?;
            rrsets.remove(index);
        }
        rrsets.extend(change.additions.iter().cloned());
        self.changes.lock().unwrap().push(change.clone());
        Ok(())
    }
}

/// Logger that keeps every message for later assertions
#[derive(Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().unwrap().iter().any(|l| l.contains(needle))
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
