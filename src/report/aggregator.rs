//! Hierarchical aggregator: buckets records by datacenter -> rack -> category.
//!
//! An [`Aggregator`] is filled in one pass and consumed by [`Aggregator::finish`],
//! which finalizes every metric and hands back an immutable [`Report`]. Derived
//! statistics are therefore never observable on a half-built tree.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;
use uuid::Uuid;

use crate::api::types::DeviceLocation;

use super::metric::Metric;
use super::normalize::{or_default, UNKNOWN};

/// Bucket names substituted for empty classification keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    pub datacenter: String,
    pub rack: String,
    pub category: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            datacenter: UNKNOWN.to_string(),
            rack: UNKNOWN.to_string(),
            category: UNKNOWN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AggregateOptions {
    /// Build per-rack buckets under each datacenter
    pub breakout: bool,
    /// Keep only records whose datacenter id matches exactly
    pub datacenter: Option<Uuid>,
    pub defaults: Defaults,
}

/// Device listed under a rack bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<String>,
}

/// Classification keys for one record
#[derive(Debug, Clone, Default)]
pub struct Keys {
    pub datacenter: String,
    pub datacenter_id: Option<Uuid>,
    pub rack: String,
    pub rack_id: Option<Uuid>,
    pub rack_role: Option<String>,
    pub category: String,
    /// Device to list under the rack bucket, keyed by serial
    pub device: Option<(String, DeviceEntry)>,
}

impl Keys {
    /// Keys from a device's location; absent parts stay empty and get defaulted on ingest.
    pub fn from_location(location: Option<&DeviceLocation>, category: impl Into<String>) -> Self {
        let datacenter = location.and_then(|l| l.datacenter.as_ref());
        let rack = location.and_then(|l| l.rack.as_ref());

        Self {
            datacenter: datacenter.map(|dc| dc.name.clone()).unwrap_or_default(),
            datacenter_id: datacenter.map(|dc| dc.id),
            rack: rack.map(|r| r.name.clone()).unwrap_or_default(),
            rack_id: rack.map(|r| r.id),
            rack_role: rack.and_then(|r| r.role.clone()),
            category: category.into(),
            device: None,
        }
    }

    pub fn with_device(mut self, serial: impl Into<String>, entry: DeviceEntry) -> Self {
        self.device = Some((serial.into(), entry));
        self
    }

    fn apply_defaults(mut self, defaults: &Defaults) -> Self {
        self.datacenter = or_default(&self.datacenter, &defaults.datacenter);
        self.rack = or_default(&self.rack, &defaults.rack);
        self.category = or_default(&self.category, &defaults.category);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RackInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RackBucket<M> {
    rack: RackInfo,
    summary: BTreeMap<String, M>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    failed_devices: BTreeMap<String, DeviceEntry>,
}

impl<M> RackBucket<M> {
    pub fn rack(&self) -> &RackInfo {
        &self.rack
    }

    pub fn summary(&self) -> &BTreeMap<String, M> {
        &self.summary
    }

    pub fn failed_devices(&self) -> &BTreeMap<String, DeviceEntry> {
        &self.failed_devices
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatacenterBucket<M> {
    datacenter: String,
    id: Option<Uuid>,
    summary: BTreeMap<String, M>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    racks: BTreeMap<String, RackBucket<M>>,
}

impl<M> DatacenterBucket<M> {
    pub fn name(&self) -> &str {
        &self.datacenter
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn summary(&self) -> &BTreeMap<String, M> {
        &self.summary
    }

    pub fn racks(&self) -> &BTreeMap<String, RackBucket<M>> {
        &self.racks
    }
}

/// Finished report: datacenter name -> bucket, all maps sorted by key
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Report<M> {
    datacenters: BTreeMap<String, DatacenterBucket<M>>,
}

impl<M> Report<M> {
    pub fn datacenters(&self) -> &BTreeMap<String, DatacenterBucket<M>> {
        &self.datacenters
    }

    pub fn datacenter(&self, name: &str) -> Option<&DatacenterBucket<M>> {
        self.datacenters.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.datacenters.is_empty()
    }
}

pub struct Aggregator<M: Metric> {
    options: AggregateOptions,
    datacenters: BTreeMap<String, DatacenterBucket<M>>,
    ingested: usize,
    filtered: usize,
}

impl<M: Metric> Aggregator<M> {
    pub fn new(options: AggregateOptions) -> Self {
        Self {
            options,
            datacenters: BTreeMap::new(),
            ingested: 0,
            filtered: 0,
        }
    }

    /// Add one record. Returns false when the datacenter filter dropped it.
    pub fn ingest(&mut self, keys: Keys, sample: M::Sample) -> bool {
        let keys = keys.apply_defaults(&self.options.defaults);

        if let Some(filter) = self.options.datacenter {
            if keys.datacenter_id != Some(filter) {
                trace!("Skipping record in datacenter {} (filter {})", keys.datacenter, filter);
                self.filtered += 1;
                return false;
            }
        }

        let dc = self
            .datacenters
            .entry(keys.datacenter.clone())
            .or_insert_with(|| DatacenterBucket {
                datacenter: keys.datacenter.clone(),
                id: keys.datacenter_id,
                summary: BTreeMap::new(),
                racks: BTreeMap::new(),
            });
        if dc.id.is_none() {
            dc.id = keys.datacenter_id;
        }

        dc.summary
            .entry(keys.category.clone())
            .or_default()
            .record(sample.clone());

        if self.options.breakout {
            let rack = dc.racks.entry(keys.rack.clone()).or_insert_with(|| RackBucket {
                rack: RackInfo {
                    name: keys.rack.clone(),
                    id: keys.rack_id,
                    role: keys.rack_role.clone(),
                },
                summary: BTreeMap::new(),
                failed_devices: BTreeMap::new(),
            });
            rack.summary.entry(keys.category).or_default().record(sample);

            if let Some((serial, entry)) = keys.device {
                let existing = rack.failed_devices.entry(serial).or_default();
                if existing.platform.is_none() {
                    existing.platform = entry.platform;
                }
                for component in entry.components {
                    if !existing.components.contains(&component) {
                        existing.components.push(component);
                    }
                }
            }
        }

        self.ingested += 1;
        true
    }

    pub fn ingested(&self) -> usize {
        self.ingested
    }

    pub fn filtered(&self) -> usize {
        self.filtered
    }

    /// Finalize every metric and freeze the tree.
    pub fn finish(mut self) -> Report<M> {
        for dc in self.datacenters.values_mut() {
            dc.summary.values_mut().for_each(Metric::finalize);
            for rack in dc.racks.values_mut() {
                rack.summary.values_mut().for_each(Metric::finalize);
                for entry in rack.failed_devices.values_mut() {
                    entry.components.sort();
                }
            }
        }
        Report {
            datacenters: self.datacenters,
        }
    }
}

/// One-shot aggregation over a record sequence. `classify` returns `None` to drop a record.
pub fn aggregate<R, M, F>(records: impl IntoIterator<Item = R>, options: AggregateOptions, mut classify: F) -> Report<M>
where
    M: Metric,
    F: FnMut(&R) -> Option<(Keys, M::Sample)>,
{
    let mut aggregator = Aggregator::new(options);
    for record in records {
        if let Some((keys, sample)) = classify(&record) {
            aggregator.ingest(keys, sample);
        }
    }
    aggregator.finish()
}
