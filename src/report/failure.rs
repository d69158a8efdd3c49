//! Validation failure report: failing devices broken down by component category.

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::types::{Device, HardwareProduct, ValidationState};
use crate::api::ConchApi;

use super::aggregator::{AggregateOptions, Aggregator, DeviceEntry, Keys, Report};
use super::metric::{Breakdown, BreakdownSample};
use super::normalize::{allows_subcategories, normalize_category, UNKNOWN};

#[derive(Debug, Clone, Default)]
pub struct FailureOptions {
    pub aggregate: AggregateOptions,
    /// Label platforms by display name instead of alias
    pub platform_name: bool,
    pub include_components: bool,
    pub include_vendors: bool,
}

impl FailureOptions {
    /// `full` implies both components and vendors.
    pub fn with_full(mut self, full: bool) -> Self {
        if full {
            self.include_components = true;
            self.include_vendors = true;
        }
        self
    }
}

/// One record per failing validation result of `device`.
///
/// Each record carries the device's platform label (display name or alias,
/// per `platform_name`) when its hardware product is known.
///
/// A failing device with no failing results still yields one `UNKNOWN` record
/// so it is counted.
pub fn classify_failures(
    device: &Device,
    states: &[ValidationState],
    product: Option<&HardwareProduct>,
    options: &FailureOptions,
) -> Vec<(Keys, BreakdownSample)> {
    let platform = product.map(|p| p.label(options.platform_name).to_string());
    let vendor = if options.include_vendors {
        Some(
            product
                .and_then(|p| p.vendor.clone())
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string()),
        )
    } else {
        None
    };

    let mut records = Vec::new();
    for result in states.iter().flat_map(|s| s.results.iter()).filter(|r| r.is_failure()) {
        let category = normalize_category(&result.category);
        let component = result
            .component_id
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let subcategory = if options.include_components && allows_subcategories(&category) {
            component.clone()
        } else {
            None
        };

        let entry = DeviceEntry {
            platform: platform.clone(),
            components: if options.include_components {
                vec![component.unwrap_or_else(|| category.clone())]
            } else {
                Vec::new()
            },
        };

        let keys = Keys::from_location(device.location.as_ref(), category).with_device(device.id.clone(), entry);
        records.push((
            keys,
            BreakdownSample {
                subcategory,
                vendor: vendor.clone(),
                platform: platform.clone(),
            },
        ));
    }

    if records.is_empty() {
        debug!("Device {} is failing but reported no failing validation results", device.id);
        let entry = DeviceEntry {
            platform: platform.clone(),
            components: Vec::new(),
        };
        let keys = Keys::from_location(device.location.as_ref(), UNKNOWN).with_device(device.id.clone(), entry);
        records.push((
            keys,
            BreakdownSample {
                subcategory: None,
                vendor,
                platform,
            },
        ));
    }

    records
}

fn in_datacenter(device: &Device, filter: Option<Uuid>) -> bool {
    match filter {
        None => true,
        Some(id) => device
            .location
            .as_ref()
            .and_then(|l| l.datacenter.as_ref())
            .map(|dc| dc.id == id)
            .unwrap_or(false),
    }
}

/// Build the failure report for a workspace.
///
/// Each failing device costs one validation-state lookup; the first lookup
/// error aborts the whole report.
pub async fn failure_report(api: &dyn ConchApi, workspace_id: Uuid, options: &FailureOptions) -> Result<Report<Breakdown>> {
    let devices = api
        .workspace_devices(workspace_id)
        .await
        .with_context(|| format!("Failed to fetch devices for workspace {}", workspace_id))?;

    let products: HashMap<Uuid, HardwareProduct> = api
        .hardware_products()
        .await
        .context("Failed to fetch hardware products")?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let failing: Vec<&Device> = devices
        .iter()
        .filter(|d| d.health.trim().eq_ignore_ascii_case("FAIL"))
        .filter(|d| in_datacenter(d, options.aggregate.datacenter))
        .collect();
    info!(
        "Building failure report: {} of {} devices failing in workspace {}",
        failing.len(),
        devices.len(),
        workspace_id
    );

    let mut aggregator: Aggregator<Breakdown> = Aggregator::new(options.aggregate.clone());
    for device in failing {
        let states = api
            .device_validation_states(&device.id)
            .await
            .with_context(|| format!("Failed to fetch validation state for device {}", device.id))?;

        let product = device.hardware_product.and_then(|id| products.get(&id));
        for (keys, sample) in classify_failures(device, &states, product, options) {
            aggregator.ingest(keys, sample);
        }
    }

    debug!("Failure report ingested {} records", aggregator.ingested());
    Ok(aggregator.finish())
}
