//! Device health counts per datacenter and rack.

use anyhow::{Context, Result};
use tracing::info;
use uuid::Uuid;

use crate::api::types::Device;
use crate::api::ConchApi;

use super::aggregator::{aggregate, AggregateOptions, Keys, Report};
use super::metric::Count;

/// Bucket devices by location and count them per health status.
pub fn summarize_health(devices: &[Device], options: AggregateOptions) -> Report<Count> {
    aggregate(devices, options, |device| {
        let health = device.health.trim().to_ascii_uppercase();
        Some((Keys::from_location(device.location.as_ref(), health), ()))
    })
}

pub async fn health_summary(api: &dyn ConchApi, workspace_id: Uuid, options: AggregateOptions) -> Result<Report<Count>> {
    let devices = api
        .workspace_devices(workspace_id)
        .await
        .with_context(|| format!("Failed to fetch devices for workspace {}", workspace_id))?;
    info!("Summarizing health for {} devices in workspace {}", devices.len(), workspace_id);

    Ok(summarize_health(&devices, options))
}
