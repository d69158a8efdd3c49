//! In-memory ConchApi used by the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use conch_shell::api::types::{Device, HardwareProduct, Rack, Relay, Settings, ValidationState, Workspace};
use conch_shell::api::{ApiError, ConchApi, Result};

#[derive(Default)]
pub struct FakeApi {
    pub devices: Vec<Device>,
    pub products: Vec<HardwareProduct>,
    pub validation: BTreeMap<String, Vec<ValidationState>>,
    /// Serials whose lookups answer with a 500
    pub broken: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self, serial: &str) -> Result<()> {
        if self.broken.contains(serial) {
            return Err(ApiError::Status {
                status: 500,
                message: format!("lookup of {} failed", serial),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ConchApi for FakeApi {
    async fn workspaces(&self) -> Result<Vec<Workspace>> {
        self.record("workspaces".to_string());
        Ok(Vec::new())
    }

    async fn workspace(&self, workspace_id: Uuid) -> Result<Workspace> {
        self.record(format!("workspace {}", workspace_id));
        Err(ApiError::Status {
            status: 404,
            message: "not found".to_string(),
        })
    }

    async fn workspace_devices(&self, workspace_id: Uuid) -> Result<Vec<Device>> {
        self.record(format!("workspace_devices {}", workspace_id));
        Ok(self.devices.clone())
    }

    async fn workspace_racks(&self, _workspace_id: Uuid) -> Result<Vec<Rack>> {
        Ok(Vec::new())
    }

    async fn workspace_relays(&self, _workspace_id: Uuid) -> Result<Vec<Relay>> {
        Ok(Vec::new())
    }

    async fn device(&self, device_id: &str) -> Result<Device> {
        self.record(format!("device {}", device_id));
        self.check(device_id)?;
        self.devices
            .iter()
            .find(|d| d.id == device_id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: format!("no device {}", device_id),
            })
    }

    async fn device_settings(&self, _device_id: &str) -> Result<Settings> {
        Ok(Settings::new())
    }

    async fn device_validation_states(&self, device_id: &str) -> Result<Vec<ValidationState>> {
        self.record(format!("validation {}", device_id));
        self.check(device_id)?;
        Ok(self.validation.get(device_id).cloned().unwrap_or_default())
    }

    async fn relays(&self) -> Result<Vec<Relay>> {
        Ok(Vec::new())
    }

    async fn hardware_products(&self) -> Result<Vec<HardwareProduct>> {
        self.record("hardware_products".to_string());
        Ok(self.products.clone())
    }

    async fn user_settings(&self) -> Result<Settings> {
        Ok(Settings::new())
    }
}

pub const DC_EAST: &str = "3c0c2e3c-6f1e-4b7a-9a55-0a8f6d1e2b11";
pub const DC_WEST: &str = "9d4f7a1b-2c3e-4d5f-8a6b-7c8d9e0f1a22";

/// Device placed in `dc` (name, id) and `rack`.
pub fn device(serial: &str, health: &str, dc: Option<(&str, &str)>, rack: &str, product: Option<Uuid>) -> Device {
    let location = dc.map(|(name, id)| {
        json!({
            "datacenter": {"id": id, "name": name},
            "rack": {"id": Uuid::new_v4(), "name": rack, "role": "compute"},
            "rack_unit_start": 1
        })
    });
    serde_json::from_value(json!({
        "id": serial,
        "health": health,
        "hardware_product": product,
        "location": location,
    }))
    .unwrap()
}

/// Validation state with (category, component, status) results.
pub fn validation(serial: &str, results: &[(&str, Option<&str>, &str)]) -> ValidationState {
    let results: Vec<_> = results
        .iter()
        .map(|(category, component, status)| json!({"category": category, "component_id": component, "status": status}))
        .collect();
    serde_json::from_value(json!({
        "id": Uuid::new_v4(),
        "device_id": serial,
        "status": "fail",
        "results": results,
    }))
    .unwrap()
}

pub fn product(name: &str, alias: &str, vendor: Option<&str>) -> HardwareProduct {
    HardwareProduct {
        id: Uuid::new_v4(),
        name: name.to_string(),
        alias: alias.to_string(),
        prefix: None,
        vendor: vendor.map(str::to_string),
    }
}
