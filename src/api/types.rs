//! Conch API data types: workspaces, devices, racks, relays, hardware products, validation states.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Explicit `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Workspace the authenticated user has access to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub parent_workspace_id: Option<Uuid>,
}

/// Device as returned by workspace listings and `/device/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Device serial number
    pub id: String,
    #[serde(default)]
    pub asset_tag: Option<String>,
    #[serde(default)]
    pub hardware_product: Option<Uuid>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub health: String, // "PASS", "FAIL", "UNKNOWN"
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub graduated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub validated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<DeviceLocation>,
}

/// Physical placement of a device
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceLocation {
    #[serde(default)]
    pub datacenter: Option<DatacenterRef>,
    #[serde(default)]
    pub rack: Option<RackRef>,
    #[serde(default)]
    pub rack_unit_start: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatacenterRef {
    pub id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RackRef {
    pub id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Rack as listed under a workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rack {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub datacenter: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub device_progress: BTreeMap<String, u32>,
}

/// Provisioning relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relay {
    pub id: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub ipaddr: Option<String>,
    #[serde(default)]
    pub ssh_port: Option<u16>,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

/// Hardware product (platform) definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareProduct {
    pub id: Uuid,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alias: String,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
}

impl HardwareProduct {
    /// Label used in reports: display name when `platform_name` is set, internal alias otherwise.
    pub fn label(&self, platform_name: bool) -> &str {
        if platform_name || self.alias.is_empty() {
            &self.name
        } else {
            &self.alias
        }
    }
}

/// One validation run against a device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationState {
    pub id: Uuid,
    pub device_id: String,
    pub status: String, // "pass", "fail", "error"
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<ValidationResult>,
}

/// Single check within a validation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String, // component type, e.g. "RAM", "DISK"
    #[serde(default)]
    pub component_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl ValidationResult {
    pub fn is_failure(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "fail" | "error")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub jwt_token: String,
}

/// Free-form key/value settings (device or user)
pub type Settings = BTreeMap<String, serde_json::Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_decodes_with_sparse_fields() {
        let device: Device = serde_json::from_str(r#"{"id": "S1", "health": "FAIL"}"#).unwrap();
        assert_eq!(device.id, "S1");
        assert_eq!(device.health, "FAIL");
        assert!(device.location.is_none());
        assert!(device.hardware_product.is_none());
    }

    #[test]
    fn test_device_decodes_location() {
        let json = r#"{
            "id": "S2",
            "health": "PASS",
            "location": {
                "datacenter": {"id": "8f2c3c1e-3b0b-4a4e-9d6f-1e2f3a4b5c6d", "name": "AZ1"},
                "rack": {"id": "0b6a9d0c-5e8f-4f5e-8a3c-2b1d0e9f8a7b", "name": "R1", "role": "compute"},
                "rack_unit_start": 12
            }
        }"#;
        let device: Device = serde_json::from_str(json).unwrap();
        let location = device.location.unwrap();
        assert_eq!(location.datacenter.unwrap().name, "AZ1");
        assert_eq!(location.rack.unwrap().name, "R1");
        assert_eq!(location.rack_unit_start, Some(12));
    }

    #[test]
    fn test_null_classification_fields_land_in_unknown() {
        use crate::report::health_summary::summarize_health;
        use crate::report::normalize::{normalize_category, UNKNOWN};
        use crate::report::{AggregateOptions, Count};

        let json = r#"[
            {"id": "S1", "health": "PASS"},
            {
                "id": "S2",
                "health": null,
                "location": {
                    "datacenter": {"id": "8f2c3c1e-3b0b-4a4e-9d6f-1e2f3a4b5c6d", "name": null},
                    "rack": {"id": "0b6a9d0c-5e8f-4f5e-8a3c-2b1d0e9f8a7b", "name": null}
                }
            }
        ]"#;
        let devices: Vec<Device> = serde_json::from_str(json).unwrap();
        assert_eq!(devices[1].health, "");

        let options = AggregateOptions {
            breakout: true,
            ..AggregateOptions::default()
        };
        let report = summarize_health(&devices, options);
        let unknown = report.datacenter(UNKNOWN).unwrap();
        assert_eq!(unknown.summary().get(UNKNOWN), Some(&Count(1)));
        assert_eq!(unknown.summary().get("PASS"), Some(&Count(1)));
        assert!(unknown.racks().contains_key(UNKNOWN));

        let result: ValidationResult =
            serde_json::from_str(r#"{"category": null, "status": null, "component_id": null}"#).unwrap();
        assert_eq!(normalize_category(&result.category), UNKNOWN);
        assert!(!result.is_failure());
    }

    #[test]
    fn test_hardware_product_label() {
        let product = HardwareProduct {
            id: Uuid::new_v4(),
            name: "Joyent-Compute-Platform-3301".to_string(),
            alias: "HA8146-3301".to_string(),
            prefix: None,
            vendor: Some("Dell".to_string()),
        };
        assert_eq!(product.label(true), "Joyent-Compute-Platform-3301");
        assert_eq!(product.label(false), "HA8146-3301");
    }

    #[test]
    fn test_validation_result_failure_status() {
        let mut result = ValidationResult {
            id: None,
            category: "RAM".to_string(),
            component_id: None,
            status: "FAIL".to_string(),
            message: None,
            hint: None,
        };
        assert!(result.is_failure());
        result.status = "error".to_string();
        assert!(result.is_failure());
        result.status = "pass".to_string();
        assert!(!result.is_failure());
    }
}
