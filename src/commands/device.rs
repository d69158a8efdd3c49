//! Device commands: details, settings, validation states.

use anyhow::{Context, Result};

use crate::api::types::{Device, Settings, ValidationState};
use crate::api::ConchApi;
use crate::app::output::{cell, print_json, Table};

pub fn device_lines(device: &Device) -> Vec<String> {
    let location = device.location.as_ref();
    let mut lines = vec![
        format!("Serial:     {}", device.id),
        format!("Asset tag:  {}", cell(device.asset_tag.as_deref())),
        format!("Health:     {}", device.health),
        format!("State:      {}", cell(device.state.as_deref())),
        format!("Product:    {}", cell(device.hardware_product)),
    ];
    if let Some(dc) = location.and_then(|l| l.datacenter.as_ref()) {
        lines.push(format!("Datacenter: {} ({})", dc.name, dc.id));
    }
    if let Some(rack) = location.and_then(|l| l.rack.as_ref()) {
        let unit = cell(location.and_then(|l| l.rack_unit_start));
        lines.push(format!("Rack:       {} U{}", rack.name, unit));
    }
    if let Some(seen) = device.last_seen {
        lines.push(format!("Last seen:  {}", seen.format("%Y-%m-%d %H:%M:%S")));
    }
    lines
}

pub fn settings_table(settings: &Settings) -> Table {
    let mut table = Table::new(&["KEY", "VALUE"]);
    for (key, value) in settings {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        table.add_row(vec![key.clone(), value]);
    }
    table
}

/// One row per validation result, failures first within each state.
pub fn validation_table(states: &[ValidationState]) -> Table {
    let mut table = Table::new(&["STATE", "STATUS", "CATEGORY", "COMPONENT", "RESULT", "MESSAGE"]);
    for state in states {
        let mut results: Vec<_> = state.results.iter().collect();
        results.sort_by_key(|r| !r.is_failure());
        for result in results {
            table.add_row(vec![
                state.id.to_string(),
                state.status.clone(),
                result.category.clone(),
                cell(result.component_id.as_deref()),
                result.status.clone(),
                cell(result.message.as_deref()),
            ]);
        }
    }
    table
}

pub async fn get(api: &dyn ConchApi, id: &str, json: bool) -> Result<()> {
    let device = api.device(id).await.with_context(|| format!("Failed to fetch device {}", id))?;
    if json {
        return print_json(&device);
    }
    for line in device_lines(&device) {
        println!("{}", line);
    }
    Ok(())
}

pub async fn settings(api: &dyn ConchApi, id: &str, json: bool) -> Result<()> {
    let settings = api
        .device_settings(id)
        .await
        .with_context(|| format!("Failed to fetch settings for device {}", id))?;
    if json {
        return print_json(&settings);
    }
    settings_table(&settings).print();
    Ok(())
}

pub async fn validation_state(api: &dyn ConchApi, id: &str, json: bool) -> Result<()> {
    let states = api
        .device_validation_states(id)
        .await
        .with_context(|| format!("Failed to fetch validation state for device {}", id))?;
    if json {
        return print_json(&states);
    }
    validation_table(&states).print();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_settings_table_unquotes_strings() {
        let mut settings = Settings::new();
        settings.insert("build.state".to_string(), json!("ready"));
        settings.insert("retries".to_string(), json!(3));
        let rendered = settings_table(&settings).render();
        assert!(rendered.contains("build.state  ready"));
        assert!(rendered.contains("retries      3"));
    }

    #[test]
    fn test_validation_table_failures_first() {
        let state: ValidationState = serde_json::from_value(json!({
            "id": "5b4c4e4a-8a3f-4c8e-9f0a-0d3e2c1b6a7f",
            "device_id": "S1",
            "status": "fail",
            "results": [
                {"category": "CPU", "status": "pass"},
                {"category": "RAM", "status": "fail", "component_id": "DIMM-A1"}
            ]
        }))
        .unwrap();
        let rendered = validation_table(&[state]).render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("RAM"));
        assert!(lines[2].contains("DIMM-A1"));
        assert!(lines[3].contains("CPU"));
    }

    #[test]
    fn test_device_lines_without_location() {
        let device: Device = serde_json::from_value(json!({"id": "S9", "health": "UNKNOWN"})).unwrap();
        let lines = device_lines(&device);
        assert_eq!(lines[0], "Serial:     S9");
        assert!(!lines.iter().any(|l| l.starts_with("Datacenter")));
    }
}
