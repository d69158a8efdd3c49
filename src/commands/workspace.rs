//! Workspace commands: list, info, devices, racks, relays.

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::api::types::{Device, Rack, Relay, Workspace};
use crate::api::ConchApi;
use crate::app::output::{cell, print_json, Table};

pub fn workspaces_table(workspaces: &[Workspace]) -> Table {
    let mut table = Table::new(&["ID", "NAME", "ROLE", "DESCRIPTION"]);
    for ws in workspaces {
        table.add_row(vec![
            ws.id.to_string(),
            ws.name.clone(),
            cell(ws.role.as_deref()),
            cell(ws.description.as_deref()),
        ]);
    }
    table
}

pub fn devices_table(devices: &[Device]) -> Table {
    let mut table = Table::new(&["SERIAL", "ASSET TAG", "HEALTH", "DATACENTER", "RACK", "UNIT", "LAST SEEN"]);
    for device in devices {
        let location = device.location.as_ref();
        table.add_row(vec![
            device.id.clone(),
            cell(device.asset_tag.as_deref()),
            device.health.clone(),
            cell(location.and_then(|l| l.datacenter.as_ref()).map(|dc| dc.name.as_str())),
            cell(location.and_then(|l| l.rack.as_ref()).map(|r| r.name.as_str())),
            cell(location.and_then(|l| l.rack_unit_start)),
            cell(device.last_seen.map(|t| t.format("%Y-%m-%d %H:%M:%S"))),
        ]);
    }
    table
}

pub fn racks_table(racks: &[Rack]) -> Table {
    let mut table = Table::new(&["ID", "NAME", "ROLE", "SIZE", "DATACENTER", "PROGRESS"]);
    for rack in racks {
        let progress: Vec<String> = rack
            .device_progress
            .iter()
            .map(|(state, count)| format!("{}: {}", state, count))
            .collect();
        table.add_row(vec![
            rack.id.to_string(),
            rack.name.clone(),
            cell(rack.role.as_deref()),
            cell(rack.size),
            cell(rack.datacenter.as_deref()),
            progress.join(", "),
        ]);
    }
    table
}

pub fn relays_table(relays: &[Relay]) -> Table {
    let mut table = Table::new(&["ID", "ALIAS", "VERSION", "IP", "SSH PORT", "LAST SEEN"]);
    for relay in relays {
        table.add_row(vec![
            relay.id.clone(),
            cell(relay.alias.as_deref()),
            cell(relay.version.as_deref()),
            cell(relay.ipaddr.as_deref()),
            cell(relay.ssh_port),
            cell(relay.last_seen.map(|t| t.format("%Y-%m-%d %H:%M:%S"))),
        ]);
    }
    table
}

/// Keep devices whose health matches `health` (case-insensitive).
pub fn filter_by_health(devices: Vec<Device>, health: Option<&str>) -> Vec<Device> {
    match health {
        Some(wanted) => devices
            .into_iter()
            .filter(|d| d.health.eq_ignore_ascii_case(wanted.trim()))
            .collect(),
        None => devices,
    }
}

pub async fn list_workspaces(api: &dyn ConchApi, json: bool) -> Result<()> {
    let workspaces = api.workspaces().await.context("Failed to list workspaces")?;
    if json {
        return print_json(&workspaces);
    }
    workspaces_table(&workspaces).print();
    Ok(())
}

pub async fn workspace_info(api: &dyn ConchApi, id: Uuid, json: bool) -> Result<()> {
    let ws = api.workspace(id).await.with_context(|| format!("Failed to fetch workspace {}", id))?;
    if json {
        return print_json(&ws);
    }
    println!("ID:          {}", ws.id);
    println!("Name:        {}", ws.name);
    println!("Role:        {}", cell(ws.role.as_deref()));
    println!("Description: {}", cell(ws.description.as_deref()));
    if let Some(parent) = ws.parent_workspace_id {
        println!("Parent:      {}", parent);
    }
    Ok(())
}

pub async fn workspace_devices(api: &dyn ConchApi, id: Uuid, health: Option<&str>, json: bool) -> Result<()> {
    let devices = api
        .workspace_devices(id)
        .await
        .with_context(|| format!("Failed to fetch devices for workspace {}", id))?;
    let devices = filter_by_health(devices, health);
    if json {
        return print_json(&devices);
    }
    devices_table(&devices).print();
    Ok(())
}

pub async fn workspace_racks(api: &dyn ConchApi, id: Uuid, json: bool) -> Result<()> {
    let racks = api
        .workspace_racks(id)
        .await
        .with_context(|| format!("Failed to fetch racks for workspace {}", id))?;
    if json {
        return print_json(&racks);
    }
    racks_table(&racks).print();
    Ok(())
}

pub async fn workspace_relays(api: &dyn ConchApi, id: Uuid, json: bool) -> Result<()> {
    let relays = api
        .workspace_relays(id)
        .await
        .with_context(|| format!("Failed to fetch relays for workspace {}", id))?;
    if json {
        return print_json(&relays);
    }
    relays_table(&relays).print();
    Ok(())
}
