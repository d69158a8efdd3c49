//! Config file load, save, and migration logic.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::types::ShellConfig;

pub const CONFIG_FILE_NAME: &str = ".conch.json";

/// `$HOME/.conch.json`, or `./.conch.json` when HOME is unset.
pub fn default_config_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_FILE_NAME)
}

/// Upgrade a config file written by older shells in place.
/// Returns true when the file was rewritten.
pub(crate) fn migrate_config(config_path: &Path) -> Result<bool> {
    if !config_path.exists() {
        return Ok(false);
    }

    let content = std::fs::read_to_string(config_path)?;
    let mut json: serde_json::Value = serde_json::from_str(&content)?;
    let mut migrated = false;

    if let Some(root) = json.as_object_mut() {
        // === ADDITIONS ===
        if !root.contains_key("shell") {
            root.insert("shell".to_string(), serde_json::to_value(ShellConfig::default().shell)?);
            info!("Migrated: added 'shell' section with defaults");
            migrated = true;
        }
    }

    if let Some(profiles) = json.get_mut("profiles").and_then(|p| p.as_array_mut()) {
        for profile in profiles.iter_mut().filter_map(|p| p.as_object_mut()) {
            // === RENAMES ===
            if let Some(url) = profile.remove("url") {
                if !profile.contains_key("api_url") {
                    profile.insert("api_url".to_string(), url);
                }
                info!("Migrated: renamed profile 'url' to 'api_url'");
                migrated = true;
            }

            // === REMOVALS ===
            if profile.remove("session").is_some() {
                info!("Migrated: removed obsolete profile 'session'");
                migrated = true;
            }
        }
    }

    if migrated {
        std::fs::write(config_path, serde_json::to_string_pretty(&json)?)?;
        info!("Config migrated to latest version: {:?}", config_path);
    }

    Ok(migrated)
}

/// `shell.log_level` from the config file, read without logging or migrating.
/// Used to pick the log filter before the subscriber exists.
pub fn peek_log_level(config_path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(config_path).ok()?;
    let json: serde_json::Value = serde_json::from_str(&content).ok()?;
    json.get("shell")?
        .get("log_level")?
        .as_str()
        .map(str::to_string)
}

pub async fn load_config(path: Option<&Path>) -> Result<ShellConfig> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    if let Err(e) = migrate_config(&config_path) {
        warn!("Config migration check failed: {}", e);
    }

    if config_path.exists() {
        let content = tokio::fs::read_to_string(&config_path)
            .await
            .with_context(|| format!("Failed to read config: {:?}", config_path))?;
        let config: ShellConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {:?}", config_path))?;

        debug!("Loaded configuration from: {:?}", config_path);
        Ok(config)
    } else {
        debug!("Config file {:?} not found, using defaults", config_path);
        Ok(ShellConfig::default())
    }
}

pub async fn save_config(config: &ShellConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_string_pretty(config)?;
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write config: {:?}", path))?;
    info!("Configuration saved to: {:?}", path);
    Ok(())
}
