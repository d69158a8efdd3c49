//! Shell configuration structs and defaults.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShellConfig {
    #[serde(default)]
    pub shell: ShellSettings,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellSettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: f64, // seconds
    #[serde(default = "default_output")]
    pub default_output: String, // "text" | "json"
}

pub fn default_log_level() -> String { "WARN".to_string() }
pub fn default_request_timeout() -> f64 { 30.0 }
pub fn default_output() -> String { "text".to_string() }

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            request_timeout: default_request_timeout(),
            default_output: default_output(),
        }
    }
}

/// Stored API endpoint + credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub api_url: String,
    #[serde(default)]
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl ShellConfig {
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn active_profile(&self) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.active)
    }

    /// Insert or replace a profile by name and make it the only active one.
    pub fn upsert_active(&mut self, mut profile: Profile) {
        for p in self.profiles.iter_mut() {
            p.active = false;
        }
        profile.active = true;
        match self.profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
    }

    pub fn set_active(&mut self, name: &str) -> Result<()> {
        if self.profile(name).is_none() {
            return Err(anyhow!("No profile named '{}'", name));
        }
        for p in self.profiles.iter_mut() {
            p.active = p.name == name;
        }
        Ok(())
    }

    pub fn remove_profile(&mut self, name: &str) -> Result<Profile> {
        let index = self
            .profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| anyhow!("No profile named '{}'", name))?;
        Ok(self.profiles.remove(index))
    }

    /// Pick the profile a command runs against.
    ///
    /// Priority: explicit URL + token (flags/env), named profile, active profile.
    pub fn resolve(&self, name: Option<&str>, url: Option<&str>, token: Option<&str>) -> Result<Profile> {
        if let (Some(url), Some(token)) = (url, token) {
            return Ok(Profile {
                name: "env".to_string(),
                api_url: url.to_string(),
                user: String::new(),
                token: Some(token.to_string()),
                active: true,
            });
        }

        let profile = match name {
            Some(name) => self.profile(name).ok_or_else(|| anyhow!("No profile named '{}'", name))?,
            None => self
                .active_profile()
                .ok_or_else(|| anyhow!("No active profile. Run 'conch login' first"))?,
        };

        let mut profile = profile.clone();
        if let Some(token) = token {
            profile.token = Some(token.to_string());
        }
        Ok(profile)
    }
}
