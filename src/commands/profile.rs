//! Login and stored profile management.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::api::HttpConchClient;
use crate::app::output::{print_json, Table};
use crate::config::{save_config, Profile, ShellConfig};

fn require_password(password: String) -> Result<String> {
    if password.is_empty() {
        bail!("Password must not be empty");
    }
    Ok(password)
}

/// Read the password from the terminal without echo.
fn prompt_password(user: &str) -> Result<String> {
    let password = rpassword::prompt_password(format!("Password for {}: ", user))
        .context("Failed to read password")?;
    require_password(password)
}

/// Authenticate and store the session as the active profile.
pub async fn login(
    config: &mut ShellConfig,
    config_path: &Path,
    url: &str,
    user: &str,
    password: Option<String>,
    name: &str,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password(user)?,
    };

    let timeout = Duration::from_secs_f64(config.shell.request_timeout.max(1.0));
    let client = HttpConchClient::new(url, None, timeout)?;
    let token = client
        .login(user, &password)
        .await
        .with_context(|| format!("Login to {} failed", client.base_url()))?;

    config.upsert_active(Profile {
        name: name.to_string(),
        api_url: client.base_url().to_string(),
        user: user.to_string(),
        token: Some(token),
        active: true,
    });
    save_config(config, config_path).await?;
    info!("Logged in as {} (profile '{}')", user, name);
    println!("Logged in to {} as {}. Profile '{}' is now active.", client.base_url(), user, name);
    Ok(())
}

pub fn profiles_table(config: &ShellConfig) -> Table {
    let mut table = Table::new(&["", "NAME", "URL", "USER"]);
    for profile in &config.profiles {
        table.add_row(vec![
            if profile.active { "*".to_string() } else { String::new() },
            profile.name.clone(),
            profile.api_url.clone(),
            profile.user.clone(),
        ]);
    }
    table
}

pub fn list(config: &ShellConfig, json: bool) -> Result<()> {
    if json {
        // Tokens stay out of listings.
        let redacted: Vec<Profile> = config
            .profiles
            .iter()
            .cloned()
            .map(|p| Profile { token: None, ..p })
            .collect();
        return print_json(&redacted);
    }
    if config.profiles.is_empty() {
        println!("No profiles. Run 'conch login' first.");
        return Ok(());
    }
    profiles_table(config).print();
    Ok(())
}

pub async fn set_active(config: &mut ShellConfig, config_path: &Path, name: &str) -> Result<()> {
    config.set_active(name)?;
    save_config(config, config_path).await?;
    println!("Profile '{}' is now active.", name);
    Ok(())
}

pub async fn delete(config: &mut ShellConfig, config_path: &Path, name: &str) -> Result<()> {
    let removed = config.remove_profile(name)?;
    save_config(config, config_path).await?;
    println!("Deleted profile '{}'.", removed.name);
    if removed.active {
        println!("No profile is active now. Use 'conch profile set-active <NAME>'.");
    }
    Ok(())
}
