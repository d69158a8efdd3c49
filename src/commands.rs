//! Subcommand handlers and dispatch.

use anyhow::Result;

use crate::api::ConchApi;
use crate::app::cli::{Command, DeviceCommand, ReportCommand, WorkspaceCommand};
use crate::report::failure::FailureOptions;

pub mod device;
pub mod inventory;
pub mod profile;
pub mod reports;
pub mod workspace;

/// Run a command that talks to the API. Login and profile commands are
/// handled by the caller since they only touch the config file.
pub async fn run(api: &dyn ConchApi, command: Command, json: bool) -> Result<()> {
    match command {
        Command::Workspaces => workspace::list_workspaces(api, json).await,
        Command::Workspace { id, action } => match action {
            WorkspaceCommand::Info => workspace::workspace_info(api, id, json).await,
            WorkspaceCommand::Devices { health } => workspace::workspace_devices(api, id, health.as_deref(), json).await,
            WorkspaceCommand::Racks => workspace::workspace_racks(api, id, json).await,
            WorkspaceCommand::Relays => workspace::workspace_relays(api, id, json).await,
        },
        Command::Device { id, action } => match action {
            DeviceCommand::Get => device::get(api, &id, json).await,
            DeviceCommand::Settings => device::settings(api, &id, json).await,
            DeviceCommand::ValidationState => device::validation_state(api, &id, json).await,
        },
        Command::Relays => inventory::relays(api, json).await,
        Command::HardwareProducts => inventory::hardware_products(api, json).await,
        Command::Settings => inventory::user_settings(api, json).await,
        Command::Reports { report } => match report {
            ReportCommand::HealthSummary { workspace, scope } => reports::health(api, workspace, &scope, json).await,
            ReportCommand::Failure {
                workspace,
                scope,
                platform_name,
                include_components,
                include_vendors,
                full,
            } => {
                let options = FailureOptions {
                    platform_name,
                    include_components,
                    include_vendors,
                    ..Default::default()
                }
                .with_full(full);
                reports::failure(api, workspace, &scope, options, json).await
            }
            ReportCommand::MboHardwareFailure { file, scope, csv } => reports::mbo(api, &file, &scope, csv, json).await,
        },
        Command::Login { .. } | Command::Profile { .. } => {
            anyhow::bail!("Login and profile commands do not use an API session")
        }
    }
}
