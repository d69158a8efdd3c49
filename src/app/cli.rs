//! Command-line argument definitions (clap).

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use uuid::Uuid;

pub const COMMON_COMMANDS: &str = "
Common commands:
  conch login --url https://conch.example.com --user ops@example.com
  conch workspaces
  conch workspace <ID> devices --health FAIL
  conch reports health-summary -w <ID> --breakout
  conch reports failure -w <ID> --full
";

#[derive(Parser, Debug)]
#[command(name = "conch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Command-line client for the Conch hardware inventory API", long_about = None)]
pub struct Args {
    /// Print JSON instead of tables/text
    #[arg(long, global = true)]
    pub json: bool,

    /// Profile to use instead of the active one
    #[arg(short = 'p', long, global = true)]
    pub profile: Option<String>,

    /// Config file path
    #[arg(long, global = true, env = "CONCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// API URL, overrides the profile (requires a token)
    #[arg(long = "api-url", global = true, env = "CONCH_URL", hide = true)]
    pub api_url: Option<String>,

    /// API token, overrides the profile
    #[arg(long, global = true, env = "CONCH_TOKEN", hide_env_values = true, hide = true)]
    pub token: Option<String>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(long = "log-level", global = true, env = "CONCH_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Authenticate and store the session token in a profile
    Login {
        #[arg(long)]
        url: String,
        #[arg(long)]
        user: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
        /// Profile name to store the session under
        #[arg(long = "name", default_value = "default")]
        name: String,
    },

    /// Manage stored profiles
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// List workspaces
    Workspaces,

    /// Workspace views
    Workspace {
        id: Uuid,
        #[command(subcommand)]
        action: WorkspaceCommand,
    },

    /// Device views
    Device {
        /// Device serial
        id: String,
        #[command(subcommand)]
        action: DeviceCommand,
    },

    /// List all relays
    Relays,

    /// List hardware products
    HardwareProducts,

    /// Show the current user's settings
    Settings,

    /// Aggregated reports
    Reports {
        #[command(subcommand)]
        report: ReportCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// List stored profiles
    List,
    /// Make a profile the active one
    SetActive { name: String },
    /// Delete a stored profile
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
pub enum WorkspaceCommand {
    /// Workspace details
    Info,
    /// Devices in the workspace
    Devices {
        /// Only devices with this health (PASS, FAIL, UNKNOWN)
        #[arg(long)]
        health: Option<String>,
    },
    /// Racks in the workspace
    Racks,
    /// Relays reporting devices in the workspace
    Relays,
}

#[derive(Subcommand, Debug)]
pub enum DeviceCommand {
    /// Device details
    Get,
    /// Device settings
    Settings,
    /// Latest validation states
    ValidationState,
}

/// Flags shared by the aggregated reports
#[derive(ClapArgs, Debug, Clone)]
pub struct ReportScope {
    /// Include per-rack detail
    #[arg(short = 'b', long)]
    pub breakout: bool,

    /// Only include this datacenter id
    #[arg(short = 'd', long)]
    pub datacenter: Option<Uuid>,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// Device health counts per datacenter and rack
    HealthSummary {
        #[arg(short = 'w', long)]
        workspace: Uuid,
        #[command(flatten)]
        scope: ReportScope,
    },

    /// Failing validations per component category
    Failure {
        #[arg(short = 'w', long)]
        workspace: Uuid,
        #[command(flatten)]
        scope: ReportScope,
        /// Label platforms by display name instead of alias
        #[arg(long)]
        platform_name: bool,
        /// Break categories down by component
        #[arg(long)]
        include_components: bool,
        /// Count hardware vendors per category
        #[arg(long)]
        include_vendors: bool,
        /// Components and vendors
        #[arg(long)]
        full: bool,
    },

    /// Time from first failure to first pass, from a batch job file
    MboHardwareFailure {
        /// Batch job JSON file
        #[arg(short = 'f', long)]
        file: PathBuf,
        #[command(flatten)]
        scope: ReportScope,
        /// Emit CSV rows instead of text
        #[arg(long)]
        csv: bool,
    },
}
