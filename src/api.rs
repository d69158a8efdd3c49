//! ConchApi trait definition and HTTP implementation.

use async_trait::async_trait;
use uuid::Uuid;

pub mod client;
pub mod error;
pub mod types;

pub use client::HttpConchClient;
pub use error::{ApiError, Result};

use types::{Device, HardwareProduct, Rack, Relay, Settings, ValidationState, Workspace};

#[async_trait]
pub trait ConchApi: Send + Sync {
    /// List workspaces visible to the current user
    async fn workspaces(&self) -> Result<Vec<Workspace>>;

    /// Fetch one workspace
    async fn workspace(&self, workspace_id: Uuid) -> Result<Workspace>;

    /// List devices assigned to a workspace
    async fn workspace_devices(&self, workspace_id: Uuid) -> Result<Vec<Device>>;

    /// List racks assigned to a workspace
    async fn workspace_racks(&self, workspace_id: Uuid) -> Result<Vec<Rack>>;

    /// List relays seen reporting devices in a workspace
    async fn workspace_relays(&self, workspace_id: Uuid) -> Result<Vec<Relay>>;

    /// Fetch a device by serial
    async fn device(&self, device_id: &str) -> Result<Device>;

    /// Fetch a device's settings
    async fn device_settings(&self, device_id: &str) -> Result<Settings>;

    /// Fetch the most recent validation state per validation plan for a device
    async fn device_validation_states(&self, device_id: &str) -> Result<Vec<ValidationState>>;

    /// List all relays
    async fn relays(&self) -> Result<Vec<Relay>>;

    /// List all hardware products
    async fn hardware_products(&self) -> Result<Vec<HardwareProduct>>;

    /// Fetch the current user's settings
    async fn user_settings(&self) -> Result<Settings>;
}
