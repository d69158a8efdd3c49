//! HTTP client for the Conch API (reqwest, bearer token auth).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use uuid::Uuid;

use super::error::{ApiError, Result};
use super::types::{
    Device, HardwareProduct, LoginRequest, LoginResponse, Rack, Relay, Settings, ValidationState,
    Workspace,
};
use super::ConchApi;

pub struct HttpConchClient {
    base_url: String,
    base: Url,
    token: Option<String>,
    http: reqwest::Client,
}

impl HttpConchClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let base_url = base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url).map_err(|_| ApiError::InvalidUrl(base_url.clone()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("conch-shell/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url,
            base,
            token,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint URL with each segment percent-encoded, so ids containing
    /// `/`, `?` or `#` stay a single path segment.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Exchange credentials for a session token.
    pub async fn login(&self, user: &str, password: &str) -> Result<String> {
        let url = self.url(&["login"])?;
        debug!("POST {}", url);

        let body = LoginRequest {
            user: user.to_string(),
            password: password.to_string(),
        };
        let response = self.http.post(url).json(&body).send().await?;
        let login: LoginResponse = decode(response).await?;
        Ok(login.jwt_token)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let token = self.token.as_deref().ok_or(ApiError::NotAuthenticated)?;
        let url = self.url(segments)?;
        debug!("GET {}", url);

        let response = self.http.get(url).bearer_auth(token).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    trace!("Response {}: {} bytes", status, body.len());

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ApiError::NotAuthenticated);
    }
    if !status.is_success() {
        return Err(ApiError::from_body(status.as_u16(), &body));
    }

    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl ConchApi for HttpConchClient {
    async fn workspaces(&self) -> Result<Vec<Workspace>> {
        self.get(&["workspace"]).await
    }

    async fn workspace(&self, workspace_id: Uuid) -> Result<Workspace> {
        self.get(&["workspace", workspace_id.to_string().as_str()]).await
    }

    async fn workspace_devices(&self, workspace_id: Uuid) -> Result<Vec<Device>> {
        self.get(&["workspace", workspace_id.to_string().as_str(), "device"]).await
    }

    async fn workspace_racks(&self, workspace_id: Uuid) -> Result<Vec<Rack>> {
        self.get(&["workspace", workspace_id.to_string().as_str(), "rack"]).await
    }

    async fn workspace_relays(&self, workspace_id: Uuid) -> Result<Vec<Relay>> {
        self.get(&["workspace", workspace_id.to_string().as_str(), "relay"]).await
    }

    async fn device(&self, device_id: &str) -> Result<Device> {
        self.get(&["device", device_id]).await
    }

    async fn device_settings(&self, device_id: &str) -> Result<Settings> {
        self.get(&["device", device_id, "settings"]).await
    }

    async fn device_validation_states(&self, device_id: &str) -> Result<Vec<ValidationState>> {
        self.get(&["device", device_id, "validation_state"]).await
    }

    async fn relays(&self) -> Result<Vec<Relay>> {
        self.get(&["relay"]).await
    }

    async fn hardware_products(&self) -> Result<Vec<HardwareProduct>> {
        self.get(&["hardware_product"]).await
    }

    async fn user_settings(&self) -> Result<Settings> {
        self.get(&["user", "me", "settings"]).await
    }
}
