//! Typed boundary for the two HTTP collaborators: the erase execution
//! service and the device catalog.
//!
//! Payloads are validated into explicit structs at this boundary; a
//! malformed body is a tagged error, never a trusted ad-hoc field lookup.
//! The [`EraseService`] trait is the seam the controller drives, so tests
//! can script outcomes without a live endpoint.

use crate::{ConsoleError, ConsoleResult, WipeKind};
use futures::future::BoxFuture;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Successful erase response: `POST /wipe/{safe|full}/{device_id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EraseReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub deleted_files: Vec<String>,
}

/// Raw device inventory: `GET /devices`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceInventory {
    #[serde(default)]
    pub phones: Vec<PhoneEntry>,
    #[serde(default)]
    pub drives: Vec<DriveEntry>,
    #[serde(default)]
    pub pc_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhoneEntry {
    pub serial: String,
    pub name: String,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriveEntry {
    pub device: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// The erase execution service as the controller sees it: one asynchronous
/// call per operation, resolving to a receipt or a network failure.
#[cfg_attr(test, mockall::automock)]
pub trait EraseService: Send + Sync {
    fn erase(&self, kind: WipeKind, device_id: &str) -> BoxFuture<'static, ConsoleResult<EraseReceipt>>;
}

/// HTTP client for the erase and device-catalog endpoints.
#[derive(Debug, Clone)]
pub struct HttpEraseClient {
    base_url: String,
    request_timeout: Duration,
    http: reqwest::Client,
}

impl HttpEraseClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(10),
            http: reqwest::Client::new(),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn endpoint(&self, segments: &[&str]) -> ConsoleResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ConsoleError::Network(format!("invalid base URL: {}", e)))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ConsoleError::Network("base URL cannot carry a path".to_string()))?;
            path.pop_if_empty();
            // push() percent-encodes device ids like "C:\" for us
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Fetch the current device inventory from the catalog service.
    pub async fn fetch_inventory(&self) -> ConsoleResult<DeviceInventory> {
        let url = self.endpoint(&["devices"])?;
        let response = self
            .http
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<DeviceInventory>().await?)
    }

    async fn post_wipe(&self, kind: WipeKind, device_id: &str) -> ConsoleResult<EraseReceipt> {
        let url = self.endpoint(&["wipe", kind.route(), device_id])?;
        tracing::debug!(%url, kind = kind.as_str(), "dispatching erase request");

        let response = self
            .http
            .post(url)
            .timeout(self.request_timeout)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<EraseReceipt>().await?)
    }
}

impl EraseService for HttpEraseClient {
    fn erase(&self, kind: WipeKind, device_id: &str) -> BoxFuture<'static, ConsoleResult<EraseReceipt>> {
        let client = self.clone();
        let device_id = device_id.to_string();
        Box::pin(async move { client.post_wipe(kind, &device_id).await })
    }
}
