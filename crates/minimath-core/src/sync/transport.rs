//! Network contract between the sync client and the progress backend
//!
//! `ProgressApi` is the seam the client is written against; `HttpProgressApi`
//! is the production implementation over HTTP/JSON.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use tracing::debug;

use super::error::{SyncError, SyncResult};
use crate::config::Config;
use crate::models::{ErrorBody, HealthStatus, PlayerProgress, SaveProgressRequest};

/// Operations the client needs from the backend
#[async_trait]
pub trait ProgressApi: Send + Sync + 'static {
    /// Lightweight liveness check
    async fn health(&self) -> SyncResult<HealthStatus>;

    /// Fetch the stored record for `player_name`
    async fn get_progress(&self, player_name: &str) -> SyncResult<PlayerProgress>;

    /// Overwrite the stored score for `player_name`
    async fn save_progress(&self, player_name: &str, score: u64) -> SyncResult<PlayerProgress>;
}

#[async_trait]
impl<T: ProgressApi + ?Sized> ProgressApi for Arc<T> {
    async fn health(&self) -> SyncResult<HealthStatus> {
        (**self).health().await
    }

    async fn get_progress(&self, player_name: &str) -> SyncResult<PlayerProgress> {
        (**self).get_progress(player_name).await
    }

    async fn save_progress(&self, player_name: &str, score: u64) -> SyncResult<PlayerProgress> {
        (**self).save_progress(player_name, score).await
    }
}

/// HTTP implementation of [`ProgressApi`]
#[derive(Debug, Clone)]
pub struct HttpProgressApi {
    client: Client,
    base_url: Url,
}

impl HttpProgressApi {
    /// Build a client for the backend at `config.api_url`
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(&config.api_url, config.request_timeout())
    }

    pub fn with_base_url(base_url: &str, timeout: std::time::Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid API URL: {}", base_url);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Join path segments onto the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl ProgressApi for HttpProgressApi {
    async fn health(&self) -> SyncResult<HealthStatus> {
        let url = self.endpoint(&["api", "health"]);
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }

    async fn get_progress(&self, player_name: &str) -> SyncResult<PlayerProgress> {
        let url = self.endpoint(&["api", "progress", player_name]);
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }

    async fn save_progress(&self, player_name: &str, score: u64) -> SyncResult<PlayerProgress> {
        let url = self.endpoint(&["api", "progress"]);
        debug!("POST {} score={}", url, score);
        let body = SaveProgressRequest {
            player_name: Some(player_name.to_string()),
            score: Some(score as f64),
        };
        let response = self.client.post(url).json(&body).send().await?;
        read_json(response).await
    }
}

/// Decode a success body, or turn a failure status into [`SyncError::Rejected`]
async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> SyncResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    // Prefer the backend's own message; fall back to the status code.
    let message = match response.json::<ErrorBody>().await {
        Ok(body) if !body.error.is_empty() => body.error,
        _ => format!("Request failed ({})", status.as_u16()),
    };

    Err(SyncError::Rejected {
        status: status.as_u16(),
        message,
    })
}
