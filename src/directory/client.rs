//! HTTP client for the directory service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::{DirectoryApi, NearbySearch};
use crate::cache::EntityKind;
use crate::{PanduError, Result};

/// Client for the directory REST API.
///
/// Authenticates with an `X-API-Key` header on every request. The base URL
/// is explicit so tests can point it at a local mock server.
#[derive(Clone)]
pub struct DirectoryClient {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct NearbyRequest {
    lat: f64,
    long: f64,
    radius: u32,
}

impl DirectoryClient {
    /// Create a client for the given API base URL and key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Map a non-success response into an API error, draining the body
    /// for the message.
    async fn error_for_status(&self, response: reqwest::Response) -> PanduError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        PanduError::Api { status, message }
    }
}

#[async_trait]
impl DirectoryApi for DirectoryClient {
    async fn nearby(&self, lat: f64, long: f64, radius: u32) -> Result<NearbySearch> {
        let url = format!("{}/gedung/nearby", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("accept", "application/json")
            .header("X-API-Key", &self.api_key)
            .json(&NearbyRequest { lat, long, radius })
            .send()
            .await
            .map_err(|e| PanduError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.error_for_status(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| PanduError::Http(e.to_string()))
    }

    async fn detail(&self, kind: EntityKind, id: &str) -> Result<Value> {
        let url = format!("{}/{}/{id}", self.base_url, kind.as_str());

        let response = self
            .http
            .get(&url)
            .header("accept", "application/json")
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| PanduError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.error_for_status(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| PanduError::Http(e.to_string()))
    }
}
