//! Backend API Client
//!
//! Thin JSON-over-HTTP client for the LMS backend. Every method returns the
//! decoded body or an [`ApiError`]; nothing here knows about caching.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ApiError;

/// Client for the LMS backend REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
    token: Option<Arc<str>>,
}

impl ApiClient {
    /// Create a client for `base_url` with a request timeout.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client from gateway configuration.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let client = Self::new(&config.api_url, config.request_timeout())?;
        Ok(match &config.api_token {
            Some(token) => client.with_token(token),
            None => client,
        })
    }

    /// Create a client around an existing reqwest client.
    pub fn with_client(client: Client, base_url: impl AsRef<str>) -> Self {
        Self {
            client,
            base_url: base_url.as_ref().trim_end_matches('/').into(),
            token: None,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_token(mut self, token: impl AsRef<str>) -> Self {
        self.token = Some(token.as_ref().into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send("GET", path, self.client.get(self.url(path))).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.client.get(self.url(path)).query(query);
        self.send("GET", path, request).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.send("POST", path, request).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.client.put(self.url(path)).json(body);
        self.send("PUT", path, request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send("DELETE", path, self.client.delete(self.url(path))).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        debug!(method, path, "Backend request");
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = error_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "Request failed".to_string());
            warn!(method, path, status = status.as_u16(), %message, "Backend request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        // Empty bodies (204, bare DELETE) decode as JSON null
        let body: &[u8] = if body.is_empty() { b"null" } else { &body };
        serde_json::from_slice(body).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

/// Pulls a human-readable message out of an error body.
///
/// The backend reports errors as `{"detail": ...}`; other services use
/// `{"message": ...}`. Plain-text bodies are used as-is.
fn error_message(body: &[u8]) -> Option<String> {
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) {
        for field in ["detail", "message", "error"] {
            match json.get(field) {
                Some(serde_json::Value::String(s)) => return Some(s.clone()),
                Some(serde_json::Value::Null) | None => {}
                Some(other) => return Some(other.to_string()),
            }
        }
        return None;
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    (!text.is_empty()).then_some(text)
}
