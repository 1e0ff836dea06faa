//! Live-mode HTTP client.
//!
//! A thin pass-through to the real backend. No retries and no timeouts;
//! failure is whatever the transport or a non-success status reports,
//! with the message pulled from the body's `detail` field when present.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RuntimeError;
use crate::runtime::ApiClient;

pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Join a request path onto the base URL. Absolute URLs pass through
    /// untouched so callers can follow server-provided links.
    fn request_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        if self.base_url.is_empty() {
            path
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    async fn decode_response(response: reqwest::Response) -> Result<Value, RuntimeError> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|error| RuntimeError::Http {
                message: error.to_string(),
            });
        }

        let body: Option<Value> = response.json().await.ok();
        Err(RuntimeError::Http {
            message: error_message(status.as_u16(), body.as_ref()),
        })
    }
}

/// Best-effort extraction of a human-readable failure message: the JSON
/// body's `detail` field, else `HTTP {status}`.
fn error_message(status: u16, body: Option<&Value>) -> String {
    body.and_then(|body| body.get("detail"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn get(&self, path: &str) -> Result<Value, RuntimeError> {
        let response = self
            .client
            .get(self.request_url(path))
            .send()
            .await
            .map_err(|error| RuntimeError::Http {
                message: error.to_string(),
            })?;
        Self::decode_response(response).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, RuntimeError> {
        let response = self
            .client
            .post(self.request_url(path))
            .json(&body)
            .send()
            .await
            .map_err(|error| RuntimeError::Http {
                message: error.to_string(),
            })?;
        Self::decode_response(response).await
    }
}
