//! HTTP client for the upstream ledger API.
//!
//! JSON over HTTPS with a bearer token per request. Upstream failures carry
//! the server's `{"error": ...}` message verbatim; transport failures are a
//! separate class so the error layer can map them to 502.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::auth::TokenProvider;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Missing API token for authenticated request")]
    MissingToken,

    /// The upstream answered with a non-success status. `message` is the
    /// server's own error text, passed through verbatim.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Failed to reach upstream API")]
    Transport(#[from] reqwest::Error),
}

/// Thin authenticated JSON client.
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    pub fn new(base_url: String, timeout: Duration, tokens: Arc<dyn TokenProvider>) -> Self {
        ApiClient {
            http: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str) -> Result<Value, ClientError> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        self.send(Method::PUT, path, Some(body)).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let token = self.tokens.token().await.ok_or(ClientError::MissingToken)?;

        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            if status == StatusCode::NO_CONTENT {
                return Ok(Value::Null);
            }
            return Ok(response.json::<Value>().await?);
        }

        // Error bodies are `{"error": ...}`; anything else degrades to a
        // generic status message.
        let payload: Value = response.json().await.unwrap_or(Value::Null);
        let message = payload
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("API request failed: {}", status.as_u16()));

        Err(ClientError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}
