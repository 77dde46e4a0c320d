//! services/dashboard/src/adapters/http.rs
//!
//! The API gateway: one reqwest client bound to the configured base URL. It
//! is the concrete implementation of every service port in the `core` crate
//! (see the sibling `*_api` modules) and owns the two cross-cutting rules:
//! the bearer credential is attached from the auth store on every request,
//! and any 401 clears that credential before the error reaches the caller.
//! Requests are never retried.

use crate::config::Config;
use practice_core::ports::{PortError, PortResult};
use practice_core::store::{AuthStore, Shared};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    auth: Shared<AuthStore>,
}

impl HttpGateway {
    /// Creates a gateway that reads and clears the credential in `auth`.
    pub fn new(config: &Config, auth: Shared<AuthStore>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends one request and returns the parsed JSON body (`Null` when empty).
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> PortResult<Value> {
        let text = self.send(method, path, body).await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| PortError::Decode(format!("{} returned malformed JSON: {}", path, e)))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> PortResult<T> {
        let value = self.request(Method::GET, path, None).await?;
        decode(path, value)
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> PortResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)
            .map_err(|e| PortError::Unexpected(format!("failed to encode request body: {}", e)))?;
        let value = self.request(method, path, Some(body)).await?;
        decode(path, value)
    }

    pub(crate) async fn delete(&self, path: &str) -> PortResult<()> {
        self.request(Method::DELETE, path, None).await.map(|_| ())
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> PortResult<String> {
        debug!(%method, path, "gateway: sending request");

        let mut request = self.client.request(method.clone(), self.url(path));
        if let Some(token) = self.auth.read(|auth| auth.token().map(str::to_owned)) {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%method, path, error = %e, "gateway: transport failure");
            PortError::Network(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PortError::Network(format!("failed to read response body: {}", e)))?;

        if status.is_success() {
            return Ok(text);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.auth.write(AuthStore::logout);
            info!(%method, path, "gateway: credential rejected, logged out");
            return Err(PortError::Unauthorized);
        }

        let message = error_message(status, &text);
        warn!(%method, path, status = status.as_u16(), %message, "gateway: request failed");
        Err(PortError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> PortResult<T> {
    serde_json::from_value(value)
        .map_err(|e| PortError::Decode(format!("{} returned an unexpected shape: {}", path, e)))
}

/// Picks the server-supplied message out of an error body.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error", "detail"] {
            if let Some(Value::String(message)) = fields.get(key) {
                return message.clone();
            }
        }
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status.canonical_reason().unwrap_or("request failed").to_string()
}
