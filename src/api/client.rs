use super::{ApiError, ApiResponse, RemoteApi};
use crate::store::{mask_token, SessionStore, TOKEN_KEY};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// HTTP implementation of [`RemoteApi`].
///
/// The bearer header is taken from the session store on every call, and any
/// `jwtToken` the server returns replaces the stored one before the response
/// is handed back.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    async fn authed_request(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let request = request.header(reqwest::header::CONTENT_TYPE, "application/json");
        match self.store.get(TOKEN_KEY).await? {
            Some(token) if !token.is_empty() => Ok(request.bearer_auth(token)),
            _ => Ok(request),
        }
    }

    async fn finish(
        &self,
        method: &'static str,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiResponse, ApiError> {
        let transport = |source| ApiError::Transport {
            method,
            endpoint: endpoint.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        // Status codes are not interpreted; the envelope's `success` decides.
        let decoded = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(ApiResponse::from_value)
            .ok_or_else(|| ApiError::Decode {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                detail: truncate(body.trim(), 200),
            })?;

        if let Some(token) = decoded.jwt_token.as_deref() {
            self.store.set(TOKEN_KEY, token).await?;
            tracing::info!(endpoint, token = %mask_token(token), "stored renewed session token");
        }
        tracing::debug!(method, endpoint, %status, success = decoded.success, "api response");
        Ok(decoded)
    }
}

#[async_trait]
impl RemoteApi for ApiClient {
    async fn get(&self, endpoint: &str) -> Result<ApiResponse, ApiError> {
        let request = self.authed_request(self.client.get(self.url(endpoint))).await?;
        self.finish("GET", endpoint, request).await
    }

    async fn post(&self, endpoint: &str, body: &Value) -> Result<ApiResponse, ApiError> {
        let request = self
            .authed_request(self.client.post(self.url(endpoint)))
            .await?
            .json(body);
        self.finish("POST", endpoint, request).await
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
