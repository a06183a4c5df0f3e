//! Remote session API: a two-verb JSON client with bearer auth and
//! sliding token renewal.

pub mod client;
pub mod endpoints;

use crate::store::StoreError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

pub use client::ApiClient;
pub use endpoints::Resource;

pub const DEFAULT_API_URL: &str = "https://api.repaykaro.com/api/v1/";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{method} {endpoint} request failed: {source}")]
    Transport {
        method: &'static str,
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned an undecodable body (HTTP {status}): {detail}")]
    Decode {
        endpoint: String,
        status: u16,
        detail: String,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Top-level response envelope. Fields other than the three the session
/// logic cares about are kept untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: Option<String>,
    #[serde(rename = "jwtToken")]
    pub jwt_token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiResponse {
    /// Lenient decode: anything but a literal `true` counts as failure and
    /// blank strings count as missing. Only non-object bodies are rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut fields) = value else {
            return None;
        };
        let success = matches!(fields.remove("success"), Some(Value::Bool(true)));
        let message = take_non_empty_string(&mut fields, "message");
        let jwt_token = take_non_empty_string(&mut fields, "jwtToken");
        Some(Self {
            success,
            message,
            jwt_token,
            extra: fields,
        })
    }

    /// Server-provided message, or `fallback` when none was sent.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

fn take_non_empty_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn get(&self, endpoint: &str) -> Result<ApiResponse, ApiError>;

    async fn post(&self, endpoint: &str, body: &Value) -> Result<ApiResponse, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_extracts_known_fields() {
        let resp = ApiResponse::from_value(json!({
            "success": true,
            "message": "ok",
            "jwtToken": "xyz",
            "coupon": [1, 2],
        }))
        .unwrap();

        assert!(resp.success);
        assert_eq!(resp.message.as_deref(), Some("ok"));
        assert_eq!(resp.jwt_token.as_deref(), Some("xyz"));
        assert_eq!(resp.field("coupon"), Some(&json!([1, 2])));
        assert!(resp.field("success").is_none());
    }

    #[test]
    fn missing_or_odd_fields_fall_into_failure_branch() {
        let resp = ApiResponse::from_value(json!({ "success": "true", "message": "" })).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.message, None);
        assert_eq!(resp.message_or("Something went wrong!"), "Something went wrong!");

        let resp = ApiResponse::from_value(json!({})).unwrap();
        assert_eq!(resp, ApiResponse::default());
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        assert!(ApiResponse::from_value(json!([1, 2, 3])).is_none());
        assert!(ApiResponse::from_value(json!("nope")).is_none());
    }

    #[test]
    fn serializes_back_with_wire_names() {
        let resp = ApiResponse::from_value(json!({ "success": true, "jwtToken": "t", "a": 1 })).unwrap();
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["jwtToken"], json!("t"));
        assert_eq!(value["a"], json!(1));
    }
}
