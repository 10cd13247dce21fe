//! API Gateway proxy envelope and response helpers.

use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use std::collections::HashMap;

/// Headers attached to every response.
pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
    ),
    ("Access-Control-Allow-Methods", "GET,POST,DELETE,OPTIONS"),
];

/// API Gateway REST proxy request (the fields this function reads).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayRequest {
    /// `null` reads as an empty method, which no route accepts
    #[serde(default = "default_method", deserialize_with = "null_as_default")]
    pub http_method: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_base64_encoded: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_path() -> String {
    "/".to_string()
}

impl ApiGatewayRequest {
    /// Read the envelope out of a raw invocation payload.
    pub fn from_event(event: &serde_json::Value) -> crate::Result<Self> {
        Self::deserialize(event)
            .map_err(|e| crate::Error::Internal(format!("malformed gateway event: {}", e)))
    }

    /// Query parameter value, if present and non-empty.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(name))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Request body as text, base64-decoded when the gateway flagged it.
    ///
    /// Returns `Ok(None)` when there is no body.
    pub fn decoded_body(&self) -> Result<Option<String>, BodyDecodeError> {
        let Some(body) = self.body.as_deref() else {
            return Ok(None);
        };

        if !self.is_base64_encoded {
            return Ok(Some(body.to_string()));
        }

        let bytes = base64::engine::general_purpose::STANDARD.decode(body)?;
        Ok(Some(String::from_utf8(bytes)?))
    }
}

/// Failure to turn a gateway body into text.
#[derive(Debug, thiserror::Error)]
pub enum BodyDecodeError {
    #[error("invalid base64 body: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// API Gateway proxy response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ApiGatewayResponse {
    /// JSON response with the standard CORS headers.
    pub fn json(status_code: u16, body: &serde_json::Value) -> Self {
        Self::with_headers(status_code, body, std::iter::empty::<(String, String)>())
    }

    /// JSON response with extra headers merged over the standard set.
    pub fn with_headers<I, K, V>(status_code: u16, body: &serde_json::Value, extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut headers: HashMap<String, String> = CORS_HEADERS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        headers.extend(extra.into_iter().map(|(k, v)| (k.into(), v.into())));

        Self {
            status_code,
            headers,
            body: body.to_string(),
            is_base64_encoded: false,
        }
    }

    /// Error body `{ "error": label, "message": message }`.
    pub fn error(status_code: u16, label: &str, message: impl Into<String>) -> Self {
        Self::json(
            status_code,
            &json!({
                "error": label,
                "message": message.into(),
            }),
        )
    }

    #[cfg(test)]
    pub fn body_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}
