use super::relay::RelayRequest;
use axum::{
    body::Bytes,
    http::{HeaderMap, HeaderName, HeaderValue, Method},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("Unrecognized HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Body is not valid base64")]
    InvalidBase64,
}

/// A serverless HTTP invocation: `{httpMethod, headers, body, isBase64Encoded}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    #[serde(default = "default_method")]
    pub http_method: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

fn default_method() -> String {
    "POST".to_string()
}

impl FunctionEvent {
    pub fn into_request(self) -> Result<RelayRequest, EventError> {
        let method = Method::from_bytes(self.http_method.as_bytes())
            .map_err(|_| EventError::InvalidMethod(self.http_method.clone()))?;

        let body = match self.body {
            None => Bytes::from_static(b"{}"),
            Some(body) if self.is_base64_encoded => STANDARD
                .decode(body.trim())
                .map(Bytes::from)
                .map_err(|_| EventError::InvalidBase64)?,
            Some(body) => Bytes::from(body),
        };

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }

        Ok(RelayRequest {
            method,
            headers,
            body,
        })
    }
}
