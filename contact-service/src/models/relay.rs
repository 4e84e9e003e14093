//! HTTP-shaped request and response descriptors for the relay handler.
//!
//! The handler never touches axum types directly so that the same logic can
//! serve plain HTTP and serverless function events.

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

pub const SUCCESS_MESSAGE: &str =
    "Сообщение успешно получено! Я свяжусь с вами в ближайшее время.";

const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
const MAX_AGE: &str = "Access-Control-Max-Age";
const CONTENT_TYPE: &str = "Content-Type";

#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RelayRequest {
    pub fn new(method: Method, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// Serializes in the function-event response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl RelayResponse {
    /// CORS preflight answer: no body.
    pub fn preflight() -> Self {
        let headers = [
            (ALLOW_ORIGIN, "*"),
            (ALLOW_METHODS, "POST, OPTIONS"),
            (ALLOW_HEADERS, "Content-Type"),
            (MAX_AGE, "86400"),
        ];

        Self {
            status_code: StatusCode::OK.as_u16(),
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    pub fn json(status: StatusCode, body: &serde_json::Value) -> Self {
        let headers = [(ALLOW_ORIGIN, "*"), (CONTENT_TYPE, "application/json")];

        Self {
            status_code: status.as_u16(),
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.to_string(),
            is_base64_encoded: false,
        }
    }

    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::json(status, &json!({ "error": message }))
    }

    pub fn success() -> Self {
        Self::json(
            StatusCode::OK,
            &json!({ "success": true, "message": SUCCESS_MESSAGE }),
        )
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!(header = %name, "Dropping unrepresentable response header"),
            }
        }

        response
    }
}
