use crate::models::{RelayRequest, RelayResponse};
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method},
};

/// Raw HTTP entry point: every method lands here and the relay handler
/// decides what to do with it.
pub async fn relay_contact_form(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> RelayResponse {
    state
        .handler
        .handle(RelayRequest {
            method,
            headers,
            body,
        })
        .await
}
