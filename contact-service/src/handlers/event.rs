use crate::models::{EventError, FormError, FunctionEvent, RelayResponse};
use crate::services::RelayError;
use crate::startup::AppState;
use axum::{extract::State, Json};

/// Serverless-style entry point: the HTTP request is described in the JSON
/// body and the response descriptor comes back as JSON.
#[tracing::instrument(skip_all)]
pub async fn invoke_function(
    State(state): State<AppState>,
    Json(event): Json<FunctionEvent>,
) -> Json<RelayResponse> {
    let response = match event.into_request() {
        Ok(request) => state.handler.handle(request).await,
        Err(EventError::InvalidMethod(method)) => {
            tracing::info!(method = %method, "Rejecting event with unknown method");
            RelayError::MethodNotAllowed.into()
        }
        Err(EventError::InvalidBase64) => RelayError::Validation(FormError::InvalidJson).into(),
    };

    Json(response)
}
