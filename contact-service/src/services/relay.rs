//! The contact-form relay handler.
//!
//! One request in, one response out:
//!
//! - `OPTIONS` is answered with the CORS preflight headers.
//! - Anything but `POST` is a 405.
//! - A `POST` body is validated, stored if a database is configured (failures
//!   are logged and otherwise ignored), then handed to the messenger. With no
//!   messenger configured the request fails with a 500 after the store step.

use crate::config::ContactConfig;
use crate::models::{ContactForm, ContactSubmission, FormError, RelayRequest, RelayResponse};
use crate::services::database::{ContactStore, PgContactStore};
use crate::services::metrics::{record_persistence, record_relay, record_submission};
use crate::services::providers::{MessengerProvider, ProviderError, VkProvider};
use axum::http::{Method, StatusCode};
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    Validation(#[from] FormError),

    #[error("VK token not configured")]
    MissingCredential,

    #[error("Failed to deliver message")]
    Delivery(#[source] ProviderError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::MissingCredential => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Delivery(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<RelayError> for RelayResponse {
    fn from(err: RelayError) -> Self {
        RelayResponse::error(err.status(), &err.to_string())
    }
}

#[derive(Clone)]
pub struct FormRelayHandler {
    store: Option<Arc<dyn ContactStore>>,
    messenger: Option<Arc<dyn MessengerProvider>>,
}

impl FormRelayHandler {
    pub fn new(
        store: Option<Arc<dyn ContactStore>>,
        messenger: Option<Arc<dyn MessengerProvider>>,
    ) -> Self {
        Self { store, messenger }
    }

    /// Wire up Postgres and VK from configuration. Either may be absent.
    pub fn from_config(config: &ContactConfig) -> Result<Self, AppError> {
        let store: Option<Arc<dyn ContactStore>> = match &config.database.url {
            Some(url) => {
                let store = PgContactStore::new(
                    url.clone(),
                    Duration::from_secs(config.database.connect_timeout_secs),
                );
                match store.connect_options() {
                    Ok(_) => info!("Postgres persistence enabled"),
                    Err(e) => warn!(
                        error = %e,
                        "DATABASE_URL cannot be parsed, every insert will fail"
                    ),
                }
                Some(Arc::new(store))
            }
            None => {
                info!("DATABASE_URL not set, submissions will not be persisted");
                None
            }
        };

        let messenger: Option<Arc<dyn MessengerProvider>> = match &config.vk.access_token {
            Some(token) => {
                info!(
                    dispatch_enabled = config.vk.dispatch_enabled,
                    "VK messenger initialized"
                );
                Some(Arc::new(VkProvider::new(config.vk.clone(), token.clone())))
            }
            None => {
                warn!("VK_ACCESS_TOKEN not set, submissions will be rejected");
                None
            }
        };

        Ok(Self::new(store, messenger))
    }

    #[instrument(skip_all, fields(method = %request.method))]
    pub async fn handle(&self, request: RelayRequest) -> RelayResponse {
        let response = match self.process(request).await {
            Ok(response) => response,
            Err(err) => {
                match &err {
                    RelayError::Delivery(source) => {
                        warn!(error = %source, "Contact message delivery failed")
                    }
                    RelayError::MissingCredential => {
                        warn!("Rejecting submission: VK token not configured")
                    }
                    _ => info!(error = %err, "Rejecting request"),
                }
                err.into()
            }
        };

        record_submission(response.status_code);
        response
    }

    async fn process(&self, request: RelayRequest) -> Result<RelayResponse, RelayError> {
        if request.method == Method::OPTIONS {
            return Ok(RelayResponse::preflight());
        }
        if request.method != Method::POST {
            return Err(RelayError::MethodNotAllowed);
        }

        let submission = ContactForm::from_body(&request.body)?.into_submission()?;

        self.persist(&submission).await;

        let messenger = self
            .messenger
            .as_ref()
            .ok_or(RelayError::MissingCredential)?;

        match messenger.send(&submission).await {
            Ok(receipt) => {
                record_relay(
                    messenger.name(),
                    if receipt.dispatched { "sent" } else { "prepared" },
                );
                info!(
                    random_id = receipt.random_id,
                    dispatched = receipt.dispatched,
                    "Contact submission relayed"
                );
                Ok(RelayResponse::success())
            }
            Err(e) => {
                record_relay(messenger.name(), "failed");
                Err(RelayError::Delivery(e))
            }
        }
    }

    /// Store failures never reach the caller.
    async fn persist(&self, submission: &ContactSubmission) {
        let Some(store) = &self.store else {
            return;
        };

        match store.insert(submission).await {
            Ok(()) => record_persistence("stored"),
            Err(e) => {
                record_persistence("failed");
                warn!(error = %e, "Failed to persist contact submission, continuing");
            }
        }
    }
}
