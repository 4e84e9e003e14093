//! VK `messages.send` relay.

use super::{DeliveryReceipt, MessengerProvider, ProviderError};
use crate::config::VkConfig;
use crate::models::ContactSubmission;
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize, Serializer};

/// Largest `random_id` VK accepts (signed 32-bit).
pub const MAX_RANDOM_ID: i32 = i32::MAX;

pub struct VkProvider {
    config: VkConfig,
    access_token: Secret<String>,
    client: Client,
}

/// Form parameters of one `messages.send` call.
#[derive(Debug, Clone, Serialize)]
pub struct VkSendParams {
    pub peer_id: String,
    pub message: String,
    #[serde(serialize_with = "expose_token")]
    pub access_token: Secret<String>,
    pub v: String,
    pub random_id: i32,
}

fn expose_token<S: Serializer>(token: &Secret<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(token.expose_secret())
}

#[derive(Debug, Deserialize)]
struct VkApiResponse {
    #[serde(default)]
    response: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<VkApiError>,
}

#[derive(Debug, Deserialize)]
struct VkApiError {
    error_code: i64,
    error_msg: String,
}

/// Per-call idempotency key in `1..=i32::MAX`.
pub fn generate_random_id() -> i32 {
    rand::thread_rng().gen_range(1..=MAX_RANDOM_ID)
}

impl VkProvider {
    pub fn new(config: VkConfig, access_token: Secret<String>) -> Self {
        Self {
            config,
            access_token,
            client: Client::new(),
        }
    }

    pub fn build_params(&self, submission: &ContactSubmission) -> VkSendParams {
        VkSendParams {
            peer_id: self.config.peer_id.clone(),
            message: submission.compose_vk_message(),
            access_token: self.access_token.clone(),
            v: self.config.api_version.clone(),
            random_id: generate_random_id(),
        }
    }

    async fn dispatch(&self, params: &VkSendParams) -> Result<Option<i64>, ProviderError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .form(params)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(format!("Failed to connect to VK: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::SendFailed(format!(
                "VK API returned error status {}: {}",
                status, body
            )));
        }

        let vk_response: VkApiResponse = response.json().await.map_err(|e| {
            ProviderError::SendFailed(format!("Failed to parse VK response: {}", e))
        })?;

        if let Some(error) = vk_response.error {
            return Err(ProviderError::Api {
                code: error.error_code,
                message: error.error_msg,
            });
        }

        Ok(vk_response.response.and_then(|id| id.as_i64()))
    }
}

#[async_trait]
impl MessengerProvider for VkProvider {
    #[tracing::instrument(skip_all, fields(peer_id = %self.config.peer_id))]
    async fn send(&self, submission: &ContactSubmission) -> Result<DeliveryReceipt, ProviderError> {
        let params = self.build_params(submission);

        if !self.config.dispatch_enabled {
            tracing::info!(
                random_id = params.random_id,
                api_version = %params.v,
                message_length = params.message.len(),
                "VK dispatch disabled, message prepared but not sent"
            );
            return Ok(DeliveryReceipt {
                random_id: params.random_id,
                message_id: None,
                dispatched: false,
            });
        }

        let message_id = self.dispatch(&params).await?;

        tracing::info!(
            random_id = params.random_id,
            message_id = ?message_id,
            "Contact message sent via VK"
        );

        Ok(DeliveryReceipt {
            random_id: params.random_id,
            message_id,
            dispatched: true,
        })
    }

    fn name(&self) -> &'static str {
        "vk"
    }
}
