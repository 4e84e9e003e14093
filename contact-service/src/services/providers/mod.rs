pub mod vk;

use crate::models::ContactSubmission;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use thiserror::Error;

pub use vk::{generate_random_id, VkProvider, VkSendParams};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Send error: {0}")]
    SendFailed(String),

    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },
}

/// Outcome of handing a submission to a messenger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub random_id: i32,
    /// Id assigned by the messenger, when the message was actually sent.
    pub message_id: Option<i64>,
    pub dispatched: bool,
}

#[async_trait]
pub trait MessengerProvider: Send + Sync {
    async fn send(&self, submission: &ContactSubmission) -> Result<DeliveryReceipt, ProviderError>;
    fn name(&self) -> &'static str;
}

/// Mock messenger for testing
pub struct MockMessengerProvider {
    fail: bool,
    send_count: AtomicU64,
    sent: Mutex<Vec<ContactSubmission>>,
}

impl MockMessengerProvider {
    pub fn new() -> Self {
        Self {
            fail: false,
            send_count: AtomicU64::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A messenger whose every send fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<ContactSubmission> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl Default for MockMessengerProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessengerProvider for MockMessengerProvider {
    async fn send(&self, submission: &ContactSubmission) -> Result<DeliveryReceipt, ProviderError> {
        self.send_count.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(ProviderError::SendFailed("Mock messenger failure".to_string()));
        }

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(submission.clone());
        }

        tracing::info!(
            message_length = submission.message().len(),
            "[MOCK] Contact message would be sent"
        );

        Ok(DeliveryReceipt {
            random_id: generate_random_id(),
            message_id: Some(self.send_count.load(Ordering::SeqCst) as i64),
            dispatched: true,
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
