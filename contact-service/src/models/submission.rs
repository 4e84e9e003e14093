//! Contact-form payloads.
//!
//! A [`ContactForm`] is whatever the browser posted. A [`ContactSubmission`]
//! is a form that passed validation: it always carries a non-empty message,
//! and it is the only thing the store and the messenger accept.

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_NAME: &str = "Аноним";
pub const DEFAULT_EMAIL: &str = "Не указан";
pub const DEFAULT_SUBJECT: &str = "Без темы";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Invalid JSON body")]
    InvalidJson,

    #[error("Message is required")]
    MissingMessage,
}

/// Raw request body. Absent and `null` fields are both `None`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl ContactForm {
    /// Parse a POST body. A blank body is read as `{}`.
    pub fn from_body(body: &[u8]) -> Result<Self, FormError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|_| FormError::InvalidJson)?;
        if !value.is_object() {
            return Err(FormError::InvalidJson);
        }

        serde_json::from_value(value).map_err(|_| FormError::InvalidJson)
    }

    pub fn into_submission(self) -> Result<ContactSubmission, FormError> {
        let message = match self.message {
            Some(message) if !message.is_empty() => message,
            _ => return Err(FormError::MissingMessage),
        };

        Ok(ContactSubmission {
            name: self.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            email: self.email.unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
            subject: self.subject.unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            message,
        })
    }
}

/// A validated submission, alive for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    name: String,
    email: String,
    subject: String,
    message: String,
}

impl ContactSubmission {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Text posted to the site owner's VK dialog.
    pub fn compose_vk_message(&self) -> String {
        format!(
            "📩 Новое сообщение с сайта Codeko\n\n👤 Имя: {}\n📧 Email: {}\n📝 Тема: {}\n\n💬 Сообщение:\n{}",
            self.name, self.email, self.subject, self.message
        )
    }
}
