//! HTTP handlers for contact-service.

pub mod contact;
pub mod event;
pub mod health;

pub use contact::relay_contact_form;
pub use event::invoke_function;
pub use health::{health_check, metrics_endpoint, readiness_check};
