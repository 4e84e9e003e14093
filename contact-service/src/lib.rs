//! contact-service: relays contact-form submissions to VK, saving a copy to
//! Postgres when a database is configured.
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
