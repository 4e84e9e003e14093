use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

pub const DEFAULT_VK_PEER_ID: &str = "244887267";
pub const DEFAULT_VK_API_VERSION: &str = "5.199";
pub const DEFAULT_VK_API_URL: &str = "https://api.vk.com/method/messages.send";

#[derive(Debug, Clone)]
pub struct ContactConfig {
    pub common: core_config::Config,
    pub database: DatabaseConfig,
    pub vk: VkConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// When unset, submissions are not persisted.
    pub url: Option<Secret<String>>,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct VkConfig {
    /// When unset, every valid submission is answered with a 500.
    pub access_token: Option<Secret<String>>,
    pub peer_id: String,
    pub api_version: String,
    pub api_url: String,
    /// Assemble `messages.send` parameters but only call VK when enabled.
    pub dispatch_enabled: bool,
}

impl Default for VkConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            peer_id: DEFAULT_VK_PEER_ID.to_string(),
            api_version: DEFAULT_VK_API_VERSION.to_string(),
            api_url: DEFAULT_VK_API_URL.to_string(),
            dispatch_enabled: false,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            connect_timeout_secs: 5,
        }
    }
}

impl ContactConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        Ok(ContactConfig {
            common: common_config,
            database: DatabaseConfig {
                url: optional_env("DATABASE_URL").map(Secret::new),
                connect_timeout_secs: parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5)?,
            },
            vk: VkConfig {
                access_token: optional_env("VK_ACCESS_TOKEN").map(Secret::new),
                peer_id: get_env("VK_PEER_ID", Some(DEFAULT_VK_PEER_ID))?,
                api_version: get_env("VK_API_VERSION", Some(DEFAULT_VK_API_VERSION))?,
                api_url: get_env("VK_API_URL", Some(DEFAULT_VK_API_URL))?,
                dispatch_enabled: parse_env("VK_DISPATCH_ENABLED", false)?,
            },
        })
    }
}

/// Unset and empty are the same thing for the optional collaborators.
fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|val| !val.trim().is_empty())
}

fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => default.map(str::to_string).ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!("{} is required but not set", key))
        }),
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val.trim().parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} has invalid value {:?}: {}", key, val, e))
        }),
        Err(_) => Ok(default),
    }
}
