//! Configuration management

use crate::domain::call::CallbackLinks;
use crate::domain::shared::error::DomainError;
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "CALLING_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub calling: CallingSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Settings the signaling platform needs to reach this service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallingSettings {
    pub callback_url: String,
    pub notification_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            calling: CallingSettings {
                callback_url: "http://localhost:8080/api/calling/callback".to_string(),
                notification_url: "http://localhost:8080/api/calling/notification".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Config {
    /// Load defaults, then `calling.toml` (or `$CALLING_CONFIG`), then `CALLING__*` env vars
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "calling".to_string());

        config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::with_name(&path).required(false))
            .add_source(config::Environment::with_prefix("CALLING").separator("__"))
            .build()?
            .try_deserialize()
    }
}

impl CallingSettings {
    pub fn new(callback_url: impl Into<String>, notification_url: impl Into<String>) -> Self {
        Self {
            callback_url: callback_url.into(),
            notification_url: notification_url.into(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_url("callback_url", &self.callback_url)?;
        validate_url("notification_url", &self.notification_url)?;
        Ok(())
    }

    pub fn links(&self) -> CallbackLinks {
        CallbackLinks {
            callback: self.callback_url.clone(),
            notification: self.notification_url.clone(),
        }
    }
}

fn validate_url(name: &str, value: &str) -> Result<(), DomainError> {
    let url = Url::parse(value)
        .map_err(|e| DomainError::Configuration(format!("{} is not a valid URL: {}", name, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(DomainError::Configuration(format!(
            "{} must use http or https, got {}",
            name, scheme
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_default_settings_are_valid() {
        assert_ok!(Config::default().calling.validate());
    }

    #[test]
    fn test_invalid_settings() {
        let relative = CallingSettings::new("/callback", "https://someuri/notification");
        assert!(matches!(
            relative.validate(),
            Err(DomainError::Configuration(_))
        ));

        let ftp = CallingSettings::new("https://someuri/callback", "ftp://someuri/notification");
        assert_err!(ftp.validate());
    }

    #[test]
    fn test_links() {
        let settings =
            CallingSettings::new("https://someuri/callback", "https://someuri/notification");
        let links = settings.links();
        assert_eq!(links.callback, "https://someuri/callback");
        assert_eq!(links.notification, "https://someuri/notification");
    }
}
