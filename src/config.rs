use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR_PREFIX: &str = "nordigen-account";

pub const DEFAULT_BASE_URL: &str = "https://bankaccountdata.gocardless.com/api/v2/";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Requisition used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requisition_id: Option<String>,
    pub nordigen: NordigenConfig,
}

/// Credentials for the Bank Account Data API.
///
/// Refresh tokens are valid for 30 days. Storing a regenerated one is up to
/// the caller.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NordigenConfig {
    pub secret_id: String,
    pub secret_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for NordigenConfig {
    fn default() -> Self {
        Self {
            secret_id: String::new(),
            secret_key: String::new(),
            refresh_token: None,
            base_url: default_base_url(),
        }
    }
}

impl NordigenConfig {
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            secret_key: secret_key.into(),
            ..Default::default()
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: Option<String>) -> Self {
        self.refresh_token = refresh_token;
        self
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_file()?;

        if !config_path.exists() {
            return Err(AppError::Config(format!(
                "Config file not found at {:?}. Please create one.",
                config_path
            )));
        }

        let contents = fs::read_to_string(&config_path)?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> AppResult<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?;

        if config.nordigen.secret_id.is_empty() || config.nordigen.secret_key.is_empty() {
            return Err(AppError::Config(
                "Nordigen secret_id and secret_key must be set in config file".to_string(),
            ));
        }

        Ok(config)
    }

    fn xdg_dirs() -> xdg::BaseDirectories {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
    }

    /// Get the config file path
    pub fn config_file() -> AppResult<PathBuf> {
        let xdg_dirs = Self::xdg_dirs();
        xdg_dirs
            .place_config_file("config.toml")
            .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = Config {
            requisition_id: Some("req-123".to_string()),
            nordigen: NordigenConfig::new("test_id", "test_key")
                .with_refresh_token(Some("refresh".to_string())),
        };

        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config.requisition_id, deserialized.requisition_id);
        assert_eq!(config.nordigen.secret_id, deserialized.nordigen.secret_id);
        assert_eq!(
            config.nordigen.refresh_token,
            deserialized.nordigen.refresh_token
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::parse(
            r#"
            [nordigen]
            secret_id = "id"
            secret_key = "key"
            "#,
        )
        .unwrap();

        assert_eq!(config.requisition_id, None);
        assert_eq!(config.nordigen.refresh_token, None);
        assert_eq!(config.nordigen.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_parse_rejects_empty_credentials() {
        let result = Config::parse(
            r#"
            [nordigen]
            secret_id = ""
            secret_key = "key"
            "#,
        );

        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
