//! Client configuration

use echo_primitives::{AssetId, ObjectId};
use echo_types::DEFAULT_EXPIRATION_WINDOW_SECS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::rpc::Api;
use crate::SdkError;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Socket endpoint URL
    #[serde(default = "default_url")]
    pub url: String,
    /// Seconds between head block time and transaction expiration
    #[serde(default = "default_expiration_window")]
    pub expiration_window_secs: u32,
    /// Bound on every awaited call, in milliseconds
    #[serde(default = "default_call_timeout")]
    pub call_timeout_ms: u64,
    /// Login user
    #[serde(default)]
    pub login_user: String,
    /// Login password
    #[serde(default)]
    pub login_password: String,
    /// Asset fees are quoted in
    #[serde(default = "default_fee_asset")]
    pub fee_asset: String,
    /// APIs accessed after login
    #[serde(default = "default_apis")]
    pub apis: Vec<Api>,
}

fn default_url() -> String {
    "ws://127.0.0.1:6311".to_string()
}

fn default_expiration_window() -> u32 {
    DEFAULT_EXPIRATION_WINDOW_SECS
}

fn default_call_timeout() -> u64 {
    10_000
}

fn default_fee_asset() -> String {
    ObjectId::CORE_ASSET.to_string()
}

fn default_apis() -> Vec<Api> {
    vec![
        Api::Database,
        Api::NetworkBroadcast,
        Api::History,
        Api::Registration,
    ]
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            expiration_window_secs: default_expiration_window(),
            call_timeout_ms: default_call_timeout(),
            login_user: String::new(),
            login_password: String::new(),
            fee_asset: default_fee_asset(),
            apis: default_apis(),
        }
    }
}

impl ClientConfig {
    /// Config for `url` with every other field defaulted
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, SdkError> {
        let config: Self = toml::from_str(content).map_err(|e| SdkError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SdkError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), SdkError> {
        if self.expiration_window_secs == 0 {
            return Err(SdkError::Config("expiration_window_secs must be positive".into()));
        }
        if self.call_timeout_ms == 0 {
            return Err(SdkError::Config("call_timeout_ms must be positive".into()));
        }
        let fee_asset = self.fee_asset_id()?;
        if !fee_asset.is_asset() {
            return Err(SdkError::Config(format!("fee_asset {} is not an asset id", fee_asset)));
        }
        if self.apis.contains(&Api::Login) {
            return Err(SdkError::Config("the login api is always available".into()));
        }
        Ok(())
    }

    /// Call bound as a duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Parsed fee asset
    pub fn fee_asset_id(&self) -> Result<AssetId, SdkError> {
        self.fee_asset
            .parse()
            .map_err(|e| SdkError::Config(format!("fee_asset: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.expiration_window_secs, 40);
        assert_eq!(config.call_timeout_ms, 10_000);
        assert_eq!(config.fee_asset, "1.3.0");
        assert_eq!(config.apis.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            url = "wss://testnet.echo-dev.io/ws"
            call_timeout_ms = 2500
            apis = ["database", "network_broadcast"]
        "#;
        let config = ClientConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.url, "wss://testnet.echo-dev.io/ws");
        assert_eq!(config.call_timeout(), Duration::from_millis(2500));
        assert_eq!(config.apis, vec![Api::Database, Api::NetworkBroadcast]);
        assert_eq!(config.expiration_window_secs, 40);
    }

    #[test]
    fn test_config_serialize() {
        let toml = toml::to_string(&ClientConfig::default()).unwrap();
        assert!(toml.contains("expiration_window_secs"));
        assert!(toml.contains("network_broadcast"));
    }

    #[test]
    fn test_config_validation() {
        assert!(ClientConfig::from_toml_str("call_timeout_ms = 0").is_err());
        assert!(ClientConfig::from_toml_str("expiration_window_secs = 0").is_err());
        assert!(ClientConfig::from_toml_str(r#"fee_asset = "1.2.0""#).is_err());
        assert!(ClientConfig::from_toml_str(r#"fee_asset = "core""#).is_err());
        assert!(ClientConfig::from_toml_str(r#"apis = ["login"]"#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ClientConfig::load("/nonexistent/echo.toml").unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }
}
