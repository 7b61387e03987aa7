//! Configuration structures for lvlup clients.
//!
//! A client is bound to one [`Environment`] and one API key for its whole
//! lifetime. [`LvlupConfig`] carries both, plus an optional base URL override
//! and request timeout.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;
use validator::Validate;

use crate::error::{Error, Result};

/// Base URL of the production API.
pub const DEPLOYMENT_URL: &str = "https://api.lvlup.pro";

/// Base URL of the sandbox API.
pub const SANDBOX_URL: &str = "https://api.sandbox.lvlup.pro";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "LVLUP_API_KEY";
/// Environment variable selecting `deployment` or `sandbox`.
pub const ENV_ENVIRONMENT: &str = "LVLUP_ENV";
/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "LVLUP_BASE_URL";

/// Target API environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production API, real funds
    #[default]
    Deployment,
    /// Test API for payment flows without real funds
    Sandbox,
}

impl Environment {
    /// Returns the environment name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Deployment => "deployment",
            Self::Sandbox => "sandbox",
        }
    }

    /// Returns the fixed base URL of the environment.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        match self {
            Self::Deployment => DEPLOYMENT_URL,
            Self::Sandbox => SANDBOX_URL,
        }
    }

    /// Returns true for the sandbox environment.
    #[must_use]
    pub const fn is_sandbox(&self) -> bool {
        matches!(self, Self::Sandbox)
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "deployment" => Ok(Self::Deployment),
            "sandbox" => Ok(Self::Sandbox),
            _ => Err(Error::ConfigError(format!("Invalid environment! `{s}`"))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for an lvlup client instance.
///
/// Deserializing requires a non-blank `api_key`. Serializing never writes
/// the key.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LvlupConfig {
    #[serde(skip_serializing, deserialize_with = "secret_key::deserialize")]
    api_key: SecretString,

    #[serde(default)]
    environment: Environment,

    /// Base URL replacing the environment default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    base_url: Option<String>,

    /// Request timeout in seconds; `None` lets requests run to completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 300))]
    request_timeout_secs: Option<u64>,
}

mod secret_key {
    use secrecy::SecretString;
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
    where
        D: Deserializer<'de>,
    {
        let key = String::deserialize(deserializer)?;
        if key.trim().is_empty() {
            return Err(DeError::custom("No api key!"));
        }
        Ok(SecretString::from(key))
    }
}

impl LvlupConfig {
    /// Create a configuration for the given API key and environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the key is empty or whitespace-only.
    pub fn new(api_key: impl Into<String>, environment: Environment) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::ConfigError("No api key!".to_string()));
        }

        Ok(Self {
            api_key: SecretString::from(api_key),
            environment,
            base_url: None,
            request_timeout_secs: None,
        })
    }

    /// Build a configuration from `LVLUP_API_KEY`, `LVLUP_ENV` and
    /// `LVLUP_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the key is missing or a value is invalid.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(ENV_API_KEY)
            .map_err(|_| Error::ConfigError(format!("{ENV_API_KEY} is not set")))?;
        let environment = match std::env::var(ENV_ENVIRONMENT) {
            Ok(value) => value.parse()?,
            Err(_) => Environment::default(),
        };

        let mut config = Self::new(api_key, environment)?;
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            config = config.with_base_url(base_url);
        }

        config.validate()?;
        Ok(config)
    }

    /// Override the base URL (self-hosted mirrors, local test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    /// Returns the selected environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// Returns the configured request timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Returns the effective base URL string.
    #[must_use]
    pub fn base_url_str(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }

    /// Parse and validate the effective base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the URL cannot be parsed.
    pub fn parse_base_url(&self) -> Result<Url> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        Url::parse(self.base_url_str())
            .map_err(|e| Error::ConfigError(format!("Invalid base URL: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_environment_from_str() {
        assert_eq!(
            "deployment".parse::<Environment>().unwrap(),
            Environment::Deployment
        );
        assert_eq!("sandbox".parse::<Environment>().unwrap(), Environment::Sandbox);
        assert!("production".parse::<Environment>().is_err());
        assert!("Sandbox".parse::<Environment>().is_err());
        assert!("".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_urls() {
        assert_eq!(Environment::default(), Environment::Deployment);
        assert_eq!(Environment::Deployment.base_url(), "https://api.lvlup.pro");
        assert_eq!(
            Environment::Sandbox.base_url(),
            "https://api.sandbox.lvlup.pro"
        );
        assert!(Environment::Sandbox.is_sandbox());
        assert!(!Environment::Deployment.is_sandbox());
    }

    #[test]
    fn test_environment_serde() {
        let json = serde_json::to_string(&Environment::Sandbox).unwrap();
        assert_eq!(json, "\"sandbox\"");
        let env: Environment = serde_json::from_str("\"deployment\"").unwrap();
        assert_eq!(env, Environment::Deployment);
    }

    #[test]
    fn test_config_new() {
        let config = LvlupConfig::new("key-123", Environment::Sandbox).unwrap();
        assert_eq!(config.environment(), Environment::Sandbox);
        assert_eq!(config.api_key().expose_secret(), "key-123");
        assert_eq!(config.base_url_str(), SANDBOX_URL);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_config_rejects_blank_key() {
        assert!(matches!(
            LvlupConfig::new("", Environment::Deployment),
            Err(Error::ConfigError(_))
        ));
        assert!(LvlupConfig::new("  \t", Environment::Deployment).is_err());
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = LvlupConfig::new("super-secret", Environment::Deployment).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_config_base_url_override() {
        let config = LvlupConfig::new("k", Environment::Deployment)
            .unwrap()
            .with_base_url("http://127.0.0.1:8080");
        let url = config.parse_base_url().unwrap();
        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn test_config_invalid_base_url() {
        let config = LvlupConfig::new("k", Environment::Deployment)
            .unwrap()
            .with_base_url("not-a-url");
        assert!(config.parse_base_url().is_err());
    }

    #[test]
    fn test_config_deserialize() {
        let config: LvlupConfig = serde_json::from_value(serde_json::json!({
            "api_key": "key-123",
            "environment": "sandbox",
            "base_url": "http://127.0.0.1:9000",
            "request_timeout_secs": 30
        }))
        .unwrap();
        assert_eq!(config.api_key().expose_secret(), "key-123");
        assert_eq!(config.environment(), Environment::Sandbox);
        assert_eq!(config.base_url_str(), "http://127.0.0.1:9000");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));

        let config: LvlupConfig =
            serde_json::from_value(serde_json::json!({"api_key": "k"})).unwrap();
        assert_eq!(config.environment(), Environment::Deployment);
    }

    #[test]
    fn test_config_deserialize_rejects_blank_key() {
        assert!(serde_json::from_value::<LvlupConfig>(serde_json::json!({"api_key": " "})).is_err());
        assert!(serde_json::from_value::<LvlupConfig>(serde_json::json!({})).is_err());
    }

    #[test]
    fn test_config_serialize_omits_key() {
        let config = LvlupConfig::new("super-secret", Environment::Sandbox)
            .unwrap()
            .with_timeout(10);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"environment": "sandbox", "request_timeout_secs": 10})
        );
        assert!(!json.to_string().contains("super-secret"));
    }

    #[test]
    fn test_config_timeout_range() {
        let config = LvlupConfig::new("k", Environment::Deployment).unwrap();
        assert!(config.clone().with_timeout(0).validate().is_err());
        assert!(config.clone().with_timeout(301).validate().is_err());
        let config = config.with_timeout(45);
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Some(Duration::from_secs(45)));
    }
}
