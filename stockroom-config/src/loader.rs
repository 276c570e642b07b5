//! Configuration loading and environment variable handling

use crate::domains::StockroomConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "STOCKROOM".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<StockroomConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: StockroomConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<StockroomConfig> {
        let mut config = StockroomConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<StockroomConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut StockroomConfig) -> ConfigResult<()> {
        self.apply_api_overrides(&mut config.api)?;
        self.apply_http_overrides(&mut config.http)?;
        self.apply_tenancy_overrides(&mut config.tenancy)?;
        self.apply_session_overrides(&mut config.session)?;
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    fn apply_api_overrides(&self, config: &mut crate::domains::api::ApiConfig) -> ConfigResult<()> {
        if let Ok(base_url) = self.get_env_var("API_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(())
    }

    /// Apply HTTP config overrides
    fn apply_http_overrides(
        &self,
        config: &mut crate::domains::http::HttpConfig,
    ) -> ConfigResult<()> {
        if let Ok(timeout) = self.get_env_var("HTTP_TIMEOUT") {
            let seconds: u64 = timeout
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid HTTP_TIMEOUT: {}", e)))?;
            config.timeout = std::time::Duration::from_secs(seconds);
        }

        if let Ok(user_agent) = self.get_env_var("HTTP_USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Ok(verify_ssl) = self.get_env_var("HTTP_VERIFY_SSL") {
            config.verify_ssl = verify_ssl
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid HTTP_VERIFY_SSL: {}", e)))?;
        }

        Ok(())
    }

    fn apply_tenancy_overrides(
        &self,
        config: &mut crate::domains::tenancy::TenancyConfig,
    ) -> ConfigResult<()> {
        if let Ok(root_origin) = self.get_env_var("ROOT_ORIGIN") {
            config.root_origin = root_origin;
        }

        if let Ok(redirect) = self.get_env_var("REDIRECT_ON_RESOLUTION_FAILURE") {
            config.redirect_on_resolution_failure = redirect.parse().map_err(|e| {
                ConfigError::EnvError(format!("Invalid REDIRECT_ON_RESOLUTION_FAILURE: {}", e))
            })?;
        }

        Ok(())
    }

    fn apply_session_overrides(
        &self,
        config: &mut crate::domains::session::SessionConfig,
    ) -> ConfigResult<()> {
        if let Ok(dir) = self.get_env_var("STORAGE_DIR") {
            config.storage_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
