//! Domain-specific configuration modules

pub mod api;
pub mod http;
pub mod logging;
pub mod session;
pub mod tenancy;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main Stockroom configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StockroomConfig {
    /// Backend REST endpoint
    #[serde(default)]
    pub api: api::ApiConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Tenant resolution and routing
    #[serde(default)]
    pub tenancy: tenancy::TenancyConfig,

    /// Credential persistence
    #[serde(default)]
    pub session: session::SessionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,
}

impl StockroomConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.api.validate()?;
        self.http.validate()?;
        self.tenancy.validate()?;
        self.session.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = StockroomConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
