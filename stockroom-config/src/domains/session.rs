//! Credential persistence configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory holding the durable credential store
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Key of the bearer token entry
    #[serde(default = "default_token_key")]
    pub token_key: String,

    /// Key of the identity snapshot entry
    #[serde(default = "default_identity_key")]
    pub identity_key: String,

    /// Key of the session-lifetime tenant config entry
    #[serde(default = "default_tenant_cache_key")]
    pub tenant_cache_key: String,

    /// Role label required by admin-only routes
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            token_key: default_token_key(),
            identity_key: default_identity_key(),
            tenant_cache_key: default_tenant_cache_key(),
            admin_role: default_admin_role(),
        }
    }
}

impl SessionConfig {
    /// File backing the durable store
    pub fn credentials_file(&self) -> PathBuf {
        self.storage_dir.join("credentials.json")
    }
}

impl Validatable for SessionConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.storage_dir.as_os_str().is_empty() {
            return Err(self.validation_error("storage_dir cannot be empty"));
        }
        validate_required_string(&self.token_key, "token_key", self.domain_name())?;
        validate_required_string(&self.identity_key, "identity_key", self.domain_name())?;
        validate_required_string(&self.tenant_cache_key, "tenant_cache_key", self.domain_name())?;
        validate_required_string(&self.admin_role, "admin_role", self.domain_name())?;

        if self.token_key == self.identity_key {
            return Err(self.validation_error("token_key and identity_key must differ"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "session"
    }
}

fn default_storage_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".stockroom"))
        .unwrap_or_else(|| PathBuf::from(".stockroom"))
}

fn default_token_key() -> String {
    "token".to_string()
}

fn default_identity_key() -> String {
    "user".to_string()
}

fn default_tenant_cache_key() -> String {
    "tenantConfig".to_string()
}

fn default_admin_role() -> String {
    "ADMIN".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.token_key, "token");
        assert_eq!(config.identity_key, "user");
        assert_eq!(config.tenant_cache_key, "tenantConfig");
        assert_eq!(config.admin_role, "ADMIN");
        assert!(config.storage_dir.ends_with(".stockroom"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_colliding_keys_rejected() {
        let config = SessionConfig {
            identity_key: "token".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
