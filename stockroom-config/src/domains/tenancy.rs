//! Tenant resolution and routing configuration

use crate::error::ConfigResult;
use crate::validation::{validate_path, validate_required_string, validate_url, Validatable};
use serde::{Deserialize, Serialize};

/// Where tenants live and where the guard sends people
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TenancyConfig {
    /// Origin to bounce to when a tenant cannot be resolved
    #[serde(default = "default_root_origin")]
    pub root_origin: String,

    /// Host label that marks local development (`acme.localhost`)
    #[serde(default = "default_loopback_label")]
    pub loopback_label: String,

    /// Unauthenticated landing page shown when there is no tenant
    #[serde(default = "default_marketing_path")]
    pub marketing_path: String,

    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Landing route for unknown paths and disabled features
    #[serde(default = "default_default_path")]
    pub default_path: String,

    /// Treat a failed lookup like a missing tenant and leave the origin
    #[serde(default = "crate::domains::utils::default_false")]
    pub redirect_on_resolution_failure: bool,
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            root_origin: default_root_origin(),
            loopback_label: default_loopback_label(),
            marketing_path: default_marketing_path(),
            login_path: default_login_path(),
            default_path: default_default_path(),
            redirect_on_resolution_failure: false,
        }
    }
}

impl Validatable for TenancyConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.root_origin, "root_origin", self.domain_name())?;
        validate_required_string(&self.loopback_label, "loopback_label", self.domain_name())?;
        if self.loopback_label.contains('.') {
            return Err(self.validation_error("loopback_label must be a single host label"));
        }
        validate_path(&self.marketing_path, "marketing_path", self.domain_name())?;
        validate_path(&self.login_path, "login_path", self.domain_name())?;
        validate_path(&self.default_path, "default_path", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "tenancy"
    }
}

fn default_root_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_loopback_label() -> String {
    "localhost".to_string()
}

fn default_marketing_path() -> String {
    "/index".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_default_path() -> String {
    "/dashboard".to_string()
}
