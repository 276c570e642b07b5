//! Per-tenant configuration document
//!
//! Every section and field is optional on the wire: a freshly initialised
//! tenant may only carry a handful of settings. Updates always send the whole
//! document back; there is no field-level patching.

use serde::{Deserialize, Serialize};

use crate::enums::{CornerStyle, LayoutStyle, ThemeMode};
use crate::serde_helpers::null_as_default;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: Brand,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ui_theme: UiTheme,
    #[serde(default, deserialize_with = "null_as_default")]
    pub localization: Localization,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Features,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTheme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ThemeMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_style: Option<LayoutStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_style: Option<CornerStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Localization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

/// Feature toggles. `None` means the tenant never set the flag, which the
/// client treats as enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_module: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_module: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_management: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_pricing: Option<bool>,
}

impl Features {
    pub fn inventory_enabled(&self) -> bool {
        self.inventory_module.unwrap_or(true)
    }

    pub fn reporting_enabled(&self) -> bool {
        self.reporting_module.unwrap_or(true)
    }

    pub fn supplier_management_enabled(&self) -> bool {
        self.supplier_management.unwrap_or(true)
    }

    pub fn advanced_pricing_enabled(&self) -> bool {
        self.advanced_pricing.unwrap_or(true)
    }
}

impl TenantConfig {
    /// Display name, falling back to the tenant key
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.brand.name.as_deref().unwrap_or(fallback)
    }
}
