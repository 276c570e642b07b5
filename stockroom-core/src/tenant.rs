//! Host to tenant resolution
//!
//! The first host label names the tenant. Its configuration is fetched once
//! per process, cached in the session store, and only ever replaced whole.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use stockroom_api_types::{TenantConfig, TenantKey};
use stockroom_config::StockroomConfig;
use stockroom_http::ApiClient;
use stockroom_storage::{get_json, set_json, KeyValueStore};
use tracing::{debug, info, warn};

use crate::error::TenantError;

/// Outcome of resolving the active host
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionState {
    /// No tenant label in the host; marketing context
    NoTenant,
    /// Lookup in flight
    Loading,
    Resolved(TenantConfig),
    /// Backend has no such tenant
    NotFound(TenantKey),
    /// Any other lookup failure, with the reason to show
    Failed(TenantKey, String),
}

impl ResolutionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ResolutionState::Loading)
    }

    pub fn config(&self) -> Option<&TenantConfig> {
        match self {
            ResolutionState::Resolved(config) => Some(config),
            _ => None,
        }
    }
}

impl fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionState::NoTenant => write!(f, "no tenant"),
            ResolutionState::Loading => write!(f, "loading"),
            ResolutionState::Resolved(config) => {
                write!(f, "resolved ({})", config.display_name("unnamed"))
            }
            ResolutionState::NotFound(key) => write!(f, "tenant '{}' not found", key),
            ResolutionState::Failed(key, reason) => {
                write!(f, "tenant '{}' failed: {}", key, reason)
            }
        }
    }
}

/// Derive the tenant key from a request host.
///
/// The host is lower-cased and any port is dropped. Under the loopback label
/// (`acme.localhost`) any leading label other than the loopback label itself
/// is the key; the label must match whole, so `mylocalhost.com` is a public
/// domain. On a public domain only hosts with three or more labels carry
/// a key, so `example.com` is the root context. IP literals never do.
pub fn derive_tenant_key(host: &str, loopback_label: &str) -> Option<TenantKey> {
    let host = host.trim().to_ascii_lowercase();
    if host.starts_with('[') {
        return None;
    }
    let host = host.split(':').next().unwrap_or_default().trim_end_matches('.');
    if host.is_empty() || host.parse::<IpAddr>().is_ok() {
        return None;
    }

    let loopback = loopback_label.to_ascii_lowercase();
    let labels: Vec<&str> = host.split('.').collect();
    let first = labels.first().copied().filter(|label| !label.is_empty())?;

    let key = if labels.iter().any(|label| *label == loopback) {
        (labels.len() >= 2 && first != loopback).then_some(first)
    } else {
        (labels.len() > 2).then_some(first)
    };
    key.map(TenantKey::from)
}

/// Session-cache entry; the key guards against reusing another tenant's config
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedTenant {
    tenant_key: TenantKey,
    config: TenantConfig,
}

#[derive(Debug)]
struct ResolverState {
    key: Option<TenantKey>,
    state: ResolutionState,
    /// Bumped by every transition; an in-flight lookup only lands if it still
    /// holds the current generation
    generation: u64,
}

/// Resolves and caches the active tenant's configuration
pub struct TenantResolver {
    api: ApiClient,
    cache: Arc<dyn KeyValueStore>,
    cache_key: String,
    loopback_label: String,
    state: RwLock<ResolverState>,
}

impl fmt::Debug for TenantResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantResolver")
            .field("state", &*self.state.read())
            .finish()
    }
}

impl TenantResolver {
    pub fn new(api: ApiClient, cache: Arc<dyn KeyValueStore>, config: &StockroomConfig) -> Self {
        Self {
            api,
            cache,
            cache_key: config.session.tenant_cache_key.clone(),
            loopback_label: config.tenancy.loopback_label.clone(),
            state: RwLock::new(ResolverState {
                key: None,
                state: ResolutionState::Loading,
                generation: 0,
            }),
        }
    }

    /// Resolve the tenant for `host`, reusing the session cache when it holds
    /// this tenant's config
    pub async fn initialize(&self, host: &str) -> ResolutionState {
        let Some(key) = derive_tenant_key(host, &self.loopback_label) else {
            debug!("Host {} carries no tenant", host);
            self.transition(None, ResolutionState::NoTenant);
            return ResolutionState::NoTenant;
        };

        if let Some(config) = self.cached_config_for(&key) {
            debug!("Using cached config for tenant {}", key);
            let state = ResolutionState::Resolved(config);
            self.transition(Some(key), state.clone());
            return state;
        }

        self.resolve(key).await
    }

    /// Fetch `key`'s config from the backend and classify the outcome.
    ///
    /// If another transition happened while the request was in flight the
    /// response is dropped and the current state returned unchanged.
    pub async fn resolve(&self, key: TenantKey) -> ResolutionState {
        let generation = self.transition(Some(key.clone()), ResolutionState::Loading);
        debug!("Resolving tenant {} (generation {})", key, generation);

        let outcome = self
            .api
            .get_public::<TenantConfig>(&["tenant-config", "by-subdomain", key.as_str()])
            .await;

        let mut current = self.state.write();
        if current.generation != generation {
            debug!(
                "Dropping stale config response for tenant {} (generation {}, now {})",
                key, generation, current.generation
            );
            return current.state.clone();
        }

        current.state = match outcome {
            Ok(config) => {
                info!("Resolved tenant {}", key);
                self.write_cache(&key, &config);
                ResolutionState::Resolved(config)
            }
            Err(e) if e.is_not_found() => {
                warn!("Tenant {} not found", key);
                ResolutionState::NotFound(key)
            }
            Err(e) => {
                warn!("Failed to resolve tenant {}: {}", key, e);
                ResolutionState::Failed(key, e.to_string())
            }
        };
        current.state.clone()
    }

    /// Current tenant's config from the authenticated endpoint. `None` when
    /// the tenant has no configuration yet (400 or 404).
    pub async fn fetch_current_config(&self) -> Result<Option<TenantConfig>, TenantError> {
        match self.api.get::<TenantConfig>(&["tenant-config"]).await {
            Ok(config) => Ok(Some(config)),
            Err(e) if matches!(e.status(), Some(400) | Some(404)) => {
                debug!("Tenant has no configuration yet");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the tenant's config. On failure the cached config is untouched.
    pub async fn update_config(&self, config: &TenantConfig) -> Result<TenantConfig, TenantError> {
        let key = self.tenant_key().ok_or(TenantError::NoTenant)?;
        let returned: Option<TenantConfig> = self.api.put(&["tenant-config"], config).await?;
        let updated = returned.unwrap_or_else(|| config.clone());

        info!("Updated configuration for tenant {}", key);
        self.replace_config(key, updated.clone());
        Ok(updated)
    }

    /// Ask the backend to create a default config for a tenant that has none
    pub async fn initialize_default_config(&self) -> Result<TenantConfig, TenantError> {
        let key = self.tenant_key().ok_or(TenantError::NoTenant)?;
        let config: TenantConfig = self
            .api
            .post_empty(&["tenant-config", "initialize"])
            .await?;

        info!("Initialised default configuration for tenant {}", key);
        self.replace_config(key, config.clone());
        Ok(config)
    }

    pub fn state(&self) -> ResolutionState {
        self.state.read().state.clone()
    }

    pub fn config(&self) -> Option<TenantConfig> {
        self.state.read().state.config().cloned()
    }

    pub fn tenant_key(&self) -> Option<TenantKey> {
        self.state.read().key.clone()
    }

    /// The resolved config, or the reason there is none
    pub fn require_config(&self) -> Result<TenantConfig, TenantError> {
        let current = self.state.read();
        match (&current.state, &current.key) {
            (ResolutionState::Resolved(config), _) => Ok(config.clone()),
            (ResolutionState::NotFound(key), _) => Err(TenantError::NotFound { key: key.clone() }),
            (ResolutionState::Failed(key, reason), _) => Err(TenantError::ResolutionFailure {
                key: key.clone(),
                reason: reason.clone(),
            }),
            (ResolutionState::Loading, Some(key)) => Err(TenantError::ResolutionFailure {
                key: key.clone(),
                reason: "resolution still in progress".to_string(),
            }),
            (ResolutionState::Loading, None) | (ResolutionState::NoTenant, _) => {
                Err(TenantError::NoTenant)
            }
        }
    }

    fn transition(&self, key: Option<TenantKey>, state: ResolutionState) -> u64 {
        let mut current = self.state.write();
        current.generation += 1;
        current.key = key;
        current.state = state;
        current.generation
    }

    /// Whole-object replace of cache and state
    fn replace_config(&self, key: TenantKey, config: TenantConfig) {
        let mut current = self.state.write();
        self.write_cache(&key, &config);
        current.generation += 1;
        current.key = Some(key);
        current.state = ResolutionState::Resolved(config);
    }

    fn cached_config_for(&self, key: &TenantKey) -> Option<TenantConfig> {
        match get_json::<CachedTenant>(self.cache.as_ref(), &self.cache_key) {
            Ok(Some(entry)) if entry.tenant_key == *key => Some(entry.config),
            Ok(_) => None,
            Err(e) => {
                warn!("Ignoring unreadable tenant cache: {}", e);
                if let Err(e) = self.cache.remove(&self.cache_key) {
                    warn!("Failed to clear tenant cache: {}", e);
                }
                None
            }
        }
    }

    fn write_cache(&self, key: &TenantKey, config: &TenantConfig) {
        let entry = CachedTenant {
            tenant_key: key.clone(),
            config: config.clone(),
        };
        if let Err(e) = set_json(self.cache.as_ref(), &self.cache_key, &entry) {
            warn!("Failed to cache config for tenant {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(host: &str) -> Option<String> {
        derive_tenant_key(host, "localhost").map(|k| k.0)
    }

    #[test]
    fn test_loopback_hosts() {
        assert_eq!(key("acme.localhost").as_deref(), Some("acme"));
        assert_eq!(key("acme.localhost:3000").as_deref(), Some("acme"));
        assert_eq!(key("ACME.LocalHost").as_deref(), Some("acme"));
        assert_eq!(key("localhost"), None);
        assert_eq!(key("localhost:5173"), None);
    }

    #[test]
    fn test_public_hosts() {
        assert_eq!(key("example.com"), None);
        assert_eq!(key("acme.example.com").as_deref(), Some("acme"));
        assert_eq!(key("shop.eu.example.com").as_deref(), Some("shop"));
        assert_eq!(key("acme.example.com.").as_deref(), Some("acme"));
    }

    #[test]
    fn test_loopback_label_must_match_a_whole_label() {
        assert_eq!(key("mylocalhost.com"), None);
        assert_eq!(key("acme.mylocalhost.com").as_deref(), Some("acme"));
    }

    #[test]
    fn test_hosts_without_a_usable_label() {
        assert_eq!(key(""), None);
        assert_eq!(key("192.168.1.20"), None);
        assert_eq!(key("[::1]:8080"), None);
        assert_eq!(key(".example.com"), None);
    }

    #[test]
    fn test_custom_loopback_label() {
        let key = derive_tenant_key("acme.dev", "dev").unwrap();
        assert_eq!(key.as_str(), "acme");
        assert!(derive_tenant_key("dev", "dev").is_none());
    }

    #[test]
    fn test_state_helpers() {
        assert!(!ResolutionState::Loading.is_terminal());
        assert!(ResolutionState::NotFound("acme".into()).is_terminal());
        let resolved = ResolutionState::Resolved(TenantConfig::default());
        assert!(resolved.config().is_some());
        assert_eq!(
            ResolutionState::NotFound("acme".into()).to_string(),
            "tenant 'acme' not found"
        );
    }
}
