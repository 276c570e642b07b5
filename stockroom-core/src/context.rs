//! Process-wide context: one session store, one tenant resolver, one guard

use std::sync::Arc;

use stockroom_config::StockroomConfig;
use stockroom_http::ApiClient;
use stockroom_storage::{FileStore, KeyValueStore, MemoryStore};
use tracing::{debug, info};

use crate::error::StartupError;
use crate::guard::{NavigationContext, NavigationDecision, RouteGuard};
use crate::session::{Session, SessionStore};
use crate::tenant::{ResolutionState, TenantResolver};

/// Built once at start-up and handed to whatever needs the session, the
/// tenant or an authenticated client.
#[derive(Debug)]
pub struct AppContext {
    config: StockroomConfig,
    api: ApiClient,
    session: SessionStore,
    tenant: TenantResolver,
    guard: RouteGuard,
}

impl AppContext {
    /// Wire the components over the given stores. `durable` holds the token
    /// and identity snapshot; `session_cache` holds the tenant config.
    pub fn new(
        config: StockroomConfig,
        durable: Arc<dyn KeyValueStore>,
        session_cache: Arc<dyn KeyValueStore>,
    ) -> Result<Self, StartupError> {
        let public_api = ApiClient::from_config(&config)?;
        let session = SessionStore::new(public_api.clone(), durable, &config.session);
        let api = public_api.with_credentials(Arc::new(session.clone()));

        let tenant = TenantResolver::new(api.clone(), session_cache, &config);
        let guard = RouteGuard::new(&config.tenancy, config.session.admin_role.clone());

        debug!("Application context ready for {}", api.base_url());
        Ok(Self {
            config,
            api,
            session,
            tenant,
            guard,
        })
    }

    /// Durable credentials under the configured storage directory and an
    /// in-memory tenant cache that lives as long as the process
    pub fn open(config: StockroomConfig) -> Result<Self, StartupError> {
        let durable = FileStore::open(config.session.credentials_file())?;
        Self::new(config, Arc::new(durable), Arc::new(MemoryStore::new()))
    }

    /// Restore the persisted session, then resolve the tenant for `host`.
    ///
    /// Restoration is local and always finishes before the first navigation
    /// is evaluated.
    pub async fn start(&self, host: &str) -> (Option<Session>, ResolutionState) {
        let session = self.session.restore();
        let state = self.tenant.initialize(host).await;
        info!("Started on {} ({})", host, state);
        (session, state)
    }

    /// Decide a navigation against the current tenant and session
    pub fn navigate(&self, path: &str) -> NavigationDecision {
        let key = self.tenant.tenant_key();
        let state = self.tenant.state();
        let session = self.session.current();

        let ctx = NavigationContext::new(key.as_ref(), &state, session.as_ref());
        let decision = self.guard.decide(&ctx, path);
        debug!("Navigation to {}: {}", path, decision);
        decision
    }

    pub fn config(&self) -> &StockroomConfig {
        &self.config
    }

    /// Client that sends the session token and purges the session on 401
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn tenant(&self) -> &TenantResolver {
        &self.tenant
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::View;

    fn context() -> AppContext {
        let mut config = StockroomConfig::default();
        config.api.base_url = "http://127.0.0.1:9/api".to_string();
        AppContext::new(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_navigation_before_start_is_loading() {
        let ctx = context();
        assert_eq!(
            ctx.navigate("/dashboard"),
            NavigationDecision::RenderRoute(View::Loading)
        );
    }

    #[tokio::test]
    async fn test_start_without_tenant_needs_no_network() {
        let ctx = context();
        let (session, state) = ctx.start("example.com").await;
        assert!(session.is_none());
        assert_eq!(state, ResolutionState::NoTenant);
        assert_eq!(
            ctx.navigate("/dashboard"),
            NavigationDecision::ClientRedirect("/index".to_string())
        );
    }

    #[test]
    fn test_open_creates_credentials_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StockroomConfig::default();
        config.session.storage_dir = dir.path().join("nested");

        let ctx = AppContext::open(config).unwrap();
        assert!(dir.path().join("nested").is_dir());
        assert!(!ctx.session().is_authenticated());
    }
}
