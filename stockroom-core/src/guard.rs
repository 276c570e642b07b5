//! Navigation decisions
//!
//! [`RouteGuard::decide`] is a pure function of the tenant resolution state,
//! the current session and the requested path. Carrying out the decision is
//! left to the hosting shell.

use std::fmt;

use chrono::{DateTime, Utc};
use stockroom_api_types::{Features, TenantConfig, TenantKey};
use stockroom_config::TenancyConfig;

use crate::session::Session;
use crate::tenant::ResolutionState;

/// Who may render a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any valid session
    Protected,
    /// Valid session holding the admin role
    Admin,
}

/// Tenant feature flag a route depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Inventory,
    SupplierManagement,
}

impl Feature {
    pub fn enabled_in(&self, features: &Features) -> bool {
        match self {
            Feature::Inventory => features.inventory_enabled(),
            Feature::SupplierManagement => features.supplier_management_enabled(),
        }
    }
}

/// In-tenant application pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    Signup,
    Dashboard,
    Inventory,
    Suppliers,
    Invoices,
    Batches,
    Sales,
    Users,
    Settings,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Login => "login",
            Page::Signup => "signup",
            Page::Dashboard => "dashboard",
            Page::Inventory => "inventory",
            Page::Suppliers => "suppliers",
            Page::Invoices => "invoices",
            Page::Batches => "batches",
            Page::Sales => "sales",
            Page::Users => "users",
            Page::Settings => "settings",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub page: Page,
    pub access: Access,
    pub feature: Option<Feature>,
}

impl Route {
    fn new(path: impl Into<String>, page: Page, access: Access) -> Self {
        Self {
            path: path.into(),
            page,
            access,
            feature: None,
        }
    }

    fn gated_by(mut self, feature: Feature) -> Self {
        self.feature = Some(feature);
        self
    }
}

/// What the shell should show for a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Marketing,
    Loading,
    /// Tenant lookup failed for a reason other than "no such tenant"
    ResolutionError { key: TenantKey, reason: String },
    Page(Page),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    RenderRoute(View),
    /// In-app route change
    ClientRedirect(String),
    /// Full navigation that leaves the tenant origin
    CrossOriginRedirect(String),
}

impl NavigationDecision {
    pub fn is_redirect(&self) -> bool {
        !matches!(self, NavigationDecision::RenderRoute(_))
    }
}

impl fmt::Display for NavigationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationDecision::RenderRoute(View::Marketing) => write!(f, "render marketing"),
            NavigationDecision::RenderRoute(View::Loading) => write!(f, "render loading"),
            NavigationDecision::RenderRoute(View::ResolutionError { key, reason }) => {
                write!(f, "render error for tenant '{}': {}", key, reason)
            }
            NavigationDecision::RenderRoute(View::Page(page)) => write!(f, "render {}", page),
            NavigationDecision::ClientRedirect(path) => write!(f, "redirect to {}", path),
            NavigationDecision::CrossOriginRedirect(url) => write!(f, "leave for {}", url),
        }
    }
}

/// Snapshot of everything a decision depends on
#[derive(Debug, Clone, Copy)]
pub struct NavigationContext<'a> {
    /// Key derived from the current host
    pub tenant_key: Option<&'a TenantKey>,
    pub resolution: &'a ResolutionState,
    pub session: Option<&'a Session>,
    pub now: DateTime<Utc>,
}

impl<'a> NavigationContext<'a> {
    pub fn new(
        tenant_key: Option<&'a TenantKey>,
        resolution: &'a ResolutionState,
        session: Option<&'a Session>,
    ) -> Self {
        Self {
            tenant_key,
            resolution,
            session,
            now: Utc::now(),
        }
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    routes: Vec<Route>,
    root_origin: String,
    marketing_path: String,
    login_path: String,
    default_path: String,
    redirect_on_resolution_failure: bool,
    admin_role: String,
}

impl RouteGuard {
    pub fn new(tenancy: &TenancyConfig, admin_role: impl Into<String>) -> Self {
        let routes = vec![
            Route::new(tenancy.login_path.clone(), Page::Login, Access::Public),
            Route::new("/signup", Page::Signup, Access::Public),
            Route::new("/dashboard", Page::Dashboard, Access::Protected),
            Route::new("/inventory", Page::Inventory, Access::Protected).gated_by(Feature::Inventory),
            Route::new("/suppliers", Page::Suppliers, Access::Protected)
                .gated_by(Feature::SupplierManagement),
            Route::new("/invoices", Page::Invoices, Access::Protected)
                .gated_by(Feature::SupplierManagement),
            Route::new("/batches", Page::Batches, Access::Protected).gated_by(Feature::Inventory),
            Route::new("/sales", Page::Sales, Access::Protected),
            Route::new("/users", Page::Users, Access::Admin),
            Route::new("/settings", Page::Settings, Access::Admin),
        ];

        Self {
            routes,
            root_origin: tenancy.root_origin.clone(),
            marketing_path: normalize_path(&tenancy.marketing_path),
            login_path: normalize_path(&tenancy.login_path),
            default_path: normalize_path(&tenancy.default_path),
            redirect_on_resolution_failure: tenancy.redirect_on_resolution_failure,
            admin_role: admin_role.into(),
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, path: &str) -> Option<&Route> {
        let path = normalize_path(path);
        self.routes.iter().find(|route| route.path == path)
    }

    /// Decide what to do with a navigation to `path`.
    ///
    /// Tenant state is checked first; routes are only authorised once the
    /// tenant is resolved.
    pub fn decide(&self, ctx: &NavigationContext<'_>, path: &str) -> NavigationDecision {
        let path = normalize_path(path);

        let Some(key) = ctx.tenant_key else {
            return match ctx.resolution {
                ResolutionState::Loading => NavigationDecision::RenderRoute(View::Loading),
                _ if path == self.marketing_path => NavigationDecision::RenderRoute(View::Marketing),
                _ => NavigationDecision::ClientRedirect(self.marketing_path.clone()),
            };
        };

        match ctx.resolution {
            ResolutionState::Resolved(config) => self.authorize(ctx, &path, config),
            ResolutionState::NotFound(missing) if missing == key => {
                NavigationDecision::CrossOriginRedirect(self.root_origin.clone())
            }
            ResolutionState::Failed(failed, _) if failed == key && self.redirect_on_resolution_failure => {
                NavigationDecision::CrossOriginRedirect(self.root_origin.clone())
            }
            ResolutionState::Failed(failed, reason) if failed == key => {
                NavigationDecision::RenderRoute(View::ResolutionError {
                    key: failed.clone(),
                    reason: reason.clone(),
                })
            }
            // Still loading, or the state belongs to a previous host
            _ => NavigationDecision::RenderRoute(View::Loading),
        }
    }

    fn authorize(
        &self,
        ctx: &NavigationContext<'_>,
        path: &str,
        config: &TenantConfig,
    ) -> NavigationDecision {
        if path == "/" {
            return NavigationDecision::ClientRedirect(self.login_path.clone());
        }
        if path == self.marketing_path {
            return NavigationDecision::RenderRoute(View::Marketing);
        }

        let Some(route) = self.route(path) else {
            return self.fallback(path);
        };
        if route.access == Access::Public {
            return NavigationDecision::RenderRoute(View::Page(route.page));
        }

        let Some(session) = ctx.session.filter(|s| s.is_valid_at(ctx.now)) else {
            return NavigationDecision::ClientRedirect(self.login_path.clone());
        };
        // Forbidden and unauthenticated look the same at this layer
        if route.access == Access::Admin && !session.has_role(&self.admin_role) {
            return NavigationDecision::ClientRedirect(self.login_path.clone());
        }

        match route.feature {
            Some(feature) if !feature.enabled_in(&config.features) => self.fallback(path),
            _ => NavigationDecision::RenderRoute(View::Page(route.page)),
        }
    }

    /// Unknown or disabled route
    fn fallback(&self, path: &str) -> NavigationDecision {
        if path == self.default_path {
            NavigationDecision::ClientRedirect(self.login_path.clone())
        } else {
            NavigationDecision::ClientRedirect(self.default_path.clone())
        }
    }
}

/// Drop query, fragment and trailing slash
fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default().trim();
    let path = path.trim_end_matches('/');
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
