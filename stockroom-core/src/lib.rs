//! Tenant resolution and the session/authorization gate
//!
//! On every navigation the [`TenantResolver`] classifies the active host,
//! the [`SessionStore`] supplies the current credential, and the
//! [`RouteGuard`] turns both into a [`NavigationDecision`] for the hosting
//! shell to carry out. [`AppContext`] owns one of each and wires the session
//! into the HTTP client so any 401 purges it.

pub mod context;
pub mod error;
pub mod guard;
pub mod session;
pub mod tenant;

pub use context::AppContext;
pub use error::{SessionError, StartupError, TenantError};
pub use guard::{Access, Feature, NavigationContext, NavigationDecision, Page, Route, RouteGuard, View};
pub use session::{decode_claims, Session, SessionStore, TokenClaims};
pub use tenant::{derive_tenant_key, ResolutionState, TenantResolver};
