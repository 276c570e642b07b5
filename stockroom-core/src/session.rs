//! Credential and identity lifecycle
//!
//! The bearer token and a denormalised identity snapshot are persisted side
//! by side in the durable store. The token is only ever inspected locally for
//! its expiry; identity comes from the snapshot, which may carry more roles
//! than the token's claims.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use stockroom_api_types::{AuthResponse, LoginRequest, Role, SignupRequest, UserIdentity};
use stockroom_config::SessionConfig;
use stockroom_http::{ApiClient, CredentialSource};
use stockroom_storage::{get_json, KeyValueStore, StorageError};
use tracing::{debug, info, warn};

use crate::error::SessionError;

const LOGIN_FALLBACK: &str = "Invalid username or password.";
const SIGNUP_FALLBACK: &str = "Registration failed.";

/// Claims read from the bearer token without verifying its signature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<serde_json::Value>,
}

impl TokenClaims {
    /// `exp` as an instant; out-of-range values count as already expired
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Decode a token's claims locally.
///
/// The client holds no key, so the signature is not checked and `exp` is read
/// rather than enforced; callers compare it themselves.
pub fn decode_claims(token: &str) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::from(["exp".to_string()]);

    decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation).map(|data| data.claims)
}

/// An authenticated user
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub raw_token: String,
    pub subject: String,
    pub email: String,
    pub roles: Vec<String>,
    pub token_type: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("raw_token", &"<redacted>")
            .field("subject", &self.subject)
            .field("email", &self.email)
            .field("roles", &self.roles)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Session {
    fn from_parts(raw_token: String, identity: UserIdentity, claims: &TokenClaims) -> Self {
        let subject = if identity.username.trim().is_empty() {
            claims.sub.clone()
        } else {
            identity.username
        };
        Self {
            raw_token,
            subject,
            email: identity.email,
            roles: identity.roles,
            token_type: identity.token_type,
            expires_at: claims.expires_at(),
        }
    }

    /// Valid strictly before its expiry instant
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Role membership, ignoring case and any `ROLE_` prefix
    pub fn has_role(&self, role: &str) -> bool {
        let wanted = Role::normalize_label(role);
        self.roles
            .iter()
            .any(|label| Role::normalize_label(label) == wanted)
    }

    pub fn display_role(&self) -> Option<Role> {
        Role::highest(self.roles.iter().map(String::as_str))
    }

    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            token_type: self.token_type.clone(),
            username: self.subject.clone(),
            email: self.email.clone(),
            roles: self.roles.clone(),
        }
    }
}

struct SessionInner {
    api: ApiClient,
    store: Arc<dyn KeyValueStore>,
    token_key: String,
    identity_key: String,
    admin_role: String,
    current: RwLock<Option<Session>>,
}

/// Owns the current session. Clones share state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("current", &*self.inner.current.read())
            .finish()
    }
}

impl SessionStore {
    /// `api` is used for the unauthenticated auth endpoints only
    pub fn new(api: ApiClient, store: Arc<dyn KeyValueStore>, config: &SessionConfig) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                api,
                store,
                token_key: config.token_key.clone(),
                identity_key: config.identity_key.clone(),
                admin_role: config.admin_role.clone(),
                current: RwLock::new(None),
            }),
        }
    }

    /// Rebuild the session from durable storage.
    ///
    /// An expired or unreadable token, or a token without a readable identity
    /// snapshot, purges storage and yields `None`.
    pub fn restore(&self) -> Option<Session> {
        let Some(token) = self.inner.store.get(&self.inner.token_key) else {
            debug!("No persisted session");
            *self.inner.current.write() = None;
            return None;
        };

        match self.session_from_storage(token) {
            Ok(session) if session.is_valid_at(Utc::now()) => {
                info!("Restored session for {}", session.subject);
                *self.inner.current.write() = Some(session.clone());
                Some(session)
            }
            Ok(session) => {
                warn!("Persisted session for {} has expired, clearing it", session.subject);
                self.purge();
                None
            }
            Err(reason) => {
                warn!("Discarding unreadable persisted session: {}", reason);
                self.purge();
                None
            }
        }
    }

    fn session_from_storage(&self, token: String) -> Result<Session, String> {
        let claims = decode_claims(&token).map_err(|e| format!("token: {}", e))?;
        let identity: UserIdentity = get_json(self.inner.store.as_ref(), &self.inner.identity_key)
            .map_err(|e| format!("identity snapshot: {}", e))?
            .ok_or_else(|| "identity snapshot missing".to_string())?;
        Ok(Session::from_parts(token, identity, &claims))
    }

    /// Authenticate against `/auth/login`. Any failure clears persisted state.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Session, SessionError> {
        debug!("Logging in as {}", credentials.username);
        match self
            .authenticate(&["auth", "login"], credentials, LOGIN_FALLBACK)
            .await
        {
            Ok(session) => Ok(session),
            Err(e) => {
                warn!("Login failed for {}: {}", credentials.username, e);
                self.purge();
                Err(e)
            }
        }
    }

    /// Register through `/auth/register` and start a session
    pub async fn signup(&self, new_user: &SignupRequest) -> Result<Session, SessionError> {
        debug!("Registering {}", new_user.username);
        self.authenticate(&["auth", "register"], new_user, SIGNUP_FALLBACK)
            .await
            .inspect_err(|e| warn!("Signup failed for {}: {}", new_user.username, e))
    }

    async fn authenticate<B: Serialize>(
        &self,
        path: &[&str],
        body: &B,
        fallback: &str,
    ) -> Result<Session, SessionError> {
        let response: AuthResponse = self
            .inner
            .api
            .post_public(path, body)
            .await
            .map_err(|e| SessionError::authentication(e.to_string()))?;

        // The backend reports bad credentials as a body without a token
        let Some(token) = response.token() else {
            let message = response
                .error_message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(fallback);
            return Err(SessionError::authentication(message));
        };

        let claims = decode_claims(token)
            .map_err(|e| SessionError::authentication(format!("Malformed token: {}", e)))?;
        let identity = response.identity();
        let snapshot = serde_json::to_string(&identity).map_err(StorageError::from)?;

        self.inner.store.set_many(&[
            (self.inner.token_key.as_str(), token.to_string()),
            (self.inner.identity_key.as_str(), snapshot),
        ])?;

        let session = Session::from_parts(token.to_string(), identity, &claims);
        info!(
            "Signed in as {} until {}",
            session.subject,
            session.expires_at.to_rfc3339()
        );
        *self.inner.current.write() = Some(session.clone());
        Ok(session)
    }

    /// Drop the session locally. There is no server-side logout.
    pub fn logout(&self) {
        if let Some(session) = self.inner.current.read().as_ref() {
            info!("Signing out {}", session.subject);
        }
        self.purge();
    }

    /// Clear persisted token and identity and the in-memory session
    pub fn purge(&self) {
        *self.inner.current.write() = None;
        let keys = [self.inner.token_key.as_str(), self.inner.identity_key.as_str()];
        if let Err(e) = self.inner.store.remove_many(&keys) {
            warn!("Failed to clear persisted session: {}", e);
        }
    }

    /// The active session, purging it first if it has expired since restore
    pub fn current(&self) -> Option<Session> {
        let session = self.inner.current.read().clone()?;
        if session.is_valid_at(Utc::now()) {
            return Some(session);
        }
        info!("Session for {} expired", session.subject);
        self.purge();
        None
    }

    /// Like [`current`](Self::current) but an error when signed out
    pub fn require(&self) -> Result<Session, SessionError> {
        self.current().ok_or(SessionError::SessionExpired)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// False, not an error, when signed out
    pub fn is_in_role(&self, role: &str) -> bool {
        self.current().is_some_and(|s| s.has_role(role))
    }

    pub fn is_admin(&self) -> bool {
        self.is_in_role(&self.inner.admin_role)
    }

    pub fn admin_role(&self) -> &str {
        &self.inner.admin_role
    }

    pub fn display_role(&self) -> Option<Role> {
        self.current().and_then(|s| s.display_role())
    }
}

impl CredentialSource for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.current().map(|s| s.raw_token)
    }

    fn on_unauthorized(&self) {
        warn!("Backend rejected the session token, signing out");
        self.purge();
    }
}
