use stockroom_api_types::TenantKey;
use stockroom_http::HttpError;
use stockroom_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Login or signup rejected; `message` is fit to show inline
    #[error("{message}")]
    AuthenticationFailure { message: String },

    #[error("Session expired")]
    SessionExpired,

    #[error("Failed to persist session: {0}")]
    Storage(#[from] StorageError),
}

impl SessionError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::AuthenticationFailure {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TenantError {
    #[error("No tenant for this host")]
    NoTenant,

    #[error("Tenant '{key}' not found")]
    NotFound { key: TenantKey },

    #[error("Failed to resolve tenant '{key}': {reason}")]
    ResolutionFailure { key: TenantKey, reason: String },

    #[error(transparent)]
    Transport(#[from] HttpError),
}

/// Errors building an [`AppContext`](crate::AppContext)
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
