//! HTTP transport for the Stockroom backend
//!
//! [`ApiClient`] joins paths onto the configured `/api` base, attaches the
//! bearer credential from a [`CredentialSource`], and turns non-2xx responses
//! into [`HttpError`]s carrying the backend's own message. Every 401 is
//! reported back to the credential source so the session can be purged no
//! matter which call observed it.

pub mod client;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod types;

// Re-export main types for convenience
pub use client::ApiClient;
pub use config::HttpConfig;
pub use credentials::CredentialSource;
pub use errors::HttpError;
pub use types::HttpMethod;
