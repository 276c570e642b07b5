//! Logging setup for Stockroom
//!
//! Everything logs through `tracing`; this crate only installs the global
//! subscriber, either from [`LoggingConfig`] or from a bare level string.

pub mod init;

pub use init::{build_env_filter, init_logging_from_config, init_simple_tracing};
pub use stockroom_config::{LogFormat, LogLevel, LoggingConfig};
