//! Domain-driven configuration for Stockroom
//!
//! Configuration is split by concern (`api`, `http`, `tenancy`, `session`,
//! `logging`), loaded from YAML with `STOCKROOM_*` environment overrides, and
//! validated per domain before use.

pub mod domains;
pub mod error;
pub mod loader;
pub mod validation;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    api::ApiConfig,
    http::HttpConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    session::SessionConfig,
    tenancy::TenancyConfig,
    StockroomConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration;
