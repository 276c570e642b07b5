//! Client-side persistence for Stockroom
//!
//! Two stores share the [`KeyValueStore`] trait: [`FileStore`] survives
//! restarts and holds the bearer token and identity snapshot, while
//! [`MemoryStore`] lives only as long as the process and caches the resolved
//! tenant configuration.

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{get_json, set_json, KeyValueStore};
