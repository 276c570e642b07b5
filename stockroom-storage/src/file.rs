//! File-backed durable store

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};
use crate::store::KeyValueStore;

type Entries = BTreeMap<String, String>;

/// Durable store kept as a single JSON object on disk.
///
/// Every mutation writes the complete map to a temporary file next to the
/// target and renames it into place, so the file always holds either the old
/// or the new state. A corrupt file is treated as empty and replaced by the
/// next write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<Entries>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let entries = match Self::load_entries(&path) {
            Ok(entries) => entries,
            Err(StorageError::Corrupt { path, reason }) => {
                warn!("Ignoring corrupt store at {}: {}", path.display(), reason);
                Entries::new()
            }
            Err(e) => return Err(e),
        };
        debug!("Opened store {} with {} entries", path.display(), entries.len());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the on-disk map. A missing file is an empty map.
    pub fn load_entries(path: &Path) -> StorageResult<Entries> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Apply `change` to a copy of the map, persist it, then publish it.
    /// On a failed write the in-memory map is left untouched.
    fn update(&self, change: impl FnOnce(&mut Entries)) -> StorageResult<()> {
        let mut guard = self.entries.write();
        let mut next = guard.clone();
        change(&mut next);
        if next == *guard {
            return Ok(());
        }
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn persist(&self, entries: &Entries) -> StorageResult<()> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) => dir,
            None => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, entries)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set_many(&self, entries: &[(&str, String)]) -> StorageResult<()> {
        self.update(|map| {
            for (key, value) in entries {
                map.insert((*key).to_string(), value.clone());
            }
        })
    }

    fn remove_many(&self, keys: &[&str]) -> StorageResult<()> {
        self.update(|map| {
            for key in keys {
                map.remove(*key);
            }
        })
    }

    fn clear(&self) -> StorageResult<()> {
        self.update(Entries::clear)
    }

    fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
