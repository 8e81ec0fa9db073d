//! Durable key/value storage backed by a single JSON file

use crate::atomic_writer::AtomicWriter;
use crate::traits::{KeyValueStore, StorageError, StorageResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Key/value store persisted as one JSON object on disk
///
/// The whole map is loaded when the store is opened and rewritten atomically
/// on every `set`/`remove`. Concurrent writers in other processes are not
/// coordinated; the last rewrite wins.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading existing state if the file exists
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        let state = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    StorageError::InvalidData(format!(
                        "Failed to load state from {}: {}",
                        path.display(),
                        e
                    ))
                })?
            }
        } else {
            BTreeMap::new()
        };

        debug!("Opened state file {} ({} keys)", path.display(), state.len());

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, state: &BTreeMap<String, String>) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(state)
            .map_err(|e| StorageError::Serialization(format!("Failed to serialize state: {}", e)))?;

        let mut writer = AtomicWriter::new(&self.path)?;
        writer.write(content.as_bytes())?;
        writer.commit()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let state = self.state.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(state.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut state = self.state.write().map_err(|_| StorageError::LockPoisoned)?;
        let previous = state.insert(key.to_string(), value.to_string());

        if let Err(e) = self.persist(&state) {
            // Keep memory and disk in agreement
            match previous {
                Some(old) => state.insert(key.to_string(), old),
                None => state.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut state = self.state.write().map_err(|_| StorageError::LockPoisoned)?;
        let Some(previous) = state.remove(key) else {
            return Ok(());
        };

        if let Err(e) = self.persist(&state) {
            state.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}
