//! Storage trait definitions

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for dogmatch_core::Error {
    fn from(err: StorageError) -> Self {
        dogmatch_core::Error::Storage(err.to_string())
    }
}

/// Well-known keys shared by the stores
pub mod keys {
    /// Serialized `Session`
    pub const USER: &str = "user";

    /// Serialized list of favorite `Dog` records
    pub const FAVORITES: &str = "favorites";

    /// Serialized `MatchRecord`, consumed by the match view
    pub const MATCH_RESULT: &str = "matchResult";

    /// Opaque auth cookie header kept between CLI runs
    pub const AUTH_COOKIE: &str = "authCookie";
}

/// Flat key/value persistence port
///
/// Writes are synchronous: once `set` or `remove` returns `Ok`, the change is
/// as durable as the implementation can make it.
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// JSON encoding on top of any `KeyValueStore`
pub trait JsonStoreExt {
    /// Load and decode the value under `key`
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>>;

    /// Encode and store `value` under `key`
    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> JsonStoreExt for S {
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.get(key)? {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                StorageError::Serialization(format!("Failed to decode '{}': {}", key, e))
            }),
            None => Ok(None),
        }
    }

    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| {
            StorageError::Serialization(format!("Failed to encode '{}': {}", key, e))
        })?;
        self.set(key, &raw)
    }
}
