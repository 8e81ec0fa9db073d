//! Dogmatch Storage Abstraction
//!
//! This crate provides the persistence port used by the client-side stores
//! and its implementations:
//! - `KeyValueStore`: flat string keys to string blobs
//! - `MemoryStore`: process-local map, for tests and ephemeral runs
//! - `FileStore`: durable JSON file, rewritten atomically on every mutation

mod atomic_writer;
pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{JsonStoreExt, KeyValueStore, StorageError, StorageResult, keys};
