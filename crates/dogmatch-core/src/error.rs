//! Error types for Dogmatch Core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Login or logout was rejected by the remote service
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A search, breed, hydrate or match call failed or returned malformed data
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// A required record is absent (for example no pending match)
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error belongs to the AuthFailure class
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    /// Whether this error belongs to the FetchFailure class
    pub fn is_fetch(&self) -> bool {
        matches!(self, Error::Fetch(_) | Error::Serialization(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
