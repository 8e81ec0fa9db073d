//! Dogmatch Remote Service Client
//!
//! This crate provides the HTTP connector to the remote dog service:
//! - Shared HTTP client configuration (timeouts, pooling, cookie jar)
//! - `FetchConnector`, implementing the `DogApi` and `LocationApi` ports

pub mod client;
pub mod fetch;

pub use client::HttpClientConfig;
pub use fetch::{FetchConfig, FetchConnector};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service error ({status_code}): {message}")]
    ServiceError { status_code: u16, message: String },

    #[error("Unauthorized: session cookie missing or expired")]
    Unauthorized,

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Convert into the core taxonomy as an authentication failure
    pub fn into_auth(self) -> dogmatch_core::Error {
        dogmatch_core::Error::Auth(self.to_string())
    }
}

impl From<ClientError> for dogmatch_core::Error {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::ConfigError(msg) | ClientError::InvalidUrl(msg) => {
                dogmatch_core::Error::Config(msg)
            }
            other => dogmatch_core::Error::Fetch(other.to_string()),
        }
    }
}
