//! Shared HTTP client utilities

use crate::{ClientError, Result};
use reqwest::cookie::Jar;
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Maximum number of idle connections per host
    pub pool_max_idle_per_host: usize,

    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            pool_max_idle_per_host: 8,
            user_agent: format!("Dogmatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Create a configured HTTP client sharing `jar` for credentials
///
/// Every request carries the cookies held by the jar, and every `Set-Cookie`
/// received lands in it. There is no automatic retry: a failed call is
/// reported once and the caller decides whether to try again.
pub fn create_client(config: &HttpClientConfig, jar: Arc<Jar>) -> Result<Client> {
    if config.timeout_secs == 0 {
        return Err(ClientError::ConfigError(
            "timeout_secs must be greater than zero".to_string(),
        ));
    }

    ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(&config.user_agent)
        .cookie_provider(jar)
        .use_rustls_tls()
        .build()
        .map_err(|e| ClientError::ConfigError(format!("Failed to create HTTP client: {}", e)))
}
