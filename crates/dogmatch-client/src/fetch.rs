//! Connector for the remote dog adoption service

use crate::{
    ClientError, Result,
    client::{HttpClientConfig, create_client},
};
use async_trait::async_trait;
use dogmatch_core::{
    DogApi, LocationApi,
    search::{SearchQuery, SearchResult},
    types::{Dog, Location, LocationSearchParams, LocationSearchResult, MatchResponse},
};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default base URL of the remote service
pub const DEFAULT_BASE_URL: &str = "https://frontend-take-home-service.fetch.com";

/// Service connector configuration
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base URL of the service (default: https://frontend-take-home-service.fetch.com)
    pub base_url: String,

    /// HTTP client configuration
    pub client_config: HttpClientConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_config: HttpClientConfig::default(),
        }
    }
}

impl FetchConfig {
    /// Set the base URL (for custom endpoints)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the HTTP client configuration
    pub fn with_client_config(mut self, client_config: HttpClientConfig) -> Self {
        self.client_config = client_config;
        self
    }
}

/// Remote service connector
///
/// Owns no application state beyond the cookie jar carrying the opaque
/// session cookie set by `login`.
pub struct FetchConnector {
    base_url: Url,
    client: Client,
    jar: Arc<Jar>,
}

impl FetchConnector {
    /// Create a new connector with an empty cookie jar
    pub fn new(config: FetchConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        let jar = Arc::new(Jar::default());
        let client = create_client(&config.client_config, Arc::clone(&jar))?;

        Ok(Self {
            base_url,
            client,
            jar,
        })
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The opaque cookie header currently held for the service, if any
    pub fn session_cookie(&self) -> Option<String> {
        self.jar
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Put a previously exported cookie header back into the jar
    pub fn restore_session_cookie(&self, cookie: &str) {
        for pair in cookie.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.jar.add_cookie_str(pair, &self.base_url);
        }
        debug!("Restored session cookie for {}", self.base_url);
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned + Send,
    {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await?;
        debug!("POST {} -> {}", path, response.status());
        response.handle_json(path).await
    }

    async fn get_json<T>(&self, path: &str, query: &[(String, String)]) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        let response = self
            .client
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await?;
        debug!("GET {} -> {}", path, response.status());
        response.handle_json(path).await
    }

    #[instrument(skip(self, email))]
    async fn send_login(&self, name: &str, email: &str) -> Result<()> {
        #[derive(Serialize)]
        struct LoginBody<'a> {
            name: &'a str,
            email: &'a str,
        }

        let response = self
            .client
            .post(self.endpoint("/auth/login"))
            .json(&LoginBody { name, email })
            .send()
            .await?;
        debug!("POST /auth/login -> {}", response.status());
        response.handle_empty().await
    }

    #[instrument(skip(self))]
    async fn send_logout(&self) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint("/auth/logout"))
            .send()
            .await?;
        debug!("POST /auth/logout -> {}", response.status());
        response.handle_empty().await
    }
}

#[async_trait]
impl DogApi for FetchConnector {
    async fn login(&self, name: &str, email: &str) -> dogmatch_core::Result<()> {
        self.send_login(name, email)
            .await
            .map_err(ClientError::into_auth)
    }

    async fn logout(&self) -> dogmatch_core::Result<()> {
        self.send_logout().await.map_err(ClientError::into_auth)
    }

    #[instrument(skip(self))]
    async fn breeds(&self) -> dogmatch_core::Result<Vec<String>> {
        Ok(self.get_json("/dogs/breeds", &[]).await?)
    }

    #[instrument(skip(self, query), fields(size = query.size, from = ?query.from, sort = %query.sort))]
    async fn search(&self, query: &SearchQuery) -> dogmatch_core::Result<SearchResult> {
        let result: SearchResult = self
            .get_json("/dogs/search", &query.to_query_pairs())
            .await?;
        debug!(
            "Search returned {} ids of {} total",
            result.result_ids.len(),
            result.total
        );
        Ok(result)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn fetch_dogs(&self, ids: &[String]) -> dogmatch_core::Result<Vec<Dog>> {
        Ok(self.post_json("/dogs", ids).await?)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn match_dogs(&self, ids: &[String]) -> dogmatch_core::Result<Option<String>> {
        let response: MatchResponse = self.post_json("/dogs/match", ids).await?;
        Ok(response.matched)
    }
}

#[async_trait]
impl LocationApi for FetchConnector {
    #[instrument(skip(self, zip_codes), fields(count = zip_codes.len()))]
    async fn locations(&self, zip_codes: &[String]) -> dogmatch_core::Result<Vec<Location>> {
        Ok(self.post_json("/locations", zip_codes).await?)
    }

    #[instrument(skip(self, params))]
    async fn search_locations(
        &self,
        params: &LocationSearchParams,
    ) -> dogmatch_core::Result<LocationSearchResult> {
        Ok(self.post_json("/locations/search", params).await?)
    }
}

// Helper trait for handling responses
#[async_trait]
trait ServiceResponseHandler {
    async fn handle_json<T: DeserializeOwned + Send>(self, path: &str) -> Result<T>;

    async fn handle_empty(self) -> Result<()>;
}

#[async_trait]
impl ServiceResponseHandler for reqwest::Response {
    async fn handle_json<T: DeserializeOwned + Send>(self, path: &str) -> Result<T> {
        let response = check_status(self).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse {} response: {}", path, e)))
    }

    async fn handle_empty(self) -> Result<()> {
        check_status(self).await.map(|_| ())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status_code = status.as_u16();
    if status_code == 401 {
        return Err(ClientError::Unauthorized);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error body".to_string());
    Err(ClientError::ServiceError {
        status_code,
        message,
    })
}
