//! Remote service port
//!
//! The search, session and match flows talk to the remote dog service only
//! through these traits, so they can be driven by the HTTP client in
//! production and by in-memory fakes in tests.

use crate::{
    Result,
    search::{SearchQuery, SearchResult},
    types::{Dog, Location, LocationSearchParams, LocationSearchResult},
};

#[async_trait::async_trait]
pub trait DogApi: Send + Sync {
    /// Establish a server-side session for `name`/`email`
    ///
    /// # Errors
    /// - `Error::Auth` if the service rejects the login or cannot be reached
    async fn login(&self, name: &str, email: &str) -> Result<()>;

    /// End the server-side session
    ///
    /// # Errors
    /// - `Error::Auth` if the service rejects the logout or cannot be reached
    async fn logout(&self) -> Result<()>;

    /// All breed names known to the service
    async fn breeds(&self) -> Result<Vec<String>>;

    /// Run a search, returning one page of ids and the overall total
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult>;

    /// Hydrate full dog records for `ids`
    ///
    /// The service makes no promise about the order of the returned records.
    async fn fetch_dogs(&self, ids: &[String]) -> Result<Vec<Dog>>;

    /// Ask the service to pick one dog out of `ids`
    ///
    /// Returns `None` when the service answers without a match.
    async fn match_dogs(&self, ids: &[String]) -> Result<Option<String>>;
}

/// Location lookups offered by the remote service
#[async_trait::async_trait]
pub trait LocationApi: Send + Sync {
    /// Location records for the given zip codes
    async fn locations(&self, zip_codes: &[String]) -> Result<Vec<Location>>;

    /// Search locations by city, state or bounding box
    async fn search_locations(&self, params: &LocationSearchParams)
    -> Result<LocationSearchResult>;
}
