//! Breed list backing the breed filter

use dogmatch_core::DogApi;
use tracing::{debug, warn};

pub const BREEDS_FAILED: &str = "Failed to load dog breeds";

/// Breed names loaded once from the remote service
#[derive(Debug, Default)]
pub struct BreedCatalog {
    breeds: Vec<String>,
    loaded: bool,
    error: Option<String>,
}

impl BreedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the breed list unless it is already loaded
    ///
    /// A failure leaves the list empty and sets the error message; calling
    /// `load` again retries.
    pub async fn load(&mut self, api: &dyn DogApi) {
        if self.loaded {
            return;
        }

        match api.breeds().await {
            Ok(breeds) => {
                debug!("Loaded {} breeds", breeds.len());
                self.breeds = breeds;
                self.loaded = true;
                self.error = None;
            }
            Err(e) => {
                warn!("Error fetching breeds: {}", e);
                self.breeds.clear();
                self.error = Some(BREEDS_FAILED.to_string());
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn breeds(&self) -> &[String] {
        &self.breeds
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Breeds containing `term`, ignoring case; a blank term matches all
    pub fn matching(&self, term: &str) -> Vec<&str> {
        let needle = term.trim().to_lowercase();
        self.breeds
            .iter()
            .filter(|b| needle.is_empty() || b.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }
}
