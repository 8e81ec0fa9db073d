//! Match generation and the match result view
//!
//! Generating a match sends the favorite ids to the service and leaves a
//! `matchResult` record for the match view. The view consumes that record and
//! hydrates the matched dog with the same batch-fetch call the search uses.

use crate::favorites::FavoritesStore;
use crate::routes::Route;
use dogmatch_core::{Dog, DogApi, Error, MatchRecord, Result};
use dogmatch_storage::{JsonStoreExt, KeyValueStore, keys};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const NO_MATCH_RESULT: &str = "No match result found";
pub const MATCH_DETAILS_MISSING: &str = "Could not find details for your matched dog";
pub const MATCH_DETAILS_FAILED: &str = "Failed to load match details. Please try again.";

#[derive(Debug)]
pub enum MatchOutcome {
    /// Favorites were empty; nothing was sent
    NoFavorites,
    /// The record was written; `match_id` is `None` when the service found no match
    Generated {
        match_id: Option<String>,
        navigate_to: Route,
    },
    Failed(Error),
}

/// What the match view should render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchViewState {
    Matched(Dog),
    /// The service answered without picking a dog
    NoMatch,
    NotFound(String),
    /// Hydrating the matched dog failed; the record is kept for a revisit
    Failed(String),
}

pub struct MatchFlow {
    api: Arc<dyn DogApi>,
    storage: Arc<dyn KeyValueStore>,
}

impl MatchFlow {
    pub fn new(api: Arc<dyn DogApi>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self { api, storage }
    }

    /// Ask the service for a match among the current favorites
    pub async fn generate(&self, favorites: &FavoritesStore) -> MatchOutcome {
        if favorites.is_empty() {
            debug!("No favorites, skipping match request");
            return MatchOutcome::NoFavorites;
        }

        let ids = favorites.ids();
        let match_id = match self.api.match_dogs(&ids).await {
            Ok(match_id) => match_id,
            Err(e) => {
                warn!("Error generating match: {}", e);
                return MatchOutcome::Failed(e);
            }
        };

        let record = MatchRecord {
            match_id: match_id.clone(),
            favorites: favorites.dogs().to_vec(),
        };
        if let Err(e) = self.storage.save_json(keys::MATCH_RESULT, &record) {
            warn!("Failed to store match result: {}", e);
            return MatchOutcome::Failed(e.into());
        }

        match &match_id {
            Some(id) => info!("Matched dog {} out of {} favorites", id, ids.len()),
            None => info!("No match among {} favorites", ids.len()),
        }

        MatchOutcome::Generated {
            match_id,
            navigate_to: Route::Match,
        }
    }

    /// The pending record, without consuming it
    pub fn pending(&self) -> Option<MatchRecord> {
        match self.storage.load_json::<MatchRecord>(keys::MATCH_RESULT) {
            Ok(record) => record,
            Err(e) => {
                warn!("Ignoring unreadable match result: {}", e);
                None
            }
        }
    }

    /// Resolve the match view from the pending record
    ///
    /// The record is consumed unless hydration fails.
    pub async fn load_view(&self) -> MatchViewState {
        let Some(record) = self.pending() else {
            self.discard();
            return MatchViewState::NotFound(NO_MATCH_RESULT.to_string());
        };

        let Some(match_id) = record.match_id else {
            self.discard();
            return MatchViewState::NoMatch;
        };

        match self.hydrate(&match_id).await {
            Ok(dog) => {
                self.discard();
                MatchViewState::Matched(dog)
            }
            Err(Error::NotFound(message)) => {
                self.discard();
                MatchViewState::NotFound(message)
            }
            Err(e) => {
                warn!("Error fetching matched dog {}: {}", match_id, e);
                MatchViewState::Failed(MATCH_DETAILS_FAILED.to_string())
            }
        }
    }

    async fn hydrate(&self, match_id: &str) -> Result<Dog> {
        let dogs = self.api.fetch_dogs(&[match_id.to_string()]).await?;
        dogs.into_iter()
            .find(|d| d.id == match_id)
            .ok_or_else(|| Error::NotFound(MATCH_DETAILS_MISSING.to_string()))
    }

    fn discard(&self) {
        if let Err(e) = self.storage.remove(keys::MATCH_RESULT) {
            warn!("Failed to clear match result: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeApi, Reply, dog};
    use dogmatch_storage::MemoryStore;

    struct Fixture {
        api: Arc<FakeApi>,
        storage: MemoryStore,
        flow: MatchFlow,
        favorites: FavoritesStore,
    }

    fn fixture() -> Fixture {
        let api = Arc::new(FakeApi::new());
        let storage = MemoryStore::new();
        let flow = MatchFlow::new(api.clone(), Arc::new(storage.clone()));
        let favorites = FavoritesStore::new(Arc::new(storage.clone()));
        Fixture {
            api,
            storage,
            flow,
            favorites,
        }
    }

    #[tokio::test]
    async fn test_empty_favorites_makes_no_call() {
        let f = fixture();

        let outcome = f.flow.generate(&f.favorites).await;
        assert!(matches!(outcome, MatchOutcome::NoFavorites));
        assert!(f.api.calls().is_empty());
        assert!(f.storage.get(keys::MATCH_RESULT).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_generate_writes_record_and_navigates() {
        let mut f = fixture();
        f.favorites.add(dog("d1")).unwrap();
        f.favorites.add(dog("d2")).unwrap();
        f.api.push_match(Reply::Ok(Some("d2".to_string())));

        let outcome = f.flow.generate(&f.favorites).await;
        match outcome {
            MatchOutcome::Generated {
                match_id,
                navigate_to,
            } => {
                assert_eq!(match_id.as_deref(), Some("d2"));
                assert_eq!(navigate_to, Route::Match);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        assert_eq!(
            f.api.calls(),
            vec![Call::Match(vec!["d1".to_string(), "d2".to_string()])]
        );
        let record = f.flow.pending().unwrap();
        assert_eq!(record.match_id.as_deref(), Some("d2"));
        assert_eq!(record.favorites, vec![dog("d1"), dog("d2")]);
    }

    #[tokio::test]
    async fn test_view_hydrates_and_consumes_record() {
        let mut f = fixture();
        f.favorites.add(dog("d1")).unwrap();
        f.api.push_match(Reply::Ok(Some("d1".to_string())));
        f.api.push_fetch(Reply::Ok(vec![dog("d1")]));
        f.flow.generate(&f.favorites).await;

        let view = f.flow.load_view().await;
        assert_eq!(view, MatchViewState::Matched(dog("d1")));
        assert_eq!(f.api.fetch_calls(), vec![vec!["d1".to_string()]]);
        assert!(f.flow.pending().is_none());

        // Second visit has nothing left to show
        let view = f.flow.load_view().await;
        assert_eq!(view, MatchViewState::NotFound(NO_MATCH_RESULT.to_string()));
    }

    #[tokio::test]
    async fn test_null_match_shows_no_match_state() {
        let mut f = fixture();
        f.favorites.add(dog("d1")).unwrap();
        f.favorites.add(dog("d2")).unwrap();
        f.api.push_match(Reply::Ok(None));

        let outcome = f.flow.generate(&f.favorites).await;
        assert!(matches!(
            outcome,
            MatchOutcome::Generated {
                match_id: None,
                navigate_to: Route::Match
            }
        ));

        let raw = f.storage.get(keys::MATCH_RESULT).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(json["matchId"].is_null());
        assert_eq!(json["favorites"].as_array().unwrap().len(), 2);

        assert_eq!(f.flow.load_view().await, MatchViewState::NoMatch);
        assert!(f.api.fetch_calls().is_empty());
        assert!(f.flow.pending().is_none());
    }

    #[tokio::test]
    async fn test_match_failure_writes_nothing() {
        let mut f = fixture();
        f.favorites.add(dog("d1")).unwrap();
        f.api.push_match(Reply::Fail("service unavailable"));

        let outcome = f.flow.generate(&f.favorites).await;
        assert!(matches!(outcome, MatchOutcome::Failed(ref e) if e.is_fetch()));
        assert!(f.flow.pending().is_none());
    }

    #[tokio::test]
    async fn test_missing_details_is_not_found() {
        let mut f = fixture();
        f.favorites.add(dog("d1")).unwrap();
        f.api.push_match(Reply::Ok(Some("d1".to_string())));
        f.api.push_fetch(Reply::Ok(Vec::new()));
        f.flow.generate(&f.favorites).await;

        let view = f.flow.load_view().await;
        assert_eq!(
            view,
            MatchViewState::NotFound(MATCH_DETAILS_MISSING.to_string())
        );
        assert!(f.flow.pending().is_none());
    }

    #[tokio::test]
    async fn test_hydrate_failure_keeps_record() {
        let mut f = fixture();
        f.favorites.add(dog("d1")).unwrap();
        f.api.push_match(Reply::Ok(Some("d1".to_string())));
        f.api.push_fetch(Reply::Fail("timeout"));
        f.api.push_fetch(Reply::Ok(vec![dog("d1")]));
        f.flow.generate(&f.favorites).await;

        let view = f.flow.load_view().await;
        assert_eq!(view, MatchViewState::Failed(MATCH_DETAILS_FAILED.to_string()));
        assert!(f.flow.pending().is_some());

        assert_eq!(f.flow.load_view().await, MatchViewState::Matched(dog("d1")));
    }

    #[tokio::test]
    async fn test_unreadable_record_is_not_found() {
        let f = fixture();
        f.storage.set(keys::MATCH_RESULT, "not json").unwrap();

        let view = f.flow.load_view().await;
        assert_eq!(view, MatchViewState::NotFound(NO_MATCH_RESULT.to_string()));
        assert!(f.storage.get(keys::MATCH_RESULT).unwrap().is_none());
    }
}
