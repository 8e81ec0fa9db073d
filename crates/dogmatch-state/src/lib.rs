//! Dogmatch client-side state
//!
//! Plain store objects driving the application, constructed explicitly and
//! handed to whatever front end composes them:
//! - `SessionStore`: login state, persisted under `user`
//! - `FavoritesStore`: chosen dogs, persisted under `favorites`
//! - `SearchController`: filters, paging and the displayed page of dogs
//! - `FilterDraft` and `BreedCatalog`: the editable filter form
//! - `MatchFlow`: match generation and the match result view
//! - `Route`: view routing with the authentication guard
//!
//! Network failures never escape a store operation as `Err`; they become the
//! store's error state.
//!
//! Storage write failures follow one policy across stores: the in-memory
//! change is not kept and the `StorageError` is returned to the caller. This
//! covers favorites mutations and persisting a new login. Logout is the one
//! exception on the memory side, since the session is cleared locally even
//! when the persisted copy cannot be removed; the error is still returned.
//! Removing a consumed match record is cleanup and is only logged.

pub mod breeds;
pub mod favorites;
pub mod filters;
pub mod matching;
pub mod routes;
pub mod search;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use breeds::BreedCatalog;
pub use favorites::FavoritesStore;
pub use filters::{FilterDraft, parse_age_input};
pub use matching::{MatchFlow, MatchOutcome, MatchViewState};
pub use routes::{Route, resolve_route};
pub use search::{PageChange, RefreshOutcome, SearchController, SearchSnapshot, SearchStatus};
pub use session::SessionStore;
