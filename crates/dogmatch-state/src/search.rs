//! Search, filter and pagination controller
//!
//! The controller owns the search criteria and page state, derives the
//! outbound query from them, and reconciles the response into the page of
//! dogs to display.
//!
//! State machine: `Idle -> Loading -> {Loaded | Errored}`, re-entering
//! `Loading` on every refresh. Refreshes are not cancelled; instead every
//! refresh takes a sequence number and only the most recently issued one may
//! write the displayed state. A late response from an older refresh is
//! discarded (`RefreshOutcome::Superseded`).

use dogmatch_core::{
    Dog, DogApi, Error, PageState, SearchCriteria, SearchFilters, SearchResult,
};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

pub const FETCH_FAILED: &str = "Failed to fetch dogs. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Idle,
    Loading,
    Loaded,
    /// Holds the user-facing error message
    Errored(String),
}

/// Result of a single `refresh`
#[derive(Debug)]
pub enum RefreshOutcome {
    /// The displayed page was replaced
    Loaded { shown: usize, total: u64 },
    /// The refresh failed; the displayed list was cleared
    Failed(Error),
    /// A newer refresh was issued while this one was in flight
    Superseded,
}

/// Result of a page change request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageChange {
    /// Page moved; a refresh is due
    Changed,
    /// Already on that page
    Unchanged,
    /// Outside `[1, max(total_pages, 1)]`; state untouched
    Rejected,
}

/// Point-in-time copy of the controller state for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSnapshot {
    pub criteria: SearchCriteria,
    pub page: PageState,
    pub status: SearchStatus,
    pub dogs: Vec<Dog>,
    /// Total matches reported by the last applied search, if any
    pub total: Option<u64>,
}

impl SearchSnapshot {
    /// "N dogs found" wording, singular for exactly one
    pub fn summary(&self) -> Option<String> {
        self.total.map(|total| {
            let noun = if total == 1 { "dog" } else { "dogs" };
            format!("{} {} found", total, noun)
        })
    }
}

struct ControllerState {
    criteria: SearchCriteria,
    page: PageState,
    status: SearchStatus,
    dogs: Vec<Dog>,
    total: Option<u64>,
    /// Sequence number of the most recently issued refresh
    latest_request: u64,
}

impl ControllerState {
    fn fresh(page_size: NonZeroU32) -> Self {
        Self {
            criteria: SearchCriteria::with_page_size(page_size),
            page: PageState::new(),
            status: SearchStatus::Idle,
            dogs: Vec::new(),
            total: None,
            latest_request: 0,
        }
    }
}

pub struct SearchController {
    api: Arc<dyn DogApi>,
    page_size: NonZeroU32,
    state: Mutex<ControllerState>,
}

impl SearchController {
    pub fn new(api: Arc<dyn DogApi>, page_size: NonZeroU32) -> Self {
        Self {
            api,
            page_size,
            state: Mutex::new(ControllerState::fresh(page_size)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Back to default criteria on page 1 with nothing displayed
    ///
    /// Called on every entry into the search view. Any refresh still in
    /// flight is superseded.
    pub fn reset(&self) {
        let mut state = self.lock();
        let latest = state.latest_request;
        *state = ControllerState::fresh(self.page_size);
        state.latest_request = latest + 1;
    }

    /// Replace the filter fields and return to page 1
    ///
    /// Age bounds are not checked against each other.
    pub fn set_filters(&self, filters: SearchFilters) {
        let mut state = self.lock();
        state.criteria.apply(filters);
        state.page.reset();
    }

    /// Move to page `n` if it is within `[1, max(total_pages, 1)]`
    pub fn set_page(&self, n: u32) -> PageChange {
        let mut state = self.lock();
        if state.page.current_page() == n {
            return PageChange::Unchanged;
        }
        if state.page.set_page(n) {
            PageChange::Changed
        } else {
            debug!(
                "Ignoring page {} outside 1..={}",
                n,
                state.page.last_page()
            );
            PageChange::Rejected
        }
    }

    /// `set_filters` followed by the refresh it triggers
    pub async fn apply_filters(&self, filters: SearchFilters) -> RefreshOutcome {
        self.set_filters(filters);
        self.refresh().await
    }

    /// `set_page` followed by a refresh when the page actually changed
    pub async fn go_to_page(&self, n: u32) -> Option<RefreshOutcome> {
        match self.set_page(n) {
            PageChange::Changed => Some(self.refresh().await),
            PageChange::Unchanged | PageChange::Rejected => None,
        }
    }

    /// Query the remote service for the current criteria and page
    ///
    /// If the reported total no longer reaches the current page, the page is
    /// moved back to the last one and that page is queried instead, so the
    /// displayed dogs always belong to the displayed page.
    pub async fn refresh(&self) -> RefreshOutcome {
        loop {
            let (seq, query, page_size) = {
                let mut state = self.lock();
                state.latest_request += 1;
                state.status = SearchStatus::Loading;
                (
                    state.latest_request,
                    state.criteria.query_for_page(state.page.current_page()),
                    state.criteria.page_size,
                )
            };
            debug!(seq, size = query.size, from = ?query.from, sort = %query.sort, "Refreshing search");

            let result = match self.api.search(&query).await {
                Ok(result) => result,
                Err(e) => return self.fail(seq, e),
            };

            let SearchResult {
                result_ids, total, ..
            } = result;

            {
                let mut state = self.lock();
                if state.latest_request != seq {
                    debug!(seq, "Discarding superseded search response");
                    return RefreshOutcome::Superseded;
                }

                let clamped = state.page.update_total(total, page_size);
                state.total = Some(total);
                if clamped {
                    debug!(
                        seq,
                        page = state.page.current_page(),
                        "Total shrank below the current page, reloading"
                    );
                    continue;
                }

                if result_ids.is_empty() {
                    state.dogs.clear();
                    state.status = SearchStatus::Loaded;
                    return RefreshOutcome::Loaded { shown: 0, total };
                }
            }

            let dogs = match self.api.fetch_dogs(&result_ids).await {
                Ok(dogs) => dogs,
                Err(e) => return self.fail(seq, e),
            };

            let mut state = self.lock();
            if state.latest_request != seq {
                debug!(seq, "Discarding superseded hydrate response");
                return RefreshOutcome::Superseded;
            }

            state.dogs = order_by_ids(&result_ids, dogs);
            state.status = SearchStatus::Loaded;
            return RefreshOutcome::Loaded {
                shown: state.dogs.len(),
                total,
            };
        }
    }

    fn fail(&self, seq: u64, error: Error) -> RefreshOutcome {
        let mut state = self.lock();
        if state.latest_request != seq {
            debug!(seq, "Discarding superseded failure: {}", error);
            return RefreshOutcome::Superseded;
        }

        warn!("Error fetching dogs: {}", error);
        state.dogs.clear();
        state.status = SearchStatus::Errored(FETCH_FAILED.to_string());
        RefreshOutcome::Failed(error)
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        let state = self.lock();
        SearchSnapshot {
            criteria: state.criteria.clone(),
            page: state.page,
            status: state.status.clone(),
            dogs: state.dogs.clone(),
            total: state.total,
        }
    }

    pub fn dogs(&self) -> Vec<Dog> {
        self.lock().dogs.clone()
    }

    pub fn status(&self) -> SearchStatus {
        self.lock().status.clone()
    }

    pub fn page(&self) -> PageState {
        self.lock().page
    }

    pub fn criteria(&self) -> SearchCriteria {
        self.lock().criteria.clone()
    }
}

/// Arrange hydrated records in the order of `ids`
///
/// Records the service did not return are skipped.
fn order_by_ids(ids: &[String], dogs: Vec<Dog>) -> Vec<Dog> {
    let mut by_id: HashMap<String, Dog> = dogs.into_iter().map(|d| (d.id.clone(), d)).collect();
    let ordered: Vec<Dog> = ids.iter().filter_map(|id| by_id.remove(id)).collect();
    if ordered.len() < ids.len() {
        debug!(
            "Hydrate returned {} of {} requested dogs",
            ordered.len(),
            ids.len()
        );
    }
    ordered
}
