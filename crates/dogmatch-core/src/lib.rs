//! Dogmatch Core Types and Traits
//!
//! This crate provides the fundamental types and traits used throughout Dogmatch:
//! - Dog, session and match records as exchanged with the remote service
//! - Search criteria, query derivation and pagination math
//! - The `DogApi` port implemented by the remote client
//! - Core error types

pub mod api;
pub mod error;
pub mod search;
pub mod types;

pub use api::{DogApi, LocationApi};
pub use error::{Error, Result};
pub use search::{
    PageState, PageWindow, SearchCriteria, SearchFilters, SearchQuery, SearchResult, SortDirection,
    SortField, page_window, total_pages,
};
pub use types::{
    Coordinates, Dog, GeoBoundingBox, Location, LocationSearchParams, LocationSearchResult,
    MatchRecord, MatchResponse, Session,
};
