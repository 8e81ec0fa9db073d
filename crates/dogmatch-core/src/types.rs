//! Records exchanged with the remote service and kept in local storage

use serde::{Deserialize, Serialize};

/// An adoptable dog as returned by the batch-fetch call
///
/// Immutable once fetched; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dog {
    pub id: String,

    /// Image reference (URL)
    pub img: String,

    pub name: String,

    pub age: u32,

    pub zip_code: String,

    pub breed: String,
}

/// Local record that a login succeeded
///
/// The real authority is an opaque server-side cookie; this record is only
/// what the client remembers about the login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub name: String,
    pub email: String,
    pub is_logged_in: bool,
}

impl Session {
    /// Create a logged-in session for the given identity
    pub fn logged_in(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            is_logged_in: true,
        }
    }
}

/// Body of the match call response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(rename = "match", default)]
    pub matched: Option<String>,
}

/// Transient record handed from the favorites flow to the match view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    #[serde(default)]
    pub match_id: Option<String>,

    /// Favorites snapshot at the time the match was generated
    #[serde(default)]
    pub favorites: Vec<Dog>,
}

/// A US location as returned by the location endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub zip_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub state: String,
    pub county: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Bounding box for a location search
///
/// Either the edge form (`top`/`left`/`bottom`/`right`) or the corner form
/// (`bottom_left`/`top_right`) is expected; the service decides which is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoBoundingBox {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_left: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_right: Option<Coordinates>,
}

/// Body of `POST /locations/search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Two-letter state abbreviations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_bounding_box: Option<GeoBoundingBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationSearchResult {
    pub results: Vec<Location>,
    pub total: u64,
}
