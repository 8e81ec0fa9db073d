//! Search criteria, outbound query derivation and pagination math
//!
//! Page numbers are 1-based throughout. The remote service paginates by
//! offset (`from`) and page size (`size`); this module owns the arithmetic
//! between the two.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// Default number of dogs per page
pub const DEFAULT_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(12) {
    Some(size) => size,
    None => unreachable!(),
};

/// Maximum number of page buttons shown by the pagination window
pub const PAGE_WINDOW_SIZE: u32 = 5;

/// Field the search results are sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Breed,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Breed => "breed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// The opposite direction
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("invalid sort direction '{}', expected asc or desc", other)),
        }
    }
}

/// User-editable filter fields, as submitted by the filter form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Empty means no breed filter
    pub breeds: Vec<String>,

    /// Empty means no zip code filter
    pub zip_codes: Vec<String>,

    pub age_min: Option<u32>,

    pub age_max: Option<u32>,

    pub sort_direction: SortDirection,
}

/// Complete search criteria owned by the search controller
///
/// `age_min <= age_max` is deliberately not enforced: out-of-order values are
/// passed through to the remote service untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub breeds: Vec<String>,
    pub zip_codes: Vec<String>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub page_size: NonZeroU32,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl SearchCriteria {
    /// Unfiltered criteria sorted by breed ascending
    pub fn with_page_size(page_size: NonZeroU32) -> Self {
        Self {
            breeds: Vec::new(),
            zip_codes: Vec::new(),
            age_min: None,
            age_max: None,
            page_size,
            sort_field: SortField::Breed,
            sort_direction: SortDirection::Asc,
        }
    }

    /// Replace the user-editable fields, keeping page size and sort field
    pub fn apply(&mut self, filters: SearchFilters) {
        self.breeds = filters.breeds;
        self.zip_codes = filters.zip_codes;
        self.age_min = filters.age_min;
        self.age_max = filters.age_max;
        self.sort_direction = filters.sort_direction;
    }

    /// The user-editable fields of these criteria
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            breeds: self.breeds.clone(),
            zip_codes: self.zip_codes.clone(),
            age_min: self.age_min,
            age_max: self.age_max,
            sort_direction: self.sort_direction,
        }
    }

    /// Sort parameter in the service's `field:direction` form
    pub fn sort_param(&self) -> String {
        format!("{}:{}", self.sort_field.as_str(), self.sort_direction.as_str())
    }

    /// Offset of the first result on `page`; `None` for the first page
    pub fn offset_for_page(&self, page: u32) -> Option<u32> {
        if page <= 1 {
            None
        } else {
            Some((page - 1).saturating_mul(self.page_size.get()))
        }
    }

    /// Build the outbound search query for `page`
    pub fn query_for_page(&self, page: u32) -> SearchQuery {
        SearchQuery {
            breeds: self.breeds.clone(),
            zip_codes: self.zip_codes.clone(),
            age_min: self.age_min,
            age_max: self.age_max,
            size: self.page_size.get(),
            from: self.offset_for_page(page),
            sort: self.sort_param(),
        }
    }
}

/// Parameters of a single `GET /dogs/search` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub breeds: Vec<String>,
    pub zip_codes: Vec<String>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub size: u32,
    pub from: Option<u32>,
    pub sort: String,
}

impl SearchQuery {
    /// Encode as query-string pairs
    ///
    /// Sequences use the bracketed `name[]` form, one pair per element.
    /// Absent fields are omitted entirely.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        for breed in &self.breeds {
            pairs.push(("breeds[]".to_string(), breed.clone()));
        }
        for zip in &self.zip_codes {
            pairs.push(("zipCodes[]".to_string(), zip.clone()));
        }
        if let Some(age_min) = self.age_min {
            pairs.push(("ageMin".to_string(), age_min.to_string()));
        }
        if let Some(age_max) = self.age_max {
            pairs.push(("ageMax".to_string(), age_max.to_string()));
        }
        pairs.push(("size".to_string(), self.size.to_string()));
        if let Some(from) = self.from {
            pairs.push(("from".to_string(), from.to_string()));
        }
        pairs.push(("sort".to_string(), self.sort.clone()));

        pairs
    }
}

/// Body of the search call response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Dog ids in the requested sort order
    pub result_ids: Vec<String>,

    /// Authoritative count of all matches across pages
    pub total: u64,

    /// Cursor to the next page, if the service provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,

    /// Cursor to the previous page, if the service provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// Number of pages needed to show `total` results, `ceil(total / page_size)`
pub fn total_pages(total: u64, page_size: NonZeroU32) -> u32 {
    let pages = total.div_ceil(u64::from(page_size.get()));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Current page and page count
///
/// Invariant: `1 <= current_page <= max(total_pages, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current_page: u32,
    total_pages: u32,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}

impl PageState {
    pub fn new() -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Upper page bound; zero pages are clamped as one
    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }

    /// Whether `page` is a valid target for navigation
    pub fn accepts(&self, page: u32) -> bool {
        (1..=self.last_page()).contains(&page)
    }

    /// Move to `page` if it is in range
    ///
    /// Returns `false` and leaves the state unchanged when `page` is out of range.
    pub fn set_page(&mut self, page: u32) -> bool {
        if !self.accepts(page) {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Back to the first page
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Recompute the page count from an authoritative total
    ///
    /// Returns `true` when the current page no longer exists and was moved
    /// back to the last page; results fetched for the old page are then stale.
    pub fn update_total(&mut self, total: u64, page_size: NonZeroU32) -> bool {
        self.total_pages = total_pages(total, page_size);
        if self.current_page > self.last_page() {
            self.current_page = self.last_page();
            return true;
        }
        false
    }
}

/// Page buttons to render around the current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// Consecutive page numbers, at most `PAGE_WINDOW_SIZE` of them
    pub pages: Vec<u32>,

    /// Show a separate button for page 1 before the window
    pub show_first: bool,

    /// Show an ellipsis between page 1 and the window
    pub leading_ellipsis: bool,

    /// Show an ellipsis between the window and the last page
    pub trailing_ellipsis: bool,

    /// Show a separate button for the last page after the window
    pub show_last: bool,

    pub has_prev: bool,

    pub has_next: bool,
}

/// Compute the pagination window for `current` out of `total_pages`
pub fn page_window(current: u32, total_pages: u32) -> PageWindow {
    let pages: Vec<u32> = if total_pages <= PAGE_WINDOW_SIZE {
        (1..=total_pages).collect()
    } else {
        let mut start = current.saturating_sub(2).max(1);
        let end = total_pages.min(start + PAGE_WINDOW_SIZE - 1);
        if end - start < PAGE_WINDOW_SIZE - 1 {
            start = (end + 1).saturating_sub(PAGE_WINDOW_SIZE).max(1);
        }
        (start..=end).collect()
    };

    let first = pages.first().copied().unwrap_or(1);
    let last = pages.last().copied().unwrap_or(total_pages);

    PageWindow {
        show_first: first > 1,
        leading_ellipsis: first > 2,
        trailing_ellipsis: last + 1 < total_pages,
        show_last: last < total_pages,
        has_prev: current > 1,
        has_next: current < total_pages,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(0, size(12)), 0);
        assert_eq!(total_pages(1, size(12)), 1);
        assert_eq!(total_pages(12, size(12)), 1);
        assert_eq!(total_pages(13, size(12)), 2);
        assert_eq!(total_pages(25, size(12)), 3);
        assert_eq!(total_pages(10_000, size(1)), 10_000);
    }

    #[test]
    fn test_total_pages_saturates() {
        assert_eq!(total_pages(u64::MAX, size(1)), u32::MAX);
    }

    #[test]
    fn test_page_state_rejects_out_of_range() {
        let mut state = PageState::new();
        state.update_total(25, size(12));
        assert_eq!(state.total_pages(), 3);

        assert!(!state.set_page(4));
        assert_eq!(state.current_page(), 1);
        assert!(!state.set_page(0));
        assert_eq!(state.current_page(), 1);

        assert!(state.set_page(3));
        assert_eq!(state.current_page(), 3);
        assert!(!state.set_page(4));
        assert_eq!(state.current_page(), 3);
    }

    #[test]
    fn test_zero_pages_clamped_as_one() {
        let mut state = PageState::new();
        state.update_total(0, size(12));
        assert_eq!(state.total_pages(), 0);
        assert_eq!(state.last_page(), 1);
        assert!(state.accepts(1));
        assert!(!state.accepts(2));
    }

    #[test]
    fn test_shrinking_total_clamps_current_page() {
        let mut state = PageState::new();
        assert!(!state.update_total(100, size(10)));
        assert!(state.set_page(9));
        assert!(state.update_total(30, size(10)));
        assert_eq!(state.current_page(), 3);
        assert!(!state.update_total(30, size(10)));
    }

    #[test]
    fn test_query_for_first_page_omits_from() {
        let criteria = SearchCriteria::default();
        let query = criteria.query_for_page(1);
        assert_eq!(query.from, None);
        assert_eq!(query.size, 12);
        assert_eq!(query.sort, "breed:asc");

        let pairs = query.to_query_pairs();
        assert!(!pairs.iter().any(|(k, _)| k == "from"));
        assert!(!pairs.iter().any(|(k, _)| k == "breeds[]"));
    }

    #[test]
    fn test_query_for_later_page() {
        let mut criteria = SearchCriteria::default();
        criteria.apply(SearchFilters {
            breeds: vec!["Beagle".into(), "Boxer".into()],
            zip_codes: vec![],
            age_min: Some(9),
            age_max: Some(2),
            sort_direction: SortDirection::Desc,
        });

        let query = criteria.query_for_page(3);
        assert_eq!(query.from, Some(24));
        assert_eq!(query.sort, "breed:desc");
        // Out-of-order ages pass through untouched
        assert_eq!(query.age_min, Some(9));
        assert_eq!(query.age_max, Some(2));

        let pairs = query.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("breeds[]".to_string(), "Beagle".to_string()),
                ("breeds[]".to_string(), "Boxer".to_string()),
                ("ageMin".to_string(), "9".to_string()),
                ("ageMax".to_string(), "2".to_string()),
                ("size".to_string(), "12".to_string()),
                ("from".to_string(), "24".to_string()),
                ("sort".to_string(), "breed:desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_apply_keeps_page_size() {
        let mut criteria = SearchCriteria::with_page_size(size(25));
        criteria.apply(SearchFilters::default());
        assert_eq!(criteria.page_size.get(), 25);
        assert_eq!(criteria.filters(), SearchFilters::default());
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("sideways".parse::<SortDirection>().is_err());
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
    }

    #[test]
    fn test_search_result_wire_format() {
        let result: SearchResult = serde_json::from_str(
            r#"{"resultIds":["d1","d2"],"total":25,"next":"/dogs/search?size=12&from=12"}"#,
        )
        .unwrap();
        assert_eq!(result.result_ids, vec!["d1", "d2"]);
        assert_eq!(result.total, 25);
        assert!(result.next.is_some());
        assert!(result.prev.is_none());
    }

    #[test]
    fn test_page_window_small_total() {
        let window = page_window(2, 3);
        assert_eq!(window.pages, vec![1, 2, 3]);
        assert!(!window.show_first);
        assert!(!window.show_last);
        assert!(window.has_prev);
        assert!(window.has_next);
    }

    #[test]
    fn test_page_window_middle() {
        let window = page_window(10, 20);
        assert_eq!(window.pages, vec![8, 9, 10, 11, 12]);
        assert!(window.show_first);
        assert!(window.leading_ellipsis);
        assert!(window.trailing_ellipsis);
        assert!(window.show_last);
    }

    #[test]
    fn test_page_window_edges() {
        let window = page_window(1, 20);
        assert_eq!(window.pages, vec![1, 2, 3, 4, 5]);
        assert!(!window.show_first);
        assert!(!window.has_prev);

        let window = page_window(20, 20);
        assert_eq!(window.pages, vec![16, 17, 18, 19, 20]);
        assert!(window.show_first);
        assert!(!window.show_last);
        assert!(!window.has_next);

        // Window starts at 2: first button shown, no ellipsis
        let window = page_window(4, 8);
        assert_eq!(window.pages, vec![2, 3, 4, 5, 6]);
        assert!(window.show_first);
        assert!(!window.leading_ellipsis);
        assert!(window.trailing_ellipsis);
    }
}
