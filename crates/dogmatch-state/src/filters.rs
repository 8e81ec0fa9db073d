//! Editable filter form state

use dogmatch_core::{Error, Result, SearchCriteria, SearchFilters, SortDirection};

/// Parse an age field as typed by the user
///
/// Blank text means no bound.
pub fn parse_age_input(text: &str) -> Result<Option<u32>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| Error::InvalidInput(format!("'{}' is not a valid age", trimmed)))
}

/// Filter values being edited, not yet applied to the search
///
/// Nothing here triggers a search except `toggle_sort`, which hands back the
/// filters to apply right away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDraft {
    breeds: Vec<String>,
    zip_codes: Vec<String>,
    age_min: Option<u32>,
    age_max: Option<u32>,
    sort_direction: SortDirection,
}

impl FilterDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the criteria currently applied to the search
    pub fn from_criteria(criteria: &SearchCriteria) -> Self {
        Self::from(criteria.filters())
    }

    /// Selected breeds in selection order
    pub fn breeds(&self) -> &[String] {
        &self.breeds
    }

    pub fn is_selected(&self, breed: &str) -> bool {
        self.breeds.iter().any(|b| b == breed)
    }

    /// Select `breed`, or deselect it if already selected
    pub fn toggle_breed(&mut self, breed: &str) {
        if let Some(index) = self.breeds.iter().position(|b| b == breed) {
            self.breeds.remove(index);
        } else {
            self.breeds.push(breed.to_string());
        }
    }

    /// Select `breed` unless it is already selected; returns whether it was added
    pub fn select_breed(&mut self, breed: &str) -> bool {
        if self.is_selected(breed) {
            return false;
        }
        self.breeds.push(breed.to_string());
        true
    }

    pub fn clear_breeds(&mut self) {
        self.breeds.clear();
    }

    /// Label for the breed picker button
    pub fn breed_label(&self) -> String {
        match self.breeds.len() {
            0 => "Select breeds".to_string(),
            1 => "1 breed selected".to_string(),
            n => format!("{} breeds selected", n),
        }
    }

    pub fn set_zip_codes(&mut self, zip_codes: Vec<String>) {
        self.zip_codes = zip_codes;
    }

    pub fn age_min(&self) -> Option<u32> {
        self.age_min
    }

    pub fn age_max(&self) -> Option<u32> {
        self.age_max
    }

    /// # Errors
    /// - `Error::InvalidInput` if `text` is not a whole number; the draft is unchanged
    pub fn set_age_min(&mut self, text: &str) -> Result<()> {
        self.age_min = parse_age_input(text)?;
        Ok(())
    }

    /// # Errors
    /// - `Error::InvalidInput` if `text` is not a whole number; the draft is unchanged
    pub fn set_age_max(&mut self, text: &str) -> Result<()> {
        self.age_max = parse_age_input(text)?;
        Ok(())
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Flip the sort direction and return the filters to apply immediately
    pub fn toggle_sort(&mut self) -> SearchFilters {
        self.sort_direction = self.sort_direction.toggled();
        self.to_filters()
    }

    pub fn to_filters(&self) -> SearchFilters {
        SearchFilters {
            breeds: self.breeds.clone(),
            zip_codes: self.zip_codes.clone(),
            age_min: self.age_min,
            age_max: self.age_max,
            sort_direction: self.sort_direction,
        }
    }
}

impl From<SearchFilters> for FilterDraft {
    fn from(filters: SearchFilters) -> Self {
        Self {
            breeds: filters.breeds,
            zip_codes: filters.zip_codes,
            age_min: filters.age_min,
            age_max: filters.age_max,
            sort_direction: filters.sort_direction,
        }
    }
}
