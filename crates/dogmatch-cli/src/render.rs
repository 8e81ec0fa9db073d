//! Plain-text rendering of store state

use dogmatch_core::{Dog, Location, PageWindow, page_window};
use dogmatch_state::{FavoritesStore, MatchViewState, SearchSnapshot, SearchStatus};
use std::fmt::Write;

pub fn dog_line(dog: &Dog, favorite: bool) -> String {
    format!(
        "{} {:<22} {:<20} {:<28} age {:>2}  zip {}",
        if favorite { "*" } else { " " },
        dog.id,
        dog.name,
        dog.breed,
        dog.age,
        dog.zip_code
    )
}

/// Page buttons as `< 1 ... 4 [5] 6 ... 20 >`
pub fn pagination(window: &PageWindow, current: u32, total_pages: u32) -> String {
    let mut parts: Vec<String> = Vec::new();
    parts.push(if window.has_prev { "<" } else { " " }.to_string());

    if window.show_first {
        parts.push("1".to_string());
    }
    if window.leading_ellipsis {
        parts.push("...".to_string());
    }
    for page in &window.pages {
        if *page == current {
            parts.push(format!("[{}]", page));
        } else {
            parts.push(page.to_string());
        }
    }
    if window.trailing_ellipsis {
        parts.push("...".to_string());
    }
    if window.show_last {
        parts.push(total_pages.to_string());
    }

    parts.push(if window.has_next { ">" } else { " " }.to_string());
    parts.join(" ").trim().to_string()
}

pub fn search_page(snapshot: &SearchSnapshot, favorites: &FavoritesStore) -> String {
    let mut out = String::new();

    if let SearchStatus::Errored(message) = &snapshot.status {
        let _ = writeln!(out, "Error: {}", message);
        return out;
    }

    if let Some(summary) = snapshot.summary() {
        let _ = writeln!(out, "{}", summary);
    }

    if snapshot.dogs.is_empty() {
        let _ = writeln!(out, "No dogs found matching your criteria.");
        return out;
    }

    for dog in &snapshot.dogs {
        let _ = writeln!(out, "{}", dog_line(dog, favorites.is_favorite(&dog.id)));
    }

    let current = snapshot.page.current_page();
    let total_pages = snapshot.page.total_pages();
    if total_pages > 1 {
        let window = page_window(current, total_pages);
        let _ = writeln!(out, "\n{}", pagination(&window, current, total_pages));
    }

    out
}

pub fn favorites(favorites: &FavoritesStore) -> String {
    if favorites.is_empty() {
        return "No favorites yet.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Favorites ({})", favorites.len());
    for dog in favorites.dogs() {
        let _ = writeln!(out, "{}", dog_line(dog, true));
    }
    out
}

pub fn match_view(state: &MatchViewState) -> String {
    match state {
        MatchViewState::Matched(dog) => format!(
            "It's a match! Meet {}\n  breed: {}\n  age:   {}\n  zip:   {}\n  photo: {}\n",
            dog.name, dog.breed, dog.age, dog.zip_code, dog.img
        ),
        MatchViewState::NoMatch => {
            "No match found among your favorites. Try adding more dogs.\n".to_string()
        }
        MatchViewState::NotFound(message) | MatchViewState::Failed(message) => {
            format!("{}\n", message)
        }
    }
}

pub fn location_line(location: &Location) -> String {
    format!(
        "{}  {}, {} ({} county)  {:.4},{:.4}",
        location.zip_code,
        location.city,
        location.state,
        location.county,
        location.latitude,
        location.longitude
    )
}
