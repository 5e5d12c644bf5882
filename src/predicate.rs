use crate::favorites::FavoritesSet;
use crate::types::{DateRange, EventRecord, FilterCriteria};
use std::collections::BTreeSet;

/// True when `event` satisfies every active criterion.
///
/// Each rule is vacuously true when its criterion is unset, so the default
/// [`FilterCriteria`] matches every event.
pub fn matches(event: &EventRecord, criteria: &FilterCriteria, favorites: &FavoritesSet) -> bool {
    matches_query(event, &criteria.search_query)
        && matches_venue(event, &criteria.selected_venues)
        && matches_date_range(event, criteria.date_range.as_ref())
        && matches_favorites(event, criteria.favorites_only, favorites)
}

/// Case-insensitive substring search over title, venue, raw date text and location.
pub fn matches_query(event: &EventRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    [
        Some(event.title.as_str()),
        Some(event.venue.as_str()),
        Some(event.date.as_str()),
        event.location.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle))
}

pub fn matches_venue(event: &EventRecord, selected: &BTreeSet<String>) -> bool {
    selected.is_empty() || selected.contains(&event.venue)
}

pub fn matches_date_range(event: &EventRecord, range: Option<&DateRange>) -> bool {
    range.map_or(true, |r| r.contains(event.starts_at))
}

pub fn matches_favorites(event: &EventRecord, favorites_only: bool, favorites: &FavoritesSet) -> bool {
    !favorites_only || favorites.contains(&event.title)
}
