use crate::comparator::{collate, compare};
use crate::favorites::FavoritesSet;
use crate::predicate::matches;
use crate::types::{EventRecord, FilterCriteria};

/// Filtered and ordered view of `events` for the given criteria.
///
/// Survivors keep their input order before sorting, and `sort_by` is stable,
/// so events equal under the active key stay in input order.
pub fn project(
    events: &[EventRecord],
    criteria: &FilterCriteria,
    favorites: &FavoritesSet,
) -> Vec<EventRecord> {
    let mut shown: Vec<EventRecord> = events
        .iter()
        .filter(|e| matches(e, criteria, favorites))
        .cloned()
        .collect();
    shown.sort_by(|a, b| compare(a, b, criteria.sort_by, criteria.sort_order));
    shown
}

/// Distinct venues of the unfiltered list, in dictionary order
pub fn available_venues(events: &[EventRecord]) -> Vec<String> {
    let mut venues: Vec<String> = events.iter().map(|e| e.venue.clone()).collect();
    venues.sort_by(|a, b| collate(a, b));
    venues.dedup();
    venues
}

pub fn has_active_filters(criteria: &FilterCriteria) -> bool {
    !criteria.is_default()
}

pub fn clear_filters(criteria: &mut FilterCriteria) {
    criteria.clear();
}

/// Counts logged after each projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionSummary {
    pub total: usize,
    pub shown: usize,
    pub venues: usize,
}

impl ProjectionSummary {
    pub fn new(events: &[EventRecord], shown: &[EventRecord]) -> Self {
        Self {
            total: events.len(),
            shown: shown.len(),
            venues: available_venues(events).len(),
        }
    }
}
