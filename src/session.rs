use crate::error::Result;
use crate::favorites::{FavoritesSet, FavoritesStore};
use crate::projection::{available_venues, clear_filters, has_active_filters, project, ProjectionSummary};
use crate::surprise::pick_random;
use crate::types::{EventRecord, FilterCriteria};
use rand::Rng;
use tracing::{debug, info};

/// State owned by one browsing session.
///
/// The event list is read-only once loaded; criteria are mutated in place by
/// user actions and favorites are written through to a [`FavoritesStore`].
#[derive(Debug, Clone)]
pub struct BrowseSession {
    events: Vec<EventRecord>,
    pub criteria: FilterCriteria,
    favorites: FavoritesSet,
}

impl BrowseSession {
    pub fn new(events: Vec<EventRecord>, favorites: FavoritesSet) -> Self {
        Self {
            events,
            criteria: FilterCriteria::default(),
            favorites,
        }
    }

    /// Start a session with favorites read from `store`.
    pub fn open(events: Vec<EventRecord>, store: &dyn FavoritesStore) -> Result<Self> {
        let favorites = FavoritesSet::load(store)?;
        info!(
            "Session opened with {} events and {} favorites",
            events.len(),
            favorites.len()
        );
        Ok(Self::new(events, favorites))
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn favorites(&self) -> &FavoritesSet {
        &self.favorites
    }

    /// Events to render for the current criteria
    pub fn visible(&self) -> Vec<EventRecord> {
        let shown = project(&self.events, &self.criteria, &self.favorites);
        debug!(summary = ?ProjectionSummary::new(&self.events, &shown), "projected events");
        shown
    }

    pub fn venues(&self) -> Vec<String> {
        available_venues(&self.events)
    }

    pub fn has_active_filters(&self) -> bool {
        has_active_filters(&self.criteria)
    }

    pub fn clear_filters(&mut self) {
        clear_filters(&mut self.criteria);
    }

    /// Flip `title` in the favorites set and persist the new set.
    /// Returns whether `title` is now a favorite. On a store error the
    /// session's favorites are left as they were.
    pub fn toggle_favorite(&mut self, title: &str, store: &dyn FavoritesStore) -> Result<bool> {
        let now_favorite = self.favorites.toggle_and_save(title, store)?;
        info!(title, now_favorite, "favorite toggled");
        Ok(now_favorite)
    }

    /// Random pick from the currently visible events.
    pub fn surprise<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<EventRecord> {
        let candidates = self.visible();
        pick_random(&candidates, rng).cloned()
    }

    /// Random pick from every loaded event, ignoring the criteria.
    pub fn surprise_any<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<EventRecord> {
        pick_random(&self.events, rng).cloned()
    }
}
