pub mod comparator;
pub mod config;
pub mod error;
pub mod favorites;
pub mod ingest;
pub mod logging;
pub mod predicate;
pub mod projection;
pub mod session;
pub mod source;
pub mod surprise;
pub mod types;
pub mod venues;

pub use error::{FinderError, Result};
pub use favorites::{FavoritesSet, FavoritesStore, FAVORITES_STORAGE_KEY};
pub use predicate::matches;
pub use projection::{available_venues, clear_filters, has_active_filters, project};
pub use session::BrowseSession;
pub use surprise::pick_random;
pub use types::{DatePreset, DateRange, EventRecord, FilterCriteria, SortKey, SortOrder};
