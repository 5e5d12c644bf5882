use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

/// How to send a user to a venue's own page.
///
/// `open_externally` marks venues whose pages refuse to load embedded, so the
/// presentation layer must open them in a new window instead.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct VenueLink {
    pub url: Option<String>,
    pub open_externally: bool,
}

const DEFAULT_VENUES: [(&str, Option<&str>, bool); 12] = [
    ("VEGA", Some("https://vega.dk/en"), false),
    ("DR Koncerthuset", Some("https://www.drkoncerthuset.dk/en"), false),
    (
        "Royal Arena",
        Some("https://www.ticketmaster.dk/venue/royal-arena-copenhagen-billetter/royalarena/226"),
        true,
    ),
    (
        "Rust",
        Some("https://www.ticketmaster.dk/venue/rust-copenhagen-billetter/rust_cph/1164"),
        true,
    ),
    ("Pumpehuset", Some("https://pumpehuset.dk/en"), false),
    ("Den Grå Hal", Some("https://www.christiania.org/den-graa-hal"), false),
    ("Amager Bio", Some("https://amagerbio.dk/en"), false),
    ("Hotel Cecil", Some("https://hotelcecil.dk/en"), false),
    ("Loppen", Some("https://loppen.dk/en"), false),
    ("Bremen Teater", Some("https://brementeater.dk/en"), false),
    ("Råhuset", None, true),
    ("Basement", None, true),
];

static DEFAULT_DIRECTORY: Lazy<HashMap<String, VenueLink>> = Lazy::new(|| {
    DEFAULT_VENUES
        .iter()
        .map(|(name, url, open_externally)| {
            (
                name.to_string(),
                VenueLink {
                    url: url.map(str::to_string),
                    open_externally: *open_externally,
                },
            )
        })
        .collect()
});

/// Static reference data: venue name to its link policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueDirectory {
    entries: HashMap<String, VenueLink>,
}

impl Default for VenueDirectory {
    fn default() -> Self {
        Self {
            entries: (*DEFAULT_DIRECTORY).clone(),
        }
    }
}

impl VenueDirectory {
    /// Default table with `overrides` layered on top (replacing whole entries).
    pub fn with_overrides(overrides: HashMap<String, VenueLink>) -> Self {
        let mut directory = Self::default();
        directory.entries.extend(overrides);
        directory
    }

    pub fn lookup(&self, venue: &str) -> Option<&VenueLink> {
        self.entries.get(venue)
    }

    pub fn url_for(&self, venue: &str) -> Option<&str> {
        self.lookup(venue).and_then(|link| link.url.as_deref())
    }

    pub fn opens_externally(&self, venue: &str) -> bool {
        self.lookup(venue).map_or(false, |link| link.open_externally)
    }
}
