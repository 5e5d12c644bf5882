use crate::error::{FinderError, Result};
use crate::source::RestEventSource;
use crate::venues::{VenueDirectory, VenueLink};
use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_FAVORITES_DB: &str = "data/favorites.db";
/// Zone the listings are played in; "today" and date ranges are read in it.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Copenhagen;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub favorites: FavoritesConfig,
    /// IANA zone name, e.g. "Europe/Copenhagen"
    pub timezone: Option<String>,
    /// Extra or replacement venue links, keyed by venue name
    pub venues: HashMap<String, VenueLink>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub table: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            table: "events".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FavoritesConfig {
    pub db_path: PathBuf,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_FAVORITES_DB),
        }
    }
}

impl Config {
    /// Read `path` (missing file means defaults), then apply `.env` and
    /// process environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|e| {
                FinderError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            Self::from_toml_str(&contents)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        dotenv::dotenv().ok();
        config.apply_overrides(|key| std::env::var(key).ok());
        info!(
            "Configuration loaded (source configured: {}, favorites db: {})",
            config.source.base_url.is_some(),
            config.favorites.db_path.display()
        );
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Overlay `SUPABASE_URL`, `SUPABASE_ANON_KEY`, `CONCERT_FINDER_DB` and
    /// `CONCERT_FINDER_TZ`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SUPABASE_URL") {
            self.source.base_url = Some(url);
        }
        if let Some(key) = lookup("SUPABASE_ANON_KEY") {
            self.source.api_key = Some(key);
        }
        if let Some(db) = lookup("CONCERT_FINDER_DB") {
            self.favorites.db_path = PathBuf::from(db);
        }
        if let Some(tz) = lookup("CONCERT_FINDER_TZ") {
            self.timezone = Some(tz);
        }
    }

    pub fn timezone(&self) -> Result<Tz> {
        match self.timezone.as_deref() {
            None => Ok(DEFAULT_TIMEZONE),
            Some(name) => name
                .parse()
                .map_err(|e| FinderError::Config(format!("Unknown timezone '{}': {}", name, e))),
        }
    }

    pub fn rest_source(&self) -> Result<RestEventSource> {
        let base_url = self
            .source
            .base_url
            .as_deref()
            .ok_or_else(|| FinderError::Config("SUPABASE_URL is not set".to_string()))?;
        let api_key = self
            .source
            .api_key
            .as_deref()
            .ok_or_else(|| FinderError::Config("SUPABASE_ANON_KEY is not set".to_string()))?;
        Ok(RestEventSource::new(base_url, api_key).with_table(self.source.table.clone()))
    }

    pub fn venue_directory(&self) -> VenueDirectory {
        VenueDirectory::with_overrides(self.venues.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml_str(
            r#"
            timezone = "America/New_York"

            [source]
            base_url = "https://abc.supabase.co"
            api_key = "anon"
            table = "shows"

            [favorites]
            db_path = "/tmp/favs.db"

            [venues."Ideal Bar"]
            url = "https://vega.dk/ideal-bar"

            [venues."VEGA"]
            open_externally = true
            "#,
        )
        .unwrap();

        assert_eq!(config.source.table, "shows");
        assert_eq!(config.favorites.db_path, PathBuf::from("/tmp/favs.db"));
        assert_eq!(config.timezone().unwrap(), chrono_tz::America::New_York);
        assert_eq!(
            config.rest_source().unwrap().endpoint(),
            "https://abc.supabase.co/rest/v1/shows"
        );

        let directory = config.venue_directory();
        assert_eq!(directory.url_for("Ideal Bar"), Some("https://vega.dk/ideal-bar"));
        assert!(directory.opens_externally("VEGA"));
        assert_eq!(directory.url_for("VEGA"), None);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.source.table, "events");
        assert_eq!(config.favorites.db_path, PathBuf::from(DEFAULT_FAVORITES_DB));
        assert_eq!(config.timezone().unwrap(), DEFAULT_TIMEZONE);
        assert!(matches!(config.rest_source(), Err(FinderError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            "SUPABASE_URL" => Some("https://env.supabase.co".to_string()),
            "SUPABASE_ANON_KEY" => Some("env-key".to_string()),
            "CONCERT_FINDER_DB" => Some("env.db".to_string()),
            "CONCERT_FINDER_TZ" => Some("UTC".to_string()),
            _ => None,
        });
        assert_eq!(config.source.base_url.as_deref(), Some("https://env.supabase.co"));
        assert_eq!(config.favorites.db_path, PathBuf::from("env.db"));
        assert_eq!(config.timezone().unwrap(), Tz::UTC);
        assert!(config.rest_source().is_ok());
    }

    #[test]
    fn test_unknown_timezone_is_a_config_error() {
        let config = Config::from_toml_str(r#"timezone = "Mars/Olympus_Mons""#).unwrap();
        assert!(matches!(config.timezone(), Err(FinderError::Config(_))));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml_str("[source\nbase_url = 1"),
            Err(FinderError::Toml(_))
        ));
    }
}
