use crate::error::Result;
use rusqlite::{params, Connection};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Key the favorites set is stored under
pub const FAVORITES_STORAGE_KEY: &str = "favorites";

/// Titles the user has marked as favorite.
///
/// Events are identified by title alone, so two listings that share a name
/// (a touring revival, say) are favorited together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    titles: BTreeSet<String>,
}

impl FavoritesSet {
    pub fn new(titles: BTreeSet<String>) -> Self {
        Self { titles }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    /// Add `title` if absent, remove it if present. Returns whether it is now a favorite.
    pub fn toggle(&mut self, title: &str) -> bool {
        if self.titles.remove(title) {
            false
        } else {
            self.titles.insert(title.to_string());
            true
        }
    }

    /// Toggle `title` and persist the result. The in-memory set only changes
    /// once the store has accepted the write.
    pub fn toggle_and_save(&mut self, title: &str, store: &dyn FavoritesStore) -> Result<bool> {
        let mut next = self.clone();
        let now_favorite = next.toggle(title);
        next.save(store)?;
        *self = next;
        Ok(now_favorite)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn titles(&self) -> &BTreeSet<String> {
        &self.titles
    }

    pub fn load(store: &dyn FavoritesStore) -> Result<Self> {
        Ok(Self::new(store.get(FAVORITES_STORAGE_KEY)?))
    }

    pub fn save(&self, store: &dyn FavoritesStore) -> Result<()> {
        store.set(FAVORITES_STORAGE_KEY, &self.titles)
    }
}

impl FromIterator<String> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Key-addressed persistent store of string sets. Writes are last-write-wins.
pub trait FavoritesStore {
    /// Stored set for `key`; an unknown key reads as empty.
    fn get(&self, key: &str) -> Result<BTreeSet<String>>;

    fn set(&self, key: &str, value: &BTreeSet<String>) -> Result<()>;
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct InMemoryFavoritesStore {
    entries: Mutex<HashMap<String, BTreeSet<String>>>,
}

impl InMemoryFavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FavoritesStore for InMemoryFavoritesStore {
    fn get(&self, key: &str) -> Result<BTreeSet<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned().unwrap_or_default())
    }

    fn set(&self, key: &str, value: &BTreeSet<String>) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.clone());
        Ok(())
    }
}

/// SQLite-backed store; each key holds its set as a JSON array.
pub struct SqliteFavoritesStore {
    conn: Connection,
}

impl SqliteFavoritesStore {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        debug!("Opening favorites store at {}", db_path.display());
        Self::init(Connection::open(db_path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key    TEXT PRIMARY KEY,
                value  TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self { conn })
    }
}

impl FavoritesStore for SqliteFavoritesStore {
    fn get(&self, key: &str) -> Result<BTreeSet<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv_store WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            Ok(serde_json::from_str(&value)?)
        } else {
            Ok(BTreeSet::new())
        }
    }

    fn set(&self, key: &str, value: &BTreeSet<String>) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, encoded],
        )?;
        debug!("Stored {} entries under '{}'", value.len(), key);
        Ok(())
    }
}
