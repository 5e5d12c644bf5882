use crate::error::{FinderError, Result};
use crate::ingest::ingest_events;
use crate::types::{EventRecord, RawEvent};
use async_trait::async_trait;
use chrono_tz::Tz;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Anything that can hand over the full event list in one shot
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Short name used in logs
    fn source_name(&self) -> &str;

    /// Fetch every event. Failures surface as [`FinderError::SourceUnavailable`]
    /// and are never retried here.
    async fn fetch_events(&self) -> Result<Vec<RawEvent>>;
}

/// Fetch from `source` and validate every row, reading start times in `zone`.
#[instrument(skip(source), fields(origin = source.source_name()))]
pub async fn load_events(source: &dyn EventSource, zone: Tz) -> Result<Vec<EventRecord>> {
    let raw = source.fetch_events().await?;
    info!("Fetched {} raw events", raw.len());
    ingest_events(&raw, zone)
}

/// Reads the `events` table through the Supabase REST interface
pub struct RestEventSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl RestEventSource {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: "events".to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), self.table)
    }
}

#[async_trait]
impl EventSource for RestEventSource {
    fn source_name(&self) -> &str {
        "supabase"
    }

    async fn fetch_events(&self) -> Result<Vec<RawEvent>> {
        let endpoint = self.endpoint();
        debug!("GET {}", endpoint);

        let resp = self
            .client
            .get(&endpoint)
            .header("apikey", self.api_key.as_str())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .query(&[("select", "*")])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(FinderError::SourceUnavailable(format!(
                "{} returned {} - {}",
                endpoint, status, body
            )));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Reads a JSON array of events from disk
pub struct FileEventSource {
    path: PathBuf,
}

impl FileEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl EventSource for FileEventSource {
    fn source_name(&self) -> &str {
        "file"
    }

    async fn fetch_events(&self) -> Result<Vec<RawEvent>> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            FinderError::SourceUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}
