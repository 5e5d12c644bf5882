use anyhow::Context;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use concert_finder::config::{Config, DEFAULT_CONFIG_PATH};
use concert_finder::favorites::SqliteFavoritesStore;
use concert_finder::logging;
use concert_finder::source::{load_events, EventSource, FileEventSource};
use concert_finder::venues::VenueDirectory;
use concert_finder::{
    BrowseSession, DatePreset, DateRange, EventRecord, FavoritesSet, FilterCriteria, FinderError,
    SortKey, SortOrder,
};

#[derive(Parser)]
#[command(name = "concert_finder")]
#[command(about = "Browse, filter and rediscover upcoming concerts")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Read events from a JSON file instead of the remote store
    #[arg(long, global = true)]
    events_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events matching the given filters
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List every venue that has events, with its link
    Venues,
    /// Toggle an event title in the favorites set
    Favorite {
        /// Event title exactly as listed
        title: String,
    },
    /// Pick one event at random
    Surprise {
        #[command(flatten)]
        filters: FilterArgs,
        /// Draw from all events instead of the filtered ones
        #[arg(long)]
        all: bool,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Case-insensitive text search over title, venue, date and location
    #[arg(long, short)]
    query: Option<String>,

    /// Restrict to these venues (repeatable, exact names)
    #[arg(long = "venue")]
    venues: Vec<String>,

    /// First day of the date range (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// Last day of the date range, inclusive (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Date preset: today, week, next-week or month
    #[arg(long, conflicts_with_all = ["from", "to"])]
    preset: Option<DatePreset>,

    /// Sort key: date, title or venue
    #[arg(long, default_value = "date")]
    sort: SortKey,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Only show favorites
    #[arg(long)]
    favorites: bool,
}

impl FilterArgs {
    fn to_criteria(&self, today: NaiveDate) -> Result<FilterCriteria, FinderError> {
        let date_range = match (self.preset, self.from, self.to) {
            (Some(preset), _, _) => Some(preset.range(today)),
            (None, Some(from), Some(to)) => Some(DateRange::from_days(from, to)?),
            _ => None,
        };
        Ok(FilterCriteria {
            search_query: self.query.clone().unwrap_or_default(),
            selected_venues: self.venues.iter().cloned().collect(),
            date_range,
            sort_by: self.sort,
            sort_order: if self.desc {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            },
            favorites_only: self.favorites,
        })
    }
}

fn print_event(event: &EventRecord, favorites: &FavoritesSet, venues: &VenueDirectory) {
    let star = if favorites.contains(&event.title) { "★" } else { " " };
    println!(
        "{} {}  {}  @ {}",
        star,
        event.starts_at.format("%a %d %b %Y %H:%M"),
        event.title,
        event.venue
    );
    if let Some(location) = &event.location {
        println!("     {}", location);
    }
    if let Some(link) = &event.link {
        let how = if venues.opens_externally(&event.venue) {
            " (opens in browser)"
        } else {
            ""
        };
        println!("     {}{}", link, how);
    }
}

async fn open_session(
    cli: &Cli,
    config: &Config,
    store: &SqliteFavoritesStore,
    zone: Tz,
) -> anyhow::Result<BrowseSession> {
    let source: Box<dyn EventSource> = match &cli.events_file {
        Some(path) => Box::new(FileEventSource::new(path)),
        None => Box::new(config.rest_source()?),
    };
    let events = load_events(source.as_ref(), zone)
        .await
        .with_context(|| format!("loading events from {}", source.source_name()))?;
    Ok(BrowseSession::open(events, store)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _guard = logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let store = SqliteFavoritesStore::open(&config.favorites.db_path)?;
    let venues = config.venue_directory();
    let zone = config.timezone()?;
    let today = Utc::now().with_timezone(&zone).date_naive();

    match &cli.command {
        Commands::List { filters } => {
            let mut session = open_session(&cli, &config, &store, zone).await?;
            session.criteria = filters.to_criteria(today)?;

            let shown = session.visible();
            if shown.is_empty() {
                println!("No events match the current filters.");
            }
            for event in &shown {
                print_event(event, session.favorites(), &venues);
            }
            if session.has_active_filters() {
                println!(
                    "\nShowing {} of {} events, sorted by {} (filters active)",
                    shown.len(),
                    session.events().len(),
                    session.criteria.sort_by
                );
            }
        }
        Commands::Venues => {
            let session = open_session(&cli, &config, &store, zone).await?;
            for venue in session.venues() {
                match venues.url_for(&venue) {
                    Some(url) => println!("{:<24} {}", venue, url),
                    None => println!("{}", venue),
                }
            }
        }
        Commands::Favorite { title } => {
            let mut favorites = FavoritesSet::load(&store)?;
            let now_favorite = favorites.toggle_and_save(title, &store)?;
            info!(title = %title, now_favorite, "favorite toggled");
            if now_favorite {
                println!("★ Added '{}' to favorites", title);
            } else {
                println!("Removed '{}' from favorites", title);
            }
        }
        Commands::Surprise { filters, all } => {
            let mut session = open_session(&cli, &config, &store, zone).await?;
            session.criteria = filters.to_criteria(today)?;

            let mut rng = rand::thread_rng();
            let picked = if *all {
                session.surprise_any(&mut rng)
            } else {
                session.surprise(&mut rng)
            };
            match picked {
                Ok(event) => {
                    println!("🎲 Taking you to {}!", event.title);
                    print_event(&event, session.favorites(), &venues);
                }
                Err(FinderError::EmptyCandidateSet) => {
                    error!("Surprise requested with no candidates");
                    println!("Sorry, there are no events to choose from at the moment.");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
