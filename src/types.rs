use crate::error::{FinderError, Result};
use chrono::{Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Raw event data exactly as the event store returns it
pub type RawEvent = serde_json::Value;

/// One concert listing, validated at ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Display name of the act; also the identity key for favorites
    pub title: String,
    /// ISO-8601 text as delivered by the store, kept for text search
    pub date: String,
    /// Parsed form of `date`, used for ordering and range tests
    pub starts_at: NaiveDateTime,
    pub venue: String,
    pub location: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub venue_link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Title,
    Venue,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "title" | "artist" => Ok(SortKey::Title),
            "venue" => Ok(SortKey::Venue),
            other => Err(format!("unknown sort key '{}' (expected date, title or venue)", other)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Date => "date",
            SortKey::Title => "title",
            SortKey::Venue => "venue",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(format!("unknown sort order '{}' (expected asc or desc)", other)),
        }
    }
}

/// Closed interval of date-times. Both ends are always present and ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start > end {
            return Err(FinderError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range covering every moment from the start of `from` to the end of `to`.
    pub fn from_days(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        Self::new(from.and_time(NaiveTime::MIN), end_of_day(to))
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }
}

fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_nano_opt(23, 59, 59, 999_999_999)
        .unwrap_or_else(|| day.and_time(NaiveTime::MIN))
}

/// Quick picks offered next to the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    Today,
    ThisWeek,
    NextWeek,
    ThisMonth,
}

impl DatePreset {
    pub fn range(self, today: NaiveDate) -> DateRange {
        let plus_days = |n: u64| today.checked_add_days(Days::new(n)).unwrap_or(NaiveDate::MAX);
        let (from, to) = match self {
            DatePreset::Today => (today, today),
            DatePreset::ThisWeek => (today, plus_days(7)),
            DatePreset::NextWeek => (plus_days(7), plus_days(14)),
            DatePreset::ThisMonth => (
                today,
                today
                    .checked_add_months(Months::new(1))
                    .unwrap_or(NaiveDate::MAX),
            ),
        };
        DateRange {
            start: from.and_time(NaiveTime::MIN),
            end: end_of_day(to),
        }
    }
}

impl FromStr for DatePreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "today" => Ok(DatePreset::Today),
            "week" | "thisweek" => Ok(DatePreset::ThisWeek),
            "nextweek" => Ok(DatePreset::NextWeek),
            "month" | "thismonth" => Ok(DatePreset::ThisMonth),
            other => Err(format!(
                "unknown preset '{}' (expected today, week, next-week or month)",
                other
            )),
        }
    }
}

/// User-chosen filter and sort parameters for one browsing session.
///
/// The default value is the "nothing selected" state: every event matches and
/// the list is ordered by ascending date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub search_query: String,
    pub selected_venues: BTreeSet<String>,
    pub date_range: Option<DateRange>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub favorites_only: bool,
}

impl FilterCriteria {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
