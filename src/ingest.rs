//! Boundary where loosely typed store rows become [`EventRecord`]s.
//!
//! Everything downstream (predicates, comparators, the surprise pick) assumes
//! a parsed start time, so a date that cannot be read is rejected here instead
//! of being quietly treated as "no match".

use crate::error::{FinderError, Result};
use crate::types::{EventRecord, RawEvent};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use serde_json::Value;
use tracing::{debug, warn};

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f", // "2025-01-10T20:00:00"
    "%Y-%m-%dT%H:%M",       // "2025-01-10T20:00"
    "%Y-%m-%d %H:%M:%S%.f", // "2025-01-10 20:00:00"
    "%Y-%m-%d %H:%M",       // "2025-01-10 20:00"
];

/// Parse an ISO-8601 date or date-time into wall-clock time in `zone`.
///
/// Values carrying an offset are converted into `zone`; values without one are
/// already local and taken as written. A bare date means midnight.
pub fn parse_event_date(value: &str, zone: Tz) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&zone).naive_local());
    }
    // Postgres text form, e.g. "2025-01-10 20:00:00+00"
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&zone).naive_local());
    }
    for format in &NAIVE_DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

fn text_field(raw: &RawEvent, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn required(raw: &RawEvent, index: usize, field: &'static str) -> Result<String> {
    text_field(raw, field).ok_or(FinderError::MissingField { index, field })
}

/// Validate one raw row. `index` is its position in the fetched list.
pub fn ingest_event(index: usize, raw: &RawEvent, zone: Tz) -> Result<EventRecord> {
    let title = required(raw, index, "title")?;
    let date = required(raw, index, "date")?;
    let venue = required(raw, index, "venue")?;

    let starts_at = parse_event_date(&date, zone).ok_or_else(|| FinderError::MalformedDate {
        title: title.clone(),
        value: date.clone(),
    })?;

    Ok(EventRecord {
        title,
        date,
        starts_at,
        venue,
        location: text_field(raw, "location"),
        image: text_field(raw, "image").or_else(|| text_field(raw, "images")),
        link: text_field(raw, "link"),
        venue_link: text_field(raw, "venue_link"),
    })
}

/// Validate a whole fetched list. The first bad row aborts the load.
pub fn ingest_events(raw_events: &[RawEvent], zone: Tz) -> Result<Vec<EventRecord>> {
    let mut events = Vec::with_capacity(raw_events.len());
    for (index, raw) in raw_events.iter().enumerate() {
        match ingest_event(index, raw, zone) {
            Ok(event) => events.push(event),
            Err(e) => {
                warn!("Rejecting event list at row {}: {}", index, e);
                return Err(e);
            }
        }
    }
    debug!("Ingested {} events", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DatePreset, DateRange};
    use serde_json::json;

    #[test]
    fn test_parse_event_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();

        assert_eq!(parse_event_date("2025-01-10T20:00:00Z", Tz::UTC), Some(expected));
        assert_eq!(parse_event_date("2025-01-10T21:00:00+01:00", Tz::UTC), Some(expected));
        assert_eq!(parse_event_date("2025-01-10 20:00:00+00", Tz::UTC), Some(expected));
        assert_eq!(parse_event_date("2025-01-10T20:00:00", Tz::UTC), Some(expected));
        assert_eq!(parse_event_date("2025-01-10T20:00", Tz::UTC), Some(expected));
        assert_eq!(
            parse_event_date("2025-01-10", Tz::UTC),
            Some(expected.date().and_time(NaiveTime::MIN))
        );
    }

    #[test]
    fn test_offset_dates_land_on_local_wall_clock() {
        let copenhagen = chrono_tz::Europe::Copenhagen;
        let at = |d, h, m| {
            NaiveDate::from_ymd_opt(2025, 1, d)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap()
        };

        assert_eq!(parse_event_date("2025-01-11T00:30:00+01:00", copenhagen), Some(at(11, 0, 30)));
        assert_eq!(parse_event_date("2025-01-10T23:30:00Z", copenhagen), Some(at(11, 0, 30)));
        assert_eq!(parse_event_date("2025-01-10 23:30:00+00", copenhagen), Some(at(11, 0, 30)));
        // No offset: already local
        assert_eq!(parse_event_date("2025-01-11T00:30:00", copenhagen), Some(at(11, 0, 30)));
        // Summer time shifts by two hours
        assert_eq!(
            parse_event_date("2025-07-01T18:00:00Z", copenhagen),
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap().and_hms_opt(20, 0, 0)
        );
    }

    #[test]
    fn test_near_midnight_show_stays_on_its_local_day() {
        let copenhagen = chrono_tz::Europe::Copenhagen;
        let raw = json!({"title": "Late Set", "date": "2025-01-11T00:30:00+01:00", "venue": "Loppen"});
        let event = ingest_event(0, &raw, copenhagen).unwrap();

        let eleventh = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        let tenth = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert!(DateRange::from_days(eleventh, eleventh).unwrap().contains(event.starts_at));
        assert!(!DateRange::from_days(tenth, tenth).unwrap().contains(event.starts_at));
        assert!(DatePreset::Today.range(eleventh).contains(event.starts_at));
    }

    #[test]
    fn test_parse_event_date_rejects_garbage() {
        assert_eq!(parse_event_date("next friday", Tz::UTC), None);
        assert_eq!(parse_event_date("2025-13-01", Tz::UTC), None);
        assert_eq!(parse_event_date("", Tz::UTC), None);
    }

    #[test]
    fn test_ingest_event_maps_fields() {
        let raw = json!({
            "title": "Fontaines D.C.",
            "date": "2025-02-01T19:30:00Z",
            "venue": "VEGA",
            "location": "Enghavevej 40, København",
            "images": "https://img.example.com/fdc.jpg",
            "link": "https://vega.dk/fdc",
            "venue_link": "https://vega.dk/en"
        });

        let event = ingest_event(0, &raw, Tz::UTC).unwrap();
        assert_eq!(event.title, "Fontaines D.C.");
        assert_eq!(event.venue, "VEGA");
        assert_eq!(event.date, "2025-02-01T19:30:00Z");
        assert_eq!(event.image.as_deref(), Some("https://img.example.com/fdc.jpg"));
        assert_eq!(event.venue_link.as_deref(), Some("https://vega.dk/en"));
        assert_eq!(event.location.as_deref(), Some("Enghavevej 40, København"));
    }

    #[test]
    fn test_ingest_event_treats_blank_location_as_absent() {
        let raw = json!({"title": "A", "date": "2025-01-10", "venue": "X", "location": "  "});
        assert_eq!(ingest_event(0, &raw, Tz::UTC).unwrap().location, None);
    }

    #[test]
    fn test_ingest_rejects_malformed_date() {
        let raws = vec![
            json!({"title": "A", "date": "2025-01-10", "venue": "X"}),
            json!({"title": "B", "date": "soon", "venue": "Y"}),
        ];

        match ingest_events(&raws, Tz::UTC) {
            Err(FinderError::MalformedDate { title, value }) => {
                assert_eq!(title, "B");
                assert_eq!(value, "soon");
            }
            other => panic!("expected MalformedDate, got {:?}", other),
        }
    }

    #[test]
    fn test_ingest_rejects_missing_venue() {
        let raws = vec![json!({"title": "A", "date": "2025-01-10"})];
        assert!(matches!(
            ingest_events(&raws, Tz::UTC),
            Err(FinderError::MissingField { index: 0, field: "venue" })
        ));
    }
}
