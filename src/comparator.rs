use crate::types::{EventRecord, SortKey, SortOrder};
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Relative order of two events for the given key and direction.
///
/// Events that are equal under the key compare `Equal`; breaking those ties is
/// left to the stable sort in [`crate::projection::project`].
pub fn compare(a: &EventRecord, b: &EventRecord, sort_by: SortKey, sort_order: SortOrder) -> Ordering {
    let base = match sort_by {
        SortKey::Date => a.starts_at.cmp(&b.starts_at),
        SortKey::Title => collate(&a.title, &b.title),
        SortKey::Venue => collate(&a.venue, &b.venue),
    };
    match sort_order {
        SortOrder::Ascending => base,
        SortOrder::Descending => base.reverse(),
    }
}

/// Dictionary-style string order.
///
/// Letters are compared on their base form first, so "Ébo" files next to
/// "Ebo" rather than after "z". Remaining ties are broken by accents
/// (unaccented first), then case (lowercase first), then raw code points.
/// Only identical strings compare `Equal`.
pub fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accents(a).cmp(accents(b)))
        .then_with(|| case_marks(a).cmp(case_marks(b)))
        .then_with(|| a.cmp(b))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn accents(s: &str) -> impl Iterator<Item = Option<char>> + '_ {
    s.nfd().map(|c| is_combining_mark(c).then_some(c))
}

fn case_marks(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
}
