use crate::entry::Entry;
use crate::search::{RelevanceScores, SortMode};
use jiff::{civil, tz::TimeZone, Timestamp};
use std::cmp::Ordering;

/// Order two entries under `mode`. The mode decides first; whatever it
/// leaves tied falls through to the name, so identical inputs always sort
/// the same way.
pub fn compare(
    a: &Entry,
    b: &Entry,
    mode: SortMode,
    scores: &RelevanceScores,
    query_active: bool,
) -> Ordering {
    let primary = match mode {
        SortMode::Stars => b.repository_stars.cmp(&a.repository_stars),
        SortMode::Updated => date_rank(&b.repository_last_updated)
            .cmp(&date_rank(&a.repository_last_updated)),
        SortMode::Relevance if query_active => {
            let score_a = scores.get(&a.id).copied().unwrap_or(0);
            let score_b = scores.get(&b.id).copied().unwrap_or(0);
            score_b.cmp(&score_a)
        }
        // Nothing to rank without a query, keep load order
        SortMode::Relevance => a.id.cmp(&b.id),
    };

    primary.then_with(|| compare_names(&a.name, &b.name))
}

/// Case-folded comparison first so "alpha" and "Beta" read alphabetically,
/// then raw bytes so the order stays total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Milliseconds since the epoch for an update date. Anything empty or
/// unparseable ranks as 0, below every real date after 1970.
pub fn date_rank(value: &str) -> i64 {
    let value = value.trim();
    if value.is_empty() {
        return 0;
    }

    if let Ok(ts) = value.parse::<Timestamp>() {
        return ts.as_millisecond();
    }

    // Dates without an offset are read as UTC
    if let Ok(dt) = value.parse::<civil::DateTime>() {
        if let Ok(zoned) = dt.to_zoned(TimeZone::UTC) {
            return zoned.timestamp().as_millisecond();
        }
    }
    if let Ok(date) = value.parse::<civil::Date>() {
        if let Ok(zoned) = date.to_zoned(TimeZone::UTC) {
            return zoned.timestamp().as_millisecond();
        }
    }

    log::debug!("Unparseable update date {value:?}, ranking it lowest");
    0
}
