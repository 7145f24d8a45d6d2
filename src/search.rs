//! Relevance scoring and the filter/sort engine.
//!
//! Defines:
//! - `tokenize` splitting a raw query into lowercase terms
//! - `score_entry`, the additive name/description/repository scorer
//! - `SortMode` (relevance, stars, updated)
//! - `filter_entries` / `sort_filtered` producing the ordered working set

use crate::entry::{Entry, EntryId};
use crate::error::CatalogError;
use crate::tie_break;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub const NAME_PREFIX_SCORE: u32 = 120;
pub const NAME_CONTAINS_SCORE: u32 = 80;
pub const DESCRIPTION_SCORE: u32 = 28;
pub const REPOSITORY_SCORE: u32 = 16;

/// Per-query scores, keyed by entry. Only valid for the query that built it.
pub type RelevanceScores = HashMap<EntryId, u32>;

/// How the filtered set is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Relevance,
    Stars,
    Updated,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::Stars => "stars",
            SortMode::Updated => "updated",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" => Ok(SortMode::Relevance),
            "stars" => Ok(SortMode::Stars),
            "updated" => Ok(SortMode::Updated),
            other => Err(CatalogError::UnknownSortMode(other.to_string())),
        }
    }
}

/// The filtered, ordered working set together with the scores that ranked it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub filtered: Vec<EntryId>,
    pub scores: RelevanceScores,
}

/// Split a raw query into lowercase, whitespace-separated terms
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .trim()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Score one entry against the query terms.
///
/// Every term contributes independently: a name prefix beats a name
/// substring, and description and repository hits add on top.
pub fn score_entry(entry: &Entry, terms: &[String]) -> u32 {
    let name = entry.name.to_lowercase();
    let description = entry.description.to_lowercase();
    let repository = entry.repository.to_lowercase();

    let mut score = 0;
    for term in terms.iter().filter(|t| !t.is_empty()) {
        if name.starts_with(term.as_str()) {
            score += NAME_PREFIX_SCORE;
        } else if name.contains(term.as_str()) {
            score += NAME_CONTAINS_SCORE;
        }
        if description.contains(term.as_str()) {
            score += DESCRIPTION_SCORE;
        }
        if repository.contains(term.as_str()) {
            score += REPOSITORY_SCORE;
        }
    }

    score
}

/// Keep the entries that match `query`, in load order, with their scores.
/// A blank query keeps everything and scores nothing.
pub fn filter_entries(entries: &[Entry], query: &str) -> FilterOutcome {
    let terms = tokenize(query);
    if terms.is_empty() {
        return FilterOutcome {
            filtered: entries.iter().map(|e| e.id).collect(),
            scores: RelevanceScores::new(),
        };
    }

    let mut outcome = FilterOutcome::default();
    for entry in entries {
        let score = score_entry(entry, &terms);
        if score > 0 {
            outcome.filtered.push(entry.id);
            outcome.scores.insert(entry.id, score);
        }
    }

    log::debug!(
        "Query {:?} matched {} of {} entries",
        query,
        outcome.filtered.len(),
        entries.len()
    );
    outcome
}

/// Reorder `filtered` in place for `mode`, reusing `scores` from the last
/// filter. Ids that do not point into `entries` go last.
pub fn sort_filtered(
    entries: &[Entry],
    filtered: &mut [EntryId],
    mode: SortMode,
    scores: &RelevanceScores,
    query: &str,
) {
    let query_active = !query.trim().is_empty();
    filtered.sort_by(|a, b| match (entries.get(a.0), entries.get(b.0)) {
        (Some(a), Some(b)) => tie_break::compare(a, b, mode, scores, query_active),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Filter and sort in one step
pub fn search(entries: &[Entry], query: &str, mode: SortMode) -> FilterOutcome {
    let mut outcome = filter_entries(entries, query);
    sort_filtered(entries, &mut outcome.filtered, mode, &outcome.scores, query);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(id: usize, name: &str, description: &str, repository: &str, stars: u64) -> Entry {
        Entry {
            id: EntryId(id),
            name: name.to_string(),
            description: description.to_string(),
            repository: repository.to_string(),
            source_file: String::new(),
            source_format: String::new(),
            repository_stars: stars,
            repository_last_updated: String::new(),
        }
    }

    fn names(entries: &[Entry], ids: &[EntryId]) -> Vec<String> {
        ids.iter().map(|id| entries[id.0].name.clone()).collect()
    }

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn tokenize_lowercases_and_splits() {
        assert_eq!(tokenize("  Nano  DUMP\tlsass "), terms(&["nano", "dump", "lsass"]));
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn score_weights() {
        let e = entry(0, "nanodump", "dump lsass", "https://github.com/fortra/nanodump", 0);
        assert_eq!(score_entry(&e, &terms(&["nano"])), 120 + 16);
        assert_eq!(score_entry(&e, &terms(&["dump"])), 80 + 28 + 16);
        assert_eq!(score_entry(&e, &terms(&["lsass"])), 28);
        assert_eq!(score_entry(&e, &terms(&["fortra"])), 16);
        assert_eq!(score_entry(&e, &terms(&["nano", "lsass"])), 120 + 16 + 28);
        assert_eq!(score_entry(&e, &terms(&["mimikatz"])), 0);
    }

    #[test]
    fn score_is_case_insensitive() {
        let e = entry(0, "InlineExecute-Assembly", "", "", 0);
        assert_eq!(score_entry(&e, &tokenize("INLINE")), 120);
    }

    #[test]
    fn no_terms_scores_zero() {
        let e = entry(0, "anything", "at all", "https://x", 3);
        assert_eq!(score_entry(&e, &[]), 0);
    }

    #[test]
    fn blank_query_keeps_everything_in_load_order() {
        let entries: Vec<Entry> = (0..5).map(|i| entry(i, &format!("e{i}"), "", "", 0)).collect();
        let outcome = search(&entries, "   ", SortMode::Relevance);
        assert_eq!(outcome.filtered.len(), 5);
        assert!(outcome.scores.is_empty());
        assert_eq!(names(&entries, &outcome.filtered), vec!["e0", "e1", "e2", "e3", "e4"]);
    }

    #[test]
    fn unmatched_query_is_empty() {
        let entries = vec![entry(0, "alpha", "", "", 0)];
        let outcome = search(&entries, "zzz", SortMode::Relevance);
        assert!(outcome.filtered.is_empty());
        assert!(outcome.scores.is_empty());
    }

    #[test]
    fn unknown_ids_sort_last() {
        let entries = vec![entry(0, "beta", "", "", 0), entry(1, "alpha", "", "", 0)];
        let mut filtered = vec![EntryId(7), EntryId(0), EntryId(1)];
        sort_filtered(&entries, &mut filtered, SortMode::Stars, &RelevanceScores::new(), "");
        assert_eq!(filtered, vec![EntryId(1), EntryId(0), EntryId(7)]);
    }

    #[test]
    fn equal_scores_tie_break_on_name() {
        let entries = vec![entry(0, "Chocolatey", "", "", 500), entry(1, "Choco", "", "", 10)];
        let outcome = search(&entries, "cho", SortMode::Relevance);
        assert_eq!(outcome.scores[&EntryId(0)], 120);
        assert_eq!(outcome.scores[&EntryId(1)], 120);
        assert_eq!(names(&entries, &outcome.filtered), vec!["Choco", "Chocolatey"]);
    }

    #[test]
    fn relevance_puts_name_matches_first() {
        let entries = vec![
            entry(0, "zeta", "has kerberos in description", "", 0),
            entry(1, "kerberoast", "", "", 0),
            entry(2, "roaster", "", "https://github.com/x/kerberos", 0),
        ];
        let outcome = search(&entries, "kerber", SortMode::Relevance);
        assert_eq!(names(&entries, &outcome.filtered), vec!["kerberoast", "zeta", "roaster"]);
    }

    #[test]
    fn sort_change_reuses_scores() {
        let entries = vec![
            entry(0, "cho-low", "", "", 1),
            entry(1, "cho-high", "", "", 99),
            entry(2, "other", "", "", 1000),
        ];
        let mut outcome = filter_entries(&entries, "cho");
        let scores_before = outcome.scores.clone();
        sort_filtered(&entries, &mut outcome.filtered, SortMode::Stars, &outcome.scores, "cho");
        assert_eq!(outcome.scores, scores_before);
        assert_eq!(names(&entries, &outcome.filtered), vec!["cho-high", "cho-low"]);
    }

    #[test]
    fn relevance_without_query_restores_load_order() {
        let entries = vec![entry(0, "b", "", "", 1), entry(1, "a", "", "", 5)];
        let mut outcome = search(&entries, "", SortMode::Stars);
        assert_eq!(names(&entries, &outcome.filtered), vec!["a", "b"]);
        sort_filtered(&entries, &mut outcome.filtered, SortMode::Relevance, &outcome.scores, "");
        assert_eq!(names(&entries, &outcome.filtered), vec!["b", "a"]);
    }

    #[test]
    fn updated_sorts_newest_first_with_bad_dates_last() {
        let mut entries = vec![
            entry(0, "old", "", "", 0),
            entry(1, "broken", "", "", 0),
            entry(2, "new", "", "", 0),
        ];
        entries[0].repository_last_updated = "2021-01-01".to_string();
        entries[1].repository_last_updated = "not a date".to_string();
        entries[2].repository_last_updated = "2024-06-01T12:00:00Z".to_string();
        let outcome = search(&entries, "", SortMode::Updated);
        assert_eq!(names(&entries, &outcome.filtered), vec!["new", "old", "broken"]);
        // the stored string is untouched
        assert_eq!(entries[1].repository_last_updated, "not a date");
    }

    #[test]
    fn filtering_is_idempotent() {
        let entries = vec![
            entry(0, "sa-whoami", "situational awareness", "", 4),
            entry(1, "sa-netstat", "", "", 9),
            entry(2, "unrelated", "", "", 1),
        ];
        let first = search(&entries, "sa", SortMode::Relevance);
        let second = search(&entries, "sa", SortMode::Relevance);
        assert_eq!(first, second);
    }

    #[test]
    fn sort_mode_parses() {
        assert_eq!("Stars".parse::<SortMode>().unwrap(), SortMode::Stars);
        assert_eq!(" updated ".parse::<SortMode>().unwrap(), SortMode::Updated);
        assert!("popularity".parse::<SortMode>().is_err());
        assert_eq!(SortMode::default().to_string(), "relevance");
    }

    proptest! {
        /// A term that prefixes the name always earns the prefix score.
        #[test]
        fn prop_name_prefix_scores_at_least_120(name in "[A-Za-z0-9_-]{1,16}", cut in 1usize..16) {
            let cut = cut.min(name.len());
            let term = name[..cut].to_lowercase();
            let e = entry(0, &name, "", "", 0);
            prop_assert!(score_entry(&e, &[term]) >= NAME_PREFIX_SCORE);
        }

        /// Stars ordering never increases and ties read alphabetically.
        #[test]
        fn prop_stars_sort_non_increasing(
            rows in proptest::collection::vec(("[a-z]{1,6}", 0u64..5), 0..20)
        ) {
            let entries: Vec<Entry> = rows
                .iter()
                .enumerate()
                .map(|(i, (name, stars))| entry(i, name, "", "", *stars))
                .collect();
            let outcome = search(&entries, "", SortMode::Stars);
            for pair in outcome.filtered.windows(2) {
                let (a, b) = (&entries[pair[0].0], &entries[pair[1].0]);
                prop_assert!(a.repository_stars >= b.repository_stars);
                if a.repository_stars == b.repository_stars {
                    prop_assert!(a.name <= b.name);
                }
            }
        }
    }
}
