//! HTML-safe highlighting of query terms.
//!
//! Matches are located on the raw text and only then escaped piece by
//! piece, so entry content can never smuggle markup into the output and a
//! term can never match inside an entity like `&amp;`.

use crate::search::tokenize;
use regex::RegexBuilder;

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

/// Escape the five HTML-sensitive characters
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `text` and wrap every case-insensitive occurrence of each query
/// term in `<mark>`. Overlapping or touching matches share one wrapper.
pub fn highlight(text: &str, query: &str) -> String {
    let ranges = match_ranges(text, query);
    if ranges.is_empty() {
        return escape_html(text);
    }

    let mut out = String::with_capacity(text.len() + ranges.len() * 13);
    let mut pos = 0;
    for (start, end) in ranges {
        out.push_str(&escape_html(&text[pos..start]));
        out.push_str(MARK_OPEN);
        out.push_str(&escape_html(&text[start..end]));
        out.push_str(MARK_CLOSE);
        pos = end;
    }
    out.push_str(&escape_html(&text[pos..]));
    out
}

/// Byte ranges of all term matches in `text`, sorted and merged
fn match_ranges(text: &str, query: &str) -> Vec<(usize, usize)> {
    let mut terms = tokenize(query);
    // Longest first so a short term never splits a longer term's match
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    terms.dedup();

    let mut ranges = Vec::new();
    for term in &terms {
        let re = match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => re,
            Err(e) => {
                log::warn!("Skipping highlight for term {term:?}: {e}");
                continue;
            }
        };
        ranges.extend(re.find_iter(text).map(|m| (m.start(), m.end())));
    }

    ranges.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }
    merged
}
