//! Environment-driven configuration.
//!
//! Variables use the lowercase names a launcher workflow exposes:
//! `bof_index`, `bof_sort`, `bof_page_url`, `show_stats`.

use crate::search::SortMode;
use crate::utils;

pub const DEFAULT_INDEX: &str = "./data/bof-index.json";
pub const DEFAULT_PAGE_URL: &str = "http://localhost/";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// URL or filesystem path of the index document
    pub index: String,
    pub sort_mode: SortMode,
    /// Address the query is mirrored into
    pub page_url: String,
    pub show_stats: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index: DEFAULT_INDEX.to_string(),
            sort_mode: SortMode::default(),
            page_url: DEFAULT_PAGE_URL.to_string(),
            show_stats: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            index: utils::get_env_with_default("bof_index", DEFAULT_INDEX),
            sort_mode: parse_sort_mode(&utils::get_env_with_default("bof_sort", "relevance")),
            page_url: utils::get_env_with_default("bof_page_url", DEFAULT_PAGE_URL),
            show_stats: utils::get_env_bool("show_stats"),
        }
    }
}

/// Unknown modes fall back to relevance rather than refusing to start
pub fn parse_sort_mode(value: &str) -> SortMode {
    value.parse().unwrap_or_else(|e| {
        log::warn!("{e}, using {}", SortMode::default());
        SortMode::default()
    })
}
