//! Mirrors the active query into the page address as `?q=`.
//!
//! Updates replace the current address instead of pushing a new history
//! entry, so typing never floods back-navigation.

use crate::error::CatalogResult;
use url::Url;

pub const QUERY_PARAM: &str = "q";

/// The address bar, as far as the controller is concerned
pub trait Location {
    fn current(&self) -> &Url;

    /// Swap the current address without adding a history entry
    fn replace(&mut self, url: Url);
}

/// In-process address bar with a single history slot
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    url: Url,
}

impl MemoryLocation {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn parse(address: &str) -> CatalogResult<Self> {
        Ok(Self::new(Url::parse(address)?))
    }
}

impl Location for MemoryLocation {
    fn current(&self) -> &Url {
        &self.url
    }

    fn replace(&mut self, url: Url) {
        self.url = url;
    }
}

/// The query a page address asks for, empty when there is none
pub fn initial_query(url: &Url) -> String {
    url.query_pairs()
        .find(|(key, _)| key == QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// `url` with `q` set to the trimmed query, or removed when it is blank.
/// Other parameters are kept.
pub fn with_query(url: &Url, query: &str) -> Url {
    let query = query.trim();
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != QUERY_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut next = url.clone();
    next.set_query(None);
    if !kept.is_empty() || !query.is_empty() {
        let mut pairs = next.query_pairs_mut();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        if !query.is_empty() {
            pairs.append_pair(QUERY_PARAM, query);
        }
    }
    next
}

/// Reflect `query` into `location`
pub fn sync_query(location: &mut dyn Location, query: &str) {
    let next = with_query(location.current(), query);
    log::debug!("Address is now {next}");
    location.replace(next);
}
