//! Application state and the controller that drives it.
//!
//! Every input arrives as an `Event`. The controller updates `AppState`,
//! then hands a fresh `ViewModel` to the injected `View`. Filtering,
//! scoring and selection are always recomputed together so they never
//! disagree.

use crate::entry::{Entry, EntryId};
use crate::error::CatalogResult;
use crate::keys::{map_key, KeyAction, KeyPress};
use crate::loader::LOAD_FAILED_MESSAGE;
use crate::platform::Platform;
use crate::render::{self, ViewModel};
use crate::search::{self, RelevanceScores, SortMode};
use crate::selection::{Effect, Selection, SelectionCommand};
use crate::url_sync::{self, Location};

pub const LOADING_MESSAGE: &str = "Loading index...";
pub const COPIED_MESSAGE: &str = "Copied repository URL.";
pub const COPY_FAILED_MESSAGE: &str = "Clipboard write failed.";
pub const OPEN_FAILED_MESSAGE: &str = "Failed to open repository.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed,
}

/// Everything that changes while the catalog is open
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Full collection in load order, fixed once loaded
    pub entries: Vec<Entry>,
    pub query: String,
    pub sort_mode: SortMode,
    pub filtered: Vec<EntryId>,
    /// Scores for `query`; empty when the query is blank
    pub scores: RelevanceScores,
    pub selection: Selection,
    pub status: String,
    pub load_state: LoadState,
}

impl AppState {
    pub fn new(sort_mode: SortMode) -> Self {
        Self {
            sort_mode,
            status: LOADING_MESSAGE.to_string(),
            ..Self::default()
        }
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(id.0)
    }

    /// Entry shown at `row` of the filtered list
    pub fn row(&self, row: usize) -> Option<&Entry> {
        self.filtered.get(row).and_then(|id| self.entry(*id))
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.row(self.selection.index()?)
    }
}

/// Inputs the controller understands
#[derive(Debug)]
pub enum Event {
    /// The one-shot index load finished
    Loaded(CatalogResult<Vec<Entry>>),
    /// The search field now reads this text
    QueryInput(String),
    SortChanged(SortMode),
    Key(KeyPress),
    Click(usize),
    DoubleClick(usize),
    OpenRequested,
    CopyRequested,
}

/// The rendering surface, injected so the controller can run without one
pub trait View {
    fn render(&mut self, view: &ViewModel);
    fn scroll_into_view(&mut self, row: usize);
    fn focus_search(&mut self, select_all: bool);
    fn blur_search(&mut self);
    fn set_search_text(&mut self, text: &str);
}

pub struct Controller<V, P, L> {
    state: AppState,
    view: V,
    platform: P,
    location: L,
}

impl<V: View, P: Platform, L: Location> Controller<V, P, L> {
    pub fn new(view: V, platform: P, location: L, sort_mode: SortMode) -> Self {
        Self {
            state: AppState::new(sort_mode),
            view,
            platform,
            location,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    /// Process one event to completion
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Loaded(result) => self.on_loaded(result),
            Event::QueryInput(text) => self.apply_filter(&text),
            Event::SortChanged(mode) => self.change_sort(mode),
            Event::Key(press) => self.on_key(&press),
            Event::Click(row) => self.run_selection(SelectionCommand::Select(row)),
            Event::DoubleClick(row) => {
                self.run_selection(SelectionCommand::Select(row));
                if self.state.selection.index() == Some(row) {
                    self.run_selection(SelectionCommand::Open);
                }
            }
            Event::OpenRequested => self.run_selection(SelectionCommand::Open),
            Event::CopyRequested => self.run_selection(SelectionCommand::Copy),
        }
    }

    fn on_loaded(&mut self, result: CatalogResult<Vec<Entry>>) {
        match result {
            Ok(mut entries) => {
                // Ids index into `entries`, whoever built them
                for (i, entry) in entries.iter_mut().enumerate() {
                    entry.id = EntryId(i);
                }
                self.state.entries = entries;
                self.state.load_state = LoadState::Ready;
                self.state.status.clear();

                let initial = url_sync::initial_query(self.location.current());
                self.view.set_search_text(&initial);
                self.apply_filter(&initial);
            }
            Err(e) => {
                log::warn!("Failed to load index: {e}");
                self.state.entries.clear();
                self.state.filtered.clear();
                self.state.scores.clear();
                self.state.selection.reset(0);
                self.state.load_state = LoadState::Failed;
                self.state.status = LOAD_FAILED_MESSAGE.to_string();
                self.render();
            }
        }
    }

    /// Recompute filter, scores, order and selection for `raw`
    fn apply_filter(&mut self, raw: &str) {
        self.state.query = raw.to_string();
        let outcome = search::search(&self.state.entries, raw, self.state.sort_mode);
        self.state.filtered = outcome.filtered;
        self.state.scores = outcome.scores;
        self.state.selection.reset(self.state.filtered.len());
        self.render();
        url_sync::sync_query(&mut self.location, raw);
    }

    /// Re-sort with the scores already computed for the current query
    fn change_sort(&mut self, mode: SortMode) {
        log::debug!("Sort mode {} -> {}", self.state.sort_mode, mode);
        self.state.sort_mode = mode;
        search::sort_filtered(
            &self.state.entries,
            &mut self.state.filtered,
            mode,
            &self.state.scores,
            &self.state.query,
        );
        self.state.selection.reset(self.state.filtered.len());
        self.render();
    }

    fn on_key(&mut self, press: &KeyPress) {
        match map_key(press) {
            Some(KeyAction::FocusSearch) => self.view.focus_search(true),
            Some(KeyAction::ClearSearch) => {
                self.view.set_search_text("");
                self.apply_filter("");
                self.view.blur_search();
            }
            Some(KeyAction::Move(delta)) => self.run_selection(SelectionCommand::Move(delta)),
            Some(KeyAction::Open) => self.run_selection(SelectionCommand::Open),
            None => {}
        }
    }

    fn run_selection(&mut self, command: SelectionCommand) {
        let entries = &self.state.entries;
        let filtered = &self.state.filtered;
        let effects = self.state.selection.apply(command, |row| {
            filtered
                .get(row)
                .and_then(|id| entries.get(id.0))
                .map(|entry| entry.repository.as_str())
        });

        for effect in effects {
            self.perform(effect);
        }
    }

    fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::Render => self.render(),
            Effect::ScrollIntoView(row) => self.view.scroll_into_view(row),
            Effect::OpenUrl(url) => {
                if let Err(e) = self.platform.open_url(&url) {
                    log::warn!("Could not open {url}: {e}");
                    self.set_status(OPEN_FAILED_MESSAGE);
                }
            }
            Effect::CopyText(text) => match self.platform.copy_text(&text) {
                Ok(()) => self.set_status(COPIED_MESSAGE),
                Err(e) => {
                    log::warn!("Clipboard write failed: {e}");
                    self.set_status(COPY_FAILED_MESSAGE);
                }
            },
        }
    }

    fn set_status(&mut self, status: &str) {
        self.state.status = status.to_string();
        self.render();
    }

    fn render(&mut self) {
        let view = render::project(&self.state);
        self.view.render(&view);
    }
}
