// src/main.rs
use std::env;
use std::error::Error;
use std::io;
use std::time::Instant;

use app::{Controller, Event, LoadState, View};
use config::{Config, DEFAULT_PAGE_URL};
use error::CatalogResult;
use loader::IndexSource;
use platform::SystemPlatform;
use render::ViewModel;
use url_sync::{Location, MemoryLocation};

mod alfred;
mod app;
mod config;
mod entry;
mod error;
mod highlight;
mod keys;
mod loader;
mod platform;
mod render;
mod search;
mod selection;
mod session;
mod tie_break;
mod url_sync;
mod utils;

const COMMANDS: [&str; 6] = ["search", "html", "list", "open", "copy", "session"];

/// Keeps the latest render for one-shot commands
#[derive(Default)]
struct SnapshotView {
    last: Option<ViewModel>,
}

impl View for SnapshotView {
    fn render(&mut self, view: &ViewModel) {
        self.last = Some(view.clone());
    }
    fn scroll_into_view(&mut self, _row: usize) {}
    fn focus_search(&mut self, _select_all: bool) {}
    fn blur_search(&mut self) {}
    fn set_search_text(&mut self, _text: &str) {}
}

/// Split the arguments into a command and the query after it.
/// Anything that is not a command is the start of a query.
fn split_args(args: &[String]) -> (&str, String) {
    match args.first() {
        Some(first) if COMMANDS.contains(&first.as_str()) => (first.as_str(), args[1..].join(" ")),
        _ => ("search", args.join(" ")),
    }
}

/// The address the controller starts from. A query on the command line
/// replaces the address's own `q`; without one, that `q` seeds the search.
fn page_location(page_url: &str, query: &str) -> CatalogResult<MemoryLocation> {
    let mut location = match MemoryLocation::parse(page_url) {
        Ok(location) => location,
        Err(e) => {
            log::warn!("Invalid bof_page_url {page_url:?} ({e}), using {DEFAULT_PAGE_URL}");
            MemoryLocation::parse(DEFAULT_PAGE_URL)?
        }
    };
    if !query.trim().is_empty() {
        url_sync::sync_query(&mut location, query);
    }
    Ok(location)
}

/// A one-shot copy exits right away, so it has to hold on to the clipboard
fn platform_for(command: &str) -> SystemPlatform {
    if command == "copy" {
        SystemPlatform::holding_clipboard()
    } else {
        SystemPlatform::new()
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let start = Instant::now();
    let config = Config::from_env();

    let args: Vec<String> = env::args().skip(1).collect();
    let (command, query) = split_args(&args);
    log::debug!("command {command:?}, query {query:?}");

    let source = IndexSource::resolve(&config.index);
    // The query from the command line arrives the same way a shared link would
    let location = page_location(&config.page_url, &query)?;
    let loaded = loader::load_index(&source);

    if command == "session" {
        let mut controller = Controller::new(
            session::TerminalView::new(io::stdout()),
            SystemPlatform::new(),
            location,
            config.sort_mode,
        );
        controller.handle(Event::Loaded(loaded));
        session::run(io::stdin().lock(), &mut controller)?;
        log::debug!(
            "Session ended on {:?} ({}) after {:?}",
            controller.view().search_text(),
            controller.location().current(),
            start.elapsed()
        );
        return Ok(());
    }

    let mut controller = Controller::new(
        SnapshotView::default(),
        platform_for(command),
        location,
        config.sort_mode,
    );
    controller.handle(Event::Loaded(loaded));
    let failed = controller.state().load_state == LoadState::Failed;
    if failed {
        eprintln!("{}", controller.state().status);
    }

    match command {
        "html" | "list" => {
            if let Some(view) = &controller.view().last {
                if command == "html" {
                    print!("{}", render::to_html(view));
                } else {
                    print!("{}", render::to_text(view));
                }
            }
        }
        "open" | "copy" => {
            let event = if command == "open" {
                Event::OpenRequested
            } else {
                Event::CopyRequested
            };
            controller.handle(event);
            let status = &controller.state().status;
            if !failed && !status.is_empty() {
                println!("{status}");
            }
        }
        _ => {
            let state = controller.state();
            let rows = state.filtered.iter().filter_map(|id| state.entry(*id));
            alfred::output_results(rows, config.show_stats)?;
        }
    }

    log::debug!("Search completed in {:?}", start.elapsed());
    Ok(())
}
