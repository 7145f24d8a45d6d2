//! Line-oriented session over stdin.
//!
//! Each line is one event: `type <text>`, `sort <mode>`, `key <name>`,
//! `focus`, `blur`, `click <row>`, `dblclick <row>`, `open`, `copy` or
//! `quit`. The text view is written out whenever the controller renders.

use crate::app::{Controller, Event, View};
use crate::keys::{Key, KeyPress};
use crate::platform::Platform;
use crate::render::{to_text, ViewModel};
use crate::url_sync::Location;
use std::io::{self, BufRead, Write};

/// Terminal stand-in for the page: prints each render and remembers
/// whether the search field has focus.
pub struct TerminalView<W> {
    out: W,
    focused: bool,
    search_text: String,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            focused: false,
            search_text: String::new(),
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }
}

impl<W: Write> View for TerminalView<W> {
    fn render(&mut self, view: &ViewModel) {
        if let Err(e) = write!(self.out, "{}", to_text(view)).and_then(|_| self.out.flush()) {
            log::warn!("Could not write view: {e}");
        }
    }

    fn scroll_into_view(&mut self, row: usize) {
        log::trace!("Row {row} is selected");
    }

    fn focus_search(&mut self, _select_all: bool) {
        self.focused = true;
    }

    fn blur_search(&mut self) {
        self.focused = false;
    }

    fn set_search_text(&mut self, text: &str) {
        self.search_text = text.to_string();
    }
}

/// One parsed session line
#[derive(Debug)]
pub enum Command {
    Event(Event),
    Focus,
    Blur,
    Quit,
}

/// Parse a session line. Key presses pick up the current focus so letter
/// shortcuts behave as they would on the page.
pub fn parse_command(line: &str, in_text_field: bool) -> Option<Command> {
    let line = line.trim_end();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));

    let event = match verb {
        "type" => Event::QueryInput(rest.to_string()),
        "sort" => Event::SortChanged(rest.parse().ok()?),
        "key" => {
            let key: Key = rest.trim().parse().ok()?;
            Event::Key(KeyPress::new(key, in_text_field))
        }
        "click" => Event::Click(rest.trim().parse().ok()?),
        "dblclick" => Event::DoubleClick(rest.trim().parse().ok()?),
        "open" => Event::OpenRequested,
        "copy" => Event::CopyRequested,
        "focus" => return Some(Command::Focus),
        "blur" => return Some(Command::Blur),
        "quit" | "exit" => return Some(Command::Quit),
        _ => return None,
    };
    Some(Command::Event(event))
}

/// Feed `input` line by line into `controller` until EOF or `quit`
pub fn run<R, W, P, L>(input: R, controller: &mut Controller<TerminalView<W>, P, L>) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    P: Platform,
    L: Location,
{
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let focused = controller.view().is_focused();
        match parse_command(&line, focused) {
            Some(Command::Quit) => break,
            Some(Command::Focus) => controller.view_mut().focus_search(false),
            Some(Command::Blur) => controller.view_mut().blur_search(),
            Some(Command::Event(Event::QueryInput(text))) => {
                controller.view_mut().set_search_text(&text);
                controller.handle(Event::QueryInput(text));
            }
            Some(Command::Event(event)) => controller.handle(event),
            None => log::warn!("Ignoring session line {line:?}"),
        }
    }
    Ok(())
}
