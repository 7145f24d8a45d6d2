//! The selection state machine.
//!
//! Tracks which row of the filtered set is selected. Commands come in,
//! effects go out; the controller decides how to carry the effects out.

/// What the user asked the selection to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionCommand {
    /// Step forward (positive) or back (negative), clamped to the list
    Move(isize),
    /// Select a row directly; rows outside the list are ignored
    Select(usize),
    /// Open the selected entry's repository
    Open,
    /// Put the selected entry's repository on the clipboard
    Copy,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Render,
    ScrollIntoView(usize),
    OpenUrl(String),
    CopyText(String),
}

/// Selected row within a filtered set of `len` rows.
/// With `len == 0` there is no selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    index: usize,
    len: usize,
}

impl Selection {
    /// Start over at the first row of a new filtered set
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.index = 0;
    }

    pub fn index(&self) -> Option<usize> {
        (self.len > 0).then_some(self.index)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Apply one command. `repository_at` resolves a row to its repository
    /// URL; open and copy only fire for a non-empty URL.
    pub fn apply<'a, F>(&mut self, command: SelectionCommand, repository_at: F) -> Vec<Effect>
    where
        F: Fn(usize) -> Option<&'a str>,
    {
        match command {
            SelectionCommand::Move(delta) => {
                if self.is_empty() {
                    return Vec::new();
                }
                let max = self.len - 1;
                self.index = self.index.saturating_add_signed(delta).min(max);
                vec![Effect::Render, Effect::ScrollIntoView(self.index)]
            }
            SelectionCommand::Select(row) => {
                if row >= self.len {
                    return Vec::new();
                }
                self.index = row;
                vec![Effect::Render]
            }
            SelectionCommand::Open => self
                .usable_repository(repository_at)
                .map(|url| vec![Effect::OpenUrl(url)])
                .unwrap_or_default(),
            SelectionCommand::Copy => self
                .usable_repository(repository_at)
                .map(|url| vec![Effect::CopyText(url)])
                .unwrap_or_default(),
        }
    }

    fn usable_repository<'a, F>(&self, repository_at: F) -> Option<String>
    where
        F: Fn(usize) -> Option<&'a str>,
    {
        let url = repository_at(self.index()?)?;
        (!url.is_empty()).then(|| url.to_string())
    }
}
