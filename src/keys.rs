//! Keyboard surface: key names and what each key does.
//!
//! Letter shortcuts only fire outside the search field so they can still be
//! typed; arrow keys and Enter work everywhere.

use std::fmt;
use std::str::FromStr;

/// A key as reported by whatever front end is driving us
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
    Other(String),
}

impl FromStr for Key {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Key::Char(c));
        }
        Ok(match s.to_ascii_lowercase().as_str() {
            "enter" | "return" => Key::Enter,
            "escape" | "esc" => Key::Escape,
            "arrowup" | "up" => Key::ArrowUp,
            "arrowdown" | "down" => Key::ArrowDown,
            _ => Key::Other(s.to_string()),
        })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Enter => f.write_str("Enter"),
            Key::Escape => f.write_str("Escape"),
            Key::ArrowUp => f.write_str("ArrowUp"),
            Key::ArrowDown => f.write_str("ArrowDown"),
            Key::Other(name) => f.write_str(name),
        }
    }
}

/// A key press plus where focus was when it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub in_text_field: bool,
}

impl KeyPress {
    pub fn new(key: Key, in_text_field: bool) -> Self {
        Self { key, in_text_field }
    }
}

/// What a key press asks the controller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Focus the search field and select its text
    FocusSearch,
    /// Clear the query and leave the search field
    ClearSearch,
    Move(isize),
    Open,
}

/// Map a key press to an action. `None` means the key is left alone
/// (typed into the field, or simply unbound).
pub fn map_key(press: &KeyPress) -> Option<KeyAction> {
    let typing = press.in_text_field;
    match &press.key {
        Key::Char('/') if !typing => Some(KeyAction::FocusSearch),
        Key::Escape if typing => Some(KeyAction::ClearSearch),
        Key::ArrowDown => Some(KeyAction::Move(1)),
        Key::Char('j') if !typing => Some(KeyAction::Move(1)),
        Key::ArrowUp => Some(KeyAction::Move(-1)),
        Key::Char('k') if !typing => Some(KeyAction::Move(-1)),
        Key::Enter => Some(KeyAction::Open),
        Key::Char('o' | 'O') if !typing => Some(KeyAction::Open),
        _ => None,
    }
}
