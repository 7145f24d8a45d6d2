//! System integration for the two outward actions: opening a repository
//! and copying its URL.

use crate::error::{CatalogError, CatalogResult};
use std::sync::Mutex;

/// Where "open" and "copy" end up
pub trait Platform {
    /// Open `url` in a new browser context
    fn open_url(&self, url: &str) -> CatalogResult<()>;

    fn copy_text(&self, text: &str) -> CatalogResult<()>;
}

/// Cross-platform implementation using the `open` and `arboard` crates.
///
/// The clipboard is connected lazily so headless runs that never copy do
/// not need a display server.
#[derive(Default)]
pub struct SystemPlatform {
    clipboard: Mutex<Option<arboard::Clipboard>>,
    hold_clipboard: bool,
}

impl SystemPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// For a process that exits right after copying. X11 and Wayland
    /// selections die with their owner, so on Linux a copy blocks until
    /// another program takes the clipboard over.
    pub fn holding_clipboard() -> Self {
        Self {
            hold_clipboard: true,
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn holds_clipboard(&self) -> bool {
        self.hold_clipboard
    }
}

impl Platform for SystemPlatform {
    fn open_url(&self, url: &str) -> CatalogResult<()> {
        log::debug!("Opening {url}");
        open::that(url).map_err(|e| CatalogError::Open(e.to_string()))
    }

    fn copy_text(&self, text: &str) -> CatalogResult<()> {
        let mut guard = self
            .clipboard
            .lock()
            .map_err(|e| CatalogError::Clipboard(e.to_string()))?;

        if guard.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| CatalogError::Clipboard(e.to_string()))?;
            *guard = Some(clipboard);
        }

        match guard.as_mut() {
            Some(clipboard) => set_text(clipboard, text, self.hold_clipboard)
                .map_err(|e| CatalogError::Clipboard(e.to_string())),
            None => Err(CatalogError::Clipboard("clipboard unavailable".to_string())),
        }
    }
}

#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
))]
fn set_text(clipboard: &mut arboard::Clipboard, text: &str, hold: bool) -> Result<(), arboard::Error> {
    use arboard::SetExtLinux;

    if hold {
        log::info!("Holding the clipboard until another program takes it over");
        clipboard.set().wait().text(text)
    } else {
        clipboard.set_text(text)
    }
}

#[cfg(not(all(
    unix,
    not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
)))]
fn set_text(clipboard: &mut arboard::Clipboard, text: &str, _hold: bool) -> Result<(), arboard::Error> {
    clipboard.set_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_shot_platform_holds_the_clipboard() {
        assert!(SystemPlatform::holding_clipboard().hold_clipboard);
        assert!(!SystemPlatform::new().hold_clipboard);
    }
}
