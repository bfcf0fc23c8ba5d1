//! Copy calculator output to the system clipboard.

use arboard::Clipboard;
use tracing::debug;

use super::display::DisplayState;

/// Copy text to the system clipboard.
///
/// Returns `Ok(())` on success, or an error message on failure.
pub fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let mut clipboard =
        Clipboard::new().map_err(|e| format!("Failed to access clipboard: {}", e))?;

    clipboard
        .set_text(text.to_string())
        .map_err(|e| format!("Failed to copy to clipboard: {}", e))
}

/// Copy what a mode is currently showing: the display text, or the error banner.
pub fn copy_display(state: &DisplayState) -> Result<(), String> {
    let text = state.text_for_clipboard();
    debug!(%text, "copying display to clipboard");
    copy_to_clipboard(text)
}
