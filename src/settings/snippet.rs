//! Keybinding snippets
//!
//! A snippet is a ready-to-paste keybindings.json entry that toggles one
//! setting. It is copied to the system clipboard when one is available.

use super::CommandArgs;
use crate::core::error::{Result, ShortcutError};
use crate::keybindings::TOGGLE_COMMAND;
use arboard::Clipboard;
use log::{debug, warn};
use serde_json::{Map, Value};

/// Where a snippet ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetDelivery {
    Clipboard,
    Stdout,
}

/// Snippet entry for toggling `args.key`, with an optional chord
pub fn build_snippet(args: &CommandArgs, chord: Option<&str>) -> Value {
    let mut entry = Map::new();
    if let Some(chord) = chord {
        entry.insert("key".to_string(), Value::String(chord.to_string()));
    }
    entry.insert("command".to_string(), Value::String(TOGGLE_COMMAND.to_string()));
    entry.insert("args".to_string(), args.binding_args());
    Value::Object(entry)
}

/// Snippet as pretty-printed JSON text
pub fn snippet_text(args: &CommandArgs, chord: Option<&str>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&build_snippet(args, chord))?)
}

/// Put text on the system clipboard
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().map_err(|e| ShortcutError::ClipboardError(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| ShortcutError::ClipboardError(format!("Failed to set clipboard text: {}", e)))
}

/// Copy a snippet to the clipboard, printing it when that fails
pub fn deliver_snippet(args: &CommandArgs, chord: Option<&str>) -> Result<SnippetDelivery> {
    let text = snippet_text(args, chord)?;
    match copy_to_clipboard(&text) {
        Ok(()) => {
            debug!("Copied snippet for {} to clipboard", args.key);
            Ok(SnippetDelivery::Clipboard)
        }
        Err(e) => {
            warn!("{}; printing snippet instead", e);
            println!("{}", text);
            Ok(SnippetDelivery::Stdout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::WriteTarget;

    #[test]
    fn test_snippet_defaults_target_to_user() {
        let snippet = build_snippet(&CommandArgs::new("editor.minimap.enabled"), None);
        assert_eq!(
            snippet,
            serde_json::json!({
                "command": "shortcut-settings.toggle",
                "args": { "key": "editor.minimap.enabled", "target": "user" }
            })
        );
    }

    #[test]
    fn test_snippet_text_with_chord() {
        let args = CommandArgs::new("a.b")
            .target(Some(WriteTarget::Workspace))
            .title(Some("AB".to_string()));
        let text = snippet_text(&args, Some("ctrl+alt+t")).unwrap();
        let expected = r#"{
  "key": "ctrl+alt+t",
  "command": "shortcut-settings.toggle",
  "args": {
    "key": "a.b",
    "target": "workspace",
    "title": "AB"
  }
}"#;
        assert_eq!(text, expected);
    }
}
