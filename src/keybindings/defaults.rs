//! Built-in editor keybindings
//!
//! A blacklist of the host editor's common default shortcuts, keyed by
//! canonical chord (see [`normalize`](super::keys::normalize)). A recorded chord
//! found here is reported as a conflict before the user's own file is consulted.
//!
//! Descriptions are English so they read naturally next to the rest of the
//! command output. [`DefaultKeybindingTable::from_pairs`] builds a table with
//! other wording, such as localized command names.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Canonical chord -> description of the built-in command
const BUILTIN_KEYBINDINGS: &[(&str, &str)] = &[
    // File operations
    ("cmd+n", "New File"),
    ("ctrl+n", "New File"),
    ("cmd+o", "Open File"),
    ("ctrl+o", "Open File"),
    ("cmd+s", "Save File"),
    ("ctrl+s", "Save File"),
    ("cmd+shift+s", "Save As"),
    ("ctrl+shift+s", "Save As"),
    ("cmd+w", "Close Editor"),
    ("ctrl+w", "Close Editor"),
    ("cmd+shift+w", "Close Window"),
    ("ctrl+shift+w", "Close Window"),
    // Edit operations
    ("cmd+z", "Undo"),
    ("ctrl+z", "Undo"),
    ("cmd+shift+z", "Redo"),
    ("ctrl+shift+z", "Redo"),
    ("ctrl+y", "Redo"),
    ("cmd+x", "Cut"),
    ("ctrl+x", "Cut"),
    ("cmd+c", "Copy"),
    ("ctrl+c", "Copy"),
    ("cmd+v", "Paste"),
    ("ctrl+v", "Paste"),
    ("cmd+a", "Select All"),
    ("ctrl+a", "Select All"),
    ("cmd+f", "Find"),
    ("ctrl+f", "Find"),
    ("cmd+h", "Replace / Hide Window"),
    ("ctrl+h", "Replace"),
    ("cmd+shift+f", "Find in Files"),
    ("ctrl+shift+f", "Find in Files"),
    ("cmd+shift+h", "Replace in Files"),
    ("ctrl+shift+h", "Replace in Files"),
    // Navigation
    ("cmd+p", "Quick Open"),
    ("ctrl+p", "Quick Open"),
    ("cmd+shift+p", "Show Command Palette"),
    ("ctrl+shift+p", "Show Command Palette"),
    ("f1", "Show Command Palette"),
    ("cmd+shift+o", "Go to Symbol in Editor"),
    ("ctrl+shift+o", "Go to Symbol in Editor"),
    ("cmd+t", "Go to Symbol in Workspace"),
    ("ctrl+t", "Go to Symbol in Workspace"),
    ("cmd+g", "Go to Line"),
    ("ctrl+g", "Go to Line"),
    ("cmd+shift+e", "Show Explorer"),
    ("ctrl+shift+e", "Show Explorer"),
    ("cmd+shift+g", "Show Source Control"),
    ("ctrl+shift+g", "Show Source Control"),
    ("cmd+shift+d", "Show Run and Debug"),
    ("ctrl+shift+d", "Show Run and Debug"),
    ("cmd+shift+x", "Show Extensions"),
    ("ctrl+shift+x", "Show Extensions"),
    // Editor
    ("cmd+shift+k", "Delete Line"),
    ("ctrl+shift+k", "Delete Line"),
    ("cmd+shift+enter", "Insert Line Above"),
    ("ctrl+shift+enter", "Insert Line Above"),
    ("cmd+enter", "Insert Line Below"),
    ("ctrl+enter", "Insert Line Below"),
    ("alt+up", "Move Line Up"),
    ("alt+down", "Move Line Down"),
    ("shift+alt+up", "Copy Line Up"),
    ("shift+alt+down", "Copy Line Down"),
    ("cmd+/", "Toggle Line Comment"),
    ("ctrl+/", "Toggle Line Comment"),
    ("cmd+shift+/", "Toggle Block Comment"),
    ("ctrl+shift+/", "Toggle Block Comment"),
    ("cmd+]", "Indent Line"),
    ("ctrl+]", "Indent Line"),
    ("cmd+[", "Outdent Line"),
    ("ctrl+[", "Outdent Line"),
    // Multi-cursor
    ("cmd+d", "Add Selection to Next Find Match"),
    ("ctrl+d", "Add Selection to Next Find Match"),
    ("cmd+shift+l", "Select All Occurrences"),
    ("ctrl+shift+l", "Select All Occurrences"),
    ("cmd+alt+up", "Add Cursor Above"),
    ("ctrl+alt+up", "Add Cursor Above"),
    ("cmd+alt+down", "Add Cursor Below"),
    ("ctrl+alt+down", "Add Cursor Below"),
    // Terminal
    ("ctrl+`", "Toggle Terminal"),
    ("cmd+shift+`", "New Terminal"),
    ("ctrl+shift+`", "New Terminal"),
    // View
    ("cmd+b", "Toggle Sidebar"),
    ("ctrl+b", "Toggle Sidebar"),
    ("cmd+shift+v", "Open Markdown Preview"),
    ("ctrl+shift+v", "Open Markdown Preview"),
    ("cmd+=", "Zoom In"),
    ("ctrl+=", "Zoom In"),
    ("cmd+-", "Zoom Out"),
    ("ctrl+-", "Zoom Out"),
    ("cmd+0", "Reset Zoom"),
    ("ctrl+0", "Reset Zoom"),
    // Split editor
    ("cmd+\\", "Split Editor"),
    ("ctrl+\\", "Split Editor"),
    ("cmd+1", "Focus First Editor Group"),
    ("ctrl+1", "Focus First Editor Group"),
    ("cmd+2", "Focus Second Editor Group"),
    ("ctrl+2", "Focus Second Editor Group"),
    ("cmd+3", "Focus Third Editor Group"),
    ("ctrl+3", "Focus Third Editor Group"),
    // Debug
    ("f5", "Start Debugging"),
    ("shift+f5", "Stop Debugging"),
    ("f9", "Toggle Breakpoint"),
    ("f10", "Step Over"),
    ("f11", "Step Into"),
    ("shift+f11", "Step Out"),
    // Quick fix, rename, definitions
    ("cmd+.", "Quick Fix"),
    ("ctrl+.", "Quick Fix"),
    ("f2", "Rename Symbol"),
    ("f12", "Go to Definition"),
    ("cmd+f12", "Go to Implementation"),
    ("ctrl+f12", "Go to Implementation"),
    ("shift+f12", "Show References"),
    // Application and window
    ("cmd+q", "Quit"),
    ("alt+f4", "Quit"),
    ("cmd+r", "Reload"),
    ("ctrl+r", "Reload"),
    ("cmd+shift+r", "Hard Reload"),
    ("ctrl+shift+r", "Hard Reload"),
    ("cmd+m", "Minimize Window"),
    ("cmd+shift+m", "Show Problems"),
    ("ctrl+shift+m", "Show Problems"),
    // Formatting
    ("shift+alt+f", "Format Document"),
    // Tab navigation
    ("cmd+alt+left", "Previous Editor"),
    ("cmd+alt+right", "Next Editor"),
    ("ctrl+tab", "Open Next Recently Used Editor"),
    ("ctrl+shift+tab", "Open Previous Recently Used Editor"),
    // Folding
    ("cmd+alt+[", "Fold Region"),
    ("ctrl+shift+[", "Fold Region"),
    ("cmd+alt+]", "Unfold Region"),
    ("ctrl+shift+]", "Unfold Region"),
    // Bare keys
    ("esc", "Cancel / Close"),
    ("enter", "Accept"),
    ("tab", "Indent / Next"),
    ("shift+tab", "Outdent / Previous"),
];

/// Read-only lookup from canonical chord to built-in command description
#[derive(Debug, Clone)]
pub struct DefaultKeybindingTable {
    entries: HashMap<String, String>,
}

impl DefaultKeybindingTable {
    /// The host editor's built-in bindings, shared for the process lifetime
    pub fn builtin() -> &'static DefaultKeybindingTable {
        static TABLE: OnceLock<DefaultKeybindingTable> = OnceLock::new();
        TABLE.get_or_init(|| Self::from_pairs(BUILTIN_KEYBINDINGS.iter().copied()))
    }

    /// Build a table from `(canonical chord, description)` pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// An empty table
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Look up an already-normalized chord
    pub fn lookup(&self, normalized: &str) -> Option<&str> {
        self.entries.get(normalized).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybindings::keys::normalize;

    #[test]
    fn test_builtin_lookup() {
        let table = DefaultKeybindingTable::builtin();
        assert_eq!(table.lookup("cmd+s"), Some("Save File"));
        assert_eq!(table.lookup("ctrl+shift+p"), Some("Show Command Palette"));
        assert_eq!(table.lookup("ctrl+alt+t"), None);
    }

    #[test]
    fn test_builtin_keys_are_canonical() {
        // Every key must be reachable by a normalized lookup
        for (chord, _) in BUILTIN_KEYBINDINGS {
            assert_eq!(&normalize(chord), chord, "non-canonical entry {chord}");
        }
    }

    #[test]
    fn test_custom_table() {
        let table = DefaultKeybindingTable::from_pairs([("ctrl+k", "Custom")]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("ctrl+k"), Some("Custom"));
        assert!(DefaultKeybindingTable::empty().is_empty());
    }
}
