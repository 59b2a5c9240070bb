//! Keybinding file store
//!
//! Reads and rewrites the user's `keybindings.json`: a JSON array of binding
//! records, possibly decorated with comments and trailing commas.
//!
//! Every mutation is a full read → mutate → serialize → overwrite cycle. Nothing
//! is cached between calls, and there is no locking: if the editor writes the
//! file between our read and our write, our write wins and the interleaved edit
//! is lost. Rewrites are pretty-printed JSON, so comments in the original file
//! do not survive a mutation.
//!
//! Reads never fail. A missing, unreadable, unparsable or non-array file reads
//! as an empty list.
//!
//! ```rust,no_run
//! use shortcut_settings::keybindings::{BindingRecord, InsertMode, KeybindingFileStore};
//! use serde_json::json;
//!
//! # fn main() -> shortcut_settings::core::error::Result<()> {
//! let store = KeybindingFileStore::new("/home/me/.config/Code/User/keybindings.json");
//! let record = BindingRecord::new(
//!     "ctrl+alt+m",
//!     "shortcut-settings.toggle",
//!     json!({ "key": "editor.minimap.enabled" }),
//! );
//! store.insert(&record, InsertMode::Replace)?;
//! # Ok(())
//! # }
//! ```

use super::jsonc::parse_jsonc;
use super::keys::KeyChord;
use super::paths::EditorPaths;
use crate::core::error::{Result, ShortcutError};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// BindingRecord
// =============================================================================

/// Fields with a typed slot in [`BindingRecord`]
const RECORD_FIELDS: &[&str] = &["key", "command", "args", "when"];

/// One entry of the keybindings file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingRecord {
    /// Keybinding as stored (not normalized)
    #[serde(default)]
    pub key: String,

    /// Command to run
    #[serde(default)]
    pub command: String,

    /// Command arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,

    /// Context clause
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,

    /// Any other fields present in the file
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BindingRecord {
    /// Create a record without a `when` clause
    pub fn new(key: impl Into<String>, command: impl Into<String>, args: Value) -> Self {
        Self {
            key: key.into(),
            command: command.into(),
            args: Some(args),
            when: None,
            extra: Map::new(),
        }
    }

    /// Set the `when` clause
    pub fn when(mut self, when: impl Into<String>) -> Self {
        self.when = Some(when.into());
        self
    }

    /// Parsed form of `key`
    pub fn chord(&self) -> KeyChord {
        KeyChord::parse(&self.key)
    }

    /// Read a raw entry leniently
    ///
    /// Fields of the wrong type read as absent instead of discarding the entry,
    /// so a hand-edited entry still takes part in conflict checks. Only
    /// non-object entries are skipped.
    fn from_value(value: &Value) -> Option<Self> {
        let Some(entry) = value.as_object() else {
            debug!("Skipping non-object keybinding entry {}", value);
            return None;
        };
        let text = |field: &str| entry.get(field).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            key: text("key").unwrap_or_default(),
            command: text("command").unwrap_or_default(),
            args: entry.get("args").filter(|args| !args.is_null()).cloned(),
            when: text("when"),
            extra: entry
                .iter()
                .filter(|(name, _)| !RECORD_FIELDS.contains(&name.as_str()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        })
    }
}

/// Compare two argument values by their serialized form
///
/// Object keys are compared in insertion order, so `{"a":1,"b":2}` and
/// `{"b":2,"a":1}` are different arguments.
pub fn args_equal(stored: Option<&Value>, args: Option<&Value>) -> bool {
    stored.map(Value::to_string) == args.map(Value::to_string)
}

fn entry_matches(entry: &Value, command: &str, args: Option<&Value>) -> bool {
    entry.get("command").and_then(Value::as_str) == Some(command)
        && args_equal(entry.get("args"), args)
}

// =============================================================================
// InsertMode / InsertOutcome
// =============================================================================

/// How [`KeybindingFileStore::insert`] treats an existing entry for the same command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InsertMode {
    /// Re-key the first entry with the same command and args, else append
    #[default]
    Replace,
    /// Always append
    Add,
}

impl fmt::Display for InsertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertMode::Replace => write!(f, "replace"),
            InsertMode::Add => write!(f, "add"),
        }
    }
}

/// What an insert did to the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// An existing entry at `index` was re-keyed
    Replaced { index: usize, previous_key: String },
    /// A new entry was appended at `index`
    Appended { index: usize },
}

// =============================================================================
// KeybindingFileStore
// =============================================================================

/// Access to the user's keybindings file
#[derive(Debug, Clone)]
pub struct KeybindingFileStore {
    path: Option<PathBuf>,
}

impl KeybindingFileStore {
    /// Store over an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Store over the resolved editor keybindings path, if any
    pub fn from_paths(paths: &EditorPaths) -> Self {
        Self {
            path: paths.keybindings_file.clone(),
        }
    }

    /// Store for which no file location is known
    ///
    /// Reads return nothing and mutations fail with
    /// [`ShortcutError::KeybindingsPathNotFound`].
    pub fn unlocated() -> Self {
        Self { path: None }
    }

    /// The file path, if known
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn require_path(&self) -> Result<&Path> {
        self.path().ok_or(ShortcutError::KeybindingsPathNotFound)
    }

    /// Create the file (and its directories) containing `[]` if it is missing
    pub fn ensure_exists(&self) -> Result<PathBuf> {
        let path = self.require_path()?;

        if !path.exists() {
            if let Some(dir) = path.parent() {
                if !dir.as_os_str().is_empty() && !dir.exists() {
                    fs::create_dir_all(dir).map_err(|e| ShortcutError::io(dir, e))?;
                }
            }
            fs::write(path, "[]").map_err(|e| ShortcutError::io(path, e))?;
            info!("Created new keybindings file at {}", path.display());
        }

        Ok(path.to_path_buf())
    }

    /// Snapshot of all well-formed records in file order
    pub fn list_all(&self) -> Vec<BindingRecord> {
        match self.path() {
            Some(path) => read_entries(path)
                .iter()
                .filter_map(BindingRecord::from_value)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Write a binding into the file
    ///
    /// In [`InsertMode::Replace`] the first entry whose `command` and `args`
    /// equal the record's gets the record's `key`, keeping its position and any
    /// other fields. Without such an entry, and always in [`InsertMode::Add`],
    /// the record is appended.
    pub fn insert(&self, record: &BindingRecord, mode: InsertMode) -> Result<InsertOutcome> {
        let path = self.ensure_exists()?;
        let mut entries = read_entries(&path);
        debug!(
            "Inserting {} -> {} ({} mode, {} existing entries)",
            record.key,
            record.command,
            mode,
            entries.len()
        );

        let existing = match mode {
            InsertMode::Replace => entries
                .iter()
                .position(|entry| entry_matches(entry, &record.command, record.args.as_ref())),
            InsertMode::Add => None,
        };

        let outcome = match existing {
            Some(index) => {
                let previous_key = entries[index]
                    .get("key")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                if let Some(entry) = entries[index].as_object_mut() {
                    entry.insert("key".to_string(), Value::String(record.key.clone()));
                }
                info!(
                    "Replaced keybinding at index {}: {} -> {}",
                    index, previous_key, record.key
                );
                InsertOutcome::Replaced {
                    index,
                    previous_key,
                }
            }
            None => {
                entries.push(serde_json::to_value(record)?);
                let index = entries.len() - 1;
                info!("Added keybinding {} at index {}", record.key, index);
                InsertOutcome::Appended { index }
            }
        };

        write_entries(&path, &entries)?;
        Ok(outcome)
    }

    /// Remove the first entry whose stored `key`, `command` and `args` all match
    ///
    /// `key` is compared verbatim, not normalized. Returns `false` when nothing
    /// matched, in which case the file is left untouched.
    pub fn delete(&self, key: &str, command: &str, args: &Value) -> Result<bool> {
        let path = self.require_path()?;

        if !path.exists() {
            debug!("Keybindings file {} does not exist", path.display());
            return Ok(false);
        }

        let mut entries = read_entries(path);
        let found = entries.iter().position(|entry| {
            entry.get("key").and_then(Value::as_str) == Some(key)
                && entry_matches(entry, command, Some(args))
        });

        let Some(index) = found else {
            debug!("No keybinding {} -> {} to delete", key, command);
            return Ok(false);
        };

        entries.remove(index);
        write_entries(path, &entries)?;
        info!(
            "Deleted keybinding {} -> {} ({} entries remain)",
            key,
            command,
            entries.len()
        );
        Ok(true)
    }
}

/// Read the file as a list of raw entries
///
/// Entries are kept as raw JSON so unknown fields and odd entries survive a
/// rewrite untouched.
fn read_entries(path: &Path) -> Vec<Value> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("Cannot read keybindings file {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match parse_jsonc(&content) {
        Ok(Some(Value::Array(entries))) => entries,
        Ok(Some(_)) => {
            warn!(
                "Keybindings file {} is not a JSON array; treating it as empty",
                path.display()
            );
            Vec::new()
        }
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(
                "Failed to parse keybindings file {}: {}; treating it as empty",
                path.display(),
                e
            );
            Vec::new()
        }
    }
}

fn write_entries(path: &Path, entries: &[Value]) -> Result<()> {
    let content = serde_json::to_string_pretty(entries)?;
    fs::write(path, content).map_err(|e| ShortcutError::io(path, e))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const TOGGLE: &str = "shortcut-settings.toggle";

    fn store_in(temp_dir: &TempDir) -> KeybindingFileStore {
        KeybindingFileStore::new(temp_dir.path().join("User").join("keybindings.json"))
    }

    fn raw_file(store: &KeybindingFileStore) -> Value {
        let content = fs::read_to_string(store.path().unwrap()).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[test]
    fn test_ensure_exists_creates_directories_and_empty_array() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let path = store.ensure_exists().unwrap();
        assert!(path.exists());
        assert_eq!(fs::read_to_string(path).unwrap(), "[]");
    }

    #[test]
    fn test_insert_replace_into_empty_file_appends() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let record = BindingRecord::new("ctrl+alt+t", TOGGLE, json!({ "key": "x" }));
        let outcome = store.insert(&record, InsertMode::Replace).unwrap();

        assert_eq!(outcome, InsertOutcome::Appended { index: 0 });
        assert_eq!(
            raw_file(&store),
            json!([{ "key": "ctrl+alt+t", "command": TOGGLE, "args": { "key": "x" } }])
        );
    }

    #[test]
    fn test_insert_replace_rekeys_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        store
            .insert(
                &BindingRecord::new("ctrl+alt+t", TOGGLE, json!({ "key": "x" })),
                InsertMode::Replace,
            )
            .unwrap();
        let outcome = store
            .insert(
                &BindingRecord::new("ctrl+alt+u", TOGGLE, json!({ "key": "x" })),
                InsertMode::Replace,
            )
            .unwrap();

        assert_eq!(
            outcome,
            InsertOutcome::Replaced {
                index: 0,
                previous_key: "ctrl+alt+t".to_string()
            }
        );
        let records = store.list_all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "ctrl+alt+u");
    }

    #[test]
    fn test_insert_replace_keeps_position_and_when() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.ensure_exists().unwrap();
        fs::write(
            store.path().unwrap(),
            r#"[
                { "key": "ctrl+1", "command": "other" },
                { "key": "ctrl+2", "command": "shortcut-settings.toggle", "args": { "key": "x" }, "when": "editorFocus" },
                { "key": "ctrl+3", "command": "third" }
            ]"#,
        )
        .unwrap();

        let outcome = store
            .insert(
                &BindingRecord::new("ctrl+9", TOGGLE, json!({ "key": "x" })),
                InsertMode::Replace,
            )
            .unwrap();

        assert!(matches!(outcome, InsertOutcome::Replaced { index: 1, .. }));
        let records = store.list_all();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].key, "ctrl+9");
        assert_eq!(records[1].when.as_deref(), Some("editorFocus"));
        assert_eq!(records[2].command, "third");
    }

    #[test]
    fn test_insert_add_always_appends() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let record = BindingRecord::new("ctrl+alt+t", TOGGLE, json!({ "key": "x" }));

        store.insert(&record, InsertMode::Replace).unwrap();
        let before = store.list_all().len();
        store.insert(&record, InsertMode::Add).unwrap();
        store.insert(&record, InsertMode::Add).unwrap();

        let records = store.list_all();
        assert_eq!(records.len(), before + 2);
        assert!(records.iter().all(|r| r == &record));
    }

    #[test]
    fn test_insert_args_order_sensitive() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        store
            .insert(
                &BindingRecord::new("ctrl+1", TOGGLE, json!({ "key": "x", "target": "user" })),
                InsertMode::Replace,
            )
            .unwrap();
        let reordered: Value = serde_json::from_str(r#"{ "target": "user", "key": "x" }"#).unwrap();
        let outcome = store
            .insert(
                &BindingRecord::new("ctrl+2", TOGGLE, reordered),
                InsertMode::Replace,
            )
            .unwrap();

        assert_eq!(outcome, InsertOutcome::Appended { index: 1 });
    }

    #[test]
    fn test_insert_over_jsonc_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.ensure_exists().unwrap();
        fs::write(
            store.path().unwrap(),
            "// Place your key bindings in this file\n[\n  { \"key\": \"ctrl+k\", \"command\": \"a\" }, // note\n]\n",
        )
        .unwrap();

        store
            .insert(
                &BindingRecord::new("ctrl+j", "b", json!({})),
                InsertMode::Replace,
            )
            .unwrap();

        let content = fs::read_to_string(store.path().unwrap()).unwrap();
        assert!(!content.contains("//"));
        assert_eq!(store.list_all().len(), 2);
    }

    #[test]
    fn test_insert_preserves_unknown_entries() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.ensure_exists().unwrap();
        fs::write(
            store.path().unwrap(),
            r#"[{ "key": "ctrl+k", "command": "-editor.action.x", "when": 3, "custom": true }]"#,
        )
        .unwrap();

        store
            .insert(
                &BindingRecord::new("ctrl+j", "b", json!({})),
                InsertMode::Add,
            )
            .unwrap();

        let raw = raw_file(&store);
        assert_eq!(raw[0]["when"], json!(3));
        assert_eq!(raw[0]["custom"], json!(true));
    }

    #[test]
    fn test_insert_into_corrupt_file_starts_over() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.ensure_exists().unwrap();
        fs::write(store.path().unwrap(), "[ { \"key\": ").unwrap();

        store
            .insert(
                &BindingRecord::new("ctrl+j", "b", json!({})),
                InsertMode::Replace,
            )
            .unwrap();

        assert_eq!(store.list_all().len(), 1);
    }

    #[test]
    fn test_delete_removes_first_match_only() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let record = BindingRecord::new("ctrl+alt+t", TOGGLE, json!({ "key": "x" }));
        store.insert(&record, InsertMode::Add).unwrap();
        store.insert(&record, InsertMode::Add).unwrap();

        let removed = store.delete("ctrl+alt+t", TOGGLE, &json!({ "key": "x" })).unwrap();

        assert!(removed);
        assert_eq!(store.list_all().len(), 1);
    }

    #[test]
    fn test_delete_requires_exact_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store
            .insert(
                &BindingRecord::new("ctrl+alt+t", TOGGLE, json!({ "key": "x" })),
                InsertMode::Add,
            )
            .unwrap();
        let before = raw_file(&store);

        let removed = store.delete("alt+ctrl+t", TOGGLE, &json!({ "key": "x" })).unwrap();

        assert!(!removed);
        assert_eq!(raw_file(&store), before);
    }

    #[test]
    fn test_delete_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        assert!(!store.delete("ctrl+a", TOGGLE, &json!({})).unwrap());
        assert!(store.path().map(|p| !p.exists()).unwrap());
    }

    #[test]
    fn test_list_all_degrades_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        assert!(store.list_all().is_empty());

        store.ensure_exists().unwrap();
        fs::write(store.path().unwrap(), "{ \"not\": \"an array\" }").unwrap();
        assert!(store.list_all().is_empty());

        fs::write(store.path().unwrap(), "not json at all").unwrap();
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn test_list_all_keeps_entries_with_odd_field_types() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.ensure_exists().unwrap();
        fs::write(
            store.path().unwrap(),
            r#"[
                { "key": "ctrl+alt+q", "command": "x", "when": 3 },
                { "key": "ctrl+alt+w", "command": null, "args": null, "source": "me" },
                "not an entry"
            ]"#,
        )
        .unwrap();

        let records = store.list_all();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, "ctrl+alt+q");
        assert_eq!(records[0].command, "x");
        assert_eq!(records[0].when, None);
        assert_eq!(records[1].key, "ctrl+alt+w");
        assert_eq!(records[1].command, "");
        assert_eq!(records[1].args, None);
        assert_eq!(records[1].extra.get("source"), Some(&json!("me")));
    }

    #[test]
    fn test_unlocated_store() {
        let store = KeybindingFileStore::unlocated();
        assert!(store.list_all().is_empty());
        let result = store.insert(&BindingRecord::new("a", "b", json!({})), InsertMode::Add);
        assert!(matches!(result, Err(ShortcutError::KeybindingsPathNotFound)));
        assert!(matches!(
            store.delete("a", "b", &json!({})),
            Err(ShortcutError::KeybindingsPathNotFound)
        ));
    }

    #[test]
    fn test_written_file_is_two_space_indented() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store
            .insert(
                &BindingRecord::new("ctrl+alt+t", TOGGLE, json!({ "key": "x" })),
                InsertMode::Add,
            )
            .unwrap();

        let content = fs::read_to_string(store.path().unwrap()).unwrap();
        assert!(content.starts_with("[\n  {\n    \"key\": \"ctrl+alt+t\","));
    }

    #[test]
    fn test_args_equal() {
        assert!(args_equal(Some(&json!({ "key": "x" })), Some(&json!({ "key": "x" }))));
        assert!(args_equal(None, None));
        assert!(!args_equal(None, Some(&json!({ "key": "x" }))));
        assert!(!args_equal(
            Some(&json!({ "key": "y" })),
            Some(&json!({ "key": "x" }))
        ));
    }
}
