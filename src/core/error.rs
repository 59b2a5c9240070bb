//! Error types for shortcut settings
//!
//! This module defines the error types used throughout the application.
//! Keybinding file read and parse failures are deliberately absent: those
//! degrade to an empty binding list instead of surfacing as errors.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for shortcut settings
#[derive(Error, Debug)]
pub enum ShortcutError {
    /// The editor's keybindings.json location could not be determined
    #[error("Unable to locate the keybindings.json file path")]
    KeybindingsPathNotFound,

    /// No user settings.json location is known
    #[error("Unable to locate the user settings.json file path")]
    SettingsPathNotFound,

    /// A settings file exists but is not a JSON object; it is never overwritten
    #[error("Settings file '{path}' could not be parsed: {message}")]
    UnreadableSettings { path: PathBuf, message: String },

    /// File system error with the path that caused it
    #[error("IO error on '{path}': {message}")]
    IoError { path: PathBuf, message: String },

    /// Failed to serialize data back to JSON
    #[error("Serialization failed: {0}")]
    SerializeError(String),

    /// A command was invoked without a setting key
    #[error("shortcut-settings: missing args.key")]
    MissingSettingKey,

    /// The setting exists but does not currently hold a boolean
    #[error("shortcut-settings: setting \"{key}\" is not boolean (current type: {found})")]
    NotBoolean { key: String, found: String },

    /// A workspace-scoped write was requested without a workspace
    #[error("No workspace folder is configured; cannot write \"{0}\" to workspace settings")]
    WorkspaceUnavailable(String),

    /// A mapping for this setting key is already stored
    #[error("Mapping for \"{0}\" already exists")]
    MappingExists(String),

    /// No mapping with this id is stored
    #[error("Mapping with id \"{0}\" not found")]
    MappingNotFound(String),

    /// The system clipboard could not be used
    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    /// Reading interactive input from the terminal failed
    #[error("Failed to read input: {0}")]
    PromptError(String),
}

impl ShortcutError {
    /// Build an I/O error carrying the offending path
    pub fn io(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ShortcutError::IoError {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ShortcutError>;

impl From<serde_json::Error> for ShortcutError {
    fn from(err: serde_json::Error) -> Self {
        ShortcutError::SerializeError(err.to_string())
    }
}

impl From<dialoguer::Error> for ShortcutError {
    fn from(err: dialoguer::Error) -> Self {
        ShortcutError::PromptError(err.to_string())
    }
}
