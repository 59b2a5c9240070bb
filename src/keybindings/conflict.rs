//! Keybinding conflict detection
//!
//! A candidate chord conflicts when it is one of the editor's built-in
//! shortcuts or is already bound in the user's keybindings file. Built-ins are
//! checked first and win. Within the user file the first matching entry in file
//! order is reported. `when` clauses are reported but not evaluated.

use super::defaults::DefaultKeybindingTable;
use super::keys::normalize;
use super::store::KeybindingFileStore;
use log::debug;
use serde::Serialize;
use std::fmt;

/// Fallback description for user entries that have no command
const UNKNOWN_COMMAND: &str = "unknown command";

/// Where a conflicting binding comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSource {
    /// The user's keybindings file
    User,
    /// The editor's built-in bindings
    Default,
}

impl fmt::Display for ConflictSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictSource::User => write!(f, "user"),
            ConflictSource::Default => write!(f, "default"),
        }
    }
}

/// Result of a conflict query
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictInfo {
    pub has_conflict: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ConflictSource>,
}

impl ConflictInfo {
    /// No conflict
    pub fn none() -> Self {
        Self::default()
    }

    /// Conflict with a built-in binding
    pub fn with_default(command: impl Into<String>) -> Self {
        Self {
            has_conflict: true,
            command: Some(command.into()),
            when: None,
            source: Some(ConflictSource::Default),
        }
    }

    /// Conflict with an entry of the user's file
    pub fn with_user(command: impl Into<String>, when: Option<String>) -> Self {
        Self {
            has_conflict: true,
            command: Some(command.into()),
            when,
            source: Some(ConflictSource::User),
        }
    }

    /// One-line human readable summary
    pub fn describe(&self) -> String {
        if !self.has_conflict {
            return "No conflict".to_string();
        }
        let command = self.command.as_deref().unwrap_or(UNKNOWN_COMMAND);
        let origin = match self.source {
            Some(ConflictSource::Default) => "built-in shortcut",
            Some(ConflictSource::User) | None => "your keybindings",
        };
        match self.when {
            Some(ref when) => format!("Conflicts with {}: {} (when: {})", origin, command, when),
            None => format!("Conflicts with {}: {}", origin, command),
        }
    }
}

/// Checks candidate chords against built-in and user bindings
#[derive(Debug, Clone)]
pub struct ConflictDetector<'a> {
    defaults: &'a DefaultKeybindingTable,
    store: &'a KeybindingFileStore,
}

impl<'a> ConflictDetector<'a> {
    /// Detector over the built-in table and the given store
    pub fn new(store: &'a KeybindingFileStore) -> Self {
        Self {
            defaults: DefaultKeybindingTable::builtin(),
            store,
        }
    }

    /// Detector over a custom built-in table
    pub fn with_defaults(defaults: &'a DefaultKeybindingTable, store: &'a KeybindingFileStore) -> Self {
        Self { defaults, store }
    }

    /// Check whether `raw` collides with an existing binding
    ///
    /// The user file is re-read on every call; read or parse failures count as
    /// "no user conflict".
    pub fn check_conflict(&self, raw: &str) -> ConflictInfo {
        let normalized = normalize(raw);
        debug!("Checking conflict for {} ({})", raw, normalized);

        if let Some(description) = self.defaults.lookup(&normalized) {
            debug!("Found built-in conflict: {}", description);
            return ConflictInfo::with_default(description);
        }

        let user_conflict = self
            .store
            .list_all()
            .into_iter()
            .filter(|record| !record.key.is_empty())
            .find(|record| record.chord().canonical() == normalized);

        match user_conflict {
            Some(record) => {
                debug!("Found user conflict: {} -> {}", record.key, record.command);
                let command = if record.command.is_empty() {
                    UNKNOWN_COMMAND.to_string()
                } else {
                    record.command
                };
                ConflictInfo::with_user(command, record.when)
            }
            None => ConflictInfo::none(),
        }
    }
}
