//! Boolean settings and shortcut mappings
//!
//! This module provides the settings side of the tool:
//!
//! - `store` - user / workspace `settings.json` access behind [`ConfigurationStore`]
//! - `toggler` - toggle, set-true and set-false for boolean settings
//! - `mappings` - the persisted list of setting shortcuts
//! - `metadata` - discovery of boolean settings declared by installed extensions
//! - `snippet` - keybinding snippets for a setting, copied to the clipboard

pub mod mappings;
pub mod metadata;
pub mod snippet;
pub mod store;
pub mod toggler;

pub use mappings::{Mapping, MappingStore};
pub use metadata::{BooleanSettingMeta, BooleanSettingSource, ExtensionManifestSource};
pub use store::{ConfigurationStore, JsonSettingsStore};
pub use toggler::{update_boolean_setting, ToggleMode};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Configuration key holding the mapping list
pub const MAPPINGS_KEY: &str = "shortcut-settings.mappings";

/// Scope a setting value is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WriteTarget {
    /// User settings (global)
    #[default]
    User,
    /// Workspace settings (`.vscode/settings.json`)
    Workspace,
}

impl fmt::Display for WriteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteTarget::User => write!(f, "user"),
            WriteTarget::Workspace => write!(f, "workspace"),
        }
    }
}

/// Argument bundle accepted by the toggle commands
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandArgs {
    /// Dotted setting key, e.g. `editor.minimap.enabled`
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<WriteTarget>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl CommandArgs {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            target: None,
            title: None,
        }
    }

    pub fn target(mut self, target: Option<WriteTarget>) -> Self {
        self.target = target;
        self
    }

    pub fn title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Arguments as written into a keybinding entry
    ///
    /// The target is always spelled out (defaulting to `user`) so bindings
    /// written by this tool match each other on replace and delete.
    pub fn binding_args(&self) -> Value {
        let mut args = Map::new();
        args.insert("key".to_string(), Value::String(self.key.clone()));
        args.insert(
            "target".to_string(),
            Value::String(self.target.unwrap_or_default().to_string()),
        );
        if let Some(title) = &self.title {
            args.insert("title".to_string(), Value::String(title.clone()));
        }
        Value::Object(args)
    }
}

/// Title shown for a setting: the trimmed title, or the key when blank
pub fn normalize_title(key: &str, title: Option<&str>) -> String {
    match title.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
        _ => key.to_string(),
    }
}

/// Derive a camelCase mapping id from a setting key
///
/// `editor.minimap.enabled` becomes `editorMinimapEnabled`.
pub fn derive_id_from_key(key: &str) -> String {
    let mut parts = key
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty());

    let Some(first) = parts.next() else {
        return key.to_string();
    };

    let mut id = first.to_lowercase();
    for part in parts {
        let mut chars = part.chars();
        if let Some(head) = chars.next() {
            id.extend(head.to_uppercase());
            id.push_str(chars.as_str());
        }
    }
    id
}
