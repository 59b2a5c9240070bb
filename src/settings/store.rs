//! Settings file access
//!
//! The editor keeps settings as a flat JSON object of dotted keys in two
//! scopes: the user `settings.json` and the workspace `.vscode/settings.json`.
//! Both may contain comments. Lookups resolve workspace, then user, then the
//! schema default declared by the owning extension.
//!
//! Writes rewrite the whole scope file as pretty JSON, dropping comments. A
//! settings file that exists but cannot be parsed is never overwritten.

use super::metadata::BooleanSettingMeta;
use super::WriteTarget;
use crate::core::error::{Result, ShortcutError};
use crate::keybindings::jsonc::parse_jsonc;
use crate::keybindings::paths::EditorPaths;
use log::{debug, info, warn};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key/value configuration with user and workspace write scopes
pub trait ConfigurationStore {
    /// Effective value of a setting
    fn get(&self, key: &str) -> Option<Value>;

    /// Persist a setting value in the given scope
    fn update(&self, key: &str, value: Value, target: WriteTarget) -> Result<()>;
}

/// [`ConfigurationStore`] over the editor's settings.json files
#[derive(Debug, Clone, Default)]
pub struct JsonSettingsStore {
    user_file: Option<PathBuf>,
    workspace_file: Option<PathBuf>,
    defaults: HashMap<String, Value>,
}

impl JsonSettingsStore {
    /// Store over explicit user and workspace files
    pub fn new(user_file: Option<PathBuf>, workspace_file: Option<PathBuf>) -> Self {
        Self {
            user_file,
            workspace_file,
            defaults: HashMap::new(),
        }
    }

    /// Store over the resolved editor paths
    pub fn from_paths(paths: &EditorPaths) -> Self {
        Self::new(
            paths.user_settings_file.clone(),
            paths.workspace_settings_file.clone(),
        )
    }

    /// Register schema defaults used when neither scope sets a value
    pub fn with_defaults<'a>(mut self, settings: impl IntoIterator<Item = &'a BooleanSettingMeta>) -> Self {
        for setting in settings {
            if let Some(default) = setting.default_value {
                self.defaults
                    .entry(setting.key.clone())
                    .or_insert(Value::Bool(default));
            }
        }
        self
    }

    /// File backing a scope
    pub fn file_for(&self, target: WriteTarget) -> Option<&Path> {
        match target {
            WriteTarget::User => self.user_file.as_deref(),
            WriteTarget::Workspace => self.workspace_file.as_deref(),
        }
    }

    /// Value explicitly set in one scope
    pub fn get_at(&self, key: &str, target: WriteTarget) -> Option<Value> {
        let path = self.file_for(target)?;
        match read_settings(path) {
            Ok(mut settings) => settings.remove(key),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }
}

impl ConfigurationStore for JsonSettingsStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, WriteTarget::Workspace)
            .or_else(|| self.get_at(key, WriteTarget::User))
            .or_else(|| self.defaults.get(key).cloned())
    }

    fn update(&self, key: &str, value: Value, target: WriteTarget) -> Result<()> {
        let path = match target {
            WriteTarget::User => self
                .user_file
                .as_deref()
                .ok_or(ShortcutError::SettingsPathNotFound)?,
            WriteTarget::Workspace => self
                .workspace_file
                .as_deref()
                .ok_or_else(|| ShortcutError::WorkspaceUnavailable(key.to_string()))?,
        };

        let mut settings = read_settings(path)?;
        debug!("Setting {} = {} in {} settings", key, value, target);
        settings.insert(key.to_string(), value);

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| ShortcutError::io(dir, e))?;
            }
        }

        let content = serde_json::to_string_pretty(&Value::Object(settings))?;
        fs::write(path, content).map_err(|e| ShortcutError::io(path, e))?;
        info!("Updated {} in {}", key, path.display());
        Ok(())
    }
}

/// Read a settings file as an object
///
/// A missing or blank file is an empty object.
fn read_settings(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }

    let content = fs::read_to_string(path).map_err(|e| ShortcutError::io(path, e))?;
    match parse_jsonc(&content) {
        Ok(Some(Value::Object(settings))) => Ok(settings),
        Ok(None) => Ok(Map::new()),
        Ok(Some(_)) => Err(ShortcutError::UnreadableSettings {
            path: path.to_path_buf(),
            message: "top level is not an object".to_string(),
        }),
        Err(e) => Err(ShortcutError::UnreadableSettings {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}
