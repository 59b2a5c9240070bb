//! Persisted setting shortcuts
//!
//! Mappings are stored as an array under the `shortcut-settings.mappings`
//! configuration key. They are always saved to user settings, whatever
//! target each mapping itself writes to.

use super::store::ConfigurationStore;
use super::{derive_id_from_key, normalize_title, WriteTarget, MAPPINGS_KEY};
use crate::core::error::{Result, ShortcutError};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// A boolean setting the user wants quick access to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub id: String,

    /// Dotted setting key
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<WriteTarget>,
}

impl Mapping {
    /// New mapping with an id derived from the setting key
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            id: derive_id_from_key(&key),
            key,
            title: None,
            target: None,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_target(mut self, target: Option<WriteTarget>) -> Self {
        self.target = target;
        self
    }

    /// Title shown in pickers
    pub fn label(&self) -> String {
        normalize_title(&self.key, self.title.as_deref())
    }

    /// Scope the mapped setting is written to
    pub fn effective_target(&self) -> WriteTarget {
        self.target.unwrap_or_default()
    }
}

/// List operations over the mapping array of a [`ConfigurationStore`]
pub struct MappingStore<'a, S: ConfigurationStore + ?Sized> {
    config: &'a S,
}

impl<'a, S: ConfigurationStore + ?Sized> MappingStore<'a, S> {
    pub fn new(config: &'a S) -> Self {
        Self { config }
    }

    /// All stored mappings; anything other than an array reads as empty
    ///
    /// Entries that do not parse as a [`Mapping`] are left out here but stay
    /// in the stored array.
    pub fn list(&self) -> Vec<Mapping> {
        self.items()
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Mapping>(item) {
                Ok(mapping) => Some(mapping),
                Err(e) => {
                    warn!("Skipping malformed mapping: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Append a mapping; a setting key can only be mapped once
    pub fn add(&self, mapping: Mapping) -> Result<()> {
        let mut items = self.items();
        if items.iter().any(|item| item_field(item, "key") == Some(mapping.key.as_str())) {
            return Err(ShortcutError::MappingExists(mapping.key));
        }
        info!("Adding mapping {} for {}", mapping.id, mapping.key);
        items.push(serde_json::to_value(&mapping)?);
        self.save(items)
    }

    /// Replace the title and target of the mapping with `id`
    ///
    /// Other fields of the stored entry are kept.
    pub fn update(&self, id: &str, title: Option<String>, target: Option<WriteTarget>) -> Result<()> {
        let mut items = self.items();
        let entry = items
            .iter_mut()
            .find(|item| item_field(item, "id") == Some(id))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| ShortcutError::MappingNotFound(id.to_string()))?;

        match title {
            Some(title) => entry.insert("title".to_string(), Value::String(title)),
            None => entry.remove("title"),
        };
        match target {
            Some(target) => entry.insert("target".to_string(), Value::String(target.to_string())),
            None => entry.remove("target"),
        };
        info!("Updated mapping {}", id);
        self.save(items)
    }

    /// Remove the mapping with `id`
    pub fn remove(&self, id: &str) -> Result<()> {
        self.remove_many(&[id.to_string()]).map(|_| ())
    }

    /// Remove every mapping whose id is listed and return how many were removed
    ///
    /// Fails with [`ShortcutError::MappingNotFound`] when none of the ids is
    /// stored, leaving the settings untouched.
    pub fn remove_many(&self, ids: &[String]) -> Result<usize> {
        let doomed: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut items = self.items();
        let before = items.len();
        items.retain(|item| !item_field(item, "id").is_some_and(|id| doomed.contains(id)));

        let removed = before - items.len();
        if removed == 0 {
            return Err(ShortcutError::MappingNotFound(ids.join(", ")));
        }
        info!("Removing {} mapping(s)", removed);
        self.save(items)?;
        Ok(removed)
    }

    /// The stored array as raw entries
    fn items(&self) -> Vec<Value> {
        match self.config.get(MAPPINGS_KEY) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                warn!("{} is not an array; treating as empty", MAPPINGS_KEY);
                debug!("Found: {}", other);
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn save(&self, items: Vec<Value>) -> Result<()> {
        let count = items.len();
        self.config.update(MAPPINGS_KEY, Value::Array(items), WriteTarget::User)?;
        debug!("Saved {} mapping entries", count);
        Ok(())
    }
}

fn item_field<'v>(item: &'v Value, field: &str) -> Option<&'v str> {
    item.get(field).and_then(Value::as_str)
}
