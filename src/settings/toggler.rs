//! Boolean setting toggler
//!
//! Flips or forces a boolean setting through a [`ConfigurationStore`].

use super::store::ConfigurationStore;
use super::{normalize_title, CommandArgs};
use crate::core::error::{Result, ShortcutError};
use crate::keybindings::{SET_FALSE_COMMAND, SET_TRUE_COMMAND, TOGGLE_COMMAND};
use log::{debug, info};
use serde_json::Value;
use std::fmt;

/// How the next value is computed from the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleMode {
    Toggle,
    SetTrue,
    SetFalse,
}

impl ToggleMode {
    /// Value written when the setting currently holds `current`
    pub fn next(self, current: bool) -> bool {
        match self {
            ToggleMode::Toggle => !current,
            ToggleMode::SetTrue => true,
            ToggleMode::SetFalse => false,
        }
    }

    /// Command id bound in keybindings.json for this mode
    pub fn command_id(self) -> &'static str {
        match self {
            ToggleMode::Toggle => TOGGLE_COMMAND,
            ToggleMode::SetTrue => SET_TRUE_COMMAND,
            ToggleMode::SetFalse => SET_FALSE_COMMAND,
        }
    }
}

impl fmt::Display for ToggleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleMode::Toggle => write!(f, "toggle"),
            ToggleMode::SetTrue => write!(f, "set-true"),
            ToggleMode::SetFalse => write!(f, "set-false"),
        }
    }
}

/// Update a boolean setting and return the value written
///
/// The key is trimmed before use. Settings that are unset or hold anything
/// other than a boolean are left untouched.
pub fn update_boolean_setting<S>(store: &S, args: &CommandArgs, mode: ToggleMode) -> Result<bool>
where
    S: ConfigurationStore + ?Sized,
{
    let key = args.key.trim();
    if key.is_empty() {
        return Err(ShortcutError::MissingSettingKey);
    }

    let current = match store.get(key) {
        Some(Value::Bool(current)) => current,
        other => {
            return Err(ShortcutError::NotBoolean {
                key: key.to_string(),
                found: type_name(other.as_ref()).to_string(),
            })
        }
    };

    let next = mode.next(current);
    let target = args.target.unwrap_or_default();
    debug!("{} {}: {} -> {} ({})", mode, key, current, next, target);

    store.update(key, Value::Bool(next), target)?;
    info!("{}", status_message(key, args.title.as_deref(), next));
    Ok(next)
}

/// Status line shown after an update, e.g. `Minimap: ON`
pub fn status_message(key: &str, title: Option<&str>, value: bool) -> String {
    format!("{}: {}", normalize_title(key, title), on_off(Some(value)))
}

/// `ON`, `OFF`, or `N/A` for a non-boolean value
pub fn on_off(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "ON",
        Some(false) => "OFF",
        None => "N/A",
    }
}

/// Type name reported for a non-boolean value
fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) | Some(Value::Array(_)) | Some(Value::Object(_)) => "object",
        Some(Value::String(_)) => "string",
        Some(Value::Number(_)) => "number",
        Some(Value::Bool(_)) => "boolean",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::WriteTarget;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory store recording every write
    #[derive(Default)]
    struct MemoryStore {
        values: RefCell<HashMap<String, Value>>,
        writes: RefCell<Vec<(String, Value, WriteTarget)>>,
    }

    impl MemoryStore {
        fn with(key: &str, value: Value) -> Self {
            let store = Self::default();
            store.values.borrow_mut().insert(key.to_string(), value);
            store
        }
    }

    impl ConfigurationStore for MemoryStore {
        fn get(&self, key: &str) -> Option<Value> {
            self.values.borrow().get(key).cloned()
        }

        fn update(&self, key: &str, value: Value, target: WriteTarget) -> Result<()> {
            self.values.borrow_mut().insert(key.to_string(), value.clone());
            self.writes.borrow_mut().push((key.to_string(), value, target));
            Ok(())
        }
    }

    #[test]
    fn test_toggle_flips_value() {
        let store = MemoryStore::with("editor.minimap.enabled", json!(true));
        let args = CommandArgs::new("editor.minimap.enabled");

        assert!(!update_boolean_setting(&store, &args, ToggleMode::Toggle).unwrap());
        assert!(update_boolean_setting(&store, &args, ToggleMode::Toggle).unwrap());
        assert_eq!(
            store.writes.borrow()[0],
            ("editor.minimap.enabled".to_string(), json!(false), WriteTarget::User)
        );
    }

    #[test]
    fn test_set_true_and_false_are_idempotent() {
        let store = MemoryStore::with("a.b", json!(true));
        let args = CommandArgs::new("a.b").target(Some(WriteTarget::Workspace));

        assert!(update_boolean_setting(&store, &args, ToggleMode::SetTrue).unwrap());
        assert!(update_boolean_setting(&store, &args, ToggleMode::SetTrue).unwrap());
        assert!(!update_boolean_setting(&store, &args, ToggleMode::SetFalse).unwrap());
        assert!(store
            .writes
            .borrow()
            .iter()
            .all(|(_, _, target)| *target == WriteTarget::Workspace));
    }

    #[test]
    fn test_key_is_trimmed() {
        let store = MemoryStore::with("a.b", json!(false));
        let args = CommandArgs::new("  a.b  ");
        assert!(update_boolean_setting(&store, &args, ToggleMode::Toggle).unwrap());
        assert_eq!(store.get("a.b"), Some(json!(true)));
    }

    #[test]
    fn test_missing_key() {
        let store = MemoryStore::default();
        let result = update_boolean_setting(&store, &CommandArgs::new("   "), ToggleMode::Toggle);
        assert!(matches!(result, Err(ShortcutError::MissingSettingKey)));
    }

    #[test]
    fn test_not_boolean_reports_type() {
        let cases = [
            (None, "undefined"),
            (Some(json!(14)), "number"),
            (Some(json!("on")), "string"),
            (Some(json!(null)), "object"),
            (Some(json!([true])), "object"),
        ];

        for (value, expected) in cases {
            let store = MemoryStore::default();
            if let Some(value) = value {
                store.values.borrow_mut().insert("k".to_string(), value);
            }
            match update_boolean_setting(&store, &CommandArgs::new("k"), ToggleMode::Toggle) {
                Err(ShortcutError::NotBoolean { key, found }) => {
                    assert_eq!(key, "k");
                    assert_eq!(found, expected);
                }
                other => panic!("expected NotBoolean, got {:?}", other),
            }
            assert!(store.writes.borrow().is_empty());
        }
    }

    #[test]
    fn test_status_message() {
        assert_eq!(status_message("a.b", Some("Minimap"), true), "Minimap: ON");
        assert_eq!(status_message("a.b", Some(" "), false), "a.b: OFF");
        assert_eq!(on_off(None), "N/A");
    }

    #[test]
    fn test_command_ids() {
        assert_eq!(ToggleMode::Toggle.command_id(), "shortcut-settings.toggle");
        assert_eq!(ToggleMode::SetTrue.command_id(), "shortcut-settings.setTrue");
        assert_eq!(ToggleMode::SetFalse.command_id(), "shortcut-settings.setFalse");
    }
}
