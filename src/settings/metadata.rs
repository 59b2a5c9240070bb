//! Boolean setting discovery
//!
//! Installed extensions declare their settings in the `contributes.configuration`
//! section of their `package.json`. This module scans extension directories and
//! collects every property whose schema type is (or includes) `boolean`.

use log::{debug, info};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Manifest file name inside each extension directory
const MANIFEST_FILE_NAME: &str = "package.json";

/// A boolean setting declared by an extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BooleanSettingMeta {
    pub key: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub default_value: Option<bool>,
}

impl BooleanSettingMeta {
    /// Picker label: the declared title, else the key
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.key)
    }
}

/// Anything that can enumerate boolean settings
pub trait BooleanSettingSource {
    fn boolean_settings(&self) -> Vec<BooleanSettingMeta>;
}

impl BooleanSettingSource for Vec<BooleanSettingMeta> {
    fn boolean_settings(&self) -> Vec<BooleanSettingMeta> {
        self.clone()
    }
}

/// Scans extension directories for `package.json` manifests
#[derive(Debug, Clone, Default)]
pub struct ExtensionManifestSource {
    dirs: Vec<PathBuf>,
}

impl ExtensionManifestSource {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    fn manifests(&self) -> Vec<PathBuf> {
        let mut manifests = Vec::new();
        for dir in &self.dirs {
            if !dir.is_dir() {
                debug!("Extensions directory {} does not exist", dir.display());
                continue;
            }

            // <dir>/<extension>/package.json
            for entry in WalkDir::new(dir)
                .min_depth(2)
                .max_depth(2)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE_NAME {
                    manifests.push(entry.into_path());
                }
            }
        }
        manifests
    }
}

impl BooleanSettingSource for ExtensionManifestSource {
    fn boolean_settings(&self) -> Vec<BooleanSettingMeta> {
        let manifests = self.manifests();
        let settings: Vec<BooleanSettingMeta> = manifests
            .iter()
            .flat_map(|path| read_manifest(path))
            .collect();
        info!(
            "Found {} boolean setting(s) in {} manifest(s)",
            settings.len(),
            manifests.len()
        );
        settings
    }
}

fn read_manifest(path: &Path) -> Vec<BooleanSettingMeta> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            return Vec::new();
        }
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(manifest) => extract_from_manifest(&manifest),
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Boolean settings in a parsed extension manifest
///
/// `contributes.configuration` may be a single node or an array of nodes.
pub fn extract_from_manifest(manifest: &Value) -> Vec<BooleanSettingMeta> {
    let configuration = manifest
        .get("contributes")
        .and_then(Value::as_object)
        .and_then(|contributes| contributes.get("configuration"));

    match configuration {
        Some(Value::Array(nodes)) => nodes.iter().flat_map(extract_from_configuration_node).collect(),
        Some(node) => extract_from_configuration_node(node),
        None => Vec::new(),
    }
}

/// Boolean settings under one configuration node's `properties`
pub fn extract_from_configuration_node(node: &Value) -> Vec<BooleanSettingMeta> {
    let Some(properties) = node.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };

    properties
        .iter()
        .filter_map(|(key, schema)| {
            let schema = schema.as_object()?;
            if !is_boolean_schema(schema) {
                return None;
            }
            Some(BooleanSettingMeta {
                key: key.clone(),
                title: schema.get("title").and_then(Value::as_str).map(String::from),
                description: schema
                    .get("description")
                    .and_then(Value::as_str)
                    .map(String::from),
                default_value: schema.get("default").and_then(Value::as_bool),
            })
        })
        .collect()
}

fn is_boolean_schema(schema: &Map<String, Value>) -> bool {
    match schema.get("type") {
        Some(Value::String(t)) => t == "boolean",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("boolean")),
        _ => false,
    }
}

/// Keep the first occurrence of each setting key
pub fn unique_by_key(settings: Vec<BooleanSettingMeta>) -> Vec<BooleanSettingMeta> {
    let mut seen = HashSet::new();
    settings
        .into_iter()
        .filter(|s| seen.insert(s.key.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn manifest() -> Value {
        json!({
            "name": "sample",
            "contributes": {
                "configuration": [
                    {
                        "properties": {
                            "sample.enabled": { "type": "boolean", "default": true, "title": "Enabled" },
                            "sample.size": { "type": "number", "default": 3 },
                            "sample.nullable": { "type": ["boolean", "null"], "description": "Maybe" },
                            "sample.broken": "not a schema"
                        }
                    },
                    {
                        "properties": {
                            "sample.other": { "type": "boolean", "default": "yes" }
                        }
                    }
                ]
            }
        })
    }

    #[test]
    fn test_extract_from_manifest_array() {
        let settings = extract_from_manifest(&manifest());
        let keys: Vec<&str> = settings.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["sample.enabled", "sample.nullable", "sample.other"]);

        assert_eq!(settings[0].title.as_deref(), Some("Enabled"));
        assert_eq!(settings[0].default_value, Some(true));
        assert_eq!(settings[1].description.as_deref(), Some("Maybe"));
        assert_eq!(settings[2].default_value, None);
    }

    #[test]
    fn test_extract_from_single_node() {
        let manifest = json!({
            "contributes": {
                "configuration": { "properties": { "a.b": { "type": "boolean" } } }
            }
        });
        let settings = extract_from_manifest(&manifest);
        assert_eq!(settings.len(), 1);
        assert_eq!(settings[0].label(), "a.b");

        assert!(extract_from_manifest(&json!({ "contributes": [] })).is_empty());
        assert!(extract_from_configuration_node(&json!({ "properties": [] })).is_empty());
    }

    #[test]
    fn test_manifest_source_scans_extension_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let ext = temp_dir.path().join("publisher.sample-1.0.0");
        fs::create_dir_all(&ext).unwrap();
        fs::write(ext.join(MANIFEST_FILE_NAME), manifest().to_string()).unwrap();

        let broken = temp_dir.path().join("publisher.broken-0.1.0");
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join(MANIFEST_FILE_NAME), "{ not json").unwrap();

        // Nested manifests (e.g. node_modules) are not extensions
        let nested = ext.join("node_modules").join("dep");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join(MANIFEST_FILE_NAME), manifest().to_string()).unwrap();

        let source = ExtensionManifestSource::new(vec![
            temp_dir.path().to_path_buf(),
            temp_dir.path().join("missing"),
        ]);
        assert_eq!(source.boolean_settings().len(), 3);
    }

    #[test]
    fn test_unique_by_key_keeps_first() {
        let mut settings = extract_from_manifest(&manifest());
        let mut duplicate = settings[0].clone();
        duplicate.title = Some("Second".to_string());
        settings.push(duplicate);

        let unique = unique_by_key(settings);
        assert_eq!(unique.len(), 3);
        assert_eq!(unique[0].title.as_deref(), Some("Enabled"));
    }
}
