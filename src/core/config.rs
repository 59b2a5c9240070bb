//! Configuration module for shortcut settings
//!
//! Supports loading configuration from a TOML file.
//! Configuration is stored in a standard location:
//! - Windows: %APPDATA%\shortcut_settings\config.toml
//! - Linux/macOS: ~/.config/shortcut_settings/config.toml

use crate::keybindings::paths::ProductVariant;
use crate::keybindings::store::InsertMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name used for config directory
const APP_NAME: &str = "shortcut_settings";

/// Default config file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Config file name checked in the current directory before the standard location
const LOCAL_CONFIG_FILE_NAME: &str = "shortcut_settings.toml";

/// Get the standard configuration directory for the application.
///
/// Returns:
/// - Windows: %APPDATA%\shortcut_settings
/// - Linux/macOS: ~/.config/shortcut_settings
pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_NAME))
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config").join(APP_NAME))
    }
}

/// Get the standard configuration file path.
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Ensure the configuration directory exists.
///
/// Creates the directory and all parent directories if they don't exist.
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let config_dir = get_config_dir().ok_or(ConfigError::ConfigDirNotFound)?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .map_err(|e| ConfigError::WriteError(config_dir.clone(), e.to_string()))?;
    }

    Ok(config_dir)
}

/// Initialize the configuration file if it doesn't exist.
///
/// When `reset` is set an existing file is overwritten with the template.
/// Returns the path to the config file.
pub fn init_config(reset: bool) -> Result<PathBuf, ConfigError> {
    let config_dir = ensure_config_dir()?;
    let config_path = config_dir.join(CONFIG_FILE_NAME);

    if reset || !config_path.exists() {
        fs::write(&config_path, Config::generate_default_config())
            .map_err(|e| ConfigError::WriteError(config_path.clone(), e.to_string()))?;
    }

    Ok(config_path)
}

/// Open the configuration file in the default editor.
///
/// Creates the file from the template first if it doesn't exist.
pub fn open_config_in_editor() -> Result<PathBuf, ConfigError> {
    let config_path = init_config(false)?;

    open::that(&config_path)
        .map_err(|e| ConfigError::OpenError(config_path.clone(), e.to_string()))?;

    Ok(config_path)
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which editor to operate on and where its files live
    pub editor: EditorConfig,

    /// Keybinding write behaviour
    pub keybindings: KeybindingsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Editor location configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// VS Code family product whose files are edited
    pub product: ProductVariant,

    /// Editor install path; when set, the product is detected from it
    pub app_root: Option<String>,

    /// Explicit keybindings.json path (overrides the product default)
    pub keybindings_file: Option<PathBuf>,

    /// Explicit user settings.json path (overrides the product default)
    pub user_settings_file: Option<PathBuf>,

    /// Workspace folder whose `.vscode/settings.json` is the workspace scope
    pub workspace_dir: Option<PathBuf>,

    /// Extra directories to scan for extension manifests
    pub extensions_dirs: Vec<PathBuf>,
}

impl EditorConfig {
    /// Product after applying app root detection
    pub fn effective_product(&self) -> ProductVariant {
        match self.app_root {
            Some(ref root) => ProductVariant::detect(root),
            None => self.product,
        }
    }
}

/// Keybinding write configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingsConfig {
    /// Mode used when a recorded binding is confirmed without choosing one
    pub default_mode: InsertMode,

    /// Open keybindings.json in the system editor after writing it
    pub open_after_write: bool,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            default_mode: InsertMode::Replace,
            open_after_write: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log to file
    pub log_to_file: bool,

    /// Log file path
    pub log_file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            log_to_file: false,
            log_file: PathBuf::from("shortcut_settings.log"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./shortcut_settings.toml (current directory - for project-specific overrides)
    /// 2. Standard config location
    ///
    /// If no config file is found, returns default configuration.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_first_existing(&Self::candidate_paths())
    }

    fn load_first_existing(candidates: &[PathBuf]) -> Result<Self, ConfigError> {
        match candidates.iter().find(|path| path.exists()) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".").join(LOCAL_CONFIG_FILE_NAME)];
        paths.extend(get_config_path());
        paths
    }

    /// Get the path where the config file is (or would be) located.
    ///
    /// Returns the first existing config file path, or the standard location if none exists.
    pub fn get_active_config_path() -> PathBuf {
        Self::candidate_paths()
            .into_iter()
            .find(|path| path.exists())
            .or_else(get_config_path)
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE_NAME))
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(path.as_ref(), content)
            .map_err(|e| ConfigError::WriteError(path.as_ref().to_path_buf(), e.to_string()))?;

        Ok(())
    }

    /// Generate a default config file with comments
    pub fn generate_default_config() -> String {
        include_str!("../../config.example.toml").to_string()
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path
    FileNotFound(PathBuf),
    /// Failed to read the configuration file
    ReadError(PathBuf, String),
    /// Failed to parse the configuration file (invalid TOML)
    ParseError(PathBuf, String),
    /// Failed to serialize configuration to TOML
    SerializeError(String),
    /// Failed to write configuration file
    WriteError(PathBuf, String),
    /// Could not determine config directory
    ConfigDirNotFound,
    /// Failed to open config file in editor
    OpenError(PathBuf, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ReadError(path, err) => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ParseError(path, err) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::SerializeError(err) => {
                write!(f, "Failed to serialize configuration: {}", err)
            }
            ConfigError::WriteError(path, err) => {
                write!(
                    f,
                    "Failed to write config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ConfigDirNotFound => {
                write!(f, "Could not determine configuration directory")
            }
            ConfigError::OpenError(path, err) => {
                write!(
                    f,
                    "Failed to open config file '{}' in editor: {}",
                    path.display(),
                    err
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
