//! Editor file locations
//!
//! The keybindings and settings files live in the editor's per-user data
//! directory, which depends on the operating system and on which VS Code
//! family product is installed:
//!
//! - macOS: `~/Library/Application Support/<Product>/User`
//! - Windows: `%APPDATA%\<Product>\User`
//! - Linux: `~/.config/<Product>/User`

use crate::core::config::EditorConfig;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Keybindings file name inside the user data directory
pub const KEYBINDINGS_FILE_NAME: &str = "keybindings.json";

/// Settings file name inside the user data (or workspace `.vscode`) directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Installed VS Code family product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProductVariant {
    /// Visual Studio Code
    #[default]
    Code,
    /// Visual Studio Code - Insiders
    CodeInsiders,
    /// Cursor
    Cursor,
    /// VSCodium
    Vscodium,
    /// Kwaipilot
    Kwaipilot,
}

impl ProductVariant {
    /// Detect the product from the editor's application root path
    ///
    /// Unknown install locations fall back to [`ProductVariant::Code`].
    pub fn detect(app_root: &str) -> Self {
        let product = if app_root.contains("Kwaipilot.app") {
            ProductVariant::Kwaipilot
        } else if app_root.contains("Cursor.app") {
            ProductVariant::Cursor
        } else if app_root.contains("VSCodium.app") {
            ProductVariant::Vscodium
        } else if app_root.contains("Code - Insiders.app") {
            ProductVariant::CodeInsiders
        } else {
            ProductVariant::Code
        };
        debug!("Detected product '{}' from app root {}", product, app_root);
        product
    }

    /// Directory name under the platform config directory
    pub fn dir_name(&self) -> &'static str {
        match self {
            ProductVariant::Code => "Code",
            ProductVariant::CodeInsiders => "Code - Insiders",
            ProductVariant::Cursor => "Cursor",
            ProductVariant::Vscodium => "VSCodium",
            ProductVariant::Kwaipilot => "Kwaipilot",
        }
    }

    /// Dot-directory in the home folder that holds installed extensions
    pub fn extensions_home(&self) -> &'static str {
        match self {
            ProductVariant::Code => ".vscode",
            ProductVariant::CodeInsiders => ".vscode-insiders",
            ProductVariant::Cursor => ".cursor",
            ProductVariant::Vscodium => ".vscode-oss",
            ProductVariant::Kwaipilot => ".kwaipilot",
        }
    }

    /// The product's `User` directory
    pub fn user_data_dir(&self) -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(self.dir_name()).join("User"))
    }

    /// Default location of the installed extensions
    pub fn extensions_dir(&self) -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(self.extensions_home()).join("extensions"))
    }
}

impl fmt::Display for ProductVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Fully resolved file locations for one run
#[derive(Debug, Clone, Default)]
pub struct EditorPaths {
    /// User keybindings file; `None` when no location could be determined
    pub keybindings_file: Option<PathBuf>,

    /// User-scope settings file
    pub user_settings_file: Option<PathBuf>,

    /// Workspace-scope settings file, when a workspace is configured
    pub workspace_settings_file: Option<PathBuf>,

    /// Directories scanned for extension manifests
    pub extensions_dirs: Vec<PathBuf>,
}

impl EditorPaths {
    /// Resolve paths from configuration, filling gaps with platform defaults
    pub fn resolve(config: &EditorConfig) -> Self {
        let product = config.effective_product();
        let user_dir = product.user_data_dir();

        let keybindings_file = config
            .keybindings_file
            .clone()
            .or_else(|| user_dir.as_ref().map(|dir| dir.join(KEYBINDINGS_FILE_NAME)));

        let user_settings_file = config
            .user_settings_file
            .clone()
            .or_else(|| user_dir.as_ref().map(|dir| dir.join(SETTINGS_FILE_NAME)));

        let workspace_settings_file = config
            .workspace_dir
            .as_deref()
            .map(workspace_settings_path);

        let mut extensions_dirs: Vec<PathBuf> = product.extensions_dir().into_iter().collect();
        extensions_dirs.extend(config.extensions_dirs.iter().cloned());

        let paths = Self {
            keybindings_file,
            user_settings_file,
            workspace_settings_file,
            extensions_dirs,
        };
        debug!("Resolved editor paths for {}: {:?}", product, paths);
        paths
    }
}

/// `<workspace>/.vscode/settings.json`
pub fn workspace_settings_path(workspace_dir: &Path) -> PathBuf {
    workspace_dir.join(".vscode").join(SETTINGS_FILE_NAME)
}
