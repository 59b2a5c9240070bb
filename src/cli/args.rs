//! Command-line argument definitions
//!
//! This module defines all CLI arguments and subcommands using clap.

use crate::keybindings::{InsertMode, ProductVariant};
use crate::settings::WriteTarget;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Toggle boolean editor settings and manage conflict-checked keybindings
#[derive(Parser, Debug)]
#[command(name = "shortcut-settings")]
#[command(version)]
#[command(about = "Toggle boolean VS Code settings and bind them to conflict-checked shortcuts", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Editor product whose files are edited (overrides config)
    #[arg(long, global = true, value_enum)]
    pub product: Option<ProductVariant>,

    /// Path to keybindings.json (overrides config)
    #[arg(long, global = true, value_name = "FILE")]
    pub keybindings_file: Option<PathBuf>,

    /// Path to the user settings.json (overrides config)
    #[arg(long, global = true, value_name = "FILE")]
    pub settings_file: Option<PathBuf>,

    /// Workspace folder used for workspace-scoped settings (overrides config)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

/// Setting addressed by a toggle command
#[derive(clap::Args, Debug, Clone)]
pub struct SettingArgs {
    /// Dotted setting key, e.g. editor.minimap.enabled
    #[arg(short, long)]
    pub key: String,

    /// Settings scope to write to (default: user)
    #[arg(short, long, value_enum)]
    pub target: Option<WriteTarget>,

    /// Title shown in status output
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Toggle a boolean setting
    Toggle(SettingArgs),

    /// Set a boolean setting to true
    SetTrue(SettingArgs),

    /// Set a boolean setting to false
    SetFalse(SettingArgs),

    /// Pick a mapped setting and toggle it
    PickAndToggle,

    /// Browse mappings and act on one (toggle, edit, copy snippet, remove)
    ListMappings {
        /// Print a table instead of opening the interactive menu
        #[arg(long)]
        plain: bool,
    },

    /// Add a mapping, either by picking a boolean setting or from flags
    AddMapping {
        /// Setting key to map (skips the picker)
        #[arg(short, long)]
        key: Option<String>,

        /// Mapping title
        #[arg(long, requires = "key")]
        title: Option<String>,

        /// Settings scope the mapping writes to
        #[arg(short, long, value_enum, requires = "key")]
        target: Option<WriteTarget>,
    },

    /// Edit the title and target of a mapping
    EditMapping {
        /// Mapping id (prompts when omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// Remove one or more mappings
    RemoveMapping {
        /// Mapping id to remove (can be specified multiple times; prompts when omitted)
        #[arg(long = "id", value_name = "ID")]
        ids: Vec<String>,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Browse boolean settings declared by installed extensions
    PickBooleanSetting,

    /// Copy a keybinding snippet for a mapped setting to the clipboard
    CopySnippet,

    /// Record a shortcut for a setting and write it to keybindings.json
    Bind {
        #[command(flatten)]
        setting: SettingArgs,

        /// Chord to bind, skipping the interactive recorder
        #[arg(long)]
        chord: Option<String>,

        /// Replace the existing binding for this setting or add another one
        #[arg(short, long, value_enum)]
        mode: Option<InsertMode>,

        /// Write even when the chord conflicts with another binding
        #[arg(short, long)]
        yes: bool,
    },

    /// Remove a toggle keybinding from keybindings.json
    DeleteKeybinding {
        /// Chord of the binding to delete
        #[arg(long)]
        chord: String,

        #[command(flatten)]
        setting: SettingArgs,
    },

    /// List the entries of keybindings.json
    ListKeybindings,

    /// Check whether a chord is already taken
    CheckConflict {
        /// Chord to check, e.g. "ctrl+alt+t"
        chord: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the canonical form of a chord
    Normalize {
        /// Chord to normalize, e.g. "Shift+Cmd+K"
        chord: String,
    },

    /// Show or create the configuration file
    ///
    /// The config file is stored at:
    /// - Windows: %APPDATA%\shortcut_settings\config.toml
    /// - Linux/macOS: ~/.config/shortcut_settings/config.toml
    ///
    /// If no config file exists, a default one will be created.
    Config {
        /// Show the config file path without opening it
        #[arg(long)]
        path: bool,

        /// Reset config to defaults (creates a fresh config file)
        #[arg(long)]
        reset: bool,
    },

    /// Show current configuration and resolved file locations
    ShowConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_toggle() {
        let args = Args::parse_from([
            "shortcut-settings",
            "toggle",
            "--key",
            "editor.minimap.enabled",
            "--target",
            "workspace",
        ]);
        match args.command {
            Commands::Toggle(setting) => {
                assert_eq!(setting.key, "editor.minimap.enabled");
                assert_eq!(setting.target, Some(WriteTarget::Workspace));
                assert_eq!(setting.title, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_bind_with_globals() {
        let args = Args::parse_from([
            "shortcut-settings",
            "bind",
            "--key",
            "a.b",
            "--chord",
            "ctrl+alt+t",
            "--mode",
            "add",
            "--product",
            "cursor",
            "--yes",
        ]);
        assert_eq!(args.product, Some(ProductVariant::Cursor));
        match args.command {
            Commands::Bind {
                setting,
                chord,
                mode,
                yes,
            } => {
                assert_eq!(setting.key, "a.b");
                assert_eq!(chord.as_deref(), Some("ctrl+alt+t"));
                assert_eq!(mode, Some(InsertMode::Add));
                assert!(yes);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_remove_mapping_ids() {
        let args = Args::parse_from([
            "shortcut-settings",
            "remove-mapping",
            "--id",
            "a",
            "--id",
            "b",
        ]);
        match args.command {
            Commands::RemoveMapping { ids, yes } => {
                assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
                assert!(!yes);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
