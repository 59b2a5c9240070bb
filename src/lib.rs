//! Shortcut Settings Library
//!
//! Toggle boolean VS Code settings from the command line and bind them to
//! keyboard shortcuts, checking every new chord against built-in and user
//! keybindings before it is written.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`core`] - Configuration and error handling
//! - [`keybindings`] - Chord normalization, `keybindings.json` access and
//!   conflict detection
//! - [`settings`] - Settings stores, the boolean toggler, mappings, extension
//!   setting discovery and keybinding snippets
//! - [`recorder`] - The interactive shortcut recorder and its terminal surface
//! - [`cli`] - Command-line interface (only used by the binary)
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use shortcut_settings::keybindings::{
//!     BindingRecord, ConflictDetector, InsertMode, KeybindingFileStore, TOGGLE_COMMAND,
//! };
//! use shortcut_settings::settings::{
//!     update_boolean_setting, CommandArgs, JsonSettingsStore, ToggleMode, WriteTarget,
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     // Flip a setting in the user settings file
//!     let settings = JsonSettingsStore::new(Some("settings.json".into()), None);
//!     let args = CommandArgs::new("editor.minimap.enabled").target(Some(WriteTarget::User));
//!     let enabled = update_boolean_setting(&settings, &args, ToggleMode::Toggle)?;
//!     println!("minimap: {}", enabled);
//!
//!     // Bind a chord to the same toggle unless it is already taken
//!     let keybindings = KeybindingFileStore::new("keybindings.json");
//!     let info = ConflictDetector::new(&keybindings).check_conflict("ctrl+alt+m");
//!     if !info.has_conflict {
//!         let record = BindingRecord::new("ctrl+alt+m", TOGGLE_COMMAND, args.binding_args());
//!         keybindings.insert(&record, InsertMode::Replace)?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Platform Support
//!
//! Settings and keybinding files are located under the per-user application
//! data directory of the configured editor product on Windows, macOS and
//! Linux. Every location can be overridden in the config file.

pub mod cli;
pub mod core;
pub mod keybindings;
pub mod recorder;
pub mod settings;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
