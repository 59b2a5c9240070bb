//! Keybindings Module - Conflict Detection and keybindings.json Editing
//!
//! This module owns everything that touches the editor's `keybindings.json`:
//!
//! - Canonical chord comparison (`Shift+Cmd+K` == `cmd+shift+k`)
//! - Comment and trailing-comma tolerant reading of the file
//! - Conflict detection against built-in shortcuts and the user's own bindings
//! - Idempotent insert / replace / delete of binding records
//!
//! # Architecture
//!
//! 1. **keys** - [`KeyChord`] and [`normalize`], the equivalence relation
//! 2. **jsonc** - [`sanitize`], comment stripping ahead of `serde_json`
//! 3. **defaults** - [`DefaultKeybindingTable`], the built-in blacklist
//! 4. **store** - [`KeybindingFileStore`], file location, read and rewrite
//! 5. **conflict** - [`ConflictDetector`], combining 3 and 4
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use shortcut_settings::keybindings::{ConflictDetector, KeybindingFileStore};
//!
//! let store = KeybindingFileStore::new("/home/me/.config/Code/User/keybindings.json");
//! let detector = ConflictDetector::new(&store);
//!
//! let info = detector.check_conflict("shift+cmd+p");
//! if info.has_conflict {
//!     println!("{}", info.describe());
//! }
//! ```

pub mod conflict;
pub mod defaults;
pub mod jsonc;
pub mod keys;
pub mod paths;
pub mod store;

pub use conflict::{ConflictDetector, ConflictInfo, ConflictSource};
pub use defaults::DefaultKeybindingTable;
pub use jsonc::{parse_jsonc, sanitize};
pub use keys::{normalize, KeyChord, Modifiers};
pub use paths::{EditorPaths, ProductVariant};
pub use store::{BindingRecord, InsertMode, InsertOutcome, KeybindingFileStore};

/// Command id that toggles a boolean setting
pub const TOGGLE_COMMAND: &str = "shortcut-settings.toggle";

/// Command id that sets a boolean setting to true
pub const SET_TRUE_COMMAND: &str = "shortcut-settings.setTrue";

/// Command id that sets a boolean setting to false
pub const SET_FALSE_COMMAND: &str = "shortcut-settings.setFalse";
