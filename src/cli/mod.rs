//! CLI module for shortcut-settings
//!
//! This module contains all command-line interface related code including
//! argument parsing, command definitions, and command handlers.
//!
//! # Submodules
//!
//! - `args` - Command-line argument definitions using clap
//! - `commands` - Command handler implementations
//! - `output` - Console messages, tables and the log writer

pub mod args;
pub mod commands;
pub mod output;

// Re-export commonly used types for convenience
pub use args::{Args, Commands};
pub use commands::run_command;
pub use output::DualWriter;
