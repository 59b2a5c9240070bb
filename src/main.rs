//! Shortcut Settings - CLI Entry Point
//!
//! Toggle boolean VS Code settings and bind them to conflict-checked
//! keyboard shortcuts.
//!
//! This binary is a thin wrapper around the library, handling argument parsing,
//! logging setup, and command dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use log::{debug, info, LevelFilter};
use shortcut_settings::cli::{self, Args, DualWriter};
use shortcut_settings::core::config::Config;
use std::fs::OpenOptions;
use std::io::Write;

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = if let Some(ref config_path) = args.config {
        match Config::load(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {}", e);
                Config::default()
            }
        }
    } else {
        Config::load_default().unwrap_or_default()
    };

    // Apply CLI overrides to config
    if let Some(product) = args.product {
        config.editor.product = product;
        config.editor.app_root = None;
    }
    if let Some(ref path) = args.keybindings_file {
        config.editor.keybindings_file = Some(path.clone());
    }
    if let Some(ref path) = args.settings_file {
        config.editor.user_settings_file = Some(path.clone());
    }
    if let Some(ref dir) = args.workspace {
        config.editor.workspace_dir = Some(dir.clone());
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }

    init_logging(&config)?;

    debug!("{} v{}", shortcut_settings::NAME, shortcut_settings::VERSION);

    // Run the command
    cli::run_command(&args, &config)?;

    Ok(())
}

fn init_logging(config: &Config) -> Result<()> {
    let log_level = match config.logging.level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    };

    if config.logging.log_to_file {
        // Set up logging to both console and file
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.logging.log_file)
            .with_context(|| {
                format!("Failed to open log file {}", config.logging.log_file.display())
            })?;

        Builder::new()
            .filter_level(log_level)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{} {} {}] {}",
                    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                    record.level(),
                    record.target(),
                    record.args()
                )
            })
            .target(env_logger::Target::Pipe(Box::new(DualWriter {
                console: std::io::stderr(),
                file: log_file,
            })))
            .init();

        info!("Logging to file: {}", config.logging.log_file.display());
    } else {
        Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.level))
            .init();
    }

    Ok(())
}
