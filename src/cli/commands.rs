//! Command handler implementations
//!
//! This module contains the implementation of all CLI commands. Pickers are
//! dialoguer menus; cancelling any of them (Esc or q) ends the command without
//! changing anything.

use crate::cli::args::{Args, Commands, SettingArgs};
use crate::cli::output::{format_table, print_header, print_info, print_success, print_warning};
use crate::core::config::{get_config_path, init_config, open_config_in_editor, Config};
use crate::core::error::ShortcutError;
use crate::keybindings::{
    normalize, BindingRecord, ConflictDetector, EditorPaths, InsertMode, InsertOutcome,
    KeybindingFileStore, TOGGLE_COMMAND,
};
use crate::recorder::{RecordedKeybinding, RecorderSession, TerminalCaptureSurface};
use crate::settings::metadata::unique_by_key;
use crate::settings::snippet::{deliver_snippet, SnippetDelivery};
use crate::settings::toggler::{on_off, status_message};
use crate::settings::{
    normalize_title, update_boolean_setting, BooleanSettingMeta, BooleanSettingSource,
    CommandArgs, ConfigurationStore, ExtensionManifestSource, JsonSettingsStore, Mapping,
    MappingStore, ToggleMode, WriteTarget,
};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use log::{debug, error, info, warn};
use serde_json::Value;

/// Longest description shown in the setting picker
const DESCRIPTION_PREVIEW_CHARS: usize = 60;

// ============================================================================
// Command context
// ============================================================================

/// Configuration plus the file locations resolved from it
pub struct CommandContext<'a> {
    config: &'a Config,
    paths: EditorPaths,
}

impl<'a> CommandContext<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            paths: EditorPaths::resolve(&config.editor),
        }
    }

    pub fn paths(&self) -> &EditorPaths {
        &self.paths
    }

    fn keybindings(&self) -> KeybindingFileStore {
        KeybindingFileStore::from_paths(&self.paths)
    }

    fn settings(&self) -> JsonSettingsStore {
        JsonSettingsStore::from_paths(&self.paths)
    }

    /// Settings store able to resolve `key`, falling back to extension defaults
    ///
    /// Extension manifests are only scanned when neither settings file sets the key.
    fn settings_for(&self, key: &str) -> JsonSettingsStore {
        let store = self.settings();
        if store.get(key).is_some() {
            return store;
        }
        debug!("{} is not set in any settings file; loading extension defaults", key);
        store.with_defaults(&self.boolean_settings())
    }

    fn boolean_settings(&self) -> Vec<BooleanSettingMeta> {
        ExtensionManifestSource::new(self.paths.extensions_dirs.clone()).boolean_settings()
    }

    /// Open keybindings.json after a write when configured to
    fn reveal_keybindings(&self, store: &KeybindingFileStore) {
        if !self.config.keybindings.open_after_write {
            return;
        }
        if let Some(path) = store.path() {
            if let Err(e) = open::that(path) {
                warn!("Could not open {}: {}", path.display(), e);
            }
        }
    }
}

/// Run the command selected on the command line
pub fn run_command(args: &Args, config: &Config) -> Result<()> {
    let ctx = CommandContext::new(config);

    match &args.command {
        Commands::Toggle(setting) => toggle_setting(&ctx, setting, ToggleMode::Toggle)?,
        Commands::SetTrue(setting) => toggle_setting(&ctx, setting, ToggleMode::SetTrue)?,
        Commands::SetFalse(setting) => toggle_setting(&ctx, setting, ToggleMode::SetFalse)?,
        Commands::PickAndToggle => pick_and_toggle(&ctx)?,
        Commands::ListMappings { plain } => list_mappings(&ctx, *plain)?,
        Commands::AddMapping { key, title, target } => {
            add_mapping(&ctx, key.as_deref(), title.clone(), *target)?
        }
        Commands::EditMapping { id } => edit_mapping(&ctx, id.as_deref())?,
        Commands::RemoveMapping { ids, yes } => remove_mappings(&ctx, ids, *yes)?,
        Commands::PickBooleanSetting => pick_boolean_setting(&ctx)?,
        Commands::CopySnippet => copy_snippet(&ctx)?,
        Commands::Bind {
            setting,
            chord,
            mode,
            yes,
        } => bind(&ctx, setting, chord.as_deref(), *mode, *yes)?,
        Commands::DeleteKeybinding { chord, setting } => delete_keybinding(&ctx, chord, setting)?,
        Commands::ListKeybindings => list_keybindings(&ctx)?,
        Commands::CheckConflict { chord, json } => check_conflict(&ctx, chord, *json)?,
        Commands::Normalize { chord } => println!("{}", normalize(chord)),
        Commands::Config { path, reset } => handle_config_command(*path, *reset)?,
        Commands::ShowConfig => show_config(&ctx),
    }

    Ok(())
}

fn command_args(setting: &SettingArgs) -> CommandArgs {
    CommandArgs::new(setting.key.trim())
        .target(setting.target)
        .title(setting.title.clone())
}

fn mapping_args(mapping: &Mapping) -> CommandArgs {
    CommandArgs::new(mapping.key.clone())
        .target(Some(mapping.effective_target()))
        .title(mapping.title.clone())
}

/// `ON`, `OFF` or `N/A` for the current value of a setting
fn value_text<S: ConfigurationStore + ?Sized>(store: &S, key: &str) -> &'static str {
    match store.get(key) {
        Some(Value::Bool(value)) => on_off(Some(value)),
        _ => on_off(None),
    }
}

// ============================================================================
// Prompts
// ============================================================================

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

fn select(prompt: &str, items: &[String]) -> Result<Option<usize>> {
    Ok(Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()?)
}

fn select_target(prompt: &str, current: WriteTarget) -> Result<Option<WriteTarget>> {
    let targets = [WriteTarget::User, WriteTarget::Workspace];
    let items = [
        "User - write to user settings".to_string(),
        "Workspace - write to workspace settings".to_string(),
    ];
    let default = targets.iter().position(|t| *t == current).unwrap_or(0);

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(default)
        .interact_opt()?;
    Ok(choice.map(|i| targets[i]))
}

fn mapping_item(mapping: &Mapping) -> String {
    format!(
        "{}  ({}, target: {})",
        mapping.label(),
        mapping.key,
        mapping.effective_target()
    )
}

fn pick_mapping(mappings: &[Mapping], prompt: &str) -> Result<Option<Mapping>> {
    let items: Vec<String> = mappings.iter().map(mapping_item).collect();
    Ok(select(prompt, &items)?.map(|i| mappings[i].clone()))
}

// ============================================================================
// Toggle commands
// ============================================================================

/// Toggle, set or clear a boolean setting
pub fn toggle_setting(ctx: &CommandContext, setting: &SettingArgs, mode: ToggleMode) -> Result<()> {
    let args = command_args(setting);
    let store = ctx.settings_for(&args.key);
    let value = update_boolean_setting(&store, &args, mode)?;
    print_success(&status_message(&args.key, args.title.as_deref(), value));
    Ok(())
}

/// Pick a mapped setting and toggle it
pub fn pick_and_toggle(ctx: &CommandContext) -> Result<()> {
    let settings = ctx.settings();
    let mappings = MappingStore::new(&settings).list();
    if mappings.is_empty() {
        print_info("No mappings found in shortcut-settings.mappings");
        return Ok(());
    }

    let Some(mapping) = pick_mapping(&mappings, "Pick a setting to toggle")? else {
        return Ok(());
    };
    toggle_mapping(ctx, &mapping)
}

fn toggle_mapping(ctx: &CommandContext, mapping: &Mapping) -> Result<()> {
    let args = mapping_args(mapping);
    let store = ctx.settings_for(&args.key);
    let value = update_boolean_setting(&store, &args, ToggleMode::Toggle)?;
    print_success(&status_message(&args.key, args.title.as_deref(), value));
    Ok(())
}

// ============================================================================
// Mapping management
// ============================================================================

/// Show mappings, either as a table or as an action menu
pub fn list_mappings(ctx: &CommandContext, plain: bool) -> Result<()> {
    let settings = ctx.settings();
    let mappings = MappingStore::new(&settings).list();
    if mappings.is_empty() {
        print_info("No mappings found. Use \"pick-boolean-setting\" to add one.");
        return Ok(());
    }

    if plain {
        let rows: Vec<Vec<String>> = mappings
            .iter()
            .map(|m| {
                vec![
                    m.id.clone(),
                    m.label(),
                    m.key.clone(),
                    m.effective_target().to_string(),
                    value_text(&settings, &m.key).to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            format_table(&["ID", "TITLE", "KEY", "TARGET", "VALUE"], &rows)
        );
        return Ok(());
    }

    let items: Vec<String> = mappings
        .iter()
        .map(|m| format!("[{}] {}", value_text(&settings, &m.key), mapping_item(m)))
        .collect();
    let Some(index) = select("Manage mappings", &items)? else {
        return Ok(());
    };
    let mapping = &mappings[index];

    let actions = [
        "Toggle".to_string(),
        "Edit".to_string(),
        "Copy keybinding snippet".to_string(),
        "Remove".to_string(),
    ];
    match select(&mapping.key, &actions)? {
        Some(0) => toggle_mapping(ctx, mapping)?,
        Some(1) => edit_mapping_interactive(ctx, mapping)?,
        Some(2) => report_snippet(deliver_snippet(&mapping_args(mapping), None)?),
        Some(3) => {
            if confirm(&format!("Remove mapping for \"{}\"?", mapping.key))? {
                MappingStore::new(&settings).remove(&mapping.id)?;
                print_success(&format!("Removed mapping for \"{}\"", mapping.key));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Add a mapping from flags, or through the setting picker
pub fn add_mapping(
    ctx: &CommandContext,
    key: Option<&str>,
    title: Option<String>,
    target: Option<WriteTarget>,
) -> Result<()> {
    match key {
        Some(key) => add_mapping_for_setting(ctx, key.trim(), title, target.unwrap_or_default()),
        None => pick_boolean_setting(ctx),
    }
}

fn add_mapping_for_setting(
    ctx: &CommandContext,
    key: &str,
    title: Option<String>,
    target: WriteTarget,
) -> Result<()> {
    if key.is_empty() {
        return Err(ShortcutError::MissingSettingKey.into());
    }

    let settings = ctx.settings();
    let mapping = Mapping::new(key).with_title(title).with_target(Some(target));
    match MappingStore::new(&settings).add(mapping) {
        Ok(()) => {
            print_success(&format!("Added mapping for {}", key));
            Ok(())
        }
        Err(e @ ShortcutError::MappingExists(_)) => {
            print_info(&e.to_string());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Edit the mapping with `id`, or one picked from the list
pub fn edit_mapping(ctx: &CommandContext, id: Option<&str>) -> Result<()> {
    let settings = ctx.settings();
    let mappings = MappingStore::new(&settings).list();

    let mapping = match id {
        Some(id) => mappings
            .into_iter()
            .find(|m| m.id == id)
            .ok_or_else(|| ShortcutError::MappingNotFound(id.to_string()))?,
        None => {
            if mappings.is_empty() {
                print_info("No mappings to edit");
                return Ok(());
            }
            match pick_mapping(&mappings, "Pick a mapping to edit")? {
                Some(mapping) => mapping,
                None => return Ok(()),
            }
        }
    };

    edit_mapping_interactive(ctx, &mapping)
}

fn edit_mapping_interactive(ctx: &CommandContext, mapping: &Mapping) -> Result<()> {
    let title: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Title (leave empty to use the key)")
        .with_initial_text(mapping.title.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    let Some(target) = select_target("Target", mapping.effective_target())? else {
        return Ok(());
    };

    let title = Some(title.trim().to_string()).filter(|t| !t.is_empty());
    let settings = ctx.settings();
    MappingStore::new(&settings).update(&mapping.id, title, Some(target))?;
    print_success(&format!("Mapping \"{}\" updated", mapping.key));
    Ok(())
}

/// Remove mappings by id, or picked from the list
pub fn remove_mappings(ctx: &CommandContext, ids: &[String], yes: bool) -> Result<()> {
    let settings = ctx.settings();
    let store = MappingStore::new(&settings);

    let ids: Vec<String> = if ids.is_empty() {
        let mappings = store.list();
        if mappings.is_empty() {
            print_info("No mappings to remove");
            return Ok(());
        }
        let items: Vec<String> = mappings.iter().map(mapping_item).collect();
        let picked = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Pick mappings to remove (space to select)")
            .items(&items)
            .interact_opt()?
            .unwrap_or_default();
        picked.into_iter().map(|i| mappings[i].id.clone()).collect()
    } else {
        ids.to_vec()
    };

    if ids.is_empty() {
        return Ok(());
    }
    if !yes && !confirm(&format!("Remove {} mapping(s)?", ids.len()))? {
        return Ok(());
    }

    let removed = store.remove_many(&ids)?;
    print_success(&format!("Removed {} mapping(s)", removed));
    if removed < ids.len() {
        print_info(&format!("{} id(s) not found", ids.len() - removed));
    }
    Ok(())
}

// ============================================================================
// Setting discovery and snippets
// ============================================================================

fn setting_item<S: ConfigurationStore + ?Sized>(store: &S, setting: &BooleanSettingMeta) -> String {
    let mut item = format!(
        "[{}] {}  ({})",
        value_text(store, &setting.key),
        setting.label(),
        setting.key
    );
    if let Some(description) = setting.description.as_deref() {
        let preview: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        item.push_str(" - ");
        item.push_str(preview.trim());
    }
    item
}

/// Pick a boolean setting declared by an installed extension, then map it
/// or copy a snippet for it
pub fn pick_boolean_setting(ctx: &CommandContext) -> Result<()> {
    let settings = unique_by_key(ctx.boolean_settings());
    if settings.is_empty() {
        print_info("No boolean settings found in the extension directories");
        for dir in &ctx.paths.extensions_dirs {
            print_info(&dir.display().to_string());
        }
        return Ok(());
    }

    let store = ctx.settings().with_defaults(&settings);
    let items: Vec<String> = settings.iter().map(|s| setting_item(&store, s)).collect();
    let Some(index) = select("Pick a boolean setting", &items)? else {
        return Ok(());
    };
    let setting = &settings[index];

    let actions = [
        "Add to mappings".to_string(),
        "Copy keybinding snippet".to_string(),
    ];
    match select(&setting.key, &actions)? {
        Some(0) => {
            let Some(target) = select_target("Choose target for this mapping", WriteTarget::User)? else {
                return Ok(());
            };
            add_mapping_for_setting(ctx, &setting.key, setting.title.clone(), target)
        }
        Some(1) => {
            let args = CommandArgs::new(setting.key.clone()).title(setting.title.clone());
            report_snippet(deliver_snippet(&args, None)?);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Copy a snippet for a mapped setting
pub fn copy_snippet(ctx: &CommandContext) -> Result<()> {
    let settings = ctx.settings();
    let mappings = MappingStore::new(&settings).list();
    if mappings.is_empty() {
        print_info("No mappings found in shortcut-settings.mappings");
        return Ok(());
    }

    if let Some(mapping) = pick_mapping(&mappings, "Pick a mapping to copy a keybinding snippet for")? {
        report_snippet(deliver_snippet(&mapping_args(&mapping), None)?);
    }
    Ok(())
}

fn report_snippet(delivery: SnippetDelivery) {
    match delivery {
        SnippetDelivery::Clipboard => print_success("Keybinding snippet copied to clipboard"),
        SnippetDelivery::Stdout => print_info("Clipboard unavailable; snippet printed above"),
    }
}

// ============================================================================
// Keybindings
// ============================================================================

/// Bind a chord to toggle a setting
///
/// Without `chord` the interactive recorder captures one.
pub fn bind(
    ctx: &CommandContext,
    setting: &SettingArgs,
    chord: Option<&str>,
    mode: Option<InsertMode>,
    yes: bool,
) -> Result<()> {
    let args = command_args(setting);
    if args.key.is_empty() {
        return Err(ShortcutError::MissingSettingKey.into());
    }
    let title = normalize_title(&args.key, args.title.as_deref());
    let mode = mode.unwrap_or(ctx.config.keybindings.default_mode);

    let store = ctx.keybindings();
    let detector = ConflictDetector::new(&store);

    let recorded = match chord {
        Some(chord) => {
            let info = detector.check_conflict(chord);
            if info.has_conflict {
                print_warning(&info.describe());
                if !yes && !confirm("Write this keybinding anyway?")? {
                    print_info("Nothing written");
                    return Ok(());
                }
            }
            RecordedKeybinding {
                keybinding: chord.trim().to_string(),
                mode,
            }
        }
        None => {
            let mut surface = TerminalCaptureSurface::new(title.clone(), mode);
            match RecorderSession::new(&detector).run(&mut surface)? {
                Some(recorded) => recorded,
                None => return Ok(()),
            }
        }
    };

    let record = BindingRecord::new(recorded.keybinding.clone(), TOGGLE_COMMAND, args.binding_args());
    match store.insert(&record, recorded.mode)? {
        InsertOutcome::Replaced { previous_key, .. } => print_success(&format!(
            "Replaced {} with {} for {}",
            previous_key, recorded.keybinding, title
        )),
        InsertOutcome::Appended { .. } => {
            print_success(&format!("Bound {} to toggle {}", recorded.keybinding, title))
        }
    }
    ctx.reveal_keybindings(&store);
    Ok(())
}

/// Delete the toggle binding for `chord` and a setting
pub fn delete_keybinding(ctx: &CommandContext, chord: &str, setting: &SettingArgs) -> Result<()> {
    let args = command_args(setting);
    let store = ctx.keybindings();

    if store.delete(chord, TOGGLE_COMMAND, &args.binding_args())? {
        print_success(&format!("Removed keybinding {} for {}", chord, args.key));
        ctx.reveal_keybindings(&store);
    } else {
        print_info(&format!("Keybinding {} for {} not found", chord, args.key));
    }
    Ok(())
}

/// Print every entry of keybindings.json
pub fn list_keybindings(ctx: &CommandContext) -> Result<()> {
    let store = ctx.keybindings();
    let Some(path) = store.path() else {
        return Err(ShortcutError::KeybindingsPathNotFound.into());
    };

    let records = store.list_all();
    if records.is_empty() {
        print_info(&format!("No keybindings in {}", path.display()));
        return Ok(());
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.key.clone(),
                r.command.clone(),
                r.when.clone().unwrap_or_default(),
                r.args.as_ref().map(Value::to_string).unwrap_or_default(),
            ]
        })
        .collect();
    println!("{}", format_table(&["KEY", "COMMAND", "WHEN", "ARGS"], &rows));
    Ok(())
}

/// Report whether `chord` is already bound
pub fn check_conflict(ctx: &CommandContext, chord: &str, json: bool) -> Result<()> {
    let store = ctx.keybindings();
    let info = ConflictDetector::new(&store).check_conflict(chord);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{}: {}", normalize(chord), info.describe());
    }
    Ok(())
}

// ============================================================================
// Configuration
// ============================================================================

/// Show, reset or open the configuration file
pub fn handle_config_command(show_path: bool, reset: bool) -> Result<()> {
    if reset {
        let path = init_config(true)?;
        print_success(&format!("Created fresh config file at: {}", path.display()));
        return Ok(());
    }

    if show_path {
        let path = Config::get_active_config_path();
        println!("{}", path.display());
        if path.exists() {
            info!("Config file exists at: {}", path.display());
        } else {
            info!("Config file would be created at: {}", path.display());
        }
        return Ok(());
    }

    info!("Opening configuration file in default editor...");
    match open_config_in_editor() {
        Ok(path) => {
            print_info(&format!("Config file: {}", path.display()));
            print_info("Run 'shortcut-settings show-config' to verify your settings.");
        }
        Err(e) => {
            error!("Failed to open config file: {}", e);
            if let Some(path) = get_config_path() {
                print_info(&format!("You can manually edit the config at: {}", path.display()));
            }
        }
    }

    Ok(())
}

fn display_path(path: Option<&std::path::Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not found)".to_string())
}

/// Show the effective configuration and resolved paths
pub fn show_config(ctx: &CommandContext) {
    let config = ctx.config;
    let config_path = Config::get_active_config_path();

    print_header("Shortcut Settings Configuration");
    println!("Configuration file: {}", config_path.display());
    if !config_path.exists() {
        println!("(Using default settings - no config file found)");
    }
    println!();
    println!("[editor]");
    println!("  product = \"{}\"", config.editor.product);
    if let Some(ref root) = config.editor.app_root {
        println!("  app_root = \"{}\"  (detected: {})", root, config.editor.effective_product());
    }
    println!(
        "  workspace_dir = {}",
        display_path(config.editor.workspace_dir.as_deref())
    );
    println!("  extensions_dirs = {:?}", config.editor.extensions_dirs);
    println!();
    println!("[keybindings]");
    println!("  default_mode = \"{}\"", config.keybindings.default_mode);
    println!("  open_after_write = {}", config.keybindings.open_after_write);
    println!();
    println!("[logging]");
    println!("  level = \"{}\"", config.logging.level);
    println!("  log_to_file = {}", config.logging.log_to_file);
    println!("  log_file = \"{}\"", config.logging.log_file.display());
    println!();
    println!("Resolved files:");
    println!(
        "  keybindings.json    {}",
        display_path(ctx.paths.keybindings_file.as_deref())
    );
    println!(
        "  user settings       {}",
        display_path(ctx.paths.user_settings_file.as_deref())
    );
    println!(
        "  workspace settings  {}",
        display_path(ctx.paths.workspace_settings_file.as_deref())
    );
    for dir in &ctx.paths.extensions_dirs {
        println!("  extensions          {}", dir.display());
    }
}
