//! Terminal capture surface
//!
//! Reads a chord in raw mode with crossterm, then shows any conflict and asks
//! through a dialoguer menu how the chord should be written.
//!
//! Most terminals do not report bare modifier presses, and some chords never
//! reach the program (they are taken by the terminal or the OS). Use
//! `--chord` for those.

use super::{CaptureSurface, KeyPress, RecorderEvent, RecorderState};
use crate::core::error::{Result, ShortcutError};
use crate::keybindings::InsertMode;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use dialoguer::{theme::ColorfulTheme, Select};
use log::debug;
use std::io::{self, Write};

/// Interactive recorder surface for a terminal
pub struct TerminalCaptureSurface {
    default_mode: InsertMode,
    title: String,
}

impl TerminalCaptureSurface {
    /// `title` names what the chord will be bound to
    pub fn new(title: impl Into<String>, default_mode: InsertMode) -> Self {
        Self {
            default_mode,
            title: title.into(),
        }
    }

    /// Read key events until one produces something the recorder can use
    fn capture(&self) -> Result<RecorderEvent> {
        enable_raw_mode().map_err(|e| ShortcutError::PromptError(format!("Failed to enable raw mode: {}", e)))?;
        let result = read_until_press();
        // Always leave raw mode, even when reading failed
        let restored = disable_raw_mode();
        let event = result?;
        restored.map_err(|e| ShortcutError::PromptError(format!("Failed to restore terminal: {}", e)))?;
        Ok(event)
    }

    fn choose(&self, candidate: &str) -> Result<RecorderEvent> {
        let items = [
            format!("Replace existing binding for {} with {}", self.title, candidate),
            format!("Add {} as an additional binding", candidate),
            "Record again".to_string(),
            "Cancel".to_string(),
        ];
        let default = match self.default_mode {
            InsertMode::Replace => 0,
            InsertMode::Add => 1,
        };

        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Write this keybinding?")
            .items(&items)
            .default(default)
            .interact_opt()
            .map_err(|e| ShortcutError::PromptError(e.to_string()))?;

        Ok(match choice {
            Some(0) => RecorderEvent::Confirm(InsertMode::Replace),
            Some(1) => RecorderEvent::Confirm(InsertMode::Add),
            Some(2) => RecorderEvent::Reset,
            _ => RecorderEvent::Cancel,
        })
    }
}

impl CaptureSurface for TerminalCaptureSurface {
    fn render(&mut self, state: &RecorderState) -> Result<()> {
        let mut stdout = io::stdout();
        match state {
            RecorderState::AwaitingInput { partial: None } => {
                println!();
                println!("Press a key combination for {} (Esc to cancel)", self.title);
            }
            RecorderState::AwaitingInput { partial: Some(partial) } => {
                print!("\r  {}   ", partial);
            }
            RecorderState::CheckingConflict { candidate, conflict } => {
                println!("\r  {}   ", candidate);
                match conflict {
                    Some(info) if info.has_conflict => println!("  ⚠ {}", info.describe()),
                    Some(_) => println!("  ✓ No conflicts"),
                    None => {}
                }
            }
            RecorderState::Cancelled => println!("Recording cancelled"),
            RecorderState::Idle | RecorderState::Confirmed { .. } => {}
        }
        stdout
            .flush()
            .map_err(|e| ShortcutError::PromptError(e.to_string()))
    }

    fn next_event(&mut self, state: &RecorderState) -> Result<RecorderEvent> {
        match state {
            RecorderState::CheckingConflict { candidate, .. } => self.choose(candidate),
            _ => self.capture(),
        }
    }
}

fn read_until_press() -> Result<RecorderEvent> {
    loop {
        let event = event::read().map_err(|e| ShortcutError::PromptError(e.to_string()))?;
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.code == KeyCode::Esc {
                return Ok(RecorderEvent::Cancel);
            }
            if let Some(press) = key_press(&key) {
                debug!("Key event {:?} -> {:?}", key, press);
                return Ok(RecorderEvent::Key(press));
            }
        }
    }
}

/// Translate a crossterm key event into a [`KeyPress`]
fn key_press(event: &KeyEvent) -> Option<KeyPress> {
    let key = match event.code {
        KeyCode::Char(' ') => " ".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("f{}", n),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Tab | KeyCode::BackTab => "tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::Modifier(modifier) => modifier_key_name(modifier).to_string(),
        _ => return None,
    };

    let modifiers = event.modifiers;
    Some(KeyPress {
        ctrl: modifiers.contains(KeyModifiers::CONTROL),
        shift: modifiers.contains(KeyModifiers::SHIFT) || event.code == KeyCode::BackTab,
        alt: modifiers.contains(KeyModifiers::ALT),
        meta: modifiers.intersects(KeyModifiers::SUPER | KeyModifiers::META),
        key,
    })
}

fn modifier_key_name(modifier: ModifierKeyCode) -> &'static str {
    match modifier {
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => "control",
        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => "shift",
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => "alt",
        _ => "meta",
    }
}
