//! Keybinding Recorder
//!
//! Captures a key chord from the user, checks it for conflicts and asks how
//! it should be written.
//!
//! The flow is a small state machine:
//!
//! ```text
//! Idle -> AwaitingInput -> CheckingConflict -> Confirmed
//!              ^                  |        \-> Cancelled
//!              \---- re-record ---/
//! ```
//!
//! Every complete chord issues a conflict check. Check results are tagged with
//! the chord they were computed for, so a result for an older chord never
//! overwrites the warning of the current one. The input surface is abstracted
//! behind [`CaptureSurface`]; [`terminal::TerminalCaptureSurface`] is the
//! interactive implementation.

pub mod terminal;

pub use terminal::TerminalCaptureSurface;

use crate::core::error::Result;
use crate::keybindings::{ConflictDetector, ConflictInfo, InsertMode};
use log::debug;

/// Key names reported for presses of a bare modifier
const MODIFIER_KEYS: &[&str] = &["control", "shift", "alt", "meta"];

// ============================================================================
// Key presses
// ============================================================================

/// A single key press with its modifier state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPress {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Command / Windows / Super key
    pub meta: bool,
    /// Key name as reported by the input layer, e.g. `a`, `ArrowUp`, ` `
    pub key: String,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    fn modifier_parts(&self) -> Vec<&'static str> {
        let mut parts = Vec::with_capacity(4);
        if self.ctrl {
            parts.push("ctrl");
        }
        if self.shift {
            parts.push("shift");
        }
        if self.alt {
            parts.push("alt");
        }
        if self.meta {
            parts.push("cmd");
        }
        parts
    }

    /// Lowercased key with special keys renamed to keybinding names
    fn key_name(&self) -> String {
        let key = self.key.to_lowercase();
        match key.as_str() {
            " " => "space".to_string(),
            "arrowup" => "up".to_string(),
            "arrowdown" => "down".to_string(),
            "arrowleft" => "left".to_string(),
            "arrowright" => "right".to_string(),
            _ => key,
        }
    }

    /// True when only a modifier is held
    pub fn is_modifier_only(&self) -> bool {
        let key = self.key_name();
        key.is_empty() || MODIFIER_KEYS.contains(&key.as_str())
    }

    /// Chord string for a complete press, e.g. `ctrl+shift+k`
    pub fn candidate(&self) -> Option<String> {
        if self.is_modifier_only() {
            return None;
        }
        let mut parts: Vec<String> = self.modifier_parts().into_iter().map(String::from).collect();
        parts.push(self.key_name());
        Some(parts.join("+"))
    }

    /// Display for a modifier-only press, e.g. `ctrl+shift+...`
    pub fn partial_display(&self) -> String {
        let mut parts = self.modifier_parts();
        parts.push("...");
        parts.join("+")
    }
}

// ============================================================================
// State machine
// ============================================================================

/// Recorder state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    /// Waiting for a complete chord; `partial` shows held modifiers
    AwaitingInput { partial: Option<String> },
    /// A chord was captured; `conflict` is filled once its check returns
    CheckingConflict {
        candidate: String,
        conflict: Option<ConflictInfo>,
    },
    Confirmed { keybinding: String, mode: InsertMode },
    Cancelled,
}

impl RecorderState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RecorderState::Confirmed { .. } | RecorderState::Cancelled)
    }
}

/// Inputs to the recorder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEvent {
    Begin,
    Key(KeyPress),
    ConflictChecked { candidate: String, info: ConflictInfo },
    /// Discard the captured chord and record again
    Reset,
    Confirm(InsertMode),
    Cancel,
}

/// Work the driver must do after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEffect {
    CheckConflict(String),
}

/// Chord chosen by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedKeybinding {
    pub keybinding: String,
    pub mode: InsertMode,
}

/// The recorder state machine
#[derive(Debug, Clone)]
pub struct Recorder {
    state: RecorderState,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            state: RecorderState::Idle,
        }
    }

    pub fn state(&self) -> &RecorderState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// The confirmed chord, if the user confirmed one
    pub fn outcome(&self) -> Option<RecordedKeybinding> {
        match &self.state {
            RecorderState::Confirmed { keybinding, mode } => Some(RecordedKeybinding {
                keybinding: keybinding.clone(),
                mode: *mode,
            }),
            _ => None,
        }
    }

    /// Apply one event; events that do not fit the current state are ignored
    pub fn handle(&mut self, event: RecorderEvent) -> Option<RecorderEffect> {
        if self.state.is_terminal() {
            debug!("Recorder finished, ignoring {:?}", event);
            return None;
        }

        let (next, effect) = match (&self.state, event) {
            (_, RecorderEvent::Cancel) => (Some(RecorderState::Cancelled), None),
            (RecorderState::Idle, RecorderEvent::Begin) => {
                (Some(RecorderState::AwaitingInput { partial: None }), None)
            }
            (RecorderState::Idle, _) => (None, None),
            (state, RecorderEvent::Key(press)) => match press.candidate() {
                Some(candidate) => {
                    debug!("Captured {}", candidate);
                    (
                        Some(RecorderState::CheckingConflict {
                            candidate: candidate.clone(),
                            conflict: None,
                        }),
                        Some(RecorderEffect::CheckConflict(candidate)),
                    )
                }
                // A held modifier does not discard a captured chord
                None => match state {
                    RecorderState::AwaitingInput { .. } => (
                        Some(RecorderState::AwaitingInput {
                            partial: Some(press.partial_display()),
                        }),
                        None,
                    ),
                    _ => (None, None),
                },
            },
            (
                RecorderState::CheckingConflict {
                    candidate: current, ..
                },
                RecorderEvent::ConflictChecked { candidate, info },
            ) => {
                if *current == candidate {
                    (
                        Some(RecorderState::CheckingConflict {
                            candidate,
                            conflict: Some(info),
                        }),
                        None,
                    )
                } else {
                    debug!("Ignoring stale conflict result for {}", candidate);
                    (None, None)
                }
            }
            (RecorderState::CheckingConflict { candidate, .. }, RecorderEvent::Confirm(mode)) => (
                Some(RecorderState::Confirmed {
                    keybinding: candidate.clone(),
                    mode,
                }),
                None,
            ),
            (_, RecorderEvent::Reset) => (Some(RecorderState::AwaitingInput { partial: None }), None),
            (state, event) => {
                debug!("Ignoring {:?} in {:?}", event, state);
                (None, None)
            }
        };

        if let Some(next) = next {
            self.state = next;
        }
        effect
    }
}

// ============================================================================
// Session
// ============================================================================

/// An input surface the recorder can be driven from
pub trait CaptureSurface {
    /// Show the current state
    fn render(&mut self, state: &RecorderState) -> Result<()>;

    /// Block until the user produces the next event
    fn next_event(&mut self, state: &RecorderState) -> Result<RecorderEvent>;
}

/// Runs a [`Recorder`] against a surface and a conflict detector
pub struct RecorderSession<'a> {
    detector: &'a ConflictDetector<'a>,
}

impl<'a> RecorderSession<'a> {
    pub fn new(detector: &'a ConflictDetector<'a>) -> Self {
        Self { detector }
    }

    /// Record until the user confirms or cancels
    ///
    /// Returns `None` on cancel.
    pub fn run<S: CaptureSurface + ?Sized>(&self, surface: &mut S) -> Result<Option<RecordedKeybinding>> {
        let mut recorder = Recorder::new();
        recorder.handle(RecorderEvent::Begin);
        surface.render(recorder.state())?;

        while !recorder.is_finished() {
            let event = surface.next_event(recorder.state())?;
            if let Some(RecorderEffect::CheckConflict(candidate)) = recorder.handle(event) {
                let info = self.detector.check_conflict(&candidate);
                recorder.handle(RecorderEvent::ConflictChecked { candidate, info });
            }
            surface.render(recorder.state())?;
        }

        Ok(recorder.outcome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybindings::{ConflictSource, KeybindingFileStore};
    use std::collections::VecDeque;
    use std::fs;
    use tempfile::TempDir;

    /// Surface replaying a fixed list of events
    struct ScriptedSurface {
        events: VecDeque<RecorderEvent>,
        rendered: Vec<RecorderState>,
    }

    impl ScriptedSurface {
        fn new(events: Vec<RecorderEvent>) -> Self {
            Self {
                events: events.into(),
                rendered: Vec::new(),
            }
        }
    }

    impl CaptureSurface for ScriptedSurface {
        fn render(&mut self, state: &RecorderState) -> Result<()> {
            self.rendered.push(state.clone());
            Ok(())
        }

        fn next_event(&mut self, _state: &RecorderState) -> Result<RecorderEvent> {
            Ok(self.events.pop_front().unwrap_or(RecorderEvent::Cancel))
        }
    }

    #[test]
    fn test_key_press_candidate() {
        assert_eq!(
            KeyPress::new("K").meta().shift().ctrl().alt().candidate().as_deref(),
            Some("ctrl+shift+alt+cmd+k")
        );
        assert_eq!(KeyPress::new(" ").ctrl().candidate().as_deref(), Some("ctrl+space"));
        assert_eq!(KeyPress::new("ArrowUp").alt().candidate().as_deref(), Some("alt+up"));
        assert_eq!(KeyPress::new("Enter").candidate().as_deref(), Some("enter"));
    }

    #[test]
    fn test_modifier_only_press() {
        let press = KeyPress::new("Control").ctrl().shift();
        assert!(press.is_modifier_only());
        assert_eq!(press.candidate(), None);
        assert_eq!(press.partial_display(), "ctrl+shift+...");
    }

    #[test]
    fn test_happy_path() {
        let mut recorder = Recorder::new();
        assert_eq!(recorder.handle(RecorderEvent::Begin), None);

        recorder.handle(RecorderEvent::Key(KeyPress::new("Meta").meta()));
        assert_eq!(
            recorder.state(),
            &RecorderState::AwaitingInput {
                partial: Some("cmd+...".to_string())
            }
        );

        let effect = recorder.handle(RecorderEvent::Key(KeyPress::new("t").ctrl().alt()));
        assert_eq!(effect, Some(RecorderEffect::CheckConflict("ctrl+alt+t".to_string())));

        recorder.handle(RecorderEvent::ConflictChecked {
            candidate: "ctrl+alt+t".to_string(),
            info: ConflictInfo::none(),
        });
        recorder.handle(RecorderEvent::Confirm(InsertMode::Add));

        assert_eq!(
            recorder.outcome(),
            Some(RecordedKeybinding {
                keybinding: "ctrl+alt+t".to_string(),
                mode: InsertMode::Add
            })
        );
    }

    #[test]
    fn test_stale_conflict_result_ignored() {
        let mut recorder = Recorder::new();
        recorder.handle(RecorderEvent::Begin);
        recorder.handle(RecorderEvent::Key(KeyPress::new("a").ctrl()));
        recorder.handle(RecorderEvent::Key(KeyPress::new("b").ctrl()));

        recorder.handle(RecorderEvent::ConflictChecked {
            candidate: "ctrl+a".to_string(),
            info: ConflictInfo::with_default("Select All"),
        });
        assert_eq!(
            recorder.state(),
            &RecorderState::CheckingConflict {
                candidate: "ctrl+b".to_string(),
                conflict: None
            }
        );

        recorder.handle(RecorderEvent::ConflictChecked {
            candidate: "ctrl+b".to_string(),
            info: ConflictInfo::none(),
        });
        assert_eq!(
            recorder.state(),
            &RecorderState::CheckingConflict {
                candidate: "ctrl+b".to_string(),
                conflict: Some(ConflictInfo::none())
            }
        );
    }

    #[test]
    fn test_confirm_requires_candidate() {
        let mut recorder = Recorder::new();
        recorder.handle(RecorderEvent::Begin);
        recorder.handle(RecorderEvent::Confirm(InsertMode::Replace));
        assert_eq!(recorder.state(), &RecorderState::AwaitingInput { partial: None });

        recorder.handle(RecorderEvent::Key(KeyPress::new("x").ctrl()));
        recorder.handle(RecorderEvent::Key(KeyPress::new("Shift").shift()));
        recorder.handle(RecorderEvent::Confirm(InsertMode::Replace));
        assert_eq!(
            recorder.outcome().map(|r| r.keybinding),
            Some("ctrl+x".to_string())
        );
    }

    #[test]
    fn test_cancel_and_reset() {
        let mut recorder = Recorder::new();
        recorder.handle(RecorderEvent::Cancel);
        assert_eq!(recorder.state(), &RecorderState::Cancelled);

        // Terminal states ignore further input
        recorder.handle(RecorderEvent::Begin);
        assert_eq!(recorder.state(), &RecorderState::Cancelled);
        assert_eq!(recorder.outcome(), None);

        let mut recorder = Recorder::new();
        recorder.handle(RecorderEvent::Begin);
        recorder.handle(RecorderEvent::Key(KeyPress::new("q").ctrl()));
        recorder.handle(RecorderEvent::Reset);
        assert_eq!(recorder.state(), &RecorderState::AwaitingInput { partial: None });
    }

    #[test]
    fn test_session_checks_conflicts() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("keybindings.json");
        fs::write(&path, r#"[{ "key": "ctrl+alt+t", "command": "terminal.new" }]"#).unwrap();
        let store = KeybindingFileStore::new(path);
        let detector = ConflictDetector::new(&store);

        let mut surface = ScriptedSurface::new(vec![
            RecorderEvent::Key(KeyPress::new("t").ctrl().alt()),
            RecorderEvent::Reset,
            RecorderEvent::Key(KeyPress::new("y").ctrl().alt()),
            RecorderEvent::Confirm(InsertMode::Replace),
        ]);

        let outcome = RecorderSession::new(&detector).run(&mut surface).unwrap();
        assert_eq!(
            outcome,
            Some(RecordedKeybinding {
                keybinding: "ctrl+alt+y".to_string(),
                mode: InsertMode::Replace
            })
        );

        let warned = surface.rendered.iter().any(|state| {
            matches!(
                state,
                RecorderState::CheckingConflict { conflict: Some(info), .. }
                    if info.source == Some(ConflictSource::User)
            )
        });
        assert!(warned);
    }

    #[test]
    fn test_session_cancel() {
        let store = KeybindingFileStore::unlocated();
        let detector = ConflictDetector::new(&store);
        let mut surface = ScriptedSurface::new(vec![RecorderEvent::Cancel]);

        assert_eq!(RecorderSession::new(&detector).run(&mut surface).unwrap(), None);
        assert_eq!(surface.rendered.last(), Some(&RecorderState::Cancelled));
    }
}
