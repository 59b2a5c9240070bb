//! Key chord parsing and canonicalization
//!
//! Keybinding strings arrive in many spellings: `Shift+Cmd+K`, `cmd+shift+k`,
//! `command+shift+k`, `meta + shift + k`. Everything that compares keybindings
//! goes through [`normalize`], which maps every spelling of the same chord to one
//! canonical string:
//!
//! - tokens are split on `+`, trimmed and lowercased
//! - modifier aliases collapse (`control`→`ctrl`, `option`→`alt`,
//!   `command`/`meta`→`cmd`)
//! - modifiers are deduplicated and emitted in the order `cmd, ctrl, shift, alt`
//! - the main key comes last
//!
//! ```rust
//! use shortcut_settings::keybindings::normalize;
//!
//! assert_eq!(normalize("Shift+Command+K"), "cmd+shift+k");
//! assert_eq!(normalize("control+option+t"), "ctrl+alt+t");
//! ```

use std::fmt;
use std::ops::BitOr;

// =============================================================================
// Modifiers
// =============================================================================

/// Set of modifier keys held for a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub cmd: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        cmd: false,
        ctrl: false,
        shift: false,
        alt: false,
    };
    pub const CMD: Modifiers = Modifiers {
        cmd: true,
        ..Modifiers::NONE
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };
    pub const ALT: Modifiers = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };

    /// Check if no modifier is held
    pub fn is_empty(&self) -> bool {
        *self == Modifiers::NONE
    }

    /// Resolve a single token to a modifier, applying the alias table
    ///
    /// Returns `None` when the token is not a modifier.
    pub fn from_token(token: &str) -> Option<Modifiers> {
        match token {
            "cmd" | "command" | "meta" => Some(Modifiers::CMD),
            "ctrl" | "control" => Some(Modifiers::CTRL),
            "shift" => Some(Modifiers::SHIFT),
            "alt" | "option" => Some(Modifiers::ALT),
            _ => None,
        }
    }

    /// Canonical modifier names in serialization order
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(4);
        if self.cmd {
            names.push("cmd");
        }
        if self.ctrl {
            names.push("ctrl");
        }
        if self.shift {
            names.push("shift");
        }
        if self.alt {
            names.push("alt");
        }
        names
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers {
            cmd: self.cmd || rhs.cmd,
            ctrl: self.ctrl || rhs.ctrl,
            shift: self.shift || rhs.shift,
            alt: self.alt || rhs.alt,
        }
    }
}

// =============================================================================
// KeyChord
// =============================================================================

/// A modifier set plus a main key
///
/// Equality is structural, so two chords are equal exactly when their
/// canonical strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyChord {
    /// Held modifiers
    pub modifiers: Modifiers,

    /// Lowercased main key, e.g. `k`, `up`, `space`, `f5`
    ///
    /// `None` when the input held only modifiers.
    pub key: Option<String>,
}

impl KeyChord {
    /// Create a chord from a main key and modifiers
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            key: Some(key.into().to_lowercase()),
        }
    }

    /// Parse any keybinding spelling into a chord
    ///
    /// Parsing never fails. If more than one non-modifier token is present the
    /// last one wins, and empty tokens (from `a++b` or a trailing `+`) are
    /// treated as main keys like any other, so `ctrl+` yields no main key.
    pub fn parse(raw: &str) -> Self {
        let mut modifiers = Modifiers::NONE;
        let mut key = None;

        for part in raw.to_lowercase().split('+') {
            let token = part.trim();
            match Modifiers::from_token(token) {
                Some(modifier) => modifiers = modifiers | modifier,
                None => key = Some(token.to_string()),
            }
        }

        // An empty trailing token means the chord had no main key
        let key = key.filter(|k| !k.is_empty());

        Self { modifiers, key }
    }

    /// Canonical string form used for every comparison
    pub fn canonical(&self) -> String {
        let mut parts = self.modifiers.names();
        if let Some(ref key) = self.key {
            parts.push(key.as_str());
        }
        parts.join("+")
    }

    /// Check if a main key is present
    pub fn is_complete(&self) -> bool {
        self.key.is_some()
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// Canonicalize a keybinding string
///
/// This is the equivalence relation for keybindings everywhere in the crate.
pub fn normalize(raw: &str) -> String {
    let normalized = KeyChord::parse(raw).canonical();
    log::trace!("Normalized: {} -> {}", raw, normalized);
    normalized
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in [
            "shift+cmd+k",
            "Ctrl+Alt+T",
            "meta+option+up",
            "control+shift+space",
            "f5",
            "ctrl+",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw}");
        }
    }

    #[test]
    fn test_normalize_modifier_order_is_irrelevant() {
        assert_eq!(normalize("shift+cmd+k"), normalize("cmd+shift+k"));
        assert_eq!(normalize("alt+shift+ctrl+cmd+x"), "cmd+ctrl+shift+alt+x");
    }

    #[test]
    fn test_normalize_collapses_duplicate_modifiers() {
        assert_eq!(normalize("ctrl+ctrl+a"), normalize("ctrl+a"));
        assert_eq!(normalize("ctrl+control+a"), "ctrl+a");
    }

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(normalize("control+a"), "ctrl+a");
        assert_eq!(normalize("option+a"), "alt+a");
        assert_eq!(normalize("command+a"), "cmd+a");
        assert_eq!(normalize("meta+a"), "cmd+a");
    }

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize(" Ctrl + Shift + P "), "ctrl+shift+p");
        assert_eq!(normalize("ALT+UP"), "alt+up");
    }

    #[test]
    fn test_normalize_last_main_key_wins() {
        assert_eq!(normalize("ctrl+a+b"), "ctrl+b");
        assert_eq!(normalize("a+shift+b"), "shift+b");
    }

    #[test]
    fn test_normalize_without_main_key() {
        assert_eq!(normalize("ctrl+shift"), "ctrl+shift");
        assert_eq!(normalize(""), "");
        assert!(!KeyChord::parse("alt").is_complete());
    }

    #[test]
    fn test_normalize_multi_chord_keeps_final_segment() {
        // Space-separated chord sequences are not understood; the tail wins
        assert_eq!(normalize("cmd+k cmd+0"), "cmd+0");
    }

    #[test]
    fn test_key_chord_equality() {
        let a = KeyChord::parse("Shift+Cmd+K");
        let b = KeyChord::new("k", Modifiers::CMD | Modifiers::SHIFT);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "cmd+shift+k");
    }

    #[test]
    fn test_modifiers_from_token() {
        assert_eq!(Modifiers::from_token("option"), Some(Modifiers::ALT));
        assert_eq!(Modifiers::from_token("k"), None);
        assert!(Modifiers::NONE.is_empty());
        assert!(!(Modifiers::CTRL | Modifiers::ALT).is_empty());
    }
}
