//! JSON-with-comments sanitizing
//!
//! Editor configuration files (`keybindings.json`, `settings.json`) allow `//`
//! and `/* */` comments plus trailing commas. [`sanitize`] strips those so the
//! text can be handed to `serde_json`.
//!
//! The stripping is regex based and knows nothing about string literals: a `//`
//! or `/*` inside a quoted value is treated as a comment start and corrupts the
//! output. Callers treat the resulting parse failure as an empty document.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn line_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)//.*$").expect("valid line comment pattern"))
}

fn block_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment pattern"))
}

fn trailing_comma() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",(\s*[}\]])").expect("valid trailing comma pattern"))
}

/// Strip comments and trailing commas from a JSONC blob
pub fn sanitize(text: &str) -> String {
    let without_lines = line_comment().replace_all(text, "");
    let without_blocks = block_comment().replace_all(&without_lines, "");
    trailing_comma()
        .replace_all(&without_blocks, "$1")
        .into_owned()
}

/// Sanitize and parse a JSONC document
///
/// Blank input parses as `None`.
pub fn parse_jsonc(text: &str) -> Result<Option<Value>, serde_json::Error> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&sanitize(trimmed)).map(Some)
}
