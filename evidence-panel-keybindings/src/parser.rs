//! Chord string parser.
//!
//! Parses human-readable chord strings like "Shift+Ctrl+E" into token lists,
//! for the command line and anything else that takes shortcuts as text.

use evidence_panel_config::{KeyToken, MAX_CHORD_KEYS};
use std::fmt;

/// Error type for chord parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseError {}

/// Parse a `+`-separated chord, keeping the written order.
///
/// Accepted names (case-insensitive):
/// - `Ctrl`, `Cmd`, `CmdOrCtrl`, `Control/Meta` - the portable Control/Meta token
/// - `Control`, `Meta` (exact case) - the platform-specific tokens
/// - `Shift`, `Alt`, `Option`
/// - `Plus` for a literal `+`
/// - any single printable character
pub fn parse_chord(s: &str) -> Result<Vec<KeyToken>, ParseError> {
    let parts: Vec<&str> = s.split('+').map(str::trim).collect();
    if parts.iter().all(|p| p.is_empty()) {
        return Err(ParseError("Empty key combination".to_string()));
    }

    let mut keys = Vec::with_capacity(parts.len());
    for part in parts {
        let token = parse_token(part)?;
        if keys.contains(&token) {
            return Err(ParseError(format!("Key '{}' listed twice", token)));
        }
        keys.push(token);
    }

    if keys.len() > MAX_CHORD_KEYS {
        return Err(ParseError(format!(
            "Too many keys: {} (maximum {})",
            keys.len(),
            MAX_CHORD_KEYS
        )));
    }
    Ok(keys)
}

fn parse_token(part: &str) -> Result<KeyToken, ParseError> {
    // Exact canonical names first so "Control" and "Meta" keep their meaning
    if let Ok(token) = part.parse::<KeyToken>() {
        return Ok(token);
    }
    match part.to_lowercase().as_str() {
        "" => Err(ParseError("Empty key name".to_string())),
        "ctrl" | "cmd" | "command" | "cmdorctrl" | "control/meta" => Ok(KeyToken::ControlMeta),
        "shift" => Ok(KeyToken::Shift),
        "alt" | "option" => Ok(KeyToken::Alt),
        "plus" => Ok(KeyToken::Char('+')),
        _ => Err(ParseError(format!("Unknown key: '{}'", part))),
    }
}

/// Format a chord the way [`parse_chord`] reads it back.
pub fn chord_to_string(keys: &[KeyToken]) -> String {
    keys.iter()
        .map(|k| match k {
            KeyToken::Char('+') => "Plus".to_string(),
            other => other.name(),
        })
        .collect::<Vec<_>>()
        .join("+")
}
