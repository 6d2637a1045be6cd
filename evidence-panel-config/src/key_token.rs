//! Canonical key tokens.
//!
//! A token names one key of a chord. Modifiers use fixed names, literal
//! keys are a single uppercase character. Tokens are persisted as their
//! canonical string, so `"Control/Meta"` and `"A"` round-trip through the
//! settings file unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One normalized key or modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KeyToken {
    /// Control and Meta collapsed into one portable modifier.
    ControlMeta,
    /// The Control modifier as reported on a platform that swaps Control and Command.
    Control,
    /// The Meta/Command modifier as reported on a platform that swaps Control and Command.
    Meta,
    Shift,
    Alt,
    /// A literal key, always stored uppercase.
    Char(char),
}

/// Error returned when a string is not a canonical key token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyTokenError {
    #[error("empty key name")]
    Empty,
    #[error("unknown key name '{0}'")]
    Unknown(String),
    #[error("key '{0:?}' has no printable form")]
    Unprintable(char),
}

impl KeyToken {
    pub const CONTROL_META: &'static str = "Control/Meta";
    pub const CONTROL: &'static str = "Control";
    pub const META: &'static str = "Meta";
    pub const SHIFT: &'static str = "Shift";
    pub const ALT: &'static str = "Alt";

    /// Build a literal token from a printable character.
    ///
    /// Returns `None` for control and whitespace characters, which have no
    /// printable representation in a chord.
    pub fn literal(ch: char) -> Option<Self> {
        if ch.is_control() || ch.is_whitespace() {
            return None;
        }
        Some(KeyToken::Char(uppercase_char(ch)))
    }

    /// The canonical name of this token.
    pub fn name(&self) -> String {
        match self {
            KeyToken::Char(c) => c.to_string(),
            other => other.modifier_name().unwrap_or_default().to_string(),
        }
    }

    /// Whether this token is one of the modifier keys.
    pub fn is_modifier(&self) -> bool {
        !matches!(self, KeyToken::Char(_))
    }

    fn modifier_name(&self) -> Option<&'static str> {
        match self {
            KeyToken::ControlMeta => Some(Self::CONTROL_META),
            KeyToken::Control => Some(Self::CONTROL),
            KeyToken::Meta => Some(Self::META),
            KeyToken::Shift => Some(Self::SHIFT),
            KeyToken::Alt => Some(Self::ALT),
            KeyToken::Char(_) => None,
        }
    }
}

/// Uppercase a single character, keeping it as-is when the uppercase form
/// is not a single character (e.g. 'ß').
pub fn uppercase_char(ch: char) -> char {
    let mut upper = ch.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => ch,
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyToken::Char(c) => write!(f, "{c}"),
            other => f.write_str(other.modifier_name().unwrap_or_default()),
        }
    }
}

impl FromStr for KeyToken {
    type Err = KeyTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(KeyTokenError::Empty),
            Self::CONTROL_META => Ok(KeyToken::ControlMeta),
            Self::CONTROL => Ok(KeyToken::Control),
            Self::META => Ok(KeyToken::Meta),
            Self::SHIFT => Ok(KeyToken::Shift),
            Self::ALT => Ok(KeyToken::Alt),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => KeyToken::literal(ch).ok_or(KeyTokenError::Unprintable(ch)),
                    _ => Err(KeyTokenError::Unknown(s.to_string())),
                }
            }
        }
    }
}

impl TryFrom<String> for KeyToken {
    type Error = KeyTokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyToken> for String {
    fn from(token: KeyToken) -> Self {
        token.name()
    }
}
