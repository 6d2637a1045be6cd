//! Shortcut bindings: a recorded chord plus the two templates it renders.

use crate::defaults;
use crate::error::ValidationError;
use crate::key_token::KeyToken;
use crate::template::{BACK_PLACEHOLDER, FRONT_PLACEHOLDER};
use serde::{Deserialize, Serialize};

/// Maximum number of keys in one chord.
pub const MAX_CHORD_KEYS: usize = 3;

// Placeholders used by documents written with the older field names
const LEGACY_FRONT_PLACEHOLDER: &str = "{question}";
const LEGACY_BACK_PLACEHOLDER: &str = "{answer}";

/// A persisted keyboard shortcut.
///
/// `keys` keeps the order in which the keys were pressed while recording.
/// Chord identity in the store is order-sensitive; matching in the page is
/// not (see [`chords_equal`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutBinding {
    /// Display label, informational only
    #[serde(default)]
    pub name: String,

    /// Keys in first-press order
    #[serde(default)]
    pub keys: Vec<KeyToken>,

    /// Template used while only the front of the card is visible
    #[serde(alias = "question_template", default)]
    pub front_template: String,

    /// Template used once the back of the card is visible
    #[serde(alias = "answer_template", default)]
    pub back_template: String,
}

impl ShortcutBinding {
    pub fn new(
        name: impl Into<String>,
        keys: Vec<KeyToken>,
        front_template: impl Into<String>,
        back_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            keys,
            front_template: front_template.into(),
            back_template: back_template.into(),
        }
    }

    /// An unsaved shortcut as offered by "new shortcut": no keys yet and the
    /// default templates.
    pub fn draft() -> Self {
        Self::new(
            defaults::DRAFT_NAME,
            Vec::new(),
            defaults::FRONT_TEMPLATE,
            defaults::BACK_TEMPLATE,
        )
    }

    /// The binding seeded into an empty store on first run.
    pub fn seed() -> Self {
        Self::new(
            defaults::SEED_NAME,
            defaults::seed_keys(),
            defaults::FRONT_TEMPLATE,
            defaults::BACK_TEMPLATE,
        )
    }

    /// Read one entry of a stored `keybindings` list.
    ///
    /// Entries written with `question_template`/`answer_template` use the
    /// `{question}`/`{answer}` placeholders; those are renamed to
    /// `{front}`/`{back}` so the binding validates under the current rules.
    pub fn from_stored(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let legacy =
            value.get("question_template").is_some() || value.get("answer_template").is_some();
        let mut binding: Self = serde_json::from_value(value)?;
        if legacy {
            binding.front_template = upgrade_placeholders(&binding.front_template);
            binding.back_template = upgrade_placeholders(&binding.back_template);
        }
        Ok(binding)
    }

    /// Copy with both templates trimmed, the form that gets stored.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.clone(),
            keys: self.keys.clone(),
            front_template: self.front_template.trim().to_string(),
            back_template: self.back_template.trim().to_string(),
        }
    }

    /// Check the per-binding invariants.
    ///
    /// Chord uniqueness across bindings is the store's job.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.keys.is_empty() {
            return Err(ValidationError::EmptyKeys);
        }
        if self.keys.len() > MAX_CHORD_KEYS {
            return Err(ValidationError::TooManyKeys {
                count: self.keys.len(),
                max: MAX_CHORD_KEYS,
            });
        }
        for (i, key) in self.keys.iter().enumerate() {
            if self.keys[..i].contains(key) {
                return Err(ValidationError::RepeatedKey(key.name()));
            }
        }

        if !self.front_template.contains(FRONT_PLACEHOLDER) {
            return Err(ValidationError::FrontTemplateMissingFront);
        }
        if self.front_template.contains(BACK_PLACEHOLDER) {
            return Err(ValidationError::FrontTemplateUsesBack);
        }
        if !self.back_template.contains(FRONT_PLACEHOLDER) {
            return Err(ValidationError::BackTemplateMissingFront);
        }

        Ok(())
    }

    /// Template for the visible card side.
    pub fn template_for(&self, back_visible: bool) -> &str {
        if back_visible {
            &self.back_template
        } else {
            &self.front_template
        }
    }
}

/// Order-insensitive chord equality, used when matching held keys.
///
/// Both sides are expected to be duplicate-free.
pub fn chords_equal(a: &[KeyToken], b: &[KeyToken]) -> bool {
    a.len() == b.len() && a.iter().all(|k| b.contains(k))
}

fn upgrade_placeholders(template: &str) -> String {
    template
        .replace(LEGACY_FRONT_PLACEHOLDER, FRONT_PLACEHOLDER)
        .replace(LEGACY_BACK_PLACEHOLDER, BACK_PLACEHOLDER)
}

fn short_name(key: &KeyToken) -> String {
    match key {
        KeyToken::ControlMeta => "Ctrl/⌘".to_string(),
        KeyToken::Control => "⌃".to_string(),
        KeyToken::Meta => "⌘".to_string(),
        KeyToken::Shift => "⇧".to_string(),
        KeyToken::Alt => "⌥".to_string(),
        KeyToken::Char(c) => c.to_string(),
    }
}

fn long_name(key: &KeyToken) -> String {
    match key {
        KeyToken::ControlMeta => "Ctrl / Cmd".to_string(),
        KeyToken::Control => "Control".to_string(),
        KeyToken::Meta => "Command".to_string(),
        KeyToken::Shift => "Shift".to_string(),
        KeyToken::Alt => "Alt / Option".to_string(),
        KeyToken::Char(c) => c.to_string(),
    }
}

/// Compact keycap form for list rows, e.g. `⇧ + Ctrl/⌘`.
pub fn format_keys_display(keys: &[KeyToken]) -> String {
    if keys.is_empty() {
        return "Not set".to_string();
    }
    keys.iter().map(short_name).collect::<Vec<_>>().join(" + ")
}

/// Spelled-out form for the editor, e.g. `Shift + Ctrl / Cmd`.
pub fn format_keys_verbose(keys: &[KeyToken]) -> String {
    if keys.is_empty() {
        return "Click to set shortcut".to_string();
    }
    keys.iter().map(long_name).collect::<Vec<_>>().join(" + ")
}
