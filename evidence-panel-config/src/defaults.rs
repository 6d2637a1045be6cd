//! Default values for the settings document and new shortcuts.

use crate::key_token::KeyToken;

pub const FRONT_TEMPLATE: &str = "Can you explain this to me:\nQuestion:\n{front}";

pub const BACK_TEMPLATE: &str = "Can you explain this to me:\nQuestion:\n{front}\n\nAnswer:\n{back}";

/// Name given to the binding seeded on first run.
pub const SEED_NAME: &str = "Default";

/// Name given to a fresh, unsaved draft.
pub const DRAFT_NAME: &str = "New Shortcut";

pub fn seed_keys() -> Vec<KeyToken> {
    vec![KeyToken::Shift, KeyToken::ControlMeta]
}

pub fn panel_width() -> u32 {
    500
}

pub fn height_percentage() -> f64 {
    0.95
}
