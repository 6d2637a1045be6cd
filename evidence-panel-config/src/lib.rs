//! Configuration system for the evidence panel.
//!
//! This crate owns everything that is persisted or validated:
//!
//! - Canonical key tokens and shortcut bindings
//! - Front/back text templates and their rendering
//! - The JSON settings document and its atomic persistence
//! - The shortcut store with its validation and refresh notifications

pub mod binding;
pub mod config;
pub mod defaults;
pub mod error;
pub mod key_token;
pub mod store;
pub mod template;

// Re-export main types for convenience
pub use binding::{
    MAX_CHORD_KEYS, ShortcutBinding, chords_equal, format_keys_display, format_keys_verbose,
};
pub use config::{PanelConfig, PanelSizing};
pub use error::{ConfigError, ValidationError};
pub use key_token::{KeyToken, KeyTokenError};
pub use store::{BindingsObserver, ShortcutStore};
pub use template::{BACK_PLACEHOLDER, FRONT_PLACEHOLDER, render};
