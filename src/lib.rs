// Library exports for the host side of the evidence panel.
//
// The binding model, settings file and templates live in
// `evidence-panel-config`; recording, normalization, the page-side matcher
// and the host/page wire format live in `evidence-panel-keybindings`.
// This crate wires them to a host window: panel lifecycle, card text
// extraction and the shortcut editor.

/// Application version (root crate version).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod debug;

pub mod card_text;
pub mod cli;
pub mod editor;
pub mod panel;

pub use card_text::extract_plain_text;
pub use editor::ShortcutEditor;
pub use panel::{PageAction, PanelHost, PanelView};

pub use evidence_panel_config as config;
pub use evidence_panel_keybindings as keybindings;
