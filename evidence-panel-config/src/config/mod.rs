//! The persisted settings document.
//!
//! `{"keybindings": [...], "width": 500, "height_percentage": 0.95}`
//!
//! Keys this crate does not know about are kept in `extra` and written back
//! untouched, since other parts of the host share the same document.

mod persistence;

use crate::binding::ShortcutBinding;
use crate::defaults;
use serde::{Deserialize, Serialize};

/// Full settings document as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Durable form of the shortcut store
    #[serde(default)]
    pub keybindings: Vec<ShortcutBinding>,

    /// Panel width in logical pixels
    #[serde(default = "defaults::panel_width")]
    pub width: u32,

    /// Panel height as a fraction of the available screen height
    #[serde(default = "defaults::height_percentage")]
    pub height_percentage: f64,

    /// Unrecognized keys, preserved on save
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,

    /// Stored bindings that could not be read on load
    #[serde(skip)]
    pub(crate) unreadable_bindings: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            keybindings: Vec::new(),
            width: defaults::panel_width(),
            height_percentage: defaults::height_percentage(),
            extra: serde_json::Map::new(),
            unreadable_bindings: 0,
        }
    }
}

/// Panel sizing hints carried alongside the bindings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSizing {
    pub width: u32,
    pub height_percentage: f64,
}

impl PanelConfig {
    pub fn sizing(&self) -> PanelSizing {
        PanelSizing {
            width: self.width,
            height_percentage: self.height_percentage.clamp(0.1, 1.0),
        }
    }
}
