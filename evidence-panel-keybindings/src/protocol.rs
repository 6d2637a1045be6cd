//! Messages exchanged between the host and the embedded page.
//!
//! Page to host: single strings. A bare token toggles the panel, a prefixed
//! string carries text for the search field. Anything else belongs to some
//! other consumer of the channel and is left alone.
//!
//! Host to page: JSON data, never script. The page keeps the latest
//! binding list and card text it received.

use evidence_panel_config::ShortcutBinding;
use serde::{Deserialize, Serialize};

/// Bare message asking the host to show or hide the panel.
pub const TOGGLE_PANEL_TOKEN: &str = "openevidence";

/// Prefix of a search request; the rendered text follows the colon.
pub const SEARCH_PREFIX: &str = "openevidence_search";

/// A message sent from the embedded page to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageMessage {
    TogglePanel,
    Search(String),
}

impl PageMessage {
    /// Parse a raw channel string. Returns `None` for messages owned by others.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw == TOGGLE_PANEL_TOKEN {
            return Some(PageMessage::TogglePanel);
        }
        raw.strip_prefix(SEARCH_PREFIX)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(|text| PageMessage::Search(text.to_string()))
    }

    /// Encode for the channel.
    pub fn to_wire(&self) -> String {
        match self {
            PageMessage::TogglePanel => TOGGLE_PANEL_TOKEN.to_string(),
            PageMessage::Search(text) => format!("{SEARCH_PREFIX}:{text}"),
        }
    }
}

/// A message pushed from the host into the embedded page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    /// The complete current binding list; replaces whatever the page had.
    Bindings { bindings: Vec<ShortcutBinding> },
    /// Plain text of the card currently shown. `back` is `None` while only
    /// the front is visible.
    CardText { front: String, back: Option<String> },
}

impl HostMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
