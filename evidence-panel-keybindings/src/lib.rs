//! Keyboard shortcut handling for the evidence panel.
//!
//! This crate turns raw key events into shortcut chords and back into
//! search requests:
//!
//! - Platform normalization shared by host and page (Control/Meta swap)
//! - The timed recorder used by the shortcut editor
//! - The page-side matcher that fires a search for a held chord
//! - The string/JSON messages crossing the host/page boundary

mod matcher;
pub mod parser;
pub mod platform;
pub mod protocol;
pub mod recorder;

pub use matcher::{CardText, ClientMatcher, MessageSink};
pub use parser::{ParseError, chord_to_string, parse_chord};
pub use platform::{Platform, RawKey, normalize};
pub use protocol::{HostMessage, PageMessage, SEARCH_PREFIX, TOGGLE_PANEL_TOKEN};
pub use recorder::{
    FULL_CHORD_DELAY, KeyOutcome, RecorderState, SETTLE_DELAY, ShortcutRecorder,
};
