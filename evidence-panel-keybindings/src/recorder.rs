//! Shortcut recording state machine.
//!
//! A session collects up to three distinct normalized keys in press order
//! and finalizes on its own once the user stops adding keys. Timing is a
//! single optional deadline: scheduling a new one replaces the old, so two
//! timers can never race to finalize the same session. The host event loop
//! drives it with [`ShortcutRecorder::poll`] and can sleep until
//! [`ShortcutRecorder::next_deadline`].
//!
//! While a session is active every key event is consumed here; nothing is
//! forwarded to the regular handlers until the recorder is idle again.

use crate::platform::{Platform, RawKey, normalize};
use evidence_panel_config::{KeyToken, MAX_CHORD_KEYS};
use std::time::{Duration, Instant};

/// Wait for more keys after the first or second one.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Grace period after the third key so a ragged release still registers.
pub const FULL_CHORD_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
}

/// What happened to a key event handed to the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// No session is active; the event belongs to the normal handlers.
    Forwarded,
    /// The key was appended to the chord.
    Accepted(KeyToken),
    /// Swallowed without changing the chord (unprintable or already held).
    Ignored,
    /// A further distinct key arrived after the chord was already full.
    MaxKeysReached,
}

impl KeyOutcome {
    /// Whether the event was taken by the recorder.
    pub fn is_consumed(&self) -> bool {
        !matches!(self, KeyOutcome::Forwarded)
    }
}

/// Records one chord at a time.
#[derive(Debug)]
pub struct ShortcutRecorder {
    platform: Platform,
    state: RecorderState,
    pressed: Vec<KeyToken>,
    deadline: Option<Instant>,
}

impl ShortcutRecorder {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            state: RecorderState::Idle,
            pressed: Vec::with_capacity(MAX_CHORD_KEYS),
            deadline: None,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Keys captured so far in the current session.
    pub fn pressed(&self) -> &[KeyToken] {
        &self.pressed
    }

    /// When the pending finalize is due, if one is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Begin a session. Returns false, and changes nothing, if one is
    /// already running.
    pub fn start(&mut self) -> bool {
        if self.is_recording() {
            log::debug!("Recording already in progress, ignoring start request");
            return false;
        }
        self.pressed.clear();
        self.deadline = None;
        self.state = RecorderState::Recording;
        log::debug!("Shortcut recording started");
        true
    }

    /// Feed a key-down event.
    pub fn handle_key_down(&mut self, key: &RawKey, now: Instant) -> KeyOutcome {
        if !self.is_recording() {
            return KeyOutcome::Forwarded;
        }

        let Some(token) = normalize(key, self.platform) else {
            return KeyOutcome::Ignored;
        };
        if self.pressed.contains(&token) {
            return KeyOutcome::Ignored;
        }
        if self.pressed.len() >= MAX_CHORD_KEYS {
            log::debug!("Ignoring {token}: chord already has {MAX_CHORD_KEYS} keys");
            return KeyOutcome::MaxKeysReached;
        }

        self.pressed.push(token);
        let delay = if self.pressed.len() == MAX_CHORD_KEYS {
            FULL_CHORD_DELAY
        } else {
            SETTLE_DELAY
        };
        self.deadline = Some(now + delay);
        log::trace!("Recorded key {token} ({} so far)", self.pressed.len());

        KeyOutcome::Accepted(token)
    }

    /// Feed a key-up event. Releases do not change the chord.
    pub fn handle_key_up(&self) -> KeyOutcome {
        if self.is_recording() {
            KeyOutcome::Ignored
        } else {
            KeyOutcome::Forwarded
        }
    }

    /// Finalize the session if its deadline has passed.
    ///
    /// Returns the captured chord when the session ends with at least one key.
    pub fn poll(&mut self, now: Instant) -> Option<Vec<KeyToken>> {
        match self.deadline {
            Some(deadline) if self.is_recording() && now >= deadline => self.finalize(),
            _ => None,
        }
    }

    /// End the session now, keeping whatever was captured.
    pub fn stop(&mut self) -> Option<Vec<KeyToken>> {
        if !self.is_recording() {
            return None;
        }
        self.finalize()
    }

    /// End the session without producing a result (e.g. the editor closed).
    pub fn abandon(&mut self) {
        if self.is_recording() {
            log::debug!("Shortcut recording abandoned");
        }
        self.pressed.clear();
        self.deadline = None;
        self.state = RecorderState::Idle;
    }

    fn finalize(&mut self) -> Option<Vec<KeyToken>> {
        self.deadline = None;
        self.state = RecorderState::Idle;
        if self.pressed.is_empty() {
            log::debug!("Shortcut recording ended with no keys");
            return None;
        }
        let chord = std::mem::take(&mut self.pressed);
        log::info!(
            "Recorded shortcut: {}",
            chord
                .iter()
                .map(KeyToken::name)
                .collect::<Vec<_>>()
                .join("+")
        );
        Some(chord)
    }
}
