//! Chord matching inside the embedded page.
//!
//! Tracks which normalized keys are currently held and compares that set
//! against every binding on each key-down. Unlike recording, matching
//! ignores press order. A chord that fired stays latched until one of its
//! keys is released, so OS key-repeat cannot fire it again.

use crate::platform::{Platform, RawKey, normalize};
use crate::protocol::{HostMessage, PageMessage};
use evidence_panel_config::{KeyToken, ShortcutBinding, chords_equal, render};
use std::sync::mpsc::Sender;

/// Outgoing side of the page-to-host channel.
///
/// Delivery is best-effort: implementations drop messages they cannot send.
pub trait MessageSink {
    fn send_message(&mut self, message: String);
}

impl MessageSink for Sender<String> {
    fn send_message(&mut self, message: String) {
        if self.send(message).is_err() {
            log::debug!("Host channel closed, dropping page message");
        }
    }
}

impl MessageSink for Vec<String> {
    fn send_message(&mut self, message: String) {
        self.push(message);
    }
}

/// Plain text of the card being reviewed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardText {
    pub front: String,
    pub back: Option<String>,
}

/// Page-side shortcut matcher.
#[derive(Debug)]
pub struct ClientMatcher<S: MessageSink> {
    platform: Platform,
    bindings: Vec<ShortcutBinding>,
    card: Option<CardText>,
    held: Vec<KeyToken>,
    latched: Option<Vec<KeyToken>>,
    sink: S,
}

impl<S: MessageSink> ClientMatcher<S> {
    pub fn new(platform: Platform, sink: S) -> Self {
        Self {
            platform,
            bindings: Vec::new(),
            card: None,
            held: Vec::new(),
            latched: None,
            sink,
        }
    }

    pub fn bindings(&self) -> &[ShortcutBinding] {
        &self.bindings
    }

    /// Keys currently held, in press order.
    pub fn held(&self) -> &[KeyToken] {
        &self.held
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Apply an update pushed by the host. The latest push wins.
    pub fn apply(&mut self, message: HostMessage) {
        match message {
            HostMessage::Bindings { bindings } => {
                log::debug!("Page received {} binding(s)", bindings.len());
                self.bindings = bindings;
                self.latched = None;
            }
            HostMessage::CardText { front, back } => {
                self.card = Some(CardText { front, back });
            }
        }
    }

    /// Apply a JSON-encoded host update.
    pub fn apply_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        self.apply(HostMessage::from_json(json)?);
        Ok(())
    }

    /// Handle a key-down. Returns true if a search message was sent.
    pub fn key_down(&mut self, key: &RawKey) -> bool {
        let Some(token) = normalize(key, self.platform) else {
            return false;
        };
        if !self.held.contains(&token) {
            self.held.push(token);
        }

        // Only the exact chord that already fired is held back; adding a key
        // may complete a different binding
        if self
            .latched
            .as_ref()
            .is_some_and(|chord| chords_equal(chord, &self.held))
        {
            return false;
        }
        let Some(binding) = self
            .bindings
            .iter()
            .find(|b| chords_equal(&b.keys, &self.held))
        else {
            return false;
        };
        let Some(card) = &self.card else {
            log::debug!("Shortcut '{}' matched but no card is shown", binding.name);
            return false;
        };

        let back_visible = card.back.is_some();
        let text = render(
            binding.template_for(back_visible),
            &card.front,
            card.back.as_deref(),
        );
        log::debug!(
            "Shortcut '{}' matched, sending {} template",
            binding.name,
            if back_visible { "back" } else { "front" }
        );
        self.latched = Some(self.held.clone());
        self.sink.send_message(PageMessage::Search(text).to_wire());
        true
    }

    /// Handle a key-up.
    pub fn key_up(&mut self, key: &RawKey) {
        let Some(token) = normalize(key, self.platform) else {
            return;
        };
        self.held.retain(|k| *k != token);
        if self
            .latched
            .as_ref()
            .is_some_and(|chord| chord.contains(&token))
        {
            self.latched = None;
        }
    }

    /// Forget all held keys, e.g. when the page loses focus and key-ups
    /// will never arrive.
    pub fn reset(&mut self) {
        self.held.clear();
        self.latched = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::SEARCH_PREFIX;

    fn matcher_with(keys: Vec<KeyToken>) -> ClientMatcher<Vec<String>> {
        let mut m = ClientMatcher::new(Platform::PORTABLE, Vec::new());
        m.apply(HostMessage::Bindings {
            bindings: vec![ShortcutBinding::new(
                "t",
                keys,
                "Q: {front}",
                "Q: {front} A: {back}",
            )],
        });
        m.apply(HostMessage::CardText {
            front: "What is X?".to_string(),
            back: None,
        });
        m
    }

    fn a() -> RawKey {
        RawKey::Text("a".to_string())
    }

    #[test]
    fn test_match_in_either_order() {
        let mut m = matcher_with(vec![KeyToken::Shift, KeyToken::Char('A')]);
        assert!(!m.key_down(&a()));
        assert!(m.key_down(&RawKey::Shift));
        assert_eq!(
            m.sink(),
            &vec![format!("{SEARCH_PREFIX}:Q: What is X?")]
        );
    }

    #[test]
    fn test_key_repeat_does_not_refire() {
        let mut m = matcher_with(vec![KeyToken::Shift, KeyToken::Char('A')]);
        m.key_down(&RawKey::Shift);
        assert!(m.key_down(&a()));
        assert!(!m.key_down(&a()));
        assert!(!m.key_down(&a()));
        assert_eq!(m.sink().len(), 1);

        m.key_up(&a());
        assert!(m.key_down(&a()));
        assert_eq!(m.sink().len(), 2);
    }

    #[test]
    fn test_overlapping_chord_fires_while_first_is_held() {
        let mut m = ClientMatcher::new(Platform::PORTABLE, Vec::new());
        m.apply(HostMessage::Bindings {
            bindings: vec![
                ShortcutBinding::new("one", vec![KeyToken::Shift, KeyToken::Char('A')], "1 {front}", "{front}"),
                ShortcutBinding::new(
                    "two",
                    vec![KeyToken::Shift, KeyToken::Char('A'), KeyToken::Alt],
                    "2 {front}",
                    "{front}",
                ),
            ],
        });
        m.apply(HostMessage::CardText {
            front: "F".to_string(),
            back: None,
        });

        m.key_down(&RawKey::Shift);
        assert!(m.key_down(&a()));
        assert!(m.key_down(&RawKey::Alt));
        // Repeat of the full chord stays suppressed
        assert!(!m.key_down(&RawKey::Alt));
        assert_eq!(
            m.sink(),
            &vec![
                format!("{SEARCH_PREFIX}:1 F"),
                format!("{SEARCH_PREFIX}:2 F"),
            ]
        );
    }

    #[test]
    fn test_unmatched_extra_key_keeps_latch() {
        let mut m = matcher_with(vec![KeyToken::Shift, KeyToken::Char('A')]);
        m.key_down(&RawKey::Shift);
        assert!(m.key_down(&a()));
        m.key_down(&RawKey::Text("b".to_string()));
        m.key_up(&RawKey::Text("b".to_string()));
        assert!(!m.key_down(&a()));
        assert_eq!(m.sink().len(), 1);
    }

    #[test]
    fn test_back_template_when_back_visible() {
        let mut m = matcher_with(vec![KeyToken::Char('A')]);
        m.apply(HostMessage::CardText {
            front: "F".to_string(),
            back: Some("B".to_string()),
        });
        assert!(m.key_down(&a()));
        assert_eq!(m.sink()[0], format!("{SEARCH_PREFIX}:Q: F A: B"));
    }

    #[test]
    fn test_superset_does_not_match() {
        let mut m = matcher_with(vec![KeyToken::Char('A')]);
        m.key_down(&RawKey::Shift);
        assert!(!m.key_down(&a()));
        assert!(m.sink().is_empty());
    }

    #[test]
    fn test_no_card_no_dispatch() {
        let mut m = ClientMatcher::new(Platform::PORTABLE, Vec::new());
        m.apply(HostMessage::Bindings {
            bindings: vec![ShortcutBinding::seed()],
        });
        m.key_down(&RawKey::Shift);
        assert!(!m.key_down(&RawKey::Control));
        assert!(m.sink().is_empty());
    }

    #[test]
    fn test_unprintable_keys_ignored() {
        let mut m = matcher_with(vec![KeyToken::Char('A')]);
        m.key_down(&RawKey::Other);
        assert!(m.held().is_empty());
        m.key_up(&RawKey::Other);
    }

    #[test]
    fn test_reset_clears_held_keys() {
        let mut m = matcher_with(vec![KeyToken::Shift, KeyToken::Char('A')]);
        m.key_down(&RawKey::Shift);
        m.reset();
        assert!(!m.key_down(&a()));
    }

    #[test]
    fn test_apply_json() {
        let mut m = ClientMatcher::new(Platform::PORTABLE, Vec::new());
        m.apply_json(r#"{"type":"card_text","front":"F","back":null}"#)
            .unwrap();
        assert!(m.apply_json("not json").is_err());
    }
}
