//! Integration tests for evidence-panel-keybindings.
//!
//! These exercise the record → store-shaped binding → page match pipeline
//! through the public API, with simulated timestamps.

use evidence_panel_config::{KeyToken, ShortcutBinding};
use evidence_panel_keybindings::{
    ClientMatcher, FULL_CHORD_DELAY, HostMessage, KeyOutcome, PageMessage, Platform, RawKey,
    SETTLE_DELAY, ShortcutRecorder, normalize, parse_chord,
};
use std::sync::mpsc;
use std::time::{Duration, Instant};

fn text(s: &str) -> RawKey {
    RawKey::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// Recorder properties
// ---------------------------------------------------------------------------

#[test]
fn test_recorded_chord_has_no_duplicates_and_at_most_three_keys() {
    let sequences: Vec<Vec<RawKey>> = vec![
        vec![RawKey::Shift, RawKey::Shift, text("a"), text("A"), RawKey::Alt, text("b")],
        vec![text("x"), RawKey::Other, text("x"), text("y")],
        vec![RawKey::Control, RawKey::Meta, RawKey::Shift, RawKey::Alt, text("1")],
        vec![RawKey::Other, RawKey::Other],
    ];

    for keys in sequences {
        let mut rec = ShortcutRecorder::new(Platform::PORTABLE);
        rec.start();
        let t0 = Instant::now();
        for (i, key) in keys.iter().enumerate() {
            rec.handle_key_down(key, t0 + Duration::from_millis(10 * i as u64));
        }

        let mut expected: Vec<KeyToken> = Vec::new();
        for key in &keys {
            if let Some(token) = normalize(key, Platform::PORTABLE)
                && !expected.contains(&token)
                && expected.len() < 3
            {
                expected.push(token);
            }
        }

        let chord = rec.stop().unwrap_or_default();
        assert_eq!(chord, expected, "sequence {keys:?}");
        assert!(chord.len() <= 3);
    }
}

#[test]
fn test_recording_finalizes_within_settle_delay() {
    let mut rec = ShortcutRecorder::new(Platform::PORTABLE);
    rec.start();
    let t0 = Instant::now();
    rec.handle_key_down(&RawKey::Alt, t0);
    let last = t0 + Duration::from_millis(120);
    rec.handle_key_down(&text("p"), last);

    assert_eq!(rec.poll(last + SETTLE_DELAY - Duration::from_millis(1)), None);
    assert_eq!(
        rec.poll(last + SETTLE_DELAY),
        Some(vec![KeyToken::Alt, KeyToken::Char('P')])
    );
}

#[test]
fn test_recording_finalizes_quickly_after_third_key() {
    let mut rec = ShortcutRecorder::new(Platform::PORTABLE);
    rec.start();
    let t0 = Instant::now();
    rec.handle_key_down(&RawKey::Alt, t0);
    rec.handle_key_down(&RawKey::Shift, t0 + Duration::from_millis(40));
    let third = t0 + Duration::from_millis(80);
    rec.handle_key_down(&text("z"), third);

    assert_eq!(rec.next_deadline(), Some(third + FULL_CHORD_DELAY));
    assert!(rec.poll(third + FULL_CHORD_DELAY).is_some());
    assert!(!rec.is_recording());
}

#[test]
fn test_key_events_are_exclusive_while_recording() {
    let mut rec = ShortcutRecorder::new(Platform::PORTABLE);
    let t0 = Instant::now();
    assert!(!rec.handle_key_down(&text("q"), t0).is_consumed());

    rec.start();
    assert!(rec.handle_key_down(&text("q"), t0).is_consumed());
    assert!(rec.handle_key_down(&RawKey::Other, t0).is_consumed());
    assert!(rec.handle_key_up().is_consumed());

    rec.poll(t0 + SETTLE_DELAY);
    assert_eq!(rec.handle_key_down(&text("q"), t0), KeyOutcome::Forwarded);
}

// ---------------------------------------------------------------------------
// Recorder → matcher
// ---------------------------------------------------------------------------

#[test]
fn test_recorded_chord_matches_in_page_regardless_of_order() {
    let mut rec = ShortcutRecorder::new(Platform::PORTABLE);
    rec.start();
    let t0 = Instant::now();
    rec.handle_key_down(&RawKey::Shift, t0);
    rec.handle_key_down(&text("a"), t0);
    let keys = rec.poll(t0 + SETTLE_DELAY).unwrap();

    let (tx, rx) = mpsc::channel();
    let mut page = ClientMatcher::new(Platform::PORTABLE, tx);
    page.apply(HostMessage::Bindings {
        bindings: vec![ShortcutBinding::new("n", keys, "Q: {front}", "{front}/{back}")],
    });
    page.apply(HostMessage::CardText {
        front: "What is X?".to_string(),
        back: None,
    });

    page.key_down(&RawKey::from_dom_key("a"));
    page.key_down(&RawKey::from_dom_key("Shift"));
    // OS key repeat
    page.key_down(&RawKey::from_dom_key("a"));
    page.key_down(&RawKey::from_dom_key("a"));

    let messages: Vec<String> = rx.try_iter().collect();
    assert_eq!(messages.len(), 1);
    assert_eq!(
        PageMessage::parse(&messages[0]),
        Some(PageMessage::Search("Q: What is X?".to_string()))
    );

    page.key_up(&RawKey::from_dom_key("a"));
    page.key_down(&RawKey::from_dom_key("a"));
    assert_eq!(rx.try_iter().count(), 1);
}

#[test]
fn test_apple_chord_recorded_on_host_matches_in_page() {
    let mut rec = ShortcutRecorder::new(Platform::APPLE);
    rec.start();
    let t0 = Instant::now();
    rec.handle_key_down(&RawKey::Control, t0);
    rec.handle_key_down(&text("e"), t0);
    let keys = rec.stop().unwrap();
    assert_eq!(keys, vec![KeyToken::Meta, KeyToken::Char('E')]);

    let mut page = ClientMatcher::new(Platform::APPLE, Vec::new());
    page.apply(HostMessage::Bindings {
        bindings: vec![ShortcutBinding::new("n", keys, "{front}", "{front}")],
    });
    page.apply(HostMessage::CardText {
        front: "card".to_string(),
        back: None,
    });
    page.key_down(&RawKey::Control);
    assert!(page.key_down(&text("E")));
}

#[test]
fn test_binding_refresh_replaces_page_table() {
    let mut page = ClientMatcher::new(Platform::PORTABLE, Vec::new());
    page.apply(HostMessage::CardText {
        front: "F".to_string(),
        back: None,
    });
    page.apply(HostMessage::Bindings {
        bindings: vec![ShortcutBinding::new(
            "old",
            parse_chord("Alt+O").unwrap(),
            "{front}",
            "{front}",
        )],
    });
    page.apply(HostMessage::Bindings {
        bindings: vec![ShortcutBinding::new(
            "new",
            parse_chord("Alt+N").unwrap(),
            "new {front}",
            "{front}",
        )],
    });

    page.key_down(&RawKey::Alt);
    assert!(!page.key_down(&text("o")));
    page.key_up(&text("o"));
    assert!(page.key_down(&text("n")));
    assert_eq!(page.sink().len(), 1);
    assert!(page.sink()[0].ends_with("new F"));
}
