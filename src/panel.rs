//! Host-side panel lifecycle and channel routing.
//!
//! The panel is one long-lived resource owned by the host window. It is
//! created on first use, never torn down while the host runs, and receives
//! the binding list and card text as data pushes.

use crate::card_text::extract_plain_text;
use evidence_panel_config::{PanelSizing, ShortcutBinding, ShortcutStore};
use evidence_panel_keybindings::{CardText, HostMessage, PageMessage};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};

/// The embedded web view that hosts the third-party site.
///
/// Rendering, docking and styling live behind this seam.
pub trait PanelView {
    fn show(&mut self, sizing: PanelSizing);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
    /// Put `text` into the site's search field.
    fn fill_search(&mut self, text: &str);
    /// Deliver a JSON host message to the page script.
    fn post_to_page(&mut self, json: &str);
}

/// What the host did with a page message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    Shown,
    Hidden,
    SearchFilled(String),
}

/// Owns the panel and keeps the page in sync with the store.
pub struct PanelHost<V: PanelView> {
    store: Arc<ShortcutStore>,
    factory: Box<dyn FnMut() -> V>,
    panel: Option<V>,
    card: Option<CardText>,
    refreshes: Receiver<Vec<ShortcutBinding>>,
}

impl<V: PanelView> std::fmt::Debug for PanelHost<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelHost")
            .field("panel_created", &self.panel.is_some())
            .field("card", &self.card)
            .finish_non_exhaustive()
    }
}

impl<V: PanelView> PanelHost<V> {
    /// Create the host. The panel itself is built by `factory` on first use.
    pub fn new(store: Arc<ShortcutStore>, factory: impl FnMut() -> V + 'static) -> Self {
        let (tx, refreshes) = channel();
        store.subscribe(Box::new(tx));
        Self {
            store,
            factory: Box::new(factory),
            panel: None,
            card: None,
            refreshes,
        }
    }

    pub fn panel(&self) -> Option<&V> {
        self.panel.as_ref()
    }

    pub fn card(&self) -> Option<&CardText> {
        self.card.as_ref()
    }

    /// Route a raw page message. Returns `None` for messages owned elsewhere.
    pub fn handle_page_message(&mut self, raw: &str) -> Option<PageAction> {
        match PageMessage::parse(raw)? {
            PageMessage::TogglePanel => Some(self.toggle()),
            PageMessage::Search(text) => {
                self.fill_search(&text);
                Some(PageAction::SearchFilled(text))
            }
        }
    }

    /// Show the panel if hidden, hide it if visible.
    pub fn toggle(&mut self) -> PageAction {
        let sizing = self.store.sizing();
        let panel = self.ensure_panel();
        if panel.is_visible() {
            panel.hide();
            PageAction::Hidden
        } else {
            panel.show(sizing);
            PageAction::Shown
        }
    }

    /// Show the panel and put `text` into its search field.
    pub fn fill_search(&mut self, text: &str) {
        let sizing = self.store.sizing();
        let panel = self.ensure_panel();
        if !panel.is_visible() {
            panel.show(sizing);
        }
        panel.fill_search(text);
        log::info!("Filled panel search with {} chars", text.chars().count());
    }

    /// A card side was rendered. `back_html` is `None` while only the front shows.
    pub fn show_card(&mut self, front_html: &str, back_html: Option<&str>) {
        let card = CardText {
            front: extract_plain_text(front_html),
            back: back_html.map(extract_plain_text),
        };
        let message = card_message(&card);
        self.card = Some(card);
        self.post(&message);
    }

    /// Apply pending store refreshes, pushing only the most recent list.
    pub fn pump(&mut self) -> bool {
        let Some(latest) = self.refreshes.try_iter().last() else {
            return false;
        };
        self.post(&HostMessage::Bindings { bindings: latest });
        true
    }

    fn ensure_panel(&mut self) -> &mut V {
        let created = self.panel.is_none();
        let panel = self.panel.get_or_insert_with(|| {
            log::info!("Creating evidence panel");
            (self.factory)()
        });
        if created {
            // Anything queued before the page existed is superseded by this push
            self.refreshes.try_iter().for_each(drop);
            let bindings = self.store.list().to_vec();
            post_to(panel, &HostMessage::Bindings { bindings });
            if let Some(card) = &self.card {
                post_to(panel, &card_message(card));
            }
        }
        panel
    }

    fn post(&mut self, message: &HostMessage) {
        match self.panel.as_mut() {
            Some(panel) => post_to(panel, message),
            None => log::trace!("Panel not created yet, dropping host message"),
        }
    }
}

fn card_message(card: &CardText) -> HostMessage {
    HostMessage::CardText {
        front: card.front.clone(),
        back: card.back.clone(),
    }
}

fn post_to<V: PanelView>(panel: &mut V, message: &HostMessage) {
    match message.to_json() {
        Ok(json) => panel.post_to_page(&json),
        Err(e) => log::error!("Failed to encode host message: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Debug, Default)]
    struct Recorded {
        visible: bool,
        shows: usize,
        searches: Vec<String>,
        posts: Vec<String>,
    }

    struct FakeView(Rc<RefCell<Recorded>>);

    impl PanelView for FakeView {
        fn show(&mut self, _sizing: PanelSizing) {
            let mut r = self.0.borrow_mut();
            r.visible = true;
            r.shows += 1;
        }
        fn hide(&mut self) {
            self.0.borrow_mut().visible = false;
        }
        fn is_visible(&self) -> bool {
            self.0.borrow().visible
        }
        fn fill_search(&mut self, text: &str) {
            self.0.borrow_mut().searches.push(text.to_string());
        }
        fn post_to_page(&mut self, json: &str) {
            self.0.borrow_mut().posts.push(json.to_string());
        }
    }

    fn host() -> (TempDir, Arc<ShortcutStore>, Rc<RefCell<Recorded>>, PanelHost<FakeView>) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(ShortcutStore::open(dir.path().join("config.json")).unwrap());
        let state = Rc::new(RefCell::new(Recorded::default()));
        let shared = Rc::clone(&state);
        let host = PanelHost::new(Arc::clone(&store), move || FakeView(Rc::clone(&shared)));
        (dir, store, state, host)
    }

    #[test]
    fn test_panel_created_lazily() {
        let (_dir, _store, state, mut host) = host();
        host.show_card("<b>Front</b>", None);
        assert!(host.panel().is_none());
        assert!(state.borrow().posts.is_empty());

        assert_eq!(host.handle_page_message("openevidence"), Some(PageAction::Shown));
        let posts = &state.borrow().posts;
        assert_eq!(posts.len(), 2);
        assert!(posts[0].contains(r#""type":"bindings""#));
        assert!(posts[1].contains(r#""front":"Front""#));
    }

    #[test]
    fn test_toggle_hides_visible_panel() {
        let (_dir, _store, state, mut host) = host();
        host.toggle();
        assert_eq!(host.toggle(), PageAction::Hidden);
        assert!(!state.borrow().visible);
        assert_eq!(host.toggle(), PageAction::Shown);
        assert_eq!(state.borrow().shows, 2);
    }

    #[test]
    fn test_search_message_opens_and_fills() {
        let (_dir, _store, state, mut host) = host();
        let action = host.handle_page_message("openevidence_search:Q: What is X?");
        assert_eq!(action, Some(PageAction::SearchFilled("Q: What is X?".to_string())));
        let r = state.borrow();
        assert!(r.visible);
        assert_eq!(r.searches, vec!["Q: What is X?".to_string()]);
    }

    #[test]
    fn test_foreign_message_ignored() {
        let (_dir, _store, _state, mut host) = host();
        assert_eq!(host.handle_page_message("ans"), None);
        assert!(host.panel().is_none());
    }

    #[test]
    fn test_pump_pushes_latest_bindings_only() {
        let (_dir, store, state, mut host) = host();
        host.toggle();
        state.borrow_mut().posts.clear();

        for c in ['A', 'B'] {
            let b = ShortcutBinding::new(
                "n",
                vec![evidence_panel_config::KeyToken::Char(c)],
                "{front}",
                "{front}",
            );
            store.save(&b, None).unwrap();
        }
        assert!(host.pump());
        assert!(!host.pump());

        let posts = &state.borrow().posts;
        assert_eq!(posts.len(), 1);
        match HostMessage::from_json(&posts[0]).unwrap() {
            HostMessage::Bindings { bindings } => assert_eq!(bindings.len(), 3),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_show_card_extracts_text() {
        let (_dir, _store, _state, mut host) = host();
        host.show_card("<div>Q&amp;A</div>", Some("<i>answer</i>"));
        assert_eq!(
            host.card(),
            Some(&CardText {
                front: "Q&A".to_string(),
                back: Some("answer".to_string()),
            })
        );
    }
}
