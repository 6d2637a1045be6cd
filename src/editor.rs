//! Shortcut editing session.
//!
//! An editor works on a draft copy of one binding. The chord can only be
//! changed by a completed recording; the templates and name are edited
//! directly. Nothing reaches the store until `save` succeeds, and dropping
//! the editor discards the draft and ends any recording in progress.

use evidence_panel_config::{ConfigError, KeyToken, ShortcutBinding, ShortcutStore, ValidationError};
use evidence_panel_keybindings::{KeyOutcome, Platform, RawKey, ShortcutRecorder};
use std::time::Instant;

/// Draft editor for a new or existing shortcut.
#[derive(Debug)]
pub struct ShortcutEditor {
    /// Position in the store, `None` for a shortcut that was never saved
    index: Option<usize>,
    draft: ShortcutBinding,
    original: ShortcutBinding,
    recorder: ShortcutRecorder,
}

impl ShortcutEditor {
    /// Start editing a fresh shortcut with default templates and no keys.
    pub fn new_shortcut(platform: Platform) -> Self {
        let draft = ShortcutBinding::draft();
        Self {
            index: None,
            original: draft.clone(),
            draft,
            recorder: ShortcutRecorder::new(platform),
        }
    }

    /// Start editing a copy of the binding at `index`.
    pub fn edit(store: &ShortcutStore, index: usize, platform: Platform) -> Option<Self> {
        let binding = store.get(index)?;
        Some(Self {
            index: Some(index),
            original: binding.clone(),
            draft: binding,
            recorder: ShortcutRecorder::new(platform),
        })
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_new(&self) -> bool {
        self.index.is_none()
    }

    pub fn draft(&self) -> &ShortcutBinding {
        &self.draft
    }

    pub fn recorder(&self) -> &ShortcutRecorder {
        &self.recorder
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_front_template(&mut self, template: impl Into<String>) {
        self.draft.front_template = template.into();
    }

    pub fn set_back_template(&mut self, template: impl Into<String>) {
        self.draft.back_template = template.into();
    }

    /// Whether the draft differs from what the editor was opened with.
    pub fn has_changes(&self) -> bool {
        self.draft.trimmed() != self.original.trimmed()
    }

    /// Begin recording a new chord. Ignored while a recording is running.
    pub fn start_recording(&mut self) -> bool {
        self.recorder.start()
    }

    /// Route a key-down through the recorder.
    ///
    /// While recording the event is consumed; otherwise the caller should
    /// hand it to its normal handlers.
    pub fn handle_key_down(&mut self, key: &RawKey, now: Instant) -> KeyOutcome {
        self.recorder.handle_key_down(key, now)
    }

    pub fn handle_key_up(&mut self) -> KeyOutcome {
        self.recorder.handle_key_up()
    }

    /// Let a due recording finalize. Returns true if the draft's keys changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let chord = self.recorder.poll(now);
        self.commit_chord(chord)
    }

    /// Stop recording now, keeping any captured keys.
    pub fn stop_recording(&mut self) -> bool {
        let chord = self.recorder.stop();
        self.commit_chord(chord)
    }

    fn commit_chord(&mut self, chord: Option<Vec<KeyToken>>) -> bool {
        match chord {
            Some(keys) => {
                self.draft.keys = keys;
                true
            }
            None => false,
        }
    }

    /// Validate and persist the draft.
    ///
    /// A recording still in progress is finalized first. On failure the
    /// store is untouched and the editor stays open with its draft.
    pub fn save(&mut self, store: &ShortcutStore) -> Result<usize, ConfigError> {
        if self.recorder.is_recording() {
            self.stop_recording();
        }
        let index = store.save(&self.draft, self.index)?;
        self.index = Some(index);
        self.draft = store.get(index).unwrap_or_else(|| self.draft.trimmed());
        self.original = self.draft.clone();
        Ok(index)
    }

    /// Whether the delete action should be offered.
    pub fn can_delete(&self, store: &ShortcutStore) -> bool {
        self.index.is_some() && store.can_delete()
    }

    /// Delete the edited binding from the store, consuming the editor.
    pub fn delete(self, store: &ShortcutStore) -> Result<ShortcutBinding, ConfigError> {
        let index = self.index.ok_or(ValidationError::NotPersisted)?;
        store.delete(index)
    }

    /// Close without saving.
    pub fn discard(self) {
        log::debug!("Discarding shortcut draft '{}'", self.draft.name);
    }
}

impl Drop for ShortcutEditor {
    fn drop(&mut self) {
        // Keyboard ownership must not outlive the editor
        self.recorder.abandon();
    }
}
