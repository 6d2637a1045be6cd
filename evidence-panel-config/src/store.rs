//! The shortcut store: the validated, persisted list of bindings.
//!
//! Mutations run under a write lock, are validated before anything changes,
//! hit the disk first and only then swap the in-memory snapshot. Readers
//! load the snapshot without locking and always see a complete list.

use crate::binding::ShortcutBinding;
use crate::config::{PanelConfig, PanelSizing};
use crate::error::{ConfigError, ValidationError};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;

/// Receives the new binding list after every successful mutation.
pub trait BindingsObserver: Send {
    fn bindings_changed(&self, bindings: &[ShortcutBinding]);
}

impl BindingsObserver for Sender<Vec<ShortcutBinding>> {
    fn bindings_changed(&self, bindings: &[ShortcutBinding]) {
        if self.send(bindings.to_vec()).is_err() {
            log::debug!("Bindings observer channel closed, dropping refresh");
        }
    }
}

/// Persisted, ordered collection of shortcut bindings.
pub struct ShortcutStore {
    path: PathBuf,
    /// Last document written to disk; the lock serializes writers.
    document: Mutex<PanelConfig>,
    snapshot: ArcSwap<Vec<ShortcutBinding>>,
    observers: Mutex<Vec<Box<dyn BindingsObserver>>>,
}

impl std::fmt::Debug for ShortcutStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutStore")
            .field("path", &self.path)
            .field("bindings", &self.snapshot.load().len())
            .finish_non_exhaustive()
    }
}

impl ShortcutStore {
    /// Open the store at the default settings path.
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(PanelConfig::config_path())
    }

    /// Open the store backed by the settings file at `path`.
    ///
    /// Unreadable, invalid or conflicting bindings in the file are logged
    /// and dropped; the file is copied to `config.json.bak` before the
    /// cleaned document replaces it. If no binding survives, the default
    /// binding is seeded and written back immediately.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let mut document = PanelConfig::load_from(&path)?;

        let loaded = document.keybindings.len();
        let bindings = sanitize(std::mem::take(&mut document.keybindings));
        let dropped = loaded - bindings.len() + document.unreadable_bindings;
        document.keybindings = bindings;

        if dropped > 0 {
            let backup = PanelConfig::backup(&path)?;
            log::warn!(
                "Dropping {} keybinding(s) from {:?}; original kept at {:?}",
                dropped,
                path,
                backup
            );
        }

        if document.keybindings.is_empty() {
            log::info!("No keybindings configured, seeding default shortcut");
            document.keybindings.push(ShortcutBinding::seed());
            document.save_to(&path)?;
        } else if dropped > 0 {
            document.save_to(&path)?;
        }

        log::info!(
            "Shortcut store initialized with {} binding(s)",
            document.keybindings.len()
        );

        let snapshot = ArcSwap::from_pointee(document.keybindings.clone());
        Ok(Self {
            path,
            document: Mutex::new(document),
            snapshot,
            observers: Mutex::new(Vec::new()),
        })
    }

    /// Current bindings in insertion order.
    pub fn list(&self) -> Arc<Vec<ShortcutBinding>> {
        self.snapshot.load_full()
    }

    pub fn get(&self, index: usize) -> Option<ShortcutBinding> {
        self.snapshot.load().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    /// Always false once opened; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }

    /// Whether deleting one binding would still leave the store non-empty.
    pub fn can_delete(&self) -> bool {
        self.len() > 1
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sizing(&self) -> PanelSizing {
        self.document.lock().sizing()
    }

    /// Register a refresh observer.
    pub fn subscribe(&self, observer: Box<dyn BindingsObserver>) {
        self.observers.lock().push(observer);
    }

    /// Append `binding` (`index == None`) or replace the binding at `index`.
    ///
    /// Templates are trimmed before validation. Returns the position the
    /// binding now occupies.
    pub fn save(
        &self,
        binding: &ShortcutBinding,
        index: Option<usize>,
    ) -> Result<usize, ConfigError> {
        let binding = binding.trimmed();
        let updated = {
            let mut document = self.document.lock();
            let len = document.keybindings.len();

            if let Some(i) = index
                && i >= len
            {
                return Err(ValidationError::IndexOutOfRange { index: i, len }.into());
            }
            binding.validate()?;
            if let Some(other) = find_chord(&document.keybindings, &binding, index) {
                return Err(ValidationError::DuplicateChord { index: other }.into());
            }

            let mut next = document.clone();
            let position = match index {
                Some(i) => {
                    next.keybindings[i] = binding;
                    i
                }
                None => {
                    next.keybindings.push(binding);
                    len
                }
            };
            next.save_to(&self.path)?;

            *document = next;
            self.snapshot.store(Arc::new(document.keybindings.clone()));
            log::info!(
                "Saved shortcut '{}' at position {}",
                document.keybindings[position].name,
                position
            );
            position
        };

        self.notify();
        Ok(updated)
    }

    /// Remove the binding at `index`. The last binding cannot be removed.
    pub fn delete(&self, index: usize) -> Result<ShortcutBinding, ConfigError> {
        let removed = {
            let mut document = self.document.lock();
            let len = document.keybindings.len();
            if index >= len {
                return Err(ValidationError::IndexOutOfRange { index, len }.into());
            }
            if len <= 1 {
                return Err(ValidationError::LastBinding.into());
            }

            let mut next = document.clone();
            let removed = next.keybindings.remove(index);
            next.save_to(&self.path)?;

            *document = next;
            self.snapshot.store(Arc::new(document.keybindings.clone()));
            log::info!("Deleted shortcut '{}' (was #{})", removed.name, index);
            removed
        };

        self.notify();
        Ok(removed)
    }

    fn notify(&self) {
        let bindings = self.list();
        for observer in self.observers.lock().iter() {
            observer.bindings_changed(&bindings);
        }
    }
}

/// Position of another binding with the same ordered chord, skipping `skip`.
fn find_chord(
    bindings: &[ShortcutBinding],
    candidate: &ShortcutBinding,
    skip: Option<usize>,
) -> Option<usize> {
    bindings
        .iter()
        .enumerate()
        .find(|(i, existing)| Some(*i) != skip && existing.keys == candidate.keys)
        .map(|(i, _)| i)
}

/// Keep the bindings that satisfy every invariant, first one wins on chord clashes.
fn sanitize(bindings: Vec<ShortcutBinding>) -> Vec<ShortcutBinding> {
    let mut kept: Vec<ShortcutBinding> = Vec::with_capacity(bindings.len());
    for binding in bindings {
        let binding = binding.trimmed();
        if let Err(e) = binding.validate() {
            log::warn!("Invalid keybinding '{}': {}", binding.name, e);
            continue;
        }
        if let Some(i) = find_chord(&kept, &binding, None) {
            log::warn!(
                "Keybinding '{}' duplicates the chord of #{}, skipping",
                binding.name,
                i
            );
            continue;
        }
        kept.push(binding);
    }
    kept
}
