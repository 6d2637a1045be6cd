//! Settings file I/O and path resolution for `PanelConfig`.

use super::PanelConfig;
use crate::binding::ShortcutBinding;
use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "evidence-panel";
const CONFIG_FILE: &str = "config.json";

impl PanelConfig {
    /// Load the document at `path`, or the defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("Settings file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        log::info!("Loading settings from {:?}", path);
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            log::warn!("Settings file {:?} is empty, using defaults", path);
            return Ok(Self::default());
        }

        // Bindings are read one by one so a single bad entry cannot make the
        // whole document unreadable
        let mut document: serde_json::Value = serde_json::from_str(&contents)?;
        let stored = document
            .as_object_mut()
            .and_then(|fields| fields.remove("keybindings"));
        let mut config: PanelConfig = serde_json::from_value(document)?;

        let entries: Vec<serde_json::Value> = match stored {
            Some(list) => serde_json::from_value(list)?,
            None => Vec::new(),
        };
        for (i, entry) in entries.into_iter().enumerate() {
            match ShortcutBinding::from_stored(entry) {
                Ok(binding) => config.keybindings.push(binding),
                Err(e) => {
                    log::warn!("Skipping unreadable keybinding #{}: {}", i, e);
                    config.unreadable_bindings += 1;
                }
            }
        }
        Ok(config)
    }

    /// Copy the file at `path` next to itself as `<name>.bak`.
    pub fn backup(path: &Path) -> Result<PathBuf, ConfigError> {
        let backup_path = path.with_extension("json.bak");
        fs::copy(path, &backup_path)?;
        log::info!("Backed up settings to {:?}", backup_path);
        Ok(backup_path)
    }

    /// Write the document to `path`.
    ///
    /// The JSON is written to a sibling temp file and renamed over the target,
    /// so a reader never sees a half-written document.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, &json)?;
        fs::rename(&temp_path, path)?;

        log::debug!(
            "Saved settings with {} keybinding(s) to {:?}",
            self.keybindings.len(),
            path
        );
        Ok(())
    }

    /// Get the settings file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE)
    }

    /// Get the settings directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join(APP_DIR)
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            // ~/.config/evidence-panel on every Unix, macOS included
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join(APP_DIR)
            } else {
                PathBuf::from(".")
            }
        }
    }
}
