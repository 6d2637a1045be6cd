//! Command-line interface for evidence-panel.
//!
//! Lets the shortcut list be inspected and edited without the host UI,
//! and replays key sequences through the recorder for troubleshooting.

use crate::debug::DebugLevel;
use crate::editor::ShortcutEditor;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use evidence_panel_config::{
    ShortcutBinding, ShortcutStore, format_keys_display, render,
};
use evidence_panel_keybindings::{
    KeyOutcome, Platform, RawKey, SETTLE_DELAY, chord_to_string, parse_chord,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// evidence-panel - send flashcard text to a medical reference panel
#[derive(Parser)]
#[command(name = "evidence-panel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level for the debug log file
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<DebugLevel>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured shortcuts
    List,

    /// Print the settings file path
    Path,

    /// Add a shortcut
    Add {
        /// Chord such as "Shift+Ctrl+E"
        keys: String,

        #[arg(long, default_value = "New Shortcut")]
        name: String,

        /// Template used on the front side; must contain {front}
        #[arg(long)]
        front: Option<String>,

        /// Template used on the back side; must contain {front}
        #[arg(long)]
        back: Option<String>,
    },

    /// Change an existing shortcut
    Edit {
        /// Position shown by `list`
        index: usize,

        /// New chord such as "Alt+Q"
        #[arg(long)]
        keys: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        front: Option<String>,

        #[arg(long)]
        back: Option<String>,
    },

    /// Delete a shortcut
    Delete {
        /// Position shown by `list`
        index: usize,
    },

    /// Render a shortcut's template for the given card text
    Render {
        index: usize,

        /// Front text of the card
        #[arg(long)]
        front: String,

        /// Back text; when given the back template is used
        #[arg(long)]
        back: Option<String>,
    },

    /// Replay key names through the recorder and print the captured chord
    Record {
        /// Browser-style key names, e.g. Shift Control a
        #[arg(required = true)]
        keys: Vec<String>,

        /// Milliseconds between simulated presses
        #[arg(long, default_value_t = 50)]
        gap_ms: u64,

        /// Use the Control/Command swap of macOS
        #[arg(long)]
        apple: bool,
    },
}

/// Run a parsed command, writing results to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let Cli {
        command, config, ..
    } = cli;
    let config = config.as_deref();

    match command {
        Commands::List => {
            let store = open_store(config)?;
            for (i, binding) in store.list().iter().enumerate() {
                writeln!(
                    out,
                    "{i}: {:<24} {}",
                    format_keys_display(&binding.keys),
                    binding.name
                )?;
            }
        }
        Commands::Path => {
            let store = open_store(config)?;
            writeln!(out, "{}", store.path().display())?;
        }
        Commands::Add {
            keys,
            name,
            front,
            back,
        } => {
            let store = open_store(config)?;
            let mut binding = ShortcutBinding::draft();
            binding.name = name;
            binding.keys = parse_chord(&keys)?;
            if let Some(front) = front {
                binding.front_template = front;
            }
            if let Some(back) = back {
                binding.back_template = back;
            }
            let index = store.save(&binding, None)?;
            writeln!(out, "Added shortcut #{index}: {}", chord_to_string(&binding.keys))?;
        }
        Commands::Edit {
            index,
            keys,
            name,
            front,
            back,
        } => {
            let store = open_store(config)?;
            let Some(mut binding) = store.get(index) else {
                bail!("No shortcut at position {index}");
            };
            if let Some(keys) = keys {
                binding.keys = parse_chord(&keys)?;
            }
            if let Some(name) = name {
                binding.name = name;
            }
            if let Some(front) = front {
                binding.front_template = front;
            }
            if let Some(back) = back {
                binding.back_template = back;
            }
            store.save(&binding, Some(index))?;
            writeln!(out, "Updated shortcut #{index}")?;
        }
        Commands::Delete { index } => {
            let store = open_store(config)?;
            let removed = store.delete(index)?;
            writeln!(out, "Deleted shortcut '{}'", removed.name)?;
        }
        Commands::Render { index, front, back } => {
            let store = open_store(config)?;
            let Some(binding) = store.get(index) else {
                bail!("No shortcut at position {index}");
            };
            let template = binding.template_for(back.is_some());
            writeln!(out, "{}", render(template, &front, back.as_deref()))?;
        }
        Commands::Record {
            keys,
            gap_ms,
            apple,
        } => {
            let platform = if apple {
                Platform::APPLE
            } else {
                Platform::current()
            };
            record(&keys, Duration::from_millis(gap_ms), platform, out)?;
        }
    }

    Ok(())
}

fn open_store(config: Option<&Path>) -> Result<ShortcutStore> {
    match config {
        Some(path) => ShortcutStore::open(path),
        None => ShortcutStore::open_default(),
    }
    .context("Failed to open shortcut settings")
}

fn record(keys: &[String], gap: Duration, platform: Platform, out: &mut impl Write) -> Result<()> {
    let mut editor = ShortcutEditor::new_shortcut(platform);
    editor.start_recording();

    let mut now = Instant::now();
    for name in keys {
        // The host loop polls before dispatching each event
        if editor.poll(now) {
            break;
        }
        match editor.handle_key_down(&RawKey::from_dom_key(name), now) {
            KeyOutcome::Accepted(token) => writeln!(out, "+ {token}")?,
            KeyOutcome::MaxKeysReached => writeln!(out, "! {name}: maximum of 3 keys reached")?,
            KeyOutcome::Ignored | KeyOutcome::Forwarded => writeln!(out, "  {name}: ignored")?,
        }
        now += gap;
    }

    let deadline = editor.recorder().next_deadline().unwrap_or(now + SETTLE_DELAY);
    editor.poll(deadline.max(now));
    if editor.recorder().is_recording() {
        editor.stop_recording();
    }

    if editor.draft().keys.is_empty() {
        writeln!(out, "No keys recorded")?;
    } else {
        writeln!(out, "Recorded: {}", chord_to_string(&editor.draft().keys))?;
    }
    editor.discard();
    Ok(())
}
