//! Application configuration and constants.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::action::MessageAction;
use crate::feedback::FeedbackTimings;
use crate::resolver::TableOverrides;
use crate::sizing::ButtonStyle;
use crate::strip::StripStyle;

pub struct Config {
    /// Main loop tick rate in milliseconds (target 60 FPS = ~16ms)
    pub tick_rate_ms: u64,

    /// How many ticks to show status messages (180 = ~3s at 60fps)
    pub status_timeout_ticks: u64,

    /// Characters appended to a streaming reply per tick
    pub stream_chars_per_tick: usize,

    /// Messages to scroll per key press
    pub scroll_step: usize,

    /// Cells a strip scrolls per horizontal wheel notch
    pub strip_scroll_step: i32,

    pub button: ButtonStyle,

    pub strip: StripStyle,

    pub feedback: FeedbackTimings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            status_timeout_ticks: 180,
            stream_chars_per_tick: 3,
            scroll_step: 1,
            strip_scroll_step: 4,
            button: ButtonStyle::default(),
            strip: StripStyle::default(),
            feedback: FeedbackTimings::default(),
        }
    }
}

/// Key hints shown in the footer
pub const KEY_HINTS: &[(&str, &str)] = &[
    ("Tab", "actions"),
    ("←/→", "move"),
    ("Enter", "select"),
    ("↑/↓", "scroll"),
    ("Esc", "back/quit"),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid overrides file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct OverrideFile {
    #[serde(default)]
    overrides: Vec<OverrideRecord>,
}

#[derive(Debug, Deserialize)]
struct OverrideRecord {
    action: MessageAction,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    icon: Option<String>,
}

/// Parse label/icon overrides from JSON text.
pub fn parse_overrides(text: &str) -> Result<TableOverrides, serde_json::Error> {
    let file: OverrideFile = serde_json::from_str(text)?;
    let mut table = TableOverrides::new();
    for record in file.overrides {
        if let Some(label) = record.label {
            table.set_label(record.action, label);
        }
        if let Some(icon) = record.icon {
            table.set_icon(record.action, icon);
        }
    }
    Ok(table)
}

pub fn load_overrides(path: &Path) -> Result<TableOverrides, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_overrides(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
