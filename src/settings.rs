use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::history::DEFAULT_HISTORY_LIMIT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub history_limit: usize,
    pub stream: StreamSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            stream: StreamSettings::default(),
        }
    }
}

/// Mesh buffer forwarding; off unless asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    pub enabled: bool,
    pub capacity: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            capacity: 64,
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        let settings = serde_json::from_slice(&data)?;

        tracing::info!(path = %path.as_ref().display(), "settings loaded");

        Ok(settings)
    }

    /// Falls back to defaults when the file is missing or unreadable.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            return Self::default();
        }

        Self::load(path).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), "using default settings: {err}");
            Self::default()
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, data)?;

        tracing::info!(path = %path.display(), "settings saved");

        Ok(())
    }
}

pub fn user_settings_path() -> PathBuf {
    PathBuf::from("sceneland.json")
}
