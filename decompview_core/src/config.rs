use std::fs;
use std::io::ErrorKind;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variable overriding the selected decompiler.
pub const DECOMPILER_ENV: &str = "DECOMPVIEW_DECOMPILER";

/// Persisted decompiler view settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ViewConfig {
    /// Identifier of the decompiler chosen by the user.
    #[serde(default)]
    pub selected_decompiler: Option<String>,
}

impl ViewConfig {
    /// Load settings from `path`, falling back to defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and
    /// [`Error::Config`] when it is not valid JSON.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_string(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|source| Error::Config {
            path: path.to_string(),
            source,
        })
    }

    /// Write settings to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails or [`Error::Io`] if
    /// the file cannot be written.
    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        let body = serde_json::to_string_pretty(self).map_err(|source| Error::Config {
            path: path.to_string(),
            source,
        })?;
        fs::write(path, body).map_err(|source| Error::Io {
            path: path.to_string(),
            source,
        })
    }

    /// Apply `DECOMPVIEW_DECOMPILER` on top of the loaded settings.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(id) = std::env::var(DECOMPILER_ENV) {
            let id = id.trim();
            if !id.is_empty() {
                self.selected_decompiler = Some(id.to_string());
            }
        }
        self
    }
}
