pub mod parser;
pub mod validator;

use crate::tree::{DEFAULT_INDENT, DEFAULT_PLACEHOLDER, SaveOptions};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tool settings read from `settings.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// How migrated trees are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Appended to the configuration path to name the `migrate` output.
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Pretty-print indent width.
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// Marker file written into empty folders.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default log level when neither `CONFMIG_LOG` nor `--verbose` is given.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            indent: default_indent(),
            placeholder: default_placeholder(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Settings {
    /// Loads settings from `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or holds
    /// out-of-range values.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        parser::parse_settings_file(path)
    }

    /// Where settings are looked up when no explicit path is given:
    /// `CONFMIG_SETTINGS_PATH`, else `~/.config/confmig/settings.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(crate::SETTINGS_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::home_dir().map(|home| home.join(crate::DEFAULT_SETTINGS_PATH))
    }

    /// Save options derived from the `[output]` table.
    #[must_use]
    pub fn save_options(&self) -> SaveOptions {
        SaveOptions {
            indent: self.output.indent,
            placeholder: self.output.placeholder.clone(),
        }
    }

    /// Output directory for `migrate`: the configuration path with the
    /// configured suffix appended to its last component.
    #[must_use]
    pub fn output_path_for(&self, config_path: &Path) -> PathBuf {
        let mut name = config_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(&self.output.suffix);
        config_path.with_file_name(name)
    }
}

// Default functions for serde
fn default_suffix() -> String {
    "_updated".to_string()
}

const fn default_indent() -> usize {
    DEFAULT_INDENT
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

fn default_level() -> String {
    "warn".to_string()
}
