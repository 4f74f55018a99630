//! # confmig - versioned configuration-tree migration
//!
//! confmig loads a directory of nested JSON documents that all carry the same
//! `"version"` field, applies the structural changes recorded for every newer
//! version, and writes a re-versioned copy of the tree.
//!
//! ## Architecture
//!
//! - [`version`]: three-component versions with wildcard-aware loading
//! - [`tree`]: folders, documents and whole configurations, plus disk I/O
//! - [`path`]: literal addressing through folders and JSON values
//! - [`pattern`]: regex matching of many JSON locations at once
//! - [`changes`]: the closed set of edits a migration step can make
//! - [`updater`]: migration steps, the built-in catalog and the driver
//! - [`settings`]: the tool's own TOML settings
//! - [`commands`]: the CLI entry points
//!
//! ## Example
//!
//! ```no_run
//! use confmig::tree::{Configuration, SaveOptions};
//! use confmig::updater::Migrator;
//! use std::path::Path;
//!
//! # fn main() -> confmig::Result<()> {
//! let mut config = Configuration::load(Path::new("config"))?;
//! Migrator::builtin()?.migrate(&mut config, None)?;
//! config.save(Path::new("config_updated"), &SaveOptions::default())?;
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Command implementations behind the CLI.
pub mod commands;

/// The edit operations a migration step is made of.
pub mod changes;

/// Error taxonomy of the migration engine.
pub mod error;

/// Console status output.
pub mod output;

/// Literal path addressing.
pub mod path;

/// Regex path matching and capture substitution.
pub mod pattern;

/// Tool settings.
pub mod settings;

/// Tree model and persistence.
pub mod tree;

/// Migration steps and driver.
pub mod updater;

/// Version numbers.
pub mod version;

pub use error::{MigrationError, Result};

use std::path::PathBuf;

/// Current version of the confmig binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Settings file path relative to the home directory.
pub const DEFAULT_SETTINGS_PATH: &str = ".config/confmig/settings.toml";

/// Environment variable overriding the settings file location.
pub const SETTINGS_ENV: &str = "CONFMIG_SETTINGS_PATH";

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "CONFMIG_LOG";

/// Shared state for command execution: the loaded settings and the migration
/// catalog.
#[derive(Debug, Clone)]
pub struct MigrationContext {
    /// Settings file that was consulted, if any location could be determined.
    pub settings_path: Option<PathBuf>,
    /// Loaded settings, defaults when the file is absent.
    pub settings: settings::Settings,
    /// Driver over the built-in catalog.
    pub migrator: updater::Migrator,
}

impl MigrationContext {
    /// Loads settings from `settings_path`, or from the default location when
    /// `None`, and builds the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file is invalid or the built-in
    /// catalog fails validation.
    pub fn new(settings_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let settings_path = settings_path.or_else(settings::Settings::default_path);

        let settings = match &settings_path {
            Some(path) => {
                let settings = settings::Settings::load(path)?;
                let validator = settings::validator::SettingsValidator::new();
                if let Err(e) = validator.validate_settings_file(path) {
                    output::warning(&format!("Warning: Settings validation failed: {e}"));
                }
                settings
            }
            None => settings::Settings::default(),
        };

        Ok(Self {
            settings_path,
            settings,
            migrator: updater::Migrator::builtin()?,
        })
    }

    /// Context with default settings and an explicit catalog, for tests and
    /// embedding.
    #[must_use]
    pub fn with_migrator(migrator: updater::Migrator) -> Self {
        Self {
            settings_path: None,
            settings: settings::Settings::default(),
            migrator,
        }
    }
}
