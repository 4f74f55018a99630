//! Command-line interface definitions for confmig.
//!
//! Shared between the binary and xtask, which renders man pages from them.

#![allow(missing_docs)]

use crate::version::Version;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for confmig.
#[derive(Parser)]
#[command(
    name = "confmig",
    version = crate::VERSION,
    about = "Migrates versioned JSON configuration trees",
    long_about = "Loads a directory tree of versioned JSON documents, applies the catalog of \
                  structural changes between its version and the requested one, and writes \
                  the re-versioned tree next to it"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug logs and per-step detail
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Settings file (default: $CONFMIG_SETTINGS_PATH or ~/.config/confmig/settings.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Migrate a configuration tree to a newer version
    Migrate {
        /// Root directory of the configuration
        config_path: PathBuf,

        /// Version to migrate to (default: latest)
        #[arg(short, long, value_name = "VERSION")]
        to: Option<Version>,

        /// Replace an existing output directory
        #[arg(long)]
        overwrite: bool,
    },

    /// Write one copy of a configuration with literal values changed
    Single {
        /// Root directory of the base configuration
        base_path: PathBuf,

        /// JSON object mapping "file/path.json:item/path" to the value to write
        modifications: PathBuf,

        /// Folder receiving the new configuration
        output_folder: PathBuf,

        /// Number appended to the base name of the new configuration
        index: usize,
    },

    /// Write one configuration per combination of candidate values
    Combinations {
        /// Root directory of the base configuration
        base_path: PathBuf,

        /// JSON object mapping "file/path.json:item/path" to a list of values
        modifications: PathBuf,

        /// Folder receiving the configurations; its contents are replaced
        output_folder: PathBuf,
    },

    /// List the versions known to the migration catalog
    Versions,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
