//! Console status lines for the confmig CLI.
//!
//! Everything goes to stderr so that stdout stays clean for command output
//! such as `versions` and shell completions.

use colored::Colorize;
use std::sync::atomic::{AtomicU8, Ordering};

/// How much the CLI reports while it works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Warnings and errors only.
    Quiet = 0,
    /// One line per written configuration.
    Normal = 1,
    /// Also one line per migration step.
    Verbose = 2,
}

impl Verbosity {
    /// Level selected by the global `--quiet` / `--verbose` flags.
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, true) => Self::Verbose,
            (false, false) => Self::Normal,
        }
    }

    const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Quiet,
            2 => Self::Verbose,
            _ => Self::Normal,
        }
    }
}

static LEVEL: AtomicU8 = AtomicU8::new(Verbosity::Normal as u8);

pub fn set_verbosity(level: Verbosity) {
    LEVEL.store(level as u8, Ordering::Relaxed);
}

#[must_use]
pub fn verbosity() -> Verbosity {
    Verbosity::from_raw(LEVEL.load(Ordering::Relaxed))
}

fn shown(needed: Verbosity) -> bool {
    verbosity() >= needed
}

/// A finished configuration, in green.
pub fn success(message: &str) {
    if shown(Verbosity::Normal) {
        eprintln!("{}", message.green());
    }
}

/// Printed even with `--quiet`.
pub fn warning(message: &str) {
    eprintln!("{}", message.yellow().bold());
}

pub fn info(message: &str) {
    if shown(Verbosity::Normal) {
        eprintln!("{}", message.dimmed());
    }
}

/// Per-step detail, only with `--verbose`.
pub fn verbose(message: &str) {
    if shown(Verbosity::Verbose) {
        eprintln!("{}", message.dimmed());
    }
}

/// `Writing runs/base_3`, with the verb dimmed and bold.
pub fn action(verb: &str, message: &str) {
    if shown(Verbosity::Normal) {
        eprintln!("{} {message}", verb.dimmed().bold());
    }
}
