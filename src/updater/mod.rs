//! Version-sequenced migration of configuration trees.
//!
//! An [`Updater`] is one catalog step: a target version and the ordered
//! changes that bring a tree from the previous step to it. The [`Migrator`]
//! owns the catalog, picks the steps between a tree's version and the
//! requested one, and runs them in order.

pub mod catalog;

use crate::changes::Change;
use crate::error::{MigrationError, Result};
use crate::tree::Configuration;
use crate::version::Version;
use tracing::{Level, debug, info, span, warn};

/// One migration step.
#[derive(Debug, Clone)]
pub struct Updater {
    version: Version,
    changes: Vec<Change>,
}

impl Updater {
    #[must_use]
    pub const fn new(version: Version, changes: Vec<Change>) -> Self {
        Self { version, changes }
    }

    /// Version a tree carries after this step.
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    #[must_use]
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Runs every change in declared order, then stamps the step's version.
    ///
    /// # Errors
    ///
    /// Returns the first failing change's error; the tree is left half-edited.
    pub fn apply(&self, config: &mut Configuration) -> Result<()> {
        let _span = span!(Level::DEBUG, "updater", version = %self.version).entered();
        for change in &self.changes {
            change.apply(config)?;
        }
        config.refresh_version(self.version);
        debug!("Applied {} changes", self.changes.len());
        Ok(())
    }
}

/// The steps selected for one run.
#[derive(Debug, Clone, Copy)]
pub struct MigrationPlan<'a> {
    from: Version,
    steps: &'a [Updater],
}

impl<'a> MigrationPlan<'a> {
    /// Version the tree starts at.
    #[must_use]
    pub const fn from(&self) -> Version {
        self.from
    }

    /// Steps to run, in order.
    #[must_use]
    pub const fn steps(&self) -> &'a [Updater] {
        self.steps
    }

    /// Version the tree ends at.
    #[must_use]
    pub fn to(&self) -> Version {
        self.steps.last().map_or(self.from, Updater::version)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Applies catalog steps to configurations.
#[derive(Debug, Clone)]
pub struct Migrator {
    updaters: Vec<Updater>,
}

impl Migrator {
    /// Wraps a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::UnorderedCatalog`] unless step versions are
    /// strictly ascending.
    pub fn new(updaters: Vec<Updater>) -> Result<Self> {
        if let Some(pair) = updaters.windows(2).find(|pair| pair[0].version >= pair[1].version) {
            return Err(MigrationError::UnorderedCatalog {
                previous: pair[0].version.to_string(),
                next: pair[1].version.to_string(),
            });
        }
        Ok(Self { updaters })
    }

    /// The migrator over the built-in catalog.
    ///
    /// # Errors
    ///
    /// Fails if a built-in change or the catalog order is invalid.
    pub fn builtin() -> Result<Self> {
        Self::new(catalog::updaters()?)
    }

    #[must_use]
    pub fn updaters(&self) -> &[Updater] {
        &self.updaters
    }

    /// Version of the final catalog step.
    #[must_use]
    pub fn latest(&self) -> Option<Version> {
        self.updaters.last().map(Updater::version)
    }

    fn position(&self, version: Version) -> Option<usize> {
        self.updaters.iter().position(|u| u.version == version)
    }

    /// Selects the steps after `current` up to and including `target` (the
    /// last step when `target` is `None`).
    ///
    /// A target at or before `current` yields an empty plan.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::UnknownStartVersion`] or
    /// [`MigrationError::UnknownTargetVersion`] when either version is not a
    /// catalog step.
    pub fn plan(&self, current: Version, target: Option<Version>) -> Result<MigrationPlan<'_>> {
        let start = self
            .position(current)
            .ok_or_else(|| MigrationError::UnknownStartVersion(current.to_string()))?;
        let end = match target {
            Some(target) => self
                .position(target)
                .ok_or_else(|| MigrationError::UnknownTargetVersion(target.to_string()))?,
            None => self.updaters.len() - 1,
        };

        if end <= start {
            match target {
                Some(target) => warn!("Configuration is already at {current}, not older than {target}"),
                None => info!("Configuration is already at the latest version {current}"),
            }
            return Ok(MigrationPlan {
                from: current,
                steps: &[],
            });
        }

        Ok(MigrationPlan {
            from: current,
            steps: &self.updaters[start + 1..=end],
        })
    }

    /// Migrates `config` in place and returns the version it ends at.
    ///
    /// # Errors
    ///
    /// Planning errors, or the first failing change. On error the tree must be
    /// discarded.
    pub fn migrate(&self, config: &mut Configuration, target: Option<Version>) -> Result<Version> {
        let plan = self.plan(config.version(), target)?;
        let _span = span!(Level::INFO, "migrate", from = %plan.from(), to = %plan.to()).entered();

        for updater in plan.steps() {
            info!("Updating to version {}", updater.version);
            updater.apply(config)?;
        }
        Ok(config.version())
    }
}
