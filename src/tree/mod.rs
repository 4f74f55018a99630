//! In-memory model of a configuration tree.
//!
//! A [`Configuration`] owns one root [`Folder`]; folders own subfolders and
//! [`JsonDocument`]s keyed by name. Versions live on the documents and are
//! aggregated upward on demand.

mod document;
mod folder;
mod persist;

pub use document::{JsonDocument, VERSION_FIELD};
pub use folder::{Folder, TreeVersion};
pub use persist::{DEFAULT_INDENT, DEFAULT_PLACEHOLDER, SaveOptions};

use crate::error::{MigrationError, Result};
use crate::version::Version;
use std::path::Path;
use tracing::{Level, info, span};

/// A whole configuration tree whose documents agree on one version.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    root: Folder,
    version: Version,
}

impl Configuration {
    /// Wraps `root`, checking that its documents agree on a version.
    ///
    /// `origin` describes where the tree came from and is only used in the
    /// error message. A tree without any versioned document is accepted with
    /// [`Version::UNSET`].
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::VersionMismatch`] if the documents disagree.
    pub fn new(root: Folder, origin: &str) -> Result<Self> {
        let version = match root.version() {
            TreeVersion::Uniform(version) => version,
            TreeVersion::Unset => Version::UNSET,
            TreeVersion::Mixed => return Err(MigrationError::VersionMismatch(origin.to_string())),
        };
        Ok(Self { root, version })
    }

    /// Loads the directory tree rooted at `path`.
    ///
    /// # Errors
    ///
    /// Fails on unreadable entries, malformed or unversioned `.json` files, and
    /// with [`MigrationError::VersionMismatch`] when documents disagree.
    pub fn load(path: &Path) -> Result<Self> {
        let _span = span!(Level::DEBUG, "load", path = %path.display()).entered();

        if !path.is_dir() {
            let err = std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory");
            return Err(MigrationError::io(path, err));
        }
        let root = persist::load_folder(path)?;
        let configuration = Self::new(root, &path.display().to_string())?;
        info!(
            "Loaded {} documents at version {}",
            configuration.root.document_count(),
            configuration.version
        );
        Ok(configuration)
    }

    /// Writes the tree to `target`, which must not exist.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::OutputExists`] if `target` exists and
    /// [`MigrationError::Io`] on any write failure.
    pub fn save(&self, target: &Path, options: &SaveOptions) -> Result<()> {
        persist::save_folder(&self.root, target, options)?;
        info!("Saved configuration to {}", target.display());
        Ok(())
    }

    #[must_use]
    pub const fn root(&self) -> &Folder {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Folder {
        &mut self.root
    }

    /// Version shared by the whole tree.
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Stamps `version` onto every document and the configuration itself.
    pub fn refresh_version(&mut self, version: Version) {
        self.root.refresh_version(version);
        self.version = version;
    }
}
