//! Error taxonomy for the migration engine.
//!
//! Every variant is fatal: nothing in the engine retries or recovers locally.
//! Errors travel up as values to the binary, which prints one diagnostic line
//! and exits with a non-zero status.

use std::path::PathBuf;

/// Errors raised while loading, editing, migrating or saving a configuration tree.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Documents of one configuration tree carry different versions.
    #[error("configuration files under '{0}' are not in the same version")]
    VersionMismatch(String),

    /// The destination of a save already exists.
    #[error("the '{}' directory already exists", .0.display())]
    OutputExists(PathBuf),

    /// A path segment does not exist in the folder tree or the JSON content.
    #[error("path not found: no '{segment}' at '{path}'")]
    PathNotFound {
        /// Segments walked before the missing one, joined with '/'.
        path: String,
        /// The segment that could not be resolved.
        segment: String,
    },

    /// An empty path was given where the root of the tree cannot be edited.
    #[error("{0} cannot be the root of the configuration")]
    RootPathForbidden(&'static str),

    /// An index token was used against an object, a key against a list, or a
    /// segment was applied to a scalar.
    #[error("segment '{segment}' cannot address a JSON {found}")]
    PathShapeMismatch {
        /// The offending segment.
        segment: String,
        /// Kind of value the segment was applied to.
        found: &'static str,
    },

    /// A regex segment other than the `item_*` sentinel met a JSON list.
    #[error("pattern '{pattern}' reached a list; lists must be matched with 'item_*'")]
    InvalidRegexTarget {
        /// The regex segment that was applied to the list.
        pattern: String,
    },

    /// A `<match_i_j>` placeholder points outside the match it is rendered with.
    #[error("capture reference '{reference}' does not exist in the match")]
    InvalidCaptureReference {
        /// The placeholder as written in the template.
        reference: String,
    },

    /// Mutually exclusive change parameters were both supplied or both omitted.
    #[error("conflicting change parameters: {0}")]
    ConflictingChangeParameters(String),

    /// The configuration's version is not a step of the migration catalog.
    #[error("configuration version '{0}' does not exist in the migration catalog")]
    UnknownStartVersion(String),

    /// The requested output version is not a step of the migration catalog.
    #[error("output version '{0}' does not exist in the migration catalog")]
    UnknownTargetVersion(String),

    /// The migration catalog is not strictly ascending.
    #[error("migration catalog is out of order: '{previous}' is followed by '{next}'")]
    UnorderedCatalog {
        /// Version of the earlier step.
        previous: String,
        /// Version of the step that should have been greater.
        next: String,
    },

    /// An edit left a document whose root is not a JSON object.
    #[error("a document root must be a JSON object, found a {0}")]
    DocumentNotObject(&'static str),

    /// A version string does not look like `MAJOR[.MINOR[.PATCH]]`.
    #[error("invalid version number '{0}'")]
    InvalidVersion(String),

    /// A JSON document lacks a string `"version"` field.
    #[error("'{}' has no \"version\" field", .0.display())]
    MissingVersion(PathBuf),

    /// A regex segment failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern text.
        pattern: String,
        /// Compilation error reported by the regex engine.
        #[source]
        source: regex::Error,
    },

    /// A `.json` file could not be parsed or serialised.
    #[error("malformed JSON document '{}': {source}", path.display())]
    MalformedDocument {
        /// File being read or written.
        path: PathBuf,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem failure while reading or writing the tree.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// Path of the failing operation.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl MigrationError {
    /// Builds an [`MigrationError::Io`] bound to `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Builds a [`MigrationError::PathNotFound`] from the walked prefix.
    pub fn not_found(walked: &[String], segment: &str) -> Self {
        Self::PathNotFound {
            path: if walked.is_empty() {
                "/".to_string()
            } else {
                walked.join("/")
            },
            segment: segment.to_string(),
        }
    }
}

/// Convenience alias used across the engine.
pub type Result<T> = std::result::Result<T, MigrationError>;
