use crate::error::{MigrationError, Result};
use crate::path::kind_of;
use crate::version::Version;
use serde_json::{Map, Value};
use std::path::Path;

/// Name of the field every document carries its version in.
pub const VERSION_FIELD: &str = "version";

/// One parsed `.json` file together with the version stamped into it.
///
/// The stored [`Version`] and `content["version"]` never drift apart: edits go
/// through [`JsonDocument::edit`], which re-reads the field afterwards, and
/// [`JsonDocument::refresh_version`] rewrites both at once.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonDocument {
    content: Value,
    version: Version,
}

impl Default for JsonDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonDocument {
    /// An empty object with no version yet. Created by document-add changes;
    /// it receives a version the next time the tree is re-stamped.
    #[must_use]
    pub fn new() -> Self {
        Self {
            content: Value::Object(Map::new()),
            version: Version::UNSET,
        }
    }

    /// Wraps parsed content, extracting its required `"version"` field.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::MissingVersion`] if the field is absent or not a
    /// string, and [`MigrationError::InvalidVersion`] if it does not parse.
    pub fn from_value(content: Value, origin: &Path) -> Result<Self> {
        let raw = content
            .get(VERSION_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| MigrationError::MissingVersion(origin.to_path_buf()))?;
        let version = Version::parse(raw)?;
        Ok(Self { content, version })
    }

    /// The parsed JSON content.
    #[must_use]
    pub const fn content(&self) -> &Value {
        &self.content
    }

    /// The document's version.
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Runs `f` against the content, then brings the stored version back in
    /// line with the `"version"` field.
    ///
    /// If the edit removed or corrupted the field, the stored version is written
    /// back so the two stay in sync.
    ///
    /// # Errors
    ///
    /// Propagates whatever `f` returns, and returns
    /// [`MigrationError::DocumentNotObject`] if the content is no longer an
    /// object and so cannot carry a version.
    pub fn edit<T>(&mut self, f: impl FnOnce(&mut Value) -> Result<T>) -> Result<T> {
        let outcome = f(&mut self.content);
        if !self.content.is_object() {
            return Err(MigrationError::DocumentNotObject(kind_of(&self.content)));
        }
        self.sync_version();
        outcome
    }

    /// Stamps `version` into both the stored version and the content.
    pub fn refresh_version(&mut self, version: Version) {
        self.version = version;
        self.write_version_field();
    }

    fn sync_version(&mut self) {
        let parsed = self
            .content
            .get(VERSION_FIELD)
            .and_then(Value::as_str)
            .and_then(|raw| Version::parse(raw).ok());
        match parsed {
            Some(version) => self.version = version,
            None => self.write_version_field(),
        }
    }

    fn write_version_field(&mut self) {
        if self.version.is_unset() {
            return;
        }
        if let Value::Object(map) = &mut self.content {
            map.insert(
                VERSION_FIELD.to_string(),
                Value::String(self.version.to_string()),
            );
        }
    }
}
