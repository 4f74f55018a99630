//! Which documents of a folder a change operates on.

use crate::error::{MigrationError, Result};
use crate::path;
use crate::tree::Folder;
use std::fmt;

/// A single named document, or every document of the folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelector {
    File(String),
    AllFiles,
}

impl FileSelector {
    /// Builds a selector from the two mutually exclusive parameters. An empty
    /// file name counts as omitted.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::ConflictingChangeParameters`] if both or
    /// neither are given.
    pub fn new(file: Option<&str>, all_files: bool) -> Result<Self> {
        match (file.filter(|name| !name.is_empty()), all_files) {
            (Some(name), false) => Ok(Self::File(name.to_string())),
            (None, true) => Ok(Self::AllFiles),
            (Some(name), true) => Err(MigrationError::ConflictingChangeParameters(format!(
                "document '{name}' and all documents were both selected"
            ))),
            (None, false) => Err(MigrationError::ConflictingChangeParameters(
                "either a document name or all documents must be selected".to_string(),
            )),
        }
    }

    #[must_use]
    pub const fn is_all_files(&self) -> bool {
        matches!(self, Self::AllFiles)
    }

    /// Names of the selected documents in `folder`, captured before any edit.
    ///
    /// A named document must exist; the broadcast form yields whatever the
    /// folder holds, possibly nothing.
    pub(crate) fn names_in(&self, folder: &Folder, folder_path: &[String]) -> Result<Vec<String>> {
        match self {
            Self::File(name) if folder.document(name).is_some() => Ok(vec![name.clone()]),
            Self::File(name) => Err(MigrationError::not_found(folder_path, name)),
            Self::AllFiles => Ok(folder.document_names()),
        }
    }
}

impl fmt::Display for FileSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(name) => f.write_str(name),
            Self::AllFiles => f.write_str("*"),
        }
    }
}

/// A folder path plus the documents selected inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTarget {
    folder: Vec<String>,
    files: FileSelector,
}

impl DocumentTarget {
    /// Targets the document `name` in `folder`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::ConflictingChangeParameters`] if `name` is empty.
    pub fn file(folder: impl IntoIterator<Item = impl Into<String>>, name: &str) -> Result<Self> {
        Self::new(folder, Some(name), false)
    }

    /// Targets every document in `folder`.
    #[must_use]
    pub fn all_files(folder: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            folder: folder.into_iter().map(Into::into).collect(),
            files: FileSelector::AllFiles,
        }
    }

    /// General form taking both selector parameters.
    ///
    /// # Errors
    ///
    /// See [`FileSelector::new`].
    pub fn new(
        folder: impl IntoIterator<Item = impl Into<String>>,
        file: Option<&str>,
        all_files: bool,
    ) -> Result<Self> {
        Ok(Self {
            folder: folder.into_iter().map(Into::into).collect(),
            files: FileSelector::new(file, all_files)?,
        })
    }

    #[must_use]
    pub fn folder(&self) -> &[String] {
        &self.folder
    }

    #[must_use]
    pub const fn files(&self) -> &FileSelector {
        &self.files
    }

    /// Resolves the folder and snapshots the selected document names.
    pub(crate) fn resolve<'f>(&self, root: &'f mut Folder) -> Result<(&'f mut Folder, Vec<String>)> {
        let folder = path::resolve_folder_mut(root, &self.folder)?;
        let names = self.files.names_in(folder, &self.folder)?;
        Ok((folder, names))
    }
}

impl fmt::Display for DocumentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.folder {
            write!(f, "{segment}/")?;
        }
        write!(f, "{}", self.files)
    }
}
