//! The closed catalog of edits a migration step can make.
//!
//! Every [`Change`] is validated when it is built, so a malformed catalog is
//! rejected before any configuration is read. Applying a change mutates a
//! [`Configuration`](crate::tree::Configuration) in place.

mod apply;
mod selector;

pub use selector::{DocumentTarget, FileSelector};

use crate::error::{MigrationError, Result};
use crate::pattern::PathPattern;
use serde_json::Value;
use std::fmt;

/// The capability a change exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    AddFolder,
    AddDocument,
    AddItem,
    AddItemBroadcast,
    RegexAddItem,
    RegexAddItemBroadcast,
    MoveFolder,
    MoveDocument,
    MoveItem,
    MoveItemBroadcast,
    RegexMoveItem,
    RegexMoveItemBroadcast,
    CopyItem,
    CopyItemBroadcast,
    RegexCopyItem,
    RegexCopyItemBroadcast,
    RemoveFolder,
    RemoveDocument,
    RemoveItem,
}

/// Whether an item relocation keeps its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transfer {
    Move,
    Copy,
}

#[derive(Debug, Clone)]
pub(crate) enum Kind {
    AddFolder {
        path: Vec<String>,
    },
    AddDocument {
        folder: Vec<String>,
        name: String,
    },
    AddItem {
        target: DocumentTarget,
        item: Vec<String>,
        value: Value,
    },
    RegexAddItem {
        target: DocumentTarget,
        pattern: PathPattern,
        destination: Vec<String>,
        value: Value,
    },
    MoveFolder {
        from: Vec<String>,
        to: Vec<String>,
    },
    MoveDocument {
        from: DocumentTarget,
        to: DocumentTarget,
    },
    TransferItem {
        transfer: Transfer,
        target: DocumentTarget,
        from: Vec<String>,
        to: Vec<String>,
    },
    RegexTransferItem {
        transfer: Transfer,
        target: DocumentTarget,
        pattern: PathPattern,
        from: Vec<String>,
        to: Vec<String>,
    },
    RemoveFolder {
        path: Vec<String>,
    },
    RemoveDocument {
        target: DocumentTarget,
    },
    RemoveItem {
        target: DocumentTarget,
        item: Vec<String>,
    },
}

/// One validated edit of a configuration tree.
#[derive(Debug, Clone)]
pub struct Change {
    kind: Kind,
}

fn owned(segments: impl IntoIterator<Item = impl Into<String>>) -> Vec<String> {
    segments.into_iter().map(Into::into).collect()
}

fn non_root(segments: Vec<String>, what: &'static str) -> Result<Vec<String>> {
    if segments.is_empty() {
        Err(MigrationError::RootPathForbidden(what))
    } else {
        Ok(segments)
    }
}

impl Change {
    /// Creates an empty folder at `path`, replacing any folder already there.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::RootPathForbidden`] for an empty path.
    pub fn add_folder(path: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        Ok(Self {
            kind: Kind::AddFolder {
                path: non_root(owned(path), "the added folder")?,
            },
        })
    }

    /// Creates an empty document `name` in `folder`, replacing any document
    /// already there.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::ConflictingChangeParameters`] if `name` is empty.
    pub fn add_document(
        folder: impl IntoIterator<Item = impl Into<String>>,
        name: &str,
    ) -> Result<Self> {
        if name.is_empty() {
            return Err(MigrationError::ConflictingChangeParameters(
                "the added document needs a name".to_string(),
            ));
        }
        Ok(Self {
            kind: Kind::AddDocument {
                folder: owned(folder),
                name: name.to_string(),
            },
        })
    }

    /// Writes `value` at `item` in the targeted documents, overwriting what is
    /// there and creating missing parent objects. An empty `item` replaces the
    /// whole document content, which must stay an object.
    #[must_use]
    pub fn add_item(
        target: DocumentTarget,
        item: impl IntoIterator<Item = impl Into<String>>,
        value: Value,
    ) -> Self {
        Self {
            kind: Kind::AddItem {
                target,
                item: owned(item),
                value,
            },
        }
    }

    /// Writes `value` at `destination` once per location matching `pattern`.
    /// `destination` may reference captures with `<match_i_j>`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::InvalidPattern`] if a pattern segment does not
    /// compile and [`MigrationError::RootPathForbidden`] for an empty pattern or
    /// destination.
    pub fn regex_add_item(
        target: DocumentTarget,
        pattern: impl IntoIterator<Item = impl Into<String>>,
        destination: impl IntoIterator<Item = impl Into<String>>,
        value: Value,
    ) -> Result<Self> {
        Ok(Self {
            kind: Kind::RegexAddItem {
                target,
                pattern: PathPattern::new(non_root(owned(pattern), "the matched item")?)?,
                destination: non_root(owned(destination), "the added item")?,
                value,
            },
        })
    }

    /// Rebinds the folder at `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::RootPathForbidden`] if either path is empty.
    pub fn move_folder(
        from: impl IntoIterator<Item = impl Into<String>>,
        to: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        Ok(Self {
            kind: Kind::MoveFolder {
                from: non_root(owned(from), "the moved folder")?,
                to: non_root(owned(to), "the destination folder")?,
            },
        })
    }

    /// Moves one document (possibly renaming it), or every document of one
    /// folder into another, where they replace the documents already there.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::ConflictingChangeParameters`] unless both
    /// targets name a document or both select all documents.
    pub fn move_document(from: DocumentTarget, to: DocumentTarget) -> Result<Self> {
        if from.files().is_all_files() != to.files().is_all_files() {
            return Err(MigrationError::ConflictingChangeParameters(format!(
                "cannot move '{from}' to '{to}': both sides must name a document or both select all documents"
            )));
        }
        Ok(Self {
            kind: Kind::MoveDocument { from, to },
        })
    }

    /// Moves the item at `from` to `to` inside each targeted document.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::RootPathForbidden`] if either path is empty.
    pub fn move_item(
        target: DocumentTarget,
        from: impl IntoIterator<Item = impl Into<String>>,
        to: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        Self::transfer_item(Transfer::Move, target, owned(from), owned(to))
    }

    /// Copies the item at `from` to `to` inside each targeted document.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::RootPathForbidden`] if either path is empty.
    pub fn copy_item(
        target: DocumentTarget,
        from: impl IntoIterator<Item = impl Into<String>>,
        to: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        Self::transfer_item(Transfer::Copy, target, owned(from), owned(to))
    }

    /// For every location matching `pattern`, moves the item at the rendered
    /// `from` template to the rendered `to` template.
    ///
    /// # Errors
    ///
    /// Same as [`Change::regex_add_item`].
    pub fn regex_move_item(
        target: DocumentTarget,
        pattern: impl IntoIterator<Item = impl Into<String>>,
        from: impl IntoIterator<Item = impl Into<String>>,
        to: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        Self::regex_transfer_item(Transfer::Move, target, owned(pattern), owned(from), owned(to))
    }

    /// Copy counterpart of [`Change::regex_move_item`].
    ///
    /// # Errors
    ///
    /// Same as [`Change::regex_add_item`].
    pub fn regex_copy_item(
        target: DocumentTarget,
        pattern: impl IntoIterator<Item = impl Into<String>>,
        from: impl IntoIterator<Item = impl Into<String>>,
        to: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        Self::regex_transfer_item(Transfer::Copy, target, owned(pattern), owned(from), owned(to))
    }

    /// Deletes the folder at `path` with everything below it.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::RootPathForbidden`] for an empty path.
    pub fn remove_folder(path: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        Ok(Self {
            kind: Kind::RemoveFolder {
                path: non_root(owned(path), "the removed folder")?,
            },
        })
    }

    /// Deletes the targeted document, or every document of the folder.
    #[must_use]
    pub const fn remove_document(target: DocumentTarget) -> Self {
        Self {
            kind: Kind::RemoveDocument { target },
        }
    }

    /// Deletes the item at `item` in each targeted document.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::RootPathForbidden`] for an empty path.
    pub fn remove_item(
        target: DocumentTarget,
        item: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        Ok(Self {
            kind: Kind::RemoveItem {
                target,
                item: non_root(owned(item), "the removed item")?,
            },
        })
    }

    fn transfer_item(
        transfer: Transfer,
        target: DocumentTarget,
        from: Vec<String>,
        to: Vec<String>,
    ) -> Result<Self> {
        Ok(Self {
            kind: Kind::TransferItem {
                transfer,
                target,
                from: non_root(from, "the source item")?,
                to: non_root(to, "the destination item")?,
            },
        })
    }

    fn regex_transfer_item(
        transfer: Transfer,
        target: DocumentTarget,
        pattern: Vec<String>,
        from: Vec<String>,
        to: Vec<String>,
    ) -> Result<Self> {
        Ok(Self {
            kind: Kind::RegexTransferItem {
                transfer,
                target,
                pattern: PathPattern::new(non_root(pattern, "the matched item")?)?,
                from: non_root(from, "the source item")?,
                to: non_root(to, "the destination item")?,
            },
        })
    }

    /// Which of the catalog's capabilities this change exercises.
    #[must_use]
    pub fn capability(&self) -> Capability {
        match &self.kind {
            Kind::AddFolder { .. } => Capability::AddFolder,
            Kind::AddDocument { .. } => Capability::AddDocument,
            Kind::AddItem { target, .. } => {
                if target.files().is_all_files() {
                    Capability::AddItemBroadcast
                } else {
                    Capability::AddItem
                }
            }
            Kind::RegexAddItem { target, .. } => {
                if target.files().is_all_files() {
                    Capability::RegexAddItemBroadcast
                } else {
                    Capability::RegexAddItem
                }
            }
            Kind::MoveFolder { .. } => Capability::MoveFolder,
            Kind::MoveDocument { .. } => Capability::MoveDocument,
            Kind::TransferItem {
                transfer, target, ..
            } => match (transfer, target.files().is_all_files()) {
                (Transfer::Move, false) => Capability::MoveItem,
                (Transfer::Move, true) => Capability::MoveItemBroadcast,
                (Transfer::Copy, false) => Capability::CopyItem,
                (Transfer::Copy, true) => Capability::CopyItemBroadcast,
            },
            Kind::RegexTransferItem {
                transfer, target, ..
            } => match (transfer, target.files().is_all_files()) {
                (Transfer::Move, false) => Capability::RegexMoveItem,
                (Transfer::Move, true) => Capability::RegexMoveItemBroadcast,
                (Transfer::Copy, false) => Capability::RegexCopyItem,
                (Transfer::Copy, true) => Capability::RegexCopyItemBroadcast,
            },
            Kind::RemoveFolder { .. } => Capability::RemoveFolder,
            Kind::RemoveDocument { .. } => Capability::RemoveDocument,
            Kind::RemoveItem { .. } => Capability::RemoveItem,
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::AddFolder { path } => write!(f, "add folder {}", path.join("/")),
            Kind::AddDocument { folder, name } => {
                write!(f, "add document {}", join_file(folder, name))
            }
            Kind::AddItem { target, item, .. } => {
                write!(f, "add {} in {target}", item.join("/"))
            }
            Kind::RegexAddItem {
                target,
                pattern,
                destination,
                ..
            } => write!(
                f,
                "add {} for each {} in {target}",
                destination.join("/"),
                pattern.segments().join("/")
            ),
            Kind::MoveFolder { from, to } => {
                write!(f, "move folder {} to {}", from.join("/"), to.join("/"))
            }
            Kind::MoveDocument { from, to } => write!(f, "move document {from} to {to}"),
            Kind::TransferItem {
                transfer,
                target,
                from,
                to,
            } => write!(
                f,
                "{transfer} {} to {} in {target}",
                from.join("/"),
                to.join("/")
            ),
            Kind::RegexTransferItem {
                transfer,
                target,
                pattern,
                from,
                to,
            } => write!(
                f,
                "{transfer} {} to {} for each {} in {target}",
                from.join("/"),
                to.join("/"),
                pattern.segments().join("/")
            ),
            Kind::RemoveFolder { path } => write!(f, "remove folder {}", path.join("/")),
            Kind::RemoveDocument { target } => write!(f, "remove document {target}"),
            Kind::RemoveItem { target, item } => {
                write!(f, "remove {} in {target}", item.join("/"))
            }
        }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Move => "move",
            Self::Copy => "copy",
        })
    }
}

fn join_file(folder: &[String], name: &str) -> String {
    folder
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(name))
        .collect::<Vec<_>>()
        .join("/")
}
