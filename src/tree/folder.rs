use super::JsonDocument;
use crate::version::Version;
use std::collections::BTreeMap;

/// Aggregated version of a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeVersion {
    /// Nothing below the folder carries a version (empty folder, or only new
    /// documents).
    Unset,
    /// Every versioned descendant agrees on this version.
    Uniform(Version),
    /// Descendants disagree.
    Mixed,
}

impl TreeVersion {
    fn absorb(self, other: Self) -> Self {
        match (self, other) {
            (Self::Mixed, _) | (_, Self::Mixed) => Self::Mixed,
            (Self::Unset, next) | (next, Self::Unset) => next,
            (Self::Uniform(a), Self::Uniform(b)) if a.agrees_with(&b) => {
                Self::Uniform(a.most_specific(b))
            }
            (Self::Uniform(_), Self::Uniform(_)) => Self::Mixed,
        }
    }
}

/// A directory of the configuration tree.
///
/// Children are kept in name order, so broadcast changes visit documents
/// lexicographically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Folder {
    subfolders: BTreeMap<String, Folder>,
    documents: BTreeMap<String, JsonDocument>,
}

impl Folder {
    /// Creates an empty folder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the folder holds neither subfolders nor documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subfolders.is_empty() && self.documents.is_empty()
    }

    #[must_use]
    pub fn subfolder(&self, name: &str) -> Option<&Self> {
        self.subfolders.get(name)
    }

    pub fn subfolder_mut(&mut self, name: &str) -> Option<&mut Self> {
        self.subfolders.get_mut(name)
    }

    #[must_use]
    pub const fn subfolders(&self) -> &BTreeMap<String, Self> {
        &self.subfolders
    }

    /// Inserts or replaces a subfolder, returning the one it displaced.
    pub fn insert_subfolder(&mut self, name: impl Into<String>, folder: Self) -> Option<Self> {
        self.subfolders.insert(name.into(), folder)
    }

    pub fn remove_subfolder(&mut self, name: &str) -> Option<Self> {
        self.subfolders.remove(name)
    }

    #[must_use]
    pub fn document(&self, name: &str) -> Option<&JsonDocument> {
        self.documents.get(name)
    }

    pub fn document_mut(&mut self, name: &str) -> Option<&mut JsonDocument> {
        self.documents.get_mut(name)
    }

    #[must_use]
    pub const fn documents(&self) -> &BTreeMap<String, JsonDocument> {
        &self.documents
    }

    /// Names of the documents directly in this folder, in iteration order.
    #[must_use]
    pub fn document_names(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }

    /// Inserts or replaces a document, returning the one it displaced.
    pub fn insert_document(
        &mut self,
        name: impl Into<String>,
        document: JsonDocument,
    ) -> Option<JsonDocument> {
        self.documents.insert(name.into(), document)
    }

    pub fn remove_document(&mut self, name: &str) -> Option<JsonDocument> {
        self.documents.remove(name)
    }

    /// Detaches every document, leaving subfolders in place.
    pub fn take_documents(&mut self) -> BTreeMap<String, JsonDocument> {
        std::mem::take(&mut self.documents)
    }

    /// Version shared by everything below this folder.
    ///
    /// Empty subfolders and unversioned documents do not take part.
    #[must_use]
    pub fn version(&self) -> TreeVersion {
        let from_folders = self
            .subfolders
            .values()
            .map(Self::version)
            .fold(TreeVersion::Unset, TreeVersion::absorb);

        self.documents
            .values()
            .map(JsonDocument::version)
            .filter(|v| !v.is_unset())
            .map(TreeVersion::Uniform)
            .fold(from_folders, TreeVersion::absorb)
    }

    /// Stamps `version` onto every document below this folder.
    pub fn refresh_version(&mut self, version: Version) {
        for folder in self.subfolders.values_mut() {
            folder.refresh_version(version);
        }
        for document in self.documents.values_mut() {
            document.refresh_version(version);
        }
    }

    /// Total number of documents in this folder and all subfolders.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents.len()
            + self
                .subfolders
                .values()
                .map(Self::document_count)
                .sum::<usize>()
    }
}
