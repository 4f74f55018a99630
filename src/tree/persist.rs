//! Reading configuration trees from disk and writing them back.

use super::{Folder, JsonDocument};
use crate::error::{MigrationError, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{Level, debug, span, trace};
use walkdir::WalkDir;

/// Default pretty-print indent width.
pub const DEFAULT_INDENT: usize = 4;

/// Default name of the marker written into empty folders.
pub const DEFAULT_PLACEHOLDER: &str = ".gitkeep";

/// How a tree is materialised on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Spaces per indentation level in written documents.
    pub indent: usize,
    /// Zero-byte file written into folders with no children.
    pub placeholder: String,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

/// Recursively reads `dir` into a [`Folder`].
///
/// Subdirectories become subfolders and `*.json` files become documents. Any
/// other entry is ignored, placeholder files included.
pub(super) fn load_folder(dir: &Path) -> Result<Folder> {
    let mut folder = Folder::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(dir).to_path_buf();
            MigrationError::io(path, err.into())
        })?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        if entry.file_type().is_dir() {
            folder.insert_subfolder(name, load_folder(path)?);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            folder.insert_document(name, load_document(path)?);
        } else {
            trace!("Ignoring {}", path.display());
        }
    }

    Ok(folder)
}

fn load_document(path: &Path) -> Result<JsonDocument> {
    let raw = fs::read_to_string(path).map_err(|err| MigrationError::io(path, err))?;
    let content = serde_json::from_str(&raw).map_err(|source| MigrationError::MalformedDocument {
        path: path.to_path_buf(),
        source,
    })?;
    let document = JsonDocument::from_value(content, path)?;
    debug!("Loaded {} at version {}", path.display(), document.version());
    Ok(document)
}

/// Writes `root` to `target`, which must not exist yet.
///
/// Parent directories of `target` are created as needed; `target` itself is
/// created with a non-recursive call so that a concurrent creation is still
/// reported as [`MigrationError::OutputExists`].
pub(super) fn save_folder(root: &Folder, target: &Path, options: &SaveOptions) -> Result<()> {
    let _span = span!(Level::DEBUG, "save", target = %target.display()).entered();

    if target.exists() {
        return Err(MigrationError::OutputExists(target.to_path_buf()));
    }
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| MigrationError::io(parent, err))?;
    }
    fs::create_dir(target).map_err(|err| match err.kind() {
        ErrorKind::AlreadyExists => MigrationError::OutputExists(target.to_path_buf()),
        _ => MigrationError::io(target, err),
    })?;

    write_contents(root, target, options)
}

fn write_contents(folder: &Folder, dir: &Path, options: &SaveOptions) -> Result<()> {
    if folder.is_empty() {
        let marker = dir.join(&options.placeholder);
        fs::write(&marker, b"").map_err(|err| MigrationError::io(&marker, err))?;
        return Ok(());
    }

    for (name, sub) in folder.subfolders() {
        let sub_dir = dir.join(name);
        fs::create_dir(&sub_dir).map_err(|err| MigrationError::io(&sub_dir, err))?;
        write_contents(sub, &sub_dir, options)?;
    }

    for (name, document) in folder.documents() {
        let path = dir.join(name);
        let text = render_document(document, options.indent).map_err(|source| {
            MigrationError::MalformedDocument {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(&path, text).map_err(|err| MigrationError::io(&path, err))?;
        debug!("Wrote {}", path.display());
    }

    Ok(())
}

/// Pretty-prints a document with `indent` spaces per level and a trailing newline.
fn render_document(
    document: &JsonDocument,
    indent: usize,
) -> std::result::Result<String, serde_json::Error> {
    let indent = vec![b' '; indent];
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
    document.content().serialize(&mut serializer)?;
    buf.push(b'\n');
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
