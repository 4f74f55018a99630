pub mod combinations;
pub mod migrate;
pub mod single;
pub mod versions;

use crate::changes::{Change, DocumentTarget};
use crate::tree::{Configuration, SaveOptions};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Separates the document path from the item path in a modification key.
const KEY_SEPARATOR: char = ':';

/// Splits `file/path.json:item/path` into a literal add-item change.
///
/// The part before the first `:` is `/`-separated folders ending in a
/// document name; the part after is the JSON item path, where `item_<N>`
/// addresses list elements. An empty item path replaces the whole document.
///
/// # Errors
///
/// Returns an error if the key has no `:` or names no document.
pub fn modification_change(key: &str, value: Value) -> Result<Change> {
    let (file_path, item_path) = key
        .split_once(KEY_SEPARATOR)
        .with_context(|| format!("Modification key '{key}' must look like 'file/path.json:item/path'"))?;

    let mut folders = split_segments(file_path);
    let file = folders
        .pop()
        .with_context(|| format!("Modification key '{key}' does not name a document"))?;
    let target = DocumentTarget::file(folders, &file)?;

    Ok(Change::add_item(target, split_segments(item_path), value))
}

fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads a modifications file, which must hold a JSON object.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON object.
pub fn read_modifications(path: &Path) -> Result<Map<String, Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read modifications file: {}", path.display()))?;
    let parsed: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Modifications file is not valid JSON: {}", path.display()))?;
    match parsed {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!(
            "Modifications file must contain a JSON object: {}",
            path.display()
        ),
    }
}

/// Name of the configuration a derived copy is named after.
fn base_name(base_path: &Path) -> Result<String> {
    let resolved = if base_path.file_name().is_some() {
        base_path.to_path_buf()
    } else {
        base_path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", base_path.display()))?
    };
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Cannot derive a name from {}", base_path.display()))
}

/// `output_folder/<base_name>_<index>`.
fn numbered_output(base_path: &Path, output_folder: &Path, index: usize) -> Result<PathBuf> {
    Ok(output_folder.join(format!("{}_{index}", base_name(base_path)?)))
}

/// Applies `modifications` to a copy of `base` and saves it to `target`.
fn write_modified(
    base: &Configuration,
    modifications: impl IntoIterator<Item = (String, Value)>,
    target: &Path,
    options: &SaveOptions,
) -> Result<()> {
    let mut config = base.clone();
    for (key, value) in modifications {
        modification_change(&key, value)?
            .apply(&mut config)
            .with_context(|| format!("Failed to apply modification '{key}'"))?;
    }
    config
        .save(target, options)
        .with_context(|| format!("Failed to write {}", target.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::Capability;
    use serde_json::json;

    #[test]
    fn test_modification_key_grammar() {
        let change = modification_change("species/bird.json:animal/size", json!(3)).unwrap();
        assert_eq!(change.capability(), Capability::AddItem);
        assert_eq!(change.to_string(), "add animal/size in species/bird.json");
    }

    #[test]
    fn test_modification_key_rejections() {
        assert!(modification_change("species/bird.json", json!(1)).is_err());
        assert!(modification_change(":animal/size", json!(1)).is_err());
        assert!(modification_change("/:animal", json!(1)).is_err());
    }

    #[test]
    fn test_numbered_output() {
        let path = numbered_output(Path::new("runs/base"), Path::new("out"), 7).unwrap();
        assert_eq!(path, PathBuf::from("out/base_7"));
    }
}
