//! Path addressing through the folder tree and through JSON content.
//!
//! A path is an ordered list of string segments. In the folder domain every
//! segment is an exact subfolder name. In the JSON domain a segment is either an
//! object key or, against a list, an `item_<N>` index token (see [`Segment`]).
//! Folder names are matched literally; only the pattern matcher in
//! [`crate::pattern`] uses partial regex matching.

mod segment;

pub use segment::{INDEX_PREFIX, Segment, index_token};

use crate::error::{MigrationError, Result};
use crate::tree::Folder;
use serde_json::{Map, Value};

/// Human-readable kind of a JSON value, used in shape errors.
#[must_use]
pub const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "object",
        Value::Array(_) => "list",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}

fn shape_mismatch(segment: &str, value: &Value) -> MigrationError {
    MigrationError::PathShapeMismatch {
        segment: segment.to_string(),
        found: kind_of(value),
    }
}

/// Splits a path into its parent prefix and final segment.
///
/// # Errors
///
/// Returns [`MigrationError::RootPathForbidden`] if `path` is empty; `what`
/// names the thing being addressed in the message.
pub fn split_last<'p>(path: &'p [String], what: &'static str) -> Result<(&'p [String], &'p str)> {
    match path.split_last() {
        Some((last, parent)) => Ok((parent, last.as_str())),
        None => Err(MigrationError::RootPathForbidden(what)),
    }
}

/// Walks `path` from `root` through subfolders.
///
/// # Errors
///
/// Returns [`MigrationError::PathNotFound`] if a subfolder is missing.
pub fn resolve_folder<'f>(root: &'f Folder, path: &[String]) -> Result<&'f Folder> {
    let mut folder = root;
    for (depth, name) in path.iter().enumerate() {
        folder = folder
            .subfolder(name)
            .ok_or_else(|| MigrationError::not_found(&path[..depth], name))?;
    }
    Ok(folder)
}

/// Mutable counterpart of [`resolve_folder`].
///
/// # Errors
///
/// Returns [`MigrationError::PathNotFound`] if a subfolder is missing.
pub fn resolve_folder_mut<'f>(root: &'f mut Folder, path: &[String]) -> Result<&'f mut Folder> {
    let mut folder = root;
    for (depth, name) in path.iter().enumerate() {
        folder = folder
            .subfolder_mut(name)
            .ok_or_else(|| MigrationError::not_found(&path[..depth], name))?;
    }
    Ok(folder)
}

fn step<'v>(current: &'v Value, raw: &str, walked: &[String]) -> Result<&'v Value> {
    match (current, Segment::parse(raw)) {
        (Value::Object(map), Segment::Key(key)) => map
            .get(key)
            .ok_or_else(|| MigrationError::not_found(walked, raw)),
        (Value::Array(list), Segment::Index(index)) => list
            .get(index)
            .ok_or_else(|| MigrationError::not_found(walked, raw)),
        (other, _) => Err(shape_mismatch(raw, other)),
    }
}

fn step_mut<'v>(current: &'v mut Value, raw: &str, walked: &[String]) -> Result<&'v mut Value> {
    match (current, Segment::parse(raw)) {
        (Value::Object(map), Segment::Key(key)) => map
            .get_mut(key)
            .ok_or_else(|| MigrationError::not_found(walked, raw)),
        (Value::Array(list), Segment::Index(index)) => list
            .get_mut(index)
            .ok_or_else(|| MigrationError::not_found(walked, raw)),
        (other, _) => Err(shape_mismatch(raw, other)),
    }
}

/// Returns the value at `path`; an empty path addresses `value` itself.
///
/// # Errors
///
/// Returns [`MigrationError::PathNotFound`] for a missing segment and
/// [`MigrationError::PathShapeMismatch`] for index/key confusion.
pub fn get_item<'v>(value: &'v Value, path: &[String]) -> Result<&'v Value> {
    let mut current = value;
    for (depth, raw) in path.iter().enumerate() {
        current = step(current, raw, &path[..depth])?;
    }
    Ok(current)
}

/// Mutable counterpart of [`get_item`].
///
/// # Errors
///
/// Same as [`get_item`].
pub fn get_item_mut<'v>(value: &'v mut Value, path: &[String]) -> Result<&'v mut Value> {
    let mut current = value;
    for (depth, raw) in path.iter().enumerate() {
        current = step_mut(current, raw, &path[..depth])?;
    }
    Ok(current)
}

/// Writes `new_value` at `path`, creating or overwriting the leaf.
///
/// Every segment but the last must already exist. A list leaf may be
/// overwritten or appended to (`item_<len>`). An empty path replaces `value`
/// wholesale.
///
/// # Errors
///
/// Returns [`MigrationError::PathNotFound`] if the parent is missing or a list
/// index lies past the end, and [`MigrationError::PathShapeMismatch`] on
/// index/key confusion.
pub fn set_item(value: &mut Value, path: &[String], new_value: Value) -> Result<()> {
    let Some((leaf, parent_path)) = path.split_last() else {
        *value = new_value;
        return Ok(());
    };
    let parent = get_item_mut(value, parent_path)?;
    write_leaf(parent, parent_path, leaf, new_value)
}

/// Like [`set_item`], but missing object keys along the parent path are
/// created as empty objects and `null` values addressed by a key become
/// objects. This is the write used by add, move and copy changes.
///
/// # Errors
///
/// Returns [`MigrationError::PathNotFound`] for a list index past the end and
/// [`MigrationError::PathShapeMismatch`] when a key or index meets a value it
/// cannot address.
pub fn insert_item(value: &mut Value, path: &[String], new_value: Value) -> Result<()> {
    let Some((leaf, parent_path)) = path.split_last() else {
        *value = new_value;
        return Ok(());
    };
    let mut parent = value;
    for (depth, raw) in parent_path.iter().enumerate() {
        parent = step_or_create(parent, raw, &parent_path[..depth])?;
    }
    object_if_null(parent, leaf);
    write_leaf(parent, parent_path, leaf, new_value)
}

fn object_if_null(current: &mut Value, raw: &str) {
    if current.is_null() && matches!(Segment::parse(raw), Segment::Key(_)) {
        *current = Value::Object(Map::new());
    }
}

fn step_or_create<'v>(current: &'v mut Value, raw: &str, walked: &[String]) -> Result<&'v mut Value> {
    object_if_null(current, raw);
    match (current, Segment::parse(raw)) {
        (Value::Object(map), Segment::Key(key)) => Ok(map
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()))),
        (Value::Array(list), Segment::Index(index)) => list
            .get_mut(index)
            .ok_or_else(|| MigrationError::not_found(walked, raw)),
        (other, _) => Err(shape_mismatch(raw, other)),
    }
}

fn write_leaf(parent: &mut Value, parent_path: &[String], leaf: &str, new_value: Value) -> Result<()> {
    match (parent, Segment::parse(leaf)) {
        (Value::Object(map), Segment::Key(key)) => {
            map.insert(key.to_string(), new_value);
        }
        (Value::Array(list), Segment::Index(index)) if index < list.len() => {
            list[index] = new_value;
        }
        (Value::Array(list), Segment::Index(index)) if index == list.len() => {
            list.push(new_value);
        }
        (Value::Array(_), Segment::Index(_)) => {
            return Err(MigrationError::not_found(parent_path, leaf));
        }
        (other, _) => return Err(shape_mismatch(leaf, other)),
    }
    Ok(())
}

/// Deletes the value at `path` and returns it. List elements after the removed
/// index shift down by one.
///
/// # Errors
///
/// Returns [`MigrationError::RootPathForbidden`] for an empty path,
/// [`MigrationError::PathNotFound`] when the leaf is absent and
/// [`MigrationError::PathShapeMismatch`] on index/key confusion.
pub fn remove_item(value: &mut Value, path: &[String]) -> Result<Value> {
    let (parent_path, leaf) = split_last(path, "the removed item")?;

    let parent = get_item_mut(value, parent_path)?;
    match (parent, Segment::parse(leaf)) {
        (Value::Object(map), Segment::Key(key)) => map
            .shift_remove(key)
            .ok_or_else(|| MigrationError::not_found(parent_path, leaf)),
        (Value::Array(list), Segment::Index(index)) if index < list.len() => Ok(list.remove(index)),
        (Value::Array(_), Segment::Index(_)) => Err(MigrationError::not_found(parent_path, leaf)),
        (other, _) => Err(shape_mismatch(leaf, other)),
    }
}
