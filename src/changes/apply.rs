use super::{Change, DocumentTarget, FileSelector, Kind, Transfer};
use crate::error::{MigrationError, Result};
use crate::path::{self, get_item, insert_item, remove_item, split_last};
use crate::pattern::{PathPattern, render_path};
use crate::tree::{Configuration, Folder, JsonDocument};
use serde_json::Value;
use tracing::{Level, debug, span, trace};

impl Change {
    /// Applies the change to `config`.
    ///
    /// A failing change may leave earlier documents of a broadcast already
    /// edited; callers abandon the tree on error.
    ///
    /// # Errors
    ///
    /// Returns path resolution errors ([`MigrationError::PathNotFound`],
    /// [`MigrationError::PathShapeMismatch`]), matcher errors
    /// ([`MigrationError::InvalidRegexTarget`]) and
    /// [`MigrationError::InvalidCaptureReference`] from template rendering.
    pub fn apply(&self, config: &mut Configuration) -> Result<()> {
        let _span = span!(Level::DEBUG, "change", change = %self).entered();
        debug!("Applying change");
        let root = config.root_mut();

        match &self.kind {
            Kind::AddFolder { path } => add_folder(root, path),
            Kind::AddDocument { folder, name } => {
                path::resolve_folder_mut(root, folder)?
                    .insert_document(name.clone(), JsonDocument::new());
                Ok(())
            }
            Kind::AddItem {
                target,
                item,
                value,
            } => edit_documents(root, target, |content| {
                insert_item(content, item, value.clone())
            }),
            Kind::RegexAddItem {
                target,
                pattern,
                destination,
                value,
            } => edit_documents(root, target, |content| {
                for destination in rendered(content, pattern, destination)? {
                    insert_item(content, &destination, value.clone())?;
                }
                Ok(())
            }),
            Kind::MoveFolder { from, to } => move_folder(root, from, to),
            Kind::MoveDocument { from, to } => move_documents(root, from, to),
            Kind::TransferItem {
                transfer,
                target,
                from,
                to,
            } => edit_documents(root, target, |content| {
                transfer_items(content, *transfer, vec![(from.clone(), to.clone())])
            }),
            Kind::RegexTransferItem {
                transfer,
                target,
                pattern,
                from,
                to,
            } => edit_documents(root, target, |content| {
                let sources = rendered(content, pattern, from)?;
                let destinations = rendered(content, pattern, to)?;
                transfer_items(content, *transfer, sources.into_iter().zip(destinations).collect())
            }),
            Kind::RemoveFolder { path } => {
                let (parent, name) = split_last(path, "the removed folder")?;
                path::resolve_folder_mut(root, parent)?
                    .remove_subfolder(name)
                    .map(drop)
                    .ok_or_else(|| MigrationError::not_found(parent, name))
            }
            Kind::RemoveDocument { target } => {
                let (folder, names) = target.resolve(root)?;
                for name in names {
                    trace!("Removing document {name}");
                    folder.remove_document(&name);
                }
                Ok(())
            }
            Kind::RemoveItem { target, item } => {
                edit_documents(root, target, |content| remove_item(content, item).map(drop))
            }
        }
    }
}

/// Runs `edit` on every selected document in name order.
fn edit_documents(
    root: &mut Folder,
    target: &DocumentTarget,
    mut edit: impl FnMut(&mut Value) -> Result<()>,
) -> Result<()> {
    let (folder, names) = target.resolve(root)?;
    for name in names {
        let _span = span!(Level::TRACE, "document", name = %name).entered();
        let document = folder
            .document_mut(&name)
            .ok_or_else(|| MigrationError::not_found(target.folder(), &name))?;
        document.edit(&mut edit)?;
    }
    Ok(())
}

/// Renders `template` once per match of `pattern`, all before any mutation.
fn rendered(content: &Value, pattern: &PathPattern, template: &[String]) -> Result<Vec<Vec<String>>> {
    let matches = pattern.find(content)?;
    trace!("{} locations match", matches.len());
    matches.iter().map(|found| render_path(template, found)).collect()
}

/// Copies every source to its destination, then, for a move, deletes the
/// sources last-first so earlier list indices stay valid.
fn transfer_items(
    content: &mut Value,
    transfer: Transfer,
    pairs: Vec<(Vec<String>, Vec<String>)>,
) -> Result<()> {
    for (from, to) in &pairs {
        let value = get_item(content, from)?.clone();
        insert_item(content, to, value)?;
    }

    if transfer == Transfer::Move {
        let mut removed: Vec<&Vec<String>> = Vec::with_capacity(pairs.len());
        for (from, _) in pairs.iter().rev() {
            // several matches may render the same source
            if removed.contains(&from) {
                continue;
            }
            remove_item(content, from)?;
            removed.push(from);
        }
    }
    Ok(())
}

fn add_folder(root: &mut Folder, path: &[String]) -> Result<()> {
    let (parent, name) = split_last(path, "the added folder")?;
    path::resolve_folder_mut(root, parent)?.insert_subfolder(name, Folder::new());
    Ok(())
}

fn move_folder(root: &mut Folder, from: &[String], to: &[String]) -> Result<()> {
    let (from_parent, from_name) = split_last(from, "the moved folder")?;
    let (to_parent, to_name) = split_last(to, "the destination folder")?;

    path::resolve_folder(root, to_parent)?;
    let moved = path::resolve_folder_mut(root, from_parent)?
        .remove_subfolder(from_name)
        .ok_or_else(|| MigrationError::not_found(from_parent, from_name))?;
    path::resolve_folder_mut(root, to_parent)?.insert_subfolder(to_name, moved);
    Ok(())
}

fn move_documents(root: &mut Folder, from: &DocumentTarget, to: &DocumentTarget) -> Result<()> {
    path::resolve_folder(root, to.folder())?;

    let source = path::resolve_folder_mut(root, from.folder())?;
    let moved = match (from.files(), to.files()) {
        (FileSelector::File(src), FileSelector::File(dst)) => {
            let document = source
                .remove_document(src)
                .ok_or_else(|| MigrationError::not_found(from.folder(), src))?;
            vec![(dst.clone(), document)]
        }
        // both sides select all documents
        _ => source.take_documents().into_iter().collect(),
    };

    let destination = path::resolve_folder_mut(root, to.folder())?;
    if to.files().is_all_files() {
        // the moved set replaces the destination's documents
        drop(destination.take_documents());
    }
    for (name, document) in moved {
        trace!("Moving document {name}");
        destination.insert_document(name, document);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    fn doc(content: Value) -> JsonDocument {
        JsonDocument::from_value(content, Path::new("t.json")).unwrap()
    }

    fn config() -> Configuration {
        let mut species = Folder::new();
        species.insert_document(
            "bird.json",
            doc(json!({"version": "1.0", "animal": {"size": 1, "legs": [1, 2]}})),
        );
        species.insert_document(
            "fish.json",
            doc(json!({"version": "1.0", "animal": {"size": 2, "legs": []}})),
        );
        let mut root = Folder::new();
        root.insert_subfolder("species", species);
        root.insert_document("run.json", doc(json!({"version": "1.0", "steps": 3})));
        Configuration::new(root, "memory").unwrap()
    }

    fn content<'c>(config: &'c Configuration, folder: &[&str], name: &str) -> &'c Value {
        let mut current = config.root();
        for segment in folder {
            current = current.subfolder(segment).unwrap();
        }
        current.document(name).unwrap().content()
    }

    #[test]
    fn test_add_folder_and_document() {
        let mut config = config();
        Change::add_folder(["species", "extra"]).unwrap().apply(&mut config).unwrap();
        Change::add_document(["species", "extra"], "new.json")
            .unwrap()
            .apply(&mut config)
            .unwrap();

        let extra = config.root().subfolder("species").unwrap().subfolder("extra").unwrap();
        assert_eq!(extra.document("new.json").unwrap().content(), &json!({}));
    }

    #[test]
    fn test_add_folder_replaces_existing() {
        let mut config = config();
        Change::add_folder(["species"]).unwrap().apply(&mut config).unwrap();
        assert!(config.root().subfolder("species").unwrap().is_empty());
    }

    #[test]
    fn test_add_document_replaces_existing() {
        let mut config = config();
        Change::add_document(Vec::<String>::new(), "run.json")
            .unwrap()
            .apply(&mut config)
            .unwrap();
        assert_eq!(content(&config, &[], "run.json"), &json!({}));
    }

    #[test]
    fn test_add_item_broadcast() {
        let mut config = config();
        Change::add_item(DocumentTarget::all_files(["species"]), ["animal", "wings"], json!(0))
            .apply(&mut config)
            .unwrap();
        assert_eq!(content(&config, &["species"], "bird.json")["animal"]["wings"], json!(0));
        assert_eq!(content(&config, &["species"], "fish.json")["animal"]["wings"], json!(0));
    }

    #[test]
    fn test_add_item_on_document_root_keeps_version() {
        let mut config = config();
        let target = DocumentTarget::file(Vec::<String>::new(), "run.json").unwrap();
        Change::add_item(target, Vec::<String>::new(), json!({"steps": 9}))
            .apply(&mut config)
            .unwrap();
        assert_eq!(
            content(&config, &[], "run.json"),
            &json!({"steps": 9, "version": "1.00"})
        );
    }

    #[test]
    fn test_add_item_creates_missing_objects() {
        let mut config = config();
        let target = DocumentTarget::file(Vec::<String>::new(), "run.json").unwrap();
        Change::add_item(target, ["output", "format", "indent"], json!(2))
            .apply(&mut config)
            .unwrap();
        assert_eq!(
            content(&config, &[], "run.json")["output"],
            json!({"format": {"indent": 2}})
        );
    }

    #[test]
    fn test_replacing_document_with_non_object_fails() {
        let mut config = config();
        let target = DocumentTarget::file(Vec::<String>::new(), "run.json").unwrap();
        let err = Change::add_item(target, Vec::<String>::new(), json!([1, 2]))
            .apply(&mut config)
            .unwrap_err();
        assert!(matches!(err, MigrationError::DocumentNotObject("list")));
    }

    #[test]
    fn test_regex_change_without_matches_is_a_no_op() {
        let mut config = config();
        let before = config.clone();
        Change::regex_move_item(
            DocumentTarget::all_files(["species"]),
            ["^animal$", "^tail"],
            ["animal", "<match_1_0>"],
            ["animal", "tails", "<match_1_0>"],
        )
        .unwrap()
        .apply(&mut config)
        .unwrap();
        assert_eq!(config, before);
    }

    #[test]
    fn test_missing_named_document() {
        let mut config = config();
        let target = DocumentTarget::file(["species"], "cat.json").unwrap();
        let err = Change::remove_item(target, ["animal"])
            .unwrap()
            .apply(&mut config)
            .unwrap_err();
        assert!(matches!(err, MigrationError::PathNotFound { ref segment, .. } if segment == "cat.json"));
    }

    #[test]
    fn test_move_and_copy_item() {
        let mut config = config();
        let target = DocumentTarget::file(Vec::<String>::new(), "run.json").unwrap();
        Change::copy_item(target.clone(), ["steps"], ["copied"])
            .unwrap()
            .apply(&mut config)
            .unwrap();
        Change::move_item(target, ["steps"], ["moved"])
            .unwrap()
            .apply(&mut config)
            .unwrap();
        assert_eq!(
            content(&config, &[], "run.json"),
            &json!({"version": "1.0", "copied": 3, "moved": 3})
        );
    }

    #[test]
    fn test_regex_move_list_elements() {
        let mut config = config();
        let target = DocumentTarget::file(["species"], "bird.json").unwrap();
        Change::add_item(target.clone(), ["animal", "byLeg"], json!({}))
            .apply(&mut config)
            .unwrap();
        Change::regex_move_item(
            target,
            ["^animal$", "^legs$", "item_*"],
            ["animal", "legs", "<match_2_0>"],
            ["animal", "byLeg", "leg_<match_2_0>"],
        )
        .unwrap()
        .apply(&mut config)
        .unwrap();

        let animal = &content(&config, &["species"], "bird.json")["animal"];
        assert_eq!(animal["legs"], json!([]));
        assert_eq!(animal["byLeg"], json!({"leg_item_0": 1, "leg_item_1": 2}));
    }

    #[test]
    fn test_move_folder_and_documents() {
        let mut config = config();
        Change::add_folder(["archive"]).unwrap().apply(&mut config).unwrap();
        Change::move_document(
            DocumentTarget::file(Vec::<String>::new(), "run.json").unwrap(),
            DocumentTarget::file(["archive"], "old_run.json").unwrap(),
        )
        .unwrap()
        .apply(&mut config)
        .unwrap();
        Change::move_document(
            DocumentTarget::all_files(["species"]),
            DocumentTarget::all_files(["archive"]),
        )
        .unwrap()
        .apply(&mut config)
        .unwrap();
        Change::move_folder(["archive"], ["species", "archive"])
            .unwrap()
            .apply(&mut config)
            .unwrap();

        let species = config.root().subfolder("species").unwrap();
        assert!(species.documents().is_empty());
        // moving all documents replaces the destination's set
        assert_eq!(
            species.subfolder("archive").unwrap().document_names(),
            vec!["bird.json", "fish.json"]
        );
        assert!(config.root().document("run.json").is_none());
    }

    #[test]
    fn test_move_folder_to_missing_parent_keeps_source() {
        let mut config = config();
        let err = Change::move_folder(["species"], ["nowhere", "species"])
            .unwrap()
            .apply(&mut config)
            .unwrap_err();
        assert!(matches!(err, MigrationError::PathNotFound { .. }));
        assert!(config.root().subfolder("species").is_some());
    }

    #[test]
    fn test_remove_variants() {
        let mut config = config();
        Change::remove_item(DocumentTarget::all_files(["species"]), ["animal", "legs"])
            .unwrap()
            .apply(&mut config)
            .unwrap();
        assert_eq!(
            content(&config, &["species"], "fish.json"),
            &json!({"version": "1.0", "animal": {"size": 2}})
        );

        Change::remove_document(DocumentTarget::all_files(["species"]))
            .apply(&mut config)
            .unwrap();
        assert!(config.root().subfolder("species").unwrap().is_empty());

        Change::remove_folder(["species"]).unwrap().apply(&mut config).unwrap();
        assert!(config.root().subfolder("species").is_none());

        let err = Change::remove_folder(["species"])
            .unwrap()
            .apply(&mut config)
            .unwrap_err();
        assert!(matches!(err, MigrationError::PathNotFound { .. }));
    }
}
