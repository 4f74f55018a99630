use confmig::MigrationError;
use confmig::changes::{Capability, Change, DocumentTarget};
use confmig::tree::{Configuration, Folder, JsonDocument};
use confmig::version::Version;
use rstest::rstest;
use serde_json::{Value, json};
use std::path::Path;

const ROOT: [&str; 0] = [];

fn document(content: Value) -> JsonDocument {
    JsonDocument::from_value(content, Path::new("test.json")).unwrap()
}

fn single_document(name: &str, content: Value) -> Configuration {
    let mut root = Folder::new();
    root.insert_document(name, document(content));
    Configuration::new(root, "test").unwrap()
}

fn species_config() -> Configuration {
    single_document(
        "species.json",
        json!({"version": "1.0", "animal": {"traits": {"fixedTraits": {"size": 10}}}}),
    )
}

fn content<'c>(config: &'c Configuration, name: &str) -> &'c Value {
    config.root().document(name).unwrap().content()
}

#[test]
fn test_fixed_traits_regrouped_under_definition() {
    let mut config = species_config();
    let pattern = ["animal", "traits", "fixedTraits", ".*"];

    let changes = [
        Change::regex_add_item(
            DocumentTarget::all_files(ROOT),
            pattern,
            ["animal", "traits", "definition", "<match_3_0>"],
            json!({"type": "Fixed"}),
        )
        .unwrap(),
        Change::regex_move_item(
            DocumentTarget::all_files(ROOT),
            pattern,
            ["animal", "traits", "fixedTraits", "<match_3_0>"],
            ["animal", "traits", "definition", "<match_3_0>", "value"],
        )
        .unwrap(),
    ];
    for change in &changes {
        change.apply(&mut config).unwrap();
    }

    let traits = &content(&config, "species.json")["animal"]["traits"];
    assert_eq!(traits["definition"], json!({"size": {"type": "Fixed", "value": 10}}));
    assert!(traits["fixedTraits"].get("size").is_none());
    assert_eq!(config.version(), Version::parse("1.0").unwrap());
}

#[test]
fn test_move_creates_destination_parents() {
    let mut config = species_config();
    Change::move_item(
        DocumentTarget::file(ROOT, "species.json").unwrap(),
        ["animal", "traits"],
        ["animal", "genetics", "traits"],
    )
    .unwrap()
    .apply(&mut config)
    .unwrap();

    let animal = &content(&config, "species.json")["animal"];
    assert_eq!(animal["genetics"]["traits"]["fixedTraits"], json!({"size": 10}));
    assert!(animal.get("traits").is_none());
}

#[test]
fn test_regex_add_through_a_list_index_needs_the_element() {
    let mut config =
        single_document("doc.json", json!({"version": "1.0", "a": {"k": 1}, "l": []}));
    let change = Change::regex_add_item(
        DocumentTarget::all_files(ROOT),
        ["^a$", ".*"],
        ["l", "item_3", "<match_1_0>"],
        json!(0),
    )
    .unwrap();

    let err = change.apply(&mut config).unwrap_err();
    assert!(matches!(err, MigrationError::PathNotFound { ref segment, .. } if segment == "item_3"));
}

#[test]
fn test_move_equals_copy_then_remove() {
    let base = json!({"version": "1.0", "a": {"b": [1, 2]}, "c": {}});
    let target = || DocumentTarget::file(ROOT, "doc.json").unwrap();

    let mut moved = single_document("doc.json", base.clone());
    Change::move_item(target(), ["a", "b"], ["c", "b"])
        .unwrap()
        .apply(&mut moved)
        .unwrap();

    let mut copied = single_document("doc.json", base);
    Change::copy_item(target(), ["a", "b"], ["c", "b"])
        .unwrap()
        .apply(&mut copied)
        .unwrap();
    Change::remove_item(target(), ["a", "b"])
        .unwrap()
        .apply(&mut copied)
        .unwrap();

    assert_eq!(moved.root(), copied.root());
    assert_eq!(content(&moved, "doc.json")["c"]["b"], json!([1, 2]));
}

#[test]
fn test_repeated_add_is_idempotent() {
    let mut config = species_config();
    let change = Change::add_item(
        DocumentTarget::file(ROOT, "species.json").unwrap(),
        ["animal", "diet"],
        json!(["leaves"]),
    );

    change.apply(&mut config).unwrap();
    let once = config.clone();
    change.apply(&mut config).unwrap();
    assert_eq!(config, once);
}

#[test]
fn test_broadcast_removal_over_list_elements() {
    let mut config = single_document(
        "doc.json",
        json!({"version": "1.0", "rows": [{"tmp": 1, "keep": 1}, {"tmp": 2, "keep": 2}]}),
    );
    let target = DocumentTarget::all_files(ROOT);

    Change::regex_move_item(
        target,
        ["^rows$", "item_*", "^tmp$"],
        ["rows", "<match_1_0>", "tmp"],
        ["rows", "<match_1_0>", "moved"],
    )
    .unwrap()
    .apply(&mut config)
    .unwrap();

    assert_eq!(
        content(&config, "doc.json")["rows"],
        json!([{"keep": 1, "moved": 1}, {"keep": 2, "moved": 2}])
    );
}

#[test]
fn test_list_reached_by_plain_regex_is_rejected() {
    let mut config = single_document("doc.json", json!({"version": "1.0", "rows": [1, 2]}));
    let change = Change::regex_add_item(
        DocumentTarget::all_files(ROOT),
        ["^rows$", ".*"],
        ["copy"],
        json!(0),
    )
    .unwrap();

    let err = change.apply(&mut config).unwrap_err();
    assert!(matches!(err, MigrationError::InvalidRegexTarget { .. }));
}

#[test]
fn test_bad_capture_reference_is_reported() {
    let mut config = species_config();
    let change = Change::regex_copy_item(
        DocumentTarget::all_files(ROOT),
        ["animal", "traits", "fixedTraits", ".*"],
        ["animal", "traits", "fixedTraits", "<match_3_0>"],
        ["animal", "<match_9_0>"],
    )
    .unwrap();

    let err = change.apply(&mut config).unwrap_err();
    assert!(matches!(err, MigrationError::InvalidCaptureReference { .. }));
}

#[rstest]
#[case(Some("a.json"), true)]
#[case(None, false)]
fn test_conflicting_file_selection(#[case] file: Option<&str>, #[case] all_files: bool) {
    let err = DocumentTarget::new(ROOT, file, all_files).unwrap_err();
    assert!(matches!(err, MigrationError::ConflictingChangeParameters(_)));
}

#[rstest]
#[case(Change::add_folder(["a"]).unwrap(), Capability::AddFolder)]
#[case(Change::remove_folder(["a"]).unwrap(), Capability::RemoveFolder)]
#[case(Change::move_folder(["a"], ["b"]).unwrap(), Capability::MoveFolder)]
#[case(Change::remove_document(DocumentTarget::all_files(["a"])), Capability::RemoveDocument)]
fn test_capability_tags(#[case] change: Change, #[case] expected: Capability) {
    assert_eq!(change.capability(), expected);
}

#[rstest]
#[case::add_folder(Change::add_folder(ROOT).map(drop))]
#[case::remove_folder(Change::remove_folder(ROOT).map(drop))]
#[case::remove_item(
    Change::remove_item(DocumentTarget::all_files(ROOT), ROOT).map(drop)
)]
fn test_root_paths_forbidden(#[case] built: confmig::Result<()>) {
    assert!(matches!(built, Err(MigrationError::RootPathForbidden(_))));
}
