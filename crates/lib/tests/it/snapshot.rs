//! Loading snapshots produced by yrs documents

use std::io::Write;

use ydot::snapshot::{Encoding, SnapshotError};
use ydot::{ItemContent, ItemId, Parent, Snapshot};

use crate::helpers::*;

#[test]
fn test_load_binary_text_snapshot() {
    let snapshot = Snapshot::from_bytes(&prefixed_text_update(1)).unwrap();
    let store = snapshot.store();

    assert_eq!(store.len(), 2);
    let typed = item(store, 1, 0);
    assert_eq!(typed.content, Some(ItemContent::String("hi".into())));
    assert_eq!(typed.length, 2);
    assert_eq!(typed.parent, Some(Parent::Root(TEXT_ROOT.into())));

    let prefix = item(store, 1, 2);
    assert_eq!(prefix.right_origin, Some(ItemId::new(1, 0)));
    assert_eq!(prefix.right, Some(ItemId::new(1, 0)));
    assert_eq!(prefix.left, None);
    // Parent comes from the right neighbour
    assert_eq!(prefix.parent, Some(Parent::Root(TEXT_ROOT.into())));
    assert_eq!(typed.left, Some(ItemId::new(1, 2)));
}

#[test]
fn test_load_base64_snapshot() {
    let encoded = to_base64(&prefixed_text_update(1));
    let from_text = Snapshot::from_base64(&encoded).unwrap();
    let from_bytes = Snapshot::from_bytes(&prefixed_text_update(1)).unwrap();
    assert_eq!(from_text.render(), from_bytes.render());
}

#[test]
fn test_load_base64_with_trailing_newline() {
    let encoded = format!("{}\n", to_base64(&map_entry_update(5, "title", "draft")));
    let snapshot = Snapshot::load(encoded.as_bytes(), Encoding::Base64).unwrap();
    assert_eq!(snapshot.items().count(), 1);
}

#[test]
fn test_deleted_items_are_marked() {
    let snapshot = Snapshot::from_bytes(&deleted_prefix_update(1)).unwrap();
    let store = snapshot.store();

    assert!(item(store, 1, 2).deleted);
    assert!(!item(store, 1, 0).deleted);
}

#[test]
fn test_map_entry_snapshot() {
    let snapshot = Snapshot::from_bytes(&map_entry_update(3, "title", "draft")).unwrap();
    let entry = item(snapshot.store(), 3, 0);

    assert_eq!(entry.parent_sub.as_deref(), Some("title"));
    assert_eq!(entry.parent, Some(Parent::Root("meta".into())));
}

#[test]
fn test_open_snapshot_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(to_base64(&prefixed_text_update(2)).as_bytes())
        .unwrap();

    let snapshot = Snapshot::open(file.path(), Encoding::Base64).unwrap();
    assert_eq!(snapshot.items().count(), 2);
}

#[test]
fn test_open_binary_snapshot_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&prefixed_text_update(2)).unwrap();

    let snapshot = Snapshot::open(file.path(), Encoding::Binary).unwrap();
    assert_eq!(snapshot.items().count(), 2);
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Snapshot::open(dir.path().join("missing.bin"), Encoding::Base64).unwrap_err();
    assert!(err.is_io_error());
    assert_eq!(err.module(), "io");
}

#[test]
fn test_invalid_base64_is_an_encoding_error() {
    let err = Snapshot::from_base64("@@@").unwrap_err();
    assert!(err.is_encoding_error());
}

#[test]
fn test_truncated_update_is_rejected() {
    let bytes = prefixed_text_update(1);
    let err = Snapshot::from_bytes(&bytes[..bytes.len() / 2]).unwrap_err();
    assert_eq!(err.module(), "snapshot");
    let ydot::Error::Snapshot(err) = err else {
        panic!("expected yrs to reject the update");
    };
    assert!(err.is_rejected());
    assert!(matches!(err, SnapshotError::Rejected { .. }));
}

#[test]
fn test_merged_insert_inside_item() {
    let snapshot = Snapshot::from_bytes(&merged_mid_insert_update()).unwrap();
    let store = snapshot.store();

    assert_eq!(visible_text(store), "aXbc");
    let head = item(store, 1, 0);
    assert_eq!(head.content, Some(ItemContent::String("a".into())));
    assert_eq!(head.right, Some(ItemId::new(2, 0)));

    let tail = item(store, 1, 1);
    assert_eq!(tail.content, Some(ItemContent::String("bc".into())));
    assert_eq!(tail.origin, Some(ItemId::new(1, 0)));
    assert_eq!(tail.left, Some(ItemId::new(2, 0)));

    let inserted = item(store, 2, 0);
    assert_eq!(inserted.left, Some(ItemId::new(1, 0)));
    assert_eq!(inserted.right, Some(ItemId::new(1, 1)));
}

#[test]
fn test_merged_partial_delete() {
    let snapshot = Snapshot::from_bytes(&merged_partial_delete_update()).unwrap();
    let store = snapshot.store();

    assert_eq!(visible_text(store), "heo");
    assert!(!item(store, 1, 0).deleted);
    assert!(item(store, 1, 2).deleted);
    assert_eq!(item(store, 1, 2).length, 2);
    assert!(!item(store, 1, 4).deleted);
}
