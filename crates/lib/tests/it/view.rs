//! End-to-end graph rendering

use ydot::{ItemId, ItemStore, Snapshot, render};

use crate::helpers::*;

#[test]
fn test_render_text_snapshot() {
    let graph = Snapshot::from_bytes(&prefixed_text_update(1))
        .unwrap()
        .render();

    assert!(graph.starts_with("digraph g {\n  graph [\n    rankdir = \"LR\"\n  ];\n"));
    assert!(graph.ends_with("}\n"));
    assert!(graph.contains("  \"root\" ["));
    assert_eq!(content_label(&graph, "1-0"), Some(r#"\"hi\""#));
    assert_eq!(content_label(&graph, "1-2"), Some(r#"\"X\""#));
    assert!(graph.contains(r#""1-2":f5 -> "1-0":f0"#));
    assert!(graph.contains(r#""1-2":f7 -> "1-0":f0"#));
    assert!(graph.contains(r#""1-0":f4 -> "1-2":f0"#));
    assert!(graph.contains(r#""1-0":f8 -> "root":f0"#));
}

#[test]
fn test_edge_ids_are_sequential() {
    let graph = Snapshot::from_bytes(&prefixed_text_update(4))
        .unwrap()
        .render();
    let ids = edge_ids(&graph);
    assert_eq!(ids, (0..ids.len() as u64).collect::<Vec<_>>());
}

#[test]
fn test_render_map_entry_label() {
    let graph = Snapshot::from_bytes(&map_entry_update(3, "title", "draft"))
        .unwrap()
        .render();
    assert_eq!(content_label(&graph, "3-0"), Some("title-draft"));
}

#[test]
fn test_render_deleted_item() {
    let graph = Snapshot::from_bytes(&deleted_prefix_update(1))
        .unwrap()
        .render();
    assert!(graph.contains("<f0>1-2 | "));
    assert!(graph.contains(" | <f3>true | "));
}

#[test]
fn test_render_merged_update_has_split_nodes() {
    let graph = Snapshot::from_bytes(&merged_mid_insert_update())
        .unwrap()
        .render();

    assert!(graph.contains("  \"1-1\" ["));
    assert!(graph.contains(r#""2-0":f4 -> "1-0":f0"#));
    assert!(graph.contains(r#""2-0":f5 -> "1-1":f0"#));
    assert!(graph.contains(r#""2-0":f7 -> "1-1":f0"#));
    assert!(graph.contains(r#""1-1":f6 -> "1-0":f0"#));
    assert_eq!(content_label(&graph, "1-1"), Some(r#"\"bc\""#));
}

#[test]
fn test_long_text_is_truncated() {
    let store = ItemStore::from_items([root_text(1, 0, "the quick brown fox jumps")]);
    let graph = store.render();
    let label = content_label(&graph, "1-0").unwrap();
    assert_eq!(label.chars().count(), 20);
    assert!(label.starts_with(r#"\"the quick"#));
}

#[test]
fn test_concurrent_clients_render_in_client_order() {
    let mut items = vec![root_text(9, 0, "b")];
    items.push(root_text(2, 0, "a"));
    let store = ItemStore::from_items(items);
    let graph = render(store.items());

    let first = graph.find("\"2-0\" [").unwrap();
    let second = graph.find("\"9-0\" [").unwrap();
    assert!(first < second);
}

#[test]
fn test_dangling_links_still_render_edges() {
    let item = root_text(1, 0, "a").with_origin(ItemId::new(7, 7));
    let graph = render([&item]);
    assert!(graph.contains(r#""1-0":f6 -> "7-7":f0 [ id = 0 ];"#));
    assert!(!graph.contains("\"7-7\" ["));
}
