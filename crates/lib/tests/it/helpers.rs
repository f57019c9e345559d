//! Shared fixtures for integration tests

use base64ct::{Base64, Encoding};
use ydot::{Item, ItemContent, ItemId, ItemStore, Parent};
use yrs::updates::decoder::Decode;
use yrs::{Doc, Map, ReadTxn, Text, Transact, Update};

pub const TEXT_ROOT: &str = "content";

/// Full-state update of a document whose text was typed as "hi" and then
/// prefixed with "X" in a second transaction.
pub fn prefixed_text_update(client: u64) -> Vec<u8> {
    let doc = Doc::with_client_id(client);
    let text = doc.get_or_insert_text(TEXT_ROOT);
    {
        let mut txn = doc.transact_mut();
        text.insert(&mut txn, 0, "hi");
    }
    {
        let mut txn = doc.transact_mut();
        text.insert(&mut txn, 0, "X");
    }
    encode_state(&doc)
}

/// Same document as [`prefixed_text_update`] with the "X" deleted again.
pub fn deleted_prefix_update(client: u64) -> Vec<u8> {
    let doc = Doc::with_client_id(client);
    let text = doc.get_or_insert_text(TEXT_ROOT);
    {
        let mut txn = doc.transact_mut();
        text.insert(&mut txn, 0, "hi");
    }
    {
        let mut txn = doc.transact_mut();
        text.insert(&mut txn, 0, "X");
    }
    {
        let mut txn = doc.transact_mut();
        text.remove_range(&mut txn, 0, 1);
    }
    encode_state(&doc)
}

/// Full-state update of a document holding one map entry.
pub fn map_entry_update(client: u64, key: &str, value: &str) -> Vec<u8> {
    let doc = Doc::with_client_id(client);
    let map = doc.get_or_insert_map("meta");
    {
        let mut txn = doc.transact_mut();
        map.insert(&mut txn, key, value);
    }
    encode_state(&doc)
}

/// Client 1 types "abc", client 2 receives it and inserts "X" at index 1.
/// The two edits are stored as one merged update, so "abc" stays a single
/// struct that has to be split on load.
pub fn merged_mid_insert_update() -> Vec<u8> {
    let typist = Doc::with_client_id(1);
    let text = typist.get_or_insert_text(TEXT_ROOT);
    {
        let mut txn = typist.transact_mut();
        text.insert(&mut txn, 0, "abc");
    }
    let typed = encode_state(&typist);

    let editor = Doc::with_client_id(2);
    let text = editor.get_or_insert_text(TEXT_ROOT);
    {
        let mut txn = editor.transact_mut();
        txn.apply_update(Update::decode_v1(&typed).unwrap()).unwrap();
    }
    let seen = editor.transact().state_vector();
    {
        let mut txn = editor.transact_mut();
        text.insert(&mut txn, 1, "X");
    }
    let inserted = editor.transact().encode_state_as_update_v1(&seen);

    yrs::merge_updates_v1([typed, inserted]).unwrap()
}

/// "hello" followed by a separate deletion of "ll", merged into one update.
pub fn merged_partial_delete_update() -> Vec<u8> {
    let doc = Doc::with_client_id(1);
    let text = doc.get_or_insert_text(TEXT_ROOT);
    {
        let mut txn = doc.transact_mut();
        text.insert(&mut txn, 0, "hello");
    }
    let typed = encode_state(&doc);
    let seen = doc.transact().state_vector();
    {
        let mut txn = doc.transact_mut();
        text.remove_range(&mut txn, 2, 2);
    }
    let deleted = doc.transact().encode_state_as_update_v1(&seen);

    yrs::merge_updates_v1([typed, deleted]).unwrap()
}

pub fn encode_state(doc: &Doc) -> Vec<u8> {
    let txn = doc.transact();
    txn.encode_state_as_update_v1(&yrs::StateVector::default())
}

pub fn to_base64(bytes: &[u8]) -> String {
    Base64::encode_string(bytes)
}

/// Text item attached to the root type.
pub fn root_text(client: u64, clock: u32, s: &str) -> Item {
    Item::new(ItemId::new(client, clock), ItemContent::String(s.into()))
        .with_parent(Parent::Root(TEXT_ROOT.to_string()))
}

pub fn item<'a>(store: &'a ItemStore, client: u64, clock: u32) -> &'a Item {
    store
        .get(&ItemId::new(client, clock))
        .unwrap_or_else(|| panic!("Item {client}-{clock} should exist"))
}

/// Live text of the root text type, read by walking right neighbours.
pub fn visible_text(store: &ItemStore) -> String {
    let root = Parent::Root(TEXT_ROOT.to_string());
    let mut cursor = store
        .items()
        .find(|i| i.left.is_none() && i.parent_sub.is_none() && i.parent.as_ref() == Some(&root))
        .map(|i| i.id);

    let mut text = String::new();
    while let Some(id) = cursor {
        let current = item(store, id.client, id.clock);
        if let Some(ItemContent::String(s)) = &current.content
            && !current.deleted
        {
            text.push_str(s);
        }
        cursor = current.right;
    }
    text
}

/// Edge ids in statement order.
pub fn edge_ids(graph: &str) -> Vec<u64> {
    graph
        .lines()
        .filter(|line| line.contains("->"))
        .filter_map(|line| {
            let start = line.find("id = ")? + "id = ".len();
            let end = line[start..].find(' ')? + start;
            line[start..end].parse().ok()
        })
        .collect()
}

/// The `<f1>` content label of a node.
pub fn content_label<'a>(graph: &'a str, node: &str) -> Option<&'a str> {
    let header = format!("\"{node}\" [");
    let start = graph.find(&header)?;
    graph[start..]
        .split(" | ")
        .find_map(|field| field.strip_prefix("<f1>"))
}
