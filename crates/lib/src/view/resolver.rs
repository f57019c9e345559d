//! Turns one item into a record node and the edges leaving it.

use crate::constants::{NULL, ROOT_NODE};
use crate::item::{Item, ItemId, Parent};

use super::content::{escape, format_content};

/// Hands out edge ids for a single render pass.
///
/// Ids start at zero and are shared by every item of the pass, so each edge
/// statement in one document carries a distinct id.
#[derive(Debug, Default)]
pub struct EdgeCounter {
    next: u64,
}

impl EdgeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next unused id.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}

/// The node statement and edge statements produced for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub node: String,
    pub edges: Vec<String>,
}

/// Node name of an item, or `null` when there is no item.
pub fn node_name(item: Option<&Item>) -> String {
    id_text(item.map(|item| &item.id))
}

/// `<client>-<clock>`, or `null` for a missing id.
pub fn id_text(id: Option<&ItemId>) -> String {
    id.map_or_else(|| NULL.to_string(), ToString::to_string)
}

/// `root` for root attachments, the parent item's id for nested items and
/// `null` for detached items.
pub fn parent_label(parent: Option<&Parent>) -> String {
    match parent {
        Some(Parent::Root(_)) => ROOT_NODE.to_string(),
        Some(Parent::Item(id)) => id.to_string(),
        None => NULL.to_string(),
    }
}

fn edge(source: &str, field: &str, target: &str, id: u64) -> String {
    format!("  \"{source}\":{field} -> \"{target}\":f0 [ id = {id} ];")
}

/// Builds the record node for `item` and one edge per non-null reference.
///
/// Fields are tagged `f0`..`f8` in a fixed order so edges leave from the
/// field that holds the reference and always land on the target's `f0`.
pub fn resolve(item: &Item, counter: &mut EdgeCounter) -> Resolved {
    let id = node_name(Some(item));
    let parent = parent_label(item.parent.as_ref());
    let content = escape(&format_content(
        item.content.as_ref(),
        item.parent_sub.as_deref(),
    ));

    let fields = [
        format!("<f0>{id}"),
        format!("<f1>{content}"),
        format!("<f2>{}", item.length),
        format!("<f3>{}", item.deleted),
        format!("<f4>l: {}", id_text(item.left.as_ref())),
        format!("<f5>r: {}", id_text(item.right.as_ref())),
        format!("<f6>ol: {}", id_text(item.origin.as_ref())),
        format!("<f7>or: {}", id_text(item.right_origin.as_ref())),
        format!("<f8>p: {parent}"),
    ];
    let node = format!(
        "  \"{id}\" [\n    label = \"{}\"\n    shape = \"record\"\n  ];",
        fields.join(" | ")
    );

    let links = [
        ("f4", item.left),
        ("f5", item.right),
        ("f6", item.origin),
        ("f7", item.right_origin),
    ];
    let mut edges = Vec::new();
    for (field, target) in links {
        if let Some(target) = target {
            edges.push(edge(&id, field, &target.to_string(), counter.next_id()));
        }
    }
    if item.parent.is_some() {
        edges.push(edge(&id, "f8", &parent, counter.next_id()));
    }

    Resolved { node, edges }
}
