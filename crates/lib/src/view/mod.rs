//! Graphviz rendering of an item collection.
//!
//! Every item becomes a record node whose fields show its id, content label,
//! length, tombstone flag and links. Links become edges from the field that
//! holds them to the `f0` field of the referenced node. A synthetic `root`
//! node stands for the document root.
//!
//! The output can get very large and is meant for small debugging snapshots.
//!
//! ```
//! use ydot::item::{Item, ItemContent, ItemId, Parent};
//!
//! let item = Item::new(ItemId::new(1, 0), ItemContent::String("hi".into()))
//!     .with_parent(Parent::Root("content".into()));
//! let graph = ydot::view::render([&item]);
//! assert!(graph.contains(r#""1-0":f8 -> "root":f0 [ id = 0 ];"#));
//! ```

mod content;
mod resolver;

pub use content::{escape, format_content};
pub use resolver::{EdgeCounter, Resolved, id_text, node_name, parent_label, resolve};

use crate::constants::{RANK_DIR, ROOT_LABEL, ROOT_NODE};
use crate::item::Item;

fn root_node() -> String {
    format!("  \"{ROOT_NODE}\" [\n    label = \"{ROOT_LABEL}\"\n    shape = \"record\"\n  ];")
}

/// Renders `items` into one `digraph` document.
///
/// Order of `items` only decides the order of statements. Each call uses its
/// own edge counter, so repeated renders of the same items are identical.
pub fn render<'a>(items: impl IntoIterator<Item = &'a Item>) -> String {
    let mut counter = EdgeCounter::new();
    let mut nodes = vec![root_node()];
    let mut edges = Vec::new();

    for item in items {
        let resolved = resolve(item, &mut counter);
        nodes.push(resolved.node);
        edges.extend(resolved.edges);
    }

    tracing::debug!(
        nodes = nodes.len() - 1,
        edges = counter.issued(),
        "Rendered item graph"
    );

    let mut out = String::from("digraph g {\n");
    out.push_str(&format!("  graph [\n    rankdir = \"{RANK_DIR}\"\n  ];\n\n"));
    out.push_str(&nodes.join("\n"));
    out.push_str("\n\n");
    if !edges.is_empty() {
        out.push_str(&edges.join("\n"));
        out.push('\n');
    }
    out.push_str("}\n");
    out
}
