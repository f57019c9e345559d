//! Constants used throughout the ydot library.
//!
//! This module provides central definitions for the fixed pieces of the
//! generated graph description.

/// Maximum number of characters of a content label, counted after escaping.
pub const LABEL_LIMIT: usize = 20;

/// Node name of the synthetic root node.
pub const ROOT_NODE: &str = "root";

/// Record label of the synthetic root node.
pub const ROOT_LABEL: &str = r"<f0>root | <f1>\<XmlText\> ";

/// Label text for null references.
pub const NULL: &str = "null";

/// Label of items whose content was garbage-collected.
pub const GC_LABEL: &str = "GC";

/// Layout direction declared in the graph header.
pub const RANK_DIR: &str = "LR";
