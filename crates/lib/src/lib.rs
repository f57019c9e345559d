//!
//! ydot: render the item log of a Yjs document as a Graphviz graph.
//! This library provides the pieces needed to go from a stored document
//! update to a `digraph` description that a layout tool such as `dot` can draw.
//!
//! ## Core Concepts
//!
//! * **Items (`item::Item`)**: The atomic unit of a Yjs shared type. Each item
//!   carries a content payload and links to its neighbours, its causal origins
//!   and its parent.
//! * **Item store (`store::ItemStore`)**: Arena of items indexed by client and
//!   clock. Item links are ids looked up here, never references.
//! * **Updates (`update`)**: Decoder for the Yjs v1 update format and the
//!   integration step that links decoded structs the way a document would.
//! * **Snapshots (`snapshot::Snapshot`)**: A base64 or binary update loaded
//!   into a store.
//! * **View (`view`)**: The renderer. Every item becomes a record node, every
//!   non-null link an edge with a unique id.
//!
//! The generated graph grows quickly with document size; this is a debugging
//! aid for small documents.

pub mod constants;
pub mod item;
pub mod snapshot;
pub mod store;
pub mod update;
pub mod view;

pub use item::{Item, ItemContent, ItemId, Parent};
pub use snapshot::Snapshot;
pub use store::ItemStore;
pub use view::render;

/// Result type used throughout the ydot library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the ydot library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structured update decoding errors from the update module
    #[error(transparent)]
    Decode(update::DecodeError),

    /// Structured snapshot errors from the snapshot module
    #[error(transparent)]
    Snapshot(snapshot::SnapshotError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Decode(_) => "update",
            Error::Snapshot(_) => "snapshot",
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }

    /// Check if this error comes from decoding update bytes.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Error::Decode(_))
    }

    /// Check if the update was cut short.
    pub fn is_truncated(&self) -> bool {
        match self {
            Error::Decode(decode_err) => decode_err.is_truncated(),
            _ => false,
        }
    }

    /// Check if this error comes from snapshot loading.
    pub fn is_snapshot_error(&self) -> bool {
        matches!(self, Error::Snapshot(_))
    }

    /// Check if the snapshot text was not valid base64.
    pub fn is_encoding_error(&self) -> bool {
        match self {
            Error::Snapshot(snapshot_err) => snapshot_err.is_encoding_error(),
            _ => false,
        }
    }
}
