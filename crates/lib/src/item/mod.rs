//! Item records of a Yjs document, as read from its struct store.
//!
//! An [`Item`] is the atomic unit of a Yjs sequence or map: it carries a piece
//! of content plus the links that place it in its parent type. Links are plain
//! [`ItemId`] values that are looked up in an [`ItemStore`](crate::store::ItemStore);
//! an item never owns the items it points at.

use std::fmt;

use serde::Serialize;

mod any;
pub use any::Any;

/// Identifier of an item: the replica (client) that created it and the
/// logical clock of its first element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ItemId {
    pub client: u64,
    pub clock: u32,
}

impl ItemId {
    pub fn new(client: u64, clock: u32) -> Self {
        Self { client, clock }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.client, self.clock)
    }
}

/// Where an item is attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Parent {
    /// Attached directly to the named root type of the document.
    Root(String),
    /// Nested inside the shared type held by this item.
    Item(ItemId),
}

/// The shared type kind stored by a `Type` content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeRef {
    Array,
    Map,
    Text,
    XmlElement(String),
    XmlFragment,
    XmlHook(String),
    XmlText,
}

/// Content payload of an item. Exactly one kind per item; garbage-collected
/// items have no content at all (`Item::content == None`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ItemContent {
    /// Text chunk of a `Y.Text`.
    String(String),
    /// Formatting attribute. `value == None` closes the attribute.
    Format { key: String, value: Option<Any> },
    /// Placeholder for `len` deleted elements whose content was dropped.
    Deleted(u32),
    /// A nested shared type.
    Type(TypeRef),
    Any(Vec<Any>),
    Json(Vec<Any>),
    Binary(Vec<u8>),
    Embed(Any),
    Doc { guid: String, opts: Any },
}

impl ItemContent {
    /// Number of clock ticks this content spans.
    ///
    /// Strings are measured in UTF-16 code units to match the clocks assigned
    /// by JavaScript peers.
    pub fn len(&self) -> u32 {
        match self {
            ItemContent::String(s) => s.encode_utf16().count() as u32,
            ItemContent::Deleted(len) => *len,
            ItemContent::Any(values) | ItemContent::Json(values) => values.len() as u32,
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cuts the content `offset` clocks in, keeping the head and returning
    /// the tail. Contents spanning a single clock are never split.
    ///
    /// A surrogate pair cut in half becomes two replacement characters, so
    /// both halves keep their UTF-16 length.
    pub fn split_off(&mut self, offset: u32) -> Option<ItemContent> {
        if offset == 0 || offset >= self.len() {
            return None;
        }
        let at = offset as usize;
        match self {
            ItemContent::String(s) => {
                let units: Vec<u16> = s.encode_utf16().collect();
                let tail = String::from_utf16_lossy(&units[at..]);
                *s = String::from_utf16_lossy(&units[..at]);
                Some(ItemContent::String(tail))
            }
            ItemContent::Deleted(len) => {
                let tail = *len - offset;
                *len = offset;
                Some(ItemContent::Deleted(tail))
            }
            ItemContent::Any(values) => Some(ItemContent::Any(values.split_off(at))),
            ItemContent::Json(values) => Some(ItemContent::Json(values.split_off(at))),
            _ => None,
        }
    }
}

/// One record of the struct store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub length: u32,
    pub deleted: bool,
    /// Current left neighbour in the parent sequence.
    pub left: Option<ItemId>,
    /// Current right neighbour in the parent sequence.
    pub right: Option<ItemId>,
    /// Id this item was inserted after.
    pub origin: Option<ItemId>,
    /// Id this item was inserted before.
    pub right_origin: Option<ItemId>,
    pub parent: Option<Parent>,
    /// Key within the parent when the parent is map-like.
    pub parent_sub: Option<String>,
    pub content: Option<ItemContent>,
}

impl Item {
    /// Creates a detached, unlinked item holding `content`.
    pub fn new(id: ItemId, content: ItemContent) -> Self {
        let deleted = matches!(content, ItemContent::Deleted(_));
        Self {
            id,
            length: content.len(),
            deleted,
            left: None,
            right: None,
            origin: None,
            right_origin: None,
            parent: None,
            parent_sub: None,
            content: Some(content),
        }
    }

    /// Creates a garbage-collected record covering `length` clocks.
    pub fn gc(id: ItemId, length: u32) -> Self {
        Self {
            id,
            length,
            deleted: true,
            left: None,
            right: None,
            origin: None,
            right_origin: None,
            parent: None,
            parent_sub: None,
            content: None,
        }
    }

    /// Id of the last clock covered by this item.
    pub fn last_id(&self) -> ItemId {
        ItemId::new(
            self.id.client,
            self.id.clock.saturating_add(self.length.saturating_sub(1)),
        )
    }

    /// Returns true if `id` falls inside this item's clock range.
    pub fn contains(&self, id: &ItemId) -> bool {
        let end = u64::from(self.id.clock) + u64::from(self.length.max(1));
        self.id.client == id.client && id.clock >= self.id.clock && u64::from(id.clock) < end
    }

    /// Splits this item `offset` clocks from its start and returns the right
    /// half, linked directly after this one.
    ///
    /// The right half keeps the right neighbour, right origin, parent and
    /// tombstone of the original and takes this item's new last clock as its
    /// origin. GC records and single-clock contents are not split.
    pub fn split_off(&mut self, offset: u32) -> Option<Item> {
        let tail = self.content.as_mut()?.split_off(offset)?;
        let id = ItemId::new(self.id.client, self.id.clock + offset);
        let right = Item {
            id,
            length: self.length - offset,
            deleted: self.deleted,
            left: Some(self.id),
            right: self.right,
            origin: Some(ItemId::new(self.id.client, id.clock - 1)),
            right_origin: self.right_origin,
            parent: self.parent.clone(),
            parent_sub: self.parent_sub.clone(),
            content: Some(tail),
        };
        self.length = offset;
        self.right = Some(id);
        Some(right)
    }

    pub fn is_gc(&self) -> bool {
        self.content.is_none()
    }

    pub fn with_parent(mut self, parent: Parent) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_parent_sub(mut self, key: impl Into<String>) -> Self {
        self.parent_sub = Some(key.into());
        self
    }

    pub fn with_origin(mut self, origin: ItemId) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_right_origin(mut self, right_origin: ItemId) -> Self {
        self.right_origin = Some(right_origin);
        self
    }

    pub fn with_left(mut self, left: ItemId) -> Self {
        self.left = Some(left);
        self
    }

    pub fn with_right(mut self, right: ItemId) -> Self {
        self.right = Some(right);
        self
    }

    pub fn deleted(mut self) -> Self {
        self.deleted = true;
        self
    }
}
