//! Arena of items indexed by client and clock.
//!
//! Mirrors the struct store of a Yjs document: every client owns a list of
//! items sorted by clock. Links between items are resolved by looking ids up
//! here rather than through references.

use std::collections::BTreeMap;

use crate::item::{Item, ItemId};

#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    clients: BTreeMap<u64, Vec<Item>>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from loose items, sorting each client's list by clock.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut store = Self::new();
        for item in items {
            store.insert(item);
        }
        store
    }

    /// Inserts an item, keeping its client's list ordered by clock.
    ///
    /// An item whose start id is already present replaces the existing record.
    pub fn insert(&mut self, item: Item) {
        let list = self.clients.entry(item.id.client).or_default();
        match list.binary_search_by_key(&item.id.clock, |i| i.id.clock) {
            Ok(pos) => list[pos] = item,
            Err(pos) => list.insert(pos, item),
        }
    }

    /// Returns the item starting exactly at `id`.
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        let list = self.clients.get(&id.client)?;
        let pos = list
            .binary_search_by_key(&id.clock, |i| i.id.clock)
            .ok()?;
        list.get(pos)
    }

    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        let list = self.clients.get_mut(&id.client)?;
        let pos = list
            .binary_search_by_key(&id.clock, |i| i.id.clock)
            .ok()?;
        list.get_mut(pos)
    }

    /// Returns the item whose clock range contains `id`.
    pub fn find(&self, id: &ItemId) -> Option<&Item> {
        let list = self.clients.get(&id.client)?;
        let pos = match list.binary_search_by_key(&id.clock, |i| i.id.clock) {
            Ok(pos) => pos,
            Err(0) => return None,
            Err(pos) => pos - 1,
        };
        list.get(pos).filter(|item| item.contains(id))
    }

    /// Start id of the item containing `id`.
    pub fn find_id(&self, id: &ItemId) -> Option<ItemId> {
        self.find(id).map(|item| item.id)
    }

    /// Number of items across all clients.
    pub fn len(&self) -> usize {
        self.clients.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.values().all(Vec::is_empty)
    }

    /// Client ids present in the store, ascending.
    pub fn clients(&self) -> impl Iterator<Item = u64> + '_ {
        self.clients.keys().copied()
    }

    /// Every item flattened across clients: ascending client, then clock.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.clients.values().flatten()
    }

    /// Mutable access to every item in the same order as [`items`](Self::items).
    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.clients.values_mut().flatten()
    }

    /// Splits the item containing `id` so that a record starts exactly at `id`.
    ///
    /// Returns the start id of the new right half. Nothing happens when a
    /// record already starts at `id`, no record contains it, or the record
    /// cannot be split.
    pub fn split_at(&mut self, id: &ItemId) -> Option<ItemId> {
        let list = self.clients.get_mut(&id.client)?;
        let pos = match list.binary_search_by_key(&id.clock, |i| i.id.clock) {
            Ok(_) | Err(0) => return None,
            Err(pos) => pos - 1,
        };
        let item = &mut list[pos];
        if !item.contains(id) {
            return None;
        }
        let tail = item.split_off(id.clock - item.id.clock)?;
        let (tail_id, next) = (tail.id, tail.right);
        list.insert(pos + 1, tail);

        if let Some(next) = next.and_then(|next| self.get_mut(&next)) {
            next.left = Some(tail_id);
        }
        Some(tail_id)
    }

    /// Renders the whole store as a graph description.
    pub fn render(&self) -> String {
        crate::view::render(self.items())
    }
}
