//! Links decoded structs into an item arena.
//!
//! Items are placed with the YATA rule used by Yjs: an item goes between its
//! origin and right origin, and concurrent inserts at the same spot are
//! ordered by scanning the items in between. Items are split wherever an
//! origin, right origin or delete range points inside them, so every link
//! lands on a record boundary.

use std::collections::{HashMap, HashSet, VecDeque};

use super::{DecodedItem, DecodedUpdate, DeleteSet, Struct};
use crate::item::{Item, ItemContent, ItemId, Parent};
use crate::store::ItemStore;

#[derive(Default)]
struct Integrator {
    store: ItemStore,
    /// First item of each parent sequence.
    starts: HashMap<Parent, ItemId>,
    /// Current entry of each map key.
    entries: HashMap<(Parent, String), ItemId>,
}

/// Builds a linked item store from a decoded update.
///
/// Each client's structs are integrated in clock order once their origins and
/// parent are present. Structs that stay blocked (their dependencies are not
/// part of the update) are stored unlinked. The delete set is applied last.
pub fn integrate(update: DecodedUpdate) -> ItemStore {
    let mut integrator = Integrator::default();
    let mut queues: Vec<VecDeque<Struct>> = update
        .clients
        .into_values()
        .map(VecDeque::from)
        .collect();

    loop {
        let mut progressed = false;
        for queue in queues.iter_mut() {
            while let Some(next) = queue.front() {
                if !integrator.is_ready(next) {
                    break;
                }
                let Some(next) = queue.pop_front() else {
                    break;
                };
                integrator.apply(next);
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    for blocked in queues.into_iter().flatten() {
        tracing::warn!(
            id = %blocked.id(),
            "Struct depends on items missing from the update, storing it unlinked"
        );
        integrator.insert_unlinked(blocked);
    }

    integrator.apply_delete_set(&update.delete_set);
    integrator.store
}

impl Integrator {
    fn is_ready(&self, next: &Struct) -> bool {
        let Struct::Item(item) = next else {
            return true;
        };
        let present = |id: &Option<ItemId>| id.is_none_or(|id| self.store.find(&id).is_some());
        let parent_present = match &item.parent {
            Some(Parent::Item(id)) => self.store.find(id).is_some(),
            _ => true,
        };
        present(&item.origin) && present(&item.right_origin) && parent_present
    }

    fn apply(&mut self, next: Struct) {
        match next {
            Struct::Gc { id, len } => self.store.insert(Item::gc(id, len)),
            Struct::Skip { .. } => {}
            Struct::Item(item) => self.integrate_item(item),
        }
    }

    fn insert_unlinked(&mut self, next: Struct) {
        match next {
            Struct::Gc { id, len } => self.store.insert(Item::gc(id, len)),
            Struct::Skip { .. } => {}
            Struct::Item(decoded) => {
                let mut item = Item::new(decoded.id, decoded.content);
                item.origin = decoded.origin;
                item.right_origin = decoded.right_origin;
                item.parent = decoded.parent;
                item.parent_sub = decoded.parent_sub;
                self.store.insert(item);
            }
        }
    }

    /// Splits the item containing `at` so a record starts there.
    fn split(&mut self, at: ItemId) {
        let Some(tail) = self.store.split_at(&at) else {
            return;
        };
        tracing::debug!(%at, "Split item");
        // A split map entry is replaced by its right half
        if let Some(tail) = self.store.get(&tail)
            && tail.right.is_none()
            && let (Some(parent), Some(key)) = (&tail.parent, &tail.parent_sub)
        {
            let (parent, key, id) = (parent.clone(), key.clone(), tail.id);
            self.entries.insert((parent, key), id);
        }
    }

    /// Item ending exactly at `id`, splitting the one containing it if needed.
    fn clean_end(&mut self, id: ItemId) -> Option<ItemId> {
        if let Some(next) = id.clock.checked_add(1) {
            self.split(ItemId::new(id.client, next));
        }
        self.store.find_id(&id)
    }

    /// Item starting exactly at `id`, splitting the one containing it if needed.
    fn clean_start(&mut self, id: ItemId) -> Option<ItemId> {
        self.split(id);
        self.store.find_id(&id)
    }

    /// First item of the sequence or map slot an item is inserted into.
    fn first_of(&self, parent: &Parent, parent_sub: Option<&str>) -> Option<ItemId> {
        match parent_sub {
            Some(key) => {
                let mut current = *self.entries.get(&(parent.clone(), key.to_string()))?;
                while let Some(left) = self.store.get(&current).and_then(|item| item.left) {
                    current = left;
                }
                Some(current)
            }
            None => self.starts.get(parent).copied(),
        }
    }

    /// Resolves the parent of an item, inheriting it from a neighbour when it
    /// was not written. Returns `None` when the item must become a GC record.
    fn resolve_parent(
        &self,
        decoded: &DecodedItem,
        left: Option<&Item>,
        right: Option<&Item>,
    ) -> Option<(Parent, Option<String>)> {
        // Neighbours that were garbage-collected take their siblings with them
        if left.is_some_and(Item::is_gc) || right.is_some_and(Item::is_gc) {
            return None;
        }

        let (parent, parent_sub) = match &decoded.parent {
            Some(Parent::Item(id)) => {
                let holder = self.store.find(id)?;
                if !matches!(holder.content, Some(ItemContent::Type(_))) {
                    return None;
                }
                (Parent::Item(holder.id), decoded.parent_sub.clone())
            }
            Some(root) => (root.clone(), decoded.parent_sub.clone()),
            None => {
                let neighbour = left.or(right)?;
                (neighbour.parent.clone()?, neighbour.parent_sub.clone())
            }
        };
        Some((parent, parent_sub))
    }

    fn integrate_item(&mut self, decoded: DecodedItem) {
        let id = decoded.id;
        let mut left = decoded.origin.and_then(|o| self.clean_end(o));
        let right = decoded.right_origin.and_then(|o| self.clean_start(o));

        let resolved = self.resolve_parent(
            &decoded,
            left.and_then(|l| self.store.get(&l)),
            right.and_then(|r| self.store.get(&r)),
        );
        let Some((parent, parent_sub)) = resolved else {
            tracing::debug!(%id, "Item has no live parent, storing it as GC");
            self.store.insert(Item::gc(id, decoded.content.len()));
            return;
        };

        let needs_scan = match left {
            None => right.is_none_or(|r| self.store.get(&r).is_some_and(|r| r.left.is_some())),
            Some(l) => self.store.get(&l).map(|l| l.right) != Some(right),
        };

        if needs_scan {
            let mut cursor = match left {
                Some(l) => self.store.get(&l).and_then(|l| l.right),
                None => self.first_of(&parent, parent_sub.as_deref()),
            };
            let mut conflicting = HashSet::new();
            let mut before_origin = HashSet::new();

            while let Some(other_id) = cursor {
                if Some(other_id) == right {
                    break;
                }
                let Some(other) = self.store.get(&other_id) else {
                    break;
                };
                before_origin.insert(other_id);
                conflicting.insert(other_id);

                if other.origin == decoded.origin {
                    // Same insertion point: lower client ids go first
                    if other.id.client < id.client {
                        left = Some(other_id);
                        conflicting.clear();
                    } else if other.right_origin == decoded.right_origin {
                        break;
                    }
                } else if let Some(other_origin) =
                    other.origin.and_then(|o| self.store.find_id(&o))
                    && before_origin.contains(&other_origin)
                {
                    if !conflicting.contains(&other_origin) {
                        left = Some(other_id);
                        conflicting.clear();
                    }
                } else {
                    break;
                }
                cursor = other.right;
            }
        }

        let new_right = match left {
            Some(l) => self.store.get(&l).and_then(|l| l.right),
            None => self.first_of(&parent, parent_sub.as_deref()),
        };
        if left.is_none() && parent_sub.is_none() {
            self.starts.insert(parent.clone(), id);
        }

        let parent_deleted = match &parent {
            Parent::Item(holder) => self.store.get(holder).is_some_and(|h| h.deleted),
            Parent::Root(_) => false,
        };

        let mut item = Item::new(id, decoded.content);
        item.left = left;
        item.right = new_right;
        item.origin = decoded.origin;
        item.right_origin = decoded.right_origin;
        item.parent = Some(parent.clone());
        item.parent_sub = parent_sub.clone();
        // Only the rightmost entry of a map slot is live
        if parent_deleted || (parent_sub.is_some() && new_right.is_some()) {
            item.deleted = true;
        }
        self.store.insert(item);

        if let Some(l) = left.and_then(|l| self.store.get_mut(&l)) {
            l.right = Some(id);
        }
        match (new_right, parent_sub) {
            (Some(r), _) => {
                if let Some(r) = self.store.get_mut(&r) {
                    r.left = Some(id);
                }
            }
            (None, Some(key)) => {
                self.entries.insert((parent, key), id);
                // The previous value of the slot is overwritten
                if let Some(l) = left.and_then(|l| self.store.get_mut(&l)) {
                    l.deleted = true;
                }
            }
            (None, None) => {}
        }
    }

    fn apply_delete_set(&mut self, delete_set: &DeleteSet) {
        for (client, range) in delete_set.iter() {
            if range.len == 0 {
                continue;
            }
            self.split(ItemId::new(client, range.clock));
            self.split(ItemId::new(client, range.end()));
        }
        // Every record now lies fully inside or fully outside each range
        for item in self.store.items_mut() {
            if delete_set.contains(&item.id) {
                item.deleted = true;
            }
        }
    }
}
