//! Reading Yjs v1 updates into item records.
//!
//! An update carries, per client, a run of structs starting at some clock
//! followed by a delete set. [`decode_v1`] reads that layout into a
//! [`DecodedUpdate`] without interpreting it; [`integrate`] then links the
//! structs into an [`ItemStore`](crate::store::ItemStore) the way a Yjs
//! document would.

use std::collections::BTreeMap;

use crate::item::{ItemContent, ItemId, Parent, TypeRef};

mod errors;
mod integrate;
pub mod reader;

pub use errors::DecodeError;
pub use integrate::integrate;
pub use reader::Reader;

const BITS5: u8 = 0x1f;
const HAS_PARENT_SUB: u8 = 0x20;
const HAS_RIGHT_ORIGIN: u8 = 0x40;
const HAS_ORIGIN: u8 = 0x80;

const STRUCT_GC: u8 = 0;
const STRUCT_SKIP: u8 = 10;

/// An item as it appears on the wire, before it is linked into a document.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedItem {
    pub id: ItemId,
    pub origin: Option<ItemId>,
    pub right_origin: Option<ItemId>,
    /// Only present when neither origin is; otherwise inherited on integration.
    pub parent: Option<Parent>,
    pub parent_sub: Option<String>,
    pub content: ItemContent,
}

/// One struct of a client's run.
#[derive(Debug, Clone, PartialEq)]
pub enum Struct {
    /// A garbage-collected range.
    Gc { id: ItemId, len: u32 },
    /// A gap in the run; nothing to integrate.
    Skip { id: ItemId, len: u32 },
    Item(DecodedItem),
}

impl Struct {
    pub fn id(&self) -> ItemId {
        match self {
            Struct::Gc { id, .. } | Struct::Skip { id, .. } => *id,
            Struct::Item(item) => item.id,
        }
    }

    pub fn len(&self) -> u32 {
        match self {
            Struct::Gc { len, .. } | Struct::Skip { len, .. } => *len,
            Struct::Item(item) => item.content.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A deleted clock range of one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteRange {
    pub clock: u32,
    pub len: u32,
}

impl DeleteRange {
    pub fn end(&self) -> u32 {
        self.clock.saturating_add(self.len)
    }
}

/// Deleted ranges keyed by client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteSet {
    clients: BTreeMap<u64, Vec<DeleteRange>>,
}

impl DeleteSet {
    pub fn insert(&mut self, client: u64, clock: u32, len: u32) {
        self.clients
            .entry(client)
            .or_default()
            .push(DeleteRange { clock, len });
    }

    /// Returns true if the clock of `id` falls inside a deleted range.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.clients.get(&id.client).is_some_and(|ranges| {
            ranges
                .iter()
                .any(|r| id.clock >= r.clock && id.clock < r.end())
        })
    }

    pub fn is_empty(&self) -> bool {
        self.clients.values().all(Vec::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &DeleteRange)> {
        self.clients
            .iter()
            .flat_map(|(client, ranges)| ranges.iter().map(move |r| (*client, r)))
    }
}

/// Structs grouped by client, plus the delete set of an update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedUpdate {
    pub clients: BTreeMap<u64, Vec<Struct>>,
    pub delete_set: DeleteSet,
}

impl DecodedUpdate {
    /// Total number of structs across clients.
    pub fn struct_count(&self) -> usize {
        self.clients.values().map(Vec::len).sum()
    }
}

/// Decodes a Yjs v1 update.
pub fn decode_v1(bytes: &[u8]) -> Result<DecodedUpdate, DecodeError> {
    let mut reader = Reader::new(bytes);
    let mut update = DecodedUpdate::default();

    let num_clients = reader.read_var_u64()?;
    for _ in 0..num_clients {
        let num_structs = reader.read_var_u64()?;
        let client = reader.read_var_u64()?;
        let mut clock = reader.read_var_u32()?;
        let structs = update.clients.entry(client).or_default();

        for _ in 0..num_structs {
            let id = ItemId::new(client, clock);
            let parsed = read_struct(&mut reader, id)?;
            clock = clock
                .checked_add(parsed.len())
                .ok_or(DecodeError::ClockOverflow { client })?;
            structs.push(parsed);
        }
    }

    let num_clients = reader.read_var_u64()?;
    for _ in 0..num_clients {
        let client = reader.read_var_u64()?;
        let num_deletes = reader.read_var_u64()?;
        for _ in 0..num_deletes {
            let clock = reader.read_var_u32()?;
            let len = reader.read_var_u32()?;
            update.delete_set.insert(client, clock, len);
        }
    }

    if !reader.is_empty() {
        tracing::debug!(
            trailing = reader.remaining(),
            "Ignoring trailing bytes after delete set"
        );
    }

    tracing::debug!(
        clients = update.clients.len(),
        structs = update.struct_count(),
        "Decoded update"
    );
    Ok(update)
}

fn read_id(reader: &mut Reader<'_>) -> Result<ItemId, DecodeError> {
    let client = reader.read_var_u64()?;
    let clock = reader.read_var_u32()?;
    Ok(ItemId::new(client, clock))
}

fn read_struct(reader: &mut Reader<'_>, id: ItemId) -> Result<Struct, DecodeError> {
    let info = reader.read_u8()?;
    match info & BITS5 {
        STRUCT_GC => Ok(Struct::Gc {
            id,
            len: reader.read_var_u32()?,
        }),
        STRUCT_SKIP => Ok(Struct::Skip {
            id,
            len: reader.read_var_u32()?,
        }),
        _ => read_item(reader, id, info).map(Struct::Item),
    }
}

fn read_item(reader: &mut Reader<'_>, id: ItemId, info: u8) -> Result<DecodedItem, DecodeError> {
    let origin = if info & HAS_ORIGIN != 0 {
        Some(read_id(reader)?)
    } else {
        None
    };
    let right_origin = if info & HAS_RIGHT_ORIGIN != 0 {
        Some(read_id(reader)?)
    } else {
        None
    };

    // Parent info is only written when no origin can provide it
    let has_parent_info = info & (HAS_ORIGIN | HAS_RIGHT_ORIGIN) == 0;
    let parent = if has_parent_info {
        if reader.read_var_u64()? == 1 {
            Some(Parent::Root(reader.read_string()?.to_owned()))
        } else {
            Some(Parent::Item(read_id(reader)?))
        }
    } else {
        None
    };
    let parent_sub = if has_parent_info && info & HAS_PARENT_SUB != 0 {
        Some(reader.read_string()?.to_owned())
    } else {
        None
    };

    let content = read_content(reader, info)?;
    Ok(DecodedItem {
        id,
        origin,
        right_origin,
        parent,
        parent_sub,
        content,
    })
}

fn read_content(reader: &mut Reader<'_>, info: u8) -> Result<ItemContent, DecodeError> {
    let offset = reader.position();
    let content = match info & BITS5 {
        1 => ItemContent::Deleted(reader.read_var_u32()?),
        2 => {
            let len = reader.read_len()?;
            let mut values = Vec::with_capacity(len.min(reader.remaining()));
            for _ in 0..len {
                values.push(reader.read_json()?);
            }
            ItemContent::Json(values)
        }
        3 => ItemContent::Binary(reader.read_buf()?.to_vec()),
        4 => ItemContent::String(reader.read_string()?.to_owned()),
        5 => ItemContent::Embed(reader.read_json()?),
        6 => {
            let key = reader.read_string()?.to_owned();
            let value = reader.read_json()?;
            // A null value ends the attribute
            let value = (!value.is_nullish()).then_some(value);
            ItemContent::Format { key, value }
        }
        7 => ItemContent::Type(read_type_ref(reader)?),
        8 => {
            let len = reader.read_len()?;
            let mut values = Vec::with_capacity(len.min(reader.remaining()));
            for _ in 0..len {
                values.push(reader.read_any()?);
            }
            ItemContent::Any(values)
        }
        9 => {
            let guid = reader.read_string()?.to_owned();
            let opts = reader.read_any()?;
            ItemContent::Doc { guid, opts }
        }
        tag => return Err(DecodeError::UnknownContentRef { tag, offset }),
    };
    Ok(content)
}

fn read_type_ref(reader: &mut Reader<'_>) -> Result<TypeRef, DecodeError> {
    let offset = reader.position();
    let type_ref = match reader.read_var_u64()? {
        0 => TypeRef::Array,
        1 => TypeRef::Map,
        2 => TypeRef::Text,
        3 => TypeRef::XmlElement(reader.read_string()?.to_owned()),
        4 => TypeRef::XmlFragment,
        5 => TypeRef::XmlHook(reader.read_string()?.to_owned()),
        6 => TypeRef::XmlText,
        type_ref => return Err(DecodeError::UnknownTypeRef { type_ref, offset }),
    };
    Ok(type_ref)
}
