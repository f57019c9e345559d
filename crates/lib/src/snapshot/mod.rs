//! Loading a document snapshot into an item store.
//!
//! A snapshot is a full-state Yjs v1 update, either raw or base64 encoded
//! (the form `Y.encodeStateAsUpdate` output usually takes when written to a
//! text file). Loading decodes the update, links its structs and keeps the
//! resulting [`ItemStore`] for rendering.

use std::path::Path;

use base64ct::{Base64, Base64Unpadded, Encoding as _};

use crate::Result;
use crate::item::Item;
use crate::store::ItemStore;
use crate::update::{decode_v1, integrate};

mod errors;
pub use errors::SnapshotError;

/// How snapshot bytes are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Base64 text, whitespace allowed.
    #[default]
    Base64,
    /// Raw update bytes.
    Binary,
}

/// A decoded and linked document snapshot.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    store: ItemStore,
}

impl Snapshot {
    /// Loads raw v1 update bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        #[cfg(feature = "y-crdt")]
        check_with_yrs(bytes)?;

        let update = decode_v1(bytes)?;
        let store = integrate(update);
        tracing::info!(
            items = store.len(),
            clients = store.clients().count(),
            "Loaded snapshot"
        );
        Ok(Self { store })
    }

    /// Loads a base64-encoded update.
    pub fn from_base64(text: &str) -> Result<Self> {
        let bytes = decode_base64(text)?;
        Self::from_bytes(&bytes)
    }

    /// Loads snapshot contents read from somewhere else.
    pub fn load(data: &[u8], encoding: Encoding) -> Result<Self> {
        match encoding {
            Encoding::Binary => Self::from_bytes(data),
            Encoding::Base64 => {
                let text = String::from_utf8_lossy(data);
                Self::from_base64(&text)
            }
        }
    }

    /// Reads and loads a snapshot file.
    pub fn open(path: impl AsRef<Path>, encoding: Encoding) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Reading snapshot from {}", path.display());
        let data = std::fs::read(path)?;
        Self::load(&data, encoding)
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    /// Every item across clients, ascending client then clock.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.store.items()
    }

    /// Renders the snapshot as a graph description.
    pub fn render(&self) -> String {
        self.store.render()
    }
}

/// Decodes base64 text, ignoring whitespace and accepting missing padding.
pub fn decode_base64(text: &str) -> std::result::Result<Vec<u8>, SnapshotError> {
    let cleaned: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Base64::decode_vec(&cleaned)
        .or_else(|_| Base64Unpadded::decode_vec(&cleaned))
        .map_err(|e| SnapshotError::InvalidBase64 {
            reason: e.to_string(),
        })
}

#[cfg(feature = "y-crdt")]
fn check_with_yrs(bytes: &[u8]) -> std::result::Result<(), SnapshotError> {
    use yrs::updates::decoder::Decode;

    yrs::Update::decode_v1(bytes)
        .map(|_| ())
        .map_err(|e| SnapshotError::Rejected {
            reason: e.to_string(),
        })
}
