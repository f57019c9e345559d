//! Error types for snapshot loading.

use thiserror::Error;

/// Structured errors raised before a snapshot reaches the update decoder.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot text is not valid base64
    #[error("Invalid base64 snapshot: {reason}")]
    InvalidBase64 { reason: String },

    /// The reference Yjs decoder refused the update bytes
    #[error("Update rejected by yrs: {reason}")]
    Rejected { reason: String },
}

impl SnapshotError {
    /// Check if the snapshot text itself is malformed
    pub fn is_encoding_error(&self) -> bool {
        matches!(self, SnapshotError::InvalidBase64 { .. })
    }

    /// Check if the update bytes were refused
    pub fn is_rejected(&self) -> bool {
        matches!(self, SnapshotError::Rejected { .. })
    }
}

// Conversion from SnapshotError to the main Error type
impl From<SnapshotError> for crate::Error {
    fn from(err: SnapshotError) -> Self {
        crate::Error::Snapshot(err)
    }
}
