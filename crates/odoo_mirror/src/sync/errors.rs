use thiserror::Error;

use crate::remote::RemoteError;
use crate::store::StoreError;

/// Failures that abort a whole entity kind, or a whole request.
///
/// Per-item problems never surface here; they are counted in
/// [`SyncResult`](super::SyncResult) instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote listing could not be fetched.
    #[error("Failed to fetch {entity} records: {source}")]
    Fetch {
        entity: String,
        #[source]
        source: RemoteError,
    },

    /// The local store could not enumerate existing records.
    #[error("Local store unavailable for {entity}: {source}")]
    StoreUnavailable {
        entity: String,
        #[source]
        source: StoreError,
    },

    #[error("No sync strategy registered for entity: {name}")]
    UnknownEntity { name: String },

    #[error("A sync strategy is already registered for entity: {name}")]
    DuplicateEntity { name: String },
}

impl SyncError {
    pub fn unknown_entity(name: impl Into<String>) -> Self {
        Self::UnknownEntity { name: name.into() }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
