//! Persistence backends for built indexes.
//!
//! A backend stores the full set of [`IndexEntry`] pairs for one document and
//! can tell whether a *completed* build is present. Completion is keyed on a
//! manifest committed only after every entry is durable, never on mere file
//! or directory existence, so an interrupted build is indistinguishable from
//! no build at all and a prior valid index survives a failed rebuild.

mod redb_backend;
mod snapshot;

pub use redb_backend::RedbPersistence;
pub use snapshot::SnapshotPersistence;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::types::IndexEntry;

/// On-disk format version; bump when the entry layout changes.
pub const FORMAT_VERSION: u32 = 1;

/// Manifest recorded alongside persisted entries.
///
/// Written last: its presence marks the build as complete, and its fields let
/// `load` reject truncated or incompatible data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexManifest {
    /// On-disk format version.
    pub version: u32,
    /// Number of persisted entries.
    pub entry_count: usize,
    /// Embedding dimension of the persisted vectors.
    pub dimension: usize,
}

impl IndexManifest {
    /// Creates a manifest for the current format version.
    #[must_use]
    pub const fn new(entry_count: usize, dimension: usize) -> Self {
        Self {
            version: FORMAT_VERSION,
            entry_count,
            dimension,
        }
    }
}

/// Trait for persistence backends.
pub trait Persistence: Send + Sync {
    /// Returns `true` if a completed build is present at this location.
    fn is_complete(&self) -> bool;

    /// Atomically replaces the stored index with `entries`.
    ///
    /// The completion manifest must become visible only after every entry is
    /// durable; on failure the previous stored state must remain intact.
    fn save(&self, entries: &[IndexEntry], dimension: usize) -> Result<()>;

    /// Loads all entries of a completed build, in `source_order`.
    ///
    /// # Errors
    /// Returns [`crate::IndexError::PersistenceFailure`] if no completed build
    /// is present or the stored data does not match its manifest.
    fn load(&self) -> Result<Vec<IndexEntry>>;

    /// Returns the storage path.
    fn path(&self) -> &Path;
}
