//! JSON snapshot persistence with atomic rename commit.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IndexError, Result};
use crate::types::IndexEntry;

use super::{FORMAT_VERSION, IndexManifest, Persistence};

#[derive(Serialize, Deserialize)]
struct Snapshot {
    manifest: IndexManifest,
    entries: Vec<IndexEntry>,
}

/// Single-file JSON persistence.
///
/// The snapshot is written to a sibling temp file and committed with an
/// atomic rename, so the target path either holds the previous complete
/// snapshot or the new one, never a torn write. The embedded manifest is
/// validated on load.
///
/// Simpler and greppable compared to [`super::RedbPersistence`], at the cost
/// of rewriting the whole file on every save.
#[derive(Debug, Clone)]
pub struct SnapshotPersistence {
    path: PathBuf,
}

impl SnapshotPersistence {
    /// Creates a snapshot backend targeting `path`.
    ///
    /// Nothing is touched on disk until the first [`Persistence::save`].
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_snapshot(&self) -> Result<Snapshot> {
        let raw = fs::read(&self.path).map_err(|e| IndexError::persistence(&self.path, e))?;
        serde_json::from_slice(&raw).map_err(|e| IndexError::persistence(&self.path, e))
    }
}

impl Persistence for SnapshotPersistence {
    fn is_complete(&self) -> bool {
        self.path.exists()
            && self
                .read_snapshot()
                .is_ok_and(|snapshot| {
                    snapshot.manifest.version == FORMAT_VERSION
                        && snapshot.manifest.entry_count == snapshot.entries.len()
                })
    }

    fn save(&self, entries: &[IndexEntry], dimension: usize) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| IndexError::persistence(&self.path, e))?;
        }

        let snapshot = Snapshot {
            manifest: IndexManifest::new(entries.len(), dimension),
            entries: entries.to_vec(),
        };
        let payload = serde_json::to_vec(&snapshot)
            .map_err(|e| IndexError::persistence(&self.path, e))?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload).map_err(|e| IndexError::persistence(&self.path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| IndexError::persistence(&self.path, e))
    }

    fn load(&self) -> Result<Vec<IndexEntry>> {
        if !self.path.exists() {
            return Err(IndexError::persistence(
                &self.path,
                "no completed index at this location",
            ));
        }

        let snapshot = self.read_snapshot()?;
        if snapshot.manifest.version != FORMAT_VERSION {
            return Err(IndexError::persistence(
                &self.path,
                format!(
                    "unsupported format version {} (expected {FORMAT_VERSION})",
                    snapshot.manifest.version
                ),
            ));
        }
        if snapshot.manifest.entry_count != snapshot.entries.len() {
            return Err(IndexError::persistence(
                &self.path,
                format!(
                    "manifest records {} entries but {} were stored",
                    snapshot.manifest.entry_count,
                    snapshot.entries.len()
                ),
            ));
        }

        let mut entries = snapshot.entries;
        entries.sort_by_key(|entry| entry.chunk.source_order);
        Ok(entries)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
