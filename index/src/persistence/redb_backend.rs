//! redb-based embedded database persistence.

use redb::{Database, ReadableTable, TableDefinition};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IndexError, Result};
use crate::types::IndexEntry;

use super::{FORMAT_VERSION, IndexManifest, Persistence};

const ENTRIES_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("entries");
const MANIFEST_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("manifest");
const MANIFEST_KEY: &str = "manifest";

/// Embedded database persistence using redb.
///
/// Entries and the completion manifest are committed in a single write
/// transaction, so a torn build never looks complete: either the commit
/// lands (entries plus manifest together) or the database keeps its previous
/// content.
///
/// # Example
///
/// ```rust,no_run
/// use tendex_index::persistence::{Persistence, RedbPersistence};
///
/// let persistence = RedbPersistence::new("./index.redb").unwrap();
/// assert!(!persistence.is_complete());
/// ```
pub struct RedbPersistence {
    path: PathBuf,
    db: Database,
}

impl std::fmt::Debug for RedbPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbPersistence")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RedbPersistence {
    /// Creates or opens a redb persistence backend.
    ///
    /// Opening creates the database file; the location still counts as empty
    /// until a build commits its manifest.
    ///
    /// # Errors
    /// Returns [`IndexError::PersistenceFailure`] if the database cannot be
    /// opened or created.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| IndexError::persistence(&path, e))?;
        }

        let db = Database::create(&path).map_err(|e| IndexError::persistence(&path, e))?;
        Ok(Self { path, db })
    }

    fn read_manifest(&self) -> Result<Option<IndexManifest>> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| IndexError::persistence(&self.path, e))?;

        let table = match read_txn.open_table(MANIFEST_TABLE) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(IndexError::persistence(&self.path, e)),
        };

        let Some(raw) = table
            .get(MANIFEST_KEY)
            .map_err(|e| IndexError::persistence(&self.path, e))?
        else {
            return Ok(None);
        };

        let manifest: IndexManifest = serde_json::from_slice(raw.value())
            .map_err(|e| IndexError::persistence(&self.path, e))?;
        Ok(Some(manifest))
    }
}

impl Persistence for RedbPersistence {
    fn is_complete(&self) -> bool {
        matches!(self.read_manifest(), Ok(Some(manifest)) if manifest.version == FORMAT_VERSION)
    }

    fn save(&self, entries: &[IndexEntry], dimension: usize) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| IndexError::persistence(&self.path, e))?;

        // Drop any previous build inside the same transaction; the old state
        // stays readable until this commit lands.
        write_txn
            .delete_table(ENTRIES_TABLE)
            .map_err(|e| IndexError::persistence(&self.path, e))?;
        write_txn
            .delete_table(MANIFEST_TABLE)
            .map_err(|e| IndexError::persistence(&self.path, e))?;

        {
            let mut table = write_txn
                .open_table(ENTRIES_TABLE)
                .map_err(|e| IndexError::persistence(&self.path, e))?;
            for entry in entries {
                let serialized = serde_json::to_vec(entry)
                    .map_err(|e| IndexError::persistence(&self.path, e))?;
                table
                    .insert(entry.chunk.source_order as u64, serialized.as_slice())
                    .map_err(|e| IndexError::persistence(&self.path, e))?;
            }

            let manifest = IndexManifest::new(entries.len(), dimension);
            let mut manifest_table = write_txn
                .open_table(MANIFEST_TABLE)
                .map_err(|e| IndexError::persistence(&self.path, e))?;
            manifest_table
                .insert(
                    MANIFEST_KEY,
                    serde_json::to_vec(&manifest)
                        .map_err(|e| IndexError::persistence(&self.path, e))?
                        .as_slice(),
                )
                .map_err(|e| IndexError::persistence(&self.path, e))?;
        }

        write_txn
            .commit()
            .map_err(|e| IndexError::persistence(&self.path, e))
    }

    fn load(&self) -> Result<Vec<IndexEntry>> {
        let manifest = self.read_manifest()?.ok_or_else(|| {
            IndexError::persistence(&self.path, "no completed index at this location")
        })?;
        if manifest.version != FORMAT_VERSION {
            return Err(IndexError::persistence(
                &self.path,
                format!(
                    "unsupported format version {} (expected {FORMAT_VERSION})",
                    manifest.version
                ),
            ));
        }

        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| IndexError::persistence(&self.path, e))?;
        let table = read_txn
            .open_table(ENTRIES_TABLE)
            .map_err(|e| IndexError::persistence(&self.path, e))?;

        let mut entries = Vec::with_capacity(manifest.entry_count);
        for row in table
            .iter()
            .map_err(|e| IndexError::persistence(&self.path, e))?
        {
            let (_, value) = row.map_err(|e| IndexError::persistence(&self.path, e))?;
            let entry: IndexEntry = serde_json::from_slice(value.value())
                .map_err(|e| IndexError::persistence(&self.path, e))?;
            entries.push(entry);
        }

        if entries.len() != manifest.entry_count {
            return Err(IndexError::persistence(
                &self.path,
                format!(
                    "manifest records {} entries but {} were stored",
                    manifest.entry_count,
                    entries.len()
                ),
            ));
        }

        Ok(entries)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;
    use tempfile::tempdir;

    fn make_entry(order: usize, text: &str) -> IndexEntry {
        let chunk = Chunk::new(format!("doc1#chunk_{order}"), text, "doc1", order);
        IndexEntry::new(chunk, vec![1.0, 2.0, 3.0, 4.0])
    }

    #[test]
    fn fresh_database_is_not_complete() {
        let dir = tempdir().unwrap();
        let persistence = RedbPersistence::new(dir.path().join("index.redb")).unwrap();
        assert!(!persistence.is_complete());
        assert!(persistence.load().is_err());
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let persistence = RedbPersistence::new(dir.path().join("index.redb")).unwrap();

        let entries = vec![make_entry(0, "hello"), make_entry(1, "world")];
        persistence.save(&entries, 4).unwrap();

        assert!(persistence.is_complete());
        let loaded = persistence.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].chunk.text, "hello");
        assert_eq!(loaded[1].chunk.text, "world");
    }

    #[test]
    fn entries_come_back_in_source_order() {
        let dir = tempdir().unwrap();
        let persistence = RedbPersistence::new(dir.path().join("index.redb")).unwrap();

        // Saved out of order; the u64 key restores ordering.
        let entries = vec![make_entry(2, "c"), make_entry(0, "a"), make_entry(1, "b")];
        persistence.save(&entries, 4).unwrap();

        let loaded = persistence.load().unwrap();
        let texts: Vec<&str> = loaded.iter().map(|e| e.chunk.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn empty_index_is_still_complete() {
        let dir = tempdir().unwrap();
        let persistence = RedbPersistence::new(dir.path().join("index.redb")).unwrap();

        persistence.save(&[], 4).unwrap();
        assert!(persistence.is_complete());
        assert!(persistence.load().unwrap().is_empty());
    }

    #[test]
    fn save_replaces_previous_build() {
        let dir = tempdir().unwrap();
        let persistence = RedbPersistence::new(dir.path().join("index.redb")).unwrap();

        persistence
            .save(&[make_entry(0, "old"), make_entry(1, "stale")], 4)
            .unwrap();
        persistence.save(&[make_entry(0, "new")], 4).unwrap();

        let loaded = persistence.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].chunk.text, "new");
    }

    #[test]
    fn reopen_preserves_completed_build() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.redb");

        {
            let persistence = RedbPersistence::new(&path).unwrap();
            persistence.save(&[make_entry(0, "kept")], 4).unwrap();
        }

        let persistence = RedbPersistence::new(&path).unwrap();
        assert!(persistence.is_complete());
        assert_eq!(persistence.load().unwrap()[0].chunk.text, "kept");
    }
}
