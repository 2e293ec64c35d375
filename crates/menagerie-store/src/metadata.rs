//! Ordered record collection mirrored to a JSON file.
//!
//! The durable file always holds a complete snapshot: each mutation writes
//! the whole collection to a temporary file next to it and renames it into
//! place. The in-memory collection only changes once that write succeeded,
//! so a failed write leaves memory and disk at the previous state.

use std::io::Write;
use std::path::{Path, PathBuf};

use menagerie_common::{Error, Record, RecordId, Result};
use parking_lot::RwLock;

/// In-memory record list backed by a flat JSON file.
#[derive(Debug)]
pub struct MetadataStore {
    path: PathBuf,
    records: RwLock<Vec<Record>>,
}

impl MetadataStore {
    /// Load the durable file, or create it holding an empty list.
    ///
    /// # Errors
    ///
    /// * [`Error::CorruptStore`] - The file exists but is not a JSON array of records
    /// * [`Error::Storage`] - The file could not be read or created
    pub fn load_all(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let records = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                Error::storage(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let records: Vec<Record> = serde_json::from_str(&content)
                .map_err(|e| Error::corrupt_store(path.display(), e))?;
            tracing::info!(path = %path.display(), count = records.len(), "Loaded metadata");
            records
        } else {
            if let Some(parent) = parent_dir(&path) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::storage(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
            write_snapshot(&path, &[])?;
            tracing::info!(path = %path.display(), "Created empty metadata file");
            Vec::new()
        };

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// Location of the durable file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in insertion order.
    pub fn list(&self) -> Vec<Record> {
        self.records.read().clone()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Largest id in the store.
    pub fn max_id(&self) -> Option<RecordId> {
        self.records.read().iter().map(|r| r.id).max()
    }

    /// Position of the record with the given id.
    pub fn find_index_by_id(&self, id: RecordId) -> Result<usize> {
        self.records
            .read()
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::not_found(format!("record {id}")))
    }

    /// Copy of the record with the given id.
    pub fn get(&self, id: RecordId) -> Result<Record> {
        self.records
            .read()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("record {id}")))
    }

    /// Copy of the record at `index`.
    pub fn get_at(&self, index: usize) -> Result<Record> {
        self.records
            .read()
            .get(index)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("record at index {index}")))
    }

    /// Add a record at the end and persist.
    pub fn append(&self, record: Record) -> Result<()> {
        self.mutate(|records| {
            records.push(record);
            Ok(())
        })
    }

    /// Overwrite the record at `index` and persist.
    pub fn replace_at(&self, index: usize, record: Record) -> Result<()> {
        self.mutate(|records| {
            let slot = records
                .get_mut(index)
                .ok_or_else(|| Error::not_found(format!("record at index {index}")))?;
            *slot = record;
            Ok(())
        })
    }

    /// Remove the record at `index`, persist, and return it.
    pub fn remove_at(&self, index: usize) -> Result<Record> {
        self.mutate(|records| {
            if index >= records.len() {
                return Err(Error::not_found(format!("record at index {index}")));
            }
            Ok(records.remove(index))
        })
    }

    /// Apply `f` to a copy of the collection, persist it, then commit it.
    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<Record>) -> Result<T>) -> Result<T> {
        let mut records = self.records.write();
        let mut next = records.clone();
        let out = f(&mut next)?;
        write_snapshot(&self.path, &next)?;
        *records = next;
        Ok(out)
    }
}

/// Atomically replace the durable file with `records`.
fn write_snapshot(path: &Path, records: &[Record]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| Error::storage(format!("Failed to serialize records: {}", e)))?;

    let dir = parent_dir(path).unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        Error::storage(format!("Failed to create temp file in {}: {}", dir.display(), e))
    })?;
    tmp.write_all(json.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| Error::storage(format!("Failed to write metadata snapshot: {}", e)))?;
    tmp.persist(path).map_err(|e| {
        Error::storage(format!("Failed to replace {}: {}", path.display(), e.error))
    })?;

    tracing::debug!(path = %path.display(), count = records.len(), "Persisted metadata");
    Ok(())
}

/// Parent directory of `path`, or `None` for a bare filename.
fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
