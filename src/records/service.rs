//! Record service coordinating blob and metadata storage.
//!
//! Provides the create, list, update, and delete operations behind the HTTP
//! routes. Mutations are serialized through a single writer lock, so a
//! lookup and the write that depends on it never interleave with another
//! request's mutation.

use menagerie_common::{Error, IdGenerator, Record, RecordId, Result};
use menagerie_store::{BlobStore, MetadataStore};
use parking_lot::Mutex;

use super::form::RecordForm;
use crate::config::StorageConfig;

/// High-level record service that keeps blobs and metadata in lockstep.
pub struct RecordService {
    blobs: BlobStore,
    metadata: MetadataStore,
    ids: IdGenerator,
    writer: Mutex<()>,
}

impl RecordService {
    /// Create a new `RecordService`.
    ///
    /// The id generator is seeded past the largest id already stored.
    ///
    /// # Arguments
    ///
    /// * `blobs` - The filesystem image store
    /// * `metadata` - The loaded metadata store
    pub fn new(blobs: BlobStore, metadata: MetadataStore) -> Self {
        let ids = metadata
            .max_id()
            .map(IdGenerator::starting_after)
            .unwrap_or_default();

        Self {
            blobs,
            metadata,
            ids,
            writer: Mutex::new(()),
        }
    }

    /// Open both stores as described by the storage configuration.
    ///
    /// Fails with [`Error::CorruptStore`] if the metadata file cannot be parsed.
    pub fn open(storage: &StorageConfig) -> Result<Self> {
        let blobs = BlobStore::open(storage.upload_path(), &storage.public_prefix)?;
        let metadata = MetadataStore::load_all(storage.metadata_path())?;
        Ok(Self::new(blobs, metadata))
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    /// Create a record from a form carrying all six fields and an image.
    ///
    /// The image is stored first, then the record is appended. If the append
    /// fails the new image is removed again.
    pub fn create(&self, form: RecordForm) -> Result<Record> {
        let (fields, image) = form.validate(true)?;
        let image = image.ok_or_else(|| Error::validation("missing required field(s): image"))?;

        let _writer = self.writer.lock();

        let file_path = self.blobs.save(&image.data, &image.file_name)?;
        let record = Record::new(self.ids.next_id(), file_path, fields);

        if let Err(e) = self.metadata.append(record.clone()) {
            tracing::error!(id = %record.id, error = %e, "Failed to persist new record");
            self.discard_blob(&record.file_path);
            return Err(e);
        }

        tracing::info!(id = %record.id, name = %record.name, "Created record");
        Ok(record)
    }

    /// All records in insertion order.
    pub fn list_all(&self) -> Vec<Record> {
        self.metadata.list()
    }

    /// Look up one record.
    pub fn get(&self, id: RecordId) -> Result<Record> {
        self.metadata.get(id)
    }

    /// Overwrite the text fields of a record, optionally replacing its image.
    ///
    /// All six fields must be supplied. With a new image, the new file is
    /// stored before the record is rewritten and the previous file is removed
    /// afterwards; a failure to remove it is logged and does not fail the
    /// update.
    pub fn update(&self, id: RecordId, form: RecordForm) -> Result<Record> {
        let (fields, image) = form.validate(false)?;

        let _writer = self.writer.lock();

        let index = self.metadata.find_index_by_id(id)?;
        let mut record = self.metadata.get_at(index)?;
        let previous_path = record.file_path.clone();

        let new_path = match image {
            Some(image) => Some(self.blobs.save(&image.data, &image.file_name)?),
            None => None,
        };

        record.apply(fields);
        if let Some(ref path) = new_path {
            record.file_path = path.clone();
        }

        if let Err(e) = self.metadata.replace_at(index, record.clone()) {
            tracing::error!(id = %id, error = %e, "Failed to persist record update");
            if let Some(ref path) = new_path {
                self.discard_blob(path);
            }
            return Err(e);
        }

        if new_path.is_some() {
            if let Err(e) = self.blobs.delete(&previous_path) {
                tracing::warn!(
                    id = %id,
                    path = %previous_path,
                    error = %e,
                    "Failed to remove replaced image"
                );
            }
        }

        tracing::info!(id = %id, replaced_image = new_path.is_some(), "Updated record");
        Ok(record)
    }

    /// Delete a record and its image.
    ///
    /// A missing image file is logged and ignored. Any other failure to
    /// remove the file is returned as [`Error::Storage`] and the record is
    /// kept.
    pub fn delete(&self, id: RecordId) -> Result<()> {
        let _writer = self.writer.lock();

        let index = self.metadata.find_index_by_id(id)?;
        let record = self.metadata.get_at(index)?;

        match self.blobs.delete(&record.file_path) {
            Ok(()) => {}
            Err(Error::NotFound(_)) => {
                tracing::warn!(id = %id, path = %record.file_path, "Image already missing");
            }
            Err(e) => return Err(e),
        }

        if let Err(e) = self.metadata.remove_at(index) {
            tracing::error!(
                id = %id,
                error = %e,
                "Image removed but record could not be deleted from metadata"
            );
            return Err(e);
        }

        tracing::info!(id = %id, "Deleted record");
        Ok(())
    }

    /// Best-effort removal of a blob that no record references.
    fn discard_blob(&self, path: &str) {
        if let Err(e) = self.blobs.delete(path) {
            tracing::warn!(path = %path, error = %e, "Failed to remove orphaned image");
        }
    }
}
