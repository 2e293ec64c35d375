//! Filesystem storage for uploaded images.
//!
//! Every upload gets a fresh `image-<uuid>.<ext>` name inside the content
//! directory. Files are created with create-new semantics, so an existing
//! blob is never overwritten. Clients see blobs by their public path, which
//! is the configured prefix followed by the filename.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use menagerie_common::paths::{is_plain_file_name, normalized_extension};
use menagerie_common::{Error, Result};
use uuid::Uuid;

/// Filename prefix for stored uploads, after the form field name.
const FILE_NAME_PREFIX: &str = "image";

/// Attempts before giving up on finding an unused filename.
const MAX_NAME_ATTEMPTS: usize = 8;

/// Filesystem manager for uploaded images.
#[derive(Debug, Clone)]
pub struct BlobStore {
    content_dir: PathBuf,
    public_prefix: String,
}

impl BlobStore {
    /// Open the store, creating the content directory if it is absent.
    ///
    /// # Arguments
    ///
    /// * `content_dir` - Directory holding the uploaded files
    /// * `public_prefix` - URL prefix under which the files are served, e.g. `/uploads`
    pub fn open(content_dir: impl Into<PathBuf>, public_prefix: &str) -> Result<Self> {
        let content_dir = content_dir.into();
        std::fs::create_dir_all(&content_dir).map_err(|e| {
            Error::storage(format!(
                "Failed to create upload directory {}: {}",
                content_dir.display(),
                e
            ))
        })?;

        Ok(Self {
            content_dir,
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        })
    }

    /// Directory holding the stored files.
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// URL prefix of stored files, without a trailing slash.
    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Write uploaded bytes under a new unique filename.
    ///
    /// Only the extension of `original_name` is kept. Returns the public
    /// path of the new file.
    pub fn save(&self, data: &[u8], original_name: &str) -> Result<String> {
        let extension = normalized_extension(original_name);

        for _ in 0..MAX_NAME_ATTEMPTS {
            let file_name = generate_file_name(extension.as_deref());
            let path = self.content_dir.join(&file_name);

            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(f) => f,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(Error::storage(format!(
                        "Failed to create {}: {}",
                        path.display(),
                        e
                    )))
                }
            };

            if let Err(e) = file.write_all(data).and_then(|()| file.flush()) {
                drop(file);
                let _ = std::fs::remove_file(&path);
                return Err(Error::storage(format!(
                    "Failed to write {}: {}",
                    path.display(),
                    e
                )));
            }

            tracing::debug!(path = %path.display(), bytes = data.len(), "Stored upload");
            return Ok(self.public_path(&file_name));
        }

        Err(Error::storage(format!(
            "Could not find an unused filename in {}",
            self.content_dir.display()
        )))
    }

    /// Remove the file behind a public path.
    ///
    /// Fails with [`Error::NotFound`] when there is no such file, and with
    /// [`Error::Storage`] when the filesystem refuses the removal.
    pub fn delete(&self, stored_path: &str) -> Result<()> {
        let path = self.resolve(stored_path)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Deleted upload");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::not_found(format!("blob {stored_path}")))
            }
            Err(e) => Err(Error::storage(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Whether a file exists behind a public path.
    pub fn exists(&self, stored_path: &str) -> bool {
        self.resolve(stored_path)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    /// Map a public path to the file inside the content directory.
    ///
    /// Paths outside the public prefix, or naming anything but a plain
    /// file directly in the content directory, are reported as not found.
    pub fn resolve(&self, stored_path: &str) -> Result<PathBuf> {
        let file_name = stored_path
            .strip_prefix(self.public_prefix.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| is_plain_file_name(name))
            .ok_or_else(|| Error::not_found(format!("blob {stored_path}")))?;

        Ok(self.content_dir.join(file_name))
    }

    fn public_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_prefix, file_name)
    }
}

/// Build a fresh filename for an upload.
fn generate_file_name(extension: Option<&str>) -> String {
    let token = Uuid::new_v4().simple();
    match extension {
        Some(ext) => format!("{FILE_NAME_PREFIX}-{token}.{ext}"),
        None => format!("{FILE_NAME_PREFIX}-{token}"),
    }
}
