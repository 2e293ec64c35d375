//! Menagerie-Store: blob and metadata storage for records.
//!
//! Records live in two places that the record service keeps in lockstep:
//!
//! - `blob` - Uploaded images in a content directory, named by a generated
//!   collision-resistant filename
//! - `metadata` - The ordered record collection, held in memory and mirrored
//!   to a JSON file after every mutation
//!
//! # Example
//!
//! ```no_run
//! use menagerie_store::{BlobStore, MetadataStore};
//!
//! let blobs = BlobStore::open("/var/lib/menagerie/uploads", "/uploads").unwrap();
//! let metadata = MetadataStore::load_all("/var/lib/menagerie/metadata.json").unwrap();
//!
//! let path = blobs.save(b"\x89PNG...", "aria.png").unwrap();
//! println!("stored at {path}, {} records loaded", metadata.len());
//! ```

pub mod blob;
pub mod metadata;

pub use blob::BlobStore;
pub use metadata::MetadataStore;
