//! Record management.
//!
//! This module validates inbound record forms and coordinates the blob store
//! with the metadata store from `menagerie_store`, so that every record's
//! image exists for as long as the record does.

mod form;
mod service;

pub use form::{RecordForm, UploadedFile, ID_FIELD, IMAGE_FIELD};
pub use service::RecordService;
