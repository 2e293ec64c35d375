//! Inbound record forms and their validation.
//!
//! A [`RecordForm`] collects whatever text fields and file a request carried.
//! Validation turns it into [`RecordFields`] once every required value is
//! present and non-empty, or reports all missing names at once.

use bytes::Bytes;
use menagerie_common::{Error, RecordFields, RecordId, Result, TEXT_FIELDS};

/// Form field carrying the uploaded image.
pub const IMAGE_FIELD: &str = "image";

/// Form field carrying the record id on edits.
pub const ID_FIELD: &str = "id";

/// A file received with a request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename reported by the client; only its extension is kept.
    pub file_name: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Raw values received for a create or edit request.
#[derive(Debug, Clone, Default)]
pub struct RecordForm {
    pub id: Option<String>,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub category: Option<String>,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub notes: Option<String>,
    pub image: Option<UploadedFile>,
}

impl RecordForm {
    /// Form holding every text field of `fields`.
    pub fn from_fields(fields: RecordFields) -> Self {
        Self {
            name: Some(fields.name),
            kind: Some(fields.kind),
            category: Some(fields.category),
            strengths: Some(fields.strengths),
            weaknesses: Some(fields.weaknesses),
            notes: Some(fields.notes),
            ..Self::default()
        }
    }

    /// Attach an uploaded file.
    pub fn with_image(mut self, image: UploadedFile) -> Self {
        self.image = Some(image);
        self
    }

    /// Store a text value by form field name.
    ///
    /// Returns `false` for names that are not part of a record form.
    pub fn set_text(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            ID_FIELD => &mut self.id,
            "name" => &mut self.name,
            "kind" => &mut self.kind,
            "category" => &mut self.category,
            "strengths" => &mut self.strengths,
            "weaknesses" => &mut self.weaknesses,
            "notes" => &mut self.notes,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Store the uploaded file; a request may carry only one.
    pub fn set_image(&mut self, image: UploadedFile) -> Result<()> {
        if self.image.is_some() {
            return Err(Error::validation("only one image may be uploaded"));
        }
        self.image = Some(image);
        Ok(())
    }

    /// Parse the `id` field.
    pub fn record_id(&self) -> Result<RecordId> {
        let raw = self
            .id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::validation("missing required field(s): id"))?;
        raw.parse()
            .map_err(|_| Error::validation(format!("invalid id: {raw:?}")))
    }

    /// Check that all six text fields are present, plus the image when
    /// `require_image` is set.
    ///
    /// Returns the validated fields and the uploaded file, if any. An empty
    /// upload counts as missing.
    pub fn validate(self, require_image: bool) -> Result<(RecordFields, Option<UploadedFile>)> {
        let values = [
            self.name,
            self.kind,
            self.category,
            self.strengths,
            self.weaknesses,
            self.notes,
        ];
        let image = self.image.filter(|f| !f.is_empty());

        let mut missing: Vec<&str> = TEXT_FIELDS
            .iter()
            .zip(values.iter())
            .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
            .map(|(name, _)| *name)
            .collect();
        if require_image && image.is_none() {
            missing.push(IMAGE_FIELD);
        }
        if !missing.is_empty() {
            return Err(Error::validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        }

        let [name, kind, category, strengths, weaknesses, notes] =
            values.map(Option::unwrap_or_default);

        Ok((
            RecordFields {
                name,
                kind,
                category,
                strengths,
                weaknesses,
                notes,
            },
            image,
        ))
    }
}
