//! Record entity and its text payload.
//!
//! Records serialize in camelCase, which is the shape used both on the wire
//! and in the durable metadata file.

use serde::{Deserialize, Serialize};

use crate::RecordId;

/// Names of the six required text fields, in form order.
pub const TEXT_FIELDS: [&str; 6] = [
    "name",
    "kind",
    "category",
    "strengths",
    "weaknesses",
    "notes",
];

/// One uploaded item's metadata plus a reference to its stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    /// Public path of the stored image.
    pub file_path: String,
    pub name: String,
    pub kind: String,
    pub category: String,
    pub strengths: String,
    pub weaknesses: String,
    pub notes: String,
}

impl Record {
    /// Build a record from validated fields.
    pub fn new(id: RecordId, file_path: String, fields: RecordFields) -> Self {
        Self {
            id,
            file_path,
            name: fields.name,
            kind: fields.kind,
            category: fields.category,
            strengths: fields.strengths,
            weaknesses: fields.weaknesses,
            notes: fields.notes,
        }
    }

    /// Overwrite all six text fields.
    pub fn apply(&mut self, fields: RecordFields) {
        self.name = fields.name;
        self.kind = fields.kind;
        self.category = fields.category;
        self.strengths = fields.strengths;
        self.weaknesses = fields.weaknesses;
        self.notes = fields.notes;
    }

    /// The text fields of this record.
    pub fn fields(&self) -> RecordFields {
        RecordFields {
            name: self.name.clone(),
            kind: self.kind.clone(),
            category: self.category.clone(),
            strengths: self.strengths.clone(),
            weaknesses: self.weaknesses.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// The six free-text fields of a record, all validated as non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    pub name: String,
    pub kind: String,
    pub category: String,
    pub strengths: String,
    pub weaknesses: String,
    pub notes: String,
}
