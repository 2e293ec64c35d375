//! Menagerie-Common: Shared types, IDs, and utilities.
//!
//! This crate provides common functionality used across menagerie:
//!
//! - **Records**: The [`Record`] entity and the [`RecordFields`] text payload
//! - **Typed IDs**: [`RecordId`] and its monotonic [`IdGenerator`]
//! - **Path Utilities**: Extension handling for uploaded filenames
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use menagerie_common::{IdGenerator, Error, Result};
//! use menagerie_common::paths::normalized_extension;
//!
//! // Issue ids that never repeat
//! let ids = IdGenerator::new();
//! let first = ids.next_id();
//! assert!(ids.next_id() > first);
//!
//! // Keep the original extension of an upload
//! assert_eq!(normalized_extension("portrait.PNG").as_deref(), Some("png"));
//!
//! // Use common error types
//! fn example() -> Result<()> {
//!     Err(Error::not_found("record 42"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
