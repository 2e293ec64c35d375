//! Menagerie - Image and metadata catalog server
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod records;
pub mod server;
