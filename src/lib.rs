//! marc-readable
//!
//! Converts bibliographic catalog records encoded as MARCXML into a
//! flat, application-friendly [`ReadableRecord`] with named fields
//! (title, authors, publisher, ISBN, role-based contributor lists).
//!
//! The mapper is a pure, synchronous transform: parse a MARCXML
//! document with [`marc::parse_marcxml`], then map each record with
//! [`marc::MarcTranslator`], or do both at once with
//! [`marcxml_to_readable`]. Small download/extract helpers for fetching
//! catalog dumps live in [`archive`].

pub mod archive;
pub mod config;
pub mod error;
pub mod marc;
pub mod models;

pub use config::MapperConfig;
pub use error::{Error, Result};
pub use marc::{marcxml_to_readable, MarcRecord, MarcTranslator};
pub use models::ReadableRecord;
