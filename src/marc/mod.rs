//! MARCXML record parsing and translation
//!
//! This module parses MARCXML documents and translates the resulting
//! records into the flat ReadableRecord structure.

pub mod parser;
pub mod translator;

pub use parser::{parse_marcxml, parse_marcxml_str, DataField, MarcRecord, Subfield};
pub use translator::{marcxml_to_readable, MarcTranslator};
