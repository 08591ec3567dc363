//! Flat, application-friendly view of a bibliographic record

use serde::{Deserialize, Serialize};

/// A normalized bibliographic record produced from one MARC record.
///
/// Text fields default to the empty string and list fields to empty
/// vectors; only the numeric fields are optional. The `identifier` is
/// always present, copied verbatim from the 001 control field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadableRecord {
    pub identifier: String,
    pub title: String,
    pub subtitle: String,
    pub part_number: String,
    pub part_name: String,
    pub edition: String,
    /// Ordered and de-duplicated by exact string match
    pub authors: Vec<String>,
    pub publisher: String,
    pub year_published: Option<u16>,
    pub city_published: String,
    pub num_pages: Option<u32>,
    pub isbn: String,
    pub series: String,
    pub series_number: String,
    pub dimensions: String,
    /// Three-letter code from 008 positions 35-37
    pub language: String,
    pub original_language: String,
    pub genres: Vec<String>,
    pub editors: Vec<String>,
    pub publishers: Vec<String>,
    pub compilers: Vec<String>,
    pub illustrators: Vec<String>,
    pub translators: Vec<String>,
    pub designers: Vec<String>,
    pub photographers: Vec<String>,
}

impl ReadableRecord {
    /// Create an empty record carrying only the mandatory identifier
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }
}
