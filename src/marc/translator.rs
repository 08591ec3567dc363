//! MARC to ReadableRecord translator
//!
//! Maps parsed MARC21 bibliographic records onto the flat
//! [`ReadableRecord`] structure.

use once_cell::sync::Lazy;
use regex::Regex;

use super::parser::{DataField, MarcRecord};
use crate::config::MapperConfig;
use crate::error::{Error, Result};
use crate::models::ReadableRecord;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());
static LEADING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+").unwrap());
static BRACKETED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\[\]]*)\]").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// MARC record translator
pub struct MarcTranslator {
    config: MapperConfig,
}

impl MarcTranslator {
    /// Create a translator with the given mapper configuration
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    /// Translate a sequence of MARC records, dropping filtered ones
    pub fn translate_all(&self, records: &[MarcRecord]) -> Result<Vec<ReadableRecord>> {
        let mut results = Vec::with_capacity(records.len());
        for record in records {
            if let Some(readable) = self.translate(record)? {
                results.push(readable);
            }
        }
        Ok(results)
    }

    /// Translate one MARC record into a ReadableRecord
    ///
    /// Returns `Ok(None)` when the record is excluded by the
    /// digital-medium filter. A record without a 001 control field is a
    /// hard error: every downstream consumer requires the identifier.
    pub fn translate(&self, record: &MarcRecord) -> Result<Option<ReadableRecord>> {
        // MARC21 field mappings
        // 001    - Identifier (control)
        // 008    - Fixed-length data: medium at 23, language at 35-37
        // 245$a/b/n/p - Title, subtitle, part number, part name
        // 250$a  - Edition
        // 100$a  - Main author
        // 260$a/b/c - Place, publisher, date of publication
        // 020$a/q - ISBN and qualifier
        // 490$a/v - Series title and number
        // 300$a/c - Pagination, dimensions
        // 041$h  - Original language
        // 655$a  - Genre
        // 700$a/e/4 - Contributor name and role

        let identifier = record
            .get_control_field("001")
            .ok_or(Error::MissingIdentifier)?;

        if self.config.skip_digital && is_digital_medium(record) {
            tracing::debug!(identifier, "skipping digital-medium record");
            return Ok(None);
        }

        let mut result = ReadableRecord::new(identifier);

        // Title block
        if let Some(title_field) = record.get_field("245") {
            result.title = clean_subfield(title_field, 'a');
            result.subtitle = clean_subfield(title_field, 'b');
            result.part_number = clean_subfields(title_field, 'n').join(", ");
            result.part_name = clean_subfields(title_field, 'p').join(", ");
        }

        if let Some(edition_field) = record.get_field("250") {
            result.edition = clean_subfield(edition_field, 'a');
        }

        // Main author from 100
        if let Some(author_field) = record.get_field("100") {
            let author = reorder_name(&clean_subfield(author_field, 'a'));
            if !author.is_empty() {
                result.authors.push(author);
            }
        }

        // Publication block
        if let Some(pub_field) = record.get_field("260") {
            result.publisher = clean_subfield(pub_field, 'b');
            result.year_published = extract_year(&clean_subfield(pub_field, 'c'));
            result.city_published = clean_subfield(pub_field, 'a');
        }

        if let Some(isbn_field) = record.get_field("020") {
            let qualifier = clean_subfield(isbn_field, 'q');
            if qualifier.to_lowercase().contains("pdf") {
                // PDF-edition identifier, not the physical-book ISBN
                tracing::debug!(identifier, "suppressing PDF-qualified ISBN");
            } else {
                result.isbn = clean_subfield(isbn_field, 'a');
            }
        }

        if let Some(series_field) = record.get_field("490") {
            result.series = clean_subfield(series_field, 'a');
            result.series_number = clean_subfield(series_field, 'v');
        }

        // Physical description
        if let Some(physical_field) = record.get_field("300") {
            result.num_pages = leading_number(&clean_subfield(physical_field, 'a'));
            result.dimensions = clean_subfield(physical_field, 'c');
        }

        // Language from 008 positions 35-37
        if let Some(f008) = record.get_control_field("008") {
            match f008.get(35..38) {
                Some(code) => result.language = code.to_string(),
                None => tracing::warn!(identifier, "008 field too short for language code"),
            }
        }

        if let Some(lang_field) = record.get_field("041") {
            result.original_language = clean_subfield(lang_field, 'h');
        }

        // Genres
        for field in record.get_fields("655") {
            for genre in clean_subfields(field, 'a') {
                result.genres.push(genre);
            }
        }

        // Contributors with roles
        for field in record.get_fields("700") {
            let name = reorder_name(&clean_subfield(field, 'a'));
            let role = contributor_role(field);
            if name.is_empty() || role.is_empty() {
                continue;
            }
            match role.as_str() {
                "autor" => {
                    if !result.authors.contains(&name) {
                        result.authors.push(name);
                    }
                }
                "toimetaja" => result.editors.push(name),
                "väljaandja" => result.publishers.push(name),
                "koostaja" => result.compilers.push(name),
                "illustreerija" => result.illustrators.push(name),
                "tõlkija" => result.translators.push(name),
                "kujundaja" => result.designers.push(name),
                "fotograaf" => result.photographers.push(name),
                _ => {}
            }
        }

        Ok(Some(result))
    }
}

/// Convenience wrapper: parse a MARCXML document and map every record
pub fn marcxml_to_readable<R: std::io::BufRead>(
    reader: R,
    config: &MapperConfig,
) -> Result<Vec<ReadableRecord>> {
    let records = super::parser::parse_marcxml(reader)?;
    MarcTranslator::new(config.clone()).translate_all(&records)
}

/// Whether the 008 field marks the record as a digital/electronic resource
///
/// Form-of-item at position 23: `q` (direct electronic) and `s`
/// (electronic) denote non-physical carriers.
fn is_digital_medium(record: &MarcRecord) -> bool {
    record
        .get_control_field("008")
        .and_then(|cf| cf.chars().nth(23))
        .map(|c| c == 'q' || c == 's')
        .unwrap_or(false)
}

/// Contributor role from 700$e, falling back to the 700$4 code
fn contributor_role(field: &DataField) -> String {
    let role = clean_subfield(field, 'e');
    let role = if role.is_empty() {
        clean_subfield(field, '4')
    } else {
        role
    };
    role.to_lowercase()
}

/// Clean the first occurrence of a subfield, empty string when absent
fn clean_subfield(field: &DataField, code: char) -> String {
    field
        .get_subfield(code)
        .map(clean_value)
        .unwrap_or_default()
}

/// Clean every occurrence of a repeatable subfield, skipping empty results
fn clean_subfields(field: &DataField, code: char) -> Vec<String> {
    field
        .get_all_subfields(code)
        .into_iter()
        .map(clean_value)
        .filter(|v| !v.is_empty())
        .collect()
}

/// Normalize a subfield value
///
/// Unwraps bracketed cataloger annotations (`[Tallinn]` becomes
/// `Tallinn`), collapses whitespace runs and strips surrounding
/// punctuation. Idempotent.
fn clean_value(value: &str) -> String {
    let unbracketed = BRACKETED_RE.replace_all(value.trim(), "$1");
    let collapsed = WHITESPACE_RE.replace_all(&unbracketed, " ");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || ";:,./[]".contains(c))
        .to_string()
}

/// Reorder "Surname, Given" into "Given Surname"
///
/// Names without exactly one ", " separator are returned unchanged.
fn reorder_name(name: &str) -> String {
    let parts: Vec<&str> = name.split(", ").collect();
    if parts.len() == 2 {
        format!("{} {}", parts[1], parts[0])
    } else {
        name.to_string()
    }
}

/// First 4-digit run anywhere in a publication date string
fn extract_year(value: &str) -> Option<u16> {
    YEAR_RE.find(value).and_then(|m| m.as_str().parse().ok())
}

/// Leading digit run parsed as a number (e.g. "245 lk." -> 245)
fn leading_number(value: &str) -> Option<u32> {
    LEADING_NUMBER_RE
        .find(value)
        .and_then(|m| m.as_str().parse().ok())
}
