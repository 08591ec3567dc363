//! MARCXML record parser
//!
//! Parses a MARCXML document into a structured representation.

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::reader::Reader;

use crate::error::Result;

/// A MARC record containing leader and fields
#[derive(Debug, Clone, Default)]
pub struct MarcRecord {
    /// The 24-character record leader, when present
    pub leader: String,
    /// Control fields (00X), fixed-width positional strings
    pub control_fields: HashMap<String, String>,
    /// Data fields with indicators and subfields, in document order
    pub data_fields: Vec<DataField>,
}

/// A MARC data field (010-999)
#[derive(Debug, Clone)]
pub struct DataField {
    /// Field tag (3 characters)
    pub tag: String,
    /// First indicator
    pub ind1: char,
    /// Second indicator
    pub ind2: char,
    /// Subfields in document order
    pub subfields: Vec<Subfield>,
}

/// A MARC subfield
#[derive(Debug, Clone)]
pub struct Subfield {
    /// Subfield code (single character)
    pub code: char,
    /// Subfield data
    pub data: String,
}

impl MarcRecord {
    /// Get the first data field with a specific tag
    pub fn get_field(&self, tag: &str) -> Option<&DataField> {
        self.data_fields.iter().find(|f| f.tag == tag)
    }

    /// Get all data fields with a specific tag
    pub fn get_fields(&self, tag: &str) -> Vec<&DataField> {
        self.data_fields.iter().filter(|f| f.tag == tag).collect()
    }

    /// Get a subfield value from the first field with the given tag
    pub fn get_subfield(&self, tag: &str, code: char) -> Option<&str> {
        self.get_field(tag).and_then(|f| f.get_subfield(code))
    }

    /// Get a control field value
    pub fn get_control_field(&self, tag: &str) -> Option<&str> {
        self.control_fields.get(tag).map(String::as_str)
    }
}

impl DataField {
    /// Get the first subfield value for a code
    pub fn get_subfield(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|sf| sf.code == code)
            .map(|sf| sf.data.as_str())
    }

    /// Get all subfield values for a code
    pub fn get_all_subfields(&self, code: char) -> Vec<&str> {
        self.subfields
            .iter()
            .filter(|sf| sf.code == code)
            .map(|sf| sf.data.as_str())
            .collect()
    }
}

/// Element whose text content is being collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    None,
    Leader,
    ControlField,
    Subfield,
}

/// Parse a MARCXML document into a list of records
///
/// Accepts both plain and `marc:`-prefixed element names; any element
/// outside the MARCXML vocabulary is ignored. Malformed XML propagates
/// as a hard error.
pub fn parse_marcxml<R: BufRead>(reader: R) -> Result<Vec<MarcRecord>> {
    let mut xml = Reader::from_reader(reader);
    let mut buf = Vec::new();

    let mut records = Vec::new();
    let mut record: Option<MarcRecord> = None;
    let mut field: Option<DataField> = None;
    let mut control_tag = String::new();
    let mut subfield_code = ' ';
    let mut text = String::new();
    let mut target = TextTarget::None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(e) => match local_name(e.name()) {
                b"record" => record = Some(MarcRecord::default()),
                b"leader" => {
                    text.clear();
                    target = TextTarget::Leader;
                }
                b"controlfield" => {
                    control_tag = attribute(&e, b"tag").unwrap_or_default();
                    text.clear();
                    target = TextTarget::ControlField;
                }
                b"datafield" => {
                    field = Some(DataField {
                        tag: attribute(&e, b"tag").unwrap_or_default(),
                        ind1: attribute_char(&e, b"ind1"),
                        ind2: attribute_char(&e, b"ind2"),
                        subfields: Vec::new(),
                    });
                }
                b"subfield" => {
                    subfield_code = attribute(&e, b"code")
                        .and_then(|c| c.chars().next())
                        .unwrap_or(' ');
                    text.clear();
                    target = TextTarget::Subfield;
                }
                _ => {}
            },
            Event::Text(e) => {
                if target != TextTarget::None {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::End(e) => match local_name(e.name()) {
                b"record" => {
                    if let Some(r) = record.take() {
                        records.push(r);
                    }
                }
                b"leader" => {
                    if let Some(r) = record.as_mut() {
                        r.leader = text.clone();
                    }
                    target = TextTarget::None;
                }
                b"controlfield" => {
                    if let Some(r) = record.as_mut() {
                        r.control_fields
                            .insert(std::mem::take(&mut control_tag), text.clone());
                    }
                    target = TextTarget::None;
                }
                b"datafield" => {
                    if let (Some(r), Some(f)) = (record.as_mut(), field.take()) {
                        r.data_fields.push(f);
                    }
                }
                b"subfield" => {
                    if let Some(f) = field.as_mut() {
                        f.subfields.push(Subfield {
                            code: subfield_code,
                            data: text.clone(),
                        });
                    }
                    target = TextTarget::None;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    tracing::debug!("parsed {} MARCXML record(s)", records.len());
    Ok(records)
}

/// Parse a MARCXML document held in a string
pub fn parse_marcxml_str(xml: &str) -> Result<Vec<MarcRecord>> {
    parse_marcxml(xml.as_bytes())
}

/// Element name with any namespace prefix stripped
fn local_name(name: QName<'_>) -> &[u8] {
    let bytes = name.into_inner();
    match bytes.iter().rposition(|&b| b == b':') {
        Some(pos) => &bytes[pos + 1..],
        None => bytes,
    }
}

/// Get an attribute value by name
fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// Get a one-character attribute value, defaulting to a blank indicator
fn attribute_char(e: &BytesStart<'_>, name: &[u8]) -> char {
    attribute(e, name)
        .and_then(|v| v.chars().next())
        .unwrap_or(' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<collection xmlns="http://www.loc.gov/MARC21/slim">
  <record>
    <leader>00714cam a2200205 a 4500</leader>
    <controlfield tag="001">b10858854</controlfield>
    <controlfield tag="008">040516s1987    er            000 0 est d</controlfield>
    <datafield tag="245" ind1="1" ind2="0">
      <subfield code="a">Eesti keele grammatika :</subfield>
      <subfield code="b">teooria ja harjutused</subfield>
    </datafield>
    <datafield tag="700" ind1="1" ind2=" ">
      <subfield code="a">Tamm, Jaan</subfield>
      <subfield code="e">toimetaja</subfield>
    </datafield>
    <datafield tag="700" ind1="1" ind2=" ">
      <subfield code="a">Kask, Mari</subfield>
      <subfield code="e">koostaja</subfield>
    </datafield>
  </record>
</collection>"#;

    #[test]
    fn test_parse_record() {
        let records = parse_marcxml_str(SAMPLE).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.leader, "00714cam a2200205 a 4500");
        assert_eq!(record.get_control_field("001"), Some("b10858854"));
        assert_eq!(
            record.get_subfield("245", 'a'),
            Some("Eesti keele grammatika :")
        );
        assert_eq!(
            record.get_subfield("245", 'b'),
            Some("teooria ja harjutused")
        );
    }

    #[test]
    fn test_repeated_fields_keep_order() {
        let records = parse_marcxml_str(SAMPLE).unwrap();
        let fields = records[0].get_fields("700");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].get_subfield('a'), Some("Tamm, Jaan"));
        assert_eq!(fields[1].get_subfield('a'), Some("Kask, Mari"));
    }

    #[test]
    fn test_indicators() {
        let records = parse_marcxml_str(SAMPLE).unwrap();
        let title = records[0].get_field("245").unwrap();
        assert_eq!(title.ind1, '1');
        assert_eq!(title.ind2, '0');
    }

    #[test]
    fn test_namespace_prefix() {
        let xml = r#"<marc:collection xmlns:marc="http://www.loc.gov/MARC21/slim">
          <marc:record>
            <marc:controlfield tag="001">x1</marc:controlfield>
            <marc:datafield tag="245" ind1=" " ind2=" ">
              <marc:subfield code="a">Title</marc:subfield>
            </marc:datafield>
          </marc:record>
        </marc:collection>"#;
        let records = parse_marcxml_str(xml).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get_control_field("001"), Some("x1"));
        assert_eq!(records[0].get_subfield("245", 'a'), Some("Title"));
    }

    #[test]
    fn test_control_field_keeps_spacing() {
        let records = parse_marcxml_str(SAMPLE).unwrap();
        let f008 = records[0].get_control_field("008").unwrap();
        assert_eq!(&f008[35..38], "est");
    }

    #[test]
    fn test_empty_document() {
        let records = parse_marcxml_str(
            r#"<collection xmlns="http://www.loc.gov/MARC21/slim"></collection>"#,
        )
        .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(parse_marcxml_str("<collection><record></collection>").is_err());
    }
}
