//! Nested markup: `<person>` elements directly under the document root.
//!
//! ```text
//! <data>
//!   <person>
//!     <name>Ada</name>
//!     <height>65</height>
//!   </person>
//! </data>
//! ```
//!
//! Each `person` becomes one record built from its immediate children, the
//! child tag naming the column and the child's own text giving the value.
//! Deeper elements and attributes are not read.

use crate::constants::XML_RECORD_ELEMENT;
use crate::error::{EtlError, Result};
use crate::models::SourceFormat;
use crate::records::RecordSet;
use quick_xml::events::{BytesRef, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Depth of the record elements (the root sits at depth 0)
const RECORD_DEPTH: usize = 1;
/// Depth of the field elements inside a record
const FIELD_DEPTH: usize = 2;

/// Child element of a record being read
#[derive(Debug)]
struct OpenField {
    name: String,
    text: Option<String>,
    /// Set once a nested element starts; later text is its tail, not ours
    frozen: bool,
}

impl OpenField {
    fn new(name: String) -> Self {
        Self {
            name,
            text: None,
            frozen: false,
        }
    }

    fn append(&mut self, piece: &str) {
        if !self.frozen {
            self.text.get_or_insert_with(String::new).push_str(piece);
        }
    }
}

/// Read an XML file into one record per `person` element.
///
/// A well-formed document without `person` elements yields an empty
/// record set; the caller decides how to report it.
pub fn read_xml(path: &Path) -> Result<RecordSet> {
    let content = fs::read_to_string(path)?;
    let records = parse_people(&content)
        .map_err(|reason| EtlError::parse_failed(path, SourceFormat::Xml, reason))?;

    debug!(
        "Read {} {} elements from {}",
        records.len(),
        XML_RECORD_ELEMENT,
        path.display()
    );

    Ok(records)
}

/// Parse document text; errors are returned as a human readable reason
pub fn parse_people(xml: &str) -> std::result::Result<RecordSet, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut records = RecordSet::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut root_closed = false;
    let mut person: Option<Vec<(String, Option<String>)>> = None;
    let mut field: Option<OpenField> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let is_record = e.name().as_ref() == XML_RECORD_ELEMENT.as_bytes();
                match depth {
                    0 => {
                        if root_closed {
                            return Err("junk after document element".to_string());
                        }
                        seen_root = true;
                    }
                    RECORD_DEPTH if is_record => person = Some(Vec::new()),
                    FIELD_DEPTH if person.is_some() => {
                        field = Some(OpenField::new(tag_name(e.name().as_ref())));
                    }
                    _ => {
                        if let Some(open) = field.as_mut() {
                            open.frozen = true;
                        }
                    }
                }
                depth += 1;
            }
            Ok(Event::Empty(ref e)) => {
                let is_record = e.name().as_ref() == XML_RECORD_ELEMENT.as_bytes();
                match depth {
                    0 => {
                        if root_closed {
                            return Err("junk after document element".to_string());
                        }
                        seen_root = true;
                        root_closed = true;
                    }
                    RECORD_DEPTH if is_record => {
                        records.push(Vec::<(String, Option<String>)>::new());
                    }
                    FIELD_DEPTH => {
                        if let Some(fields) = person.as_mut() {
                            fields.push((tag_name(e.name().as_ref()), None));
                        }
                    }
                    _ => {
                        if let Some(open) = field.as_mut() {
                            open.frozen = true;
                        }
                    }
                }
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                match depth {
                    0 => root_closed = true,
                    RECORD_DEPTH => {
                        if let Some(fields) = person.take() {
                            records.push(fields);
                        }
                    }
                    FIELD_DEPTH => {
                        if let (Some(open), Some(fields)) = (field.take(), person.as_mut()) {
                            fields.push((open.name, open.text));
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) => {
                if depth == FIELD_DEPTH + 1 {
                    if let Some(open) = field.as_mut() {
                        open.append(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
            }
            Ok(Event::CData(ref e)) => {
                if depth == FIELD_DEPTH + 1 {
                    if let Some(open) = field.as_mut() {
                        open.append(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
            }
            Ok(Event::GeneralRef(ref e)) => {
                if depth == FIELD_DEPTH + 1 {
                    if let Some(open) = field.as_mut() {
                        open.append(&resolve_reference(e)?);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "at byte {}: {}",
                    reader.error_position(),
                    e
                ));
            }
            _ => {}
        }
    }

    if !seen_root {
        return Err("no element found".to_string());
    }
    if depth != 0 {
        return Err("unexpected end of document: unclosed element".to_string());
    }

    Ok(records)
}

fn tag_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Resolve a character reference (`&#N;`, `&#xN;`) or a predefined entity
fn resolve_reference(reference: &BytesRef) -> std::result::Result<String, String> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|e| format!("invalid character reference: {}", e))?
    {
        return Ok(ch.to_string());
    }

    let name = reference.decode().map_err(|e| e.to_string())?;
    quick_xml::escape::resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| format!("undefined entity &{};", name))
}
