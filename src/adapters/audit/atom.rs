//! Atom response parsing for the audit API.
//!
//! Responses are Atom entries carrying `<apps:property name='...'
//! value='...'/>` elements. We only ever need the name/value pairs, flat for
//! single-entry responses and grouped per `<entry>` for list responses.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Collect every `apps:property` name/value pair of the document. For a
/// repeated name the first occurrence wins.
pub fn properties(xml: &str) -> HashMap<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut props = HashMap::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if is_property(&e) => {
                if let Some((name, value)) = property_attrs(&e) {
                    props.entry(name).or_insert(value);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    props
}

/// Collect the property pairs of each `<entry>` element, in document order.
pub fn entries(xml: &str) -> Vec<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut all = Vec::new();
    let mut current: Option<HashMap<String, String>> = None;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"entry" => {
                current = Some(HashMap::new());
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"entry" => {
                if let Some(props) = current.take() {
                    all.push(props);
                }
            }
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if is_property(&e) => {
                if let Some(props) = current.as_mut() {
                    if let Some((name, value)) = property_attrs(&e) {
                        props.entry(name).or_insert(value);
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    all
}

fn is_property(element: &BytesStart<'_>) -> bool {
    element.local_name().as_ref() == b"property"
}

fn property_attrs(element: &BytesStart<'_>) -> Option<(String, String)> {
    let mut name = None;
    let mut value = None;
    for attr in element.attributes().flatten() {
        match attr.key.as_ref() {
            b"name" => name = attr.unescape_value().ok().map(|v| v.into_owned()),
            b"value" => value = attr.unescape_value().ok().map(|v| v.into_owned()),
            _ => {}
        }
    }
    Some((name?, value?))
}
