//! # Response Decoder
//!
//! Turns one buffered gateway response into a structured mapping. The wire
//! format is taken from the response's `Content-Type` header, not from
//! what was asked for: `application/xml`/`text/xml` decode as XML and
//! everything else (jsonp included, header missing included) decodes as
//! JSON, the gateway's default.

use binga_core::{BingaError, BingaResult, Format, RawResponse};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Value};
use tracing::debug;

/// One decoded gateway payload.
///
/// `NoContent` marks an empty body explicitly; it is not an error, but it
/// can never carry `orders`, so callers must check for it before reading
/// the mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The response body was empty
    NoContent,
    /// The decoded mapping
    Value(Value),
}

impl Payload {
    /// True when the body was empty
    pub fn is_no_content(&self) -> bool {
        matches!(self, Payload::NoContent)
    }

    /// The decoded mapping, unless the body was empty
    pub fn into_value(self) -> Option<Value> {
        match self {
            Payload::NoContent => None,
            Payload::Value(value) => Some(value),
        }
    }
}

/// Decode a buffered response into a [`Payload`].
///
/// `declared` is the format the request asked for; it does not drive
/// decoding, but a mismatch with what the gateway actually sent is worth
/// a log line.
pub fn decode(response: &RawResponse, declared: Format) -> BingaResult<Payload> {
    if response.body.is_empty() {
        return Ok(Payload::NoContent);
    }

    let detected = Format::from_content_type(response.content_type());
    if detected != declared && !(detected == Format::Json && declared == Format::Jsonp) {
        debug!(
            declared = declared.mime(),
            detected = detected.mime(),
            "response format differs from the requested one"
        );
    }

    match detected {
        Format::Xml => xml_to_value(&response.body).map(Payload::Value),
        Format::Json | Format::Jsonp => serde_json::from_slice(&response.body)
            .map(Payload::Value)
            .map_err(|e| decode_error(format!("invalid JSON body: {e}"), &response.body)),
    }
}

/// Structural XML-to-mapping conversion: element name becomes the key,
/// nested elements become nested mappings, repeated siblings collapse into
/// a sequence, a text-only element becomes a string. The root element's
/// own name is dropped, matching the JSON shape of the same payload.
fn xml_to_value(body: &[u8]) -> BingaResult<Value> {
    let mut reader = Reader::from_reader(body);
    let mut stack: Vec<(String, Map<String, Value>, String)> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                stack.push((name, Map::new(), String::new()));
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| decode_error(format!("invalid XML body: {e}"), body))?;
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    if let Some((_, _, buffer)) = stack.last_mut() {
                        buffer.push_str(trimmed);
                    }
                }
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.into_inner().as_ref()).to_string();
                if let Some((_, _, buffer)) = stack.last_mut() {
                    buffer.push_str(&text);
                }
            }
            Ok(Event::End(_)) => {
                if let Some((name, children, text)) = stack.pop() {
                    let value = if children.is_empty() {
                        Value::String(text)
                    } else {
                        Value::Object(children)
                    };
                    match stack.last_mut() {
                        Some((_, parent, _)) => insert_sibling(parent, name, value),
                        None => root = Some(value),
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let value = Value::String(String::new());
                match stack.last_mut() {
                    Some((_, parent, _)) => insert_sibling(parent, name, value),
                    None => root = Some(value),
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(decode_error(format!("invalid XML body: {e}"), body)),
        }
    }

    root.ok_or_else(|| decode_error("invalid XML body: no root element".to_string(), body))
}

fn insert_sibling(parent: &mut Map<String, Value>, key: String, value: Value) {
    match parent.get_mut(&key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.insert(key, value);
        }
    }
}

fn decode_error(message: String, body: &[u8]) -> BingaError {
    BingaError::Decode {
        message,
        body: String::from_utf8_lossy(body).into_owned(),
    }
}
