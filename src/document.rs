//! Loosely typed descriptor documents.
//!
//! A document is the ordered string-keyed mapping a YAML or JSON decoder
//! produces before any validation happens. Values are `serde_json::Value`,
//! the tagged string/number/boolean/null/sequence/mapping variant, so every
//! field can be type-checked explicitly instead of coerced implicitly.

use crate::error::{InvalidDescriptor, SaveError};
use serde_json::{Map, Value};
use std::io::{Read, Write};

/// Ordered mapping from document keys to loosely typed values.
pub type Document = Map<String, Value>;

/// Decode a YAML (or JSON, which YAML accepts) stream into a document.
pub fn decode_reader<R: Read>(mut reader: R) -> Result<Document, InvalidDescriptor> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(InvalidDescriptor::malformed)?;
    decode_yaml_str(&text)
}

/// An empty stream decodes to an empty document, like an explicit `~`.
pub fn decode_yaml_str(text: &str) -> Result<Document, InvalidDescriptor> {
    if text.trim().is_empty() {
        return Ok(Document::new());
    }
    let value: Value = serde_yaml::from_str(text).map_err(InvalidDescriptor::malformed)?;
    into_document(value)
}

pub fn decode_json_str(text: &str) -> Result<Document, InvalidDescriptor> {
    let value: Value = serde_json::from_str(text).map_err(InvalidDescriptor::malformed)?;
    into_document(value)
}

pub fn encode_yaml<W: Write>(document: &Document, writer: W) -> Result<(), SaveError> {
    serde_yaml::to_writer(writer, document)?;
    Ok(())
}

pub fn encode_json<W: Write>(document: &Document, mut writer: W) -> Result<(), SaveError> {
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.write_all(b"\n")?;
    Ok(())
}

fn into_document(value: Value) -> Result<Document, InvalidDescriptor> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Document::new()),
        other => Err(InvalidDescriptor::malformed(format!(
            "expected a mapping at the top level, found {}",
            kind_name(&other)
        ))),
    }
}

/// The string a scalar naturally renders as; `None` for null and composites.
pub(crate) fn natural_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
