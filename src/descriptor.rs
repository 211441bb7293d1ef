//! The validated descriptor record and its two conversions.
//!
//! Parsing walks the document in a fixed field order and stops at the first
//! failure, so the same bad document always reports the same field. Saving
//! writes an ordered mapping (`name`, `main`, `version`, then optional keys)
//! through whatever sink the caller owns.

use crate::document::{self, Document, natural_string};
use crate::error::{Field, InvalidDescriptor, SaveError};
use crate::options::{LoadOptions, SaveOptions, SaveStyle};
use crate::permissions::PermissionSet;
use serde_json::{Value, json};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, trace};

/// Metadata one loadable component declares about itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Descriptor {
    name: String,
    version: String,
    main: String,
    commands: Option<Value>,
    description: Option<String>,
    authors: Vec<String>,
    website: Option<String>,
    permissions: Option<PermissionSet>,
}

impl Descriptor {
    /// Build a descriptor from known-good required values; everything optional
    /// starts out absent.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        main: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            main: main.into(),
            commands: None,
            description: None,
            authors: Vec::new(),
            website: None,
            permissions: None,
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, InvalidDescriptor> {
        Self::from_reader_with(reader, &LoadOptions::default())
    }

    pub fn from_reader_with<R: Read>(
        reader: R,
        options: &LoadOptions<'_>,
    ) -> Result<Self, InvalidDescriptor> {
        Self::from_document_with(&document::decode_reader(reader)?, options)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, InvalidDescriptor> {
        Self::from_yaml_str_with(text, &LoadOptions::default())
    }

    pub fn from_yaml_str_with(
        text: &str,
        options: &LoadOptions<'_>,
    ) -> Result<Self, InvalidDescriptor> {
        Self::from_document_with(&document::decode_yaml_str(text)?, options)
    }

    pub fn from_json_str(text: &str) -> Result<Self, InvalidDescriptor> {
        Self::from_json_str_with(text, &LoadOptions::default())
    }

    pub fn from_json_str_with(
        text: &str,
        options: &LoadOptions<'_>,
    ) -> Result<Self, InvalidDescriptor> {
        Self::from_document_with(&document::decode_json_str(text)?, options)
    }

    pub fn from_document(doc: &Document) -> Result<Self, InvalidDescriptor> {
        Self::from_document_with(doc, &LoadOptions::default())
    }

    /// Validate a decoded document field by field.
    pub fn from_document_with(
        doc: &Document,
        options: &LoadOptions<'_>,
    ) -> Result<Self, InvalidDescriptor> {
        let mut descriptor = Self::new(
            required_string(doc, Field::Name)?,
            required_string(doc, Field::Version)?,
            required_string(doc, Field::Main)?,
        );

        descriptor.commands = present(doc, Field::Commands).cloned();
        descriptor.website = optional_string(doc, Field::Website)?;
        descriptor.description = optional_string(doc, Field::Description)?;

        if let Some(author) = optional_string(doc, Field::Author)? {
            descriptor.authors.push(author);
        }
        if let Some(value) = present(doc, Field::Authors) {
            let entries = value
                .as_array()
                .ok_or_else(|| InvalidDescriptor::wrong_type(Field::Authors))?;
            for entry in entries {
                let author = entry
                    .as_str()
                    .ok_or_else(|| InvalidDescriptor::wrong_type(Field::Authors))?;
                descriptor.authors.push(author.to_string());
            }
        }

        if let Some(value) = present(doc, Field::Permissions) {
            let perms = value
                .as_object()
                .ok_or_else(|| InvalidDescriptor::wrong_type(Field::Permissions))?;
            let set = options
                .permission_factory
                .construct(perms)
                .map_err(|err| InvalidDescriptor::wrong_type(Field::Permissions).with_cause(err))?;
            trace!(nodes = set.len(), "accepted permissions");
            descriptor.permissions = Some(set);
        }

        debug!(
            name = %descriptor.name,
            version = %descriptor.version,
            authors = descriptor.authors.len(),
            "parsed descriptor"
        );
        Ok(descriptor)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Identifier of the entry point, typically a qualified symbol path.
    pub fn main(&self) -> &str {
        &self.main
    }

    /// The `commands` fragment exactly as it appeared in the document.
    pub fn commands(&self) -> Option<&Value> {
        self.commands.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// `author` first (when given), then `authors` in document order.
    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    pub fn permissions(&self) -> Option<&PermissionSet> {
        self.permissions.as_ref()
    }

    /// `"<name> v<version>"`, the way hosts display a component.
    pub fn full_name(&self) -> String {
        format!("{} v{}", self.name, self.version)
    }

    pub fn to_document(&self, options: &SaveOptions) -> Document {
        let mut doc = Document::new();
        doc.insert("name".to_string(), json!(self.name));
        doc.insert("main".to_string(), json!(self.main));
        doc.insert("version".to_string(), json!(self.version));

        if let Some(commands) = &self.commands {
            let key = match options.style {
                SaveStyle::Legacy => "command",
                SaveStyle::Symmetric => "commands",
            };
            doc.insert(key.to_string(), commands.clone());
        }
        if let Some(website) = &self.website {
            doc.insert("website".to_string(), json!(website));
        }
        if let Some(description) = &self.description {
            doc.insert("description".to_string(), json!(description));
        }

        match self.authors.as_slice() {
            [] => {}
            [author] => {
                doc.insert("author".to_string(), json!(author));
            }
            authors => {
                doc.insert("authors".to_string(), json!(authors));
            }
        }

        if options.style == SaveStyle::Symmetric {
            if let Some(permissions) = &self.permissions {
                doc.insert(
                    "permissions".to_string(),
                    Value::Object(permissions.to_document()),
                );
            }
        }
        doc
    }

    /// Write the descriptor as YAML using the default (legacy) key layout.
    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        self.save_with(writer, &SaveOptions::default())
    }

    pub fn save_with<W: Write>(&self, writer: W, options: &SaveOptions) -> Result<(), SaveError> {
        debug!(name = %self.name, style = options.style.as_str(), "saving descriptor");
        document::encode_yaml(&self.to_document(options), writer)
    }

    pub fn save_json<W: Write>(&self, writer: W, options: &SaveOptions) -> Result<(), SaveError> {
        document::encode_json(&self.to_document(options), writer)
    }

    /// Replace `path` with the YAML rendering; readers never observe a
    /// half-written file.
    pub fn save_to_path(&self, path: &Path, options: &SaveOptions) -> Result<(), SaveError> {
        persist(path, |staged| self.save_with(staged, options))
    }

    /// Like [`save_to_path`](Self::save_to_path), rendered as JSON.
    pub fn save_json_to_path(&self, path: &Path, options: &SaveOptions) -> Result<(), SaveError> {
        persist(path, |staged| self.save_json(staged, options))
    }
}

/// Stage output in a sibling temporary file, then rename it over `path`.
fn persist<F>(path: &Path, write: F) -> Result<(), SaveError>
where
    F: FnOnce(&mut NamedTempFile) -> Result<(), SaveError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    write(&mut staged)?;
    staged.as_file_mut().flush()?;
    staged.persist(path).map_err(|err| SaveError::Io(err.error))?;
    debug!(path = %path.display(), "descriptor written");
    Ok(())
}

/// The value under `field`, treating an explicit null like a missing key.
fn present(doc: &Document, field: Field) -> Option<&Value> {
    doc.get(field.as_str()).filter(|value| !value.is_null())
}

fn required_string(doc: &Document, field: Field) -> Result<String, InvalidDescriptor> {
    let value = present(doc, field).ok_or_else(|| InvalidDescriptor::missing(field))?;
    let text = natural_string(value).ok_or_else(|| InvalidDescriptor::wrong_type(field))?;
    if text.is_empty() {
        return Err(InvalidDescriptor::missing(field));
    }
    Ok(text)
}

fn optional_string(doc: &Document, field: Field) -> Result<Option<String>, InvalidDescriptor> {
    match present(doc, field) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(InvalidDescriptor::wrong_type(field)),
    }
}
