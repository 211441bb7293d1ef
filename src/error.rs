use std::fmt;
use thiserror::Error;

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Keys of the descriptor document that validation can fail on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Version,
    Main,
    Commands,
    Website,
    Description,
    Author,
    Authors,
    Permissions,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Version => "version",
            Field::Main => "main",
            Field::Commands => "commands",
            Field::Website => "website",
            Field::Description => "description",
            Field::Author => "author",
            Field::Authors => "authors",
            Field::Permissions => "permissions",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("{0} is not defined")]
    MissingField(Field),
    #[error("{0} is of wrong type")]
    WrongType(Field),
    #[error("descriptor document is malformed")]
    Malformed,
}

/// A descriptor document failed to produce a [`Descriptor`](crate::Descriptor).
///
/// Only the first failure is reported. The originating fault, when there is
/// one (a decoder error, a permission-set error), is exposed as the source.
#[derive(Error, Debug)]
#[error("{kind}")]
pub struct InvalidDescriptor {
    kind: ErrorKind,
    #[source]
    cause: Option<Cause>,
}

impl InvalidDescriptor {
    pub fn missing(field: Field) -> Self {
        Self {
            kind: ErrorKind::MissingField(field),
            cause: None,
        }
    }

    pub fn wrong_type(field: Field) -> Self {
        Self {
            kind: ErrorKind::WrongType(field),
            cause: None,
        }
    }

    pub fn malformed(cause: impl Into<Cause>) -> Self {
        Self {
            kind: ErrorKind::Malformed,
            cause: Some(cause.into()),
        }
    }

    pub(crate) fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The field the failure is tied to; `None` for undecodable documents.
    pub fn field(&self) -> Option<Field> {
        match self.kind {
            ErrorKind::MissingField(field) | ErrorKind::WrongType(field) => Some(field),
            ErrorKind::Malformed => None,
        }
    }
}

/// Failure raised while constructing a permission set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    #[error("permission '{node}' must be a mapping")]
    NodeNotMapping { node: String },
    #[error("permission '{node}' has a non-string description")]
    Description { node: String },
    #[error("permission '{node}' has unknown default '{value}'")]
    Default { node: String, value: String },
    #[error("permission '{node}' children must map names to booleans")]
    Children { node: String },
}

/// Sink-side failures while writing a descriptor out.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("encoding descriptor as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("encoding descriptor as JSON: {0}")]
    Json(#[from] serde_json::Error),
}
