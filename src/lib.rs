//! Reads `plugin.yml`-style component descriptors into validated records and
//! writes them back out.
//!
//! Loading, command dispatch and permission enforcement belong to the host;
//! this crate stops at the record.

pub mod descriptor;
pub mod document;
pub mod error;
pub mod options;
pub mod permissions;

pub use descriptor::Descriptor;
pub use document::{Document, decode_json_str, decode_reader, decode_yaml_str};
pub use error::{ErrorKind, Field, InvalidDescriptor, PermissionError, SaveError};
pub use options::{ENV_SAVE_STYLE, LoadOptions, SaveOptions, SaveStyle};
pub use permissions::{
    Permission, PermissionDefault, PermissionFactory, PermissionSet, StandardPermissions,
};
