//! Permission declarations carried by a descriptor.
//!
//! The descriptor only hands the raw `permissions` mapping to a
//! [`PermissionFactory`]; what a valid permission node looks like is the
//! factory's business. [`StandardPermissions`] understands the conventional
//! layout:
//!
//! ```yaml
//! permissions:
//!   example.use:
//!     description: Allows use
//!     default: op
//!     children:
//!       example.use.basic: true
//! ```

use crate::document::{Document, kind_name};
use crate::error::PermissionError;
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Builds a [`PermissionSet`] out of a `permissions` sub-document.
pub trait PermissionFactory {
    fn construct(&self, permissions: &Document) -> Result<PermissionSet, PermissionError>;
}

impl<F> PermissionFactory for F
where
    F: Fn(&Document) -> Result<PermissionSet, PermissionError>,
{
    fn construct(&self, permissions: &Document) -> Result<PermissionSet, PermissionError> {
        self(permissions)
    }
}

/// Who holds a permission when nothing grants or revokes it explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PermissionDefault {
    True,
    False,
    #[default]
    Op,
    NotOp,
}

impl PermissionDefault {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionDefault::True => "true",
            PermissionDefault::False => "false",
            PermissionDefault::Op => "op",
            PermissionDefault::NotOp => "not op",
        }
    }
}

impl TryFrom<&str> for PermissionDefault {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(PermissionDefault::True),
            "false" => Ok(PermissionDefault::False),
            "op" | "isop" | "operator" | "isoperator" | "admin" | "isadmin" => {
                Ok(PermissionDefault::Op)
            }
            "not op" | "!op" | "notop" | "!operator" | "notoperator" | "!admin" | "notadmin" => {
                Ok(PermissionDefault::NotOp)
            }
            other => Err(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permission {
    pub name: String,
    pub description: Option<String>,
    pub default: PermissionDefault,
    pub children: BTreeMap<String, bool>,
}

impl Permission {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            default: PermissionDefault::default(),
            children: BTreeMap::new(),
        }
    }

    fn to_value(&self) -> Value {
        let mut node = Document::new();
        if let Some(description) = &self.description {
            node.insert("description".to_string(), json!(description));
        }
        node.insert("default".to_string(), json!(self.default.as_str()));
        if !self.children.is_empty() {
            node.insert("children".to_string(), json!(self.children));
        }
        Value::Object(node)
    }
}

/// Permission nodes declared by one component, keyed by node name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionSet {
    nodes: BTreeMap<String, Permission>,
}

impl PermissionSet {
    pub fn new(nodes: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            nodes: nodes
                .into_iter()
                .map(|node| (node.name.clone(), node))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Permission> {
        self.nodes.get(name)
    }

    /// Iterates permissions in stable (name) order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Renders the set back into the layout [`StandardPermissions`] reads.
    pub fn to_document(&self) -> Document {
        self.nodes
            .iter()
            .map(|(name, node)| (name.clone(), node.to_value()))
            .collect()
    }
}

/// Default factory for the conventional permission node layout.
///
/// Unknown keys inside a node are ignored; a node declared with no body
/// (`example.use:`) gets the defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardPermissions;

impl PermissionFactory for StandardPermissions {
    fn construct(&self, permissions: &Document) -> Result<PermissionSet, PermissionError> {
        let mut nodes = Vec::with_capacity(permissions.len());
        for (name, body) in permissions {
            nodes.push(parse_node(name, body)?);
        }
        Ok(PermissionSet::new(nodes))
    }
}

fn parse_node(name: &str, body: &Value) -> Result<Permission, PermissionError> {
    let mut permission = Permission::named(name);
    let body = match body {
        Value::Null => return Ok(permission),
        Value::Object(map) => map,
        _ => {
            return Err(PermissionError::NodeNotMapping {
                node: name.to_string(),
            });
        }
    };

    permission.description = match body.get("description") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            return Err(PermissionError::Description {
                node: name.to_string(),
            });
        }
    };

    permission.default = match body.get("default") {
        None | Some(Value::Null) => PermissionDefault::default(),
        Some(Value::Bool(true)) => PermissionDefault::True,
        Some(Value::Bool(false)) => PermissionDefault::False,
        Some(Value::String(raw)) => {
            PermissionDefault::try_from(raw.as_str()).map_err(|value| PermissionError::Default {
                node: name.to_string(),
                value,
            })?
        }
        Some(other) => {
            return Err(PermissionError::Default {
                node: name.to_string(),
                value: kind_name(other).to_string(),
            });
        }
    };

    permission.children = match body.get("children") {
        None | Some(Value::Null) => BTreeMap::new(),
        Some(Value::Object(children)) => children
            .iter()
            .map(|(child, grant)| match grant {
                Value::Bool(grant) => Ok((child.clone(), *grant)),
                _ => Err(PermissionError::Children {
                    node: name.to_string(),
                }),
            })
            .collect::<Result<_, _>>()?,
        Some(_) => {
            return Err(PermissionError::Children {
                node: name.to_string(),
            });
        }
    };

    Ok(permission)
}
