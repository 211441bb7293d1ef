//! Load and save configuration.

use crate::permissions::{PermissionFactory, StandardPermissions};
use std::env;

/// Environment override for [`SaveOptions::from_env`]: `legacy` or `symmetric`.
pub const ENV_SAVE_STYLE: &str = "PLUGIN_DESCRIPTOR_SAVE_STYLE";

/// Controls how a descriptor document is turned into a record.
#[derive(Clone, Copy)]
pub struct LoadOptions<'a> {
    /// Builds the permission set out of the `permissions` mapping.
    pub permission_factory: &'a dyn PermissionFactory,
}

impl<'a> Default for LoadOptions<'a> {
    fn default() -> Self {
        Self {
            permission_factory: &StandardPermissions,
        }
    }
}

impl<'a> LoadOptions<'a> {
    pub fn with_permission_factory(factory: &'a dyn PermissionFactory) -> Self {
        Self {
            permission_factory: factory,
        }
    }
}

/// Which keys the save path writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SaveStyle {
    /// Commands under the singular `command` key; permissions are dropped.
    /// This is what existing hosts expect.
    #[default]
    Legacy,
    /// Commands under `commands` and permissions included, so the output
    /// parses back into an equal record.
    Symmetric,
}

impl SaveStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveStyle::Legacy => "legacy",
            SaveStyle::Symmetric => "symmetric",
        }
    }
}

impl TryFrom<&str> for SaveStyle {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "legacy" => Ok(SaveStyle::Legacy),
            "symmetric" => Ok(SaveStyle::Symmetric),
            other => Err(format!(
                "unknown save style '{other}', expected legacy or symmetric"
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SaveOptions {
    pub style: SaveStyle,
}

impl SaveOptions {
    pub fn symmetric() -> Self {
        Self {
            style: SaveStyle::Symmetric,
        }
    }

    /// Default options, with the style taken from `PLUGIN_DESCRIPTOR_SAVE_STYLE`
    /// when it is set to a recognised value.
    pub fn from_env() -> Self {
        let style = match env::var(ENV_SAVE_STYLE) {
            Ok(raw) if !raw.trim().is_empty() => match SaveStyle::try_from(raw.as_str()) {
                Ok(style) => style,
                Err(message) => {
                    tracing::warn!("ignoring {ENV_SAVE_STYLE}: {message}");
                    SaveStyle::default()
                }
            },
            _ => SaveStyle::default(),
        };
        Self { style }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_style_parses_known_names() {
        assert_eq!(SaveStyle::try_from("legacy"), Ok(SaveStyle::Legacy));
        assert_eq!(SaveStyle::try_from(" symmetric "), Ok(SaveStyle::Symmetric));
        assert!(SaveStyle::try_from("both").is_err());
    }

    #[test]
    fn defaults_are_legacy() {
        assert_eq!(SaveOptions::default().style, SaveStyle::Legacy);
        assert_eq!(SaveStyle::default().as_str(), "legacy");
    }
}
