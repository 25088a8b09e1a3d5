//! Named top-level entries mirrored from build output to the project root.

use std::fmt;
use std::path::{Component, Path};

use crate::error::ConfigError;

/// Entries a web build conventionally leaves at the top of its output.
pub const DEFAULT_TARGET_NAMES: &[&str] = &["index.html", "assets"];

/// A named top-level entry to mirror from the source root to the
/// destination root.
///
/// A target is a single path component: bare names only, no separators,
/// no `..`, never absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    name: String,
}

impl PublishTarget {
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::Invalid("target name must not be empty".into()));
        }

        let mut components = Path::new(&name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(Self { name }),
            _ => Err(ConfigError::Invalid(format!(
                "target '{}' must be a bare entry name without path separators",
                name
            ))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // Only for names known valid at compile time.
    fn known(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl fmt::Display for PublishTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The built-in target list: `index.html` and `assets`.
pub fn default_targets() -> Vec<PublishTarget> {
    DEFAULT_TARGET_NAMES
        .iter()
        .map(|name| PublishTarget::known(name))
        .collect()
}
