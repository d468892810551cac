//! Stems: the folder-like namespaces groups and other stems live in.

use crate::error::{GrouperError, GrouperResult};
use crate::model::identity::Identity;
use crate::model::wire::{ToJson, first_str, opt_str, put_opt};
use serde_json::{Map, Value};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Separator between stem path segments.
pub const STEM_SEPARATOR: char = ':';

/// A namespace node, identified like a [`Group`](crate::model::Group).
#[derive(Debug, Clone)]
pub struct Stem {
    identity: Identity,
    extension: Option<String>,
    display_extension: Option<String>,
    description: Option<String>,
}

impl Stem {
    /// Create a stem from a name, a uuid, or both.
    ///
    /// # Errors
    ///
    /// Returns a precondition error when neither is given.
    pub fn new(name: Option<String>, uuid: Option<String>) -> GrouperResult<Self> {
        Ok(Self {
            identity: Identity::new(name, uuid)?,
            extension: None,
            display_extension: None,
            description: None,
        })
    }

    /// A stem known by its full name, e.g. `"org:apps"`.
    ///
    /// # Errors
    ///
    /// Returns a precondition error for an empty name.
    pub fn named(name: impl Into<String>) -> GrouperResult<Self> {
        Self::new(Some(name.into()), None)
    }

    /// A stem known by its uuid.
    ///
    /// # Errors
    ///
    /// Returns a precondition error for an empty uuid.
    pub fn with_uuid(uuid: impl Into<String>) -> GrouperResult<Self> {
        Self::new(None, Some(uuid.into()))
    }

    #[must_use]
    pub fn with_display_extension(mut self, display_extension: impl Into<String>) -> Self {
        self.display_extension = Some(display_extension.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn name(&self) -> Option<&str> {
        self.identity.name()
    }

    pub fn uuid(&self) -> Option<&str> {
        self.identity.uuid()
    }

    /// Last path segment of the name.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref().or_else(|| {
            self.name()
                .map(|name| name.rsplit(STEM_SEPARATOR).next().unwrap_or(name))
        })
    }

    pub fn display_extension(&self) -> Option<&str> {
        self.display_extension.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Number of path segments below the root, `None` when the name is unknown.
    pub fn depth(&self) -> Option<usize> {
        self.name()
            .map(|name| name.matches(STEM_SEPARATOR).count() + 1)
    }

    pub(crate) fn patch_identity(&mut self, saved: &Stem) {
        self.identity.patch(saved.name(), saved.uuid());
    }

    /// Minimal representation identifying the stem in a request.
    pub fn to_lookup_json(&self) -> Value {
        let mut map = Map::new();
        put_opt(&mut map, "stemName", self.name());
        put_opt(&mut map, "uuid", self.uuid());
        Value::Object(map)
    }

    /// Parse the full form, the lookup form, or a bare name string.
    ///
    /// # Errors
    ///
    /// Returns a protocol error when neither a name nor a uuid is present.
    pub fn from_json(value: &Value) -> GrouperResult<Self> {
        if let Some(name) = value.as_str() {
            return Self::named(name);
        }
        let identity = Identity::new(
            first_str(value, &["name", "stemName"]),
            opt_str(value, "uuid"),
        )
        .map_err(|_| GrouperError::protocol(format!("stem without name or uuid: {value}")))?;

        Ok(Self {
            identity,
            extension: opt_str(value, "extension"),
            display_extension: opt_str(value, "displayExtension"),
            description: opt_str(value, "description"),
        })
    }
}

impl ToJson for Stem {
    fn to_json(&self) -> Value {
        let mut map = Map::new();
        put_opt(&mut map, "name", self.name());
        put_opt(&mut map, "uuid", self.uuid());
        put_opt(&mut map, "extension", self.extension.as_deref());
        put_opt(&mut map, "displayExtension", self.display_extension.as_deref());
        put_opt(&mut map, "description", self.description.as_deref());
        Value::Object(map)
    }
}

impl PartialEq for Stem {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for Stem {}

impl Hash for Stem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stem {}", self.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_requires_name_or_uuid() {
        assert!(Stem::new(None, None).is_err());
        assert!(Stem::new(Some(String::new()), None).is_err());
    }

    #[test]
    fn test_round_trips() {
        let stem = Stem::new(Some("org:apps".into()), Some("s1".into()))
            .unwrap()
            .with_description("Applications");
        assert_eq!(Stem::from_json(&stem.to_json()).unwrap(), stem);
        assert_eq!(
            stem.to_lookup_json(),
            json!({"stemName": "org:apps", "uuid": "s1"})
        );
        assert_eq!(Stem::from_json(&stem.to_lookup_json()).unwrap(), stem);
    }

    #[test]
    fn test_path_helpers() {
        let stem = Stem::named("org:apps:wiki").unwrap();
        assert_eq!(stem.extension(), Some("wiki"));
        assert_eq!(stem.depth(), Some(3));
        assert_eq!(Stem::with_uuid("1").unwrap().depth(), None);
    }
}
