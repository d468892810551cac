//! Attribute definition names that can be assigned to groups, stems, memberships
//! and subjects.

use crate::error::{GrouperError, GrouperResult};
use crate::model::identity::Identity;
use crate::model::wire::{ToJson, first_str, opt_str, put_opt};
use serde_json::{Map, Value};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An assignable attribute, identified like a group or stem.
#[derive(Debug, Clone)]
pub struct Attribute {
    identity: Identity,
    display_extension: Option<String>,
    description: Option<String>,
}

impl Attribute {
    /// # Errors
    ///
    /// Returns a precondition error when neither a name nor a uuid is given.
    pub fn new(name: Option<String>, uuid: Option<String>) -> GrouperResult<Self> {
        Ok(Self {
            identity: Identity::new(name, uuid)?,
            display_extension: None,
            description: None,
        })
    }

    /// # Errors
    ///
    /// Returns a precondition error for an empty name.
    pub fn named(name: impl Into<String>) -> GrouperResult<Self> {
        Self::new(Some(name.into()), None)
    }

    pub fn name(&self) -> Option<&str> {
        self.identity.name()
    }

    pub fn uuid(&self) -> Option<&str> {
        self.identity.uuid()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Lookup form: the name when known, otherwise the uuid.
    pub fn to_lookup_json(&self) -> Value {
        let mut map = Map::new();
        match self.name() {
            Some(name) => put_opt(&mut map, "name", Some(name)),
            None => put_opt(&mut map, "uuid", self.uuid()),
        }
        Value::Object(map)
    }

    /// # Errors
    ///
    /// Returns a protocol error when neither a name nor a uuid is present.
    pub fn from_json(value: &Value) -> GrouperResult<Self> {
        let identity = Identity::new(
            first_str(value, &["name", "attributeDefNameName"]),
            first_str(value, &["uuid", "attributeDefNameId"]),
        )
        .map_err(|_| GrouperError::protocol(format!("attribute without name or uuid: {value}")))?;
        Ok(Self {
            identity,
            display_extension: opt_str(value, "displayExtension"),
            description: opt_str(value, "description"),
        })
    }
}

impl ToJson for Attribute {
    fn to_json(&self) -> Value {
        let mut map = Map::new();
        put_opt(&mut map, "name", self.name());
        put_opt(&mut map, "uuid", self.uuid());
        put_opt(&mut map, "displayExtension", self.display_extension.as_deref());
        put_opt(&mut map, "description", self.description.as_deref());
        Value::Object(map)
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for Attribute {}

impl Hash for Attribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attribute {}", self.identity)
    }
}
