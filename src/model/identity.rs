//! Name-or-uuid identity shared by groups, stems and attributes.

use crate::error::{GrouperError, GrouperResult};
use std::fmt;
use std::hash::{Hash, Hasher};

/// How an entity is identified to the service.
///
/// An entity is known by its name (path such as `"org:apps:admins"`), by its
/// opaque uuid, or by both. An identity with neither cannot be constructed, so
/// every identity is equal to itself and usable as a set or map key.
///
/// Equality follows the name when one is present and the uuid otherwise: two
/// named identities compare by name alone (their uuids may differ or be unknown),
/// two unnamed identities compare by uuid, and a named identity never equals an
/// unnamed one.
#[derive(Debug, Clone)]
pub enum Identity {
    Name { name: String, uuid: Option<String> },
    Uuid(String),
}

#[derive(Hash, PartialEq, Eq)]
enum IdentityKey<'a> {
    Name(&'a str),
    Uuid(&'a str),
}

impl Identity {
    /// Build an identity from optional parts. Empty strings count as absent.
    ///
    /// # Errors
    ///
    /// Returns a precondition error when neither a name nor a uuid is given.
    pub fn new(name: Option<String>, uuid: Option<String>) -> GrouperResult<Self> {
        let name = name.filter(|n| !n.is_empty());
        let uuid = uuid.filter(|u| !u.is_empty());
        match (name, uuid) {
            (Some(name), uuid) => Ok(Self::Name { name, uuid }),
            (None, Some(uuid)) => Ok(Self::Uuid(uuid)),
            (None, None) => Err(GrouperError::precondition(
                "one of name and uuid must be provided",
            )),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name { name, .. } => Some(name),
            Self::Uuid(_) => None,
        }
    }

    pub fn uuid(&self) -> Option<&str> {
        match self {
            Self::Name { uuid, .. } => uuid.as_deref(),
            Self::Uuid(uuid) => Some(uuid),
        }
    }

    /// Replace name and uuid with the values the service returned.
    ///
    /// Values the service did not return are kept.
    pub(crate) fn patch(&mut self, name: Option<&str>, uuid: Option<&str>) {
        let name = name.or(self.name()).map(str::to_string);
        let uuid = uuid.or(self.uuid()).map(str::to_string);
        if let Ok(patched) = Self::new(name, uuid) {
            *self = patched;
        }
    }

    fn key(&self) -> IdentityKey<'_> {
        match self {
            Self::Name { name, .. } => IdentityKey::Name(name),
            Self::Uuid(uuid) => IdentityKey::Uuid(uuid),
        }
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name { name, .. } => f.write_str(name),
            Self::Uuid(uuid) => f.write_str(uuid),
        }
    }
}
