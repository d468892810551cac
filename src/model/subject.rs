//! Subjects: the principals that can be members of groups.

use crate::error::{GrouperError, GrouperResult};
use crate::model::wire::{ToJson, first_str, put_opt};
use serde_json::{Map, Value};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Source id under which the service exposes groups as subjects.
pub const GROUP_SUBJECT_SOURCE: &str = "g:gsa";

/// A principal known to the service: a person, a service account, or a group.
///
/// A subject is identified by its opaque `id` or, when the id is not known, by
/// its alternate `identifier` (for example a login name). At least one of the two
/// is always present.
///
/// Equality and hashing use the id when both sides have one, the identifier when
/// neither has an id, and a subject with an id never equals one without. The
/// `source` does not take part, so a subject built from an id alone matches the
/// fully-described subject the service returns for that id.
#[derive(Debug, Clone)]
pub struct Subject {
    id: Option<String>,
    identifier: Option<String>,
    source: Option<String>,
    name: Option<String>,
}

#[derive(Hash, PartialEq, Eq)]
enum SubjectKey<'a> {
    Id(&'a str),
    Identifier(&'a str),
}

impl Subject {
    /// Create a subject. Empty strings count as absent.
    ///
    /// # Errors
    ///
    /// Returns a precondition error when neither an id nor an identifier is given.
    pub fn new(
        id: Option<String>,
        identifier: Option<String>,
        source: Option<String>,
        name: Option<String>,
    ) -> GrouperResult<Self> {
        let id = id.filter(|s| !s.is_empty());
        let identifier = identifier.filter(|s| !s.is_empty());
        if id.is_none() && identifier.is_none() {
            return Err(GrouperError::precondition(
                "one of subject id and identifier must be provided",
            ));
        }
        Ok(Self {
            id,
            identifier,
            source: source.filter(|s| !s.is_empty()),
            name: name.filter(|s| !s.is_empty()),
        })
    }

    /// A subject known by its id.
    ///
    /// # Errors
    ///
    /// Returns a precondition error for an empty id.
    pub fn from_id(id: impl Into<String>) -> GrouperResult<Self> {
        Self::new(Some(id.into()), None, None, None)
    }

    /// A subject known by its alternate identifier.
    ///
    /// # Errors
    ///
    /// Returns a precondition error for an empty identifier.
    pub fn from_identifier(identifier: impl Into<String>) -> GrouperResult<Self> {
        Self::new(None, Some(identifier.into()), None, None)
    }

    /// The subject a group appears as when it is a member of another group.
    pub(crate) fn group_subject(uuid: Option<&str>, name: Option<&str>) -> Self {
        Self {
            id: uuid.map(str::to_string),
            identifier: name.map(str::to_string),
            source: Some(GROUP_SUBJECT_SOURCE.to_string()),
            name: None,
        }
    }

    /// Set the source the subject comes from.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into()).filter(|s| !s.is_empty());
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into()).filter(|s| !s.is_empty());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True when this subject is a group seen as a member.
    pub fn is_group(&self) -> bool {
        self.source.as_deref() == Some(GROUP_SUBJECT_SOURCE)
    }

    /// Minimal representation identifying the subject in a request.
    pub fn to_lookup_json(&self) -> Value {
        let mut map = Map::new();
        match (&self.id, &self.identifier) {
            (Some(id), _) => put_opt(&mut map, "subjectId", Some(id.as_str())),
            (None, identifier) => put_opt(&mut map, "subjectIdentifier", identifier.as_deref()),
        }
        put_opt(&mut map, "subjectSourceId", self.source.as_deref());
        Value::Object(map)
    }

    /// Parse either the full form or the lookup form.
    ///
    /// # Errors
    ///
    /// Returns a protocol error when the JSON carries neither an id nor an identifier.
    pub fn from_json(value: &Value) -> GrouperResult<Self> {
        let id = first_str(value, &["id", "subjectId"]).filter(|id| !is_absent_marker(id));
        let identifier = first_str(value, &["identifierLookup", "subjectIdentifier"]);
        Self::new(
            id,
            identifier,
            first_str(value, &["sourceId", "subjectSourceId"]),
            first_str(value, &["name"]),
        )
        .map_err(|_| GrouperError::protocol(format!("subject without id or identifier: {value}")))
    }

    /// Composite `(source, id, identifier)` key telling subjects of different sources apart.
    pub(crate) fn source_key(&self) -> (Option<&str>, Option<&str>, Option<&str>) {
        (
            self.source.as_deref(),
            self.id.as_deref(),
            self.identifier.as_deref(),
        )
    }

    fn key(&self) -> SubjectKey<'_> {
        match (&self.id, &self.identifier) {
            (Some(id), _) => SubjectKey::Id(id),
            (None, Some(identifier)) => SubjectKey::Identifier(identifier),
            // Construction guarantees one of the two.
            (None, None) => SubjectKey::Id(""),
        }
    }
}

/// True when the service echoed a missing subject id.
pub(crate) fn is_absent_marker(id: &str) -> bool {
    id == "null"
}

impl ToJson for Subject {
    /// The service's subject shape: `id` plus whatever else is known.
    fn to_json(&self) -> Value {
        let mut map = Map::new();
        put_opt(&mut map, "id", self.id.as_deref());
        put_opt(&mut map, "identifierLookup", self.identifier.as_deref());
        put_opt(&mut map, "sourceId", self.source.as_deref());
        put_opt(&mut map, "name", self.name.as_deref());
        Value::Object(map)
    }
}

impl PartialEq for Subject {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Subject {}

impl Hash for Subject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.id.as_deref().or(self.identifier.as_deref()).unwrap_or("?");
        match (&self.source, &self.name) {
            (Some(source), Some(name)) => write!(f, "{source}:{key} ({name})"),
            (Some(source), None) => write!(f, "{source}:{key}"),
            (None, Some(name)) => write!(f, "{key} ({name})"),
            (None, None) => f.write_str(key),
        }
    }
}
