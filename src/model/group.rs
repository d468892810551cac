//! Groups, including composite groups defined by set algebra over two others.

use crate::error::{GrouperError, GrouperResult};
use crate::model::enums::CompositeType;
use crate::model::identity::Identity;
use crate::model::subject::Subject;
use crate::model::wire::{ToJson, bool_to_str, first_str, opt_flag, opt_str, put_opt};
use serde_json::{Map, Value};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Operands of a composite group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composite {
    pub composite_type: CompositeType,
    pub left: Box<Group>,
    pub right: Box<Group>,
}

/// A named collection of subjects.
///
/// Identity (and therefore equality and hashing) follows [`Identity`]: by name when
/// known, otherwise by uuid. Descriptive fields do not take part.
///
/// A group with [`Composite`] operands is a composite group: its membership is
/// computed by the service from the two operand groups.
#[derive(Debug, Clone)]
pub struct Group {
    identity: Identity,
    extension: Option<String>,
    display_extension: Option<String>,
    description: Option<String>,
    composite: Option<Composite>,
}

impl Group {
    /// Create a group from a name, a uuid, or both.
    ///
    /// # Errors
    ///
    /// Returns a precondition error when neither is given.
    pub fn new(name: Option<String>, uuid: Option<String>) -> GrouperResult<Self> {
        Ok(Self::from_identity(Identity::new(name, uuid)?))
    }

    /// A group known by its full name, e.g. `"org:apps:admins"`.
    ///
    /// # Errors
    ///
    /// Returns a precondition error for an empty name.
    pub fn named(name: impl Into<String>) -> GrouperResult<Self> {
        Self::new(Some(name.into()), None)
    }

    /// A group known by its uuid.
    ///
    /// # Errors
    ///
    /// Returns a precondition error for an empty uuid.
    pub fn with_uuid(uuid: impl Into<String>) -> GrouperResult<Self> {
        Self::new(None, Some(uuid.into()))
    }

    /// A composite group over two operand groups.
    ///
    /// # Errors
    ///
    /// Returns a precondition error for an empty name.
    pub fn composite(
        name: impl Into<String>,
        composite_type: CompositeType,
        left: Group,
        right: Group,
    ) -> GrouperResult<Self> {
        let mut group = Self::named(name)?;
        group.composite = Some(Composite {
            composite_type,
            left: Box::new(left),
            right: Box::new(right),
        });
        Ok(group)
    }

    pub(crate) fn from_identity(identity: Identity) -> Self {
        Self {
            identity,
            extension: None,
            display_extension: None,
            description: None,
            composite: None,
        }
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
        self.extension
            .as_deref()
            .or_else(|| self.name().map(|name| name.rsplit(':').next().unwrap_or(name)))
    }

    pub fn display_extension(&self) -> Option<&str> {
        self.display_extension.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn composite_detail(&self) -> Option<&Composite> {
        self.composite.as_ref()
    }

    pub fn is_composite(&self) -> bool {
        self.composite.is_some()
    }

    /// The group seen as a subject, for use as a member of another group.
    pub fn as_subject(&self) -> Subject {
        Subject::group_subject(self.uuid(), self.name())
    }

    /// Replace name and uuid with those the service returned after a save.
    pub(crate) fn patch_identity(&mut self, saved: &Group) {
        self.identity.patch(saved.name(), saved.uuid());
    }

    /// Minimal representation identifying the group in a request.
    pub fn to_lookup_json(&self) -> Value {
        let mut map = Map::new();
        put_opt(&mut map, "groupName", self.name());
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
            first_str(value, &["name", "groupName"]),
            opt_str(value, "uuid"),
        )
        .map_err(|_| GrouperError::protocol(format!("group without name or uuid: {value}")))?;

        let composite = match value.get("detail") {
            Some(detail) if opt_flag(detail, "hasComposite") == Some(true) => {
                Some(Self::composite_from_json(detail)?)
            }
            _ => None,
        };

        Ok(Self {
            identity,
            extension: opt_str(value, "extension"),
            display_extension: opt_str(value, "displayExtension"),
            description: opt_str(value, "description"),
            composite,
        })
    }

    fn composite_from_json(detail: &Value) -> GrouperResult<Composite> {
        let composite_type = opt_str(detail, "compositeType")
            .and_then(|t| CompositeType::from_str(&t.to_lowercase()).ok())
            .ok_or_else(|| GrouperError::protocol(format!("composite without type: {detail}")))?;
        let operand = |key: &str| {
            detail
                .get(key)
                .ok_or_else(|| GrouperError::protocol(format!("composite without {key}")))
                .and_then(Group::from_json)
                .map(Box::new)
        };
        Ok(Composite {
            composite_type,
            left: operand("leftGroup")?,
            right: operand("rightGroup")?,
        })
    }
}

impl ToJson for Group {
    fn to_json(&self) -> Value {
        let mut map = Map::new();
        put_opt(&mut map, "name", self.name());
        put_opt(&mut map, "uuid", self.uuid());
        put_opt(&mut map, "extension", self.extension.as_deref());
        put_opt(&mut map, "displayExtension", self.display_extension.as_deref());
        put_opt(&mut map, "description", self.description.as_deref());
        if let Some(composite) = &self.composite {
            let mut detail = Map::new();
            put_opt(&mut detail, "hasComposite", Some(bool_to_str(true)));
            put_opt(
                &mut detail,
                "compositeType",
                Some(composite.composite_type.as_ref()),
            );
            detail.insert("leftGroup".to_string(), composite.left.to_json());
            detail.insert("rightGroup".to_string(), composite.right.to_json());
            map.insert("detail".to_string(), Value::Object(detail));
        }
        Value::Object(map)
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for Group {}

impl Hash for Group {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display_extension {
            Some(display) => write!(f, "Group {} ({display})", self.identity),
            None => write!(f, "Group {}", self.identity),
        }
    }
}
