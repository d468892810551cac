//! Memberships: a subject's link to a group or stem.

use crate::model::group::Group;
use crate::model::stem::Stem;
use crate::model::subject::Subject;
use chrono::NaiveDateTime;
use serde_json::{Value, json};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Timestamp format the service uses for `createTime`.
pub const CREATE_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.3f";

/// The owner side of a membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MembershipTarget {
    Group(Group),
    Stem(Stem),
}

impl MembershipTarget {
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            Self::Stem(_) => None,
        }
    }

    pub fn as_stem(&self) -> Option<&Stem> {
        match self {
            Self::Stem(stem) => Some(stem),
            Self::Group(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Group(group) => group.name(),
            Self::Stem(stem) => stem.name(),
        }
    }
}

impl fmt::Display for MembershipTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group(group) => group.fmt(f),
            Self::Stem(stem) => stem.fmt(f),
        }
    }
}

/// A subject's membership in a group or stem, as reported by the service.
///
/// Memberships are only built from service responses. Two memberships are equal
/// when their service-assigned ids are.
#[derive(Debug, Clone)]
pub struct Membership {
    id: String,
    target: MembershipTarget,
    subject: Subject,
    direct: bool,
    created: Option<NaiveDateTime>,
}

impl Membership {
    pub(crate) fn new(
        id: String,
        target: MembershipTarget,
        subject: Subject,
        direct: bool,
        created: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            id,
            target,
            subject,
            direct,
            created,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn target(&self) -> &MembershipTarget {
        &self.target
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// True for an immediate membership, false for one inherited through another group.
    pub fn is_direct(&self) -> bool {
        self.direct
    }

    pub fn created(&self) -> Option<NaiveDateTime> {
        self.created
    }

    /// Lookup form used when assigning attributes to the membership.
    pub fn to_lookup_json(&self) -> Value {
        json!({ "uuid": self.id })
    }
}

/// Parse a `createTime` value, `None` when missing or malformed.
pub(crate) fn parse_create_time(value: Option<&str>) -> Option<NaiveDateTime> {
    value.and_then(|raw| NaiveDateTime::parse_from_str(raw, CREATE_TIME_FORMAT).ok())
}

impl PartialEq for Membership {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Membership {}

impl Hash for Membership {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Membership {} of {} in {}",
            self.id, self.subject, self.target
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_create_time() {
        let created = parse_create_time(Some("2024/03/05 14:07:09.123")).unwrap();
        assert_eq!((created.year(), created.month(), created.day()), (2024, 3, 5));
        assert_eq!((created.hour(), created.minute()), (14, 7));
        assert!(parse_create_time(Some("yesterday")).is_none());
        assert!(parse_create_time(None).is_none());
    }

    #[test]
    fn test_equality_by_id() {
        let group = Group::named("a:b").unwrap();
        let first = Membership::new(
            "m1".into(),
            MembershipTarget::Group(group.clone()),
            Subject::from_id("u1").unwrap(),
            true,
            None,
        );
        let second = Membership::new(
            "m1".into(),
            MembershipTarget::Group(group),
            Subject::from_id("u2").unwrap(),
            false,
            None,
        );
        assert_eq!(first, second);
        assert_eq!(first.to_lookup_json(), json!({"uuid": "m1"}));
    }
}
