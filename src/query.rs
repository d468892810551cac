//! Query expressions for finding groups and stems.
//!
//! A [`Query`] is an immutable tree of predicate leaves combined with AND, OR and
//! MINUS. It compiles to the service's tagged filter object, either as a group
//! filter (`wsQueryFilter`) or a stem filter (`wsStemQueryFilter`).
//!
//! ```rust
//! use grouper_client::{Query, StemScope};
//! use serde_json::json;
//!
//! let query = Query::find_by_stem_name("a", StemScope::OneLevel)
//!     & Query::find_by_stem_name("b", StemScope::OneLevel);
//! assert_eq!(query.to_group_filter()["queryFilterType"], json!("AND"));
//! ```

use crate::model::enums::StemScope;
use crate::model::wire::put_opt;
use serde_json::{Map, Value};
use std::ops::{BitAnd, BitOr, Sub};

/// A composable find predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    And(Box<Query>, Box<Query>),
    Or(Box<Query>, Box<Query>),
    Minus(Box<Query>, Box<Query>),
    /// Entities in a stem, directly or anywhere below it.
    FindByStemName { stem_name: String, scope: StemScope },
    /// Stems under a parent stem.
    FindByParentStemName {
        parent_stem_name: String,
        scope: StemScope,
    },
    /// Exact group name.
    FindByGroupName(String),
    FindByGroupUuid(String),
    /// Name or display name containing the given text.
    FindByApproximateName(String),
}

/// Which filter dialect a query compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Group,
    Stem,
}

impl Dialect {
    fn type_key(self) -> &'static str {
        match self {
            Self::Group => "queryFilterType",
            Self::Stem => "stemQueryFilterType",
        }
    }

    fn operand_keys(self) -> (&'static str, &'static str) {
        match self {
            Self::Group => ("queryFilter0", "queryFilter1"),
            Self::Stem => ("stemQueryFilter0", "stemQueryFilter1"),
        }
    }
}

impl Query {
    pub fn find_by_stem_name(stem_name: impl Into<String>, scope: StemScope) -> Self {
        Self::FindByStemName {
            stem_name: stem_name.into(),
            scope,
        }
    }

    pub fn find_by_parent_stem_name(parent_stem_name: impl Into<String>, scope: StemScope) -> Self {
        Self::FindByParentStemName {
            parent_stem_name: parent_stem_name.into(),
            scope,
        }
    }

    pub fn find_by_group_name(name: impl Into<String>) -> Self {
        Self::FindByGroupName(name.into())
    }

    pub fn find_by_group_uuid(uuid: impl Into<String>) -> Self {
        Self::FindByGroupUuid(uuid.into())
    }

    pub fn find_by_approximate_name(name: impl Into<String>) -> Self {
        Self::FindByApproximateName(name.into())
    }

    #[must_use]
    pub fn and(self, other: Query) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: Query) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn minus(self, other: Query) -> Self {
        Self::Minus(Box::new(self), Box::new(other))
    }

    /// Wire tag of this node.
    pub fn query_type(&self) -> &'static str {
        match self {
            Self::And(..) => "AND",
            Self::Or(..) => "OR",
            Self::Minus(..) => "MINUS",
            Self::FindByStemName { .. } => "FIND_BY_STEM_NAME",
            Self::FindByParentStemName { .. } => "FIND_BY_PARENT_STEM_NAME",
            Self::FindByGroupName(_) => "FIND_BY_GROUP_NAME_EXACT",
            Self::FindByGroupUuid(_) => "FIND_BY_GROUP_UUID",
            Self::FindByApproximateName(_) => "FIND_BY_GROUP_NAME_APPROXIMATE",
        }
    }

    /// Compile to a group filter (`wsQueryFilter`).
    pub fn to_group_filter(&self) -> Value {
        self.compile(Dialect::Group)
    }

    /// Compile to a stem filter (`wsStemQueryFilter`).
    pub fn to_stem_filter(&self) -> Value {
        self.compile(Dialect::Stem)
    }

    fn compile(&self, dialect: Dialect) -> Value {
        let mut map = Map::new();
        map.insert(
            dialect.type_key().to_string(),
            Value::String(self.query_type().to_string()),
        );
        match self {
            Self::And(left, right) | Self::Or(left, right) | Self::Minus(left, right) => {
                let (left_key, right_key) = dialect.operand_keys();
                map.insert(left_key.to_string(), left.compile(dialect));
                map.insert(right_key.to_string(), right.compile(dialect));
            }
            Self::FindByStemName { stem_name, scope } => {
                put_opt(&mut map, "stemName", Some(stem_name.as_str()));
                put_opt(&mut map, "stemNameScope", Some(scope.as_ref()));
            }
            Self::FindByParentStemName {
                parent_stem_name,
                scope,
            } => {
                put_opt(&mut map, "parentStemName", Some(parent_stem_name.as_str()));
                put_opt(&mut map, "parentStemNameScope", Some(scope.as_ref()));
            }
            Self::FindByGroupName(name) | Self::FindByApproximateName(name) => {
                put_opt(&mut map, "groupName", Some(name.as_str()));
            }
            Self::FindByGroupUuid(uuid) => put_opt(&mut map, "groupUuid", Some(uuid.as_str())),
        }
        Value::Object(map)
    }
}

impl BitAnd for Query {
    type Output = Query;

    fn bitand(self, rhs: Query) -> Query {
        self.and(rhs)
    }
}

impl BitOr for Query {
    type Output = Query;

    fn bitor(self, rhs: Query) -> Query {
        self.or(rhs)
    }
}

impl Sub for Query {
    type Output = Query;

    fn sub(self, rhs: Query) -> Query {
        self.minus(rhs)
    }
}
