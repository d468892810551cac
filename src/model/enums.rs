//! Closed sets of wire-string tags used in requests and responses.
//!
//! Every enum renders to its wire string via `as_ref()`/`Display` and parses back
//! with `FromStr`.

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Kind of field a membership is recorded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum FieldType {
    List,
    Access,
    AttributeDef,
    Naming,
}

/// How deep a stem-scoped query reaches.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StemScope {
    /// Direct children only
    #[default]
    OneLevel,
    /// Everything below the stem
    AllInSubtree,
}

/// Set operation a composite group applies to its two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CompositeType {
    Intersection,
    Complement,
    Union,
}

/// Whether a permission assignment grants or removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
pub enum PermissionAssignment {
    #[strum(serialize = "assign_permission")]
    Assign,
    #[strum(serialize = "remove_permission")]
    Remove,
}

/// Whether an attribute assignment adds or removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
pub enum AttributeAssignOperation {
    #[strum(serialize = "assign_attr")]
    Assign,
    #[strum(serialize = "remove_attr")]
    Remove,
}

/// Owner kind of an attribute assignment. Declaration order is request order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, Display, EnumIter, EnumString,
)]
pub enum AttributeAssignType {
    #[strum(serialize = "group")]
    Group,
    #[strum(serialize = "stem")]
    Stem,
    #[strum(serialize = "imm_mem")]
    ImmediateMembership,
    #[strum(serialize = "member")]
    Member,
}

impl AttributeAssignType {
    /// Request field holding the owner lookups for this kind.
    pub fn owner_field(self) -> &'static str {
        match self {
            Self::Group => "wsOwnerGroupLookups",
            Self::Stem => "wsOwnerStemLookups",
            Self::ImmediateMembership => "wsOwnerMembershipLookups",
            Self::Member => "wsOwnerSubjectLookups",
        }
    }
}

/// How a save request treats existing records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SaveMode {
    Insert,
    Update,
    #[default]
    InsertOrUpdate,
}

/// Which memberships a member listing includes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, Display, EnumIter, EnumString,
)]
pub enum MemberFilter {
    #[default]
    All,
    Immediate,
    Effective,
    Composite,
    NonImmediate,
}

/// Privilege family: access privileges apply to groups, naming privileges to stems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PrivilegeType {
    Access,
    Naming,
}

/// Privileges grantable on groups and stems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PrivilegeName {
    Read,
    View,
    Update,
    Admin,
    Optin,
    Optout,
    Stem,
    Create,
}

impl PrivilegeName {
    pub fn privilege_type(self) -> PrivilegeType {
        match self {
            Self::Stem | Self::Create => PrivilegeType::Naming,
            _ => PrivilegeType::Access,
        }
    }
}

/// Per-entry and per-request outcome codes reported by the service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultCode {
    Success,
    SuccessAlreadyExisted,
    SuccessWasntImmediate,
    SuccessWasntImmediateButHasEffective,
    SuccessInserted,
    SuccessUpdated,
    SuccessNoChangesNeeded,
    SuccessGroupNotFound,
    SuccessStemNotFound,
    SuccessAllowed,
    SuccessNotAllowed,
    IsMember,
    IsNotMember,
    SubjectNotFound,
    SubjectDuplicate,
    GroupNotFound,
    StemNotFound,
    InvalidQuery,
    InsufficientPrivileges,
    ProblemSavingStems,
    ProblemSavingGroups,
    ProblemDeletingGroups,
    ProblemDeletingStems,
    ProblemWithAssignment,
    ProblemGettingMembers,
    ProblemGettingMemberships,
    Exception,
}

impl ResultCode {
    /// Reverse lookup from the wire string.
    pub fn from_wire(code: &str) -> Option<Self> {
        code.parse().ok()
    }

    /// True for the `SUCCESS*` family and the membership-check answers.
    pub fn is_success(self) -> bool {
        let code: &'static str = self.into();
        code.starts_with("SUCCESS") || matches!(self, Self::IsMember | Self::IsNotMember)
    }
}
