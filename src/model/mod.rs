//! Entity model for the group-management service.
//!
//! Entities are plain values. Groups, stems and attributes share the name-or-uuid
//! [`Identity`]; subjects are identified by id or alternate identifier; memberships
//! by their service id. None of them hold a reference to a client: operations are
//! methods on [`GrouperClient`](crate::GrouperClient) taking entities as arguments.

pub mod attribute;
pub mod enums;
pub mod group;
pub mod identity;
pub mod membership;
pub mod stem;
pub mod subject;
pub mod to_save;
pub mod wire;

pub use attribute::Attribute;
pub use enums::{
    AttributeAssignOperation, AttributeAssignType, CompositeType, FieldType, MemberFilter,
    PermissionAssignment, PrivilegeName, PrivilegeType, ResultCode, SaveMode, StemScope,
};
pub use group::{Composite, Group};
pub use identity::Identity;
pub use membership::{Membership, MembershipTarget};
pub use stem::Stem;
pub use subject::{GROUP_SUBJECT_SOURCE, Subject};
pub use to_save::{GroupToSave, StemToSave};
pub use wire::{ToJson, bool_to_str, str_to_bool};
