//! Access privileges on groups and naming privileges on stems.

use super::{GrouperClient, PRIVILEGES_PATH, envelope};
use crate::error::{GrouperError, GrouperResult};
use crate::http::HttpClient;
use crate::model::enums::{PrivilegeName, PrivilegeType};
use crate::model::group::Group;
use crate::model::stem::Stem;
use crate::model::subject::Subject;
use crate::model::wire::{bool_to_str, put_opt};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// What a privilege is held on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegeTarget<'a> {
    Group(&'a Group),
    Stem(&'a Stem),
}

impl PrivilegeTarget<'_> {
    /// Privileges on groups are access privileges, on stems naming privileges.
    pub fn privilege_type(self) -> PrivilegeType {
        match self {
            Self::Group(_) => PrivilegeType::Access,
            Self::Stem(_) => PrivilegeType::Naming,
        }
    }

    fn write_lookup(self, fields: &mut Map<String, Value>) {
        match self {
            Self::Group(group) => {
                put_opt(fields, "groupName", group.name());
                put_opt(fields, "groupUuid", group.uuid());
            }
            Self::Stem(stem) => {
                put_opt(fields, "stemName", stem.name());
                put_opt(fields, "stemUuid", stem.uuid());
            }
        }
    }
}

impl<'a> From<&'a Group> for PrivilegeTarget<'a> {
    fn from(group: &'a Group) -> Self {
        Self::Group(group)
    }
}

impl<'a> From<&'a Stem> for PrivilegeTarget<'a> {
    fn from(stem: &'a Stem) -> Self {
        Self::Stem(stem)
    }
}

fn privilege_fields(
    target: PrivilegeTarget<'_>,
    subject: Option<&Subject>,
    privilege: Option<PrivilegeName>,
) -> Map<String, Value> {
    let mut fields = Map::new();
    target.write_lookup(&mut fields);
    if let Some(subject) = subject {
        put_opt(&mut fields, "subjectId", subject.id());
        put_opt(&mut fields, "subjectSourceId", subject.source());
        if subject.id().is_none() {
            put_opt(&mut fields, "subjectIdentifier", subject.identifier());
        }
    }
    put_opt(
        &mut fields,
        "privilegeType",
        Some(target.privilege_type().as_ref()),
    );
    if let Some(privilege) = privilege {
        put_opt(&mut fields, "privilegeName", Some(privilege.as_ref()));
    }
    fields
}

impl<H: HttpClient> GrouperClient<H> {
    /// Privileges held on a group or stem, optionally narrowed to one subject and
    /// one privilege name. Only granted privileges are reported.
    ///
    /// # Errors
    ///
    /// Transport, protocol and API errors of the call.
    pub async fn get_privileges(
        &self,
        target: PrivilegeTarget<'_>,
        subject: Option<&Subject>,
        privilege: Option<PrivilegeName>,
    ) -> GrouperResult<HashMap<Subject, HashSet<PrivilegeName>>> {
        let fields = privilege_fields(target, subject, privilege);
        self.transport
            .post(
                PRIVILEGES_PATH,
                envelope("WsRestGetGrouperPrivilegesLiteRequest", Value::Object(fields)),
            )
            .await?
            .into_privileges()
    }

    /// Grant (`allowed = true`) or revoke a privilege. Returns the service's raw result.
    ///
    /// # Errors
    ///
    /// Returns a precondition error when the privilege does not apply to the target
    /// kind (e.g. `create` on a group), plus transport, protocol and API errors.
    pub async fn assign_privilege(
        &self,
        target: PrivilegeTarget<'_>,
        subject: &Subject,
        privilege: PrivilegeName,
        allowed: bool,
    ) -> GrouperResult<Value> {
        if privilege.privilege_type() != target.privilege_type() {
            return Err(GrouperError::precondition(format!(
                "{privilege} is a {} privilege and cannot be assigned on a {}",
                privilege.privilege_type(),
                match target {
                    PrivilegeTarget::Group(_) => "group",
                    PrivilegeTarget::Stem(_) => "stem",
                }
            )));
        }
        let mut fields = privilege_fields(target, Some(subject), Some(privilege));
        put_opt(&mut fields, "allowed", Some(bool_to_str(allowed)));
        self.transport
            .post(
                PRIVILEGES_PATH,
                envelope("WsRestAssignGrouperPrivilegesLiteRequest", Value::Object(fields)),
            )
            .await?
            .into_raw()
    }
}
