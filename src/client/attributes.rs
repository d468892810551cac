//! Attribute and permission assignment.

use super::{ATTRIBUTES_PATH, GrouperClient, PERMISSIONS_PATH, envelope};
use crate::error::{GrouperError, GrouperResult};
use crate::http::HttpClient;
use crate::model::attribute::Attribute;
use crate::model::enums::{AttributeAssignOperation, AttributeAssignType, PermissionAssignment};
use crate::model::group::Group;
use crate::model::membership::Membership;
use crate::model::stem::Stem;
use crate::model::subject::Subject;
use log::debug;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// An owner an attribute can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeTarget<'a> {
    Group(&'a Group),
    Stem(&'a Stem),
    Membership(&'a Membership),
    Subject(&'a Subject),
}

impl AttributeTarget<'_> {
    pub fn assign_type(self) -> AttributeAssignType {
        match self {
            Self::Group(_) => AttributeAssignType::Group,
            Self::Stem(_) => AttributeAssignType::Stem,
            Self::Membership(_) => AttributeAssignType::ImmediateMembership,
            Self::Subject(_) => AttributeAssignType::Member,
        }
    }

    pub fn to_lookup_json(self) -> Value {
        match self {
            Self::Group(group) => group.to_lookup_json(),
            Self::Stem(stem) => stem.to_lookup_json(),
            Self::Membership(membership) => membership.to_lookup_json(),
            Self::Subject(subject) => subject.to_lookup_json(),
        }
    }
}

impl<'a> From<&'a Group> for AttributeTarget<'a> {
    fn from(group: &'a Group) -> Self {
        Self::Group(group)
    }
}

impl<'a> From<&'a Stem> for AttributeTarget<'a> {
    fn from(stem: &'a Stem) -> Self {
        Self::Stem(stem)
    }
}

impl<'a> From<&'a Membership> for AttributeTarget<'a> {
    fn from(membership: &'a Membership) -> Self {
        Self::Membership(membership)
    }
}

impl<'a> From<&'a Subject> for AttributeTarget<'a> {
    fn from(subject: &'a Subject) -> Self {
        Self::Subject(subject)
    }
}

/// Owner lookups grouped by assign type, in a stable order.
fn group_by_kind(targets: &[AttributeTarget<'_>]) -> BTreeMap<AttributeAssignType, Vec<Value>> {
    let mut by_kind: BTreeMap<AttributeAssignType, Vec<Value>> = BTreeMap::new();
    for target in targets {
        by_kind
            .entry(target.assign_type())
            .or_default()
            .push(target.to_lookup_json());
    }
    by_kind
}

impl<H: HttpClient> GrouperClient<H> {
    /// Assign an attribute to, or remove it from, a mix of owners.
    ///
    /// Owners are grouped by kind and one request is issued per kind, in the order
    /// groups, stems, memberships, subjects. Returns the raw result of each request.
    ///
    /// # Errors
    ///
    /// Stops at the first failing request.
    pub async fn assign_attributes(
        &self,
        attribute: &Attribute,
        targets: &[AttributeTarget<'_>],
        operation: AttributeAssignOperation,
    ) -> GrouperResult<Vec<Value>> {
        let mut results = Vec::new();
        for (kind, lookups) in group_by_kind(targets) {
            debug!("{operation} {attribute} on {} {kind} owners", lookups.len());
            let mut fields = Map::new();
            fields.insert("attributeAssignType".to_string(), json!(kind.as_ref()));
            fields.insert(
                "attributeAssignOperation".to_string(),
                json!(operation.as_ref()),
            );
            fields.insert(
                "wsAttributeDefNameLookups".to_string(),
                json!([attribute.to_lookup_json()]),
            );
            fields.insert(kind.owner_field().to_string(), Value::Array(lookups));

            let result = self
                .transport
                .post(
                    ATTRIBUTES_PATH,
                    envelope("WsRestAssignAttributesRequest", Value::Object(fields)),
                )
                .await?
                .into_raw()?;
            results.push(result);
        }
        Ok(results)
    }

    /// Assign permissions to, or remove them from, role groups.
    ///
    /// # Errors
    ///
    /// Returns a precondition error when no roles or no permissions are given, plus
    /// transport, protocol and API errors of the call.
    pub async fn assign_permissions(
        &self,
        roles: &[Group],
        permissions: &[Attribute],
        actions: &[&str],
        operation: PermissionAssignment,
    ) -> GrouperResult<Value> {
        if roles.is_empty() || permissions.is_empty() {
            return Err(GrouperError::precondition(
                "permission assignment needs at least one role and one permission",
            ));
        }
        let mut fields = Map::new();
        fields.insert("permissionType".to_string(), json!("role"));
        fields.insert(
            "permissionAssignOperation".to_string(),
            json!(operation.as_ref()),
        );
        fields.insert(
            "roleLookups".to_string(),
            roles.iter().map(Group::to_lookup_json).collect(),
        );
        fields.insert(
            "permissionDefNameLookups".to_string(),
            permissions.iter().map(Attribute::to_lookup_json).collect(),
        );
        if !actions.is_empty() {
            fields.insert("actions".to_string(), json!(actions));
        }
        self.transport
            .post(
                PERMISSIONS_PATH,
                envelope("WsRestAssignPermissionsRequest", Value::Object(fields)),
            )
            .await?
            .into_raw()
    }
}
