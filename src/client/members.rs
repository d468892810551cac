//! Group members and subject memberships.

use super::{GROUPS_PATH, GrouperClient, MEMBERSHIPS_PATH, envelope};
use crate::dispatch::{MemberResults, MembershipListing};
use crate::error::{GrouperError, GrouperResult};
use crate::http::HttpClient;
use crate::model::enums::{FieldType, MemberFilter};
use crate::model::group::Group;
use crate::model::membership::MembershipTarget;
use crate::model::subject::Subject;
use crate::model::wire::bool_to_str;
use log::debug;
use serde_json::{Map, Value, json};
use std::collections::{HashMap, HashSet};
use std::slice;

/// Path of a group's member collection. Groups known only by uuid use the
/// collection path and identify the group in the body.
fn members_path(group: &Group) -> String {
    match group.name() {
        Some(name) => format!("{GROUPS_PATH}/{name}/members"),
        None => GROUPS_PATH.to_string(),
    }
}

fn subject_lookups(subjects: &[Subject]) -> Vec<Value> {
    subjects.iter().map(Subject::to_lookup_json).collect()
}

/// The single entry a one-subject call answered with.
///
/// The service may echo a subject looked up by identifier under its id, so a lone
/// entry is accepted even when it does not compare equal to the request.
fn single_entry<V>(mut map: HashMap<Subject, V>, subject: &Subject) -> Option<V> {
    if let Some(value) = map.remove(subject) {
        return Some(value);
    }
    if map.len() == 1 {
        return map.into_values().next();
    }
    None
}

impl<H: HttpClient> GrouperClient<H> {
    /// List a group's members.
    ///
    /// # Errors
    ///
    /// Transport, protocol and API errors of the call.
    pub async fn get_members(
        &self,
        group: &Group,
        filter: MemberFilter,
    ) -> GrouperResult<Vec<Subject>> {
        let request = envelope(
            "WsRestGetMembersRequest",
            json!({
                "wsGroupLookups": [group.to_lookup_json()],
                "memberFilter": filter.as_ref(),
            }),
        );
        self.transport
            .post(GROUPS_PATH, request)
            .await?
            .into_members()
    }

    /// Add subjects to a group, optionally replacing all existing members.
    ///
    /// With no subjects the service is not asked to add anything: the result is empty,
    /// unless `replace_existing` is set, in which case the current immediate members
    /// are removed and their removal results returned.
    ///
    /// # Errors
    ///
    /// Transport, protocol and API errors of the call.
    pub async fn add_members(
        &self,
        group: &Group,
        subjects: &[Subject],
        replace_existing: bool,
    ) -> GrouperResult<MemberResults> {
        if subjects.is_empty() {
            if !replace_existing {
                return Ok(MemberResults::new());
            }
            let existing = self.get_members(group, MemberFilter::Immediate).await?;
            debug!("Clearing {} members of {group}", existing.len());
            return self.delete_members(group, &existing).await;
        }

        let request = envelope(
            "WsRestAddMemberRequest",
            json!({
                "replaceAllExisting": bool_to_str(replace_existing),
                "subjectLookups": subject_lookups(subjects),
                "wsGroupLookup": group.to_lookup_json(),
            }),
        );
        self.transport
            .put(&members_path(group), request)
            .await?
            .into_member_results()
    }

    /// Make `subjects` the exact immediate membership of a group.
    ///
    /// # Errors
    ///
    /// As [`add_members`](Self::add_members).
    pub async fn set_members(
        &self,
        group: &Group,
        subjects: &[Subject],
    ) -> GrouperResult<MemberResults> {
        self.add_members(group, subjects, true).await
    }

    /// Remove subjects from a group. No subjects means no call.
    ///
    /// # Errors
    ///
    /// Transport, protocol and API errors of the call.
    pub async fn delete_members(
        &self,
        group: &Group,
        subjects: &[Subject],
    ) -> GrouperResult<MemberResults> {
        if subjects.is_empty() {
            return Ok(MemberResults::new());
        }
        let request = envelope(
            "WsRestDeleteMemberRequest",
            json!({
                "subjectLookups": subject_lookups(subjects),
                "wsGroupLookup": group.to_lookup_json(),
            }),
        );
        self.transport
            .put(&members_path(group), request)
            .await?
            .into_member_results()
    }

    /// Check which subjects are members of a group.
    ///
    /// # Errors
    ///
    /// Transport, protocol and API errors of the call.
    pub async fn has_members(
        &self,
        group: &Group,
        subjects: &[Subject],
    ) -> GrouperResult<HashMap<Subject, bool>> {
        if subjects.is_empty() {
            return Ok(HashMap::new());
        }
        let request = envelope(
            "WsRestHasMemberRequest",
            json!({
                "subjectLookups": subject_lookups(subjects),
                "wsGroupLookup": group.to_lookup_json(),
            }),
        );
        self.transport
            .post(&members_path(group), request)
            .await?
            .into_has_member()
    }

    /// Check whether one subject is a member of a group.
    ///
    /// # Errors
    ///
    /// As [`has_members`](Self::has_members), plus a protocol error when the service
    /// does not answer for the subject.
    pub async fn has_member(&self, group: &Group, subject: &Subject) -> GrouperResult<bool> {
        let answers = self.has_members(group, slice::from_ref(subject)).await?;
        single_entry(answers, subject)
            .ok_or_else(|| GrouperError::protocol(format!("no membership answer for {subject}")))
    }

    /// Memberships of several subjects, optionally narrowed by field type and filter.
    ///
    /// # Errors
    ///
    /// Transport, protocol and API errors of the call.
    pub async fn get_memberships(
        &self,
        subjects: &[Subject],
        field_type: Option<FieldType>,
        filter: Option<MemberFilter>,
    ) -> GrouperResult<MembershipListing> {
        if subjects.is_empty() {
            return Ok(MembershipListing::default());
        }
        let mut fields = Map::new();
        fields.insert(
            "wsSubjectLookups".to_string(),
            Value::Array(subject_lookups(subjects)),
        );
        if let Some(field_type) = field_type {
            fields.insert("fieldType".to_string(), json!(field_type.as_ref()));
        }
        if let Some(filter) = filter {
            fields.insert("memberFilter".to_string(), json!(filter.as_ref()));
        }
        self.transport
            .post(
                MEMBERSHIPS_PATH,
                envelope("WsRestGetMembershipsRequest", Value::Object(fields)),
            )
            .await?
            .into_memberships()
    }

    /// Groups and stems one subject is a member of; empty when there are none.
    ///
    /// # Errors
    ///
    /// As [`get_memberships`](Self::get_memberships).
    pub async fn get_subject_memberships(
        &self,
        subject: &Subject,
    ) -> GrouperResult<HashSet<MembershipTarget>> {
        let listing = self
            .get_memberships(slice::from_ref(subject), None, None)
            .await?;
        Ok(single_entry(listing.by_subject, subject).unwrap_or_default())
    }
}
