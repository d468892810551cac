//! Decoders for each known result shape.

use super::{DeleteOutcome, DispatchContext, MemberResults, MembershipListing, ResponseBody, ResponseKind};
use crate::error::{GrouperError, GrouperResult};
use crate::model::enums::{PrivilegeName, ResultCode};
use crate::model::group::Group;
use crate::model::membership::{Membership, MembershipTarget, parse_create_time};
use crate::model::stem::Stem;
use crate::model::subject::{Subject, is_absent_marker};
use crate::model::wire::{array, first_str, opt_flag, opt_str};
use log::warn;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

pub(super) fn decode(
    kind: ResponseKind,
    inner: &Value,
    context: &DispatchContext,
) -> GrouperResult<ResponseBody> {
    Ok(match kind {
        ResponseKind::HasMember => ResponseBody::HasMember(has_member(inner, context)?),
        ResponseKind::GetMemberships => ResponseBody::Memberships(memberships(inner)?),
        ResponseKind::FindStems => {
            ResponseBody::Stems(each(array(inner, "stemResults"), Stem::from_json)?)
        }
        ResponseKind::FindGroups => {
            ResponseBody::Groups(each(array(inner, "groupResults"), Group::from_json)?)
        }
        ResponseKind::GroupSave => ResponseBody::SavedGroups(saved(inner, "wsGroup", Group::from_json)?),
        ResponseKind::StemSave => ResponseBody::SavedStems(saved(inner, "wsStem", Stem::from_json)?),
        ResponseKind::GetMembers => ResponseBody::Members(members(inner)?),
        ResponseKind::GetPrivileges => ResponseBody::Privileges(privileges(inner)?),
        ResponseKind::AddMember | ResponseKind::DeleteMember => {
            ResponseBody::MemberResults(member_results(inner, context)?)
        }
        ResponseKind::GroupDelete => ResponseBody::DeletedGroups(deleted(
            inner,
            context,
            "wsGroup",
            "wsGroupLookups",
            Group::from_json,
        )?),
        ResponseKind::StemDelete => ResponseBody::DeletedStems(deleted(
            inner,
            context,
            "wsStem",
            "wsStemLookups",
            Stem::from_json,
        )?),
        ResponseKind::AssignPrivileges
        | ResponseKind::AssignAttributes
        | ResponseKind::AssignPermissions => ResponseBody::Raw(kind, inner.clone()),
    })
}

fn each<T>(values: &[Value], parse: fn(&Value) -> GrouperResult<T>) -> GrouperResult<Vec<T>> {
    values.iter().map(parse).collect()
}

fn saved<T>(
    inner: &Value,
    field: &str,
    parse: fn(&Value) -> GrouperResult<T>,
) -> GrouperResult<Vec<T>> {
    array(inner, "results")
        .iter()
        .map(|entry| {
            entry
                .get(field)
                .ok_or_else(|| GrouperError::protocol(format!("save result without {field}")))
                .and_then(parse)
        })
        .collect()
}

fn entry_metadata(entry: &Value) -> &Value {
    entry.get("resultMetadata").unwrap_or(&Value::Null)
}

/// Per-entry result code. Unknown codes are logged and treated as a generic failure.
fn entry_code(entry: &Value) -> ResultCode {
    let metadata = entry_metadata(entry);
    match opt_str(metadata, "resultCode") {
        Some(code) => ResultCode::from_wire(&code).unwrap_or_else(|| {
            warn!("Unknown result code {code}, treating as {}", ResultCode::Exception);
            ResultCode::Exception
        }),
        None if opt_flag(metadata, "success") == Some(false) => ResultCode::Exception,
        None => ResultCode::Success,
    }
}

fn has_member(
    inner: &Value,
    context: &DispatchContext,
) -> GrouperResult<HashMap<Subject, bool>> {
    let lookups = context.request_array("subjectLookups");
    array(inner, "results")
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let (subject, resolved) = echoed_subject(entry, index, lookups)?;
            let is_member = resolved && opt_flag(entry_metadata(entry), "success") == Some(true);
            Ok((subject, is_member))
        })
        .collect()
}

/// Subject echoed by a per-subject result entry, and whether the service resolved it.
///
/// An unresolved subject comes back with a missing or `"null"` id; it is rebuilt
/// from the echo when possible, else from the request lookup at the same index.
fn echoed_subject(entry: &Value, index: usize, lookups: &[Value]) -> GrouperResult<(Subject, bool)> {
    let raw = entry.get("wsSubject").unwrap_or(&Value::Null);
    let absent = match raw.get("id") {
        None | Some(Value::Null) => true,
        Some(id) => id.as_str().is_none_or(is_absent_marker),
    };
    if !absent {
        return Ok((Subject::from_json(raw)?, true));
    }

    let subject = Subject::from_json(raw).or_else(|_| {
        lookups
            .get(index)
            .ok_or_else(|| GrouperError::protocol(format!("result {index} without subject")))
            .and_then(Subject::from_json)
    })?;
    Ok((subject, false))
}

fn memberships(inner: &Value) -> GrouperResult<MembershipListing> {
    let mut groups = HashMap::new();
    for value in array(inner, "wsGroups") {
        let group = Group::from_json(value)?;
        if let Some(uuid) = group.uuid() {
            groups.insert(uuid.to_string(), group);
        }
    }
    let mut stems = HashMap::new();
    for value in array(inner, "wsStems") {
        let stem = Stem::from_json(value)?;
        if let Some(uuid) = stem.uuid() {
            stems.insert(uuid.to_string(), stem);
        }
    }
    let mut subjects = HashMap::new();
    for value in array(inner, "wsSubjects") {
        let subject = Subject::from_json(value)?;
        if let Some(id) = subject.id() {
            subjects.insert(id.to_string(), subject);
        }
    }

    let mut listing = MembershipListing::default();
    for value in array(inner, "wsMemberships") {
        let id = first_str(value, &["membershipId", "immediateMembershipId"])
            .ok_or_else(|| GrouperError::protocol(format!("membership without id: {value}")))?;

        let subject = match opt_str(value, "subjectId") {
            Some(subject_id) => match subjects.get(&subject_id) {
                Some(subject) => subject.clone(),
                None => Subject::new(
                    Some(subject_id),
                    None,
                    opt_str(value, "subjectSourceId"),
                    None,
                )?,
            },
            None => {
                return Err(GrouperError::protocol(format!(
                    "membership {id} without subject"
                )));
            }
        };

        let target = if let Some(group_id) = opt_str(value, "groupId") {
            let group = match groups.get(&group_id) {
                Some(group) => group.clone(),
                None => Group::new(opt_str(value, "groupName"), Some(group_id))?,
            };
            MembershipTarget::Group(group)
        } else if let Some(stem_id) = opt_str(value, "ownerStemId") {
            let stem = match stems.get(&stem_id) {
                Some(stem) => stem.clone(),
                None => Stem::new(opt_str(value, "ownerStemName"), Some(stem_id))?,
            };
            MembershipTarget::Stem(stem)
        } else {
            return Err(GrouperError::protocol(format!(
                "membership {id} has neither a group nor a stem owner"
            )));
        };

        let direct = opt_str(value, "membershipType").as_deref() == Some("immediate");
        let created = parse_create_time(opt_str(value, "createTime").as_deref());

        listing
            .by_subject
            .entry(subject.clone())
            .or_insert_with(HashSet::new)
            .insert(target.clone());
        listing
            .memberships
            .push(Membership::new(id, target, subject, direct, created));
    }
    Ok(listing)
}

fn members(inner: &Value) -> GrouperResult<Vec<Subject>> {
    array(inner, "results")
        .iter()
        .flat_map(|entry| array(entry, "wsSubjects"))
        .map(Subject::from_json)
        .collect()
}

fn privileges(inner: &Value) -> GrouperResult<HashMap<Subject, HashSet<PrivilegeName>>> {
    let mut subjects: HashMap<(Option<String>, Option<String>, Option<String>), Subject> =
        HashMap::new();
    let mut result: HashMap<Subject, HashSet<PrivilegeName>> = HashMap::new();

    for entry in array(inner, "privilegeResults") {
        if opt_flag(entry, "allowed") == Some(false) {
            continue;
        }
        let Some(name) = opt_str(entry, "privilegeName") else {
            continue;
        };
        let Ok(privilege) = PrivilegeName::from_str(&name) else {
            warn!("Ignoring unknown privilege {name}");
            continue;
        };

        let raw = entry.get("wsSubject").unwrap_or(&Value::Null);
        let key = (
            first_str(raw, &["sourceId", "subjectSourceId"]),
            first_str(raw, &["id", "subjectId"]),
            first_str(raw, &["identifierLookup", "subjectIdentifier"]),
        );
        let subject = match subjects.get(&key) {
            Some(subject) => subject.clone(),
            None => {
                let subject = Subject::from_json(raw)?;
                subjects.insert(key, subject.clone());
                subject
            }
        };
        result.entry(subject).or_default().insert(privilege);
    }
    Ok(result)
}

fn member_results(inner: &Value, context: &DispatchContext) -> GrouperResult<MemberResults> {
    let lookups = context.request_array("subjectLookups");
    let mut results = MemberResults::new();

    for (index, entry) in array(inner, "results").iter().enumerate() {
        let (subject, resolved) = echoed_subject(entry, index, lookups)?;
        let code = if resolved { entry_code(entry) } else { ResultCode::SubjectNotFound };
        results.push(subject, code);
    }
    Ok(results)
}

fn deleted<T>(
    inner: &Value,
    context: &DispatchContext,
    field: &str,
    lookup_field: &str,
    parse: fn(&Value) -> GrouperResult<T>,
) -> GrouperResult<Vec<DeleteOutcome<T>>> {
    let lookups = context.request_array(lookup_field);
    array(inner, "results")
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let entity = match entry.get(field).map(parse) {
                Some(Ok(entity)) => entity,
                _ => lookups
                    .get(index)
                    .ok_or_else(|| {
                        GrouperError::protocol(format!("delete result {index} without {field}"))
                    })
                    .and_then(parse)?,
            };
            Ok(DeleteOutcome {
                entity,
                result_code: entry_code(entry),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use serde_json::json;

    fn ctx(input: Value) -> DispatchContext {
        DispatchContext::new(HttpMethod::Put, "groups/a:b/members", input)
    }

    #[test]
    fn test_has_member_uses_entry_success() {
        let inner = json!({
            "resultMetadata": {"success": "T"},
            "results": [
                {"wsSubject": {"id": "u1"}, "resultMetadata": {"success": "T"}},
                {"wsSubject": {"id": "u2"}, "resultMetadata": {"success": "F"}},
            ]
        });
        let map = has_member(&inner, &ctx(json!({}))).unwrap();
        assert_eq!(map[&Subject::from_id("u1").unwrap()], true);
        assert_eq!(map[&Subject::from_id("u2").unwrap()], false);
    }

    #[test]
    fn test_has_member_unresolved_subject_keeps_other_answers() {
        let context = ctx(json!({
            "WsRestHasMemberRequest": {
                "subjectLookups": [{"subjectId": "u1"}, {"subjectId": "ghost"}]
            }
        }));
        let inner = json!({
            "resultMetadata": {"success": "T"},
            "results": [
                {"wsSubject": {"id": "u1"}, "resultMetadata": {"success": "T", "resultCode": "IS_MEMBER"}},
                {"wsSubject": {"id": "null"}, "resultMetadata": {"success": "T", "resultCode": "SUBJECT_NOT_FOUND"}},
            ]
        });
        let map = has_member(&inner, &context).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&Subject::from_id("u1").unwrap()], true);
        assert_eq!(map[&Subject::from_id("ghost").unwrap()], false);
    }

    #[test]
    fn test_member_results_absent_marker() {
        let context = ctx(json!({
            "WsRestAddMemberRequest": {
                "subjectLookups": [{"subjectId": "u1"}, {"subjectIdentifier": "ghost"}]
            }
        }));
        let inner = json!({
            "results": [
                {"wsSubject": {"id": "u1"}, "resultMetadata": {"resultCode": "SUCCESS_ALREADY_EXISTED"}},
                {"wsSubject": {"id": "null"}, "resultMetadata": {"resultCode": "SUCCESS"}},
            ]
        });
        let results = member_results(&inner, &context).unwrap();
        let entries: Vec<_> = results.iter().cloned().collect();
        assert_eq!(
            entries,
            vec![
                (Subject::from_id("u1").unwrap(), ResultCode::SuccessAlreadyExisted),
                (Subject::from_identifier("ghost").unwrap(), ResultCode::SubjectNotFound),
            ]
        );
    }

    #[test]
    fn test_unknown_entry_code_maps_to_exception() {
        let entry = json!({"resultMetadata": {"resultCode": "BRAND_NEW"}});
        assert_eq!(entry_code(&entry), ResultCode::Exception);
        assert_eq!(entry_code(&json!({})), ResultCode::Success);
    }

    #[test]
    fn test_memberships_attribute_to_group_or_stem() {
        let inner = json!({
            "wsGroups": [{"name": "a:g", "uuid": "g1"}],
            "wsStems": [{"name": "a", "uuid": "s1"}],
            "wsSubjects": [{"id": "u1", "sourceId": "ldap", "name": "Ann"}],
            "wsMemberships": [
                {"membershipId": "m1", "groupId": "g1", "subjectId": "u1",
                 "membershipType": "immediate", "createTime": "2024/01/02 03:04:05.678"},
                {"membershipId": "m2", "ownerStemId": "s1", "subjectId": "u1",
                 "membershipType": "effective"},
            ]
        });
        let listing = memberships(&inner).unwrap();
        assert_eq!(listing.memberships.len(), 2);
        assert!(listing.memberships[0].is_direct());
        assert!(listing.memberships[0].created().is_some());
        assert!(!listing.memberships[1].is_direct());
        assert_eq!(listing.memberships[0].subject().name(), Some("Ann"));

        let targets = listing.targets_of(&Subject::from_id("u1").unwrap());
        assert!(targets.contains(&MembershipTarget::Group(Group::named("a:g").unwrap())));
        assert!(targets.contains(&MembershipTarget::Stem(Stem::named("a").unwrap())));
    }

    #[test]
    fn test_membership_without_owner_is_rejected() {
        let inner = json!({"wsMemberships": [{"membershipId": "m1", "subjectId": "u1"}]});
        assert!(memberships(&inner).is_err());
    }

    #[test]
    fn test_privileges_dedupe_subjects() {
        let inner = json!({
            "privilegeResults": [
                {"wsSubject": {"id": "u1", "sourceId": "ldap"}, "privilegeName": "read", "allowed": "T"},
                {"wsSubject": {"id": "u1", "sourceId": "ldap"}, "privilegeName": "admin", "allowed": "T"},
                {"wsSubject": {"id": "u2"}, "privilegeName": "view", "allowed": "F"},
                {"wsSubject": {"id": "u3"}, "privilegeName": "groupAttrRead"},
            ]
        });
        let map = privileges(&inner).unwrap();
        assert_eq!(map.len(), 1);
        let granted = &map[&Subject::from_id("u1").unwrap()];
        assert!(granted.contains(&PrivilegeName::Read));
        assert!(granted.contains(&PrivilegeName::Admin));
    }

    #[test]
    fn test_deleted_falls_back_to_request_lookups() {
        let context = DispatchContext::new(
            HttpMethod::Post,
            "groups",
            json!({"WsRestGroupDeleteRequest": {"wsGroupLookups": [{"groupName": "a:x"}, {"groupName": "a:y"}]}}),
        );
        let inner = json!({
            "results": [
                {"wsGroup": {"name": "a:x"}, "resultMetadata": {"resultCode": "SUCCESS"}},
                {"resultMetadata": {"resultCode": "SUCCESS_GROUP_NOT_FOUND"}},
            ]
        });
        let outcomes = deleted(&inner, &context, "wsGroup", "wsGroupLookups", Group::from_json).unwrap();
        assert_eq!(outcomes[1].entity, Group::named("a:y").unwrap());
        assert_eq!(outcomes[1].result_code, ResultCode::SuccessGroupNotFound);
    }
}
