//! Response dispatcher.
//!
//! Every service response is a single-key envelope: `{"<ResultTypeName>": {...}}`.
//! The dispatcher checks the embedded `resultMetadata.success` flag, turns a failure
//! into a typed [`ApiError`], and otherwise selects a decoder from the result type
//! name. The set of known names is the closed [`ResponseKind`] enum, so adding a
//! shape means adding a variant and the compiler points at every match to extend.

mod decoders;

use crate::error::{ApiError, ApiErrorKind, GrouperError, GrouperResult};
use crate::http::HttpMethod;
use crate::model::enums::{PrivilegeName, ResultCode};
use crate::model::group::Group;
use crate::model::membership::{Membership, MembershipTarget};
use crate::model::stem::Stem;
use crate::model::subject::Subject;
use crate::model::wire::{opt_flag, opt_str};
use log::{debug, trace};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The request a response belongs to, attached to API errors for diagnosis.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchContext {
    pub method: HttpMethod,
    pub path: String,
    /// Request body as sent, `Value::Null` when there was none
    pub input: Value,
}

impl DispatchContext {
    pub fn new(method: HttpMethod, path: impl Into<String>, input: Value) -> Self {
        Self {
            method,
            path: path.into(),
            input,
        }
    }

    /// Context of the request an API error was raised for.
    pub fn from_api_error(error: &ApiError) -> Self {
        Self::new(error.method, error.path.clone(), error.input.clone())
    }

    /// An array field of the request body, looked up under its single envelope key.
    pub(crate) fn request_array(&self, key: &str) -> &[Value] {
        self.input
            .as_object()
            .and_then(|envelope| envelope.values().next())
            .and_then(|request| request.get(key))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Whether a `success: "F"` envelope raises or is decoded anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    #[default]
    Strict,
    /// Decode whatever partial results a failed response carries.
    SuppressErrors,
}

/// Result type names the dispatcher knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
pub enum ResponseKind {
    #[strum(serialize = "WsHasMemberResults")]
    HasMember,
    #[strum(serialize = "WsGetMembershipsResults")]
    GetMemberships,
    #[strum(serialize = "WsFindStemsResults")]
    FindStems,
    #[strum(serialize = "WsFindGroupsResults")]
    FindGroups,
    #[strum(serialize = "WsGroupSaveResults")]
    GroupSave,
    #[strum(serialize = "WsStemSaveResults")]
    StemSave,
    #[strum(serialize = "WsGetMembersResults")]
    GetMembers,
    #[strum(serialize = "WsGetGrouperPrivilegesLiteResult")]
    GetPrivileges,
    #[strum(serialize = "WsAssignGrouperPrivilegesLiteResult")]
    AssignPrivileges,
    #[strum(serialize = "WsAddMemberResults")]
    AddMember,
    #[strum(serialize = "WsDeleteMemberResults")]
    DeleteMember,
    #[strum(serialize = "WsGroupDeleteResults")]
    GroupDelete,
    #[strum(serialize = "WsStemDeleteResults")]
    StemDelete,
    #[strum(serialize = "WsAssignAttributesResults")]
    AssignAttributes,
    #[strum(serialize = "WsAssignPermissionsResults")]
    AssignPermissions,
}

/// Per-subject outcome of an add-member or delete-member call, in request order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberResults(Vec<(Subject, ResultCode)>);

impl MemberResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, subject: Subject, code: ResultCode) {
        self.0.push((subject, code));
    }

    /// Outcome reported for a subject.
    pub fn get(&self, subject: &Subject) -> Option<ResultCode> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate == subject)
            .map(|(_, code)| *code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Subject, ResultCode)> {
        self.0.iter()
    }

    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.0.iter().map(|(subject, _)| subject)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every entry reported a success code.
    pub fn all_succeeded(&self) -> bool {
        self.0.iter().all(|(_, code)| code.is_success())
    }
}

impl IntoIterator for MemberResults {
    type Item = (Subject, ResultCode);
    type IntoIter = std::vec::IntoIter<(Subject, ResultCode)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Decoded membership listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MembershipListing {
    /// Every membership record, in response order
    pub memberships: Vec<Membership>,
    /// Groups and stems each subject is a member of
    pub by_subject: HashMap<Subject, HashSet<MembershipTarget>>,
}

impl MembershipListing {
    /// Targets a subject is a member of, empty when it has none.
    pub fn targets_of(&self, subject: &Subject) -> HashSet<MembershipTarget> {
        self.by_subject.get(subject).cloned().unwrap_or_default()
    }
}

/// One entry of a group or stem delete result.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome<T> {
    pub entity: T,
    pub result_code: ResultCode,
}

impl<T> DeleteOutcome<T> {
    pub fn is_success(&self) -> bool {
        self.result_code.is_success()
    }
}

/// Typed result of a dispatched response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    HasMember(HashMap<Subject, bool>),
    Memberships(MembershipListing),
    Stems(Vec<Stem>),
    Groups(Vec<Group>),
    SavedGroups(Vec<Group>),
    SavedStems(Vec<Stem>),
    Members(Vec<Subject>),
    Privileges(HashMap<Subject, HashSet<PrivilegeName>>),
    MemberResults(MemberResults),
    DeletedGroups(Vec<DeleteOutcome<Group>>),
    DeletedStems(Vec<DeleteOutcome<Stem>>),
    /// Results returned without further typing
    Raw(ResponseKind, Value),
}

impl ResponseBody {
    fn variant_name(&self) -> &'static str {
        match self {
            Self::HasMember(_) => "has-member",
            Self::Memberships(_) => "memberships",
            Self::Stems(_) => "stems",
            Self::Groups(_) => "groups",
            Self::SavedGroups(_) => "saved groups",
            Self::SavedStems(_) => "saved stems",
            Self::Members(_) => "members",
            Self::Privileges(_) => "privileges",
            Self::MemberResults(_) => "member results",
            Self::DeletedGroups(_) => "deleted groups",
            Self::DeletedStems(_) => "deleted stems",
            Self::Raw(..) => "raw",
        }
    }

    fn mismatch(self, expected: &str) -> GrouperError {
        GrouperError::protocol(format!(
            "expected {expected} results, got {}",
            self.variant_name()
        ))
    }

    pub fn into_has_member(self) -> GrouperResult<HashMap<Subject, bool>> {
        match self {
            Self::HasMember(map) => Ok(map),
            other => Err(other.mismatch("has-member")),
        }
    }

    pub fn into_memberships(self) -> GrouperResult<MembershipListing> {
        match self {
            Self::Memberships(listing) => Ok(listing),
            other => Err(other.mismatch("memberships")),
        }
    }

    /// Groups from a find or a save.
    pub fn into_groups(self) -> GrouperResult<Vec<Group>> {
        match self {
            Self::Groups(groups) | Self::SavedGroups(groups) => Ok(groups),
            other => Err(other.mismatch("groups")),
        }
    }

    /// Stems from a find or a save.
    pub fn into_stems(self) -> GrouperResult<Vec<Stem>> {
        match self {
            Self::Stems(stems) | Self::SavedStems(stems) => Ok(stems),
            other => Err(other.mismatch("stems")),
        }
    }

    pub fn into_members(self) -> GrouperResult<Vec<Subject>> {
        match self {
            Self::Members(members) => Ok(members),
            other => Err(other.mismatch("members")),
        }
    }

    pub fn into_privileges(self) -> GrouperResult<HashMap<Subject, HashSet<PrivilegeName>>> {
        match self {
            Self::Privileges(privileges) => Ok(privileges),
            other => Err(other.mismatch("privileges")),
        }
    }

    pub fn into_member_results(self) -> GrouperResult<MemberResults> {
        match self {
            Self::MemberResults(results) => Ok(results),
            other => Err(other.mismatch("member")),
        }
    }

    pub fn into_deleted_groups(self) -> GrouperResult<Vec<DeleteOutcome<Group>>> {
        match self {
            Self::DeletedGroups(outcomes) => Ok(outcomes),
            other => Err(other.mismatch("group delete")),
        }
    }

    pub fn into_deleted_stems(self) -> GrouperResult<Vec<DeleteOutcome<Stem>>> {
        match self {
            Self::DeletedStems(outcomes) => Ok(outcomes),
            other => Err(other.mismatch("stem delete")),
        }
    }

    pub fn into_raw(self) -> GrouperResult<Value> {
        match self {
            Self::Raw(_, value) => Ok(value),
            other => Err(other.mismatch("raw")),
        }
    }
}

/// Split an envelope into its result type name and body.
///
/// # Errors
///
/// Returns a protocol error unless the envelope is an object with exactly one key.
pub fn unwrap_envelope(envelope: &Value) -> GrouperResult<(&str, &Value)> {
    let object = envelope
        .as_object()
        .ok_or_else(|| GrouperError::protocol(format!("response is not an object: {envelope}")))?;
    let mut entries = object.iter();
    match (entries.next(), entries.next()) {
        (Some((name, inner)), None) => Ok((name.as_str(), inner)),
        _ => Err(GrouperError::protocol(format!(
            "expected exactly one top-level key in response, found {}",
            object.len()
        ))),
    }
}

/// Decode a response envelope into a typed result.
///
/// # Errors
///
/// - [`GrouperError::Api`] when the envelope reports `success: "F"` in
///   [`DispatchMode::Strict`]
/// - [`GrouperError::Protocol`] for malformed envelopes and unknown result names
pub fn dispatch(
    context: &DispatchContext,
    envelope: &Value,
    mode: DispatchMode,
) -> GrouperResult<ResponseBody> {
    let (name, inner) = unwrap_envelope(envelope)?;
    let metadata = inner.get("resultMetadata").unwrap_or(&Value::Null);

    if opt_flag(metadata, "success") == Some(false) {
        let result_code = opt_str(metadata, "resultCode");
        let kind = ApiErrorKind::from_result_code(result_code.as_deref());
        match mode {
            DispatchMode::Strict => {
                debug!(
                    "{name} reported failure {kind} for {} {}",
                    context.method, context.path
                );
                return Err(ApiError {
                    kind,
                    result_code,
                    message: opt_str(metadata, "resultMessage").unwrap_or_default(),
                    method: context.method,
                    path: context.path.clone(),
                    input: context.input.clone(),
                    output: envelope.clone(),
                }
                .into());
            }
            DispatchMode::SuppressErrors => {
                trace!("Decoding failed {name} ({kind}) for partial results");
            }
        }
    }

    let kind = ResponseKind::from_str(name)
        .map_err(|_| GrouperError::protocol(format!("unknown response shape {name}")))?;
    decoders::decode(kind, inner, context)
}

/// Re-decode the response attached to an API error, ignoring its failure flag.
///
/// # Errors
///
/// Returns a protocol error when the attached response cannot be decoded.
pub fn redispatch_suppressed(error: &ApiError) -> GrouperResult<ResponseBody> {
    dispatch(
        &DispatchContext::from_api_error(error),
        &error.output,
        DispatchMode::SuppressErrors,
    )
}
