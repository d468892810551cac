//! Group find, save and delete.

use super::{GROUPS_PATH, GrouperClient, envelope, match_saved};
use crate::dispatch::{DeleteOutcome, redispatch_suppressed};
use crate::error::{ApiErrorKind, GrouperError, GrouperResult};
use crate::http::HttpClient;
use crate::model::group::Group;
use crate::model::to_save::GroupToSave;
use crate::model::wire::ToJson;
use crate::query::Query;
use log::{debug, warn};
use serde_json::{Value, json};

impl<H: HttpClient> GrouperClient<H> {
    /// Find groups by query or by explicit lookups, exactly one of which must be given.
    ///
    /// An empty lookup list returns an empty result without contacting the service.
    ///
    /// # Errors
    ///
    /// Returns a precondition error when both or neither of `query` and `lookups` are
    /// given, plus any transport, protocol or API error of the call.
    pub async fn find_groups(
        &self,
        query: Option<&Query>,
        lookups: Option<&[Group]>,
    ) -> GrouperResult<Vec<Group>> {
        let fields = match (query, lookups) {
            (Some(query), None) => json!({ "wsQueryFilter": query.to_group_filter() }),
            (None, Some([])) => return Ok(Vec::new()),
            (None, Some(lookups)) => json!({
                "wsGroupLookups": lookups.iter().map(Group::to_lookup_json).collect::<Vec<_>>(),
            }),
            _ => {
                return Err(GrouperError::precondition(
                    "exactly one of query and lookups must be given to find groups",
                ));
            }
        };
        self.transport
            .post(GROUPS_PATH, envelope("WsRestFindGroupsRequest", fields))
            .await?
            .into_groups()
    }

    /// Create or update groups.
    ///
    /// Accepts `&mut Group` (saved with the default mode) and [`GroupToSave`] wrappers.
    /// After a successful save each input group's uuid and name are replaced with the
    /// values the service returned, so the caller's groups are usable right away.
    ///
    /// # Errors
    ///
    /// Returns [`ApiErrorKind::ProblemSavingGroups`] (or another API error) when the
    /// service rejects the batch.
    pub async fn save_groups<'a, I, T>(&self, groups: I) -> GrouperResult<Vec<Group>>
    where
        I: IntoIterator<Item = T>,
        T: Into<GroupToSave<'a>>,
    {
        let mut to_save: Vec<GroupToSave<'a>> = groups.into_iter().map(Into::into).collect();
        if to_save.is_empty() {
            return Ok(Vec::new());
        }

        let request = envelope(
            "WsRestGroupSaveRequest",
            json!({
                "wsGroupToSaves": to_save.iter().map(ToJson::to_json).collect::<Vec<Value>>(),
            }),
        );
        let saved = self.transport.post(GROUPS_PATH, request).await?.into_groups()?;

        let names: Vec<_> = to_save
            .iter()
            .map(|entry| {
                (
                    entry.lookup().name().map(str::to_string),
                    entry.group().name().map(str::to_string),
                )
            })
            .collect();
        let matched = match_saved(&saved, &names, Group::name);
        for (entry, index) in to_save.iter_mut().zip(matched) {
            match index.and_then(|index| saved.get(index)) {
                Some(found) => entry.group_mut().patch_identity(found),
                None => warn!("No saved group returned for {}", entry.group()),
            }
        }
        debug!("Saved {} groups", saved.len());
        Ok(saved)
    }

    /// Save one group, see [`save_groups`](Self::save_groups).
    ///
    /// # Errors
    ///
    /// As `save_groups`, plus a protocol error when the service returns no group.
    pub async fn save_group<'a>(&self, group: impl Into<GroupToSave<'a>>) -> GrouperResult<Group> {
        let to_save: GroupToSave<'a> = group.into();
        self.save_groups([to_save])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GrouperError::protocol("group save returned no group"))
    }

    /// Delete groups, returning the outcome per group.
    ///
    /// When the service reports that it had problems deleting some of the groups,
    /// the partial results it did return are decoded and returned instead of the
    /// error; check [`DeleteOutcome::is_success`] on each entry.
    ///
    /// # Errors
    ///
    /// Transport, protocol and API errors other than problem-deleting-groups.
    pub async fn delete_groups(&self, groups: &[Group]) -> GrouperResult<Vec<DeleteOutcome<Group>>> {
        if groups.is_empty() {
            return Ok(Vec::new());
        }
        let request = envelope(
            "WsRestGroupDeleteRequest",
            json!({
                "wsGroupLookups": groups.iter().map(Group::to_lookup_json).collect::<Vec<_>>(),
            }),
        );
        match self.transport.post(GROUPS_PATH, request).await {
            Ok(body) => body.into_deleted_groups(),
            Err(GrouperError::Api(error)) if error.kind == ApiErrorKind::ProblemDeletingGroups => {
                warn!("Partial failure deleting groups: {}", error.message);
                redispatch_suppressed(&error)?.into_deleted_groups()
            }
            Err(error) => Err(error),
        }
    }
}
