//! Stem find, save and delete.

use super::{GrouperClient, STEMS_PATH, envelope, match_saved};
use crate::dispatch::{DeleteOutcome, redispatch_suppressed};
use crate::error::{ApiErrorKind, GrouperError, GrouperResult};
use crate::http::HttpClient;
use crate::model::stem::Stem;
use crate::model::to_save::StemToSave;
use crate::model::wire::ToJson;
use crate::query::Query;
use log::{debug, warn};
use serde_json::{Value, json};

impl<H: HttpClient> GrouperClient<H> {
    /// Find stems by query or by explicit lookups, exactly one of which must be given.
    ///
    /// An empty lookup list returns an empty result without contacting the service.
    ///
    /// # Errors
    ///
    /// Returns a precondition error when both or neither are given.
    pub async fn find_stems(
        &self,
        query: Option<&Query>,
        lookups: Option<&[Stem]>,
    ) -> GrouperResult<Vec<Stem>> {
        let fields = match (query, lookups) {
            (Some(query), None) => json!({ "wsStemQueryFilter": query.to_stem_filter() }),
            (None, Some([])) => return Ok(Vec::new()),
            (None, Some(lookups)) => json!({
                "wsStemLookups": lookups.iter().map(Stem::to_lookup_json).collect::<Vec<_>>(),
            }),
            _ => {
                return Err(GrouperError::precondition(
                    "exactly one of query and lookups must be given to find stems",
                ));
            }
        };
        self.transport
            .post(STEMS_PATH, envelope("WsRestFindStemsRequest", fields))
            .await?
            .into_stems()
    }

    /// Create or update stems, writing service-assigned uuids and names back into
    /// the caller's stems. See [`save_groups`](Self::save_groups).
    ///
    /// # Errors
    ///
    /// Returns [`ApiErrorKind::ProblemSavingStems`] (or another API error) when the
    /// service rejects the batch.
    pub async fn save_stems<'a, I, T>(&self, stems: I) -> GrouperResult<Vec<Stem>>
    where
        I: IntoIterator<Item = T>,
        T: Into<StemToSave<'a>>,
    {
        let mut to_save: Vec<StemToSave<'a>> = stems.into_iter().map(Into::into).collect();
        if to_save.is_empty() {
            return Ok(Vec::new());
        }

        let request = envelope(
            "WsRestStemSaveRequest",
            json!({
                "wsStemToSaves": to_save.iter().map(ToJson::to_json).collect::<Vec<Value>>(),
            }),
        );
        let saved = self.transport.post(STEMS_PATH, request).await?.into_stems()?;

        let names: Vec<_> = to_save
            .iter()
            .map(|entry| {
                (
                    entry.lookup().name().map(str::to_string),
                    entry.stem().name().map(str::to_string),
                )
            })
            .collect();
        let matched = match_saved(&saved, &names, Stem::name);
        for (entry, index) in to_save.iter_mut().zip(matched) {
            match index.and_then(|index| saved.get(index)) {
                Some(found) => entry.stem_mut().patch_identity(found),
                None => warn!("No saved stem returned for {}", entry.stem()),
            }
        }
        debug!("Saved {} stems", saved.len());
        Ok(saved)
    }

    /// Save one stem.
    ///
    /// # Errors
    ///
    /// As [`save_stems`](Self::save_stems), plus a protocol error when the service
    /// returns no stem.
    pub async fn save_stem<'a>(&self, stem: impl Into<StemToSave<'a>>) -> GrouperResult<Stem> {
        let to_save: StemToSave<'a> = stem.into();
        self.save_stems([to_save])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GrouperError::protocol("stem save returned no stem"))
    }

    /// Delete stems, recovering partial results on problem-deleting-stems.
    ///
    /// # Errors
    ///
    /// Transport, protocol and API errors other than problem-deleting-stems.
    pub async fn delete_stems(&self, stems: &[Stem]) -> GrouperResult<Vec<DeleteOutcome<Stem>>> {
        if stems.is_empty() {
            return Ok(Vec::new());
        }
        let request = envelope(
            "WsRestStemDeleteRequest",
            json!({
                "wsStemLookups": stems.iter().map(Stem::to_lookup_json).collect::<Vec<_>>(),
            }),
        );
        match self.transport.post(STEMS_PATH, request).await {
            Ok(body) => body.into_deleted_stems(),
            Err(GrouperError::Api(error)) if error.kind == ApiErrorKind::ProblemDeletingStems => {
                warn!("Partial failure deleting stems: {}", error.message);
                redispatch_suppressed(&error)?.into_deleted_stems()
            }
            Err(error) => Err(error),
        }
    }
}
