//! Recursive stem deletion.

use super::GrouperClient;
use crate::dispatch::DeleteOutcome;
use crate::error::{GrouperError, GrouperResult};
use crate::http::HttpClient;
use crate::model::enums::StemScope;
use crate::model::group::Group;
use crate::model::stem::Stem;
use crate::query::Query;
use log::info;
use std::slice;

/// Options for [`GrouperClient::recursive_delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecursiveDelete {
    /// Delete the stems directly under the root once its groups are gone
    pub delete_child_stems: bool,
    /// Delete the root stem itself last
    pub delete_self: bool,
}

impl Default for RecursiveDelete {
    fn default() -> Self {
        Self {
            delete_child_stems: true,
            delete_self: false,
        }
    }
}

impl RecursiveDelete {
    /// Delete groups only, leaving every stem in place.
    pub fn groups_only() -> Self {
        Self {
            delete_child_stems: false,
            delete_self: false,
        }
    }

    #[must_use]
    pub fn with_self(mut self, delete_self: bool) -> Self {
        self.delete_self = delete_self;
        self
    }
}

/// What a recursive delete removed, or tried to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecursiveDeleteReport {
    pub groups: Vec<DeleteOutcome<Group>>,
    /// Child stems first, then the root stem when it was included
    pub stems: Vec<DeleteOutcome<Stem>>,
}

impl RecursiveDeleteReport {
    /// True when every attempted deletion succeeded.
    pub fn is_complete(&self) -> bool {
        self.groups.iter().all(DeleteOutcome::is_success)
            && self.stems.iter().all(DeleteOutcome::is_success)
    }
}

impl<H: HttpClient> GrouperClient<H> {
    /// Delete everything under a stem.
    ///
    /// Runs three phases: every group anywhere below the stem, then (unless
    /// [`RecursiveDelete::delete_child_stems`] is off) the stems directly below it,
    /// then (with [`RecursiveDelete::delete_self`]) the stem itself. A service report
    /// that only some entries could be deleted does not stop later phases; the
    /// outcome of every entry is in the returned report.
    ///
    /// # Errors
    ///
    /// Returns a precondition error when a stem given by uuid alone cannot be found,
    /// and any error other than the problem-deleting kinds.
    pub async fn recursive_delete(
        &self,
        stem: &Stem,
        options: RecursiveDelete,
    ) -> GrouperResult<RecursiveDeleteReport> {
        let root = match stem.name() {
            Some(_) => stem.clone(),
            None => self
                .find_stems(None, Some(slice::from_ref(stem)))
                .await?
                .into_iter()
                .find(|found| found.name().is_some())
                .ok_or_else(|| GrouperError::precondition(format!("{stem} not found")))?,
        };
        let Some(name) = root.name() else {
            return Err(GrouperError::precondition(format!("{stem} has no name")));
        };

        let mut report = RecursiveDeleteReport::default();

        let groups = self
            .find_groups(
                Some(&Query::find_by_stem_name(name, StemScope::AllInSubtree)),
                None,
            )
            .await?;
        info!("Deleting {} groups under {name}", groups.len());
        report.groups = self.delete_groups(&groups).await?;

        if options.delete_child_stems {
            let children: Vec<Stem> = self
                .find_stems(
                    Some(&Query::find_by_parent_stem_name(name, StemScope::OneLevel)),
                    None,
                )
                .await?
                .into_iter()
                .filter(|child| child != &root)
                .collect();
            info!("Deleting {} stems under {name}", children.len());
            report.stems = self.delete_stems(&children).await?;
        }

        if options.delete_self {
            info!("Deleting stem {name}");
            report
                .stems
                .extend(self.delete_stems(slice::from_ref(&root)).await?);
        }
        Ok(report)
    }
}
