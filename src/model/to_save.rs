//! Save wrappers pairing an entity with how it should be persisted.
//!
//! A wrapper borrows the caller's entity mutably so that a save call can write the
//! uuid and canonical name the service assigned back into it.

use crate::model::enums::SaveMode;
use crate::model::group::Group;
use crate::model::stem::Stem;
use crate::model::wire::{ToJson, bool_to_str};
use serde_json::{Value, json};

/// A group to save, with an optional lookup naming the record to update.
#[derive(Debug)]
pub struct GroupToSave<'a> {
    group: &'a mut Group,
    lookup: Option<Group>,
    save_mode: SaveMode,
    create_parent_stems: bool,
}

impl<'a> GroupToSave<'a> {
    pub fn new(group: &'a mut Group) -> Self {
        Self {
            group,
            lookup: None,
            save_mode: SaveMode::default(),
            create_parent_stems: false,
        }
    }

    /// Identify the remote record separately from the new field values, e.g. to rename.
    #[must_use]
    pub fn with_lookup(mut self, lookup: Group) -> Self {
        self.lookup = Some(lookup);
        self
    }

    #[must_use]
    pub fn with_save_mode(mut self, save_mode: SaveMode) -> Self {
        self.save_mode = save_mode;
        self
    }

    #[must_use]
    pub fn create_parent_stems_if_not_exist(mut self, create: bool) -> Self {
        self.create_parent_stems = create;
        self
    }

    /// The lookup sent to the service: the explicit one, or the group itself.
    pub fn lookup(&self) -> &Group {
        self.lookup.as_ref().unwrap_or(self.group)
    }

    pub fn save_mode(&self) -> SaveMode {
        self.save_mode
    }

    pub fn group(&self) -> &Group {
        self.group
    }

    pub(crate) fn group_mut(&mut self) -> &mut Group {
        self.group
    }
}

impl<'a> From<&'a mut Group> for GroupToSave<'a> {
    fn from(group: &'a mut Group) -> Self {
        Self::new(group)
    }
}

impl ToJson for GroupToSave<'_> {
    fn to_json(&self) -> Value {
        json!({
            "wsGroup": self.group.to_json(),
            "wsGroupLookup": self.lookup().to_lookup_json(),
            "saveMode": self.save_mode.as_ref(),
            "createParentStemsIfNotExist": bool_to_str(self.create_parent_stems),
        })
    }
}

/// A stem to save, with an optional lookup naming the record to update.
#[derive(Debug)]
pub struct StemToSave<'a> {
    stem: &'a mut Stem,
    lookup: Option<Stem>,
    save_mode: SaveMode,
    create_parent_stems: bool,
}

impl<'a> StemToSave<'a> {
    pub fn new(stem: &'a mut Stem) -> Self {
        Self {
            stem,
            lookup: None,
            save_mode: SaveMode::default(),
            create_parent_stems: false,
        }
    }

    #[must_use]
    pub fn with_lookup(mut self, lookup: Stem) -> Self {
        self.lookup = Some(lookup);
        self
    }

    #[must_use]
    pub fn with_save_mode(mut self, save_mode: SaveMode) -> Self {
        self.save_mode = save_mode;
        self
    }

    #[must_use]
    pub fn create_parent_stems_if_not_exist(mut self, create: bool) -> Self {
        self.create_parent_stems = create;
        self
    }

    pub fn lookup(&self) -> &Stem {
        self.lookup.as_ref().unwrap_or(self.stem)
    }

    pub fn save_mode(&self) -> SaveMode {
        self.save_mode
    }

    pub fn stem(&self) -> &Stem {
        self.stem
    }

    pub(crate) fn stem_mut(&mut self) -> &mut Stem {
        self.stem
    }
}

impl<'a> From<&'a mut Stem> for StemToSave<'a> {
    fn from(stem: &'a mut Stem) -> Self {
        Self::new(stem)
    }
}

impl ToJson for StemToSave<'_> {
    fn to_json(&self) -> Value {
        json!({
            "wsStem": self.stem.to_json(),
            "wsStemLookup": self.lookup().to_lookup_json(),
            "saveMode": self.save_mode.as_ref(),
            "createParentStemsIfNotExist": bool_to_str(self.create_parent_stems),
        })
    }
}
