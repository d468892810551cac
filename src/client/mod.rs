//! The public client.
//!
//! [`GrouperClient`] composes a [`Transport`] with request builders for each
//! operation family. Operations are grouped by resource:
//!
//! - `groups`: find, save and delete groups
//! - `stems`: find, save and delete stems
//! - `members`: group members and subject memberships
//! - `privileges`: access and naming privileges
//! - `attributes`: attribute and permission assignments
//! - `cascade`: recursive stem deletion
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use grouper_client::{GrouperClient, GrouperConfig, Group, Subject};
//!
//! # async fn example() -> Result<(), grouper_client::GrouperError> {
//! let config = GrouperConfig::builder()
//!     .base_url("https://grouper.example.org/grouper-ws/")
//!     .credentials("svc-grouper", "secret")
//!     .build()?;
//! let client = GrouperClient::from_config(&config)?;
//!
//! let group = Group::named("org:apps:wiki:editors")?;
//! let results = client
//!     .add_members(&group, &[Subject::from_id("1234567")?], false)
//!     .await?;
//! assert!(results.all_succeeded());
//! # Ok(())
//! # }
//! ```

mod attributes;
mod cascade;
mod groups;
mod members;
mod privileges;
mod stems;

pub use attributes::AttributeTarget;
pub use cascade::{RecursiveDelete, RecursiveDeleteReport};
pub use privileges::PrivilegeTarget;

use crate::config::GrouperConfig;
use crate::error::{GrouperError, GrouperResult};
use crate::http::{HttpClient, ReqwestHttpClient};
use crate::transport::Transport;
use serde_json::{Value, json};

pub(crate) const STEMS_PATH: &str = "stems";
pub(crate) const GROUPS_PATH: &str = "groups";
pub(crate) const MEMBERSHIPS_PATH: &str = "memberships";
pub(crate) const PRIVILEGES_PATH: &str = "grouperPrivileges";
pub(crate) const ATTRIBUTES_PATH: &str = "attributeAssignments";
pub(crate) const PERMISSIONS_PATH: &str = "permissionAssignments";

/// Wrap request fields in their single-key request envelope.
pub(crate) fn envelope(request_name: &str, fields: Value) -> Value {
    json!({ request_name: fields })
}

/// Pair each saved input with a distinct entry of the save response.
///
/// `names[i]` holds the lookup name and own name of input `i`. Own names are tried
/// before lookup names, since the response carries the name after the save. For
/// each, the entry at the input's position wins over an unclaimed entry elsewhere.
/// Inputs left over take the unclaimed entry at their position. No entry is handed
/// out twice.
pub(crate) fn match_saved<T>(
    saved: &[T],
    names: &[(Option<String>, Option<String>)],
    name_of: impl Fn(&T) -> Option<&str>,
) -> Vec<Option<usize>> {
    let mut claimed = vec![false; saved.len()];
    let mut matched: Vec<Option<usize>> = vec![None; names.len()];
    let carries = |candidate: usize, wanted: &str| name_of(&saved[candidate]) == Some(wanted);

    let keys: [fn(&(Option<String>, Option<String>)) -> Option<&str>; 2] =
        [|(_, own)| own.as_deref(), |(lookup, _)| lookup.as_deref()];
    for key in keys {
        for (index, pair) in names.iter().enumerate() {
            let Some(wanted) = key(pair).filter(|_| matched[index].is_none()) else {
                continue;
            };
            if index < saved.len() && !claimed[index] && carries(index, wanted) {
                matched[index] = Some(index);
                claimed[index] = true;
            }
        }
        for (index, pair) in names.iter().enumerate() {
            let Some(wanted) = key(pair).filter(|_| matched[index].is_none()) else {
                continue;
            };
            if let Some(found) =
                (0..saved.len()).find(|&candidate| !claimed[candidate] && carries(candidate, wanted))
            {
                matched[index] = Some(found);
                claimed[found] = true;
            }
        }
    }

    for (index, slot) in matched.iter_mut().enumerate() {
        if slot.is_none() && index < saved.len() && !claimed[index] {
            *slot = Some(index);
            claimed[index] = true;
        }
    }
    matched
}

/// Asynchronous client for the group-management web service.
///
/// The client is cheap to share by reference: every operation takes `&self`, and
/// any number of operations may be in flight at once. Entities are passed in as
/// arguments; save operations borrow them mutably to write back service-assigned
/// identifiers.
#[derive(Debug, Clone)]
pub struct GrouperClient<H = ReqwestHttpClient> {
    transport: Transport<H>,
}

impl GrouperClient<ReqwestHttpClient> {
    /// Create a client using the bundled reqwest HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is invalid or the HTTP client cannot be built.
    pub fn from_config(config: &GrouperConfig) -> GrouperResult<Self> {
        let http = ReqwestHttpClient::from_config(config).map_err(GrouperError::transport)?;
        Self::with_http_client(http, config)
    }
}

impl<H: HttpClient> GrouperClient<H> {
    /// Create a client over an injected HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured base URL is invalid.
    pub fn with_http_client(http: H, config: &GrouperConfig) -> GrouperResult<Self> {
        Ok(Self {
            transport: Transport::new(http, config.api_url()?),
        })
    }

    pub fn transport(&self) -> &Transport<H> {
        &self.transport
    }
}
