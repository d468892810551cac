//! Async client library for the Grouper group-management web service.
//!
//! Talks to the service's JSON-over-HTTP REST protocol and exposes groups, stems,
//! subjects, memberships, privileges and attribute assignments as typed values.
//!
//! # Core Components
//!
//! - [`GrouperClient`] - Domain operations (find, save, delete, membership, privileges)
//! - [`Transport`] - One generic request/response cycle against the endpoint
//! - [`dispatch`] - Decodes result envelopes and raises typed [`ApiError`]s
//! - [`HttpClient`] - Injectable HTTP boundary, with reqwest and scripted implementations
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use grouper_client::{GrouperClient, GrouperConfig, Query, StemScope};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GrouperConfig::new("https://grouper.example.org/grouper-ws/");
//! let client = GrouperClient::from_config(&config)?;
//!
//! let query = Query::find_by_stem_name("org:apps", StemScope::AllInSubtree);
//! for group in client.find_groups(Some(&query), None).await? {
//!     println!("{group}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod model;
pub mod query;
pub mod transport;

// Re-export commonly used types for convenience
pub use client::{
    AttributeTarget, GrouperClient, PrivilegeTarget, RecursiveDelete, RecursiveDeleteReport,
};
pub use config::{Credentials, DEFAULT_API_VERSION, GrouperConfig, GrouperConfigBuilder};
pub use dispatch::{
    DeleteOutcome, DispatchContext, DispatchMode, MemberResults, MembershipListing, ResponseBody,
    ResponseKind,
};
pub use error::{ApiError, ApiErrorKind, GrouperError, GrouperResult};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use model::{
    Attribute, AttributeAssignOperation, AttributeAssignType, Composite, CompositeType,
    FieldType, Group, GroupToSave, Identity, MemberFilter, Membership, MembershipTarget,
    PermissionAssignment, PrivilegeName, PrivilegeType, ResultCode, SaveMode, Stem, StemScope,
    StemToSave, Subject, ToJson,
};
pub use query::Query;
pub use transport::{RequestBody, Transport};
