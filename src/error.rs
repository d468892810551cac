//! Error types for Grouper client operations.
//!
//! Failures fall into four families, kept apart so callers can react to each:
//!
//! - **Transport**: the HTTP exchange itself failed, or the service answered with a
//!   status outside the accepted set (200, 201, 500).
//! - **Protocol**: the body was JSON but not an envelope this client understands
//!   (unknown result tag, wrong number of top-level keys, missing entity fields).
//! - **Api**: the service reported `success: "F"`. The [`ApiErrorKind`] is selected
//!   from the service's `resultCode` through a fixed registry.
//! - **Precondition**: the caller passed arguments the operation cannot act on.

use crate::http::HttpMethod;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Main error type for Grouper client operations.
#[derive(Debug, thiserror::Error)]
pub enum GrouperError {
    /// The service answered with a status code outside {200, 201, 500}
    #[error("HTTP {status} returned for {method} {url}")]
    Http {
        method: HttpMethod,
        url: String,
        status: u16,
        headers: Vec<(String, String)>,
        body: String,
    },

    /// The injected HTTP client failed before a response was available
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Well-formed JSON that does not follow the service protocol
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// The service reported a failure for the request
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Invalid arguments supplied by the caller
    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    /// The configured base URL cannot be used
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// A failure reported by the service inside a result envelope.
///
/// Carries everything needed to reconstruct the failing call: the HTTP method and
/// path, the request body that was sent and the complete response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// Kind selected from the reported `resultCode`
    pub kind: ApiErrorKind,
    /// Raw `resultCode` as reported, when present
    pub result_code: Option<String>,
    /// Human-readable `resultMessage`
    pub message: String,
    pub method: HttpMethod,
    pub path: String,
    /// Request body that was sent
    pub input: Value,
    /// Full response envelope that was received
    pub output: Value,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} during {} {}: {}",
            self.kind, self.method, self.path, self.message
        )
    }
}

impl std::error::Error for ApiError {}

/// Registry of service result codes that map to a distinct error kind.
///
/// Codes not listed here map to [`ApiErrorKind::Exception`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorKind {
    ProblemSavingStems,
    ProblemSavingGroups,
    ProblemDeletingGroups,
    ProblemDeletingStems,
    InsufficientPrivileges,
    GroupNotFound,
    StemNotFound,
    SubjectNotFound,
    InvalidQuery,
    /// Generic failure, also used for unregistered result codes
    Exception,
}

impl ApiErrorKind {
    /// Look up the error kind registered for a service result code.
    pub fn from_result_code(code: Option<&str>) -> Self {
        code.and_then(|c| Self::from_str(c).ok())
            .unwrap_or(Self::Exception)
    }

    /// The result code this kind is registered under.
    pub fn result_code(self) -> &'static str {
        self.into()
    }
}

impl GrouperError {
    /// Create a protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create a precondition error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Wrap an error raised by the HTTP client
    pub fn transport<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport(Box::new(error))
    }

    /// The service-reported error, if this is one.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }

    /// True when the service reported a failure of the given kind.
    pub fn is_api_kind(&self, kind: ApiErrorKind) -> bool {
        self.as_api_error().is_some_and(|e| e.kind == kind)
    }
}

pub type GrouperResult<T> = Result<T, GrouperError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    #[test]
    fn test_registry_resolves_known_codes() {
        for kind in ApiErrorKind::iter() {
            assert_eq!(
                ApiErrorKind::from_result_code(Some(kind.result_code())),
                kind
            );
        }
        assert_eq!(
            ApiErrorKind::from_result_code(Some("PROBLEM_DELETING_GROUPS")),
            ApiErrorKind::ProblemDeletingGroups
        );
    }

    #[test]
    fn test_unknown_codes_fall_back_to_exception() {
        assert_eq!(
            ApiErrorKind::from_result_code(Some("SOMETHING_NEW")),
            ApiErrorKind::Exception
        );
        assert_eq!(ApiErrorKind::from_result_code(None), ApiErrorKind::Exception);
        assert_eq!(ApiErrorKind::Exception.result_code(), "EXCEPTION");
    }

    #[test]
    fn test_api_error_display_and_kind() {
        let error = GrouperError::from(ApiError {
            kind: ApiErrorKind::ProblemSavingStems,
            result_code: Some("PROBLEM_SAVING_STEMS".to_string()),
            message: "boom".to_string(),
            method: HttpMethod::Post,
            path: "stems".to_string(),
            input: json!({}),
            output: json!({}),
        });
        assert!(error.is_api_kind(ApiErrorKind::ProblemSavingStems));
        assert!(!error.is_api_kind(ApiErrorKind::Exception));
        let text = error.to_string();
        assert!(text.contains("PROBLEM_SAVING_STEMS"));
        assert!(text.contains("POST stems"));
        assert!(text.contains("boom"));
    }

    #[test]
    fn test_convenience_constructors() {
        assert!(
            GrouperError::precondition("no lookups")
                .to_string()
                .contains("no lookups")
        );
        assert!(matches!(
            GrouperError::protocol("bad tag"),
            GrouperError::Protocol { .. }
        ));
    }
}
