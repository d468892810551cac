//! Client configuration.
//!
//! A [`GrouperConfig`] names the service (base URL and web-service API version) and
//! carries the settings the bundled HTTP client applies to every exchange. The
//! effective endpoint root is `base_url + "servicesRest/" + api_version + "/"`.
//!
//! ```rust
//! use grouper_client::GrouperConfig;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GrouperConfig::builder()
//!     .base_url("https://grouper.example.org/grouper-ws/")
//!     .credentials("GrouperSystem", "secret")
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//!
//! assert_eq!(
//!     config.api_url()?.as_str(),
//!     "https://grouper.example.org/grouper-ws/servicesRest/v2_2_000/"
//! );
//! # Ok(())
//! # }
//! ```

use crate::error::{GrouperError, GrouperResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Web-service API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "v2_2_000";

/// HTTP basic-auth credentials for the service account.
///
/// The password is never serialized.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Configuration for a Grouper client.
///
/// Deserializes from any serde format; missing fields take their defaults and the
/// timeout is given in whole seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrouperConfig {
    /// Base URL of the web-service deployment.
    /// Example: "https://grouper.example.org/grouper-ws/"
    pub base_url: String,

    /// Web-service API version segment. Defaults to [`DEFAULT_API_VERSION`].
    pub api_version: String,

    /// Basic-auth credentials applied by the bundled HTTP client.
    pub credentials: Option<Credentials>,

    /// Per-request timeout applied by the bundled HTTP client. `None` waits forever.
    #[serde(with = "duration_option_serde")]
    pub timeout: Option<Duration>,

    /// User-Agent header sent by the bundled HTTP client.
    pub user_agent: String,
}

impl Default for GrouperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost/grouper-ws/".to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            credentials: None,
            timeout: None,
            user_agent: concat!("grouper-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl GrouperConfig {
    /// Configuration for the given base URL with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Start building a configuration.
    pub fn builder() -> GrouperConfigBuilder {
        GrouperConfigBuilder::default()
    }

    /// The endpoint root all operation paths are resolved against.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or cannot carry a path.
    pub fn api_url(&self) -> GrouperResult<Url> {
        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let url = Url::parse(&base)?;
        if url.cannot_be_a_base() {
            return Err(GrouperError::precondition(format!(
                "base URL '{}' cannot carry a path",
                self.base_url
            )));
        }

        let version = self.api_version.trim_matches('/');
        if version.is_empty() {
            return Err(GrouperError::precondition("API version must not be empty"));
        }
        Ok(url.join(&format!("servicesRest/{version}/"))?)
    }
}

/// Builder for [`GrouperConfig`].
#[derive(Debug, Clone, Default)]
pub struct GrouperConfigBuilder {
    config: GrouperConfig,
}

impl GrouperConfigBuilder {
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.config.api_version = api_version.into();
        self
    }

    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Some(Credentials::new(username, password));
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Validate and return the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting endpoint URL cannot be formed.
    pub fn build(self) -> GrouperResult<GrouperConfig> {
        self.config.api_url()?;
        Ok(self.config)
    }
}

/// Serde module for `Option<Duration>` as whole seconds.
mod duration_option_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.map(|d| d.as_secs()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}
