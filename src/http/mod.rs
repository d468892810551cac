//! HTTP boundary consumed by the transport layer.
//!
//! The client library never talks to the network directly. Every exchange goes
//! through an [`HttpClient`] implementation, which owns connection pooling,
//! TLS, timeouts and authentication. Two implementations ship with the crate:
//!
//! - [`ReqwestHttpClient`] for production use
//! - [`ScriptedHttpClient`] which replays canned responses, for tests
//!
//! # Example Usage
//!
//! ```rust
//! use grouper_client::http::{HttpClient, HttpMethod, HttpRequest, ScriptedHttpClient};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let http = ScriptedHttpClient::new();
//! http.push_json(200, json!({"WsFindGroupsResults": {}})).await;
//!
//! let url = "https://grouper.example.org/grouper-ws/servicesRest/v2_2_000/groups".parse()?;
//! let response = http.send(HttpRequest::new(HttpMethod::Post, url)).await?;
//! assert_eq!(response.status, 200);
//! # Ok(())
//! # }
//! ```

pub mod reqwest_client;
pub mod scripted;

pub use reqwest_client::ReqwestHttpClient;
pub use scripted::{ScriptedHttpClient, ScriptedHttpError};

use serde_json::Value;
use std::fmt;
use std::future::Future;
use url::Url;

/// Content type the service expects on JSON request bodies.
pub const CONTENT_TYPE_JSON: &str = "text/x-json";

/// HTTP methods used by the service protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-resolved request handed to the HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    /// Serialized JSON payload, if any
    pub body: Option<String>,
}

impl HttpRequest {
    /// Create a request without headers or body.
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a serialized body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// The body parsed back into JSON, for inspection in tests and logs.
    pub fn json_body(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

/// A response whose body has been read in full.
///
/// The body is owned, so the underlying connection has already been handed back
/// to the client by the time a transport sees this value.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// A response carrying a JSON document.
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string())],
            body: body.to_string().into_bytes(),
        }
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Add a response header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Injectable HTTP client.
///
/// Implementations must read the complete response body before resolving, and must
/// not retry on their own: the client library surfaces every failure immediately.
/// Dropping the returned future cancels the exchange and releases the connection.
pub trait HttpClient: Send + Sync {
    /// The error type returned when no response could be obtained.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Perform one HTTP exchange.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_names() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Put.as_str(), "PUT");
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let url = Url::parse("https://grouper.example.org/").unwrap();
        let request = HttpRequest::new(HttpMethod::Get, url)
            .with_header("Content-Type", CONTENT_TYPE_JSON)
            .with_body("{\"a\":1}");
        assert_eq!(request.header("content-type"), Some(CONTENT_TYPE_JSON));
        assert_eq!(request.json_body(), Some(json!({"a": 1})));
    }

    #[test]
    fn test_json_response() {
        let response = HttpResponse::json(201, &json!({"ok": "T"}));
        assert_eq!(response.status, 201);
        assert_eq!(response.header("CONTENT-TYPE"), Some(CONTENT_TYPE_JSON));
        assert_eq!(response.text(), "{\"ok\":\"T\"}");
    }
}
