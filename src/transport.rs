//! Generic request/response cycle against the service endpoint.
//!
//! [`Transport::request`] serializes the body, sends it through the injected
//! [`HttpClient`], checks the status code, decodes the JSON envelope and hands it
//! to the [dispatcher](crate::dispatch). Statuses 200, 201 and 500 all reach the
//! dispatcher because the service reports some application failures with a 500.

use crate::dispatch::{DispatchContext, DispatchMode, ResponseBody, dispatch};
use crate::error::{GrouperError, GrouperResult};
use crate::http::{CONTENT_TYPE_JSON, HttpClient, HttpMethod, HttpRequest};
use crate::model::wire::ToJson;
use log::{debug, trace};
use serde_json::Value;
use std::time::Instant;
use url::Url;

/// Status codes whose bodies are handed to the dispatcher.
pub const ACCEPTED_STATUSES: [u16; 3] = [200, 201, 500];

/// A request payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
}

impl RequestBody {
    /// The body as a JSON value, `Null` when empty.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Json(value) => value.clone(),
        }
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl<T: ToJson> From<&T> for RequestBody {
    fn from(entity: &T) -> Self {
        Self::Json(entity.to_json())
    }
}

/// Issues requests against the service endpoint through an [`HttpClient`].
#[derive(Debug, Clone)]
pub struct Transport<H> {
    http: H,
    api_url: Url,
}

impl<H: HttpClient> Transport<H> {
    /// `api_url` is the endpoint root, e.g. `https://host/grouper-ws/servicesRest/v2_2_000/`.
    pub fn new(http: H, api_url: Url) -> Self {
        Self { http, api_url }
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Resolve an operation path such as `groups/a:b/members` against the endpoint.
    ///
    /// # Errors
    ///
    /// Returns a precondition error when the endpoint URL cannot carry a path.
    pub fn url_for(&self, path: &str) -> GrouperResult<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| GrouperError::precondition(format!("{} cannot carry a path", self.api_url)))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    /// Send one request and dispatch the response in strict mode.
    ///
    /// # Errors
    ///
    /// - [`GrouperError::Transport`] when the HTTP client fails
    /// - [`GrouperError::Http`] for statuses outside [`ACCEPTED_STATUSES`]
    /// - [`GrouperError::Json`] when the body is not JSON
    /// - whatever [`dispatch`] raises
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: impl Into<RequestBody>,
    ) -> GrouperResult<ResponseBody> {
        let body = body.into();
        let url = self.url_for(path)?;
        let mut request =
            HttpRequest::new(method, url.clone()).with_header("Content-Type", CONTENT_TYPE_JSON);
        if let RequestBody::Json(value) = &body {
            let serialized = serde_json::to_string(value)?;
            trace!("{method} {url} request body: {serialized}");
            request = request.with_body(serialized);
        }

        let started = Instant::now();
        let response = self
            .http
            .send(request)
            .await
            .map_err(GrouperError::transport)?;
        debug!(
            "{method} {url} -> {} in {:?}",
            response.status,
            started.elapsed()
        );
        trace!("{method} {url} response headers: {:?}", response.headers);
        trace!("{method} {url} response body: {}", response.text());

        if !ACCEPTED_STATUSES.contains(&response.status) {
            return Err(GrouperError::Http {
                method,
                url: url.to_string(),
                status: response.status,
                body: response.text(),
                headers: response.headers,
            });
        }

        let envelope: Value = serde_json::from_slice(&response.body)?;
        let context = DispatchContext::new(method, path, body.to_value());
        dispatch(&context, &envelope, DispatchMode::Strict)
    }

    pub async fn get(&self, path: &str) -> GrouperResult<ResponseBody> {
        self.request(HttpMethod::Get, path, RequestBody::Empty).await
    }

    pub async fn post(&self, path: &str, body: impl Into<RequestBody>) -> GrouperResult<ResponseBody> {
        self.request(HttpMethod::Post, path, body).await
    }

    pub async fn put(&self, path: &str, body: impl Into<RequestBody>) -> GrouperResult<ResponseBody> {
        self.request(HttpMethod::Put, path, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, ScriptedHttpClient};
    use serde_json::json;

    fn transport(http: ScriptedHttpClient) -> Transport<ScriptedHttpClient> {
        let api_url = Url::parse("https://grouper.example.org/ws/servicesRest/v2_2_000/").unwrap();
        Transport::new(http, api_url)
    }

    #[test]
    fn test_url_for_appends_segments() {
        let transport = transport(ScriptedHttpClient::new());
        assert_eq!(
            transport.url_for("groups/org:apps/members").unwrap().as_str(),
            "https://grouper.example.org/ws/servicesRest/v2_2_000/groups/org:apps/members"
        );
        assert_eq!(
            transport.url_for("stems").unwrap().as_str(),
            "https://grouper.example.org/ws/servicesRest/v2_2_000/stems"
        );
    }

    #[tokio::test]
    async fn test_request_sends_json_with_content_type() {
        let http = ScriptedHttpClient::new();
        http.push_json(200, json!({"WsFindGroupsResults": {"resultMetadata": {"success": "T"}}}))
            .await;
        let transport = transport(http.clone());

        let groups = transport
            .post("groups", json!({"WsRestFindGroupsRequest": {}}))
            .await
            .unwrap()
            .into_groups()
            .unwrap();
        assert!(groups.is_empty());

        let requests = http.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].header("content-type"), Some(CONTENT_TYPE_JSON));
        assert_eq!(
            requests[0].json_body(),
            Some(json!({"WsRestFindGroupsRequest": {}}))
        );
    }

    #[tokio::test]
    async fn test_500_reaches_dispatcher() {
        let http = ScriptedHttpClient::new();
        http.push_json(
            500,
            json!({"WsStemSaveResults": {"resultMetadata": {"success": "F", "resultCode": "PROBLEM_SAVING_STEMS"}}}),
        )
        .await;
        let err = transport(http).post("stems", json!({})).await.unwrap_err();
        assert!(err.is_api_kind(crate::error::ApiErrorKind::ProblemSavingStems));
    }

    #[tokio::test]
    async fn test_rejected_status_is_http_error() {
        let http = ScriptedHttpClient::new();
        http.push_response(
            HttpResponse::new(404, "not here").with_header("X-Request-Id", "req-42"),
        )
        .await;
        let err = transport(http).get("stems").await.unwrap_err();
        match err {
            GrouperError::Http { status, body, method, headers, .. } => {
                assert_eq!(status, 404);
                assert_eq!(body, "not here");
                assert_eq!(method, HttpMethod::Get);
                assert_eq!(headers, vec![("X-Request-Id".to_string(), "req-42".to_string())]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let http = ScriptedHttpClient::new();
        http.push_response(HttpResponse::new(200, "<html>")).await;
        let err = transport(http).get("stems").await.unwrap_err();
        assert!(matches!(err, GrouperError::Json(_)));
    }

    #[tokio::test]
    async fn test_client_failure_is_transport_error() {
        let err = transport(ScriptedHttpClient::new())
            .get("stems")
            .await
            .unwrap_err();
        assert!(matches!(err, GrouperError::Transport(_)));
    }
}
