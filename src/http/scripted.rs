//! In-memory [`HttpClient`] that replays canned responses.
//!
//! Responses are served in the order they were pushed, and every request is
//! recorded so tests can assert on what was sent. When the script runs out the
//! client fails the exchange, which also makes "no network call happened"
//! assertions straightforward.

use crate::http::{HttpClient, HttpRequest, HttpResponse};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Error raised when a request arrives and no response is scripted.
#[derive(Debug, thiserror::Error)]
pub enum ScriptedHttpError {
    #[error("no scripted response left for {method} {url}")]
    Exhausted { method: String, url: String },
}

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<HttpResponse>,
    requests: Vec<HttpRequest>,
}

/// Thread-safe scripted HTTP client.
///
/// Clones share the same script, so a test can keep one handle for assertions
/// while the client under test owns another.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHttpClient {
    script: Arc<Mutex<Script>>,
}

impl ScriptedHttpClient {
    /// Create a client with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub async fn push_response(&self, response: HttpResponse) {
        self.script.lock().await.responses.push_back(response);
    }

    /// Queue a JSON response with the given status.
    pub async fn push_json(&self, status: u16, body: Value) {
        self.push_response(HttpResponse::json(status, &body)).await;
    }

    /// All requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<HttpRequest> {
        self.script.lock().await.requests.clone()
    }

    /// Number of requests received so far.
    pub async fn request_count(&self) -> usize {
        self.script.lock().await.requests.len()
    }

    /// Number of scripted responses not yet consumed.
    pub async fn pending_responses(&self) -> usize {
        self.script.lock().await.responses.len()
    }
}

impl HttpClient for ScriptedHttpClient {
    type Error = ScriptedHttpError;

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        let mut script = self.script.lock().await;
        let method = request.method.to_string();
        let url = request.url.to_string();
        script.requests.push(request);
        script
            .responses
            .pop_front()
            .ok_or(ScriptedHttpError::Exhausted { method, url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use serde_json::json;
    use url::Url;

    fn request() -> HttpRequest {
        HttpRequest::new(
            HttpMethod::Post,
            Url::parse("https://grouper.example.org/groups").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let http = ScriptedHttpClient::new();
        http.push_json(200, json!({"first": {}})).await;
        http.push_json(201, json!({"second": {}})).await;

        let first = http.send(request()).await.unwrap();
        let second = http.send(request()).await.unwrap();

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 201);
        assert_eq!(http.request_count().await, 2);
        assert_eq!(http.pending_responses().await, 0);
    }

    #[tokio::test]
    async fn test_exhausted_script_fails() {
        let http = ScriptedHttpClient::new();
        let error = http.send(request()).await.unwrap_err();
        assert!(error.to_string().contains("POST"));
        assert_eq!(http.request_count().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_script() {
        let http = ScriptedHttpClient::new();
        let handle = http.clone();
        http.push_json(200, json!({})).await;
        handle.send(request()).await.unwrap();
        assert_eq!(http.request_count().await, 1);
    }

    #[test]
    fn test_usable_outside_runtime() {
        let http = ScriptedHttpClient::new();
        let response = tokio_test::block_on(async {
            http.push_json(500, json!({"error": {}})).await;
            http.send(request()).await
        })
        .unwrap();
        assert_eq!(response.status, 500);
    }
}
