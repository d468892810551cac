//! Common test utilities for client integration tests.
//!
//! Every test builds a [`GrouperClient`] over a [`ScriptedHttpClient`], queues the
//! envelopes the service would answer with, and inspects the recorded requests.

use grouper_client::http::ScriptedHttpClient;
use grouper_client::{GrouperClient, GrouperConfig, HttpRequest};
use serde_json::Value;

pub mod builders;

pub const BASE_URL: &str = "https://grouper.example.org/grouper-ws/";
pub const API_ROOT: &str = "https://grouper.example.org/grouper-ws/servicesRest/v2_2_000/";

/// Route `log` output through env_logger once per test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A client over a fresh scripted HTTP client, plus a handle to that script.
pub fn scripted_client() -> (GrouperClient<ScriptedHttpClient>, ScriptedHttpClient) {
    init_logging();
    let http = ScriptedHttpClient::new();
    let client = GrouperClient::with_http_client(http.clone(), &GrouperConfig::new(BASE_URL))
        .expect("valid test configuration");
    (client, http)
}

/// The request fields under the single request-envelope key, asserting the key.
pub fn request_fields(request: &HttpRequest, request_name: &str) -> Value {
    let body = request.json_body().expect("request has a JSON body");
    body.get(request_name)
        .cloned()
        .unwrap_or_else(|| panic!("expected {request_name} envelope, got {body}"))
}

/// Path of a recorded request relative to the endpoint root.
pub fn relative_path(request: &HttpRequest) -> String {
    request
        .url
        .as_str()
        .strip_prefix(API_ROOT)
        .unwrap_or_else(|| panic!("request outside endpoint: {}", request.url))
        .to_string()
}
