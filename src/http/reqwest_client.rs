//! [`HttpClient`] implementation backed by `reqwest`.
//!
//! `reqwest::Client` keeps an internal connection pool and is cheap to clone, so a
//! single instance can serve any number of concurrent operations.

use crate::config::{Credentials, GrouperConfig};
use crate::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use log::trace;

/// Production HTTP client.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    credentials: Option<Credentials>,
}

impl ReqwestHttpClient {
    /// Build a client from configuration (timeout, user agent and credentials).
    pub fn from_config(config: &GrouperConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            credentials: config.credentials.clone(),
        })
    }

    /// Wrap an existing `reqwest::Client`, e.g. one shared with other services.
    pub fn with_client(client: reqwest::Client, credentials: Option<Credentials>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    fn method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        }
    }
}

impl HttpClient for ReqwestHttpClient {
    type Error = reqwest::Error;

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        let mut builder = self
            .client
            .request(Self::method(request.method), request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(credentials) = &self.credentials {
            builder = builder.basic_auth(&credentials.username, Some(&credentials.password));
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        // Reading the body to the end hands the connection back to the pool.
        let body = response.bytes().await?.to_vec();
        trace!("read {} response bytes", body.len());

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
