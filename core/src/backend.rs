//! Request execution shared by every resource client.
//!
//! # Design
//! `Backend` holds only the shared `Config` and `Transport`. Each call is
//! split into `build_request` (pure: URL, query, headers, body) and
//! `Response::from_http` (pure: status-aware decoding), with the transport
//! round trip in between. Headers are derived from the config on every call
//! and never cached.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::config::Config;
use crate::error::{Result, ZencoderError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::response::Response;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "Zencoder-Api-Key";

/// Value sent as `User-Agent`.
pub const USER_AGENT: &str = concat!("zencoder-rs/", env!("CARGO_PKG_VERSION"));

/// Shared request executor. Cloning is cheap.
#[derive(Clone)]
pub struct Backend {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
}

impl Backend {
    pub fn new(config: Arc<Config>, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// URL of a resource collection, e.g. `resource_url("jobs")`.
    pub fn resource_url(&self, resource_name: &str) -> String {
        format!("{}{}", self.config.base_url(), resource_name)
    }

    /// Headers for a request carrying `body`.
    pub fn headers(&self, body: Option<&str>) -> Vec<(String, String)> {
        let content_length = body.map_or(0, str::len);
        vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
            (API_KEY_HEADER.to_string(), self.config.api_key().to_string()),
            ("Content-Length".to_string(), content_length.to_string()),
        ]
    }

    /// Builds a request without executing it. `body` is dropped for GET and
    /// DELETE.
    pub fn build_request(
        &self,
        method: HttpMethod,
        url: &str,
        query: &[(&str, String)],
        body: Option<String>,
    ) -> HttpRequest {
        let mut url = url.to_string();
        if !query.is_empty() {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())))
                .finish();
            url.push('?');
            url.push_str(&encoded);
        }

        let body = body.filter(|_| method.carries_body());
        HttpRequest {
            method,
            headers: self.headers(body.as_deref()),
            url,
            body,
        }
    }

    /// Turns a transport response into a `Response`.
    ///
    /// # Errors
    ///
    /// Returns `ZencoderError::ResponseDecode` for a malformed JSON payload.
    pub fn process(&self, response: HttpResponse) -> Result<Response> {
        Response::from_http(response)
    }

    /// Performs one blocking round trip.
    ///
    /// # Errors
    ///
    /// Transport failures are passed through; malformed payloads yield
    /// `ZencoderError::ResponseDecode`.
    pub fn request(
        &self,
        method: HttpMethod,
        url: &str,
        query: &[(&str, String)],
        body: Option<String>,
    ) -> Result<Response> {
        let request = self.build_request(method, url, query, body);
        debug!(method = %request.method, url = %request.url, "sending request");

        let response = self.transport.execute(request)?;
        let status = response.status;
        debug!(status, bytes = response.body.len(), "received response");

        self.process(response).inspect_err(|err| {
            if let ZencoderError::ResponseDecode { source, .. } = err {
                warn!(status, error = %source, "response body is not valid JSON");
            }
        })
    }

    pub fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Response> {
        self.request(HttpMethod::Get, url, query, None)
    }

    pub fn post(&self, url: &str, body: &Value) -> Result<Response> {
        let body = serde_json::to_string(body)?;
        self.request(HttpMethod::Post, url, &[], Some(body))
    }

    pub fn put(&self, url: &str, body: Option<&Value>) -> Result<Response> {
        let body = body.map(serde_json::to_string).transpose()?;
        self.request(HttpMethod::Put, url, &[], body)
    }

    pub fn delete(&self, url: &str) -> Result<Response> {
        self.request(HttpMethod::Delete, url, &[], None)
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend").field("config", &self.config).finish_non_exhaustive()
    }
}
