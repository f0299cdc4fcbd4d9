//! Default `Transport` backed by a long-lived `ureq::Agent`.

use std::fs;
use std::path::Path;

use ureq::tls::{Certificate, ClientCert, PrivateKey, TlsConfig};
use ureq::typestate::WithBody;
use ureq::{Agent, Body, Proxy, RequestBuilder};

use crate::config::Config;
use crate::error::{Result, ZencoderError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

/// Blocking transport over one pooled `ureq::Agent`.
///
/// 4xx/5xx statuses are returned as data so the backend can apply its own
/// status handling.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Builds the agent from the timeout, proxy and TLS settings in `config`.
    ///
    /// # Errors
    ///
    /// Fails if a proxy URL is invalid or the client certificate cannot be
    /// read.
    pub fn new(config: &Config) -> Result<Self> {
        let mut tls = TlsConfig::builder().disable_verification(!config.tls_verify());
        if let Some(path) = config.cert() {
            tls = tls.client_cert(Some(load_client_cert(path)?));
        }

        let mut builder = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout())
            .tls_config(tls.build());
        if let Some(proxy) = select_proxy(config)? {
            builder = builder.proxy(Some(proxy));
        }

        Ok(Self {
            agent: builder.build().new_agent(),
        })
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut response = match method {
            HttpMethod::Get => with_headers(self.agent.get(&url), &headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&url), &headers).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(&url), &headers), body),
            HttpMethod::Put => send(with_headers(self.agent.put(&url), &headers), body),
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response.body_mut().read_to_vec()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Copies the prepared headers onto a ureq request. `Content-Length` is left
/// to ureq, which derives it from the body it actually sends.
fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        if name.eq_ignore_ascii_case("content-length") {
            continue;
        }
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: RequestBuilder<WithBody>,
    body: Option<String>,
) -> std::result::Result<ureq::http::Response<Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

/// Picks the proxy for the base URL's scheme, falling back to any other
/// configured entry.
fn select_proxy(config: &Config) -> Result<Option<Proxy>> {
    let scheme = config
        .base_url()
        .split_once("://")
        .map_or("https", |(scheme, _)| scheme);
    let proxies = config.proxies();
    let Some(proxy_url) = proxies.get(scheme).or_else(|| proxies.values().next()) else {
        return Ok(None);
    };

    Proxy::new(proxy_url)
        .map(Some)
        .map_err(|e| ZencoderError::Configuration(format!("invalid proxy {proxy_url}: {e}")))
}

/// Reads a PEM file holding the client certificate and its private key.
fn load_client_cert(path: &Path) -> Result<ClientCert> {
    let pem = fs::read(path).map_err(|source| ZencoderError::Certificate {
        path: path.to_path_buf(),
        source,
    })?;
    let certificate = Certificate::from_pem(&pem)?;
    let key = PrivateKey::from_pem(&pem)?;
    Ok(ClientCert::new_with_certs(&[certificate], key))
}
