//! Blocking HTTP transport.
//!
//! # Design
//! `Transport` is the only seam that performs I/O. `UreqTransport` is the
//! production implementation. It keeps the TLS configuration fixed: peer
//! verification is always on and roots come from the bundled webpki
//! (Mozilla) CA set. No setter relaxes either.
//!
//! Every call is exactly one round trip. Redirects are not followed, and
//! non-2xx statuses (3xx included) are returned as data rather than errors
//! so the client decodes their bodies like any other body.

use std::fmt;
use std::time::Duration;

use tracing::warn;
use ureq::tls::{RootCerts, TlsConfig};
use ureq::{Agent, RequestBuilder};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Applied to every request unless overridden with `with_timeout`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on a response body; larger bodies fail as a transport error.
pub const MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

/// Executes one `HttpRequest`, blocking until the round trip finishes.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    timeout: Duration,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let tls = TlsConfig::builder()
            .root_certs(RootCerts::WebPki)
            .disable_verification(false)
            .build();
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .timeout_global(Some(timeout))
            .tls_config(tls)
            .build()
            .new_agent();
        Self { agent, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let body = request.body.as_deref().map(str::as_bytes);

        let result = match (request.method, body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), request).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), request).call(),
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(url), request).send(body),
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), request).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(url), request).send(body),
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), request).send_empty(),
        };

        let mut response = result.map_err(|e| {
            warn!(method = request.method.as_str(), url, error = %e, "request failed");
            ApiError::transport(url, e)
        })?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_vec()
            .map_err(|e| {
                warn!(method = request.method.as_str(), url, status, error = %e, "reading response body failed");
                ApiError::transport(url, e)
            })?;

        Ok(HttpResponse { status, body })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
