//! Per-call request state: target URL and staged body parameters.
//!
//! A `PendingRequest` is created fresh by every operation and consumed when
//! it is shaped into an `HttpRequest`, so parameters from one call can never
//! leak into the next.

use serde_json::{Map, Value};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{
    HttpMethod, HttpRequest, APPLICATION_JSON, HEADER_ACCEPT, HEADER_AUTHORIZATION,
    HEADER_CONTENT_TYPE,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    method: HttpMethod,
    url: String,
    params: Map<String, Value>,
}

impl PendingRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: Map::new(),
        }
    }

    /// Stage a body parameter. Ignored for GET and DELETE.
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Shape into a sendable request.
    ///
    /// Always attaches Accept, Content-Type and a bearer Authorization
    /// header. POST and PUT carry the staged parameters as a JSON object
    /// (`{}` when none were staged); GET and DELETE never carry a body.
    pub fn into_http_request(self, config: &ClientConfig) -> Result<HttpRequest, ApiError> {
        let body = if self.method.carries_body() {
            let json = serde_json::to_string(&self.params).map_err(ApiError::Serialization)?;
            Some(json)
        } else {
            None
        };

        Ok(HttpRequest {
            method: self.method,
            url: self.url,
            headers: vec![
                (HEADER_ACCEPT.to_string(), APPLICATION_JSON.to_string()),
                (HEADER_CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()),
                (
                    HEADER_AUTHORIZATION.to_string(),
                    format!("Bearer {}", config.access_token()),
                ),
            ],
            body,
        })
    }
}
