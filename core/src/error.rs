//! Error types for the BitGo client.
//!
//! # Design
//! `Transport` and `Decode` are separate variants so callers can tell "never
//! reached the server" apart from "reached the server and got garbage back".
//!
//! API-level failures are not errors here. The service reports them as a
//! JSON body (usually `{"error": "..."}`) that decodes like any other
//! result; [`remote_error`] is a helper for callers who want to check for
//! that shape. The dispatcher itself never inspects it.

use serde_json::Value;
use thiserror::Error;

/// Errors returned by request building and dispatch.
#[derive(Debug, Error)]
pub enum ApiError {
    /// DNS, connect, TLS, timeout or body-read failure. Nothing was decoded.
    #[error("transport failure for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered but the body is not valid JSON.
    #[error("response body (HTTP {status}) is not valid JSON: {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The staged parameters could not be serialized to JSON.
    #[error("request body serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ApiError {
    pub fn transport<E>(url: &str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        ApiError::Transport {
            url: url.to_string(),
            source: source.into(),
        }
    }
}

/// Errors from loading a `ClientConfig` out of the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("client not initialized: BITGO_ACCESS_TOKEN is missing or empty")]
    MissingAccessToken,

    #[error("invalid value {value:?} for {name}, expected true/false")]
    InvalidFlag { name: String, value: String },
}

/// Return the service's error message if `value` follows its
/// `{"error": "<message>"}` convention.
pub fn remote_error(value: &Value) -> Option<&str> {
    value.get("error").and_then(Value::as_str)
}
