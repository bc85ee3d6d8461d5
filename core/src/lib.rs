//! Blocking request/response engine for the BitGo v1 wallet REST API.
//!
//! # Overview
//! Every API operation resolves to a URL under the configured base endpoint,
//! is shaped into an `HttpRequest` (bearer token, JSON content type, optional
//! JSON body), sent over a verified TLS channel and decoded into a generic
//! `serde_json::Value`.
//!
//! # Design
//! - `ClientConfig` is built once, with both credential and network, and is
//!   immutable afterwards. There is no separate "initialize" step to forget.
//! - Each operation stages its own `PendingRequest`; nothing is carried over
//!   between calls.
//! - Each operation is split into `build_*` (pure, no I/O) and a convenience
//!   method that runs the request through a `Transport` and decodes it.
//! - Decoding ignores the HTTP status code. A 4xx/5xx with a JSON body is a
//!   successful result; callers inspect the value (see [`remote_error`]).

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod transport;

pub use client::BitGoClient;
pub use config::{ClientConfig, Network};
pub use error::{remote_error, ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::PendingRequest;
pub use transport::{Transport, UreqTransport};
