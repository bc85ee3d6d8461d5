//! Request dispatcher for the BitGo v1 wallet API.
//!
//! # Design
//! `BitGoClient` holds an immutable `ClientConfig` and a `Transport`, and
//! carries no mutable state between calls. Every operation is available in
//! two forms:
//! - `build_*` resolves the endpoint, stages body parameters in a fresh
//!   `PendingRequest` and returns the shaped `HttpRequest` without I/O;
//! - the unprefixed method builds, sends through the transport and decodes
//!   the body into a `serde_json::Value`.
//!
//! Path segments are inserted verbatim, without escaping or validation. A
//! malformed identifier is reported by the service, not by this client.

use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::request::PendingRequest;
use crate::transport::{Transport, UreqTransport};

/// Blocking client for the BitGo v1 API.
///
/// Shareable across threads when the transport is: each call builds its own
/// request and the configuration is read-only.
#[derive(Debug, Clone)]
pub struct BitGoClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl BitGoClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> BitGoClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn pending(&self, method: HttpMethod, path: &str) -> PendingRequest {
        PendingRequest::new(method, self.config.url(path))
    }

    fn shape(&self, pending: PendingRequest) -> Result<HttpRequest, ApiError> {
        pending.into_http_request(&self.config)
    }

    pub fn build_transaction_details(&self, tx: &str) -> Result<HttpRequest, ApiError> {
        self.shape(self.pending(HttpMethod::Get, &format!("/tx/{tx}")))
    }

    pub fn build_list_wallets(&self) -> Result<HttpRequest, ApiError> {
        self.shape(self.pending(HttpMethod::Get, "/wallet"))
    }

    pub fn build_list_wallet_addresses(&self, wallet: &str) -> Result<HttpRequest, ApiError> {
        self.shape(self.pending(HttpMethod::Get, &format!("/wallet/{wallet}/addresses")))
    }

    pub fn build_list_wallet_transactions(&self, wallet: &str) -> Result<HttpRequest, ApiError> {
        self.shape(self.pending(HttpMethod::Get, &format!("/wallet/{wallet}/tx")))
    }

    /// Chain 0 receives funds; chain 1 is used for change.
    pub fn build_create_address(&self, wallet: &str, chain: u32) -> Result<HttpRequest, ApiError> {
        let pending = self
            .pending(HttpMethod::Post, &format!("/wallet/{wallet}/address/{chain}"))
            .param("wallet", wallet)
            .param("chain", chain);
        self.shape(pending)
    }

    pub fn build_address_details(&self, address: &str) -> Result<HttpRequest, ApiError> {
        self.shape(self.pending(HttpMethod::Get, &format!("/address/{address}")))
    }

    pub fn build_address_transactions(&self, address: &str) -> Result<HttpRequest, ApiError> {
        self.shape(self.pending(HttpMethod::Get, &format!("/address/{address}/tx")))
    }

    pub fn build_list_all_labels(&self) -> Result<HttpRequest, ApiError> {
        self.shape(self.pending(HttpMethod::Get, "/labels"))
    }

    pub fn build_list_wallet_labels(&self, wallet: &str) -> Result<HttpRequest, ApiError> {
        self.shape(self.pending(HttpMethod::Get, &format!("/labels/{wallet}")))
    }

    pub fn build_set_label(
        &self,
        wallet: &str,
        address: &str,
        label: &str,
    ) -> Result<HttpRequest, ApiError> {
        let pending = self
            .pending(HttpMethod::Put, &format!("/labels/{wallet}/{address}"))
            .param("label", label);
        self.shape(pending)
    }

    pub fn build_delete_label(&self, wallet: &str, address: &str) -> Result<HttpRequest, ApiError> {
        self.shape(self.pending(HttpMethod::Delete, &format!("/labels/{wallet}/{address}")))
    }

    pub fn build_list_keychains(&self) -> Result<HttpRequest, ApiError> {
        self.shape(self.pending(HttpMethod::Get, "/keychain"))
    }

    pub fn build_get_keychain(&self, xpub: &str) -> Result<HttpRequest, ApiError> {
        let pending = self
            .pending(HttpMethod::Post, &format!("/keychain/{xpub}"))
            .param("xpub", xpub);
        self.shape(pending)
    }

    pub fn build_create_bitgo_keychain(&self) -> Result<HttpRequest, ApiError> {
        self.shape(self.pending(HttpMethod::Post, "/keychain/bitgo"))
    }

    /// Send `request` and decode the body, whatever the status code.
    pub fn execute(&self, request: &HttpRequest) -> Result<Value, ApiError> {
        let response = self.transport.send(request)?;
        debug!(
            method = request.method.as_str(),
            url = %request.url,
            status = response.status,
            "request completed"
        );
        self.parse_response(response)
    }

    /// Decode a response body into a generic JSON value.
    ///
    /// Error statuses are not special-cased: a 404 with a JSON body is an
    /// `Ok`. Only a body that is not JSON (including an empty one) fails.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        serde_json::from_slice(&response.body).map_err(|source| ApiError::Decode {
            status: response.status,
            source,
        })
    }

    pub fn transaction_details(&self, tx: &str) -> Result<Value, ApiError> {
        self.execute(&self.build_transaction_details(tx)?)
    }

    pub fn list_wallets(&self) -> Result<Value, ApiError> {
        self.execute(&self.build_list_wallets()?)
    }

    pub fn list_wallet_addresses(&self, wallet: &str) -> Result<Value, ApiError> {
        self.execute(&self.build_list_wallet_addresses(wallet)?)
    }

    pub fn list_wallet_transactions(&self, wallet: &str) -> Result<Value, ApiError> {
        self.execute(&self.build_list_wallet_transactions(wallet)?)
    }

    pub fn create_address(&self, wallet: &str, chain: u32) -> Result<Value, ApiError> {
        self.execute(&self.build_create_address(wallet, chain)?)
    }

    pub fn address_details(&self, address: &str) -> Result<Value, ApiError> {
        self.execute(&self.build_address_details(address)?)
    }

    pub fn address_transactions(&self, address: &str) -> Result<Value, ApiError> {
        self.execute(&self.build_address_transactions(address)?)
    }

    pub fn list_all_labels(&self) -> Result<Value, ApiError> {
        self.execute(&self.build_list_all_labels()?)
    }

    pub fn list_wallet_labels(&self, wallet: &str) -> Result<Value, ApiError> {
        self.execute(&self.build_list_wallet_labels(wallet)?)
    }

    pub fn set_label(&self, wallet: &str, address: &str, label: &str) -> Result<Value, ApiError> {
        self.execute(&self.build_set_label(wallet, address, label)?)
    }

    pub fn delete_label(&self, wallet: &str, address: &str) -> Result<Value, ApiError> {
        self.execute(&self.build_delete_label(wallet, address)?)
    }

    pub fn list_keychains(&self) -> Result<Value, ApiError> {
        self.execute(&self.build_list_keychains()?)
    }

    pub fn get_keychain(&self, xpub: &str) -> Result<Value, ApiError> {
        self.execute(&self.build_get_keychain(xpub)?)
    }

    pub fn create_bitgo_keychain(&self) -> Result<Value, ApiError> {
        self.execute(&self.build_create_bitgo_keychain()?)
    }
}
