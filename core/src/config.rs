//! Client configuration: network selection and bearer credential.
//!
//! # Design
//! A `ClientConfig` can only be obtained with both a credential and a
//! network, so a client can never dispatch against an unset endpoint. The
//! base endpoint is one of two constants and cannot be changed afterwards.

use std::fmt;

use crate::error::ConfigError;

pub const PRODUCTION_ENDPOINT: &str = "https://www.bitgo.com/api/v1";
pub const TESTNET_ENDPOINT: &str = "https://test.bitgo.com/api/v1";

pub const ACCESS_TOKEN_VAR: &str = "BITGO_ACCESS_TOKEN";
pub const TESTNET_VAR: &str = "BITGO_TESTNET";

/// Deployment of the remote service a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    #[default]
    Production,
    Testnet,
}

impl Network {
    pub fn select(use_testnet: bool) -> Self {
        if use_testnet {
            Network::Testnet
        } else {
            Network::Production
        }
    }

    pub fn base_endpoint(self) -> &'static str {
        match self {
            Network::Production => PRODUCTION_ENDPOINT,
            Network::Testnet => TESTNET_ENDPOINT,
        }
    }
}

/// Immutable endpoint + credential pair shared by every request of a client.
///
/// Safe to share across threads; nothing in it changes after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    network: Network,
    access_token: String,
}

impl ClientConfig {
    /// The token is stored verbatim. A malformed token is only reported by
    /// the remote service.
    pub fn new(access_token: impl Into<String>, network: Network) -> Self {
        Self {
            network,
            access_token: access_token.into(),
        }
    }

    pub fn initialize(access_token: impl Into<String>, use_testnet: bool) -> Self {
        Self::new(access_token, Network::select(use_testnet))
    }

    /// Load from `BITGO_ACCESS_TOKEN` (required) and `BITGO_TESTNET`
    /// (optional, defaults to production).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = lookup(ACCESS_TOKEN_VAR)
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingAccessToken)?;
        let use_testnet = match lookup(TESTNET_VAR) {
            Some(value) => parse_flag(TESTNET_VAR, &value)?,
            None => false,
        };
        Ok(Self::initialize(access_token, use_testnet))
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn base_endpoint(&self) -> &'static str {
        self.network.base_endpoint()
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_endpoint())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("network", &self.network)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" => Ok(false),
        "1" | "true" | "yes" => Ok(true),
        _ => Err(ConfigError::InvalidFlag {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn initialize_selects_production_endpoint() {
        let config = ClientConfig::initialize("tok-123", false);
        assert_eq!(config.base_endpoint(), "https://www.bitgo.com/api/v1");
        assert_eq!(config.network(), Network::Production);
        assert_eq!(config.access_token(), "tok-123");
    }

    #[test]
    fn initialize_selects_testnet_endpoint() {
        let config = ClientConfig::initialize("tok-123", true);
        assert_eq!(config.base_endpoint(), "https://test.bitgo.com/api/v1");
        assert_eq!(config.network(), Network::Testnet);
    }

    #[test]
    fn base_endpoint_is_always_one_of_the_two_constants() {
        for testnet in [false, true] {
            let endpoint = ClientConfig::initialize("t", testnet).base_endpoint();
            assert!(endpoint == PRODUCTION_ENDPOINT || endpoint == TESTNET_ENDPOINT);
        }
    }

    #[test]
    fn access_token_is_stored_verbatim() {
        let config = ClientConfig::new("  not a real token ", Network::Production);
        assert_eq!(config.access_token(), "  not a real token ");
    }

    #[test]
    fn debug_output_redacts_access_token() {
        let config = ClientConfig::new("super-secret", Network::Testnet);
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("Testnet"));
    }

    #[test]
    fn url_appends_path_to_base_endpoint() {
        let config = ClientConfig::new("t", Network::Testnet);
        assert_eq!(config.url("/wallet"), "https://test.bitgo.com/api/v1/wallet");
    }

    #[test]
    fn from_lookup_requires_access_token() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingAccessToken));

        let err = ClientConfig::from_lookup(lookup(&[(ACCESS_TOKEN_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingAccessToken));
    }

    #[test]
    fn from_lookup_defaults_to_production() {
        let config = ClientConfig::from_lookup(lookup(&[(ACCESS_TOKEN_VAR, "abc")])).unwrap();
        assert_eq!(config.network(), Network::Production);
        assert_eq!(config.access_token(), "abc");
    }

    #[test]
    fn from_lookup_reads_testnet_flag() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ACCESS_TOKEN_VAR, "abc"),
            (TESTNET_VAR, "TRUE"),
        ]))
        .unwrap();
        assert_eq!(config.network(), Network::Testnet);

        let config = ClientConfig::from_lookup(lookup(&[
            (ACCESS_TOKEN_VAR, "abc"),
            (TESTNET_VAR, "0"),
        ]))
        .unwrap();
        assert_eq!(config.network(), Network::Production);
    }

    #[test]
    fn from_lookup_rejects_unknown_flag_value() {
        let err = ClientConfig::from_lookup(lookup(&[
            (ACCESS_TOKEN_VAR, "abc"),
            (TESTNET_VAR, "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlag { ref value, .. } if value == "maybe"));
    }
}
