//! Nomad client configuration.

use serde::{Deserialize, Serialize};

pub const ADDR_ENV: &str = "NOMAD_ADDR";
pub const TOKEN_ENV: &str = "NOMAD_TOKEN";
pub const NAMESPACE_ENV: &str = "NOMAD_NAMESPACE";
pub const REGION_ENV: &str = "NOMAD_REGION";

/// Connection settings for the Nomad HTTP API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NomadConfig {
    /// Base URL of the Nomad agent (e.g., "http://127.0.0.1:4646").
    pub address: String,

    /// ACL secret sent as `X-Nomad-Token`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Namespace scoping every variable request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Region to forward requests to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NomadConfig {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:4646".to_string(),
            token: None,
            namespace: None,
            region: None,
            timeout_secs: 30,
        }
    }
}

impl NomadConfig {
    /// Builds a config from the standard `NOMAD_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(address) = get(ADDR_ENV) {
            config.address = address;
        }
        config.token = get(TOKEN_ENV);
        config.namespace = get(NAMESPACE_ENV);
        config.region = get(REGION_ENV);
        config
    }

    /// Address with any trailing slash removed, ready for path concatenation.
    pub fn base_url(&self) -> &str {
        self.address.trim_end_matches('/')
    }
}
