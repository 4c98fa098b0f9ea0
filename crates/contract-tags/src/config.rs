//! The table of supported chains and their subgraph endpoints.

use {
    crate::{error::Error, subgraph::DEFAULT_REQUEST_TIMEOUT},
    anyhow::Context,
    serde::Deserialize,
    std::{
        collections::{BTreeMap, BTreeSet},
        path::Path,
        str::FromStr,
        time::Duration,
    },
    url::Url,
};

/// Marks where the caller's credential goes in an endpoint template.
pub const API_KEY_PLACEHOLDER: &str = "[api-key]";

const REFERENCE_CONFIG: &str = include_str!("../config/chains.toml");

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Decimal chain ids tags may be requested for.
    pub supported_chains: BTreeSet<String>,

    /// Upper bound for every single subgraph request.
    #[serde(with = "humantime_serde", default = "default_request_timeout")]
    pub request_timeout: Duration,

    /// Endpoint templates by chain id, containing [`API_KEY_PLACEHOLDER`].
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
}

fn default_request_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}

impl Config {
    /// The chain table shipped with the binary.
    pub fn reference() -> Result<Self, toml::de::Error> {
        REFERENCE_CONFIG.parse()
    }

    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        contents
            .parse()
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Checks the caller's input without touching any endpoint.
    pub fn validate(&self, chain_id: &str, api_key: &str) -> Result<(), Error> {
        if chain_id.is_empty() || !chain_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Validation(format!(
                "chain id {chain_id:?} is not a decimal number"
            )));
        }
        if !self.supported_chains.contains(chain_id) {
            return Err(Error::Validation(format!(
                "chain id {chain_id} is not supported"
            )));
        }
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(Error::Validation("missing API key".to_string()));
        }
        // The key is pasted into the endpoint verbatim, so anything with a
        // meaning in URLs would silently change the request target.
        if !api_key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~'))
        {
            return Err(Error::Validation(
                "API key contains characters that are not allowed in URLs".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolves the subgraph endpoint of `chain_id` for `api_key`.
    pub fn endpoint(&self, chain_id: &str, api_key: &str) -> Result<Url, Error> {
        let template = self.endpoints.get(chain_id).ok_or_else(|| {
            Error::Configuration(format!("no subgraph endpoint for chain {chain_id}"))
        })?;

        let endpoint = template.replace(API_KEY_PLACEHOLDER, api_key.trim());
        if let Some(placeholder) = unresolved_placeholder(&endpoint) {
            return Err(Error::Configuration(format!(
                "subgraph endpoint for chain {chain_id} has unresolved placeholder {placeholder}"
            )));
        }

        endpoint.parse().map_err(|err| {
            Error::Configuration(format!(
                "invalid subgraph endpoint for chain {chain_id}: {err}"
            ))
        })
    }
}

impl FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

/// Finds the first `[name]` style placeholder left in `endpoint`. Brackets
/// around anything else (e.g. IPv6 hosts) don't count.
fn unresolved_placeholder(endpoint: &str) -> Option<&str> {
    endpoint.match_indices('[').find_map(|(start, _)| {
        let end = start + endpoint[start..].find(']')?;
        let name = &endpoint[start + 1..end];
        let is_placeholder = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        is_placeholder.then_some(&endpoint[start..=end])
    })
}
