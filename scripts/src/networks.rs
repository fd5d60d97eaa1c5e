//! The registry of network profiles the deploy scripts can target.
//!
//! Profiles are plain data: the built-in table below can be extended or
//! overridden with a JSON file, so adding a network never requires a code change.

use std::{fmt, fs, path::Path};

use alloy::transports::http::reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{
    config::{Credentials, Environment},
    constants::{
        DEFAULT_GAS_PRICE_WEI, DEPLOYER_KEY_ENV_VAR, INFURA_API_KEY_ENV_VAR,
        SECONDARY_KEY_ENV_VAR,
    },
    errors::ScriptError,
};

/// The opening delimiter of an environment placeholder in an RPC URL template
const PLACEHOLDER_OPEN: &str = "${";
/// The closing delimiter of an environment placeholder in an RPC URL template
const PLACEHOLDER_CLOSE: char = '}';

/// A connection descriptor for a single network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    /// The name the operator selects the network by
    pub name: String,
    /// The RPC endpoint, possibly containing `${VAR}` placeholders
    pub rpc_url: String,
    /// The environment variables holding the signing keys, in order.
    ///
    /// The first is required and becomes the deployer; the rest are optional.
    pub signing_key_vars: Vec<String>,
    /// The chain id the remote node is expected to report
    pub chain_id: u64,
    /// The (legacy) gas price attached to every transaction, in wei
    #[serde(default = "default_gas_price")]
    pub gas_price_wei: u128,
}

/// The gas price used when a profile file omits one
fn default_gas_price() -> u128 {
    DEFAULT_GAS_PRICE_WEI
}

/// A network profile with its endpoint expanded and its credentials loaded
#[derive(Debug)]
pub struct ResolvedProfile {
    /// The profile this was resolved from
    pub profile: NetworkProfile,
    /// The fully expanded RPC endpoint
    pub rpc_url: Url,
    /// The signing keys for the network
    pub credentials: Credentials,
}

impl NetworkProfile {
    /// Construct a profile whose signing keys are read from the given variables
    pub fn new(
        name: &str,
        rpc_url: &str,
        signing_key_vars: &[&str],
        chain_id: u64,
        gas_price_wei: u128,
    ) -> Self {
        Self {
            name: name.to_string(),
            rpc_url: rpc_url.to_string(),
            signing_key_vars: signing_key_vars.iter().map(|v| v.to_string()).collect(),
            chain_id,
            gas_price_wei,
        }
    }

    /// Expand the endpoint and load the signing keys from the environment.
    ///
    /// This never touches the network, so a missing credential is reported
    /// before any RPC call is attempted.
    pub fn resolve(&self, env: &Environment) -> Result<ResolvedProfile, ScriptError> {
        let expanded = expand_placeholders(&self.rpc_url, env).map_err(|var| {
            ScriptError::Configuration(format!(
                "network `{}` requires the `{}` environment variable to be set",
                self.name, var
            ))
        })?;

        let rpc_url = Url::parse(&expanded).map_err(|e| {
            ScriptError::Configuration(format!(
                "network `{}` has an invalid RPC URL: {}",
                self.name, e
            ))
        })?;

        let credentials = Credentials::load(&self.signing_key_vars, env).map_err(|e| match e {
            ScriptError::Configuration(msg) => {
                ScriptError::Configuration(format!("network `{}`: {}", self.name, msg))
            }
            other => other,
        })?;

        Ok(ResolvedProfile {
            profile: self.clone(),
            rpc_url,
            credentials,
        })
    }

    /// Check the invariants a profile must satisfy before it can be registered
    fn validate(&self) -> Result<(), ScriptError> {
        if self.name.trim().is_empty() {
            return Err(ScriptError::Configuration(
                "network profile with an empty name".to_string(),
            ));
        }

        if self.signing_key_vars.is_empty() {
            return Err(ScriptError::Configuration(format!(
                "network `{}` names no signing key variables",
                self.name
            )));
        }

        Ok(())
    }
}

impl fmt::Display for NetworkProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<18} chain id {:<6} gas price {} wei\n\
             {:<18} rpc {}\n\
             {:<18} keys {}",
            self.name,
            self.chain_id,
            self.gas_price_wei,
            "",
            self.rpc_url,
            "",
            self.signing_key_vars.join(", "),
        )
    }
}

/// An ordered collection of network profiles, addressable by name
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    /// The registered profiles, in registration order
    profiles: Vec<NetworkProfile>,
}

impl NetworkRegistry {
    /// The networks the marketplace is deployed to
    pub fn builtin() -> Self {
        let profiles = vec![
            NetworkProfile::new(
                "theta_privatenet",
                "http://localhost:18888/rpc",
                &[DEPLOYER_KEY_ENV_VAR, SECONDARY_KEY_ENV_VAR],
                366,
                DEFAULT_GAS_PRICE_WEI,
            ),
            NetworkProfile::new(
                "theta_testnet",
                "https://eth-rpc-api-testnet.thetatoken.org/rpc",
                &[DEPLOYER_KEY_ENV_VAR],
                365,
                DEFAULT_GAS_PRICE_WEI,
            ),
            NetworkProfile::new(
                "theta_mainnet",
                "http://172.190.238.225:18888/rpc",
                &[DEPLOYER_KEY_ENV_VAR],
                361,
                DEFAULT_GAS_PRICE_WEI,
            ),
            NetworkProfile::new(
                "eth",
                &format!("https://goerli.infura.io/v3/${{{INFURA_API_KEY_ENV_VAR}}}"),
                &[DEPLOYER_KEY_ENV_VAR],
                5,
                DEFAULT_GAS_PRICE_WEI,
            ),
        ];

        Self { profiles }
    }

    /// Register the given profiles, replacing any existing profile of the same name
    pub fn with_overlay(
        mut self,
        overlay: impl IntoIterator<Item = NetworkProfile>,
    ) -> Result<Self, ScriptError> {
        for profile in overlay {
            profile.validate()?;
            match self.profiles.iter_mut().find(|p| p.name == profile.name) {
                Some(existing) => *existing = profile,
                None => self.profiles.push(profile),
            }
        }

        Ok(self)
    }

    /// Register the profiles listed in a JSON file
    pub fn with_overlay_file(self, path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ScriptError::Configuration(format!(
                "could not read networks file {}: {}",
                path.display(),
                e
            ))
        })?;

        let overlay: Vec<NetworkProfile> = serde_json::from_str(&contents).map_err(|e| {
            ScriptError::Configuration(format!(
                "could not parse networks file {}: {}",
                path.display(),
                e
            ))
        })?;

        self.with_overlay(overlay)
    }

    /// Look up a profile by name
    pub fn get(&self, name: &str) -> Result<&NetworkProfile, ScriptError> {
        self.profiles.iter().find(|p| p.name == name).ok_or_else(|| {
            ScriptError::Configuration(format!(
                "unknown network `{}`, expected one of: {}",
                name,
                self.names().join(", ")
            ))
        })
    }

    /// The names of all registered networks
    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    /// Iterate over the registered profiles
    pub fn iter(&self) -> impl Iterator<Item = &NetworkProfile> {
        self.profiles.iter()
    }
}

/// Replace every `${VAR}` in `template` with the value of `VAR`.
///
/// Returns the name of the first unset variable on failure.
fn expand_placeholders(template: &str, env: &Environment) -> Result<String, String> {
    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(PLACEHOLDER_OPEN) {
        expanded.push_str(&rest[..start]);
        let after_open = &rest[start + PLACEHOLDER_OPEN.len()..];
        let end = after_open
            .find(PLACEHOLDER_CLOSE)
            .ok_or_else(|| after_open.to_string())?;

        let var = &after_open[..end];
        let value = env.var(var).ok_or_else(|| var.to_string())?;
        expanded.push_str(value);

        rest = &after_open[end + 1..];
    }

    expanded.push_str(rest);
    Ok(expanded)
}
