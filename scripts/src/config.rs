//! Explicit configuration handed to the deploy scripts.
//!
//! Library code never reads the process environment directly; `main` takes a
//! single [`Environment`] snapshot and everything downstream receives it as an
//! argument.

use std::{collections::HashMap, env, ffi::OsString, fmt, path::PathBuf, str::FromStr};

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    signers::local::PrivateKeySigner,
};

use crate::{
    cli::DeployProxyArgs,
    constants::{SOLC_OPTIMIZER_ENABLED, SOLC_OPTIMIZER_RUNS, SOLC_VERSION},
    errors::ScriptError,
    networks::{NetworkProfile, ResolvedProfile},
};

// ---------------
// | Environment |
// ---------------

/// A snapshot of environment variables
#[derive(Clone, Default)]
pub struct Environment {
    /// The captured variables
    vars: HashMap<String, String>,
}

impl Environment {
    /// Capture the environment of the current process
    pub fn from_process() -> Self {
        Self::from_os_vars(env::vars_os())
    }

    /// Capture the given variables, skipping any whose name or value is not
    /// valid unicode. A skipped variable reads as unset.
    pub fn from_os_vars(vars: impl IntoIterator<Item = (OsString, OsString)>) -> Self {
        let vars = vars
            .into_iter()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();

        Self { vars }
    }

    /// Get the value of a variable, treating blank values as unset
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// Values may hold secrets, only names are printed
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.vars.keys().collect();
        names.sort();
        f.debug_struct("Environment").field("vars", &names).finish()
    }
}

// ---------------
// | Credentials |
// ---------------

/// The signing keys for a network
#[derive(Clone)]
pub struct Credentials {
    /// The signer transactions are sent from
    deployer: PrivateKeySigner,
    /// Additional signers registered with the wallet
    additional: Vec<PrivateKeySigner>,
}

impl Credentials {
    /// Load signing keys from the given environment variables.
    ///
    /// The first variable is mandatory, the remaining ones are optional.
    pub fn load(key_vars: &[String], env: &Environment) -> Result<Self, ScriptError> {
        let (required, optional) = key_vars.split_first().ok_or_else(|| {
            ScriptError::Configuration("no signing key variables configured".to_string())
        })?;

        let deployer_key = env.var(required).ok_or_else(|| {
            ScriptError::Configuration(format!(
                "the `{}` environment variable must hold the deployer's private key",
                required
            ))
        })?;

        let deployer = parse_signer(required, deployer_key)?;
        let additional = optional
            .iter()
            .filter_map(|var| env.var(var).map(|key| parse_signer(var, key)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            deployer,
            additional,
        })
    }

    /// Construct credentials directly from signers
    pub fn new(deployer: PrivateKeySigner, additional: Vec<PrivateKeySigner>) -> Self {
        Self {
            deployer,
            additional,
        }
    }

    /// The address transactions are sent from
    pub fn deployer_address(&self) -> Address {
        self.deployer.address()
    }

    /// The number of signers, including the deployer
    pub fn len(&self) -> usize {
        1 + self.additional.len()
    }

    /// Always false, the deployer is always present
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Build a wallet with every signer registered and the deployer as the default
    pub fn into_wallet(self) -> EthereumWallet {
        let mut wallet = EthereumWallet::new(self.deployer);
        for signer in self.additional {
            wallet.register_signer(signer);
        }

        wallet
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let additional: Vec<Address> = self.additional.iter().map(|s| s.address()).collect();
        f.debug_struct("Credentials")
            .field("deployer", &self.deployer.address())
            .field("additional", &additional)
            .finish()
    }
}

/// Parse a private key, without echoing it in the error
fn parse_signer(var: &str, key: &str) -> Result<PrivateKeySigner, ScriptError> {
    PrivateKeySigner::from_str(key).map_err(|_| {
        ScriptError::Configuration(format!(
            "the `{}` environment variable does not hold a valid private key",
            var
        ))
    })
}

// --------------------
// | Compiler Options |
// --------------------

/// The Solidity compiler settings the contracts are built with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// The `solc` version
    pub version: String,
    /// Whether the optimizer is enabled
    pub optimizer_enabled: bool,
    /// The number of optimizer runs
    pub optimizer_runs: u32,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            version: SOLC_VERSION.to_string(),
            optimizer_enabled: SOLC_OPTIMIZER_ENABLED,
            optimizer_runs: SOLC_OPTIMIZER_RUNS,
        }
    }
}

impl CompilerOptions {
    /// Whether an artifact's recorded compiler version (e.g.
    /// `0.8.17+commit.8df45f5f.Emscripten.clang`) matches the configured one
    pub fn matches_version(&self, artifact_version: &str) -> bool {
        let base = artifact_version
            .trim_start_matches('v')
            .split('+')
            .next()
            .unwrap_or_default();
        base == self.version
    }
}

// ---------------------
// | Deployment Config |
// ---------------------

/// Everything the deployment procedure needs, resolved up front
#[derive(Debug)]
pub struct DeployConfig {
    /// The target network with its credentials
    pub network: ResolvedProfile,
    /// The name of the implementation contract artifact
    pub contract_name: String,
    /// The name of the initializer function
    pub initializer: String,
    /// The initializer arguments, coerced by the ABI parameter types
    pub initializer_args: Vec<String>,
    /// The owner of the proxy admin, defaults to the deployer
    pub proxy_admin_owner: Option<Address>,
    /// The directory holding compiled artifacts
    pub artifacts_dir: PathBuf,
    /// Where to record the deployment, if anywhere
    pub deployments_path: Option<PathBuf>,
    /// The expected compiler settings
    pub compiler: CompilerOptions,
}

impl DeployConfig {
    /// Resolve the deployment configuration for a network.
    ///
    /// Fails on missing credentials before any connection is made.
    pub fn from_args(
        args: DeployProxyArgs,
        profile: &NetworkProfile,
        env: &Environment,
    ) -> Result<Self, ScriptError> {
        let network = profile.resolve(env)?;

        let proxy_admin_owner = args
            .proxy_admin_owner
            .as_deref()
            .map(|owner| {
                Address::from_str(owner).map_err(|e| {
                    ScriptError::Configuration(format!(
                        "invalid proxy admin owner `{}`: {}",
                        owner, e
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            network,
            contract_name: args.contract,
            initializer: args.initializer,
            initializer_args: if args.no_init_args {
                Vec::new()
            } else {
                args.init_args
            },
            proxy_admin_owner,
            artifacts_dir: args.artifacts_dir,
            deployments_path: (!args.no_record).then_some(args.deployments_path),
            compiler: CompilerOptions::default(),
        })
    }
}
