//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy_proxy, list_networks},
    config::Environment,
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_PATH, DEFAULT_INITIALIZER,
        DEFAULT_ROLE_RECIPIENT, MARKETPLACE_CONTRACT_NAME, NETWORK_ENV_VAR,
    },
    errors::ScriptError,
    networks::NetworkRegistry,
};

/// Deploy the Octoplace marketplace behind an upgradeable proxy.
///
/// Signing keys are read from the environment variables named by the selected
/// network profile (`ETH_KEY` for every built-in network).
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON file of network profiles that extend or override the built-in ones
    #[arg(long, global = true)]
    pub networks_file: Option<PathBuf>,

    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

/// The scripts available from the command line
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the marketplace implementation behind a `TransparentUpgradeableProxy`
    DeployProxy(DeployProxyArgs),
    /// List the registered network profiles
    Networks,
}

/// Deploy an upgradeable proxy for a compiled contract.
///
/// Concretely, this is a [`TransparentUpgradeableProxy`](https://docs.openzeppelin.com/contracts/5.x/api/proxy#transparent_proxy),
/// which itself deploys a `ProxyAdmin` contract.
///
/// Calls made directly to the `TransparentUpgradeableProxy` contract will be forwarded to the implementation contract.
/// Upgrade calls can only be made to the `TransparentUpgradeableProxy` through the `ProxyAdmin`.
#[derive(Args, Debug, Clone)]
pub struct DeployProxyArgs {
    /// The network profile to deploy to
    #[arg(short, long, env = NETWORK_ENV_VAR)]
    pub network: String,

    /// The name of the implementation contract artifact
    #[arg(short, long, default_value = MARKETPLACE_CONTRACT_NAME)]
    pub contract: String,

    /// The initializer invoked through the proxy
    #[arg(short, long, default_value = DEFAULT_INITIALIZER)]
    pub initializer: String,

    /// Initializer arguments, in order, parsed by the ABI parameter types
    #[arg(long = "init-arg", default_value = DEFAULT_ROLE_RECIPIENT)]
    pub init_args: Vec<String>,

    /// Call the initializer without arguments
    #[arg(long, conflicts_with = "init_args")]
    pub no_init_args: bool,

    /// Owner of the proxy admin contract, defaults to the deployer
    #[arg(long)]
    pub proxy_admin_owner: Option<String>,

    /// Directory holding the compiled contract artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// File in which deployed addresses are recorded
    #[arg(long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// Do not record the deployment in the deployments file
    #[arg(long)]
    pub no_record: bool,

    /// Print the deployment record as JSON
    #[arg(long)]
    pub json: bool,
}

impl Command {
    /// Run the command against the given registry and environment
    pub async fn run(
        self,
        registry: &NetworkRegistry,
        env: &Environment,
    ) -> Result<(), ScriptError> {
        match self {
            Command::DeployProxy(args) => {
                let json = args.json;
                let profile = registry.get(&args.network)?;
                let record = deploy_proxy(args, profile, env).await?;

                if json {
                    println!("{}", record.to_json()?);
                } else {
                    println!("{record}");
                }

                Ok(())
            }
            Command::Networks => {
                list_networks(registry);
                Ok(())
            }
        }
    }
}
