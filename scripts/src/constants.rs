//! Constants used in the deploy scripts

use alloy::primitives::{b256, B256};

/// The name of the marketplace implementation contract artifact
pub const MARKETPLACE_CONTRACT_NAME: &str = "OctoplaceMarketUpgradeable";

/// The name of the initializer function on the marketplace contract
pub const DEFAULT_INITIALIZER: &str = "init";

/// The recipient of the privileged role granted by the marketplace initializer
pub const DEFAULT_ROLE_RECIPIENT: &str = "0xee69E72B0A1524329e6dD66D8c7e974D939e7690";

/// The name of the proxy contract artifact.
///
/// Compiled from https://github.com/OpenZeppelin/openzeppelin-contracts/blob/v5.0.0/contracts/proxy/transparent/TransparentUpgradeableProxy.sol
pub const PROXY_CONTRACT_NAME: &str = "TransparentUpgradeableProxy";

/// The default directory in which compiled contract artifacts are kept
pub const DEFAULT_ARTIFACTS_DIR: &str = "build/contracts";

/// The extension of a compiled contract artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The number of confirmations to wait for each deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The storage slot containing the proxy admin contract address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#admin-address
pub const PROXY_ADMIN_STORAGE_SLOT: B256 =
    b256!("b53127684a568b3173ae13b9f8a6016e243e63b6e8ee1178d6a717850b5d6103");

/// The storage slot containing the implementation address in the upgradeable proxy.
///
/// This is specified in EIP1967: https://eips.ethereum.org/EIPS/eip-1967#logic-contract-address
pub const PROXY_IMPLEMENTATION_STORAGE_SLOT: B256 =
    b256!("360894a13ba1a3210667c828403a0fb10f2b46e4ba60e4a94b4f12da6cdb0b0d");

/// The environment variable holding the deployer's private key
pub const DEPLOYER_KEY_ENV_VAR: &str = "ETH_KEY";

/// The environment variable holding the optional secondary private key
/// for the private Theta network
pub const SECONDARY_KEY_ENV_VAR: &str = "ETH_KEY_SECONDARY";

/// The environment variable holding the Infura project id
pub const INFURA_API_KEY_ENV_VAR: &str = "INFURA_API_KEY";

/// The environment variable selecting the default network
pub const NETWORK_ENV_VAR: &str = "OCTOPLACE_NETWORK";

/// The gas price used on every built-in network, in wei
pub const DEFAULT_GAS_PRICE_WEI: u128 = 4_000_000_000_000;

/// The Solidity compiler version the contracts are built with
pub const SOLC_VERSION: &str = "0.8.17";

/// Whether the Solidity optimizer is enabled
pub const SOLC_OPTIMIZER_ENABLED: bool = true;

/// The number of optimizer runs
pub const SOLC_OPTIMIZER_RUNS: u32 = 200;

/// The deployments file key for the proxy contract
pub const PROXY_DEPLOYMENT_KEY: &str = "proxy";

/// The deployments file key for the proxy admin contract
pub const PROXY_ADMIN_DEPLOYMENT_KEY: &str = "proxy_admin";

/// The deployments file key for the implementation contract
pub const IMPLEMENTATION_DEPLOYMENT_KEY: &str = "implementation";
