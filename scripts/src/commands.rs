//! Implementations of the deploy scripts

use alloy::providers::Provider;
use tracing::{debug, info, warn};

use crate::{
    artifacts::{load_artifact, ContractArtifact},
    calldata::{initializer_calldata, proxy_constructor_args, with_constructor_args},
    cli::DeployProxyArgs,
    config::{CompilerOptions, DeployConfig, Environment},
    constants::{
        PROXY_ADMIN_STORAGE_SLOT, PROXY_CONTRACT_NAME, PROXY_IMPLEMENTATION_STORAGE_SLOT,
    },
    errors::ScriptError,
    networks::{NetworkProfile, NetworkRegistry},
    types::DeploymentRecord,
    utils::{
        check_chain_id, deploy_bytecode, ensure_code_at, predict_create_address,
        read_address_slot, setup_client, validate_contract_address, write_deployment,
    },
};

/// Deploy the implementation contract behind a freshly created proxy and
/// initialize it through the proxy.
///
/// Credentials are resolved before anything else, so a missing key aborts
/// the run before any RPC request is made.
pub async fn deploy_proxy(
    args: DeployProxyArgs,
    profile: &NetworkProfile,
    env: &Environment,
) -> Result<DeploymentRecord, ScriptError> {
    let config = DeployConfig::from_args(args, profile, env)?;
    info!(
        network = %config.network.profile.name,
        chain_id = config.network.profile.chain_id,
        deployer = %config.network.credentials.deployer_address(),
        "resolved network profile"
    );

    execute_deployment(config).await
}

/// Run the deployment described by a resolved configuration
pub async fn execute_deployment(config: DeployConfig) -> Result<DeploymentRecord, ScriptError> {
    let DeployConfig {
        network,
        contract_name,
        initializer,
        initializer_args,
        proxy_admin_owner,
        artifacts_dir,
        deployments_path,
        compiler,
    } = config;
    let profile = network.profile;

    let deployer = network.credentials.deployer_address();
    let proxy_admin_owner = proxy_admin_owner.unwrap_or(deployer);
    let client = setup_client(network.credentials, network.rpc_url);

    // Get implementation & proxy contract ABIs and bytecode
    let implementation = load_artifact(&artifacts_dir, &contract_name)?;
    let proxy = load_artifact(&artifacts_dir, PROXY_CONTRACT_NAME)?;
    check_compiler(&implementation, &compiler);

    let init_calldata = initializer_calldata(&implementation.abi, &initializer, &initializer_args)?;
    debug!(calldata = %init_calldata, "encoded `{initializer}` call");

    check_chain_id(&client, profile.chain_id).await?;

    let nonce = client
        .get_transaction_count(deployer)
        .await
        .map_err(|e| ScriptError::from_rpc("fetching deployer nonce", e))?;
    debug!(
        implementation = %predict_create_address(deployer, nonce),
        proxy = %predict_create_address(deployer, nonce + 1),
        "expected deployment addresses"
    );

    // Deploy implementation contract
    info!("deploying {contract_name} implementation...");
    let (implementation_address, implementation_tx) =
        deploy_bytecode(&client, implementation.bytecode.clone(), profile.gas_price_wei).await?;
    info!(address = %implementation_address, tx = %implementation_tx, "implementation deployed");

    // Deploy proxy contract, which creates its admin and runs the initializer
    info!("deploying {PROXY_CONTRACT_NAME}...");
    let constructor_args =
        proxy_constructor_args(implementation_address, proxy_admin_owner, init_calldata);
    let proxy_code = with_constructor_args(&proxy.bytecode, &constructor_args);
    let (proxy_address, proxy_tx) =
        deploy_bytecode(&client, proxy_code, profile.gas_price_wei).await?;
    let proxy_address = validate_contract_address(proxy_address)?;
    ensure_code_at(&client, proxy_address).await?;

    // Get proxy admin contract address
    // This is the recommended way to get the proxy admin address:
    // https://github.com/OpenZeppelin/openzeppelin-contracts/blob/v5.0.0/contracts/proxy/ERC1967/ERC1967Utils.sol#L104-L106
    let proxy_admin_address =
        read_address_slot(&client, proxy_address, PROXY_ADMIN_STORAGE_SLOT).await?;

    let linked_implementation =
        read_address_slot(&client, proxy_address, PROXY_IMPLEMENTATION_STORAGE_SLOT).await?;
    if linked_implementation != implementation_address {
        return Err(ScriptError::Transaction(format!(
            "proxy {proxy_address:#x} points at {linked_implementation:#x}, \
             expected {implementation_address:#x}"
        )));
    }

    info!(
        proxy = %proxy_address,
        proxy_admin = %proxy_admin_address,
        tx = %proxy_tx,
        "proxy deployed and initialized"
    );

    let record = DeploymentRecord {
        network: profile.name,
        chain_id: profile.chain_id,
        contract_name,
        proxy_address,
        proxy_admin_address,
        implementation_address,
        initializer,
        initializer_args,
        implementation_tx,
        proxy_tx,
    };

    if let Some(path) = deployments_path {
        write_deployment(&path, &record)?;
        info!("recorded deployment in {}", path.display());
    }

    Ok(record)
}

/// Print every registered network profile
pub fn list_networks(registry: &NetworkRegistry) {
    for profile in registry.iter() {
        println!("{profile}");
    }
}

/// Warn when an artifact was built with a compiler other than the configured one
fn check_compiler(artifact: &ContractArtifact, compiler: &CompilerOptions) {
    match artifact.compiler_version.as_deref() {
        Some(version) if !compiler.matches_version(version) => warn!(
            "{} was compiled with solc {}, expected {} (optimizer: {}, runs: {})",
            artifact.contract_name,
            version,
            compiler.version,
            compiler.optimizer_enabled,
            compiler.optimizer_runs,
        ),
        Some(_) => {}
        None => debug!(
            "{} does not record its compiler version",
            artifact.contract_name
        ),
    }
}
