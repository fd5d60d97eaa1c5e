//! Utilities for the deploy scripts.

use std::{fs, path::Path};

use alloy::{
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, Bytes, TxHash, B256, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    transports::http::reqwest::Url,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    config::Credentials,
    constants::{
        IMPLEMENTATION_DEPLOYMENT_KEY, NUM_DEPLOY_CONFIRMATIONS, PROXY_ADMIN_DEPLOYMENT_KEY,
        PROXY_DEPLOYMENT_KEY,
    },
    errors::ScriptError,
    types::DeploymentRecord,
};

/// The provider type used by the deploy scripts
pub type DeployClient = DynProvider<Ethereum>;

/// Sets up a signing client bound to the given RPC endpoint.
///
/// No request is made here; the first network round-trip happens on first use.
pub fn setup_client(credentials: Credentials, rpc_url: Url) -> DeployClient {
    let wallet = credentials.into_wallet();
    let provider = ProviderBuilder::new().wallet(wallet).on_http(rpc_url);

    DynProvider::new(provider)
}

/// Check that the remote node serves the chain the profile expects
pub async fn check_chain_id(client: &DeployClient, expected: u64) -> Result<(), ScriptError> {
    let chain_id = client
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::from_rpc("fetching chain id", e))?;

    if chain_id != expected {
        return Err(ScriptError::Configuration(format!(
            "RPC endpoint serves chain id {chain_id}, expected {expected}"
        )));
    }

    Ok(())
}

/// Send a contract creation transaction and wait for it to be mined,
/// returning the created address and the transaction hash
pub async fn deploy_bytecode(
    client: &DeployClient,
    code: Bytes,
    gas_price_wei: u128,
) -> Result<(Address, TxHash), ScriptError> {
    let tx = TransactionRequest::default()
        .with_deploy_code(code)
        .with_gas_price(gas_price_wei);

    let pending = client
        .send_transaction(tx)
        .await
        .map_err(|e| ScriptError::from_rpc("sending deployment transaction", e))?;
    debug!(tx_hash = %pending.tx_hash(), "deployment transaction sent");

    let receipt = pending
        .with_required_confirmations(NUM_DEPLOY_CONFIRMATIONS)
        .get_receipt()
        .await
        .map_err(|e| ScriptError::from_pending("awaiting deployment receipt", e))?;

    if !receipt.status() {
        return Err(ScriptError::Transaction(format!(
            "deployment transaction {:#x} reverted",
            receipt.transaction_hash
        )));
    }

    let address = receipt.contract_address.ok_or_else(|| {
        ScriptError::Transaction(format!(
            "receipt for {:#x} carries no contract address",
            receipt.transaction_hash
        ))
    })?;

    Ok((validate_contract_address(address)?, receipt.transaction_hash))
}

/// Read an address stored in the low 20 bytes of a storage slot
pub async fn read_address_slot(
    client: &DeployClient,
    contract: Address,
    slot: B256,
) -> Result<Address, ScriptError> {
    let value = client
        .get_storage_at(contract, U256::from_be_bytes(slot.0))
        .await
        .map_err(|e| ScriptError::from_rpc("reading storage slot", e))?;

    Ok(Address::from_word(B256::from(value.to_be_bytes::<32>())))
}

/// Check that code was actually deployed at `address`
pub async fn ensure_code_at(client: &DeployClient, address: Address) -> Result<(), ScriptError> {
    let code = client
        .get_code_at(address)
        .await
        .map_err(|e| ScriptError::from_rpc("fetching deployed code", e))?;

    if code.is_empty() {
        return Err(ScriptError::Transaction(format!(
            "no code found at {address:#x}"
        )));
    }

    Ok(())
}

/// Reject addresses that cannot identify a deployed contract
pub fn validate_contract_address(address: Address) -> Result<Address, ScriptError> {
    if address.is_zero() {
        return Err(ScriptError::Transaction(
            "deployment produced the zero address".to_string(),
        ));
    }

    Ok(address)
}

/// The address a contract created by `deployer` at `nonce` will have
pub fn predict_create_address(deployer: Address, nonce: u64) -> Address {
    deployer.create(nonce)
}

/// Record a deployment in the deployments file, keyed by network and contract.
///
/// Entries for other networks and contracts are preserved.
pub fn write_deployment(file_path: &Path, record: &DeploymentRecord) -> Result<(), ScriptError> {
    let mut deployments = if file_path.exists() {
        let contents = fs::read_to_string(file_path)
            .map_err(|e| ScriptError::ReadFile(format!("{}: {}", file_path.display(), e)))?;
        serde_json::from_str::<Value>(&contents)
            .map_err(|e| ScriptError::ReadFile(format!("{}: {}", file_path.display(), e)))?
    } else {
        Value::Object(Map::new())
    };

    let root = deployments.as_object_mut().ok_or_else(|| {
        ScriptError::WriteFile(format!(
            "{} does not hold a JSON object",
            file_path.display()
        ))
    })?;

    let network = root
        .entry(record.network.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    let network = network.as_object_mut().ok_or_else(|| {
        ScriptError::WriteFile(format!(
            "entry for network `{}` is not a JSON object",
            record.network
        ))
    })?;

    let mut entry = Map::new();
    entry.insert(
        PROXY_DEPLOYMENT_KEY.to_string(),
        Value::String(format!("{:#x}", record.proxy_address)),
    );
    entry.insert(
        PROXY_ADMIN_DEPLOYMENT_KEY.to_string(),
        Value::String(format!("{:#x}", record.proxy_admin_address)),
    );
    entry.insert(
        IMPLEMENTATION_DEPLOYMENT_KEY.to_string(),
        Value::String(format!("{:#x}", record.implementation_address)),
    );
    network.insert(record.contract_name.clone(), Value::Object(entry));

    let pretty = serde_json::to_string_pretty(&deployments)
        .map_err(|e| ScriptError::WriteFile(e.to_string()))?;
    fs::write(file_path, pretty)
        .map_err(|e| ScriptError::WriteFile(format!("{}: {}", file_path.display(), e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    /// A record for the given network with deterministic addresses
    fn record(network: &str) -> DeploymentRecord {
        DeploymentRecord {
            network: network.to_string(),
            chain_id: 365,
            contract_name: "OctoplaceMarketUpgradeable".to_string(),
            proxy_address: address!("1111111111111111111111111111111111111111"),
            proxy_admin_address: address!("2222222222222222222222222222222222222222"),
            implementation_address: address!("3333333333333333333333333333333333333333"),
            initializer: "init".to_string(),
            initializer_args: vec!["0xee69E72B0A1524329e6dD66D8c7e974D939e7690".to_string()],
            implementation_tx: TxHash::ZERO,
            proxy_tx: TxHash::ZERO,
        }
    }

    #[test]
    fn zero_address_is_rejected() {
        assert!(validate_contract_address(Address::ZERO).is_err());

        let addr = address!("ee69e72b0a1524329e6dd66d8c7e974d939e7690");
        assert_eq!(validate_contract_address(addr).unwrap(), addr);
    }

    #[test]
    fn successive_deployments_get_distinct_addresses() {
        let deployer = address!("19e7e376e7c213b7e7e7e46cc70a5dd086daff2a");

        let first = predict_create_address(deployer, 7);
        let second = predict_create_address(deployer, 8);

        assert_ne!(first, second);
        assert!(!first.is_zero());
        assert_eq!(first, predict_create_address(deployer, 7));
    }

    #[test]
    fn deployments_are_merged_per_network() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments.json");

        write_deployment(&path, &record("theta_testnet")).unwrap();
        write_deployment(&path, &record("theta_mainnet")).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        for network in ["theta_testnet", "theta_mainnet"] {
            let entry = &written[network]["OctoplaceMarketUpgradeable"];
            assert_eq!(
                entry[PROXY_DEPLOYMENT_KEY],
                "0x1111111111111111111111111111111111111111"
            );
            assert_eq!(
                entry[IMPLEMENTATION_DEPLOYMENT_KEY],
                "0x3333333333333333333333333333333333333333"
            );
        }
    }

    #[test]
    fn malformed_deployments_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(write_deployment(&path, &record("theta_testnet")).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[1, 2, 3]");
    }
}
