//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use alloy::primitives::{Address, TxHash};
use serde::Serialize;

use crate::errors::ScriptError;

/// The outcome of a successful proxy deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentRecord {
    /// The network deployed to
    pub network: String,
    /// The chain id of that network
    pub chain_id: u64,
    /// The name of the implementation contract
    pub contract_name: String,
    /// The address of the proxy, the durable identifier of the deployment
    pub proxy_address: Address,
    /// The address of the `ProxyAdmin` created by the proxy
    pub proxy_admin_address: Address,
    /// The address of the implementation contract
    pub implementation_address: Address,
    /// The initializer invoked through the proxy
    pub initializer: String,
    /// The arguments the initializer was invoked with
    pub initializer_args: Vec<String>,
    /// The hash of the implementation deployment transaction
    pub implementation_tx: TxHash,
    /// The hash of the proxy deployment transaction
    pub proxy_tx: TxHash,
}

impl DeploymentRecord {
    /// Render the record as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ScriptError> {
        serde_json::to_string_pretty(self).map_err(|e| ScriptError::Serialization(e.to_string()))
    }
}

impl Display for DeploymentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deployed {} proxy at {:#x}", self.contract_name, self.proxy_address)?;
        writeln!(f, "\tnetwork: {} (chain id {})", self.network, self.chain_id)?;
        writeln!(f, "\tproxy admin: {:#x}", self.proxy_admin_address)?;
        writeln!(f, "\timplementation: {:#x}", self.implementation_address)?;
        writeln!(
            f,
            "\tinitializer: {}({})",
            self.initializer,
            self.initializer_args.join(", ")
        )?;
        writeln!(f, "\timplementation tx: {:#x}", self.implementation_tx)?;
        write!(f, "\tproxy tx: {:#x}", self.proxy_tx)
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, b256};

    use super::*;

    /// A record with deterministic addresses and hashes
    fn record() -> DeploymentRecord {
        DeploymentRecord {
            network: "theta_testnet".to_string(),
            chain_id: 365,
            contract_name: "OctoplaceMarketUpgradeable".to_string(),
            proxy_address: address!("1111111111111111111111111111111111111111"),
            proxy_admin_address: address!("2222222222222222222222222222222222222222"),
            implementation_address: address!("3333333333333333333333333333333333333333"),
            initializer: "init".to_string(),
            initializer_args: vec!["0x0000000000000000000000000000000000000001".to_string()],
            implementation_tx: b256!(
                "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
            ),
            proxy_tx: b256!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
        }
    }

    #[test]
    fn report_leads_with_the_proxy_address() {
        let printed = record().to_string();
        let mut lines = printed.lines();

        assert_eq!(
            lines.next(),
            Some("Deployed OctoplaceMarketUpgradeable proxy at 0x1111111111111111111111111111111111111111")
        );
        assert!(printed.contains("\tproxy admin: 0x2222222222222222222222222222222222222222"));
        assert!(printed.contains("\tinitializer: init(0x0000000000000000000000000000000000000001)"));
        assert!(printed.contains(&format!("\timplementation tx: 0x{}", "a".repeat(64))));
        assert!(printed.ends_with(&format!("\tproxy tx: 0x{}", "b".repeat(64))));
    }

    #[test]
    fn json_report_carries_every_address() {
        let json: serde_json::Value = serde_json::from_str(&record().to_json().unwrap()).unwrap();

        assert_eq!(json["network"], "theta_testnet");
        assert_eq!(json["chain_id"], 365);
        assert_eq!(json["proxy_address"], "0x1111111111111111111111111111111111111111");
        assert_eq!(json["implementation_address"], "0x3333333333333333333333333333333333333333");
        assert_eq!(json["proxy_tx"], format!("0x{}", "b".repeat(64)));
    }
}
