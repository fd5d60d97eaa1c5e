//! Loading of compiled Solidity contract artifacts.
//!
//! Truffle and Hardhat artifacts store the creation bytecode as a hex string;
//! Foundry artifacts wrap it in an object. Both shapes are accepted.

use std::{fs, path::Path};

use alloy::{
    json_abi::JsonAbi,
    primitives::{hex, Bytes},
};
use serde::Deserialize;

use crate::{constants::ARTIFACT_EXTENSION, errors::ScriptError};

/// The marker solc leaves in bytecode where an unlinked library address belongs
const UNLINKED_LIBRARY_MARKER: &str = "__";

/// A compiled contract, ready to deploy
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    /// The name of the contract
    pub contract_name: String,
    /// The contract ABI
    pub abi: JsonAbi,
    /// The creation bytecode
    pub bytecode: Bytes,
    /// The compiler version recorded in the artifact, if any
    pub compiler_version: Option<String>,
}

/// The on-disk shape of an artifact
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    /// Absent from Foundry artifacts
    #[serde(default)]
    contract_name: Option<String>,
    /// The contract ABI
    abi: JsonAbi,
    /// The creation bytecode
    bytecode: RawBytecode,
    /// Compiler metadata, recorded by Truffle
    #[serde(default)]
    compiler: Option<RawCompiler>,
}

/// The creation bytecode in either of its on-disk shapes
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    /// Truffle & Hardhat
    Hex(String),
    /// Foundry
    Object {
        /// The hex-encoded bytecode
        object: String,
    },
}

/// Compiler metadata recorded in an artifact
#[derive(Deserialize)]
struct RawCompiler {
    /// The full compiler version string
    version: String,
}

impl ContractArtifact {
    /// Parse an artifact from its JSON representation
    pub fn from_json(fallback_name: &str, json: &str) -> Result<Self, ScriptError> {
        let raw: RawArtifact = serde_json::from_str(json)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{fallback_name}: {e}")))?;

        let contract_name = raw
            .contract_name
            .unwrap_or_else(|| fallback_name.to_string());

        let hex_code = match raw.bytecode {
            RawBytecode::Hex(code) | RawBytecode::Object { object: code } => code,
        };

        if hex_code.contains(UNLINKED_LIBRARY_MARKER) {
            return Err(ScriptError::ArtifactParsing(format!(
                "{contract_name}: bytecode references unlinked libraries"
            )));
        }

        let bytecode = Bytes::from(
            hex::decode(hex_code.trim())
                .map_err(|e| ScriptError::ArtifactParsing(format!("{contract_name}: {e}")))?,
        );

        if bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "{contract_name}: no creation bytecode, the contract may be abstract"
            )));
        }

        Ok(Self {
            contract_name,
            abi: raw.abi,
            bytecode,
            compiler_version: raw.compiler.map(|c| c.version),
        })
    }
}

/// Load the artifact for the named contract from the artifacts directory
pub fn load_artifact(
    artifacts_dir: &Path,
    contract_name: &str,
) -> Result<ContractArtifact, ScriptError> {
    let path = artifacts_dir.join(format!("{contract_name}.{ARTIFACT_EXTENSION}"));
    let contents = fs::read_to_string(&path)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))?;

    ContractArtifact::from_json(contract_name, &contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal artifact in the Truffle layout
    const TRUFFLE_ARTIFACT: &str = r#"{
        "contractName": "OctoplaceMarketUpgradeable",
        "abi": [
            {
                "type": "function",
                "name": "init",
                "inputs": [{ "name": "admin", "type": "address", "internalType": "address" }],
                "outputs": [],
                "stateMutability": "nonpayable"
            }
        ],
        "bytecode": "0x6080604052348015600f57600080fd5b50",
        "compiler": { "name": "solc", "version": "0.8.17+commit.8df45f5f.Emscripten.clang" }
    }"#;

    #[test]
    fn parses_truffle_artifacts() {
        let artifact = ContractArtifact::from_json("ignored", TRUFFLE_ARTIFACT).unwrap();

        assert_eq!(artifact.contract_name, "OctoplaceMarketUpgradeable");
        assert_eq!(artifact.bytecode.len(), 17);
        assert!(artifact.abi.function("init").is_some());
        assert_eq!(
            artifact.compiler_version.as_deref(),
            Some("0.8.17+commit.8df45f5f.Emscripten.clang")
        );
    }

    #[test]
    fn parses_foundry_artifacts() {
        let json = r#"{ "abi": [], "bytecode": { "object": "0x60806040" } }"#;
        let artifact = ContractArtifact::from_json("TransparentUpgradeableProxy", json).unwrap();

        assert_eq!(artifact.contract_name, "TransparentUpgradeableProxy");
        assert_eq!(artifact.bytecode.as_ref(), &[0x60, 0x80, 0x60, 0x40]);
        assert!(artifact.compiler_version.is_none());
    }

    #[test]
    fn rejects_unlinked_bytecode() {
        let json = r#"{ "abi": [], "bytecode": "0x6080__$abcdef$__6040" }"#;
        let err = ContractArtifact::from_json("Linked", json).unwrap_err();
        assert!(matches!(err, ScriptError::ArtifactParsing(ref msg) if msg.contains("unlinked")));
    }

    #[test]
    fn rejects_empty_bytecode() {
        let json = r#"{ "abi": [], "bytecode": "0x" }"#;
        assert!(ContractArtifact::from_json("Interface", json).is_err());
    }

    #[test]
    fn missing_artifact_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_artifact(dir.path(), "Missing").unwrap_err();
        assert!(matches!(err, ScriptError::ReadFile(_)));
    }

    #[test]
    fn loads_artifacts_by_contract_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("OctoplaceMarketUpgradeable.json"),
            TRUFFLE_ARTIFACT,
        )
        .unwrap();

        let artifact = load_artifact(dir.path(), "OctoplaceMarketUpgradeable").unwrap();
        assert_eq!(artifact.contract_name, "OctoplaceMarketUpgradeable");
    }
}
