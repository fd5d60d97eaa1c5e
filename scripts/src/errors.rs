//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use alloy::{
    providers::PendingTransactionError,
    transports::{RpcError, TransportErrorKind},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Missing or invalid network name, credential, or other configuration
    Configuration(String),
    /// The RPC endpoint could not be reached
    Connectivity(String),
    /// The chain rejected or reverted a transaction
    Transaction(String),
    /// Error parsing a Solidity compilation artifact
    ArtifactParsing(String),
    /// Error constructing calldata for a contract method or constructor
    CalldataConstruction(String),
    /// Error reading a file
    ReadFile(String),
    /// Error writing a file
    WriteFile(String),
    /// Error serializing a deployment record
    Serialization(String),
}

impl ScriptError {
    /// Classify an RPC error into the connectivity / transaction taxonomy
    pub fn from_rpc(context: &str, err: RpcError<TransportErrorKind>) -> Self {
        match err {
            RpcError::Transport(kind) => {
                ScriptError::Connectivity(format!("{context}: {kind}"))
            }
            other => ScriptError::Transaction(format!("{context}: {other}")),
        }
    }

    /// Classify an error raised while awaiting a pending transaction
    pub fn from_pending(context: &str, err: PendingTransactionError) -> Self {
        match err {
            PendingTransactionError::TransportError(e) => Self::from_rpc(context, e),
            other => ScriptError::Transaction(format!("{context}: {other}")),
        }
    }

    /// Whether this error was raised before any network interaction could occur
    pub fn is_configuration(&self) -> bool {
        matches!(self, ScriptError::Configuration(_))
    }
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Configuration(s) => write!(f, "configuration error: {}", s),
            ScriptError::Connectivity(s) => write!(f, "connectivity error: {}", s),
            ScriptError::Transaction(s) => write!(f, "transaction error: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ReadFile(s) => write!(f, "error reading file: {}", s),
            ScriptError::WriteFile(s) => write!(f, "error writing file: {}", s),
            ScriptError::Serialization(s) => write!(f, "error serializing record: {}", s),
        }
    }
}

impl Error for ScriptError {}
