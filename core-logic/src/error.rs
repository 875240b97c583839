//! # Core Error Types
//!
//! Centralized error definitions shared by the session layer and the scripts.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use thiserror::Error;

/// Unified error type for core-logic operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Config(ConfigError),

    #[error(transparent)]
    Wallet(WalletError),

    #[error(transparent)]
    Network(NetworkError),

    #[error(transparent)]
    Tx(TxError),

    #[error(transparent)]
    Form(FormError),

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

impl From<ConfigError> for CoreError {
    fn from(e: ConfigError) -> Self {
        CoreError::Config(e)
    }
}

impl From<WalletError> for CoreError {
    fn from(e: WalletError) -> Self {
        CoreError::Wallet(e)
    }
}

impl From<NetworkError> for CoreError {
    fn from(e: NetworkError) -> Self {
        CoreError::Network(e)
    }
}

impl From<TxError> for CoreError {
    fn from(e: TxError) -> Self {
        CoreError::Tx(e)
    }
}

impl From<FormError> for CoreError {
    fn from(e: FormError) -> Self {
        CoreError::Form(e)
    }
}

/// Configuration-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid RPC URL format: '{url}'")]
    InvalidRpcUrl { url: String },

    #[error("Missing required configuration field: '{field}'")]
    MissingField { field: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unknown network '{name}' (known: {known})")]
    UnknownNetwork { name: String, known: String },

    #[error("No known token deployment on network '{network}'")]
    NoDeployment { network: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("I/O error reading {path}: {msg}")]
    IoError { path: String, msg: String },
}

/// Wallet and connection errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("No Ethereum wallet found")]
    NotInstalled,

    #[error("User rejected the request: {reason}")]
    Rejected { reason: String },

    #[error("Wallet returned no accounts")]
    NoAccounts,

    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Read-only mode: transactions require a connected wallet")]
    ReadOnly,

    #[error("Missing private key: set {var} in the environment or .env file")]
    MissingKey { var: String },

    #[error("Invalid private key format: expected hex string")]
    InvalidKeyFormat,

    #[error("Private key has wrong length: expected 64 hex chars, got {length}")]
    InvalidKeyLength { length: usize },
}

/// Network and RPC-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Connection timed out after {timeout_ms}ms to {endpoint}")]
    Timeout { timeout_ms: u64, endpoint: String },

    #[error("Connection refused to {endpoint}: {reason}")]
    ConnectionRefused { endpoint: String, reason: String },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    #[error("All {count} RPC endpoints failed")]
    AllEndpointsFailed { count: usize },

    #[error("Invalid chain id '{value}'")]
    InvalidChainId { value: String },
}

/// Transaction outcome errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxError {
    #[error("Transaction {hash} reverted on-chain")]
    Reverted { hash: String },

    #[error("Transaction {hash} was dropped before it was mined")]
    Dropped { hash: String },

    #[error("Insufficient token balance: required {required}, available {available}")]
    InsufficientBalance { required: String, available: String },
}

/// Inline form validation failure. Blocks submission, never reaches the chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct FormError {
    pub field: String,
    pub message: String,
}

impl FormError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
