//! # Core Logic - Shared Utilities for the GymToken Toolkit
//!
//! This crate provides the chain-agnostic pieces shared by the frontend
//! session layer and the developer scripts.
//!
//! ## Modules
//!
//! - [`config`] - Network and wallet-source configuration primitives
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - Core trait definitions (script tasks)
//! - [`utils`] - Formatting, logging, key loading, RPC health and error advice

pub mod config;
pub mod error;
pub mod traits;
pub(crate) mod utils;

pub use config::{ExplorerLinks, NetworkArgs, NetworkProfile, WalletSource};
pub use error::{ConfigError, CoreError, FormError, NetworkError, TxError, WalletError};
pub use traits::{Task, TaskResult};

pub use utils::{
    gwei_to_wei, setup_logger, GasConfig, GasConfigToml, LoadedKey, RpcEndpoint, RpcHealthStatus,
    RpcManager, ScriptRunner, WalletManager, PROBE_TIMEOUT, RESULT_TARGET,
};

pub use utils::advice::{advise, ephemeral_network_notice, Advice};
pub use utils::formatters::{
    format_address, format_token_balance, format_with_commas, format_with_commas_str,
    group_digits, is_valid_address, network_name, short_address, time_difference, time_since,
    SEPOLIA_CHAIN_ID,
};
