//! # Utilities Module
//!
//! Internal utility modules for the core-logic crate.
//! These modules are marked as `pub(crate)` to enforce API boundaries.

pub(crate) mod advice;
pub(crate) mod formatters;
pub(crate) mod gas;
pub(crate) mod logger;
pub(crate) mod rpc_manager;
pub(crate) mod runner;
pub(crate) mod wallet_manager;

pub use gas::{gwei_to_wei, GasConfig, GasConfigToml};
pub use logger::{setup_logger, RESULT_TARGET};
pub use rpc_manager::{RpcEndpoint, RpcHealthStatus, RpcManager, PROBE_TIMEOUT};
pub use runner::ScriptRunner;
pub use wallet_manager::{LoadedKey, WalletManager};
