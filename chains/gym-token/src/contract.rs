//! GymToken contract binding.
//!
//! [`TokenApi`] is the seam the session, views and scripts talk to;
//! [`TokenBinding`] is the ethers-backed implementation over any middleware.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use core_logic::{GasConfig, TxError, WalletError};
use ethers::prelude::*;
use ethers::utils::{format_units, parse_units};
use std::sync::Arc;
use tracing::{debug, info};

ethers::contract::abigen!(
    GymToken,
    r#"[
        function name() view returns (string)
        function symbol() view returns (string)
        function decimals() view returns (uint8)
        function totalSupply() view returns (uint256)
        function balanceOf(address owner) view returns (uint256)
        function transfer(address to, uint256 amount) returns (bool)
        function approve(address spender, uint256 amount) returns (bool)
        function allowance(address owner, address spender) view returns (uint256)
        function transferFrom(address from, address to, uint256 amount) returns (bool)
        event Transfer(address indexed from, address indexed to, uint256 value)
        event Approval(address indexed owner, address indexed spender, uint256 value)
    ]"#
);

pub const TOKEN_DECIMALS: u32 = 18;
pub const TOKEN_SYMBOL: &str = "GYM";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
}

/// Mined transaction summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    pub hash: H256,
    pub block_number: Option<u64>,
    pub gas_used: Option<U256>,
}

#[async_trait]
pub trait TokenApi: Send + Sync {
    fn address(&self) -> Address;

    /// Whether writes can be signed through this handle.
    fn can_sign(&self) -> bool;

    async fn info(&self) -> Result<TokenInfo>;
    async fn total_supply(&self) -> Result<U256>;
    async fn balance_of(&self, owner: Address) -> Result<U256>;
    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256>;

    /// Broadcasts a transfer and returns its hash without waiting for it.
    async fn submit_transfer(&self, to: Address, amount: U256) -> Result<H256>;
    async fn submit_approve(&self, spender: Address, amount: U256) -> Result<H256>;

    /// Waits until the transaction is mined. A zero status is an error.
    async fn wait_for_receipt(&self, hash: H256) -> Result<TxOutcome>;

    async fn transfer(&self, to: Address, amount: U256) -> Result<TxOutcome> {
        let hash = self.submit_transfer(to, amount).await?;
        self.wait_for_receipt(hash).await
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<TxOutcome> {
        let hash = self.submit_approve(spender, amount).await?;
        self.wait_for_receipt(hash).await
    }
}

pub struct TokenBinding<M> {
    contract: GymToken<M>,
    client: Arc<M>,
    can_sign: bool,
    gas: GasConfig,
}

impl<M: Middleware + 'static> TokenBinding<M> {
    /// Handle over a plain provider; writes fail with [`WalletError::ReadOnly`].
    pub fn read_only(address: Address, client: Arc<M>, gas: GasConfig) -> Self {
        Self {
            contract: GymToken::new(address, client.clone()),
            client,
            can_sign: false,
            gas,
        }
    }

    /// Handle over a signing middleware.
    pub fn with_signer(address: Address, client: Arc<M>, gas: GasConfig) -> Self {
        Self {
            contract: GymToken::new(address, client.clone()),
            client,
            can_sign: true,
            gas,
        }
    }

    pub fn contract(&self) -> &GymToken<M> {
        &self.contract
    }

    async fn send_call(&self, call: ContractCall<M, bool>, label: &str) -> Result<H256> {
        if !self.can_sign {
            return Err(WalletError::ReadOnly.into());
        }

        let estimate = call
            .estimate_gas()
            .await
            .map_err(|e| anyhow!("{} gas estimation failed: {}", label, e))?;
        let gas_limit = self.gas.apply_multiplier(estimate.low_u64());
        debug!("{}: estimated {} gas, sending with {}", label, estimate, gas_limit);

        let call = call
            .legacy()
            .gas(gas_limit)
            .gas_price(U256::from(self.gas.gas_price_wei()));

        let pending = call.send().await.map_err(|e| anyhow!("{}", e))?;
        let hash = *pending;
        info!("{} submitted: {:?}", label, hash);
        Ok(hash)
    }
}

#[async_trait]
impl<M: Middleware + 'static> TokenApi for TokenBinding<M> {
    fn address(&self) -> Address {
        self.contract.address()
    }

    fn can_sign(&self) -> bool {
        self.can_sign
    }

    async fn info(&self) -> Result<TokenInfo> {
        let name = self
            .contract
            .name()
            .call()
            .await
            .map_err(|e| anyhow!("name() failed: {}", e))?;
        let symbol = self
            .contract
            .symbol()
            .call()
            .await
            .map_err(|e| anyhow!("symbol() failed: {}", e))?;
        let decimals = self
            .contract
            .decimals()
            .call()
            .await
            .map_err(|e| anyhow!("decimals() failed: {}", e))?;
        let total_supply = self.total_supply().await?;

        Ok(TokenInfo {
            address: self.address(),
            name,
            symbol,
            decimals,
            total_supply,
        })
    }

    async fn total_supply(&self) -> Result<U256> {
        self.contract
            .total_supply()
            .call()
            .await
            .map_err(|e| anyhow!("totalSupply() failed: {}", e))
    }

    async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.contract
            .balance_of(owner)
            .call()
            .await
            .map_err(|e| anyhow!("balanceOf() failed: {}", e))
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        self.contract
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|e| anyhow!("allowance() failed: {}", e))
    }

    async fn submit_transfer(&self, to: Address, amount: U256) -> Result<H256> {
        self.send_call(self.contract.transfer(to, amount), "transfer")
            .await
    }

    async fn submit_approve(&self, spender: Address, amount: U256) -> Result<H256> {
        self.send_call(self.contract.approve(spender, amount), "approve")
            .await
    }

    async fn wait_for_receipt(&self, hash: H256) -> Result<TxOutcome> {
        let receipt = PendingTransaction::new(hash, self.client.provider())
            .await
            .context("Failed to await transaction receipt")?
            .ok_or(TxError::Dropped {
                hash: format!("{:?}", hash),
            })?;

        if receipt.status == Some(U64::zero()) {
            return Err(TxError::Reverted {
                hash: format!("{:?}", hash),
            }
            .into());
        }

        Ok(TxOutcome {
            hash,
            block_number: receipt.block_number.map(|b| b.as_u64()),
            gas_used: receipt.gas_used,
        })
    }
}

/// Decimal token string to base units. Negative values are rejected.
pub fn parse_token_amount(value: &str, decimals: u32) -> Result<U256> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.starts_with('-') {
        return Err(anyhow!("Invalid token amount '{}'", value));
    }
    let parsed = parse_units(trimmed, decimals)
        .map_err(|e| anyhow!("Invalid token amount '{}': {}", value, e))?;
    Ok(parsed.into())
}

/// Base units to a decimal string with trailing zeros trimmed, keeping at
/// least one fractional digit ("0.0", "1.5", "1000.0").
pub fn format_token_amount(amount: U256, decimals: u32) -> String {
    let raw = format_units(amount, decimals).unwrap_or_else(|_| amount.to_string());
    match raw.split_once('.') {
        Some((int_part, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{}.0", int_part)
            } else {
                format!("{}.{}", int_part, frac)
            }
        }
        None => format!("{}.0", raw),
    }
}

/// Checksummed `0x` form used in notices and reports.
pub fn display_address(address: Address) -> String {
    ethers::utils::to_checksum(&address, None)
}
