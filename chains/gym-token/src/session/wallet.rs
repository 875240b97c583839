//! Wallet and chain access seams used by [`super::Session`], plus the
//! ethers-backed implementations used outside of tests.

use crate::contract::{TokenApi, TokenBinding};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use core_logic::GasConfig;
use ethers::prelude::*;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Notifications an injected wallet pushes to the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    AccountsChanged(Vec<Address>),
    /// Hex-encoded chain id, e.g. `"0xaa36a7"`
    ChainChanged(String),
}

/// Read-only chain access for sessions without a wallet.
#[async_trait]
pub trait ChainAccess: Send + Sync {
    async fn chain_id(&self) -> Result<u64>;
    fn bind_token(&self, token: Address) -> Arc<dyn TokenApi>;
}

/// A wallet that holds accounts and signs on the user's behalf.
#[async_trait]
pub trait InjectedWallet: Send + Sync {
    /// Asks the user to expose accounts. May be rejected.
    async fn request_accounts(&self) -> Result<Vec<Address>>;

    /// Accounts already exposed to the app, without prompting.
    async fn accounts(&self) -> Result<Vec<Address>>;

    async fn chain_id(&self) -> Result<u64>;

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent>;

    /// Signing token handle for `account` on `chain_id`.
    fn bind_token(&self, token: Address, account: Address, chain_id: u64) -> Result<Arc<dyn TokenApi>>;
}

/// Public RPC fallback.
pub struct ReadOnlyRpc {
    provider: Provider<Http>,
    gas: GasConfig,
}

impl ReadOnlyRpc {
    pub fn new(provider: Provider<Http>, gas: GasConfig) -> Self {
        Self { provider, gas }
    }
}

#[async_trait]
impl ChainAccess for ReadOnlyRpc {
    async fn chain_id(&self) -> Result<u64> {
        let id = self
            .provider
            .get_chainid()
            .await
            .map_err(|e| anyhow!("{}", e))?;
        Ok(id.low_u64())
    }

    fn bind_token(&self, token: Address) -> Arc<dyn TokenApi> {
        Arc::new(TokenBinding::read_only(
            token,
            Arc::new(self.provider.clone()),
            self.gas.clone(),
        ))
    }
}

/// Wallet backed by a local private key. Always "approved"; the host pushes
/// account or chain switches through [`LocalKeyWallet::notify`].
pub struct LocalKeyWallet {
    provider: Provider<Http>,
    wallet: LocalWallet,
    gas: GasConfig,
    events: broadcast::Sender<WalletEvent>,
}

impl LocalKeyWallet {
    pub fn new(provider: Provider<Http>, wallet: LocalWallet, gas: GasConfig) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            provider,
            wallet,
            gas,
            events,
        }
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn notify(&self, event: WalletEvent) {
        // No subscribers yet is fine
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl InjectedWallet for LocalKeyWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        Ok(vec![self.wallet.address()])
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(vec![self.wallet.address()])
    }

    async fn chain_id(&self) -> Result<u64> {
        let id = self
            .provider
            .get_chainid()
            .await
            .map_err(|e| anyhow!("{}", e))?;
        Ok(id.low_u64())
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }

    fn bind_token(&self, token: Address, account: Address, chain_id: u64) -> Result<Arc<dyn TokenApi>> {
        if account != self.wallet.address() {
            return Err(anyhow!("Account {:?} is not managed by this wallet", account));
        }
        let signer = self.wallet.clone().with_chain_id(chain_id);
        let client = Arc::new(SignerMiddleware::new(self.provider.clone(), signer));
        Ok(Arc::new(TokenBinding::with_signer(token, client, self.gas.clone())))
    }
}

/// Parses the hex chain id carried by [`WalletEvent::ChainChanged`].
pub fn parse_chain_id(hex_id: &str) -> Option<u64> {
    let trimmed = hex_id.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u64::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chain_id() {
        assert_eq!(parse_chain_id("0xaa36a7"), Some(11_155_111));
        assert_eq!(parse_chain_id("0x1"), Some(1));
        assert_eq!(parse_chain_id("7a69"), Some(31_337));
        assert_eq!(parse_chain_id("0xzz"), None);
        assert_eq!(parse_chain_id(""), None);
    }
}
