//! # Wallet Session
//!
//! Owns the connection state of one user: the active account, the chain it is
//! on, a token handle bound to that pair and the cached token balance.
//! Everything user-facing is published as [`SessionEvent`]s.
//!
//! ```text
//! Disconnected --connect()--> Connecting --ok--> Connected(account, chain)
//!      |                          |
//!      |                          +--rejected--> Disconnected
//!      +--connect() without wallet--> ReadOnly(chain)
//! ```

pub mod wallet;

use crate::contract::{display_address, format_token_amount, TokenApi, TOKEN_DECIMALS};
use anyhow::Result;
use core_logic::{format_address, NetworkError, WalletError, SEPOLIA_CHAIN_ID};
use ethers::types::Address;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

pub use wallet::{parse_chain_id, ChainAccess, InjectedWallet, LocalKeyWallet, ReadOnlyRpc, WalletEvent};

pub const INSTALL_WALLET_URL: &str = "https://metamask.io/download/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: Option<String>,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: None,
        }
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title)
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Notice(Notice),
    AccountChanged(Address),
    ChainChanged(u64),
    Disconnected,
    BalanceUpdated(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Disconnected,
    Connecting,
    Connected { account: Address, chain_id: Option<u64> },
    ReadOnly { chain_id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceStatus {
    Loading,
    Fresh,
    /// Last refresh failed; the cached value is from an earlier fetch.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionState {
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
    pub is_connected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Disconnected,
    Connecting,
    Connected,
    ReadOnly,
}

pub struct Session {
    token_address: Address,
    wallet: Option<Arc<dyn InjectedWallet>>,
    read_only: Arc<dyn ChainAccess>,
    wallet_events: Option<broadcast::Receiver<WalletEvent>>,
    mode: Mode,
    account: Option<Address>,
    chain_id: Option<u64>,
    token: Option<Arc<dyn TokenApi>>,
    token_balance: String,
    balance_status: BalanceStatus,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new(
        token_address: Address,
        wallet: Option<Arc<dyn InjectedWallet>>,
        read_only: Arc<dyn ChainAccess>,
    ) -> Self {
        let wallet_events = wallet.as_ref().map(|w| w.subscribe());
        let (events, _) = broadcast::channel(64);
        Self {
            token_address,
            wallet,
            read_only,
            wallet_events,
            mode: Mode::Disconnected,
            account: None,
            chain_id: None,
            token: None,
            token_balance: "0".to_string(),
            balance_status: BalanceStatus::Fresh,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Publishes a notice to subscribers.
    pub fn notify(&self, notice: Notice) {
        debug!("notice: {:?}", notice);
        self.emit(SessionEvent::Notice(notice));
    }

    fn emit(&self, event: SessionEvent) {
        // Nobody listening is not an error
        let _ = self.events.send(event);
    }

    /// Adopts an account the wallet already exposes, without prompting.
    pub async fn init(&mut self) {
        let Some(wallet) = self.wallet.clone() else {
            return;
        };

        let accounts = match wallet.accounts().await {
            Ok(a) => a,
            Err(e) => {
                error!("Failed to initialize provider: {:#}", e);
                return;
            }
        };
        let Some(account) = accounts.first().copied() else {
            return;
        };

        match wallet.chain_id().await {
            Ok(chain_id) => {
                self.chain_id = Some(chain_id);
                self.adopt_account(account).await;
            }
            Err(e) => error!("Failed to read chain id: {:#}", e),
        }
    }

    pub async fn connect(&mut self) -> Result<()> {
        let Some(wallet) = self.wallet.clone() else {
            self.enter_read_only().await;
            return Ok(());
        };

        self.mode = Mode::Connecting;
        match Self::request(wallet.as_ref()).await {
            Ok((account, chain_id)) => {
                self.chain_id = Some(chain_id);
                self.adopt_account(account).await;
                let shown = display_address(account);
                self.notify(
                    Notice::success("Wallet connected")
                        .with_description(format!("Connected to {}", format_address(&shown, 4))),
                );
                info!("Wallet connected: {}", shown);
                Ok(())
            }
            Err(e) => {
                error!("Error connecting wallet: {:#}", e);
                self.mode = if self.account.is_some() {
                    Mode::Connected
                } else {
                    Mode::Disconnected
                };
                self.notify(Notice::error("Connection error").with_description(format!("{:#}", e)));
                Err(e)
            }
        }
    }

    async fn request(wallet: &dyn InjectedWallet) -> Result<(Address, u64)> {
        let accounts = wallet.request_accounts().await?;
        let account = accounts.first().copied().ok_or(WalletError::NoAccounts)?;
        let chain_id = wallet.chain_id().await?;
        Ok((account, chain_id))
    }

    async fn enter_read_only(&mut self) {
        self.notify(
            Notice::warning("No Ethereum wallet found")
                .with_description("Please install MetaMask or another web3 wallet to continue."),
        );
        self.notify(
            Notice::info("Install a wallet")
                .with_description(format!("Install MetaMask from {}", INSTALL_WALLET_URL)),
        );

        let chain_id = match self.read_only.chain_id().await {
            Ok(id) => id,
            Err(e) => {
                warn!("Read-only RPC did not report a chain id: {:#}", e);
                SEPOLIA_CHAIN_ID
            }
        };

        self.mode = Mode::ReadOnly;
        self.account = None;
        self.chain_id = Some(chain_id);
        self.token = Some(self.read_only.bind_token(self.token_address));
        self.notify(
            Notice::info("Read-only mode activated").with_description(
                "You can browse the app but can't perform transactions without a wallet",
            ),
        );
        info!("Read-only mode on chain {}", chain_id);
    }

    /// Clears the account and its signer-bound handle. Wallet-side
    /// permissions stay granted.
    pub fn disconnect(&mut self) {
        self.reset_account();
        self.notify(Notice::info("Wallet disconnected"));
        self.emit(SessionEvent::Disconnected);
    }

    fn reset_account(&mut self) {
        self.mode = Mode::Disconnected;
        self.account = None;
        self.token = None;
        self.set_balance("0".to_string(), BalanceStatus::Fresh);
    }

    pub async fn handle_wallet_event(&mut self, event: WalletEvent) -> Result<()> {
        match event {
            WalletEvent::AccountsChanged(accounts) => match accounts.first().copied() {
                None => {
                    info!("Wallet exposed no accounts; disconnecting");
                    self.disconnect();
                }
                Some(account) if Some(account) != self.account => {
                    info!("Account switched to {:?}", account);
                    self.adopt_account(account).await;
                }
                Some(_) => {}
            },
            WalletEvent::ChainChanged(hex_id) => {
                let chain_id = parse_chain_id(&hex_id)
                    .ok_or(NetworkError::InvalidChainId { value: hex_id.clone() })?;
                info!("Chain changed to {}", chain_id);
                self.chain_id = Some(chain_id);
                self.token = None;
                self.emit(SessionEvent::ChainChanged(chain_id));
                if self.account.is_some() {
                    // Re-derives the handle for the new chain
                    self.balance_status = BalanceStatus::Loading;
                    self.refresh_balance().await;
                }
            }
        }
        Ok(())
    }

    /// Applies every wallet notification received since the last call.
    /// Returns how many were applied.
    pub async fn pump_events(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let Some(rx) = self.wallet_events.as_mut() else {
                break;
            };
            let event = match rx.try_recv() {
                Ok(ev) => ev,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("Dropped {} wallet notifications", skipped);
                    continue;
                }
                Err(_) => break,
            };
            if let Err(e) = self.handle_wallet_event(event).await {
                warn!("Ignoring wallet notification: {:#}", e);
                continue;
            }
            applied += 1;
        }
        applied
    }

    async fn adopt_account(&mut self, account: Address) {
        self.mode = Mode::Connected;
        self.account = Some(account);
        self.token = None;
        self.set_balance("0".to_string(), BalanceStatus::Loading);
        self.emit(SessionEvent::AccountChanged(account));
        self.refresh_balance().await;
    }

    /// Current token handle, re-derived after an account or chain change.
    pub fn token(&mut self) -> Option<Arc<dyn TokenApi>> {
        if self.token.is_none() {
            self.token = self.derive_token();
        }
        self.token.clone()
    }

    fn derive_token(&self) -> Option<Arc<dyn TokenApi>> {
        match self.mode {
            Mode::Connected => {
                let wallet = self.wallet.as_ref()?;
                let account = self.account?;
                let chain_id = self.chain_id.unwrap_or(SEPOLIA_CHAIN_ID);
                match wallet.bind_token(self.token_address, account, chain_id) {
                    Ok(handle) => Some(handle),
                    Err(e) => {
                        error!("Failed to initialize token contract: {:#}", e);
                        None
                    }
                }
            }
            Mode::ReadOnly => Some(self.read_only.bind_token(self.token_address)),
            Mode::Disconnected | Mode::Connecting => None,
        }
    }

    /// Re-reads `balanceOf` for the active account. On failure the previous
    /// value is kept and marked stale.
    pub async fn refresh_balance(&mut self) {
        let Some(account) = self.account else {
            return;
        };
        let Some(token) = self.token() else {
            self.balance_status = BalanceStatus::Stale;
            return;
        };

        match token.balance_of(account).await {
            Ok(raw) => {
                let formatted = format_token_amount(raw, TOKEN_DECIMALS);
                debug!("Balance for {:?}: {}", account, formatted);
                self.set_balance(formatted, BalanceStatus::Fresh);
            }
            Err(e) => {
                error!("Error fetching token balance: {:#}", e);
                self.balance_status = BalanceStatus::Stale;
            }
        }
    }

    fn set_balance(&mut self, value: String, status: BalanceStatus) {
        let changed = self.token_balance != value;
        self.token_balance = value;
        self.balance_status = status;
        if changed {
            self.emit(SessionEvent::BalanceUpdated(self.token_balance.clone()));
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        ConnectionState {
            account: self.account,
            chain_id: self.chain_id,
            is_connected: self.account.is_some(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        match self.mode {
            Mode::Disconnected => SessionStatus::Disconnected,
            Mode::Connecting => SessionStatus::Connecting,
            Mode::Connected => match self.account {
                Some(account) => SessionStatus::Connected {
                    account,
                    chain_id: self.chain_id,
                },
                None => SessionStatus::Disconnected,
            },
            Mode::ReadOnly => SessionStatus::ReadOnly {
                chain_id: self.chain_id.unwrap_or(SEPOLIA_CHAIN_ID),
            },
        }
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn token_address(&self) -> Address {
        self.token_address
    }

    pub fn token_balance(&self) -> &str {
        &self.token_balance
    }

    pub fn balance_status(&self) -> BalanceStatus {
        self.balance_status
    }

    pub fn is_loading(&self) -> bool {
        self.mode == Mode::Connecting
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet.is_some()
    }
}
