#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use gym_token::contract::{parse_token_amount, TokenApi, TokenInfo, TxOutcome};
use gym_token::indexer::{Direction, TransactionRecord, TransferIndex, TransferPage};
use gym_token::session::{ChainAccess, InjectedWallet, Session, SessionEvent, WalletEvent};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

pub const SEPOLIA: u64 = 11_155_111;

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn tokens(amount: &str) -> U256 {
    parse_token_amount(amount, 18).unwrap()
}

/// In-memory token keyed by owner; counts writes.
pub struct MockToken {
    pub address: Address,
    pub signer: Option<Address>,
    pub chain_id: u64,
    pub balances: Mutex<HashMap<Address, U256>>,
    pub supply: U256,
    pub transfers: AtomicUsize,
    pub fail_transfer: Option<String>,
    pub fail_reads: bool,
}

impl MockToken {
    pub fn new(address: Address, signer: Option<Address>, chain_id: u64) -> Self {
        Self {
            address,
            signer,
            chain_id,
            balances: Mutex::new(HashMap::new()),
            supply: tokens("1000000000"),
            transfers: AtomicUsize::new(0),
            fail_transfer: None,
            fail_reads: false,
        }
    }

    pub fn with_balance(self, owner: Address, amount: &str) -> Self {
        self.balances.lock().unwrap().insert(owner, tokens(amount));
        self
    }

    pub fn transfer_count(&self) -> usize {
        self.transfers.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenApi for MockToken {
    fn address(&self) -> Address {
        self.address
    }

    fn can_sign(&self) -> bool {
        self.signer.is_some()
    }

    async fn info(&self) -> Result<TokenInfo> {
        Ok(TokenInfo {
            address: self.address,
            name: "GymToken".to_string(),
            symbol: "GYM".to_string(),
            decimals: 18,
            total_supply: self.supply,
        })
    }

    async fn total_supply(&self) -> Result<U256> {
        Ok(self.supply)
    }

    async fn balance_of(&self, owner: Address) -> Result<U256> {
        if self.fail_reads {
            return Err(anyhow!("network error: connection refused"));
        }
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&owner)
            .copied()
            .unwrap_or_default())
    }

    async fn allowance(&self, _owner: Address, _spender: Address) -> Result<U256> {
        Ok(U256::zero())
    }

    async fn submit_transfer(&self, to: Address, amount: U256) -> Result<H256> {
        self.transfers.fetch_add(1, Ordering::SeqCst);
        let from = self.signer.ok_or_else(|| anyhow!("read-only"))?;
        if let Some(msg) = &self.fail_transfer {
            return Err(anyhow!(msg.clone()));
        }
        let mut balances = self.balances.lock().unwrap();
        let have = balances.get(&from).copied().unwrap_or_default();
        if have < amount {
            return Err(anyhow!("execution reverted: ERC20: transfer amount exceeds balance"));
        }
        balances.insert(from, have - amount);
        *balances.entry(to).or_default() += amount;
        Ok(H256::repeat_byte(0xab))
    }

    async fn submit_approve(&self, _spender: Address, _amount: U256) -> Result<H256> {
        Ok(H256::repeat_byte(0xcd))
    }

    async fn wait_for_receipt(&self, hash: H256) -> Result<TxOutcome> {
        Ok(TxOutcome {
            hash,
            block_number: Some(1),
            gas_used: Some(U256::from(21_000u64)),
        })
    }
}

/// Scriptable injected wallet. Tokens handed out share one balance table.
pub struct MockWallet {
    pub accounts: Mutex<Vec<Address>>,
    pub chain_id: Mutex<u64>,
    pub reject: bool,
    pub events: broadcast::Sender<WalletEvent>,
    pub binds: Mutex<Vec<(Address, u64)>>,
    pub balances: Mutex<HashMap<Address, U256>>,
    pub fail_transfer: Option<String>,
}

impl MockWallet {
    pub fn new(accounts: Vec<Address>, chain_id: u64) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            accounts: Mutex::new(accounts),
            chain_id: Mutex::new(chain_id),
            reject: false,
            events,
            binds: Mutex::new(Vec::new()),
            balances: Mutex::new(HashMap::new()),
            fail_transfer: None,
        }
    }

    /// Every bound token reverts transfers with `message`.
    pub fn reverting(mut self, message: &str) -> Self {
        self.fail_transfer = Some(message.to_string());
        self
    }

    pub fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    pub fn set_balance(&self, owner: Address, amount: &str) {
        self.balances.lock().unwrap().insert(owner, tokens(amount));
    }

    pub fn push(&self, event: WalletEvent) {
        self.events.send(event).unwrap();
    }

    pub fn bind_count(&self) -> usize {
        self.binds.lock().unwrap().len()
    }
}

#[async_trait]
impl InjectedWallet for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        if self.reject {
            return Err(anyhow!("User rejected the request."));
        }
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(*self.chain_id.lock().unwrap())
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }

    fn bind_token(&self, token: Address, account: Address, chain_id: u64) -> Result<Arc<dyn TokenApi>> {
        self.binds.lock().unwrap().push((account, chain_id));
        let mut mock = MockToken::new(token, Some(account), chain_id);
        mock.fail_transfer = self.fail_transfer.clone();
        *mock.balances.lock().unwrap() = self.balances.lock().unwrap().clone();
        Ok(Arc::new(mock))
    }
}

/// Read-only chain with a fixed token.
pub struct MockChain {
    pub chain_id: Option<u64>,
    pub token: Arc<MockToken>,
}

impl MockChain {
    pub fn new(chain_id: Option<u64>) -> Self {
        Self {
            chain_id,
            token: Arc::new(MockToken::new(addr(0xee), None, chain_id.unwrap_or(SEPOLIA))),
        }
    }
}

#[async_trait]
impl ChainAccess for MockChain {
    async fn chain_id(&self) -> Result<u64> {
        self.chain_id.ok_or_else(|| anyhow!("could not detect network"))
    }

    fn bind_token(&self, _token: Address) -> Arc<dyn TokenApi> {
        self.token.clone()
    }
}

pub struct MockIndex {
    pub records: Vec<TransactionRecord>,
    pub fail: bool,
}

impl MockIndex {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            records: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl TransferIndex for MockIndex {
    async fn recent_transfers(&self, involving: Option<Address>, limit: usize) -> Result<TransferPage> {
        if self.fail {
            return Err(anyhow!("query returned more than 10000 results"));
        }
        let matching: Vec<TransactionRecord> = self
            .records
            .iter()
            .filter(|r| involving.map_or(true, |a| r.from == a || r.to == a))
            .map(|r| TransactionRecord {
                direction: Direction::relative_to(r.from, r.to, involving),
                ..r.clone()
            })
            .collect();
        Ok(TransferPage {
            total_found: matching.len(),
            records: matching.into_iter().take(limit).collect(),
        })
    }
}

pub fn record(hash: u8, from: Address, to: Address, amount: &str, block: u64, timestamp: i64) -> TransactionRecord {
    TransactionRecord {
        hash: H256::repeat_byte(hash),
        from,
        to,
        amount: tokens(amount),
        timestamp: Some(timestamp),
        block_number: block,
        direction: Direction::Unrelated,
    }
}

pub fn session_with(wallet: Option<Arc<MockWallet>>, chain: MockChain) -> Session {
    Session::new(
        addr(0xee),
        wallet.map(|w| w as Arc<dyn InjectedWallet>),
        Arc::new(chain),
    )
}

/// Drains everything currently queued on a session subscription.
pub fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev);
    }
    out
}

pub fn notice_titles(events: &[SessionEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::Notice(n) => Some(n.title.clone()),
            _ => None,
        })
        .collect()
}
