//! Recent `Transfer` events for the dashboard, explorer and scripts.

use crate::contract::{GymToken, TransferFilter};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ethers::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// How far back [`LogScanIndex`] looks, roughly a day or two on Sepolia.
pub const DEFAULT_LOOKBACK_BLOCKS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
    SelfTransfer,
    Unrelated,
}

impl Direction {
    pub fn relative_to(from: Address, to: Address, viewer: Option<Address>) -> Self {
        match viewer {
            Some(v) if v == from && v == to => Direction::SelfTransfer,
            Some(v) if v == to => Direction::Incoming,
            Some(v) if v == from => Direction::Outgoing,
            _ => Direction::Unrelated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub hash: H256,
    pub from: Address,
    pub to: Address,
    pub amount: U256,
    /// UNIX seconds; `None` when the block could not be fetched
    pub timestamp: Option<i64>,
    pub block_number: u64,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferPage {
    /// Newest first, at most `limit` entries
    pub records: Vec<TransactionRecord>,
    /// Matches in the scanned range before the limit was applied
    pub total_found: usize,
}

#[async_trait]
pub trait TransferIndex: Send + Sync {
    async fn recent_transfers(&self, involving: Option<Address>, limit: usize) -> Result<TransferPage>;
}

/// Scans `Transfer` logs straight from the node.
pub struct LogScanIndex<M> {
    contract: GymToken<M>,
    client: Arc<M>,
    lookback: u64,
}

impl<M: Middleware + 'static> LogScanIndex<M> {
    pub fn new(token: Address, client: Arc<M>) -> Self {
        Self {
            contract: GymToken::new(token, client.clone()),
            client,
            lookback: DEFAULT_LOOKBACK_BLOCKS,
        }
    }

    pub fn with_lookback(mut self, blocks: u64) -> Self {
        self.lookback = blocks;
        self
    }

    async fn block_timestamp(&self, block: u64, cache: &mut HashMap<u64, Option<i64>>) -> Option<i64> {
        if let Some(ts) = cache.get(&block) {
            return *ts;
        }
        let ts = match self.client.get_block(block).await {
            Ok(Some(b)) => block_time(b.timestamp),
            Ok(None) => None,
            Err(e) => {
                warn!("Could not fetch block {}: {}", block, e);
                None
            }
        };
        cache.insert(block, ts);
        ts
    }
}

#[async_trait]
impl<M: Middleware + 'static> TransferIndex for LogScanIndex<M> {
    async fn recent_transfers(&self, involving: Option<Address>, limit: usize) -> Result<TransferPage> {
        let current = self
            .client
            .get_block_number()
            .await
            .map_err(|e| anyhow!("Failed to read block number: {}", e))?
            .as_u64();
        let from_block = current.saturating_sub(self.lookback);
        debug!("Scanning Transfer logs in blocks {}..={}", from_block, current);

        let logs: Vec<(TransferFilter, LogMeta)> = self
            .contract
            .transfer_filter()
            .from_block(from_block)
            .to_block(current)
            .query_with_meta()
            .await
            .map_err(|e| anyhow!("Failed to query Transfer events: {}", e))?;

        let mut matching: Vec<(TransferFilter, LogMeta)> = logs
            .into_iter()
            .filter(|(ev, _)| involving.map_or(true, |a| ev.from == a || ev.to == a))
            .collect();
        matching.sort_by(|(_, a), (_, b)| {
            b.block_number
                .cmp(&a.block_number)
                .then(b.log_index.cmp(&a.log_index))
        });

        let total_found = matching.len();
        let mut cache = HashMap::new();
        let mut records = Vec::with_capacity(limit.min(total_found));
        for (ev, meta) in matching.into_iter().take(limit) {
            let block_number = meta.block_number.as_u64();
            records.push(TransactionRecord {
                hash: meta.transaction_hash,
                from: ev.from,
                to: ev.to,
                amount: ev.value,
                timestamp: self.block_timestamp(block_number, &mut cache).await,
                block_number,
                direction: Direction::relative_to(ev.from, ev.to, involving),
            });
        }

        Ok(TransferPage {
            records,
            total_found,
        })
    }
}

/// Block timestamp as UNIX seconds; `None` when it does not fit an `i64`.
fn block_time(timestamp: U256) -> Option<i64> {
    u64::try_from(timestamp)
        .ok()
        .and_then(|secs| i64::try_from(secs).ok())
}
