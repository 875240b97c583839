//! Token explorer: supply, recent transfers and the largest holders among
//! the addresses those transfers touched.

use super::TransferRow;
use crate::contract::{display_address, format_token_amount, TokenApi, TOKEN_DECIMALS};
use crate::indexer::TransferIndex;
use crate::session::{Notice, Session};
use anyhow::{anyhow, Result};
use core_logic::{format_address, format_with_commas_str, ExplorerLinks};
use ethers::types::{Address, U256};
use std::collections::BTreeSet;
use tracing::{debug, error, warn};

pub const TRANSFER_LIMIT: usize = 20;
pub const TOP_HOLDERS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderRow {
    pub rank: usize,
    pub address: String,
    pub address_short: String,
    pub balance: String,
    pub raw_balance: U256,
    /// Share of total supply, two decimals
    pub percentage: String,
    pub explorer_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerModel {
    pub token_url: Option<String>,
    pub total_supply: String,
    pub transfers: Vec<TransferRow>,
    /// Transfers found in the scanned range, before the display limit
    pub transfer_count: usize,
    pub holders: Vec<HolderRow>,
    /// Distinct non-zero addresses seen in the transfers
    pub holder_count: usize,
}

impl ExplorerModel {
    /// Transfers whose hash, sender or recipient contains `query`.
    pub fn search(&self, query: &str) -> Vec<&TransferRow> {
        self.transfers.iter().filter(|row| row.matches(query)).collect()
    }
}

pub struct ExplorerView;

impl ExplorerView {
    pub async fn load(
        session: &mut Session,
        index: &dyn TransferIndex,
        links: Option<&ExplorerLinks>,
        now: i64,
    ) -> Result<ExplorerModel> {
        let Some(token) = session.token() else {
            session.notify(
                Notice::error("Contract not loaded")
                    .with_description("Please try connecting your wallet again."),
            );
            return Err(anyhow!("Contract not loaded"));
        };

        match Self::build(token.as_ref(), index, links, now).await {
            Ok(model) => Ok(model),
            Err(e) => {
                error!("Error loading explorer data: {:#}", e);
                session.notify(Notice::error("Error loading explorer data").with_description(format!("{:#}", e)));
                Err(e)
            }
        }
    }

    async fn build(
        token: &dyn TokenApi,
        index: &dyn TransferIndex,
        links: Option<&ExplorerLinks>,
        now: i64,
    ) -> Result<ExplorerModel> {
        let supply = token.total_supply().await?;
        let page = index.recent_transfers(None, TRANSFER_LIMIT).await?;

        let seen: BTreeSet<Address> = page
            .records
            .iter()
            .flat_map(|r| [r.from, r.to])
            .filter(|a| !a.is_zero())
            .collect();
        debug!("Explorer: {} transfers, {} distinct addresses", page.records.len(), seen.len());

        let mut balances = Vec::with_capacity(seen.len());
        for address in &seen {
            match token.balance_of(*address).await {
                Ok(balance) => balances.push((*address, balance)),
                Err(e) => warn!("Skipping holder {:?}: {:#}", address, e),
            }
        }
        balances.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let holders = balances
            .into_iter()
            .filter(|(_, balance)| !balance.is_zero())
            .take(TOP_HOLDERS)
            .enumerate()
            .map(|(i, (address, balance))| {
                let shown = display_address(address);
                HolderRow {
                    rank: i + 1,
                    address_short: format_address(&shown, 4),
                    explorer_url: links.map(|l| l.address(&shown)),
                    address: shown,
                    balance: format_with_commas_str(&format_token_amount(balance, TOKEN_DECIMALS)),
                    raw_balance: balance,
                    percentage: share_of_supply(balance, supply),
                }
            })
            .collect();

        let address_text = display_address(token.address());
        Ok(ExplorerModel {
            token_url: links.map(|l| l.token(&address_text)),
            total_supply: format_with_commas_str(&format_token_amount(supply, TOKEN_DECIMALS)),
            transfers: page
                .records
                .iter()
                .map(|r| TransferRow::from_record(r, links, now))
                .collect(),
            transfer_count: page.total_found,
            holders,
            holder_count: seen.len(),
        })
    }
}

/// `balance / supply` as a percentage with two decimals, computed in
/// integer basis points.
pub fn share_of_supply(balance: U256, supply: U256) -> String {
    if supply.is_zero() {
        return "0.00".to_string();
    }
    let bps = balance.saturating_mul(U256::from(10_000u64)) / supply;
    let bps = bps.min(U256::from(u64::MAX)).as_u64();
    format!("{}.{:02}", bps / 100, bps % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_of_supply() {
        let supply = U256::from(1_000_000u64);
        assert_eq!(share_of_supply(U256::from(250_000u64), supply), "25.00");
        assert_eq!(share_of_supply(U256::from(1u64), supply), "0.00");
        assert_eq!(share_of_supply(U256::from(123_456u64), supply), "12.34");
        assert_eq!(share_of_supply(U256::from(5u64), U256::zero()), "0.00");
    }
}
