//! Presentation controllers for the app pages. Each consumes the session and
//! its collaborators and produces a plain view model; feedback goes out as
//! session notices.

pub mod dashboard;
pub mod explorer;
pub mod home;
pub mod staking;
pub mod transfer;

use crate::contract::{display_address, format_token_amount, TOKEN_DECIMALS};
use crate::indexer::{Direction, TransactionRecord};
use core_logic::{format_address, format_with_commas_str, time_difference, ExplorerLinks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Dashboard,
    Transfer,
    Explorer,
    Staking,
}

impl Page {
    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Dashboard => "/dashboard",
            Page::Transfer => "/transfer",
            Page::Explorer => "/explorer",
            Page::Staking => "/staking",
        }
    }
}

/// One transfer as shown in a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRow {
    pub hash: String,
    pub from: String,
    pub to: String,
    pub from_short: String,
    pub to_short: String,
    /// Whole tokens, comma grouped
    pub amount: String,
    pub age: Option<String>,
    pub block_number: u64,
    pub direction: Direction,
    pub explorer_url: Option<String>,
}

impl TransferRow {
    pub fn from_record(record: &TransactionRecord, links: Option<&ExplorerLinks>, now: i64) -> Self {
        let hash = format!("{:?}", record.hash);
        let from = display_address(record.from);
        let to = display_address(record.to);
        Self {
            explorer_url: links.map(|l| l.tx(&hash)),
            from_short: format_address(&from, 4),
            to_short: format_address(&to, 4),
            amount: format_with_commas_str(&format_token_amount(record.amount, TOKEN_DECIMALS)),
            age: record.timestamp.map(|ts| time_difference(ts, now)),
            block_number: record.block_number,
            direction: record.direction,
            hash,
            from,
            to,
        }
    }

    /// Case-insensitive substring match on hash, sender and recipient.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.hash, &self.from, &self.to]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}
