use super::TransferRow;
use crate::contract::display_address;
use crate::indexer::TransferIndex;
use crate::session::{BalanceStatus, Notice, Session};
use core_logic::{format_address, format_with_commas_str, ExplorerLinks, SEPOLIA_CHAIN_ID};
use tracing::error;

/// Rows shown under "Recent transactions".
pub const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardModel {
    pub account: String,
    pub account_short: String,
    pub balance: String,
    pub balance_status: BalanceStatus,
    pub network: String,
    pub network_supported: bool,
    pub network_note: String,
    pub transactions: Vec<TransferRow>,
    pub account_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dashboard {
    NotConnected,
    Ready(Box<DashboardModel>),
}

pub struct DashboardView;

impl DashboardView {
    pub async fn load(
        session: &mut Session,
        index: &dyn TransferIndex,
        links: Option<&ExplorerLinks>,
        now: i64,
    ) -> Dashboard {
        let Some(account) = session.account() else {
            return Dashboard::NotConnected;
        };

        let transactions = match index.recent_transfers(Some(account), RECENT_LIMIT).await {
            Ok(page) => page
                .records
                .iter()
                .map(|r| TransferRow::from_record(r, links, now))
                .collect(),
            Err(e) => {
                error!("Error fetching transactions: {:#}", e);
                session.notify(Notice::error("Error fetching transactions").with_description(format!("{:#}", e)));
                Vec::new()
            }
        };

        let supported = session.chain_id() == Some(SEPOLIA_CHAIN_ID);
        let shown = display_address(account);
        Dashboard::Ready(Box::new(DashboardModel {
            account_short: format_address(&shown, 4),
            account_url: links.map(|l| l.address(&shown)),
            account: shown,
            balance: format_with_commas_str(session.token_balance()),
            balance_status: session.balance_status(),
            network: if supported { "Sepolia" } else { "Unknown" }.to_string(),
            network_supported: supported,
            network_note: if supported {
                "Connected to Sepolia testnet"
            } else {
                "Unsupported network"
            }
            .to_string(),
            transactions,
        }))
    }
}
