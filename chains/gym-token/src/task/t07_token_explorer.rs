use crate::contract::{display_address, format_token_amount, TokenApi, TOKEN_DECIMALS, TOKEN_SYMBOL};
use crate::indexer::{LogScanIndex, TransferIndex};
use crate::task::{Task, TaskContext, TaskResult};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Local, TimeZone};
use std::sync::Arc;

/// Transfers printed by the script.
pub const SHOWN_TRANSFERS: usize = 5;

fn format_block_time(timestamp: Option<i64>) -> String {
    timestamp
        .and_then(|ts| Local.timestamp_opt(ts, 0).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown time".to_string())
}

pub struct TokenExplorerTask;

#[async_trait]
impl Task<TaskContext> for TokenExplorerTask {
    fn name(&self) -> &str {
        "07_tokenExplorer"
    }

    async fn run(&self, ctx: TaskContext) -> Result<TaskResult> {
        let network = ctx.network.name.clone();
        println!("📊 GymToken Explorer - {} network\n", network);

        if ctx.network.token_address.is_none() {
            println!("⚠️ No known GymToken deployment on {} network.", network);
            println!("Please deploy first or specify a different network.");
            return Ok(TaskResult::ok(format!("No deployment on {}", network)));
        }

        let provider = ctx.provider()?;
        let token = ctx.read_token(provider.clone())?;
        let links = ctx.links();
        let address = display_address(token.address());

        let info = token.info().await?;
        println!("📝 Token Information:");
        println!("=====================");
        println!("Name: {}", info.name);
        println!("Symbol: {}", info.symbol);
        println!("Decimals: {}", info.decimals);
        println!(
            "Total Supply: {} {}",
            format_token_amount(info.total_supply, TOKEN_DECIMALS),
            TOKEN_SYMBOL
        );
        println!("Contract Address: {}", address);
        if let Some(l) = &links {
            println!("Block Explorer: {}\n", l.token(&address));
        }

        println!("🔄 Recent Transfers:");
        println!("==================");
        let index = LogScanIndex::new(token.address(), Arc::new(provider));
        let page = index.recent_transfers(None, SHOWN_TRANSFERS).await?;

        if page.records.is_empty() {
            println!("No transfer events found in the recent blocks.");
        } else {
            for record in &page.records {
                let hash = format!("{:?}", record.hash);
                println!("\nTx: {}", hash);
                println!("Block: {} ({})", record.block_number, format_block_time(record.timestamp));
                println!("From: {}", display_address(record.from));
                println!("To: {}", display_address(record.to));
                println!(
                    "Amount: {} {}",
                    format_token_amount(record.amount, TOKEN_DECIMALS),
                    TOKEN_SYMBOL
                );
                if let Some(l) = &links {
                    println!("View: {}", l.tx(&hash));
                }
            }
            println!(
                "\nShowing {} of {} transfers found.",
                page.records.len(),
                page.total_found
            );
        }

        if let Some(l) = &links {
            println!("\n📌 Note: For a complete view of all transfers and holders, visit:");
            println!("{}", l.token(&address));
        }

        Ok(TaskResult::ok(format!(
            "{} transfers found on {}",
            page.total_found, network
        )))
    }
}
