use crate::config::AirdropRecipient;
use crate::contract::{display_address, format_token_amount, parse_token_amount, TokenApi, TOKEN_SYMBOL};
use crate::task::{Task, TaskContext, TaskResult};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use core_logic::TxError;
use ethers::prelude::*;
use tracing::info;

/// A recipient list resolved to addresses and base units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirdropPlan {
    pub transfers: Vec<(Address, U256)>,
    pub total: U256,
}

impl AirdropPlan {
    pub fn build(recipients: &[AirdropRecipient], decimals: u32) -> Result<Self> {
        if recipients.is_empty() {
            return Err(anyhow!("Airdrop recipient list is empty"));
        }
        let mut transfers = Vec::with_capacity(recipients.len());
        let mut total = U256::zero();
        for r in recipients {
            let address: Address = r
                .address
                .parse()
                .map_err(|e| anyhow!("Invalid recipient address '{}': {}", r.address, e))?;
            let amount = parse_token_amount(&r.amount, decimals)?;
            total = total
                .checked_add(amount)
                .ok_or_else(|| anyhow!("Airdrop total overflows"))?;
            transfers.push((address, amount));
        }
        Ok(Self { transfers, total })
    }
}

pub struct AirdropTask;

#[async_trait]
impl Task<TaskContext> for AirdropTask {
    fn name(&self) -> &str {
        "03_airdrop"
    }

    async fn run(&self, ctx: TaskContext) -> Result<TaskResult> {
        println!("🚀 GymToken Airdrop Script");
        println!("========================\n");

        let owner = ctx.signer()?.address();
        let token = ctx.signing_token()?;
        println!("Token Owner: {}", display_address(owner));
        println!("GymToken Address: {}", display_address(token.address()));

        let decimals = u32::from(token.contract().decimals().call().await.map_err(|e| anyhow!("decimals() failed: {}", e))?);
        let balance = token.balance_of(owner).await?;
        println!("Owner Balance: {} {}\n", format_token_amount(balance, decimals), TOKEN_SYMBOL);

        let recipients = &ctx.config.airdrop.recipients;
        let plan = AirdropPlan::build(recipients, decimals)?;

        if balance < plan.total {
            println!("❌ Error: Insufficient token balance!");
            println!("Required: {} {}", format_token_amount(plan.total, decimals), TOKEN_SYMBOL);
            println!("Available: {} {}", format_token_amount(balance, decimals), TOKEN_SYMBOL);
            return Err(TxError::InsufficientBalance {
                required: format_token_amount(plan.total, decimals),
                available: format_token_amount(balance, decimals),
            }
            .into());
        }

        println!("📦 Airdrop Summary:");
        println!("=================");
        println!("Recipients: {}", plan.transfers.len());
        println!("Total Tokens: {} {}\n", format_token_amount(plan.total, decimals), TOKEN_SYMBOL);
        println!("Recipient Details:");
        for (i, r) in recipients.iter().enumerate() {
            println!("{}. {} - {} {}", i + 1, r.address, r.amount, TOKEN_SYMBOL);
        }

        println!("\n🚀 Performing airdrop...");
        let count = plan.transfers.len();
        let mut last_hash = None;
        for (i, (to, amount)) in plan.transfers.iter().enumerate() {
            println!("Processing {}/{}: {}", i + 1, count, display_address(*to));
            let hash = token.submit_transfer(*to, *amount).await?;
            println!("Transaction sent: {:?}", hash);
            println!("Waiting for confirmation...");
            token.wait_for_receipt(hash).await?;
            println!("✅ Transfer confirmed!");
            last_hash = Some(hash);
        }

        let remaining = token.balance_of(owner).await?;
        info!("Airdrop sent {} to {} recipients", format_token_amount(plan.total, decimals), count);
        println!("\n✅ Airdrop completed successfully!");
        println!("Remaining Balance: {} {}", format_token_amount(remaining, decimals), TOKEN_SYMBOL);

        let mut result = TaskResult::ok(format!("Airdropped to {} recipients", count));
        if let Some(hash) = last_hash {
            result = result.with_tx(format!("{:?}", hash));
        }
        Ok(result)
    }
}
