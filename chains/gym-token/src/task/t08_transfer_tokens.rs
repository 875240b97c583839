use crate::contract::{display_address, format_token_amount, parse_token_amount, TokenApi, TOKEN_DECIMALS, TOKEN_SYMBOL};
use crate::task::{Task, TaskContext, TaskResult};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ethers::prelude::*;

pub struct TransferTokensTask;

#[async_trait]
impl Task<TaskContext> for TransferTokensTask {
    fn name(&self) -> &str {
        "08_transferTokens"
    }

    async fn run(&self, ctx: TaskContext) -> Result<TaskResult> {
        println!("🚀 Preparing to transfer GYM tokens...\n");

        let token = ctx.signing_token()?;
        let sender = ctx.signer()?.address();
        println!("🔑 Sender address: {}", display_address(sender));

        let defaults = &ctx.config.transfer;
        let recipient: Address = defaults
            .recipient
            .parse()
            .map_err(|e| anyhow!("Invalid recipient '{}': {}", defaults.recipient, e))?;
        let amount = parse_token_amount(&defaults.amount, TOKEN_DECIMALS)?;
        let fmt = |v: U256| format!("{} {}", format_token_amount(v, TOKEN_DECIMALS), TOKEN_SYMBOL);

        println!(
            "📤 Sending {} tokens to {}...",
            fmt(amount),
            display_address(recipient)
        );

        println!("\n📊 Balances Before Transfer:");
        println!("Sender: {}", fmt(token.balance_of(sender).await?));
        println!("Recipient: {}", fmt(token.balance_of(recipient).await?));

        let outcome = async {
            let hash = token.submit_transfer(recipient, amount).await?;
            println!("\n⏳ Transaction sent! Waiting for confirmation...");
            println!("Transaction hash: {:?}", hash);
            token.wait_for_receipt(hash).await
        }
        .await;
        let receipt = match outcome {
            Ok(r) => r,
            Err(e) => {
                println!("\n❌ Transfer failed: {:#}", e);
                println!("Please check that the recipient address is valid and that you have sufficient token balance.");
                return Err(e);
            }
        };
        println!("\n✅ Transfer completed!");

        println!("\n📊 Balances After Transfer:");
        println!("Sender: {}", fmt(token.balance_of(sender).await?));
        println!("Recipient: {}", fmt(token.balance_of(recipient).await?));

        let hash = format!("{:?}", receipt.hash);
        if let Some(links) = ctx.links() {
            println!("\n🔍 View the transaction on Etherscan:");
            println!("{}", links.tx(&hash));
        }
        Ok(TaskResult::ok(format!("Sent {} to {}", fmt(amount), display_address(recipient))).with_tx(hash))
    }
}
