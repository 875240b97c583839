use crate::contract::{format_token_amount, TokenApi, TOKEN_DECIMALS, TOKEN_SYMBOL};
use crate::task::{Task, TaskContext, TaskResult};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ethers::prelude::*;
use ethers::utils::format_ether;
use tracing::warn;

pub const SEPOLIA_FAUCETS: [&str; 3] = [
    "https://sepoliafaucet.com/",
    "https://www.alchemy.com/faucets/ethereum-sepolia",
    "https://cloud.google.com/application/web3/faucet/ethereum/sepolia",
];

pub struct CheckBalanceTask;

#[async_trait]
impl Task<TaskContext> for CheckBalanceTask {
    fn name(&self) -> &str {
        "02_checkBalance"
    }

    async fn run(&self, ctx: TaskContext) -> Result<TaskResult> {
        println!("🔍 Checking wallet information for {} deployment...\n", ctx.network.name);

        let address = ctx.signer()?.address();
        let provider = ctx.provider()?;

        println!("📋 Wallet Details:");
        println!("==================");
        println!("Address: {:?}", address);

        let balance = provider
            .get_balance(address, None)
            .await
            .map_err(|e| anyhow!("Failed to read ETH balance: {}", e))?;
        println!("ETH Balance: {} ETH", format_ether(balance));

        let token_read = async {
            let token = ctx.read_token(provider.clone())?;
            let own = token.balance_of(address).await?;
            let supply = token.total_supply().await?;
            Ok::<_, anyhow::Error>((own, supply))
        }
        .await;
        match token_read {
            Ok((own, supply)) => {
                println!(
                    "GYM Token Balance: {} {}",
                    format_token_amount(own, TOKEN_DECIMALS),
                    TOKEN_SYMBOL
                );
                println!(
                    "Total Supply: {} {}",
                    format_token_amount(supply, TOKEN_DECIMALS),
                    TOKEN_SYMBOL
                );
            }
            Err(e) => {
                warn!("Token read failed: {:#}", e);
                println!("\n⚠️ Could not fetch GymToken balance. Contract may not be deployed on this network.");
            }
        }

        println!("\n💰 Estimated Deployment Cost:");
        println!("==================");
        println!("Approximate gas needed: ~0.001 - 0.002 ETH");

        if balance.is_zero() {
            println!("\n⚠️  Your wallet has ZERO balance!");
            println!("\n📝 Next Steps:");
            println!("1. Copy your wallet address above");
            println!("2. Visit one of these Sepolia faucets:");
            for faucet in SEPOLIA_FAUCETS {
                println!("   - {}", faucet);
            }
            println!("3. Request test ETH (usually 0.5 - 1 ETH per request)");
            println!("4. Wait 1-2 minutes for the transaction to confirm");
            println!("5. Run this script again to verify balance");
            println!("6. Deploy: deploy --network sepolia");
        } else {
            println!("\n✅ Wallet has sufficient balance for deployment!");
            println!("You can proceed with: deploy --network sepolia");
        }

        Ok(TaskResult::ok(format!("{:?} holds {} ETH", address, format_ether(balance))))
    }
}
