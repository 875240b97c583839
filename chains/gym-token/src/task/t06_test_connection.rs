use crate::task::{Task, TaskContext, TaskResult};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use core_logic::network_name;
use ethers::prelude::*;
use ethers::utils::{format_ether, format_units};

pub struct TestConnectionTask;

impl TestConnectionTask {
    async fn check(ctx: &TaskContext) -> Result<U256> {
        let provider = ctx.provider()?;

        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| anyhow!("{}", e))?
            .low_u64();
        println!(
            "✅ Successfully connected to network: {} (chainId: {})",
            network_name(Some(chain_id)),
            chain_id
        );

        let block = provider
            .get_block_number()
            .await
            .map_err(|e| anyhow!("{}", e))?;
        println!("✅ Current block number: {}", block);

        let gas_price = provider
            .get_gas_price()
            .await
            .map_err(|e| anyhow!("{}", e))?;
        println!("✅ Current gas price: {} gwei", format_units(gas_price, "gwei")?);

        let deployer = ctx.signer()?.address();
        println!("✅ Deployer address: {:?}", deployer);
        let balance = provider
            .get_balance(deployer, None)
            .await
            .map_err(|e| anyhow!("{}", e))?;
        println!("✅ Account balance: {} ETH", format_ether(balance));
        Ok(balance)
    }
}

#[async_trait]
impl Task<TaskContext> for TestConnectionTask {
    fn name(&self) -> &str {
        "06_testConnection"
    }

    async fn run(&self, ctx: TaskContext) -> Result<TaskResult> {
        println!("🔄 Testing connection to {} network...", ctx.network.name);

        let balance = match Self::check(&ctx).await {
            Ok(b) => b,
            Err(e) => {
                println!("\n❌ Connection test failed!");
                println!("Error details: {:#}", e);
                println!("\nPossible solutions:");
                println!("1. Try a different RPC URL in your .env file");
                println!("2. Check your internet connection");
                println!("3. The Sepolia network might be congested, try again later");
                return Err(e);
            }
        };

        if balance.is_zero() {
            println!("\n⚠️ Warning: Your account has zero balance!");
            println!("You need to get test ETH from a Sepolia faucet before deploying.");
            println!("Run check-balance for faucet links.");
        } else {
            println!("\n✅ Connection test successful! You can now deploy your contract.");
            println!("Run: deploy --network {}", ctx.network.name);
        }
        Ok(TaskResult::ok("Connection test passed"))
    }
}
