use crate::task::{Task, TaskContext, TaskResult};
use crate::utils::env_file::write_sepolia_url;
use crate::utils::probe::find_working;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use core_logic::{NetworkError, RpcManager};
use ethers::prelude::*;
use ethers::utils::format_ether;
use std::path::Path;
use tracing::{info, warn};

pub const ENV_FILE: &str = ".env";

const PROBE_FAUCETS: [&str; 3] = [
    "https://sepoliafaucet.com/",
    "https://www.alchemy.com/faucets/ethereum-sepolia",
    "https://sepolia-faucet.pk910.de/",
];

pub struct FindRpcTask;

impl FindRpcTask {
    async fn wallet_details(ctx: &TaskContext, provider: &Provider<Http>) -> Result<()> {
        println!("\n📋 Checking wallet details:");
        println!("=======================");

        let address = ctx.signer()?.address();
        println!("✅ Wallet address: {:?}", address);
        let balance = provider
            .get_balance(address, None)
            .await
            .map_err(|e| anyhow!("Failed to read balance: {}", e))?;
        println!("✅ Account balance: {} ETH", format_ether(balance));

        if balance.is_zero() {
            println!("\n⚠️ Warning: Your account has zero balance!");
            println!("You need to get test ETH from a Sepolia faucet before deploying:");
            for faucet in PROBE_FAUCETS {
                println!("- {}", faucet);
            }
        } else {
            println!("\n✅ Connection test successful! You can now deploy your contract.");
            println!("👉 Run: deploy --network sepolia");
        }
        Ok(())
    }
}

#[async_trait]
impl Task<TaskContext> for FindRpcTask {
    fn name(&self) -> &str {
        "05_findWorkingRpc"
    }

    async fn run(&self, ctx: TaskContext) -> Result<TaskResult> {
        println!("🔄 Testing Sepolia connections with multiple RPC endpoints...\n");

        let configured = ctx.rpc_url().ok().map(str::to_string);
        let fallbacks: Vec<&str> = ctx.config.fallback_rpcs.iter().map(String::as_str).collect();
        let manager = RpcManager::with_preferred(ctx.network.chain_id, configured.as_deref(), &fallbacks);

        let Some((report, provider)) = find_working(&manager, ctx.client_timeout()).await else {
            println!("\n❌ All RPC endpoints failed!");
            println!("Possible solutions:");
            println!("1. Check your internet connection");
            println!("2. The Sepolia network might be experiencing issues");
            println!("3. Try again later or find another RPC provider");
            return Err(NetworkError::AllEndpointsFailed {
                count: manager.endpoints_count(),
            }
            .into());
        };

        if configured.as_deref() != Some(report.url.as_str()) {
            if configured.is_some() {
                println!("\nConfigured endpoint failed, using an alternative.");
            }
            println!("\n✅ Found working RPC endpoint: {}", report.url);
            println!("👉 Update your .env file with this URL for future deployments");
            match write_sepolia_url(Path::new(ENV_FILE), &report.url) {
                Ok(true) => println!("✅ .env file updated with working URL\n"),
                Ok(false) => println!("✅ .env file already points at this URL\n"),
                Err(e) => {
                    warn!("Could not update {}: {:#}", ENV_FILE, e);
                    println!("⚠️ Could not update .env file: {:#}\n", e);
                }
            }
        }
        info!(
            "Using {} ({}ms, {} of {} endpoints healthy)",
            report.url,
            report.latency_ms,
            manager.healthy_count(),
            manager.endpoints_count()
        );

        if let Err(e) = Self::wallet_details(&ctx, &provider).await {
            println!("\n❌ Error checking wallet details: {:#}", e);
            return Ok(TaskResult::failed(format!("Wallet check failed: {:#}", e)));
        }

        Ok(TaskResult::ok(format!("Working RPC endpoint: {}", report.url)))
    }
}
