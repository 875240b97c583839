use crate::task::{Task, TaskContext, TaskResult};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use core_logic::group_digits;
use ethers::abi::Abi;
use ethers::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Whole tokens minted to the deployer; the constructor applies decimals.
pub const INITIAL_SUPPLY: u64 = 1_000_000_000;

#[derive(Debug, Deserialize)]
struct Artifact {
    abi: Abi,
    bytecode: Bytes,
}

/// Reads a compiled contract artifact (`abi` + `bytecode`).
pub fn load_artifact(path: &Path) -> Result<(Abi, Bytes)> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Could not read contract artifact {}", path.display()))?;
    let artifact: Artifact = serde_json::from_str(&raw)
        .with_context(|| format!("Malformed contract artifact {}", path.display()))?;
    if artifact.bytecode.is_empty() {
        return Err(anyhow!("Artifact {} has no bytecode", path.display()));
    }
    Ok((artifact.abi, artifact.bytecode))
}

pub struct DeployTask;

#[async_trait]
impl Task<TaskContext> for DeployTask {
    fn name(&self) -> &str {
        "01_deploy"
    }

    async fn run(&self, ctx: TaskContext) -> Result<TaskResult> {
        let network = ctx.network.name.clone();
        ctx.warn_if_ephemeral();
        println!("📡 Deploying GymToken to {} network...", network);

        println!("⚙️  Preparing contract factory...");
        let (abi, bytecode) = load_artifact(Path::new(&ctx.config.artifact_path))?;
        let client = ctx.signing_client()?;
        let factory = ContractFactory::new(abi, bytecode, client);

        println!(
            "🚀 Deploying with initial supply of {} tokens...",
            group_digits(&INITIAL_SUPPLY.to_string())
        );
        let mut deployer = factory
            .deploy(U256::from(INITIAL_SUPPLY))
            .map_err(|e| anyhow!("Failed to encode constructor: {}", e))?
            .legacy();
        deployer.tx.set_gas(ctx.gas.gas_limit);
        deployer.tx.set_gas_price(U256::from(ctx.gas.gas_price_wei()));

        println!("⏳ Waiting for deployment transaction to be confirmed...");
        let (contract, receipt) = deployer
            .send_with_receipt()
            .await
            .map_err(|e| anyhow!("Deployment failed: {}", e))?;
        let address = format!("{:?}", contract.address());
        info!("GymToken deployed at {} on {}", address, network);

        println!();
        println!("✅ GymToken successfully deployed!");
        println!("📝 Contract Address: {}", address);
        if let Some(links) = ctx.links() {
            println!("🔗 {}", links.address(&address));
        }
        println!(
            "🔍 Verify on Etherscan: npx hardhat verify --network {} {} {}",
            network, address, INITIAL_SUPPLY
        );

        Ok(TaskResult::ok(format!("Deployed GymToken at {}", address))
            .with_tx(format!("{:?}", receipt.transaction_hash)))
    }
}
