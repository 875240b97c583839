use crate::task::{Task, TaskResult};
use anyhow::Result;
use async_trait::async_trait;
use ethers::prelude::*;

/// Fresh random key pair. Needs no network, so it runs without a context.
pub fn generate() -> (Address, String) {
    let wallet = LocalWallet::new(&mut rand::thread_rng());
    let key = format!("0x{}", hex::encode(wallet.signer().to_bytes()));
    (wallet.address(), key)
}

pub struct GenerateWalletTask;

#[async_trait]
impl Task<()> for GenerateWalletTask {
    fn name(&self) -> &str {
        "09_generateWallet"
    }

    async fn run(&self, _ctx: ()) -> Result<TaskResult> {
        println!("🔑 Generating a test wallet for Sepolia deployment...\n");
        let (address, private_key) = generate();

        println!("📋 Wallet Details:");
        println!("==================");
        println!("Address: {:?}", address);
        println!("Private Key: {}", private_key);
        println!("\n⚠️  IMPORTANT SECURITY NOTES:");
        println!("- This is a TEST wallet only!");
        println!("- NEVER use this for mainnet or real funds!");
        println!("- Copy the private key to your .env file");
        println!("- Get test ETH from: https://sepoliafaucet.com/");
        println!("\n📝 Next Steps:");
        println!("1. Copy the private key above");
        println!("2. Update PRIVATE_KEY in your .env file");
        println!("3. Get test ETH from Sepolia faucet");
        println!("4. Run deployment: deploy --network sepolia");

        Ok(TaskResult::ok(format!("Generated wallet {:?}", address)))
    }
}
