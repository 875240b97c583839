use crate::contract::{display_address, format_token_amount, parse_token_amount, TokenApi, TokenBinding, TOKEN_DECIMALS, TOKEN_SYMBOL};
use crate::task::{SignerClient, Task, TaskContext, TaskResult};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use core_logic::ExplorerLinks;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use ethers::prelude::*;
use ethers::utils::format_ether;
use tracing::error;

const RULE: &str = "=================================================";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    TokenInfo,
    CheckBalance,
    Transfer,
    Approve,
    Allowance,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 6] = [
        MenuAction::TokenInfo,
        MenuAction::CheckBalance,
        MenuAction::Transfer,
        MenuAction::Approve,
        MenuAction::Allowance,
        MenuAction::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::TokenInfo => "1. View Token Information",
            MenuAction::CheckBalance => "2. Check Wallet Balance",
            MenuAction::Transfer => "3. Transfer Tokens",
            MenuAction::Approve => "4. Approve Spender",
            MenuAction::Allowance => "5. Check Allowance",
            MenuAction::Exit => "0. Exit",
        }
    }
}

/// Menu-level address check: `0x` prefix, 42 characters, valid hex.
pub fn parse_menu_address(input: &str) -> Option<Address> {
    let trimmed = input.trim();
    if !trimmed.starts_with("0x") || trimmed.len() != 42 {
        return None;
    }
    trimmed.parse().ok()
}

fn prompt(text: &str) -> Result<String> {
    Ok(Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(text)
        .allow_empty(true)
        .interact_text()?)
}

fn pause() -> Result<()> {
    prompt("Press Enter to continue...").map(|_| ())
}

struct Manager {
    token: TokenBinding<SignerClient>,
    client: std::sync::Arc<SignerClient>,
    links: Option<ExplorerLinks>,
}

impl Manager {
    async fn token_info(&self) -> Result<()> {
        let info = self.token.info().await?;
        println!("\n📋 TOKEN INFORMATION");
        println!("{}", RULE);
        println!("Contract Address: {}", display_address(info.address));
        println!("Name: {}", info.name);
        println!("Symbol: {}", info.symbol);
        println!("Decimals: {}", info.decimals);
        println!(
            "Total Supply: {} {}",
            format_token_amount(info.total_supply, TOKEN_DECIMALS),
            TOKEN_SYMBOL
        );
        println!("{}\n", RULE);
        Ok(())
    }

    async fn check_balance(&self) -> Result<()> {
        println!("\n📊 BALANCE CHECKER");
        println!("{}", RULE);
        let input = prompt("Enter wallet address (leave blank for your wallet)")?;
        let address = if input.trim().is_empty() {
            self.client.address()
        } else {
            input
                .trim()
                .parse::<Address>()
                .map_err(|e| anyhow!("Invalid address '{}': {}", input.trim(), e))?
        };

        let eth = self
            .client
            .get_balance(address, None)
            .await
            .map_err(|e| anyhow!("Failed to read ETH balance: {}", e))?;
        let gym = self.token.balance_of(address).await?;
        println!("\nAddress: {}", display_address(address));
        println!("ETH Balance: {} ETH", format_ether(eth));
        println!("GYM Balance: {} {}", format_token_amount(gym, TOKEN_DECIMALS), TOKEN_SYMBOL);
        println!("{}\n", RULE);
        Ok(())
    }

    async fn transfer(&self) -> Result<()> {
        println!("\n💸 TRANSFER TOKENS");
        println!("{}", RULE);
        println!("From: {}", display_address(self.client.address()));
        let Some(recipient) = parse_menu_address(&prompt("Enter recipient address")?) else {
            println!("❌ Invalid Ethereum address format!");
            return Ok(());
        };
        let amount_input = prompt("Enter amount to send (in GYM)")?;
        let amount = parse_token_amount(&amount_input, TOKEN_DECIMALS)?;

        println!("\n📤 Sending {} {} to {}...", amount_input.trim(), TOKEN_SYMBOL, display_address(recipient));
        match self.token.submit_transfer(recipient, amount).await {
            Ok(hash) => self.confirm(hash, "Transfer").await,
            Err(e) => println!("❌ Transfer failed: {:#}", e),
        }
        println!("{}\n", RULE);
        Ok(())
    }

    async fn approve(&self) -> Result<()> {
        println!("\n👍 APPROVE SPENDER");
        println!("{}", RULE);
        println!("Token owner: {}", display_address(self.client.address()));
        let Some(spender) = parse_menu_address(&prompt("Enter spender address")?) else {
            println!("❌ Invalid Ethereum address format!");
            return Ok(());
        };
        let amount_input = prompt("Enter amount to approve (in GYM)")?;
        let amount = parse_token_amount(&amount_input, TOKEN_DECIMALS)?;

        println!("\n👉 Approving {} to spend {} {}...", display_address(spender), amount_input.trim(), TOKEN_SYMBOL);
        match self.token.submit_approve(spender, amount).await {
            Ok(hash) => self.confirm(hash, "Approval").await,
            Err(e) => println!("❌ Approval failed: {:#}", e),
        }
        println!("{}\n", RULE);
        Ok(())
    }

    async fn confirm(&self, hash: H256, label: &str) {
        println!("Transaction hash: {:?}", hash);
        println!("\n⏳ Waiting for confirmation...");
        match self.token.wait_for_receipt(hash).await {
            Ok(_) => {
                println!("✅ {} completed!", label);
                if let Some(links) = &self.links {
                    println!("{}", links.tx(&format!("{:?}", hash)));
                }
            }
            Err(e) => println!("❌ {} failed: {:#}", label, e),
        }
    }

    async fn allowance(&self) -> Result<()> {
        println!("\n🔍 CHECK ALLOWANCE");
        println!("{}", RULE);
        let Some(owner) = parse_menu_address(&prompt("Enter token owner address")?) else {
            println!("❌ Invalid owner address format!");
            return Ok(());
        };
        let Some(spender) = parse_menu_address(&prompt("Enter spender address")?) else {
            println!("❌ Invalid spender address format!");
            return Ok(());
        };
        let allowance = self.token.allowance(owner, spender).await?;
        println!("\nAllowance: {} {}", format_token_amount(allowance, TOKEN_DECIMALS), TOKEN_SYMBOL);
        println!("{}\n", RULE);
        Ok(())
    }
}

pub struct TokenManagerTask;

#[async_trait]
impl Task<TaskContext> for TokenManagerTask {
    fn name(&self) -> &str {
        "04_tokenManager"
    }

    async fn run(&self, ctx: TaskContext) -> Result<TaskResult> {
        let manager = Manager {
            token: ctx.signing_token()?,
            client: ctx.signing_client()?,
            links: ctx.links(),
        };
        let title = format!("🪙  GYM TOKEN MANAGER - {} 🪙", ctx.network.name.to_uppercase());
        let items: Vec<&str> = MenuAction::ALL.iter().map(|a| a.label()).collect();

        loop {
            println!("{}", RULE);
            println!("{}", title);
            println!("{}", RULE);
            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Enter your choice")
                .default(0)
                .items(&items)
                .interact()?;

            let action = MenuAction::ALL[choice];
            let outcome = match action {
                MenuAction::TokenInfo => manager.token_info().await,
                MenuAction::CheckBalance => manager.check_balance().await,
                MenuAction::Transfer => manager.transfer().await,
                MenuAction::Approve => manager.approve().await,
                MenuAction::Allowance => manager.allowance().await,
                MenuAction::Exit => {
                    println!("\nThank you for using GYM Token Manager! Goodbye! 👋");
                    return Ok(TaskResult::ok("Token manager closed"));
                }
            };
            if let Err(e) = outcome {
                error!("{:?} failed: {:#}", action, e);
                println!("\n❌ An error occurred: {:#}", e);
            }
            pause()?;
        }
    }
}
