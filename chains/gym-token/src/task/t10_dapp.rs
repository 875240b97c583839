//! Terminal front end: the five app pages driven through one wallet session.

use crate::indexer::LogScanIndex;
use crate::session::{InjectedWallet, LocalKeyWallet, NoticeLevel, ReadOnlyRpc, Session, SessionEvent, SessionStatus};
use crate::staking::SimulatedStaking;
use crate::task::{Task, TaskContext, TaskResult};
use crate::views::dashboard::{Dashboard, DashboardView};
use crate::views::explorer::ExplorerView;
use crate::views::home::{HomeAction, HomeView};
use crate::views::staking::StakingView;
use crate::views::transfer::{TransferForm, TransferView};
use crate::views::{Page, TransferRow};
use anyhow::Result;
use async_trait::async_trait;
use core_logic::{network_name, ExplorerLinks};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::sync::Arc;
use tokio::sync::broadcast;

const MENU: [&str; 7] = ["Home", "Dashboard", "Transfer", "Explorer", "Staking", "Disconnect", "Exit"];

fn prompt(text: &str) -> Result<String> {
    Ok(Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(text)
        .allow_empty(true)
        .interact_text()?)
}

fn print_notices(rx: &mut broadcast::Receiver<SessionEvent>) {
    while let Ok(event) = rx.try_recv() {
        if let SessionEvent::Notice(n) = event {
            let icon = match n.level {
                NoticeLevel::Info => "ℹ️ ",
                NoticeLevel::Success => "✅",
                NoticeLevel::Warning => "⚠️ ",
                NoticeLevel::Error => "❌",
            };
            match n.description {
                Some(d) => println!("{} {}: {}", icon, n.title, d),
                None => println!("{} {}", icon, n.title),
            }
        }
    }
}

fn print_rows(rows: &[TransferRow]) {
    if rows.is_empty() {
        println!("   (no transactions)");
    }
    for row in rows {
        println!(
            "   {:?} {} GYM {} -> {} [{}]",
            row.direction,
            row.amount,
            row.from_short,
            row.to_short,
            row.age
                .clone()
                .unwrap_or_else(|| format!("block {}", row.block_number))
        );
        if let Some(url) = &row.explorer_url {
            println!("     {}", url);
        }
    }
}

struct App {
    session: Session,
    index: LogScanIndex<ethers::providers::Provider<ethers::providers::Http>>,
    staking: Arc<SimulatedStaking>,
    staking_view: StakingView,
    transfer_view: TransferView,
    links: Option<ExplorerLinks>,
}

impl App {
    fn header(&self) {
        let status = match self.session.status() {
            SessionStatus::Disconnected => "Not connected".to_string(),
            SessionStatus::Connecting => "Connecting...".to_string(),
            SessionStatus::Connected { account, chain_id } => {
                format!("{:?} on {}", account, network_name(chain_id))
            }
            SessionStatus::ReadOnly { chain_id } => {
                format!("Read-only on {}", network_name(Some(chain_id)))
            }
        };
        println!("\n🏋️ GymToken | {} | {} GYM", status, self.session.token_balance());
    }

    async fn home(&mut self) -> Result<()> {
        match HomeView::get_started(&mut self.session).await {
            HomeAction::Navigate(Page::Dashboard) => self.dashboard().await,
            HomeAction::Navigate(_) => Ok(()),
            HomeAction::Connecting if !self.session.has_wallet() => {
                println!("Install a wallet: {}", HomeView::install_wallet_url());
                Ok(())
            }
            HomeAction::Connecting => Ok(()),
        }
    }

    async fn dashboard(&mut self) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        match DashboardView::load(&mut self.session, &self.index, self.links.as_ref(), now).await {
            Dashboard::NotConnected => println!("Connect your wallet to view the dashboard."),
            Dashboard::Ready(model) => {
                println!("Account: {} ({})", model.account_short, model.account);
                println!("Balance: {} GYM ({:?})", model.balance, model.balance_status);
                println!("Network: {} - {}", model.network, model.network_note);
                println!("Recent transactions:");
                print_rows(&model.transactions);
            }
        }
        Ok(())
    }

    async fn transfer(&mut self) -> Result<()> {
        let recipient = prompt("Recipient address")?;
        let amount = prompt("Amount (or 'max')")?;
        self.transfer_view.form = TransferForm::new(recipient, amount.clone());
        if amount.trim().eq_ignore_ascii_case("max") {
            let balance = self.session.token_balance().to_string();
            self.transfer_view.set_max(&balance);
        }
        match self.transfer_view.submit(&mut self.session).await {
            Ok(receipt) => {
                println!("Transaction: {:?}", receipt.tx_hash);
                if let Some(url) = receipt.explorer_url {
                    println!("{}", url);
                }
            }
            Err(e) => {
                for err in self.transfer_view.errors() {
                    println!("   {}: {}", err.field, err.message);
                }
                tracing::debug!("transfer not sent: {}", e);
            }
        }
        Ok(())
    }

    async fn explorer(&mut self) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let model = ExplorerView::load(&mut self.session, &self.index, self.links.as_ref(), now).await?;
        println!("Total supply: {} GYM", model.total_supply);
        if let Some(url) = &model.token_url {
            println!("{}", url);
        }
        println!("Transfers: {} | Holders seen: {}", model.transfer_count, model.holder_count);
        for h in &model.holders {
            println!("   #{} {} {} GYM ({}%)", h.rank, h.address_short, h.balance, h.percentage);
        }
        let query = prompt("Search by hash or address (blank for all)")?;
        let rows: Vec<TransferRow> = model.search(&query).into_iter().cloned().collect();
        print_rows(&rows);
        Ok(())
    }

    async fn staking(&mut self) -> Result<()> {
        let model = self.staking_view.load(&self.session).await?;
        println!("{}", model.source_label());
        println!(
            "Balance: {:.2} | Staked: {:.2} | Rewards: {:.2} | APR: {} | Pool: {}",
            model.balance,
            model.staked,
            model.rewards,
            model.apr_label(),
            model.total_staked_label()
        );
        println!(
            "Your share: {:.4}% | Est. daily rewards: {:.4} GYM | Period: {} days",
            model.share, model.daily_rewards, model.period_days
        );

        let action = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Staking")
            .default(0)
            .items(&["Stake", "Unstake", "Claim rewards", "Back"])
            .interact()?;
        match action {
            0 => {
                let amount = prompt("Amount to stake")?;
                let _ = self.staking_view.stake(&self.session, &amount).await;
            }
            1 => {
                let amount = prompt("Amount to unstake")?;
                let _ = self.staking_view.unstake(&self.session, &amount).await;
            }
            2 => {
                let _ = self.staking_view.claim(&self.session).await;
            }
            _ => {}
        }
        Ok(())
    }
}

pub struct DappTask;

#[async_trait]
impl Task<TaskContext> for DappTask {
    fn name(&self) -> &str {
        "10_dapp"
    }

    async fn run(&self, ctx: TaskContext) -> Result<TaskResult> {
        let token = ctx.token_address()?;
        // Browsing works without SEPOLIA_URL through the public endpoints
        let provider = ctx.read_only_provider().await?;

        let read_only = Arc::new(ReadOnlyRpc::new(provider.clone(), ctx.gas.clone()));
        let wallet: Option<Arc<dyn InjectedWallet>> = ctx.wallet.clone().map(|w| {
            Arc::new(LocalKeyWallet::new(provider.clone(), w, ctx.gas.clone())) as Arc<dyn InjectedWallet>
        });

        let session = Session::new(token, wallet, read_only);
        let mut notices = session.subscribe();
        let staking = Arc::new(SimulatedStaking::new());
        let mut app = App {
            session,
            index: LogScanIndex::new(token, Arc::new(provider)),
            staking_view: StakingView::new(staking.clone()),
            staking,
            transfer_view: TransferView::new(ctx.links()),
            links: ctx.links(),
        };
        app.session.init().await;

        loop {
            app.session.pump_events().await;
            // One accrual step per screen
            app.staking.tick()?;
            print_notices(&mut notices);
            app.header();

            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Go to")
                .default(0)
                .items(&MENU)
                .interact()?;
            let outcome = match choice {
                0 => app.home().await,
                1 => app.dashboard().await,
                2 => app.transfer().await,
                3 => app.explorer().await,
                4 => app.staking().await,
                5 => {
                    app.session.disconnect();
                    Ok(())
                }
                _ => {
                    print_notices(&mut notices);
                    return Ok(TaskResult::ok("App closed"));
                }
            };
            if let Err(e) = outcome {
                tracing::warn!("{} page failed: {:#}", MENU[choice], e);
            }
            print_notices(&mut notices);
        }
    }
}
