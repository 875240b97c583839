use crate::session::{Notice, Session};
use crate::staking::{to_tokens, StakingBackend, STAKING_PERIOD_DAYS};
use crate::contract::{format_token_amount, parse_token_amount, TOKEN_DECIMALS, TOKEN_SYMBOL};
use anyhow::{anyhow, Result};
use core_logic::{format_with_commas, FormError};
use ethers::types::{Address, U256};
use std::sync::Arc;
use tracing::error;

#[derive(Debug, Clone, PartialEq)]
pub struct StakingModel {
    /// Wallet balance still available for staking
    pub balance: f64,
    pub staked: f64,
    pub rewards: f64,
    pub apr: f64,
    pub total_staked: f64,
    /// Percent of the pool held by this account
    pub share: f64,
    pub daily_rewards: f64,
    pub period_days: u32,
    pub simulated: bool,
}

impl StakingModel {
    pub fn apr_label(&self) -> String {
        format!("{:.2}%", self.apr)
    }

    pub fn total_staked_label(&self) -> String {
        format!("{} {}", format_with_commas(self.total_staked), TOKEN_SYMBOL)
    }

    pub fn source_label(&self) -> &'static str {
        if self.simulated {
            "Simulated staking (no staking contract deployed)"
        } else {
            "On-chain staking"
        }
    }
}

pub fn pool_share(staked: f64, total: f64) -> f64 {
    if staked > 0.0 && total > 0.0 {
        staked / total * 100.0
    } else {
        0.0
    }
}

pub fn daily_rewards(staked: f64, apr: f64) -> f64 {
    staked * (apr / 100.0 / 365.0)
}

/// Positive token amount in base units.
fn parse_positive(input: &str) -> Option<U256> {
    parse_token_amount(input, TOKEN_DECIMALS)
        .ok()
        .filter(|v| !v.is_zero())
}

pub struct StakingView {
    backend: Arc<dyn StakingBackend>,
}

impl StakingView {
    pub fn new(backend: Arc<dyn StakingBackend>) -> Self {
        Self { backend }
    }

    fn account(session: &Session) -> Result<Address> {
        session
            .account()
            .ok_or_else(|| anyhow!(core_logic::WalletError::NotConnected))
    }

    /// Cached wallet balance after the backend's own movements.
    async fn available(&self, session: &Session) -> Result<U256> {
        let wallet = parse_token_amount(session.token_balance(), TOKEN_DECIMALS).unwrap_or_default();
        match session.account() {
            Some(account) => self.backend.available(account, wallet).await,
            None => Ok(wallet),
        }
    }

    pub async fn load(&self, session: &Session) -> Result<StakingModel> {
        let account = Self::account(session)?;
        let loaded = async {
            let position = self.backend.position(account).await?;
            let pool = self.backend.pool().await?;
            let available = self.available(session).await?;
            Ok::<_, anyhow::Error>((position, pool, available))
        }
        .await;

        let (position, pool, available) = match loaded {
            Ok(v) => v,
            Err(e) => {
                error!("Error fetching staking data: {:#}", e);
                session.notify(
                    Notice::error("Error fetching data")
                        .with_description("Could not load your token balance and staking information."),
                );
                return Err(e);
            }
        };

        Ok(StakingModel {
            balance: format_token_amount(available, TOKEN_DECIMALS)
                .parse::<f64>()
                .unwrap_or(0.0),
            staked: position.staked,
            rewards: position.rewards,
            apr: pool.apr,
            total_staked: pool.total_staked,
            share: pool_share(position.staked, pool.total_staked),
            daily_rewards: daily_rewards(position.staked, pool.apr),
            period_days: STAKING_PERIOD_DAYS,
            simulated: self.backend.is_simulated(),
        })
    }

    pub async fn stake(&self, session: &Session, amount: &str) -> Result<(), FormError> {
        let Some(value) = parse_positive(amount) else {
            session.notify(Notice::error("Invalid amount").with_description("Please enter a valid amount to stake."));
            return Err(FormError::new("stake", "Invalid amount"));
        };
        let available = match self.available(session).await {
            Ok(v) => v,
            Err(e) => {
                error!("Error reading available balance: {:#}", e);
                U256::zero()
            }
        };
        if value > available {
            session.notify(
                Notice::error("Insufficient balance")
                    .with_description("You do not have enough tokens to stake this amount."),
            );
            return Err(FormError::new("stake", "Insufficient balance"));
        }

        let result = match Self::account(session) {
            Ok(account) => self.backend.stake(account, value).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                session.notify(
                    Notice::success("Staking successful")
                        .with_description(format!("You have staked {} {} tokens.", amount.trim(), TOKEN_SYMBOL)),
                );
                Ok(())
            }
            Err(e) => {
                error!("Error staking tokens: {:#}", e);
                session.notify(
                    Notice::error("Staking failed")
                        .with_description("There was an error staking your tokens. Please try again."),
                );
                Err(FormError::new("stake", format!("{:#}", e)))
            }
        }
    }

    pub async fn unstake(&self, session: &Session, amount: &str) -> Result<(), FormError> {
        let Some(value) = parse_positive(amount) else {
            session.notify(Notice::error("Invalid amount").with_description("Please enter a valid amount to unstake."));
            return Err(FormError::new("unstake", "Invalid amount"));
        };
        let staked = match Self::account(session) {
            Ok(account) => match self.backend.position(account).await {
                Ok(position) => position.staked,
                Err(e) => {
                    error!("Error reading staked position: {:#}", e);
                    0.0
                }
            },
            Err(_) => 0.0,
        };
        if to_tokens(value) > staked {
            session.notify(
                Notice::error("Insufficient staked amount")
                    .with_description("You do not have enough staked tokens to unstake this amount."),
            );
            return Err(FormError::new("unstake", "Insufficient staked amount"));
        }

        let result = match Self::account(session) {
            Ok(account) => self.backend.unstake(account, value).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                session.notify(
                    Notice::success("Unstaking successful")
                        .with_description(format!("You have unstaked {} {} tokens.", amount.trim(), TOKEN_SYMBOL)),
                );
                Ok(())
            }
            Err(e) => {
                error!("Error unstaking tokens: {:#}", e);
                session.notify(
                    Notice::error("Unstaking failed")
                        .with_description("There was an error unstaking your tokens. Please try again."),
                );
                Err(FormError::new("unstake", format!("{:#}", e)))
            }
        }
    }

    /// Returns the amount claimed.
    pub async fn claim(&self, session: &Session) -> Result<f64> {
        let result = match Self::account(session) {
            Ok(account) => self.backend.claim(account).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(claimed) => {
                session.notify(
                    Notice::success("Rewards claimed")
                        .with_description(format!("You have claimed {} {} tokens.", claimed, TOKEN_SYMBOL)),
                );
                Ok(claimed)
            }
            Err(e) => {
                error!("Error claiming rewards: {:#}", e);
                session.notify(
                    Notice::error("Claiming failed")
                        .with_description("There was an error claiming your rewards. Please try again."),
                );
                Err(e)
            }
        }
    }
}
