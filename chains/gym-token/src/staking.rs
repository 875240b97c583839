//! Staking backends.
//!
//! No staking contract is deployed for GymToken; [`SimulatedStaking`] keeps
//! positions in memory so the staking page can be exercised end to end.

use crate::contract::{format_token_amount, parse_token_amount, TOKEN_DECIMALS};
use anyhow::{bail, Result};
use async_trait::async_trait;
use ethers::types::{Address, U256};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info};

pub const SIM_START_APR: f64 = 12.0;
pub const SIM_MIN_APR: f64 = 8.0;
pub const SIM_MAX_APR: f64 = 16.0;
pub const SIM_APR_DRIFT: f64 = 0.2;
pub const SIM_REWARD_PER_TICK: f64 = 0.01;
pub const SIM_SEED_STAKED: f64 = 5_000.0;
pub const SIM_SEED_REWARDS: f64 = 250.0;
pub const SIM_POOL_TOTAL: f64 = 1_000_000.0;
/// Lock period shown on the page, in days
pub const STAKING_PERIOD_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StakePosition {
    pub staked: f64,
    pub rewards: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStats {
    pub total_staked: f64,
    /// Percent per year
    pub apr: f64,
}

#[async_trait]
pub trait StakingBackend: Send + Sync {
    /// True when nothing touches the chain.
    fn is_simulated(&self) -> bool {
        false
    }

    async fn position(&self, account: Address) -> Result<StakePosition>;
    async fn pool(&self) -> Result<PoolStats>;

    /// Spendable balance given the on-chain `wallet` balance, in base units.
    async fn available(&self, _account: Address, wallet: U256) -> Result<U256> {
        Ok(wallet)
    }

    async fn stake(&self, account: Address, amount: U256) -> Result<()>;
    async fn unstake(&self, account: Address, amount: U256) -> Result<()>;

    /// Pays out pending rewards and returns the amount claimed.
    async fn claim(&self, account: Address) -> Result<f64>;
}

/// Token movements the simulation made against a wallet, in base units.
#[derive(Debug, Clone, Copy, Default)]
struct WalletMovements {
    debited: U256,
    credited: U256,
}

#[derive(Debug)]
struct SimState {
    positions: HashMap<Address, StakePosition>,
    movements: HashMap<Address, WalletMovements>,
    total_staked: f64,
    apr: f64,
}

impl SimState {
    fn position_mut(&mut self, account: Address) -> &mut StakePosition {
        self.positions.entry(account).or_insert(StakePosition {
            staked: SIM_SEED_STAKED,
            rewards: SIM_SEED_REWARDS,
        })
    }
}

/// In-memory demo staking. Every account starts with a seeded position.
#[derive(Debug)]
pub struct SimulatedStaking {
    state: Mutex<SimState>,
}

impl Default for SimulatedStaking {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedStaking {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                positions: HashMap::new(),
                movements: HashMap::new(),
                total_staked: SIM_POOL_TOTAL,
                apr: SIM_START_APR,
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, SimState>> {
        self.state
            .lock()
            .map_err(|_| anyhow::anyhow!("staking simulation state poisoned"))
    }

    /// Adds one reward increment to every known position.
    pub fn accrue(&self) -> Result<()> {
        let mut state = self.lock()?;
        for position in state.positions.values_mut() {
            position.rewards = round2(position.rewards + SIM_REWARD_PER_TICK);
        }
        Ok(())
    }

    /// Random walk of the APR, kept within the simulated band.
    pub fn drift_apr(&self) -> Result<f64> {
        let delta = rand::thread_rng().gen_range(-SIM_APR_DRIFT..=SIM_APR_DRIFT);
        let mut state = self.lock()?;
        state.apr = (state.apr + delta).clamp(SIM_MIN_APR, SIM_MAX_APR);
        debug!("Simulated APR now {:.2}", state.apr);
        Ok(state.apr)
    }

    pub fn tick(&self) -> Result<()> {
        self.accrue()?;
        self.drift_apr()?;
        Ok(())
    }
}

#[async_trait]
impl StakingBackend for SimulatedStaking {
    fn is_simulated(&self) -> bool {
        true
    }

    async fn position(&self, account: Address) -> Result<StakePosition> {
        Ok(*self.lock()?.position_mut(account))
    }

    async fn pool(&self) -> Result<PoolStats> {
        let state = self.lock()?;
        Ok(PoolStats {
            total_staked: state.total_staked,
            apr: state.apr,
        })
    }

    async fn available(&self, account: Address, wallet: U256) -> Result<U256> {
        let state = self.lock()?;
        let moved = state.movements.get(&account).copied().unwrap_or_default();
        Ok(wallet.saturating_add(moved.credited).saturating_sub(moved.debited))
    }

    async fn stake(&self, account: Address, amount: U256) -> Result<()> {
        if amount.is_zero() {
            bail!("Invalid amount");
        }
        let tokens = to_tokens(amount);
        let mut state = self.lock()?;
        state.position_mut(account).staked += tokens;
        state.total_staked += tokens;
        let moved = state.movements.entry(account).or_default();
        moved.debited = moved.debited.saturating_add(amount);
        info!("[simulated] staked {} for {:?}", tokens, account);
        Ok(())
    }

    async fn unstake(&self, account: Address, amount: U256) -> Result<()> {
        if amount.is_zero() {
            bail!("Invalid amount");
        }
        let tokens = to_tokens(amount);
        let mut state = self.lock()?;
        let position = state.position_mut(account);
        if tokens > position.staked {
            bail!("Insufficient staked amount");
        }
        position.staked -= tokens;
        state.total_staked = (state.total_staked - tokens).max(0.0);
        let moved = state.movements.entry(account).or_default();
        moved.credited = moved.credited.saturating_add(amount);
        info!("[simulated] unstaked {} for {:?}", tokens, account);
        Ok(())
    }

    async fn claim(&self, account: Address) -> Result<f64> {
        let mut state = self.lock()?;
        let position = state.position_mut(account);
        let claimed = position.rewards;
        position.rewards = 0.0;
        // Rewards carry two decimals
        let paid = parse_token_amount(&format!("{:.2}", claimed), TOKEN_DECIMALS)?;
        let moved = state.movements.entry(account).or_default();
        moved.credited = moved.credited.saturating_add(paid);
        info!("[simulated] claimed {} for {:?}", claimed, account);
        Ok(claimed)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Base units to whole tokens for the in-memory positions.
pub(crate) fn to_tokens(amount: U256) -> f64 {
    format_token_amount(amount, TOKEN_DECIMALS)
        .parse::<f64>()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_position_and_accrual() {
        let sim = SimulatedStaking::new();
        let me = Address::repeat_byte(7);

        let pos = sim.position(me).await.unwrap();
        assert_eq!(pos.staked, 5_000.0);
        assert_eq!(pos.rewards, 250.0);

        sim.accrue().unwrap();
        sim.accrue().unwrap();
        assert_eq!(sim.position(me).await.unwrap().rewards, 250.02);

        assert_eq!(sim.claim(me).await.unwrap(), 250.02);
        assert_eq!(sim.position(me).await.unwrap().rewards, 0.0);
    }

    #[tokio::test]
    async fn test_apr_stays_in_band() {
        let sim = SimulatedStaking::new();
        for _ in 0..500 {
            let apr = sim.drift_apr().unwrap();
            assert!((SIM_MIN_APR..=SIM_MAX_APR).contains(&apr));
        }
        assert!(sim.is_simulated());
    }

    fn units(amount: &str) -> U256 {
        parse_token_amount(amount, TOKEN_DECIMALS).unwrap()
    }

    #[tokio::test]
    async fn test_unstake_more_than_staked_fails() {
        let sim = SimulatedStaking::new();
        let me = Address::repeat_byte(9);
        assert!(sim.unstake(me, units("5000.01")).await.is_err());
        sim.unstake(me, units("1000")).await.unwrap();
        assert_eq!(sim.position(me).await.unwrap().staked, 4_000.0);
        assert_eq!(sim.pool().await.unwrap().total_staked, 999_000.0);
    }

    #[tokio::test]
    async fn test_available_tracks_wallet_movements() {
        let sim = SimulatedStaking::new();
        let me = Address::repeat_byte(3);
        let wallet = units("100");
        assert_eq!(sim.available(me, wallet).await.unwrap(), wallet);

        sim.stake(me, units("60")).await.unwrap();
        assert_eq!(sim.available(me, wallet).await.unwrap(), units("40"));

        sim.unstake(me, units("10")).await.unwrap();
        assert_eq!(sim.available(me, wallet).await.unwrap(), units("50"));

        sim.claim(me).await.unwrap();
        assert_eq!(sim.available(me, wallet).await.unwrap(), units("300"));

        // Never below zero even if the on-chain balance dropped meanwhile
        assert_eq!(sim.available(me, U256::zero()).await.unwrap(), units("200"));
        sim.stake(me, units("5000")).await.unwrap();
        assert_eq!(sim.available(me, U256::zero()).await.unwrap(), U256::zero());
    }
}
