//! # Core Logic - Gas Configuration
//!
//! Legacy-transaction gas settings shared by the scripts and the contract
//! binding. Chain crates do the actual estimation.

use serde::Deserialize;

pub const DEFAULT_GAS_LIMIT: u64 = 3_000_000;
pub const DEFAULT_GAS_PRICE_GWEI: f64 = 3.0;
pub const DEFAULT_MULTIPLIER: f64 = 1.2;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for gas management
#[derive(Debug, Clone, PartialEq)]
pub struct GasConfig {
    pub gas_limit: u64,
    pub gas_price_gwei: f64,
    /// Applied on top of an estimate before sending a write
    pub multiplier: f64,
    pub timeout_secs: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price_gwei: DEFAULT_GAS_PRICE_GWEI,
            multiplier: DEFAULT_MULTIPLIER,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GasConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn with_gas_price(mut self, gwei: f64) -> Self {
        self.gas_price_gwei = gwei;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn gas_price_wei(&self) -> u64 {
        gwei_to_wei(self.gas_price_gwei)
    }

    /// Scales an estimate by the multiplier, rounding down. Never lowers it.
    pub fn apply_multiplier(&self, estimate: u64) -> u64 {
        if self.multiplier <= 1.0 {
            return estimate;
        }
        // Integer math for the common 1.2 case keeps results exact
        let tenths = (self.multiplier * 10.0).round() as u64;
        if (tenths as f64 - self.multiplier * 10.0).abs() < f64::EPSILON {
            estimate.saturating_mul(tenths) / 10
        } else {
            (estimate as f64 * self.multiplier) as u64
        }
    }
}

/// Convert gwei to wei as u64
pub fn gwei_to_wei(gwei: f64) -> u64 {
    (gwei * 1e9).round() as u64
}

/// Deserialize helper for GasConfig from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GasConfigToml {
    pub gas_limit: Option<u64>,
    pub gas_price_gwei: Option<f64>,
    pub multiplier: Option<f64>,
    pub timeout_secs: Option<u64>,
}

impl From<GasConfigToml> for GasConfig {
    fn from(toml: GasConfigToml) -> Self {
        Self {
            gas_limit: toml.gas_limit.unwrap_or(DEFAULT_GAS_LIMIT),
            gas_price_gwei: toml.gas_price_gwei.unwrap_or(DEFAULT_GAS_PRICE_GWEI),
            multiplier: toml.multiplier.unwrap_or(DEFAULT_MULTIPLIER),
            timeout_secs: toml.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}
