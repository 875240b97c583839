use anyhow::Result;
use config::{Config, Environment, File};
use core_logic::config::NetworkProfile;
use core_logic::{ConfigError, GasConfig, GasConfigToml};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "gym-token.toml";

/// Public Sepolia endpoints probed by `find-rpc` and used for read-only access.
pub const PUBLIC_SEPOLIA_RPCS: [&str; 4] = [
    "https://ethereum-sepolia.publicnode.com",
    "https://rpc.sepolia.org",
    "https://sepolia.blockpi.network/v1/rpc/public",
    "https://sepolia.gateway.tenderly.co",
];

pub const DEFAULT_ARTIFACT_PATH: &str = "artifacts/contracts/GymToken.sol/GymToken.json";

/// Per-network values from the config file. Anything left out falls back to
/// the built-in profile of the same name.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct NetworkOverride {
    pub rpc_url: Option<String>,
    pub chain_id: Option<u64>,
    pub explorer: Option<String>,
    pub token_address: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AirdropRecipient {
    pub address: String,
    /// Whole-token amount, e.g. "250"
    pub amount: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AirdropConfig {
    pub recipients: Vec<AirdropRecipient>,
}

impl Default for AirdropConfig {
    fn default() -> Self {
        let sample = [
            ("0x1111111111111111111111111111111111111111", "100"),
            ("0x2222222222222222222222222222222222222222", "250"),
            ("0x3333333333333333333333333333333333333333", "500"),
        ];
        Self {
            recipients: sample
                .iter()
                .map(|(address, amount)| AirdropRecipient {
                    address: address.to_string(),
                    amount: amount.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TransferDefaults {
    pub recipient: String,
    pub amount: String,
}

impl Default for TransferDefaults {
    fn default() -> Self {
        Self {
            recipient: "0x123456789abcdef123456789abcdef123456789a".to_string(),
            amount: "100".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GymConfig {
    pub networks: HashMap<String, NetworkOverride>,
    pub gas: GasConfigToml,
    pub airdrop: AirdropConfig,
    pub transfer: TransferDefaults,
    pub artifact_path: String,
    pub fallback_rpcs: Vec<String>,
}

impl Default for GymConfig {
    fn default() -> Self {
        Self {
            networks: HashMap::new(),
            gas: GasConfigToml::default(),
            airdrop: AirdropConfig::default(),
            transfer: TransferDefaults::default(),
            artifact_path: DEFAULT_ARTIFACT_PATH.to_string(),
            fallback_rpcs: PUBLIC_SEPOLIA_RPCS.iter().map(|u| u.to_string()).collect(),
        }
    }
}

impl GymConfig {
    /// Reads `path` if it exists, then `GYM__*` environment overrides
    /// (e.g. `GYM__GAS__MULTIPLIER=1.5`).
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("GYM").separator("__"))
            .build()?;

        settings.try_deserialize().map_err(|e| anyhow::anyhow!(e))
    }

    pub fn load_default() -> Result<Self> {
        Self::load(DEFAULT_CONFIG_PATH)
    }

    pub fn gas(&self) -> GasConfig {
        self.gas.clone().into()
    }

    /// Resolves a network by name: built-in profile, then config file, then
    /// `SEPOLIA_URL` / `GYM_TOKEN_ADDRESS` from the environment.
    pub fn network(&self, name: &str) -> Result<NetworkProfile, ConfigError> {
        self.network_with_env(
            name,
            std::env::var("SEPOLIA_URL").ok(),
            std::env::var("GYM_TOKEN_ADDRESS").ok(),
        )
    }

    pub fn network_with_env(
        &self,
        name: &str,
        sepolia_url: Option<String>,
        token_address: Option<String>,
    ) -> Result<NetworkProfile, ConfigError> {
        let key = name.to_ascii_lowercase();
        let overrides = self.networks.get(&key);

        let mut profile = match NetworkProfile::by_name(&key) {
            Ok(p) => p,
            Err(err) => {
                // Networks that only exist in the config file need a chain id
                let custom = overrides.ok_or(err)?;
                NetworkProfile {
                    name: key.clone(),
                    chain_id: custom.chain_id.ok_or(ConfigError::MissingField {
                        field: format!("networks.{}.chain_id", key),
                    })?,
                    rpc_url: None,
                    explorer: None,
                    token_address: None,
                }
            }
        };

        if let Some(o) = overrides {
            if let Some(url) = &o.rpc_url {
                profile.rpc_url = Some(url.clone());
            }
            if let Some(id) = o.chain_id {
                profile.chain_id = id;
            }
            if let Some(explorer) = &o.explorer {
                profile.explorer = Some(explorer.clone());
            }
            if let Some(token) = &o.token_address {
                profile.token_address = Some(token.clone());
            }
        }

        if profile.name == "sepolia" {
            if let Some(url) = sepolia_url.filter(|u| !u.trim().is_empty()) {
                profile.rpc_url = Some(url.trim().to_string());
            }
        }
        if let Some(token) = token_address.filter(|t| !t.trim().is_empty()) {
            profile.token_address = Some(token.trim().to_string());
        }

        debug!("Resolved network {:?}", profile);
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = GymConfig::load("/nonexistent/gym-token").unwrap();
        assert_eq!(config.airdrop.recipients.len(), 3);
        assert_eq!(config.artifact_path, DEFAULT_ARTIFACT_PATH);
        assert_eq!(config.gas().gas_limit, 3_000_000);
        assert_eq!(config.fallback_rpcs.len(), 4);
    }

    #[test]
    fn test_env_values_override_sepolia() {
        let config = GymConfig::default();
        let net = config
            .network_with_env(
                "sepolia",
                Some("https://rpc.example".to_string()),
                Some("0x0000000000000000000000000000000000000001".to_string()),
            )
            .unwrap();
        assert_eq!(net.rpc_url.as_deref(), Some("https://rpc.example"));
        assert_eq!(
            net.token_address.as_deref(),
            Some("0x0000000000000000000000000000000000000001")
        );
    }

    #[test]
    fn test_custom_network_needs_chain_id() {
        let mut config = GymConfig::default();
        config.networks.insert(
            "devnet".to_string(),
            NetworkOverride {
                rpc_url: Some("http://10.0.0.2:8545".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(
            config.network_with_env("devnet", None, None),
            Err(ConfigError::MissingField { .. })
        ));

        config.networks.get_mut("devnet").unwrap().chain_id = Some(1337);
        let net = config.network_with_env("devnet", None, None).unwrap();
        assert_eq!(net.chain_id, 1337);
    }
}
