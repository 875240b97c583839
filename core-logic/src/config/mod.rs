use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Network selector shared by every script binary.
#[derive(clap::Args, Debug, Clone)]
pub struct NetworkArgs {
    /// Network to run against (sepolia, mainnet, localhost, hardhat)
    #[arg(short, long, default_value = "sepolia")]
    pub network: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum WalletSource {
    Env { key: String },
    File { path: String },
}

impl Default for WalletSource {
    fn default() -> Self {
        WalletSource::Env {
            key: "PRIVATE_KEY".to_string(),
        }
    }
}

/// Static description of a network the toolkit knows how to talk to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkProfile {
    pub name: String,
    pub chain_id: u64,
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default)]
    pub explorer: Option<String>,
    #[serde(default)]
    pub token_address: Option<String>,
}

impl NetworkProfile {
    pub const SEPOLIA_TOKEN: &'static str = "0x5dbB770Daa57c7f345E1e55024F0f06247f89682";

    pub fn known() -> Vec<NetworkProfile> {
        vec![
            NetworkProfile {
                name: "sepolia".to_string(),
                chain_id: 11_155_111,
                rpc_url: None,
                explorer: Some("https://sepolia.etherscan.io".to_string()),
                token_address: Some(Self::SEPOLIA_TOKEN.to_string()),
            },
            NetworkProfile {
                name: "mainnet".to_string(),
                chain_id: 1,
                rpc_url: None,
                explorer: Some("https://etherscan.io".to_string()),
                token_address: None,
            },
            NetworkProfile {
                name: "localhost".to_string(),
                chain_id: 31_337,
                rpc_url: Some("http://127.0.0.1:8545".to_string()),
                explorer: None,
                token_address: None,
            },
            NetworkProfile {
                name: "hardhat".to_string(),
                chain_id: 31_337,
                rpc_url: Some("http://127.0.0.1:8545".to_string()),
                explorer: None,
                token_address: None,
            },
        ]
    }

    pub fn by_name(name: &str) -> Result<NetworkProfile, ConfigError> {
        let known = Self::known();
        let names = known
            .iter()
            .map(|n| n.name.clone())
            .collect::<Vec<_>>()
            .join(", ");
        known
            .into_iter()
            .find(|n| n.name.eq_ignore_ascii_case(name))
            .ok_or(ConfigError::UnknownNetwork {
                name: name.to_string(),
                known: names,
            })
    }

    /// Local development networks reset after every run.
    pub fn is_ephemeral(&self) -> bool {
        self.name == "hardhat" || self.name == "localhost"
    }

    pub fn links(&self) -> Option<ExplorerLinks> {
        self.explorer.as_deref().map(ExplorerLinks::new)
    }
}

/// Block explorer URL builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerLinks {
    base: String,
}

impl ExplorerLinks {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn tx(&self, hash: &str) -> String {
        format!("{}/tx/{}", self.base, hash)
    }

    pub fn address(&self, address: &str) -> String {
        format!("{}/address/{}", self.base, address)
    }

    pub fn token(&self, address: &str) -> String {
        format!("{}/token/{}", self.base, address)
    }
}
