use crate::config::GymConfig;
use crate::contract::TokenBinding;
use crate::utils::probe::find_working;
use crate::utils::provider::build_provider;
use anyhow::{Context, Result};
use core_logic::{
    ConfigError, ExplorerLinks, GasConfig, NetworkError, NetworkProfile, RpcManager, WalletError, WalletManager,
    SEPOLIA_CHAIN_ID,
};
use ethers::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub mod t01_deploy;
pub mod t02_check_balance;
pub mod t03_airdrop;
pub mod t04_token_manager;
pub mod t05_find_rpc;
pub mod t06_test_connection;
pub mod t07_token_explorer;
pub mod t08_transfer_tokens;
pub mod t09_generate_wallet;
pub mod t10_dapp;

pub use self::t01_deploy::DeployTask;
pub use self::t02_check_balance::CheckBalanceTask;
pub use self::t03_airdrop::AirdropTask;
pub use self::t04_token_manager::TokenManagerTask;
pub use self::t05_find_rpc::FindRpcTask;
pub use self::t06_test_connection::TestConnectionTask;
pub use self::t07_token_explorer::TokenExplorerTask;
pub use self::t08_transfer_tokens::TransferTokensTask;
pub use self::t09_generate_wallet::GenerateWalletTask;
pub use self::t10_dapp::DappTask;

pub use core_logic::traits::{Task, TaskResult};

pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Everything a script needs, resolved once from `--network`, the config
/// file and the environment.
#[derive(Clone, Debug)]
pub struct TaskContext {
    pub network: NetworkProfile,
    pub config: GymConfig,
    pub gas: GasConfig,
    /// `None` when `PRIVATE_KEY` is not set
    pub wallet: Option<LocalWallet>,
}

// Trait alias
pub type GymTask = dyn Task<TaskContext> + Send + Sync;

impl TaskContext {
    pub fn load(network: &str) -> Result<Self> {
        let config = GymConfig::load_default().context("Failed to load gym-token config")?;
        let profile = config.network(network)?;
        Self::from_parts(config, profile)
    }

    pub fn from_parts(config: GymConfig, network: NetworkProfile) -> Result<Self> {
        let wallet = match WalletManager::from_env().load() {
            Ok(key) => {
                let wallet: LocalWallet = key.private_key.parse()?;
                Some(wallet.with_chain_id(network.chain_id))
            }
            Err(WalletError::MissingKey { var }) => {
                debug!("{} not set; running without a signer", var);
                None
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            gas: config.gas(),
            network,
            config,
            wallet,
        })
    }

    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(self.gas.timeout_secs)
    }

    pub fn rpc_url(&self) -> Result<&str, ConfigError> {
        self.network
            .rpc_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                field: if self.network.name == "sepolia" {
                    "SEPOLIA_URL".to_string()
                } else {
                    format!("networks.{}.rpc_url", self.network.name)
                },
            })
    }

    pub fn provider(&self) -> Result<Provider<Http>> {
        build_provider(self.rpc_url()?, self.client_timeout())
    }

    /// Endpoints usable for browsing: the configured URL, then on Sepolia the
    /// public fallbacks.
    pub fn read_only_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.rpc_url().ok().map(str::to_string).into_iter().collect();
        if self.network.chain_id == SEPOLIA_CHAIN_ID {
            for url in &self.config.fallback_rpcs {
                if !urls.contains(url) {
                    urls.push(url.clone());
                }
            }
        }
        urls
    }

    /// Provider for read-only access. Uses the configured URL when there is
    /// one, otherwise the first public fallback that answers.
    pub async fn read_only_provider(&self) -> Result<Provider<Http>> {
        let missing = match self.rpc_url() {
            Ok(url) => return build_provider(url, self.client_timeout()),
            Err(e) => e,
        };
        let fallbacks = self.read_only_urls();
        if fallbacks.is_empty() {
            return Err(missing.into());
        }

        info!("{}; probing public endpoints for read-only access", missing);
        let manager = RpcManager::new(self.network.chain_id, &fallbacks);
        match find_working(&manager, self.client_timeout()).await {
            Some((_, provider)) => Ok(provider),
            None => Err(NetworkError::AllEndpointsFailed {
                count: manager.endpoints_count(),
            }
            .into()),
        }
    }

    pub fn signer(&self) -> Result<&LocalWallet> {
        self.wallet.as_ref().ok_or_else(|| {
            WalletError::MissingKey {
                var: WalletManager::DEFAULT_ENV_KEY.to_string(),
            }
            .into()
        })
    }

    pub fn signing_client(&self) -> Result<Arc<SignerClient>> {
        let wallet = self.signer()?.clone();
        Ok(Arc::new(SignerMiddleware::new(self.provider()?, wallet)))
    }

    pub fn token_address(&self) -> Result<Address> {
        let raw = self
            .network
            .token_address
            .as_deref()
            .ok_or_else(|| ConfigError::NoDeployment {
                network: self.network.name.clone(),
            })?;
        raw.parse::<Address>().map_err(|e| {
            ConfigError::InvalidValue {
                field: "token_address".to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    pub fn signing_token(&self) -> Result<TokenBinding<SignerClient>> {
        Ok(TokenBinding::with_signer(
            self.token_address()?,
            self.signing_client()?,
            self.gas.clone(),
        ))
    }

    pub fn read_token(&self, provider: Provider<Http>) -> Result<TokenBinding<Provider<Http>>> {
        Ok(TokenBinding::read_only(
            self.token_address()?,
            Arc::new(provider),
            self.gas.clone(),
        ))
    }

    pub fn links(&self) -> Option<ExplorerLinks> {
        self.network.links()
    }

    /// Prints the reset warning for local chains.
    pub fn warn_if_ephemeral(&self) {
        if self.network.is_ephemeral() {
            for line in core_logic::ephemeral_network_notice(&self.network.name) {
                println!("{}", line);
            }
            println!();
        }
    }
}
