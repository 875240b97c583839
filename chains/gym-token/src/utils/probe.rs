use super::provider::build_provider;
use anyhow::{anyhow, Result};
use core_logic::{NetworkError, RpcManager, PROBE_TIMEOUT};
use ethers::prelude::*;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub url: String,
    pub chain_id: u64,
    pub block_number: u64,
    pub latency_ms: u64,
}

/// Races the chain-id lookup against [`PROBE_TIMEOUT`], then reads the block
/// number through the regular client timeout.
pub async fn probe_endpoint(url: &str, client_timeout: Duration) -> Result<(ProbeReport, Provider<Http>)> {
    let provider = build_provider(url, client_timeout)?;
    let start = Instant::now();

    let chain_id = tokio::time::timeout(PROBE_TIMEOUT, provider.get_chainid())
        .await
        .map_err(|_| NetworkError::Timeout {
            timeout_ms: PROBE_TIMEOUT.as_millis() as u64,
            endpoint: url.to_string(),
        })?
        .map_err(|e| anyhow!("{}", e))?;

    let block_number = provider
        .get_block_number()
        .await
        .map_err(|e| anyhow!("{}", e))?;

    let report = ProbeReport {
        url: url.to_string(),
        chain_id: chain_id.low_u64(),
        block_number: block_number.as_u64(),
        latency_ms: start.elapsed().as_millis() as u64,
    };
    debug!("Probe {} ok in {}ms", url, report.latency_ms);
    Ok((report, provider))
}

/// Probes endpoints in list order and stops at the first that answers.
/// Every attempt is recorded on the manager.
pub async fn find_working(
    manager: &RpcManager,
    client_timeout: Duration,
) -> Option<(ProbeReport, Provider<Http>)> {
    for url in manager.urls() {
        println!("🔄 Testing connection to: {}", url);
        match probe_endpoint(url, client_timeout).await {
            Ok((report, provider)) => {
                manager.record_success(url, report.latency_ms);
                println!("✅ Connected to network (chainId: {})", report.chain_id);
                println!("✅ Current block number: {}", report.block_number);
                info!("Working RPC endpoint: {}", url);
                return Some((report, provider));
            }
            Err(e) => {
                let reason = format!("{:#}", e);
                println!("❌ Connection failed: {}", reason);
                manager.record_failure(url, &reason);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failed_endpoints_are_recorded() {
        // Neither URL can open a connection, so this never touches the network
        let urls = ["not a url".to_string(), "ftp://rpc.invalid/".to_string()];
        let manager = RpcManager::new(11_155_111, &urls);
        let found = find_working(&manager, Duration::from_secs(2)).await;
        assert!(found.is_none());

        for status in manager.health_status() {
            assert!(status.probed);
            assert!(!status.healthy);
            assert_eq!(status.failure_count, 1);
        }
        assert_eq!(manager.healthy_count(), 0);
    }
}
