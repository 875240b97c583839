//! # Core Logic - RPC Manager
//!
//! Keeps the ordered list of candidate RPC endpoints for a chain together with
//! the outcome of the last probe of each one. Probing itself is chain specific
//! and lives with the caller.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::warn;

/// Probe deadline for a single endpoint.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// RPC endpoint information
#[derive(Debug)]
pub struct RpcEndpoint {
    pub url: String,
    pub chain_id: u64,
    pub last_latency_ms: AtomicU64,
    pub failure_count: AtomicU64,
    pub healthy: AtomicBool,
    probed: AtomicBool,
    last_error: Mutex<Option<String>>,
}

impl RpcEndpoint {
    pub fn new(url: String, chain_id: u64) -> Self {
        Self {
            url,
            chain_id,
            last_latency_ms: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            healthy: AtomicBool::new(false),
            probed: AtomicBool::new(false),
            last_error: Mutex::new(None),
        }
    }

    pub fn latency_ms(&self) -> u64 {
        self.last_latency_ms.load(Ordering::SeqCst)
    }

    /// Healthy means the last probe succeeded. Unprobed endpoints are not healthy.
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    pub fn was_probed(&self) -> bool {
        self.probed.load(Ordering::SeqCst)
    }

    pub fn failures(&self) -> u64 {
        self.failure_count.load(Ordering::SeqCst)
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|e| e.clone())
    }
}

/// Health status of an RPC endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcHealthStatus {
    pub url: String,
    pub latency_ms: u64,
    pub healthy: bool,
    pub probed: bool,
    pub failure_count: u64,
    pub last_error: Option<String>,
}

/// Ordered, de-duplicated endpoint list with per-endpoint probe results.
#[derive(Debug)]
pub struct RpcManager {
    chain_id: u64,
    endpoints: Vec<RpcEndpoint>,
}

impl RpcManager {
    /// The first occurrence of a URL wins; blank URLs are skipped.
    pub fn new(chain_id: u64, urls: &[String]) -> Self {
        let mut endpoints: Vec<RpcEndpoint> = Vec::with_capacity(urls.len());
        for url in urls {
            let url = url.trim();
            if url.is_empty() || endpoints.iter().any(|e| e.url == url) {
                continue;
            }
            endpoints.push(RpcEndpoint::new(url.to_string(), chain_id));
        }

        Self {
            chain_id,
            endpoints,
        }
    }

    /// Configured endpoint first, then the public fallbacks.
    pub fn with_preferred(chain_id: u64, preferred: Option<&str>, fallbacks: &[&str]) -> Self {
        let mut urls: Vec<String> = Vec::with_capacity(fallbacks.len() + 1);
        if let Some(url) = preferred {
            urls.push(url.to_string());
        }
        urls.extend(fallbacks.iter().map(|u| u.to_string()));
        Self::new(chain_id, &urls)
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn endpoints(&self) -> &[RpcEndpoint] {
        &self.endpoints
    }

    pub fn urls(&self) -> Vec<&str> {
        self.endpoints.iter().map(|e| e.url.as_str()).collect()
    }

    pub fn endpoints_count(&self) -> usize {
        self.endpoints.len()
    }

    pub fn healthy_count(&self) -> usize {
        self.endpoints.iter().filter(|e| e.is_healthy()).count()
    }

    /// First healthy endpoint in list order.
    pub fn first_healthy(&self) -> Option<&RpcEndpoint> {
        self.endpoints.iter().find(|e| e.is_healthy())
    }

    /// Lowest-latency healthy endpoint.
    pub fn get_fastest(&self) -> Option<&RpcEndpoint> {
        self.endpoints
            .iter()
            .filter(|e| e.is_healthy())
            .min_by_key(|e| e.latency_ms())
    }

    pub fn record_success(&self, url: &str, latency_ms: u64) {
        if let Some(endpoint) = self.find(url) {
            endpoint.probed.store(true, Ordering::SeqCst);
            endpoint.last_latency_ms.store(latency_ms, Ordering::SeqCst);
            endpoint.failure_count.store(0, Ordering::SeqCst);
            endpoint.healthy.store(true, Ordering::SeqCst);
            if let Ok(mut last) = endpoint.last_error.lock() {
                *last = None;
            }
        }
    }

    pub fn record_failure(&self, url: &str, reason: &str) {
        if let Some(endpoint) = self.find(url) {
            endpoint.probed.store(true, Ordering::SeqCst);
            let failures = endpoint.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
            endpoint.healthy.store(false, Ordering::SeqCst);
            if let Ok(mut last) = endpoint.last_error.lock() {
                *last = Some(reason.to_string());
            }
            warn!("RPC {} failed ({} so far): {}", url, failures, reason);
        }
    }

    pub fn health_status(&self) -> Vec<RpcHealthStatus> {
        self.endpoints
            .iter()
            .map(|e| RpcHealthStatus {
                url: e.url.clone(),
                latency_ms: e.latency_ms(),
                healthy: e.is_healthy(),
                probed: e.was_probed(),
                failure_count: e.failures(),
                last_error: e.last_error(),
            })
            .collect()
    }

    fn find(&self, url: &str) -> Option<&RpcEndpoint> {
        self.endpoints.iter().find(|e| e.url == url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_endpoint_comes_first_and_is_not_repeated() {
        let manager = RpcManager::with_preferred(
            11_155_111,
            Some("https://rpc.sepolia.org"),
            &["https://a.example", "https://rpc.sepolia.org", "https://b.example"],
        );
        assert_eq!(
            manager.urls(),
            vec!["https://rpc.sepolia.org", "https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_success_after_failure_restores_health() {
        let manager = RpcManager::new(1, &["https://a.example".to_string()]);
        assert!(manager.first_healthy().is_none());

        manager.record_failure("https://a.example", "Connection timed out");
        let status = &manager.health_status()[0];
        assert!(status.probed);
        assert!(!status.healthy);
        assert_eq!(status.last_error.as_deref(), Some("Connection timed out"));

        manager.record_success("https://a.example", 120);
        let status = &manager.health_status()[0];
        assert!(status.healthy);
        assert_eq!(status.failure_count, 0);
        assert_eq!(status.latency_ms, 120);
        assert!(status.last_error.is_none());
    }

    #[test]
    fn test_fastest_ignores_unhealthy() {
        let urls = vec!["https://a".to_string(), "https://b".to_string()];
        let manager = RpcManager::new(1, &urls);
        manager.record_success("https://a", 300);
        manager.record_success("https://b", 50);
        manager.record_failure("https://b", "boom");
        assert_eq!(manager.get_fastest().map(|e| e.url.as_str()), Some("https://a"));
    }
}
