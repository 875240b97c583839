use anyhow::{Context, Result};
use core_logic::ConfigError;
use ethers::prelude::*;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

/// Some public endpoints rate-limit clients without a browser user agent.
const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

pub fn http_client(timeout: Duration) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

pub fn build_provider(rpc_url: &str, timeout: Duration) -> Result<Provider<Http>> {
    let url = reqwest::Url::parse(rpc_url).map_err(|_| ConfigError::InvalidRpcUrl {
        url: rpc_url.to_string(),
    })?;
    Ok(Provider::new(Http::new_with_client(url, http_client(timeout)?)))
}
