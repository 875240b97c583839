use anyhow::{anyhow, Context};
use core_logic::{advise, Advice};

#[test]
fn test_funds_take_priority() {
    let err = anyhow!("insufficient funds for gas * price + value: network error");
    assert_eq!(advise(&err), Some(Advice::InsufficientFunds));
}

#[test]
fn test_network_matched_through_context_chain() {
    let err: anyhow::Error = Err::<(), _>(anyhow!("error sending request for url"))
        .context("Failed to fetch balance")
        .unwrap_err();
    assert_eq!(advise(&err), Some(Advice::Network));
    assert!(Advice::Network.lines()[0].contains("Network connection issues"));
}

#[test]
fn test_nonce_and_unknown() {
    assert_eq!(advise(&anyhow!("Nonce too low")), Some(Advice::Nonce));
    assert_eq!(
        advise(&anyhow!("replacement fee too low")),
        Some(Advice::Nonce)
    );
    assert_eq!(advise(&anyhow!("execution reverted")), None);
}
