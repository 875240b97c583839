//! # Core Logic - Error Advice
//!
//! Maps raw provider/RPC error text onto a short list of remedies for the
//! script output. Matching is substring based on the full error chain.

/// Known failure families the scripts can suggest a remedy for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    InsufficientFunds,
    Network,
    Nonce,
}

impl Advice {
    pub fn lines(&self) -> &'static [&'static str] {
        match self {
            Advice::InsufficientFunds => &[
                "💡 Solution: You need more ETH in your wallet for gas fees.",
                "   Get test ETH from a Sepolia faucet like https://sepoliafaucet.com/",
            ],
            Advice::Network => &[
                "💡 Solution: Network connection issues. Try:",
                "   1. Check your internet connection",
                "   2. Run the find-rpc script to find a working RPC endpoint",
                "   3. Update your .env file with a working RPC URL",
            ],
            Advice::Nonce => &[
                "💡 Solution: Transaction nonce issues. Try:",
                "   1. Wait for any pending transactions to complete",
                "   2. Increase gas price if you're trying to speed up a transaction",
            ],
        }
    }
}

const FUNDS_PATTERNS: [&str; 1] = ["insufficient funds"];

const NETWORK_PATTERNS: [&str; 4] = [
    "could not detect network",
    "network error",
    "error sending request",
    "connection refused",
];

const NONCE_PATTERNS: [&str; 2] = ["nonce", "replacement fee too low"];

/// Picks the advice for an error, if any pattern matches.
pub fn advise(error: &anyhow::Error) -> Option<Advice> {
    let error_msg = format!("{:#}", error).to_lowercase();
    let matches = |patterns: &[&str]| patterns.iter().any(|p| error_msg.contains(p));

    if matches(&FUNDS_PATTERNS) {
        Some(Advice::InsufficientFunds)
    } else if matches(&NETWORK_PATTERNS) {
        Some(Advice::Network)
    } else if matches(&NONCE_PATTERNS) {
        Some(Advice::Nonce)
    } else {
        None
    }
}

/// Warning printed when a script targets a throwaway local chain.
pub fn ephemeral_network_notice(network: &str) -> Vec<String> {
    vec![
        format!("⚠️ You are using the {} network.", network),
        "   This is a local development network that resets after the script finishes."
            .to_string(),
        "   For persistent deployment, use a testnet like Sepolia:".to_string(),
        "   deploy --network sepolia".to_string(),
    ]
}
