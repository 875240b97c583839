//! # Core Logic - Display Formatting
//!
//! Pure helpers for addresses, numbers, relative times and network names.
//! Nothing here touches the network.

use once_cell::sync::Lazy;
use regex::Regex;

pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("address pattern is a valid regex")
});

/// Shortens an address to `0x` + `chars` leading characters, an ellipsis and
/// `chars` trailing characters. Strings under 10 characters are returned as-is.
pub fn format_address(address: &str, chars: usize) -> String {
    if address.is_empty() {
        return String::new();
    }
    let len = address.chars().count();
    if len < 10 {
        return address.to_string();
    }

    let start: String = address.chars().take(chars + 2).collect();
    let end: String = address.chars().skip(len.saturating_sub(chars)).collect();
    format!("{}...{}", start, end)
}

/// Script-style truncation: `0x1234...abcd` for full-length addresses only.
pub fn short_address(address: &str) -> String {
    let len = address.chars().count();
    if len < 42 {
        return address.to_string();
    }
    let start: String = address.chars().take(6).collect();
    let end: String = address.chars().skip(38).collect();
    format!("{}...{}", start, end)
}

/// Inserts thousands separators into the integer part of a decimal string.
pub fn group_digits(value: &str) -> String {
    let (sign, rest) = match value.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", value),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(value.len() + digits.len() / 3);
    grouped.push_str(sign);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// en-US number display with at most two fraction digits.
pub fn format_with_commas(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if value < 0.0 && fixed != "0.00" {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Same as [`format_with_commas`] for values that arrive as strings.
pub fn format_with_commas_str(value: &str) -> String {
    format_with_commas(value.trim().parse::<f64>().unwrap_or(f64::NAN))
}

/// Token balance with fixed precision; dust below 0.01 keeps six digits.
pub fn format_token_balance(balance: f64, decimals: usize) -> String {
    if balance > 0.0 && balance < 0.01 {
        return format!("{:.6}", balance);
    }
    format!("{:.*}", decimals, balance)
}

pub fn network_name(chain_id: Option<u64>) -> String {
    match chain_id {
        None | Some(0) => "Unknown Network".to_string(),
        Some(1) => "Ethereum Mainnet".to_string(),
        Some(SEPOLIA_CHAIN_ID) => "Sepolia Testnet".to_string(),
        Some(5) => "Goerli Testnet".to_string(),
        Some(137) => "Polygon".to_string(),
        Some(80001) => "Mumbai Testnet".to_string(),
        Some(other) => format!("Unknown Network ({})", other),
    }
}

pub fn is_valid_address(address: &str) -> bool {
    ADDRESS_RE.is_match(address)
}

/// Human-readable age of a UNIX timestamp (seconds) relative to `now`.
pub fn time_difference(timestamp: i64, now: i64) -> String {
    let diff = now.saturating_sub(timestamp);

    if diff < 60 {
        format!("{} seconds ago", diff)
    } else if diff < 3_600 {
        format!("{} minutes ago", diff / 60)
    } else if diff < 86_400 {
        format!("{} hours ago", diff / 3_600)
    } else if diff < 2_592_000 {
        format!("{} days ago", diff / 86_400)
    } else if diff < 31_536_000 {
        format!("{} months ago", diff / 2_592_000)
    } else {
        format!("{} years ago", diff / 31_536_000)
    }
}

pub fn time_since(timestamp: i64) -> String {
    time_difference(timestamp, chrono::Utc::now().timestamp())
}
