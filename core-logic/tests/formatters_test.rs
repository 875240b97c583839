use core_logic::{
    format_address, format_with_commas, format_with_commas_str, is_valid_address, network_name,
    short_address, time_difference,
};

const ADDR: &str = "0x5dbB770Daa57c7f345E1e55024F0f06247f89682";

#[test]
fn test_format_address_keeps_prefix_and_suffix() {
    assert_eq!(format_address(ADDR, 4), "0x5dbB...9682");
    assert_eq!(format_address(ADDR, 6), "0x5dbB77...f89682");
}

#[test]
fn test_format_address_short_inputs() {
    assert_eq!(format_address("", 4), "");
    assert_eq!(format_address("0x1234", 4), "0x1234");
    assert_eq!(format_address("123456789", 4), "123456789");
}

#[test]
fn test_short_address_script_variant() {
    assert_eq!(short_address(ADDR), "0x5dbB...9682");
    assert_eq!(short_address("0xabc"), "0xabc");
}

#[test]
fn test_address_validation() {
    assert!(is_valid_address(ADDR));
    assert!(is_valid_address(&ADDR.to_lowercase()));
    assert!(!is_valid_address(&ADDR[2..]));
    assert!(!is_valid_address(&format!("{}0", ADDR)));
    assert!(!is_valid_address("0x5dbB770Daa57c7f345E1e55024F0f06247f8968g"));
    assert!(!is_valid_address(""));
}

#[test]
fn test_commas() {
    assert_eq!(format_with_commas(1_234_567.891), "1,234,567.89");
    assert_eq!(format_with_commas(1000.0), "1,000");
    assert_eq!(format_with_commas(0.5), "0.5");
    assert_eq!(format_with_commas(-2500.25), "-2,500.25");
    assert_eq!(format_with_commas_str("1000000000.0"), "1,000,000,000");
    assert_eq!(format_with_commas_str("abc"), "NaN");
}

#[test]
fn test_time_difference_buckets() {
    let now = 1_700_000_000;
    assert_eq!(time_difference(now - 5, now), "5 seconds ago");
    assert_eq!(time_difference(now - 90, now), "1 minutes ago");
    assert_eq!(time_difference(now - 3_661, now), "1 hours ago");
    assert_eq!(time_difference(now - 2 * 86_400, now), "2 days ago");
    assert_eq!(time_difference(now - 2_592_000, now), "1 months ago");
    assert_eq!(time_difference(now - 2 * 31_536_000, now), "2 years ago");
}

#[test]
fn test_time_difference_extreme_inputs_saturate() {
    assert_eq!(
        time_difference(i64::MIN, i64::MAX),
        format!("{} years ago", i64::MAX / 31_536_000)
    );
    // A timestamp far in the future stays in the seconds bucket
    assert!(time_difference(i64::MAX, i64::MIN).ends_with("seconds ago"));
}

#[test]
fn test_network_names() {
    assert_eq!(network_name(Some(1)), "Ethereum Mainnet");
    assert_eq!(network_name(Some(11_155_111)), "Sepolia Testnet");
    assert_eq!(network_name(Some(42)), "Unknown Network (42)");
    assert_eq!(network_name(None), "Unknown Network");
}
