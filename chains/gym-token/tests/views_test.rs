mod common;

use common::*;
use core_logic::ExplorerLinks;
use gym_token::indexer::Direction;
use gym_token::session::{BalanceStatus, SessionStatus, WalletEvent};
use gym_token::views::dashboard::{Dashboard, DashboardView};
use gym_token::views::explorer::ExplorerView;
use gym_token::views::home::{HomeAction, HomeView};
use gym_token::views::Page;
use std::sync::Arc;

const NOW: i64 = 1_700_000_000;

fn links() -> ExplorerLinks {
    ExplorerLinks::new("https://sepolia.etherscan.io")
}

#[tokio::test]
async fn test_home_connects_then_navigates() {
    let wallet = Arc::new(MockWallet::new(vec![addr(0x01)], SEPOLIA));
    let mut session = session_with(Some(wallet), MockChain::new(Some(SEPOLIA)));

    assert_eq!(HomeView::get_started(&mut session).await, HomeAction::Connecting);
    assert!(session.is_connected());
    assert_eq!(
        HomeView::get_started(&mut session).await,
        HomeAction::Navigate(Page::Dashboard)
    );
    assert_eq!(Page::Dashboard.path(), "/dashboard");
    assert!(HomeView::install_wallet_url().starts_with("https://"));
}

#[tokio::test]
async fn test_dashboard_shows_fresh_balance_after_chain_switch() {
    let me = addr(0x01);
    let wallet = Arc::new(MockWallet::new(vec![me], SEPOLIA));
    wallet.set_balance(me, "10");
    let mut session = session_with(Some(wallet.clone()), MockChain::new(Some(SEPOLIA)));
    session.connect().await.unwrap();

    wallet.set_balance(me, "99");
    wallet.push(WalletEvent::ChainChanged("0xaa36a7".to_string()));
    session.pump_events().await;

    let index = MockIndex::new(vec![]);
    let Dashboard::Ready(model) = DashboardView::load(&mut session, &index, None, NOW).await else {
        panic!("expected a dashboard");
    };
    assert_eq!(model.balance, "99");
    assert_eq!(model.balance_status, BalanceStatus::Fresh);
}

#[tokio::test]
async fn test_dashboard_requires_account() {
    let mut session = session_with(None, MockChain::new(Some(SEPOLIA)));
    session.connect().await.unwrap();
    assert!(matches!(session.status(), SessionStatus::ReadOnly { .. }));

    let index = MockIndex::new(vec![]);
    let view = DashboardView::load(&mut session, &index, None, NOW).await;
    assert_eq!(view, Dashboard::NotConnected);
}

#[tokio::test]
async fn test_dashboard_model() {
    let me = addr(0x01);
    let other = addr(0x02);
    let wallet = Arc::new(MockWallet::new(vec![me], SEPOLIA));
    wallet.set_balance(me, "1234567.891");
    let mut session = session_with(Some(wallet), MockChain::new(Some(SEPOLIA)));
    session.connect().await.unwrap();

    let index = MockIndex::new(vec![
        record(1, other, me, "5", 10, NOW - 90),
        record(2, me, other, "2", 9, NOW - 3_661),
        record(3, other, addr(0x03), "9", 8, NOW - 10),
    ]);
    let links = links();
    let Dashboard::Ready(model) = DashboardView::load(&mut session, &index, Some(&links), NOW).await else {
        panic!("expected a dashboard");
    };

    assert_eq!(model.balance, "1,234,567.89");
    assert_eq!(model.network, "Sepolia");
    assert!(model.network_supported);
    assert_eq!(model.account_short, "0x0101...0101");
    assert_eq!(model.transactions.len(), 2);
    assert_eq!(model.transactions[0].direction, Direction::Incoming);
    assert_eq!(model.transactions[0].age.as_deref(), Some("1 minutes ago"));
    assert_eq!(model.transactions[1].direction, Direction::Outgoing);
    assert_eq!(model.transactions[1].age.as_deref(), Some("1 hours ago"));
    assert!(model.transactions[0]
        .explorer_url
        .as_deref()
        .unwrap()
        .starts_with("https://sepolia.etherscan.io/tx/0x0101"));
}

#[tokio::test]
async fn test_dashboard_flags_unsupported_chain_and_index_failure() {
    let wallet = Arc::new(MockWallet::new(vec![addr(0x01)], 1));
    let mut session = session_with(Some(wallet), MockChain::new(Some(SEPOLIA)));
    session.connect().await.unwrap();
    let mut rx = session.subscribe();

    let Dashboard::Ready(model) = DashboardView::load(&mut session, &MockIndex::failing(), None, NOW).await else {
        panic!("expected a dashboard");
    };
    assert_eq!(model.network, "Unknown");
    assert!(!model.network_supported);
    assert_eq!(model.network_note, "Unsupported network");
    assert!(model.transactions.is_empty());
    assert_eq!(notice_titles(&drain(&mut rx)), vec!["Error fetching transactions"]);
}

#[tokio::test]
async fn test_explorer_ranks_holders_and_searches() {
    let (a, b, c) = (addr(0x0a), addr(0x0b), addr(0x0c));
    let chain = MockChain {
        chain_id: Some(SEPOLIA),
        token: Arc::new(
            MockToken::new(addr(0xee), None, SEPOLIA)
                .with_balance(a, "250000000")
                .with_balance(b, "1000")
                .with_balance(c, "0"),
        ),
    };
    let mut session = session_with(None, chain);
    session.connect().await.unwrap();

    let index = MockIndex::new(vec![
        record(0x11, addr(0x00), a, "250000000", 5, NOW - 30),
        record(0x22, a, b, "1000", 6, NOW - 20),
        record(0x33, b, c, "0", 7, NOW - 10),
    ]);
    let links = links();
    let model = ExplorerView::load(&mut session, &index, Some(&links), NOW).await.unwrap();

    assert_eq!(model.total_supply, "1,000,000,000");
    assert_eq!(model.transfer_count, 3);
    // Zero address excluded from holders
    assert_eq!(model.holder_count, 3);
    assert_eq!(model.holders.len(), 2);
    assert_eq!(model.holders[0].rank, 1);
    assert_eq!(model.holders[0].percentage, "25.00");
    assert_eq!(model.holders[1].balance, "1,000");
    assert!(model.token_url.as_deref().unwrap().contains("/token/0x"));

    assert_eq!(model.search("").len(), 3);
    assert_eq!(model.search("0X2222").len(), 1);
    let by_addr = model.search(&format!("{:?}", b));
    assert_eq!(by_addr.len(), 2);
    assert!(model.search("deadbeef").is_empty());
}

#[tokio::test]
async fn test_explorer_without_token_handle() {
    let mut session = session_with(None, MockChain::new(Some(SEPOLIA)));
    let mut rx = session.subscribe();
    assert!(ExplorerView::load(&mut session, &MockIndex::new(vec![]), None, NOW)
        .await
        .is_err());
    assert_eq!(notice_titles(&drain(&mut rx)), vec!["Contract not loaded"]);
}
