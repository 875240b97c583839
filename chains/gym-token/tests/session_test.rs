mod common;

use common::*;
use gym_token::session::{BalanceStatus, NoticeLevel, SessionEvent, SessionStatus, WalletEvent};
use std::sync::Arc;

#[tokio::test]
async fn test_connect_adopts_first_account_and_fetches_balance() {
    let me = addr(0x01);
    let wallet = Arc::new(MockWallet::new(vec![me, addr(0x02)], SEPOLIA));
    wallet.set_balance(me, "1234.5");
    let mut session = session_with(Some(wallet.clone()), MockChain::new(Some(SEPOLIA)));
    let mut rx = session.subscribe();

    session.connect().await.unwrap();

    assert_eq!(
        session.status(),
        SessionStatus::Connected {
            account: me,
            chain_id: Some(SEPOLIA)
        }
    );
    assert_eq!(session.token_balance(), "1234.5");
    assert_eq!(session.balance_status(), BalanceStatus::Fresh);
    assert_eq!(wallet.bind_count(), 1);

    let events = drain(&mut rx);
    assert!(events.contains(&SessionEvent::AccountChanged(me)));
    assert!(notice_titles(&events).contains(&"Wallet connected".to_string()));
}

#[tokio::test]
async fn test_empty_accounts_event_disconnects_and_resets_balance() {
    let me = addr(0x01);
    let wallet = Arc::new(MockWallet::new(vec![me], SEPOLIA));
    wallet.set_balance(me, "50");
    let mut session = session_with(Some(wallet.clone()), MockChain::new(Some(SEPOLIA)));
    session.connect().await.unwrap();
    assert_eq!(session.token_balance(), "50.0");

    wallet.push(WalletEvent::AccountsChanged(vec![]));
    assert_eq!(session.pump_events().await, 1);

    let state = session.connection_state();
    assert!(!state.is_connected);
    assert_eq!(state.account, None);
    assert_eq!(session.token_balance(), "0");
    assert_eq!(session.status(), SessionStatus::Disconnected);
    assert!(session.token().is_none());
}

#[tokio::test]
async fn test_account_switch_rebinds_and_refetches() {
    let (first, second) = (addr(0x01), addr(0x02));
    let wallet = Arc::new(MockWallet::new(vec![first], SEPOLIA));
    wallet.set_balance(first, "10");
    wallet.set_balance(second, "20");
    let mut session = session_with(Some(wallet.clone()), MockChain::new(Some(SEPOLIA)));
    session.connect().await.unwrap();

    session
        .handle_wallet_event(WalletEvent::AccountsChanged(vec![second]))
        .await
        .unwrap();

    assert_eq!(session.account(), Some(second));
    assert_eq!(session.token_balance(), "20.0");
    assert_eq!(wallet.binds.lock().unwrap().last(), Some(&(second, SEPOLIA)));

    // Same account again is a no-op
    let binds = wallet.bind_count();
    session
        .handle_wallet_event(WalletEvent::AccountsChanged(vec![second]))
        .await
        .unwrap();
    assert_eq!(wallet.bind_count(), binds);
}

#[tokio::test]
async fn test_chain_change_rebinds_and_refetches_balance() {
    let me = addr(0x01);
    let wallet = Arc::new(MockWallet::new(vec![me], SEPOLIA));
    wallet.set_balance(me, "10");
    let mut session = session_with(Some(wallet.clone()), MockChain::new(Some(SEPOLIA)));
    session.connect().await.unwrap();
    assert_eq!(session.token_balance(), "10.0");
    let mut rx = session.subscribe();

    wallet.set_balance(me, "99");
    wallet.push(WalletEvent::ChainChanged("0x1".to_string()));
    assert_eq!(session.pump_events().await, 1);

    assert_eq!(session.chain_id(), Some(1));
    assert_eq!(session.token_balance(), "99.0");
    assert_eq!(session.balance_status(), BalanceStatus::Fresh);
    assert_eq!(wallet.binds.lock().unwrap().last(), Some(&(me, 1)));
    assert!(session.token().unwrap().can_sign());

    let events = drain(&mut rx);
    assert!(events.contains(&SessionEvent::ChainChanged(1)));
    assert!(events.contains(&SessionEvent::BalanceUpdated("99.0".to_string())));
}

#[tokio::test]
async fn test_chain_change_without_account_stays_lazy() {
    let wallet = Arc::new(MockWallet::new(vec![addr(0x01)], SEPOLIA));
    let mut session = session_with(Some(wallet.clone()), MockChain::new(Some(SEPOLIA)));

    session
        .handle_wallet_event(WalletEvent::ChainChanged("0x1".to_string()))
        .await
        .unwrap();
    assert_eq!(session.chain_id(), Some(1));
    assert_eq!(wallet.bind_count(), 0);
    assert_eq!(session.token_balance(), "0");
}

#[tokio::test]
async fn test_bad_chain_id_is_rejected_without_state_change() {
    let wallet = Arc::new(MockWallet::new(vec![addr(0x01)], SEPOLIA));
    let mut session = session_with(Some(wallet.clone()), MockChain::new(Some(SEPOLIA)));
    session.connect().await.unwrap();

    wallet.push(WalletEvent::ChainChanged("sepolia".to_string()));
    assert_eq!(session.pump_events().await, 0);
    assert_eq!(session.chain_id(), Some(SEPOLIA));
}

#[tokio::test]
async fn test_missing_wallet_falls_back_to_read_only() {
    let mut session = session_with(None, MockChain::new(Some(SEPOLIA)));
    let mut rx = session.subscribe();

    session.connect().await.unwrap();

    assert_eq!(session.status(), SessionStatus::ReadOnly { chain_id: SEPOLIA });
    assert!(!session.is_connected());
    let token = session.token().unwrap();
    assert!(!token.can_sign());

    let titles = notice_titles(&drain(&mut rx));
    assert_eq!(
        titles,
        vec!["No Ethereum wallet found", "Install a wallet", "Read-only mode activated"]
    );
}

#[tokio::test]
async fn test_read_only_defaults_to_sepolia_when_rpc_is_silent() {
    let mut session = session_with(None, MockChain::new(None));
    session.connect().await.unwrap();
    assert_eq!(session.chain_id(), Some(SEPOLIA));
}

#[tokio::test]
async fn test_rejected_connect_keeps_state_and_reports() {
    let wallet = Arc::new(MockWallet::new(vec![addr(0x01)], SEPOLIA).rejecting());
    let mut session = session_with(Some(wallet), MockChain::new(Some(SEPOLIA)));
    let mut rx = session.subscribe();

    assert!(session.connect().await.is_err());
    assert_eq!(session.status(), SessionStatus::Disconnected);
    assert!(!session.is_loading());

    let events = drain(&mut rx);
    let error = events.iter().find_map(|e| match e {
        SessionEvent::Notice(n) if n.level == NoticeLevel::Error => Some(n.clone()),
        _ => None,
    });
    let error = error.unwrap();
    assert_eq!(error.title, "Connection error");
    assert!(error.description.unwrap().contains("rejected"));
}

#[tokio::test]
async fn test_init_restores_existing_account_silently() {
    let me = addr(0x07);
    let wallet = Arc::new(MockWallet::new(vec![me], SEPOLIA));
    let mut session = session_with(Some(wallet), MockChain::new(Some(SEPOLIA)));
    let mut rx = session.subscribe();

    session.init().await;

    assert_eq!(session.account(), Some(me));
    assert!(notice_titles(&drain(&mut rx)).is_empty());
}

#[tokio::test]
async fn test_disconnect_clears_account() {
    let wallet = Arc::new(MockWallet::new(vec![addr(0x01)], SEPOLIA));
    let mut session = session_with(Some(wallet), MockChain::new(Some(SEPOLIA)));
    session.connect().await.unwrap();
    let mut rx = session.subscribe();

    session.disconnect();

    assert!(!session.is_connected());
    assert_eq!(session.token_balance(), "0");
    assert!(drain(&mut rx).contains(&SessionEvent::Disconnected));
}
