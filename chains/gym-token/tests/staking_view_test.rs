mod common;

use common::*;
use gym_token::session::Session;
use gym_token::staking::{SimulatedStaking, StakingBackend};
use gym_token::views::staking::StakingView;
use std::sync::Arc;

async fn connected(balance: &str) -> Session {
    let me = addr(0x01);
    let wallet = Arc::new(MockWallet::new(vec![me], SEPOLIA));
    wallet.set_balance(me, balance);
    let mut session = session_with(Some(wallet), MockChain::new(Some(SEPOLIA)));
    session.connect().await.unwrap();
    session
}

#[tokio::test]
async fn test_model_uses_seeded_simulation() {
    let session = connected("1000").await;
    let view = StakingView::new(Arc::new(SimulatedStaking::new()));

    let model = view.load(&session).await.unwrap();
    assert!(model.simulated);
    assert_eq!(model.balance, 1000.0);
    assert_eq!(model.staked, 5_000.0);
    assert_eq!(model.rewards, 250.0);
    assert_eq!(model.apr_label(), "12.00%");
    assert!((model.share - 0.5).abs() < 1e-9);
    assert!((model.daily_rewards - 5_000.0 * 0.12 / 365.0).abs() < 1e-9);
    assert_eq!(model.period_days, 30);
    assert_eq!(model.total_staked_label(), "1,000,000 GYM");
}

#[tokio::test]
async fn test_stake_validation_and_success() {
    let session = connected("100").await;
    let backend = Arc::new(SimulatedStaking::new());
    let view = StakingView::new(backend.clone());
    let mut rx = session.subscribe();

    assert_eq!(view.stake(&session, "abc").await.unwrap_err().message, "Invalid amount");
    assert_eq!(view.stake(&session, "0").await.unwrap_err().message, "Invalid amount");
    assert_eq!(
        view.stake(&session, "100.01").await.unwrap_err().message,
        "Insufficient balance"
    );
    view.stake(&session, "40").await.unwrap();

    let position = backend.position(addr(0x01)).await.unwrap();
    assert_eq!(position.staked, 5_040.0);
    assert_eq!(view.load(&session).await.unwrap().balance, 60.0);
    assert_eq!(
        notice_titles(&drain(&mut rx)),
        vec!["Invalid amount", "Invalid amount", "Insufficient balance", "Staking successful"]
    );
}

#[tokio::test]
async fn test_unstake_and_claim() {
    let session = connected("0").await;
    let backend = Arc::new(SimulatedStaking::new());
    let view = StakingView::new(backend.clone());
    assert_eq!(view.load(&session).await.unwrap().staked, 5_000.0);
    let mut rx = session.subscribe();

    assert_eq!(
        view.unstake(&session, "5000.5").await.unwrap_err().message,
        "Insufficient staked amount"
    );
    view.unstake(&session, "1000").await.unwrap();
    backend.accrue().unwrap();
    assert_eq!(view.claim(&session).await.unwrap(), 250.01);

    let model = view.load(&session).await.unwrap();
    assert_eq!(model.staked, 4_000.0);
    assert_eq!(model.rewards, 0.0);
    assert_eq!(
        notice_titles(&drain(&mut rx)),
        vec!["Insufficient staked amount", "Unstaking successful", "Rewards claimed"]
    );
}

#[tokio::test]
async fn test_requires_connected_account() {
    let session = session_with(None, MockChain::new(Some(SEPOLIA)));
    let view = StakingView::new(Arc::new(SimulatedStaking::new()));
    assert!(view.load(&session).await.is_err());
    assert!(view.claim(&session).await.is_err());
}

#[tokio::test]
async fn test_full_balance_cannot_be_staked_twice() {
    let session = connected("250").await;
    let view = StakingView::new(Arc::new(SimulatedStaking::new()));
    let mut rx = session.subscribe();

    view.stake(&session, "250").await.unwrap();
    assert_eq!(
        view.stake(&session, "250").await.unwrap_err().message,
        "Insufficient balance"
    );
    assert_eq!(view.load(&session).await.unwrap().balance, 0.0);

    // Unstaking returns tokens to the spendable balance
    view.unstake(&session, "100").await.unwrap();
    view.stake(&session, "100").await.unwrap();
    assert_eq!(
        notice_titles(&drain(&mut rx)),
        vec![
            "Staking successful",
            "Insufficient balance",
            "Unstaking successful",
            "Staking successful"
        ]
    );
}

#[tokio::test]
async fn test_stake_compares_in_base_units() {
    let session = connected("1.000000000000000001").await;
    let view = StakingView::new(Arc::new(SimulatedStaking::new()));

    assert_eq!(
        view.stake(&session, "1.000000000000000002").await.unwrap_err().message,
        "Insufficient balance"
    );
    view.stake(&session, "1.000000000000000001").await.unwrap();
}
