use super::Page;
use crate::session::{Session, INSTALL_WALLET_URL};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAction {
    Navigate(Page),
    /// A connection attempt ran; its outcome was published as notices.
    Connecting,
}

pub struct HomeView;

impl HomeView {
    /// "Get started": go to the dashboard when connected, otherwise connect.
    pub async fn get_started(session: &mut Session) -> HomeAction {
        if session.is_connected() {
            return HomeAction::Navigate(Page::Dashboard);
        }
        if let Err(e) = session.connect().await {
            debug!("connect from home page failed: {:#}", e);
        }
        HomeAction::Connecting
    }

    pub fn install_wallet_url() -> &'static str {
        INSTALL_WALLET_URL
    }
}
