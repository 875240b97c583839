//! GymToken toolkit: wallet session, contract binding, page views and the
//! developer scripts under `src/bin`.

pub mod config;
pub mod contract;
pub mod indexer;
pub mod session;
pub mod staking;
pub mod task;
pub mod utils;
pub mod views;
