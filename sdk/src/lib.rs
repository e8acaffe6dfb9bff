//! Client-side SDK for the staking protocol.
//!
//! The crate turns "stake N units of asset X" requests into transaction
//! plans (selecting, merging and splitting the caller's asset records) and
//! folds the on-ledger staking state of a wallet into a [`StakingSummary`].
//! All ledger access goes through the [`ledger::Ledger`] trait.

/// Shared clock object passed to every time-dependent entry point.
pub const CLOCK_OBJECT_ID: &str = "0x6";
/// Fully qualified type of the network's base currency.
pub const BASE_CURRENCY_TYPE: &str = "0x2::sui::SUI";
/// Event emitted by `staking::calculate_pending_reward`.
pub const PENDING_REWARD_EVENT: &str = "events::CalculatePendingRewardEvent";
/// Page size used when listing owned asset records.
pub const ASSET_PAGE_LIMIT: usize = 50;

pub mod client;
pub mod coin;
pub mod error;
pub mod ledger;
pub mod query;
pub mod states;
pub mod supply;
pub mod transaction;
pub mod utils;

pub use client::StakingClient;
pub use error::{Result, StakingError};
pub use states::*;
