use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Pending reward of one configured asset, ready for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionReward {
    pub asset_type: String,
    pub symbol: String,
    /// Raw on-chain amount.
    pub raw_amount: u128,
    /// `raw_amount` scaled by the asset's decimals.
    pub pending_reward: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInfo {
    pub position_id: String,
    pub staked: u128,
    /// One entry per configured reward asset, in configuration order.
    pub rewards: Vec<PositionReward>,
}

/// Read-only view of a wallet's staking state, rebuilt on every call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingSummary {
    pub total_staked: u128,
    pub positions: Vec<PositionInfo>,
}

impl StakingSummary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn reward_entries(&self) -> impl Iterator<Item = &PositionReward> {
        self.positions
            .iter()
            .flat_map(|position| position.rewards.iter())
    }
}
