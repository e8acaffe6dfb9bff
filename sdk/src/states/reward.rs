use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::utils::{deserialize_number, normalize_type_tag, serialize_number};

/// Pending reward of one asset for one position, as reported by a simulated
/// `calculate_pending_reward` call. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReward {
    pub asset_type: String,
    #[serde(
        deserialize_with = "deserialize_number",
        serialize_with = "serialize_number"
    )]
    pub pending_reward: u128,
}

impl PendingReward {
    pub fn zero(asset_type: impl Into<String>) -> Self {
        Self {
            asset_type: asset_type.into(),
            pending_reward: 0,
        }
    }
}

/// Accumulator state of one reward asset inside the reward manager.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardInfo {
    pub reward_asset_type: String,
    pub acc_reward_per_share: u128,
    /// Unix timestamp (ms) of the last accumulator update.
    pub last_reward_time: u64,
}

/// The contract's reward manager.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardManager {
    pub id: String,
    pub total_staked_amount: u128,
    pub reward_infos: BTreeMap<String, RewardInfo>,
    /// Global index: wallet address -> table of position ids.
    pub user_positions_record_id: String,
}

/// Emission schedule of one reward asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardConfig {
    pub id: String,
    pub asset_type: String,
    pub start_time: u64,
    pub end_time: u64,
    pub emission_rate: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    pub id: String,
    pub version: u64,
    pub open_staking: bool,
    pub reward_configs: BTreeMap<String, RewardConfig>,
}

impl ProtocolConfig {
    pub fn reward_config(&self, asset_type: &str) -> Option<&RewardConfig> {
        self.reward_configs.get(&normalize_type_tag(asset_type))
    }
}
