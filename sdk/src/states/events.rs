use serde::Deserialize;

use crate::states::layout::TypeName;
use crate::utils::deserialize_number;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: emitted by the staking package, read back from simulated execution
// ──────────────────────────────────────────────────────────────────────────────
//

/// Emitted by `staking::calculate_pending_reward<T>`.
///
/// Only ever observed through a simulation; it carries the reward the
/// position would receive if it claimed `T` now.
#[derive(Clone, Debug, Deserialize)]
pub struct CalculatePendingRewardEvent {
    pub reward_info: PendingRewardInfo,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PendingRewardInfo {
    /// Reward asset type, reported without the `0x` prefix.
    pub coin_type: TypeName,
    #[serde(deserialize_with = "deserialize_number")]
    pub pending_reward_amount: u128,
}
