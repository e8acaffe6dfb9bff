use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

//
// ──────────────────────────────────────────────────────────────────────────────
// Position
// ──────────────────────────────────────────────────────────────────────────────
//

/// A decoded snapshot of one staking position.
///
/// Positions are mutated only by the staking contract; the client never
/// updates one locally.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Ledger object id of the position.
    pub id: String,

    /// Amount of the stake asset locked in this position.
    pub staked_amount: u128,

    /// Reward-per-share checkpoint per reward asset type.
    pub reward_debt: BTreeMap<String, u128>,

    /// Rewards settled but not yet claimed, per reward asset type.
    pub waiting_claim_reward: BTreeMap<String, u128>,
}

impl Position {
    pub fn is_active(&self) -> bool {
        self.staked_amount > 0
    }
}

/// Sum of all positive stakes.
pub fn total_staked(positions: &[Position]) -> u128 {
    positions
        .iter()
        .filter(|position| position.is_active())
        .fold(0u128, |total, position| {
            total.saturating_add(position.staked_amount)
        })
}
