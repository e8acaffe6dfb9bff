//! Wallet staking summary.
//!
//! Position resolution is all-or-nothing: a summary missing a position would
//! understate the stake. Reward simulation is best-effort per
//! `(position, asset)` pair: a failed pair is logged and reported as zero.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::{Result, StakingError};
use crate::ledger::Ledger;
use crate::query::{
    query_reward_manager, query_user_position_ids, query_user_positions, simulate_pending_reward,
};
use crate::states::{total_staked, PositionInfo, PositionReward, StakingConfig, StakingSummary};
use crate::utils::to_display_amount;

/// Builds the staking summary of `wallet`.
///
/// Simulations for every position and reward asset run concurrently. Reward
/// entries follow the configured reward asset order.
pub async fn summarize<L: Ledger>(
    ledger: Arc<L>,
    config: &StakingConfig,
    wallet: &str,
) -> Result<StakingSummary> {
    let manager = query_reward_manager(ledger.as_ref(), config)
        .await
        .map_err(StakingError::into_resolution_failure)?;
    let position_ids =
        query_user_position_ids(ledger.as_ref(), &manager.user_positions_record_id, wallet)
            .await
            .map_err(StakingError::into_resolution_failure)?;
    if position_ids.is_empty() {
        info!(wallet, "wallet has no staking positions");
        return Ok(StakingSummary::empty());
    }

    let positions = query_user_positions(Arc::clone(&ledger), &position_ids)
        .await
        .map_err(StakingError::into_resolution_failure)?;
    let total_staked = total_staked(&positions);

    debug!(
        positions = positions.len(),
        reward_assets = config.reward_assets.len(),
        "simulating pending rewards"
    );
    let shared_config = Arc::new(config.clone());
    let sender: Arc<str> = Arc::from(wallet);
    let mut tasks = JoinSet::new();
    for (position_index, position) in positions.iter().enumerate() {
        for (asset_index, asset) in config.reward_assets.iter().enumerate() {
            let ledger = Arc::clone(&ledger);
            let config = Arc::clone(&shared_config);
            let sender = Arc::clone(&sender);
            let position_id = position.id.clone();
            let asset_type = asset.asset_type.clone();
            tasks.spawn(async move {
                let reward = simulate_pending_reward(
                    ledger.as_ref(),
                    &config,
                    &sender,
                    &position_id,
                    &asset_type,
                )
                .await;
                (position_index, asset_index, reward)
            });
        }
    }

    // Pairs whose task never reports back stay at zero.
    let mut raw_rewards = vec![vec![0u128; config.reward_assets.len()]; positions.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((position_index, asset_index, Ok(reward))) => {
                raw_rewards[position_index][asset_index] = reward.pending_reward;
            }
            Ok((position_index, asset_index, Err(err))) => {
                warn!(
                    position_id = %positions[position_index].id,
                    asset_type = %config.reward_assets[asset_index].asset_type,
                    error = %err,
                    "reward simulation failed, reporting zero"
                );
            }
            Err(err) => {
                warn!(error = %err, "reward simulation task failed, reporting zero");
            }
        }
    }

    let positions: Vec<PositionInfo> = positions
        .into_iter()
        .zip(raw_rewards)
        .map(|(position, raw)| {
            let rewards = config
                .reward_assets
                .iter()
                .zip(raw)
                .map(|(asset, raw_amount)| {
                    let pending_reward = to_display_amount(raw_amount, asset.decimals)
                        .unwrap_or_else(|| {
                            warn!(
                                position_id = %position.id,
                                asset_type = %asset.asset_type,
                                raw_amount = %raw_amount,
                                "pending reward not representable, reporting zero"
                            );
                            Decimal::ZERO
                        });
                    PositionReward {
                        asset_type: asset.asset_type.clone(),
                        symbol: asset.symbol.clone(),
                        raw_amount,
                        pending_reward,
                    }
                })
                .collect();
            PositionInfo {
                position_id: position.id,
                staked: position.staked_amount,
                rewards,
            }
        })
        .collect();

    info!(
        wallet,
        positions = positions.len(),
        total_staked = %total_staked,
        "staking summary built"
    );
    Ok(StakingSummary {
        total_staked,
        positions,
    })
}
