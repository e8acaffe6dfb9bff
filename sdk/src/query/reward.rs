//! Pending reward simulation and the reward manager.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Result, StakingError};
use crate::ledger::{ExecutionStatus, Ledger};
use crate::states::layout::{decode, RewardManagerLayout};
use crate::states::{
    CalculatePendingRewardEvent, PendingReward, RewardInfo, RewardManager, StakingConfig,
};
use crate::transaction::staking::StakingCalls;
use crate::transaction::TransactionPlan;
use crate::utils::normalize_type_tag;

/// Simulates `calculate_pending_reward<asset_type>` for one position and
/// returns every pending reward event it emitted.
pub async fn calculate_pending_rewards<L: Ledger>(
    ledger: &L,
    config: &StakingConfig,
    sender: &str,
    position_id: &str,
    asset_type: &str,
) -> Result<Vec<PendingReward>> {
    let failure = |reason: String| StakingError::RewardSimulationFailure {
        position_id: position_id.to_string(),
        asset_type: asset_type.to_string(),
        reason,
    };

    let mut tx = TransactionPlan::new();
    StakingCalls::new(&config.object_ids).calculate_pending_reward(&mut tx, position_id, asset_type);

    let result = ledger
        .simulate_transaction(&tx, sender)
        .await
        .map_err(|e| failure(e.to_string()))?;
    if let ExecutionStatus::Failure { error } = result.status {
        return Err(failure(error));
    }

    let event_type = normalize_type_tag(&config.pending_reward_event_type());
    result
        .events
        .iter()
        .filter(|event| normalize_type_tag(&event.event_type) == event_type)
        .map(|event| -> Result<PendingReward> {
            let event: CalculatePendingRewardEvent =
                decode("pending reward event", &event.parsed_json)?;
            Ok(PendingReward {
                asset_type: normalize_type_tag(&event.reward_info.coin_type.name),
                pending_reward: event.reward_info.pending_reward_amount,
            })
        })
        .collect()
}

/// Pending reward of `asset_type` for one position.
///
/// A simulation that emits no matching event means nothing is pending.
pub async fn simulate_pending_reward<L: Ledger>(
    ledger: &L,
    config: &StakingConfig,
    sender: &str,
    position_id: &str,
    asset_type: &str,
) -> Result<PendingReward> {
    let asset_type = normalize_type_tag(asset_type);
    let rewards = calculate_pending_rewards(ledger, config, sender, position_id, &asset_type).await?;
    let reward = rewards
        .into_iter()
        .find(|reward| reward.asset_type == asset_type);
    if reward.is_none() {
        debug!(position_id, asset_type = %asset_type, "no pending reward event");
    }
    Ok(reward.unwrap_or_else(|| PendingReward::zero(asset_type)))
}

pub async fn query_reward_manager<L: Ledger>(
    ledger: &L,
    config: &StakingConfig,
) -> Result<RewardManager> {
    let id = &config.object_ids.reward_manager_id;
    let raw = ledger
        .fetch_object(id)
        .await?
        .ok_or_else(|| StakingError::malformed(format!("reward manager {id} not found")))?;
    let layout: RewardManagerLayout = decode("reward manager", &raw)?;

    let reward_infos: BTreeMap<String, RewardInfo> = layout
        .rewards_infos
        .map(|infos| infos.fields.contents)
        .unwrap_or_default()
        .into_iter()
        .map(|entry| {
            let asset_type = normalize_type_tag(&entry.fields.key.fields.name);
            let info = entry.fields.value.fields;
            let reward = RewardInfo {
                reward_asset_type: normalize_type_tag(&info.reward_coin_type.fields.name),
                acc_reward_per_share: info.acc_reward_per_share,
                last_reward_time: info.last_reward_time,
            };
            (asset_type, reward)
        })
        .collect();

    Ok(RewardManager {
        id: layout.id.id,
        total_staked_amount: layout.total_staked_amount,
        reward_infos,
        user_positions_record_id: layout.user_positions_record.table_id().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use crate::states::Network;
    use serde_json::json;

    const WALLET: &str = "0xa11ce";
    const SUI: &str = "0x2::sui::SUI";

    #[tokio::test]
    async fn reads_pending_reward_from_event() {
        let config = StakingConfig::new(Network::Testnet);
        let mut ledger = MemoryLedger::default();
        ledger
            .insert_object("0xp1", json!({}))
            .set_pending_reward("0xp1", SUI, 250);

        let reward = simulate_pending_reward(&ledger, &config, WALLET, "0xp1", SUI).await.unwrap();
        assert_eq!(reward.pending_reward, 250);
        assert_eq!(reward.asset_type, normalize_type_tag(SUI));
    }

    #[tokio::test]
    async fn missing_event_means_zero() {
        let config = StakingConfig::default();
        let mut ledger = MemoryLedger::default();
        ledger.insert_object("0xp1", json!({}));

        let reward = simulate_pending_reward(&ledger, &config, WALLET, "0xp1", SUI).await.unwrap();
        assert_eq!(reward, PendingReward::zero(normalize_type_tag(SUI)));
    }

    #[tokio::test]
    async fn aborted_simulation_is_a_failure() {
        let config = StakingConfig::default();
        let ledger = MemoryLedger::default();
        let err = simulate_pending_reward(&ledger, &config, WALLET, "0xgone", SUI)
            .await
            .unwrap_err();
        assert!(matches!(err, StakingError::RewardSimulationFailure { .. }));
    }

    #[tokio::test]
    async fn decodes_reward_manager() {
        let config = StakingConfig::default();
        let mut ledger = MemoryLedger::default();
        ledger.insert_object(
            &config.object_ids.reward_manager_id,
            json!({
                "id": { "id": config.object_ids.reward_manager_id },
                "total_staked_amount": "900",
                "rewards_infos": { "fields": { "contents": [{
                    "fields": {
                        "key": { "fields": { "name": "2::sui::SUI" } },
                        "value": { "fields": {
                            "reward_coin_type": { "fields": { "name": "2::sui::SUI" } },
                            "acc_reward_per_share": "123456789",
                            "last_reward_time": "1719360000000"
                        } }
                    }
                }] } },
                "user_positions_record": { "fields": { "id": { "id": "0xrec" } } }
            }),
        );

        let manager = query_reward_manager(&ledger, &config).await.unwrap();
        assert_eq!(manager.total_staked_amount, 900);
        assert_eq!(manager.user_positions_record_id, "0xrec");
        let info = &manager.reward_infos[&normalize_type_tag(SUI)];
        assert_eq!(info.acc_reward_per_share, 123_456_789);
        assert_eq!(info.last_reward_time, 1_719_360_000_000);
    }

    #[tokio::test]
    async fn missing_reward_manager_is_malformed() {
        let ledger = MemoryLedger::default();
        let err = query_reward_manager(&ledger, &StakingConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StakingError::MalformedExternalData(_)));
    }
}
