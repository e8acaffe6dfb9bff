#![allow(dead_code)]

use serde_json::{json, Value};
use staking_sdk::ledger::{DynamicFieldName, MemoryLedger};
use staking_sdk::utils::normalize_address;
use staking_sdk::{RewardAssetConfig, StakingConfig};

pub const WALLET: &str = "0xa11ce";
pub const POSITIONS_RECORD: &str = "0x9ec0";
pub const ASSET_A: &str = "0xa::alpha::ALPHA";
pub const ASSET_B: &str = "0xb::beta::BETA";
pub const ASSET_C: &str = "0xc::gamma::GAMMA";

pub fn config(assets: &[(&str, u8)]) -> StakingConfig {
    StakingConfig::default().with_reward_assets(
        assets
            .iter()
            .map(|(asset_type, decimals)| {
                let symbol = asset_type.rsplit("::").next().unwrap_or_default();
                RewardAssetConfig::new(asset_type, symbol, *decimals, 0)
            })
            .collect(),
    )
}

fn table(id: &str) -> Value {
    json!({ "type": "0x2::table::Table", "fields": { "id": { "id": id }, "size": "0" } })
}

/// A ledger holding the reward manager of `config` and an empty position index.
pub fn ledger(config: &StakingConfig) -> MemoryLedger {
    let mut ledger = MemoryLedger::default();
    ledger.insert_object(
        &config.object_ids.reward_manager_id,
        json!({
            "id": { "id": config.object_ids.reward_manager_id },
            "total_staked_amount": "0",
            "rewards_infos": { "fields": { "contents": [] } },
            "user_positions_record": table(POSITIONS_RECORD),
        }),
    );
    ledger
}

/// Registers `positions` as `(id, staked)` for `wallet`.
pub fn add_positions(ledger: &mut MemoryLedger, wallet: &str, positions: &[(&str, u64)]) {
    let wallet_table = format!("{POSITIONS_RECORD}{}", &wallet[2..]);
    ledger.insert_dynamic_field(
        POSITIONS_RECORD,
        DynamicFieldName::address(&normalize_address(wallet)),
        &format!("{wallet_table}f"),
        json!({
            "id": { "id": format!("{wallet_table}f") },
            "name": normalize_address(wallet),
            "value": table(&wallet_table),
        }),
    );
    for (id, staked) in positions {
        ledger.insert_dynamic_field(
            &wallet_table,
            DynamicFieldName::object_id(id),
            &format!("{id}e"),
            json!({ "id": { "id": format!("{id}e") }, "name": id, "value": true }),
        );
        ledger.insert_object(
            id,
            json!({
                "id": { "id": id },
                "staked_amount": staked.to_string(),
                "reward_debt": table(&format!("{id}d")),
                "waiting_claim_reward": table(&format!("{id}w")),
            }),
        );
    }
}
