use crate::error::{Result, StakingError};
use crate::ledger::Ledger;
use crate::states::layout::{decode, ProtocolConfigLayout};
use crate::states::{ProtocolConfig, RewardConfig, StakingConfig};
use crate::utils::normalize_type_tag;

pub async fn query_protocol_config<L: Ledger>(
    ledger: &L,
    config: &StakingConfig,
) -> Result<ProtocolConfig> {
    let id = &config.object_ids.protocol_config_id;
    let raw = ledger
        .fetch_object(id)
        .await?
        .ok_or_else(|| StakingError::malformed(format!("protocol config {id} not found")))?;
    let layout: ProtocolConfigLayout = decode("protocol config", &raw)?;

    let reward_configs = layout
        .reward_configs
        .fields
        .contents
        .into_iter()
        .map(|entry| {
            let asset_type = normalize_type_tag(&entry.fields.key.fields.name);
            let reward = entry.fields.value.fields;
            let reward_config = RewardConfig {
                id: reward.id.id,
                asset_type: normalize_type_tag(&reward.coin_type.fields.name),
                start_time: reward.start_time,
                end_time: reward.end_time,
                emission_rate: reward.emission_rate,
            };
            (asset_type, reward_config)
        })
        .collect();

    Ok(ProtocolConfig {
        id: layout.id.id,
        version: layout.version,
        open_staking: layout.open_staking,
        reward_configs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use serde_json::json;

    #[tokio::test]
    async fn decodes_protocol_config() {
        let config = StakingConfig::default();
        let mut ledger = MemoryLedger::default();
        ledger.insert_object(
            &config.object_ids.protocol_config_id,
            json!({
                "id": { "id": config.object_ids.protocol_config_id },
                "version": "2",
                "open_staking": true,
                "reward_configs": { "fields": { "contents": [{
                    "fields": {
                        "key": { "fields": { "name": "2::sui::SUI" } },
                        "value": { "fields": {
                            "id": { "id": "0xrc" },
                            "start_time": "1000",
                            "end_time": 2000,
                            "emission_rate": "15",
                            "coin_type": { "fields": { "name": "2::sui::SUI" } }
                        } }
                    }
                }] } }
            }),
        );

        let protocol = query_protocol_config(&ledger, &config).await.unwrap();
        assert_eq!(protocol.version, 2);
        assert!(protocol.open_staking);
        let reward = protocol.reward_config("0x2::sui::SUI").unwrap();
        assert_eq!(reward.id, "0xrc");
        assert_eq!(reward.end_time, 2000);
        assert_eq!(reward.emission_rate, 15);
        assert!(protocol.reward_config("0x3::x::X").is_none());
    }

    #[tokio::test]
    async fn missing_reward_configs_is_malformed() {
        let config = StakingConfig::default();
        let mut ledger = MemoryLedger::default();
        ledger.insert_object(
            &config.object_ids.protocol_config_id,
            json!({ "id": { "id": "0x1" }, "version": "1", "open_staking": false }),
        );
        let err = query_protocol_config(&ledger, &config).await.unwrap_err();
        assert!(matches!(err, StakingError::MalformedExternalData(_)));
    }
}
