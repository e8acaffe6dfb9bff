use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StakingError;
use crate::utils::normalize_type_tag;

//
// ──────────────────────────────────────────────────────────────────────────────
// Network object identifiers
// ──────────────────────────────────────────────────────────────────────────────
//

/// Type of the staked asset.
pub const STAKE_ASSET_TYPE: &str =
    "0xfa7ac3951fdca92c5200d468d31a365eb03b2be9936fde615e69f0c1274ad3a0::BLUB::BLUB";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl FromStr for Network {
    type Err = StakingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(StakingError::malformed(format!("unknown network {other}"))),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Testnet => f.write_str("testnet"),
        }
    }
}

/// Shared objects the staking package operates on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectIds {
    /// Published staking package.
    pub package_id: String,
    /// Admin capability (register reward, start/stop staking).
    pub admin_cap_id: String,
    /// Protocol configuration (version, open flag, reward configs).
    pub protocol_config_id: String,
    /// Reward manager (reward indices, global position index).
    pub reward_manager_id: String,
    /// Vault holding staked and reward assets.
    pub vault_id: String,
}

impl ObjectIds {
    pub fn mainnet() -> Self {
        Self {
            package_id: "0xd683b30a655b25c49184002a4668e0f603e862598e9d57ae2ffbfdc8507155df"
                .to_string(),
            admin_cap_id: "0x063163ee579d2ef018f23db7777a1a0d31dbcf1c1d7f24e139811ac9548f1d61"
                .to_string(),
            protocol_config_id:
                "0x086385e23dcfab6ec41cd74830ccaa95a11d9c9d2f33028ea2fd62c3bd823763".to_string(),
            reward_manager_id: "0xa42a644371d67495ca4e21f7ddc61fccc241145d265e1c85efbaabe24140c4d6"
                .to_string(),
            vault_id: "0xda9d30b165d6a1ee71aab54f183ee361afd320c250163a9e476dc0f66d4119ad"
                .to_string(),
        }
    }

    pub fn testnet() -> Self {
        Self {
            package_id: "0x586afd26578f6700409cd7e9a5bc59428f762c122a6076cfa220e5799fbb03e6"
                .to_string(),
            admin_cap_id: "0xa0d97b470d5c11d0b4f1d99bacc2b3afb58c1a791abafe8b59837b5e9553b498"
                .to_string(),
            protocol_config_id:
                "0xbc9ea8a267de77205d659f99298681b28bb730950e338460eb449a424ea588d5".to_string(),
            reward_manager_id: "0xe43722c47e09a557ed4d2156ad9b72c8bafdebab0700e987b4951a0beb86349c"
                .to_string(),
            vault_id: "0x7bc2d3ce12315d0a7653d2dd844a954fbcb0f02d6a10132165ccb8b5f8581f5c"
                .to_string(),
        }
    }

    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Mainnet => Self::mainnet(),
            Network::Testnet => Self::testnet(),
        }
    }
}

//
// ──────────────────────────────────────────────────────────────────────────────
// Reward assets
// ──────────────────────────────────────────────────────────────────────────────
//

/// An asset the protocol may emit as a staking reward.
///
/// The list is static configuration: the summary iterates it in order and
/// does not consult the reward manager's own registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardAssetConfig {
    pub asset_type: String,
    pub symbol: String,
    pub decimals: u8,
    /// Emission per month, in whole units.
    pub monthly_reward: u64,
}

impl RewardAssetConfig {
    pub fn new(asset_type: &str, symbol: &str, decimals: u8, monthly_reward: u64) -> Self {
        Self {
            asset_type: normalize_type_tag(asset_type),
            symbol: symbol.to_string(),
            decimals,
            monthly_reward,
        }
    }
}

pub fn default_reward_assets() -> Vec<RewardAssetConfig> {
    vec![
        RewardAssetConfig::new(STAKE_ASSET_TYPE, "BLUB", 2, 200_000_000_000),
        RewardAssetConfig::new(
            "0xdeeb7a4662eec9f2f3def03fb937a663dddaa2e215b8078a284d026b7946c270::deep::DEEP",
            "DEEP",
            6,
            10_000,
        ),
        RewardAssetConfig::new(
            "0x356a26eb9e012a68958082340d4c4116e7f55615cf27affcff209cf0ae544f59::wal::WAL",
            "WAL",
            9,
            2_912,
        ),
    ]
}

//
// ──────────────────────────────────────────────────────────────────────────────
// StakingConfig
// ──────────────────────────────────────────────────────────────────────────────
//

/// Everything the SDK needs to know about a deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingConfig {
    pub network: Network,
    pub object_ids: ObjectIds,
    /// Asset accepted by `stake`.
    pub stake_asset_type: String,
    /// Reward assets, in display order.
    pub reward_assets: Vec<RewardAssetConfig>,
}

impl StakingConfig {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            object_ids: ObjectIds::for_network(network),
            stake_asset_type: normalize_type_tag(STAKE_ASSET_TYPE),
            reward_assets: default_reward_assets(),
        }
    }

    pub fn with_reward_assets(mut self, reward_assets: Vec<RewardAssetConfig>) -> Self {
        self.reward_assets = reward_assets;
        self
    }

    /// `<package>::events::CalculatePendingRewardEvent`
    pub fn pending_reward_event_type(&self) -> String {
        format!("{}::{}", self.object_ids.package_id, crate::PENDING_REWARD_EVENT)
    }

    pub fn reward_asset(&self, asset_type: &str) -> Option<&RewardAssetConfig> {
        let asset_type = normalize_type_tag(asset_type);
        self.reward_assets
            .iter()
            .find(|asset| asset.asset_type == asset_type)
    }
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self::new(Network::Mainnet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_networks() {
        assert_eq!("Mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!(" testnet ".parse::<Network>().unwrap(), Network::Testnet);
        assert!("devnet".parse::<Network>().is_err());
    }

    #[test]
    fn selects_object_ids_per_network() {
        let config = StakingConfig::new(Network::Testnet);
        assert_eq!(config.object_ids, ObjectIds::testnet());
        assert_ne!(config.object_ids, ObjectIds::mainnet());
    }

    #[test]
    fn looks_up_reward_assets_by_any_spelling() {
        let config = StakingConfig::default();
        let short = STAKE_ASSET_TYPE.trim_start_matches("0x");
        assert_eq!(config.reward_asset(short).unwrap().symbol, "BLUB");
        assert!(config.reward_asset("0x2::sui::SUI").is_none());
    }
}
