//! Object layouts of the staking package, as the ledger reports them in its
//! JSON content view.
//!
//! Nested Move structs arrive wrapped as `{ "type": ..., "fields": { ... } }`,
//! integers as decimal strings. These types only mirror that shape; the
//! public domain types live next door.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, StakingError};
use crate::utils::deserialize_number;

/// `0x2::object::UID`
#[derive(Clone, Debug, Deserialize)]
pub struct Uid {
    pub id: String,
}

/// `{ "fields": T }` wrapper around a nested struct.
#[derive(Clone, Debug, Deserialize)]
pub struct Fields<T> {
    pub fields: T,
}

/// Handle of a `Table`/`Bag`; its entries are dynamic fields of `id`.
#[derive(Clone, Debug, Deserialize)]
pub struct TableHandle {
    pub id: Uid,
}

impl Fields<TableHandle> {
    pub fn table_id(&self) -> &str {
        &self.fields.id.id
    }
}

/// `std::type_name::TypeName`
#[derive(Clone, Debug, Deserialize)]
pub struct TypeName {
    pub name: String,
}

/// `dynamic_field::Field<TypeName, u64>`, one entry of a per-asset table.
#[derive(Clone, Debug, Deserialize)]
pub struct TypeNameEntry {
    pub name: Fields<TypeName>,
    #[serde(deserialize_with = "deserialize_number")]
    pub value: u128,
}

/// `staking::position::StakePosition`
#[derive(Clone, Debug, Deserialize)]
pub struct PositionLayout {
    pub id: Uid,
    #[serde(deserialize_with = "deserialize_number")]
    pub staked_amount: u128,
    pub reward_debt: Fields<TableHandle>,
    pub waiting_claim_reward: Fields<TableHandle>,
}

/// Entry of the global position index: `Field<address, Table<ID, bool>>`.
#[derive(Clone, Debug, Deserialize)]
pub struct WalletIndexEntry {
    pub value: Fields<TableHandle>,
}

/// `0x2::vec_map::VecMap<TypeName, V>`
#[derive(Clone, Debug, Deserialize)]
pub struct VecMap<V> {
    #[serde(default = "Vec::new")]
    pub contents: Vec<Fields<VecMapEntry<V>>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VecMapEntry<V> {
    pub key: Fields<TypeName>,
    pub value: Fields<V>,
}

/// `staking::reward::RewardInfo`
#[derive(Clone, Debug, Deserialize)]
pub struct RewardInfoLayout {
    pub reward_coin_type: Fields<TypeName>,
    #[serde(deserialize_with = "deserialize_number")]
    pub acc_reward_per_share: u128,
    #[serde(deserialize_with = "deserialize_number")]
    pub last_reward_time: u64,
}

/// `staking::reward::RewardManager`
#[derive(Clone, Debug, Deserialize)]
pub struct RewardManagerLayout {
    pub id: Uid,
    #[serde(deserialize_with = "deserialize_number")]
    pub total_staked_amount: u128,
    #[serde(default)]
    pub rewards_infos: Option<Fields<VecMap<RewardInfoLayout>>>,
    pub user_positions_record: Fields<TableHandle>,
}

/// `staking::config::RewardConfig`
#[derive(Clone, Debug, Deserialize)]
pub struct RewardConfigLayout {
    pub id: Uid,
    #[serde(deserialize_with = "deserialize_number")]
    pub start_time: u64,
    #[serde(deserialize_with = "deserialize_number")]
    pub end_time: u64,
    #[serde(deserialize_with = "deserialize_number")]
    pub emission_rate: u128,
    pub coin_type: Fields<TypeName>,
}

/// `staking::config::ProtocolConfig`
#[derive(Clone, Debug, Deserialize)]
pub struct ProtocolConfigLayout {
    pub id: Uid,
    #[serde(deserialize_with = "deserialize_number")]
    pub version: u64,
    pub open_staking: bool,
    pub reward_configs: Fields<VecMap<RewardConfigLayout>>,
}

/// Deserializes a layout, reporting failures as malformed external data.
pub fn decode<T: DeserializeOwned>(what: &str, value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| StakingError::malformed(format!("{what}: {e}")))
}
