use serde::{Deserialize, Serialize};

use crate::utils::{deserialize_number, serialize_number};

/// One fungible asset record owned by the caller.
///
/// A snapshot: the balance is authoritative only at fetch time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Normalized type tag of the asset.
    pub asset_type: String,
    /// Ledger object id of the record.
    pub record_id: String,
    #[serde(
        deserialize_with = "deserialize_number",
        serialize_with = "serialize_number"
    )]
    pub balance: u128,
}

impl AssetRecord {
    pub fn new(asset_type: impl Into<String>, record_id: impl Into<String>, balance: u128) -> Self {
        Self {
            asset_type: asset_type.into(),
            record_id: record_id.into(),
            balance,
        }
    }
}

pub fn total_balance(records: &[AssetRecord]) -> u128 {
    records
        .iter()
        .fold(0u128, |total, record| total.saturating_add(record.balance))
}
