//! Position resolution and decoding.
//!
//! A position keeps its per-asset bookkeeping in two tables. Each table is
//! expanded in two steps: enumerate its dynamic fields, then resolve every
//! field object to a `(type name, amount)` pair.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinSet;
use tracing::debug;

use crate::error::{Result, StakingError};
use crate::ledger::{DynamicFieldName, Ledger};
use crate::query::collect_dynamic_fields;
use crate::states::layout::{decode, PositionLayout, TypeNameEntry, WalletIndexEntry};
use crate::states::Position;
use crate::utils::{normalize_type_tag, parse_address};

/// Flattens a `Table<TypeName, u64>` into `type tag -> amount`.
async fn decode_type_name_table<L: Ledger>(
    ledger: &L,
    table_id: &str,
) -> Result<BTreeMap<String, u128>> {
    let fields = collect_dynamic_fields(ledger, table_id).await?;
    if fields.is_empty() {
        return Ok(BTreeMap::new());
    }

    let object_ids: Vec<String> = fields.into_iter().map(|field| field.object_id).collect();
    let objects = ledger.fetch_objects_batch(&object_ids).await?;
    if objects.len() != object_ids.len() {
        return Err(StakingError::malformed(format!(
            "table {table_id}: requested {} entries, got {}",
            object_ids.len(),
            objects.len()
        )));
    }

    let mut entries = BTreeMap::new();
    for (object_id, object) in object_ids.iter().zip(objects) {
        let object = object.ok_or_else(|| {
            StakingError::malformed(format!("table {table_id}: entry {object_id} not found"))
        })?;
        let entry: TypeNameEntry = decode("table entry", &object)?;
        entries.insert(normalize_type_tag(&entry.name.fields.name), entry.value);
    }
    Ok(entries)
}

/// Decodes raw position fields, expanding both per-asset tables.
pub async fn decode_position<L: Ledger>(ledger: &L, raw: &Value) -> Result<Position> {
    let layout: PositionLayout = decode("position", raw)?;
    let reward_debt = decode_type_name_table(ledger, layout.reward_debt.table_id()).await?;
    let waiting_claim_reward =
        decode_type_name_table(ledger, layout.waiting_claim_reward.table_id()).await?;

    Ok(Position {
        id: layout.id.id,
        staked_amount: layout.staked_amount,
        reward_debt,
        waiting_claim_reward,
    })
}

/// Position ids registered for `wallet` in the global position index.
///
/// A wallet missing from the index owns no positions.
pub async fn query_user_position_ids<L: Ledger>(
    ledger: &L,
    positions_record_id: &str,
    wallet: &str,
) -> Result<Vec<String>> {
    let wallet = parse_address(wallet)?;
    let entry = ledger
        .fetch_dynamic_field_by_key(positions_record_id, &DynamicFieldName::address(&wallet))
        .await?;
    let Some(entry) = entry else {
        debug!(wallet = %wallet, "wallet has no position table");
        return Ok(Vec::new());
    };

    let index: WalletIndexEntry = decode("position index entry", &entry)?;
    collect_dynamic_fields(ledger, index.value.table_id())
        .await?
        .into_iter()
        .map(|field| match field.name.value {
            Value::String(id) => Ok(id),
            other => Err(StakingError::malformed(format!(
                "position index key is not an id: {other}"
            ))),
        })
        .collect()
}

/// Fetches and decodes `position_ids`, in the given order.
///
/// Positions are decoded concurrently. The first failure aborts the rest.
pub async fn query_user_positions<L: Ledger>(
    ledger: Arc<L>,
    position_ids: &[String],
) -> Result<Vec<Position>> {
    if position_ids.is_empty() {
        return Ok(Vec::new());
    }
    let objects = ledger.fetch_objects_batch(position_ids).await?;
    if objects.len() != position_ids.len() {
        return Err(StakingError::malformed(format!(
            "requested {} positions, got {}",
            position_ids.len(),
            objects.len()
        )));
    }

    let mut tasks = JoinSet::new();
    for (index, (id, object)) in position_ids.iter().zip(objects).enumerate() {
        let raw = object.ok_or_else(|| {
            StakingError::PositionResolutionFailure(format!("position {id} not found"))
        })?;
        let ledger = Arc::clone(&ledger);
        tasks.spawn(async move { (index, decode_position(ledger.as_ref(), &raw).await) });
    }

    let mut decoded: Vec<Option<Position>> = vec![None; position_ids.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, position) = joined.map_err(|e| {
            StakingError::PositionResolutionFailure(format!("position decode task failed: {e}"))
        })?;
        decoded[index] = Some(position?);
    }

    decoded
        .into_iter()
        .zip(position_ids)
        .map(|(position, id)| {
            position.ok_or_else(|| {
                StakingError::PositionResolutionFailure(format!("position {id} was not decoded"))
            })
        })
        .collect()
}
