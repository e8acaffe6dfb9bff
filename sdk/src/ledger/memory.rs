//! In-memory ledger backed by a state snapshot.
//!
//! Serves object and table reads from the snapshot and simulates the one
//! read-only entry point the SDK relies on, `calculate_pending_reward`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::ledger::{
    DynamicFieldInfo, DynamicFieldName, ExecutionStatus, Ledger, LedgerError, LedgerEvent,
    OwnedAsset, Page, SimulationResult,
};
use crate::transaction::staking::{CALCULATE_PENDING_REWARD, STAKING_MODULE};
use crate::transaction::{CallArg, TransactionPlan};
use crate::utils::{normalize_address, normalize_type_tag};
use crate::PENDING_REWARD_EVENT;

const DEFAULT_PAGE_SIZE: usize = 50;

/// Serializable ledger state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Object id -> content fields.
    #[serde(default)]
    pub objects: BTreeMap<String, Value>,
    /// Parent object id -> dynamic fields, in table order.
    #[serde(default)]
    pub dynamic_fields: BTreeMap<String, Vec<DynamicFieldInfo>>,
    /// Owner address (normalized on load) -> owned asset records.
    #[serde(default)]
    pub owned_assets: BTreeMap<String, Vec<OwnedAsset>>,
    /// Position id -> reward asset type -> pending reward.
    #[serde(default)]
    pub pending_rewards: BTreeMap<String, BTreeMap<String, u64>>,
}

#[derive(Debug)]
pub struct MemoryLedger {
    snapshot: LedgerSnapshot,
    page_size: usize,
    failing_simulations: BTreeSet<(String, String)>,
    simulation_calls: AtomicUsize,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new(LedgerSnapshot::default())
    }
}

impl MemoryLedger {
    pub fn new(snapshot: LedgerSnapshot) -> Self {
        let mut ledger = Self {
            snapshot: LedgerSnapshot::default(),
            page_size: DEFAULT_PAGE_SIZE,
            failing_simulations: BTreeSet::new(),
            simulation_calls: AtomicUsize::new(0),
        };
        for (owner, assets) in snapshot.owned_assets {
            for asset in assets {
                ledger.insert_owned_asset(&owner, asset);
            }
        }
        for (position, rewards) in snapshot.pending_rewards {
            for (asset_type, amount) in rewards {
                ledger.set_pending_reward(&position, &asset_type, amount);
            }
        }
        ledger.snapshot.objects = snapshot.objects;
        ledger.snapshot.dynamic_fields = snapshot.dynamic_fields;
        ledger
    }

    /// Loads a JSON snapshot file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::InvalidRequest(format!("read snapshot {}: {e}", path.display()))
        })?;
        let snapshot: LedgerSnapshot = serde_json::from_str(&raw).map_err(|e| {
            LedgerError::InvalidRequest(format!("parse snapshot {}: {e}", path.display()))
        })?;
        Ok(Self::new(snapshot))
    }

    /// Maximum number of entries per returned page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    pub fn insert_object(&mut self, object_id: &str, fields: Value) -> &mut Self {
        self.snapshot.objects.insert(object_id.to_string(), fields);
        self
    }

    /// Adds a dynamic field to `parent_id` whose value object is `fields`.
    pub fn insert_dynamic_field(
        &mut self,
        parent_id: &str,
        name: DynamicFieldName,
        object_id: &str,
        fields: Value,
    ) -> &mut Self {
        self.snapshot
            .dynamic_fields
            .entry(parent_id.to_string())
            .or_default()
            .push(DynamicFieldInfo {
                name,
                object_id: object_id.to_string(),
            });
        self.insert_object(object_id, fields)
    }

    pub fn insert_owned_asset(&mut self, owner: &str, mut asset: OwnedAsset) -> &mut Self {
        asset.coin_type = normalize_type_tag(&asset.coin_type);
        self.snapshot
            .owned_assets
            .entry(normalize_address(owner))
            .or_default()
            .push(asset);
        self
    }

    pub fn set_pending_reward(&mut self, position_id: &str, asset_type: &str, amount: u64) -> &mut Self {
        self.snapshot
            .pending_rewards
            .entry(position_id.to_string())
            .or_default()
            .insert(normalize_type_tag(asset_type), amount);
        self
    }

    /// Makes every simulation of `(position, asset_type)` fail at the transport.
    pub fn fail_simulation(&mut self, position_id: &str, asset_type: &str) -> &mut Self {
        self.failing_simulations
            .insert((position_id.to_string(), normalize_type_tag(asset_type)));
        self
    }

    pub fn simulation_calls(&self) -> usize {
        self.simulation_calls.load(Ordering::SeqCst)
    }

    fn simulate(&self, plan: &TransactionPlan) -> Result<SimulationResult, LedgerError> {
        let mut events = Vec::new();
        for call in plan.move_calls() {
            if call.module != STAKING_MODULE || call.function != CALCULATE_PENDING_REWARD {
                continue;
            }
            let position_id = match call.arguments.get(2).and_then(|arg| plan.input(*arg)) {
                Some(CallArg::Object(id)) => id.clone(),
                _ => {
                    return Err(LedgerError::InvalidRequest(
                        "calculate_pending_reward without a position argument".to_string(),
                    ))
                }
            };
            let asset_type = call
                .type_arguments
                .first()
                .map(|t| normalize_type_tag(t))
                .ok_or_else(|| {
                    LedgerError::InvalidRequest(
                        "calculate_pending_reward without a type argument".to_string(),
                    )
                })?;

            if self
                .failing_simulations
                .contains(&(position_id.clone(), asset_type.clone()))
            {
                return Err(LedgerError::Transport(format!(
                    "simulation of {position_id} / {asset_type} timed out"
                )));
            }
            if !self.snapshot.objects.contains_key(&position_id) {
                return Ok(SimulationResult {
                    status: ExecutionStatus::Failure {
                        error: format!("object {position_id} does not exist"),
                    },
                    events: Vec::new(),
                });
            }

            let pending = self
                .snapshot
                .pending_rewards
                .get(&position_id)
                .and_then(|rewards| rewards.get(&asset_type));
            if let Some(amount) = pending {
                events.push(LedgerEvent {
                    event_type: format!("{}::{}", call.package, PENDING_REWARD_EVENT),
                    parsed_json: json!({
                        "reward_info": {
                            "coin_type": { "name": asset_type.trim_start_matches("0x") },
                            "pending_reward_amount": amount.to_string(),
                        }
                    }),
                });
            }
        }
        Ok(SimulationResult {
            status: ExecutionStatus::Success,
            events,
        })
    }
}

fn paginate<T: Clone>(
    items: &[T],
    cursor: Option<String>,
    limit: usize,
) -> Result<Page<T>, LedgerError> {
    let start = match cursor {
        Some(cursor) => cursor
            .parse::<usize>()
            .map_err(|_| LedgerError::InvalidRequest(format!("invalid cursor {cursor}")))?,
        None => 0,
    };
    let start = start.min(items.len());
    let end = start.saturating_add(limit.max(1)).min(items.len());
    let has_next_page = end < items.len();
    Ok(Page {
        data: items[start..end].to_vec(),
        next_cursor: has_next_page.then(|| end.to_string()),
        has_next_page,
    })
}

impl Ledger for MemoryLedger {
    async fn fetch_object(&self, object_id: &str) -> Result<Option<Value>, LedgerError> {
        Ok(self.snapshot.objects.get(object_id).cloned())
    }

    async fn fetch_dynamic_fields(
        &self,
        parent_id: &str,
        cursor: Option<String>,
    ) -> Result<Page<DynamicFieldInfo>, LedgerError> {
        let fields = self
            .snapshot
            .dynamic_fields
            .get(parent_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        paginate(fields, cursor, self.page_size)
    }

    async fn fetch_dynamic_field_by_key(
        &self,
        parent_id: &str,
        key: &DynamicFieldName,
    ) -> Result<Option<Value>, LedgerError> {
        let entry = self
            .snapshot
            .dynamic_fields
            .get(parent_id)
            .and_then(|fields| fields.iter().find(|field| &field.name == key));
        Ok(entry.and_then(|field| self.snapshot.objects.get(&field.object_id).cloned()))
    }

    async fn fetch_objects_batch(
        &self,
        object_ids: &[String],
    ) -> Result<Vec<Option<Value>>, LedgerError> {
        Ok(object_ids
            .iter()
            .map(|id| self.snapshot.objects.get(id).cloned())
            .collect())
    }

    async fn simulate_transaction(
        &self,
        plan: &TransactionPlan,
        sender: &str,
    ) -> Result<SimulationResult, LedgerError> {
        self.simulation_calls.fetch_add(1, Ordering::SeqCst);
        debug!(sender, commands = plan.commands().len(), "simulating transaction");
        tokio::task::yield_now().await;
        self.simulate(plan)
    }

    async fn list_owned_assets(
        &self,
        owner: &str,
        asset_type: &str,
        cursor: Option<String>,
        limit: usize,
    ) -> Result<Page<OwnedAsset>, LedgerError> {
        let asset_type = normalize_type_tag(asset_type);
        let owned: Vec<OwnedAsset> = self
            .snapshot
            .owned_assets
            .get(&normalize_address(owner))
            .map(|assets| {
                assets
                    .iter()
                    .filter(|asset| asset.coin_type == asset_type)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        paginate(&owned, cursor, limit.min(self.page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginates_with_cursor() {
        let items: Vec<u32> = (0..5).collect();
        let first = paginate(&items, None, 2).unwrap();
        assert_eq!(first.data, vec![0, 1]);
        assert!(first.has_next_page);
        let last = paginate(&items, Some("4".to_string()), 2).unwrap();
        assert_eq!(last.data, vec![4]);
        assert!(!last.has_next_page);
        assert!(last.next_cursor.is_none());
        assert!(paginate(&items, Some("x".to_string()), 2).is_err());
    }

    #[test]
    fn loads_snapshot_from_json() {
        let snapshot: LedgerSnapshot = serde_json::from_value(json!({
            "objects": { "0x1": { "id": { "id": "0x1" } } },
            "owned_assets": {
                "0xa": [{ "coinType": "0x2::sui::SUI", "coinObjectId": "0xc", "balance": "7" }]
            },
            "pending_rewards": { "0x1": { "0x2::sui::SUI": 3 } }
        }))
        .unwrap();
        let ledger = MemoryLedger::new(snapshot);
        let sui = normalize_type_tag("0x2::sui::SUI");
        assert_eq!(ledger.snapshot().owned_assets[&normalize_address("0xa")][0].coin_type, sui);
        assert_eq!(ledger.snapshot().pending_rewards["0x1"][&sui], 3);
    }
}
