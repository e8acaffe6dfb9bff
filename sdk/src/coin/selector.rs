//! Input asset selection.
//!
//! Turns "N units of asset X" into the records to consume: which ones get
//! merged into a master record and how much is split back out of it.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{Result, StakingError};
use crate::states::{total_balance, AssetRecord};
use crate::transaction::{Argument, TransactionPlan, MAX_PLAN_ENTRIES};
use crate::utils::{is_base_currency, normalize_type_tag};

/// How many of the smallest records are tried before falling back to the
/// largest ones first.
const SMALL_RECORD_WINDOW: usize = 3;

/// Outcome of input selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConsumptionPlan {
    /// Handle of the record holding exactly the requested amount.
    pub target_coin: Argument,
    /// True when the handle is a freshly minted zero-valued record.
    pub is_synthetic_zero: bool,
    pub target_amount: u128,
    /// Consumed records, master first. Empty for synthetic and gas splits.
    pub source_records: Vec<String>,
}

/// Records of `asset_type`, each record id at most once.
pub fn records_of_type(candidates: &[AssetRecord], asset_type: &str) -> Vec<AssetRecord> {
    let asset_type = normalize_type_tag(asset_type);
    let mut seen = HashSet::new();
    candidates
        .iter()
        .filter(|record| normalize_type_tag(&record.asset_type) == asset_type)
        .filter(|record| seen.insert(record.record_id.clone()))
        .cloned()
        .collect()
}

/// Picks the prefix of records whose balances first reach `amount`.
///
/// Records are walked smallest first; when the three smallest together stay
/// below `amount`, they are walked largest first instead. The caller checks
/// that the records can cover `amount` at all.
pub fn select_records(candidates: &[AssetRecord], amount: u128) -> Vec<AssetRecord> {
    let mut sorted = candidates.to_vec();
    sorted.sort_by_key(|record| record.balance);

    let smallest = total_balance(&sorted[..sorted.len().min(SMALL_RECORD_WINDOW)]);
    if smallest < amount {
        sorted.sort_by(|a, b| b.balance.cmp(&a.balance));
    }

    let mut selected = Vec::new();
    let mut running = 0u128;
    for record in sorted {
        running = running.saturating_add(record.balance);
        selected.push(record);
        if running >= amount {
            break;
        }
    }
    selected
}

/// Emits the commands producing a record of exactly `amount` into `tx`.
///
/// Nothing is written to `tx` when selection fails.
pub fn build_input_coin(
    tx: &mut TransactionPlan,
    candidates: &[AssetRecord],
    amount: u128,
    asset_type: &str,
) -> Result<ConsumptionPlan> {
    let records = records_of_type(candidates, asset_type);
    let base_currency = is_base_currency(asset_type);

    if amount == 0 {
        return Ok(match records.first() {
            Some(first) if !base_currency => ConsumptionPlan {
                target_coin: tx.object(&first.record_id),
                is_synthetic_zero: false,
                target_amount: first.balance,
                source_records: vec![first.record_id.clone()],
            },
            _ => ConsumptionPlan {
                target_coin: tx.zero_coin(asset_type),
                is_synthetic_zero: true,
                target_amount: 0,
                source_records: Vec::new(),
            },
        });
    }

    let available = total_balance(&records);
    if available < amount {
        return Err(StakingError::InsufficientBalance {
            asset_type: normalize_type_tag(asset_type),
            required: amount,
            available,
        });
    }
    let split_amount = u64::try_from(amount).map_err(|_| StakingError::AmountOutOfRange(amount))?;

    if base_currency {
        return Ok(ConsumptionPlan {
            target_coin: tx.split_coin(Argument::GasCoin, split_amount),
            is_synthetic_zero: false,
            target_amount: amount,
            source_records: Vec::new(),
        });
    }

    let selected = select_records(&records, amount);
    // One object input per record plus the split amount.
    if selected.len() + 1 > tx.remaining_inputs() || tx.remaining_commands() < 2 {
        return Err(StakingError::PlanTooLarge {
            limit: MAX_PLAN_ENTRIES,
        });
    }
    let source_records: Vec<String> = selected.iter().map(|r| r.record_id.clone()).collect();
    let (master, merged) = source_records
        .split_first()
        .ok_or_else(|| StakingError::malformed("selection produced no records"))?;

    let master = tx.object(master);
    if !merged.is_empty() {
        let sources = merged.iter().map(|id| tx.object(id)).collect();
        tx.merge_coins(master, sources);
    }
    let target_coin = tx.split_coin(master, split_amount);

    Ok(ConsumptionPlan {
        target_coin,
        is_synthetic_zero: false,
        target_amount: amount,
        source_records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Command;
    use proptest::prelude::*;

    const TOKEN: &str = "0xabc::token::TOKEN";
    const SUI: &str = "0x2::sui::SUI";

    fn records(balances: &[u128]) -> Vec<AssetRecord> {
        balances
            .iter()
            .enumerate()
            .map(|(i, balance)| AssetRecord::new(normalize_type_tag(TOKEN), format!("0x{:x}", i + 1), *balance))
            .collect()
    }

    fn selected_balances(candidates: &[AssetRecord], amount: u128) -> Vec<u128> {
        select_records(candidates, amount)
            .iter()
            .map(|r| r.balance)
            .collect()
    }

    #[test]
    fn small_records_cover_small_amounts() {
        let candidates = records(&[50, 10, 20, 5]);
        assert_eq!(selected_balances(&candidates, 30), vec![5, 10, 20]);
    }

    #[test]
    fn falls_back_to_largest_first() {
        let candidates = records(&[1, 2, 3, 100, 40]);
        // 1 + 2 + 3 < 50, so the largest record is taken first.
        assert_eq!(selected_balances(&candidates, 50), vec![100]);
    }

    #[test]
    fn exact_hit_stops_the_walk() {
        let candidates = records(&[10, 20, 30]);
        assert_eq!(selected_balances(&candidates, 30), vec![10, 20]);
    }

    #[test]
    fn zero_amount_without_records_mints_zero() {
        let mut tx = TransactionPlan::new();
        let plan = build_input_coin(&mut tx, &[], 0, TOKEN).unwrap();
        assert!(plan.is_synthetic_zero);
        assert_eq!(plan.target_amount, 0);
        assert_eq!(tx.move_calls().next().unwrap().target(), "0x2::coin::zero");
    }

    #[test]
    fn zero_amount_of_base_currency_mints_zero() {
        let mut tx = TransactionPlan::new();
        let sui = vec![AssetRecord::new(normalize_type_tag(SUI), "0x9", 100)];
        let plan = build_input_coin(&mut tx, &sui, 0, SUI).unwrap();
        assert!(plan.is_synthetic_zero);
    }

    #[test]
    fn zero_amount_uses_first_record() {
        let mut tx = TransactionPlan::new();
        let plan = build_input_coin(&mut tx, &records(&[7, 9]), 0, TOKEN).unwrap();
        assert!(!plan.is_synthetic_zero);
        assert_eq!(plan.target_amount, 7);
        assert_eq!(plan.source_records, vec!["0x1".to_string()]);
        assert!(tx.is_empty());
    }

    #[test]
    fn base_currency_splits_from_gas() {
        let mut tx = TransactionPlan::new();
        let sui = vec![AssetRecord::new(normalize_type_tag(SUI), "0x9", 100)];
        let plan = build_input_coin(&mut tx, &sui, 40, SUI).unwrap();
        assert!(plan.source_records.is_empty());
        assert!(matches!(
            tx.commands(),
            [Command::SplitCoins { coin: Argument::GasCoin, .. }]
        ));
    }

    #[test]
    fn merges_into_master_then_splits() {
        let mut tx = TransactionPlan::new();
        let plan = build_input_coin(&mut tx, &records(&[10, 20, 30]), 45, TOKEN).unwrap();
        // 10 + 20 + 30 >= 45: ascending walk takes all three.
        assert_eq!(plan.source_records, vec!["0x1", "0x2", "0x3"]);
        match tx.commands() {
            [Command::MergeCoins { destination, sources }, Command::SplitCoins { coin, .. }] => {
                assert_eq!(destination, coin);
                assert_eq!(sources.len(), 2);
            }
            other => panic!("unexpected commands {other:?}"),
        }
        assert_eq!(plan.target_coin, Argument::NestedResult(1, 0));
    }

    #[test]
    fn single_record_is_split_without_merge() {
        let mut tx = TransactionPlan::new();
        build_input_coin(&mut tx, &records(&[100]), 60, TOKEN).unwrap();
        assert!(matches!(tx.commands(), [Command::SplitCoins { .. }]));
    }

    #[test]
    fn other_asset_types_are_ignored() {
        let mut tx = TransactionPlan::new();
        let mut candidates = records(&[10]);
        candidates.push(AssetRecord::new(normalize_type_tag(SUI), "0x99", 1_000));
        let err = build_input_coin(&mut tx, &candidates, 20, TOKEN).unwrap_err();
        assert!(matches!(
            err,
            StakingError::InsufficientBalance { required: 20, available: 10, .. }
        ));
        assert!(tx.is_empty());
    }

    #[test]
    fn too_many_dust_records_fail_before_writing() {
        let count = MAX_PLAN_ENTRIES + 10;
        let candidates = records(&vec![1; count]);
        let mut tx = TransactionPlan::new();
        let err = build_input_coin(&mut tx, &candidates, count as u128, TOKEN).unwrap_err();
        assert!(matches!(err, StakingError::PlanTooLarge { .. }));
        assert!(tx.inputs().is_empty());
        assert!(tx.is_empty());
    }

    #[test]
    fn duplicated_records_count_once() {
        let mut candidates = records(&[10]);
        candidates.push(candidates[0].clone());
        let mut tx = TransactionPlan::new();
        assert!(build_input_coin(&mut tx, &candidates, 15, TOKEN).is_err());
    }

    proptest! {
        #[test]
        fn selection_covers_amount_without_repeats(
            balances in prop::collection::vec(1u128..1_000_000, 1..20),
            fraction in 0.0f64..1.0,
        ) {
            let candidates = records(&balances);
            let total: u128 = balances.iter().sum();
            let amount = ((total as f64 * fraction) as u128).clamp(1, total);

            let mut tx = TransactionPlan::new();
            let plan = build_input_coin(&mut tx, &candidates, amount, TOKEN).unwrap();

            let chosen: Vec<&AssetRecord> = plan
                .source_records
                .iter()
                .map(|id| candidates.iter().find(|r| &r.record_id == id).unwrap())
                .collect();
            let covered: u128 = chosen.iter().map(|r| r.balance).sum();
            prop_assert!(covered >= amount);

            let unique: HashSet<&String> = plan.source_records.iter().collect();
            prop_assert_eq!(unique.len(), plan.source_records.len());
            prop_assert!(!plan.is_synthetic_zero);
        }

        #[test]
        fn shortfall_never_yields_a_plan(
            balances in prop::collection::vec(0u128..1_000, 0..10),
            extra in 1u128..1_000,
        ) {
            let candidates = records(&balances);
            let amount = balances.iter().sum::<u128>() + extra;
            let mut tx = TransactionPlan::new();
            let result = build_input_coin(&mut tx, &candidates, amount, TOKEN);
            let is_insufficient = matches!(result, Err(StakingError::InsufficientBalance { .. }));
            prop_assert!(is_insufficient);
            prop_assert!(tx.is_empty());
            prop_assert!(tx.inputs().is_empty());
        }
    }
}
