use std::collections::HashMap;

use tracing::debug;

use crate::error::{Result, StakingError};
use crate::ledger::Ledger;
use crate::states::AssetRecord;
use crate::utils::normalize_type_tag;
use crate::ASSET_PAGE_LIMIT;

/// Per-asset-type cache of the caller's asset records.
///
/// Entries go stale as soon as the ledger changes; callers refresh before
/// building a plan that spends them.
#[derive(Clone, Debug, Default)]
pub struct AssetRecordStore {
    records: HashMap<String, Vec<AssetRecord>>,
}

impl AssetRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cached(&self, asset_type: &str) -> Option<&[AssetRecord]> {
        self.records
            .get(&normalize_type_tag(asset_type))
            .map(Vec::as_slice)
    }

    /// Drops the cached records of `asset_type`. Returns whether any were cached.
    pub fn invalidate(&mut self, asset_type: &str) -> bool {
        self.records
            .remove(&normalize_type_tag(asset_type))
            .is_some()
    }

    /// Lists every record of `asset_type` owned by `owner` and replaces the
    /// cached entry.
    pub async fn refresh<L: Ledger>(
        &mut self,
        ledger: &L,
        owner: &str,
        asset_type: &str,
    ) -> Result<Vec<AssetRecord>> {
        if owner.trim().is_empty() {
            return Err(StakingError::MissingOwner);
        }
        let asset_type = normalize_type_tag(asset_type);

        let mut records = Vec::new();
        let mut cursor = None;
        loop {
            let page = ledger
                .list_owned_assets(owner, &asset_type, cursor, ASSET_PAGE_LIMIT)
                .await?;
            records.extend(page.data.into_iter().map(|asset| {
                AssetRecord::new(
                    normalize_type_tag(&asset.coin_type),
                    asset.coin_object_id,
                    asset.balance,
                )
            }));
            if !page.has_next_page {
                break;
            }
            cursor = Some(page.next_cursor.ok_or_else(|| {
                StakingError::malformed("owned asset page has more entries but no cursor")
            })?);
        }

        debug!(owner, asset_type = %asset_type, count = records.len(), "refreshed asset records");
        self.records.insert(asset_type, records.clone());
        Ok(records)
    }

    /// Cached records of `asset_type`, fetched first when missing or when
    /// `refresh` is set.
    pub async fn get<L: Ledger>(
        &mut self,
        ledger: &L,
        owner: &str,
        asset_type: &str,
        refresh: bool,
    ) -> Result<Vec<AssetRecord>> {
        if !refresh {
            if let Some(records) = self.cached(asset_type) {
                return Ok(records.to_vec());
            }
        }
        self.refresh(ledger, owner, asset_type).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{MemoryLedger, OwnedAsset};

    const OWNER: &str = "0xa11ce";
    const TOKEN: &str = "0xabc::token::TOKEN";

    fn ledger_with(count: usize) -> MemoryLedger {
        let mut ledger = MemoryLedger::default().with_page_size(2);
        for i in 0..count {
            ledger.insert_owned_asset(
                OWNER,
                OwnedAsset {
                    coin_type: TOKEN.to_string(),
                    coin_object_id: format!("0xc{i}"),
                    balance: 10 * (i as u128 + 1),
                },
            );
        }
        ledger.insert_owned_asset(
            OWNER,
            OwnedAsset {
                coin_type: "0x2::sui::SUI".to_string(),
                coin_object_id: "0x5u1".to_string(),
                balance: 1,
            },
        );
        ledger
    }

    #[tokio::test]
    async fn refresh_walks_every_page() {
        let ledger = ledger_with(5);
        let mut store = AssetRecordStore::new();
        let records = store.refresh(&ledger, OWNER, TOKEN).await.unwrap();
        assert_eq!(records.len(), 5);
        assert!(records.iter().all(|r| r.asset_type == normalize_type_tag(TOKEN)));
        assert_eq!(store.cached(TOKEN).unwrap().len(), 5);
    }

    #[tokio::test]
    async fn get_serves_cache_until_refresh() {
        let mut ledger = ledger_with(1);
        let mut store = AssetRecordStore::new();
        assert_eq!(store.get(&ledger, OWNER, TOKEN, false).await.unwrap().len(), 1);

        ledger.insert_owned_asset(
            OWNER,
            OwnedAsset {
                coin_type: TOKEN.to_string(),
                coin_object_id: "0xnew".to_string(),
                balance: 3,
            },
        );
        assert_eq!(store.get(&ledger, OWNER, TOKEN, false).await.unwrap().len(), 1);
        assert_eq!(store.get(&ledger, OWNER, TOKEN, true).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_owner_is_rejected() {
        let ledger = ledger_with(1);
        let mut store = AssetRecordStore::new();
        let err = store.refresh(&ledger, "  ", TOKEN).await.unwrap_err();
        assert!(matches!(err, StakingError::MissingOwner));
        assert!(store.cached(TOKEN).is_none());
    }

    #[test]
    fn invalidate_reports_presence() {
        let mut store = AssetRecordStore::new();
        store
            .records
            .insert(normalize_type_tag(TOKEN), vec![AssetRecord::new(TOKEN, "0x1", 1)]);
        assert!(store.invalidate(TOKEN));
        assert!(!store.invalidate(TOKEN));
    }
}
