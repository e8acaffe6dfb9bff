//! Reads of on-ledger staking state.

pub mod config;
pub use config::*;

pub mod position;
pub use position::*;

pub mod reward;
pub use reward::*;

pub mod summary;
pub use summary::*;

use crate::error::{Result, StakingError};
use crate::ledger::{DynamicFieldInfo, Ledger};

/// Every dynamic field of `parent_id`, following pagination to exhaustion.
pub async fn collect_dynamic_fields<L: Ledger>(
    ledger: &L,
    parent_id: &str,
) -> Result<Vec<DynamicFieldInfo>> {
    let mut fields = Vec::new();
    let mut cursor = None;
    loop {
        let page = ledger.fetch_dynamic_fields(parent_id, cursor).await?;
        fields.extend(page.data);
        if !page.has_next_page {
            return Ok(fields);
        }
        cursor = Some(page.next_cursor.ok_or_else(|| {
            StakingError::malformed(format!(
                "dynamic fields of {parent_id}: next page without cursor"
            ))
        })?);
    }
}
